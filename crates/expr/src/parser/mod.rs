// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser for expressions and templates.

mod template;

use crate::ast::{BinaryOp, Expr, ExprKind, ObjectKey, TemplatePart, UnaryOp};
use crate::diagnostic::Diagnostic;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::value::Value;

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    /// Trim leading whitespace from the next literal (set by `~}`).
    strip_next: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { lexer: Lexer::new(src, 0), peeked: None, strip_next: false }
    }

    /// Parse a complete template.
    pub(crate) fn parse_template(src: &'a str) -> Result<Vec<TemplatePart>, Diagnostic> {
        let mut parser = Parser::new(src);
        parser.parse_top_level()
    }

    /// Parse a complete standalone expression.
    pub(crate) fn parse_expression(src: &'a str) -> Result<Expr, Diagnostic> {
        let mut parser = Parser::new(src);
        let expr = parser.parse_expr()?;
        let next = parser.advance()?;
        if next.kind != TokenKind::Eof {
            return Err(unexpected(&next, "end of expression"));
        }
        Ok(expr)
    }

    fn peek(&mut self) -> Result<&Token, Diagnostic> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    fn peek_kind(&mut self) -> Result<&TokenKind, Diagnostic> {
        Ok(&self.peek()?.kind)
    }

    fn advance(&mut self) -> Result<Token, Diagnostic> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<Option<Token>, Diagnostic> {
        if self.peek_kind()? == kind {
            return self.advance().map(Some);
        }
        Ok(None)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, Diagnostic> {
        let token = self.advance()?;
        if token.kind != kind {
            return Err(unexpected(&token, what));
        }
        Ok(token)
    }

    pub(crate) fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        let cond = self.parse_binary(1)?;
        if self.eat(&TokenKind::Question)?.is_none() {
            return Ok(cond);
        }
        let then = self.parse_expr()?;
        self.expect(TokenKind::Colon, "':' in conditional expression")?;
        let otherwise = self.parse_expr()?;
        let span = cond.span.merge(otherwise.span);
        Ok(Expr::new(
            ExprKind::Conditional { cond: Box::new(cond), then: Box::new(then), otherwise: Box::new(otherwise) },
            span,
        ))
    }

    fn peek_binary_op(&mut self) -> Result<Option<BinaryOp>, Diagnostic> {
        Ok(match self.peek_kind()? {
            TokenKind::OrOr => Some(BinaryOp::Or),
            TokenKind::AndAnd => Some(BinaryOp::And),
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Le => Some(BinaryOp::Le),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Ge => Some(BinaryOp::Ge),
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    /// Precedence climbing; all binary operators are left-associative.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_binary_op()? {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance()?;
            let right = self.parse_binary(prec + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = match self.peek_kind()? {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        let start = self.advance()?.span;
        let operand = self.parse_unary()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(ExprKind::Unary(op, Box::new(operand)), span))
    }

    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind()? {
                TokenKind::Dot => {
                    self.advance()?;
                    let token = self.advance()?;
                    let span = expr.span.merge(token.span);
                    expr = match token.kind {
                        TokenKind::Ident(name) => Expr::new(ExprKind::GetAttr(Box::new(expr), name), span),
                        TokenKind::Number(n) => {
                            let index = Expr::new(ExprKind::Literal(number_value(&n, token.span)?), token.span);
                            Expr::new(ExprKind::Index(Box::new(expr), Box::new(index)), span)
                        }
                        _ => return Err(unexpected(&token, "attribute name")),
                    };
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let index = self.parse_expr()?;
                    let close = self.expect(TokenKind::RBracket, "']'")?;
                    let span = expr.span.merge(close.span);
                    expr = Expr::new(ExprKind::Index(Box::new(expr), Box::new(index)), span);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.advance()?;
        let span = token.span;
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::new(ExprKind::Literal(number_value(&n, span)?), span)),
            TokenKind::QuoteOpen => self.parse_quoted(span.start),
            TokenKind::Ident(name) => {
                let literal = match name.as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    "null" => Some(Value::Null),
                    _ => None,
                };
                if let Some(value) = literal {
                    return Ok(Expr::new(ExprKind::Literal(value), span));
                }
                if self.peek_kind()? == &TokenKind::LParen {
                    return self.parse_call(name, span);
                }
                Ok(Expr::new(ExprKind::Variable(name), span))
            }
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                let close = self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::new(inner.kind, span.merge(close.span)))
            }
            TokenKind::LBracket => self.parse_list(span),
            TokenKind::LBrace => self.parse_object(span),
            _ => Err(unexpected(&token, "expression")),
        }
    }

    fn parse_call(&mut self, name: String, start: Span) -> Result<Expr, Diagnostic> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        loop {
            if let Some(close) = self.eat(&TokenKind::RParen)? {
                return Ok(Expr::new(ExprKind::Call { name, args }, start.merge(close.span)));
            }
            args.push(self.parse_expr()?);
            if self.eat(&TokenKind::Comma)?.is_none() {
                let close = self.expect(TokenKind::RParen, "',' or ')'")?;
                return Ok(Expr::new(ExprKind::Call { name, args }, start.merge(close.span)));
            }
        }
    }

    fn parse_list(&mut self, start: Span) -> Result<Expr, Diagnostic> {
        let mut items = Vec::new();
        loop {
            if let Some(close) = self.eat(&TokenKind::RBracket)? {
                return Ok(Expr::new(ExprKind::List(items), start.merge(close.span)));
            }
            items.push(self.parse_expr()?);
            if self.eat(&TokenKind::Comma)?.is_none() {
                let close = self.expect(TokenKind::RBracket, "',' or ']'")?;
                return Ok(Expr::new(ExprKind::List(items), start.merge(close.span)));
            }
        }
    }

    /// `{ key = value, "key": value, (expr) = value }`; commas optional.
    fn parse_object(&mut self, start: Span) -> Result<Expr, Diagnostic> {
        let mut entries = Vec::new();
        loop {
            if let Some(close) = self.eat(&TokenKind::RBrace)? {
                return Ok(Expr::new(ExprKind::Object(entries), start.merge(close.span)));
            }
            let token = self.advance()?;
            let key = match token.kind {
                TokenKind::Ident(name) => ObjectKey::Name(name),
                TokenKind::QuoteOpen => ObjectKey::Expr(self.parse_quoted(token.span.start)?),
                TokenKind::LParen => {
                    let inner = self.parse_expr()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    ObjectKey::Expr(inner)
                }
                _ => return Err(unexpected(&token, "object key")),
            };
            let sep = self.advance()?;
            if !matches!(sep.kind, TokenKind::Assign | TokenKind::Colon) {
                return Err(unexpected(&sep, "'=' or ':' after object key"));
            }
            let value = self.parse_expr()?;
            entries.push((key, value));
            self.eat(&TokenKind::Comma)?;
        }
    }
}

fn number_value(text: &str, span: Span) -> Result<Value, Diagnostic> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::from(n));
    }
    text.parse::<f64>()
        .map(Value::from_f64)
        .map_err(|_| Diagnostic::syntax(format!("invalid number '{text}'"), span))
}

fn unexpected(token: &Token, expected: &str) -> Diagnostic {
    Diagnostic::syntax(format!("unexpected {}, expected {expected}", token.kind), token.span)
}

#[cfg(test)]
#[path = "../parser_tests/mod.rs"]
mod tests;
