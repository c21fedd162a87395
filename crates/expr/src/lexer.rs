// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression lexer.
//!
//! The lexer is position-driven: the parser switches to raw template mode
//! for string bodies and resumes lexing where the string ended.

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Set after a `.` so `a.0.1` lexes as two integer indexes.
    after_dot: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos, after_dot: false }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
        self.after_dot = false;
    }

    #[inline]
    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Lex every token up to end of input.
    pub fn tokenize(src: &str) -> Result<Vec<Token>, Diagnostic> {
        let mut lexer = Lexer::new(src, 0);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace();
        let start = self.pos;
        let after_dot = std::mem::take(&mut self.after_dot);
        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::empty(start)));
        };

        if ch.is_ascii_digit() {
            return Ok(self.lex_number(start, after_dot));
        }
        if ch.is_alphabetic() || ch == '_' {
            return Ok(self.lex_ident(start));
        }

        let two = self.rest().get(..2).unwrap_or("");
        let double = match two {
            "==" => Some(TokenKind::EqEq),
            "!=" => Some(TokenKind::NotEq),
            "<=" => Some(TokenKind::Le),
            ">=" => Some(TokenKind::Ge),
            "&&" => Some(TokenKind::AndAnd),
            "||" => Some(TokenKind::OrOr),
            "~}" => Some(TokenKind::TildeRBrace),
            _ => None,
        };
        if let Some(kind) = double {
            self.pos += 2;
            return Ok(Token::new(kind, Span::new(start, self.pos)));
        }

        let kind = match ch {
            '"' => TokenKind::QuoteOpen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '=' => TokenKind::Assign,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            other => {
                return Err(Diagnostic::syntax(
                    format!("unexpected character '{other}'"),
                    Span::new(start, start + other.len_utf8()),
                ))
            }
        };
        self.pos += 1;
        self.after_dot = kind == TokenKind::Dot;
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn take_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn lex_number(&mut self, start: usize, integer_only: bool) -> Token {
        self.take_digits();
        if !integer_only {
            let rest = self.rest().as_bytes();
            if rest.first() == Some(&b'.') && rest.get(1).is_some_and(u8::is_ascii_digit) {
                self.pos += 1;
                self.take_digits();
            }
            let rest = self.rest().as_bytes();
            if matches!(rest.first(), Some(b'e' | b'E')) {
                let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
                if rest.get(1 + sign).is_some_and(u8::is_ascii_digit) {
                    self.pos += 1 + sign;
                    self.take_digits();
                }
            }
        }
        let text = self.src[start..self.pos].to_string();
        Token::new(TokenKind::Number(text), Span::new(start, self.pos))
    }

    /// Identifiers may contain `-` after the first character.
    fn lex_ident(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if !(ch.is_alphanumeric() || ch == '_' || ch == '-') {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = self.src[start..self.pos].to_string();
        Token::new(TokenKind::Ident(text), Span::new(start, self.pos))
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
