// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template mode: literal text, `${}` interpolation and `%{}` directives.
//!
//! Used both for whole templates and for the bodies of quoted strings
//! inside expressions.

use super::{unexpected, Parser};
use crate::ast::{Expr, ExprKind, TemplatePart};
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::TokenKind;
use crate::value::Value;

/// What stopped a template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyEnd {
    Eof,
    Quote,
    Else,
    EndIf,
    EndFor,
}

impl BodyEnd {
    fn describe(self) -> &'static str {
        match self {
            BodyEnd::Eof => "end of template",
            BodyEnd::Quote => "closing quote",
            BodyEnd::Else => "%{else}",
            BodyEnd::EndIf => "%{endif}",
            BodyEnd::EndFor => "%{endfor}",
        }
    }
}

impl<'a> Parser<'a> {
    pub(super) fn parse_top_level(&mut self) -> Result<Vec<TemplatePart>, Diagnostic> {
        let (parts, end, span) = self.parse_body(false)?;
        match end {
            BodyEnd::Eof => Ok(parts),
            other => Err(Diagnostic::syntax(format!("unexpected {} without opening directive", other.describe()), span)),
        }
    }

    /// Parse a quoted string body; the opening quote is already consumed.
    pub(super) fn parse_quoted(&mut self, start: usize) -> Result<Expr, Diagnostic> {
        self.lexer.set_pos(start + 1);
        let (parts, end, span) = self.parse_body(true)?;
        if end != BodyEnd::Quote {
            return Err(Diagnostic::syntax(format!("unexpected {} inside string", end.describe()), span));
        }
        let span = Span::new(start, self.lexer.pos());
        match parts.as_slice() {
            [] => Ok(Expr::new(ExprKind::Literal(Value::from("")), span)),
            [TemplatePart::Literal(s)] => Ok(Expr::new(ExprKind::Literal(Value::from(s.as_str())), span)),
            _ => Ok(Expr::new(ExprKind::Template(parts), span)),
        }
    }

    fn flush_literal(&mut self, parts: &mut Vec<TemplatePart>, lit: &mut String, strip_trailing: bool) {
        let mut text = std::mem::take(lit);
        if std::mem::take(&mut self.strip_next) {
            text = text.trim_start().to_string();
        }
        if strip_trailing {
            text.truncate(text.trim_end().len());
        }
        if !text.is_empty() {
            parts.push(TemplatePart::Literal(text));
        }
    }

    /// Consume `}` or `~}`, recording whether whitespace after it is stripped.
    fn expect_close(&mut self, what: &str) -> Result<(), Diagnostic> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::RBrace => self.strip_next = false,
            TokenKind::TildeRBrace => self.strip_next = true,
            _ => return Err(unexpected(&token, what)),
        }
        Ok(())
    }

    fn parse_body(&mut self, quoted: bool) -> Result<(Vec<TemplatePart>, BodyEnd, Span), Diagnostic> {
        let src = self.lexer.src();
        let mut parts = Vec::new();
        let mut lit = String::new();

        loop {
            let pos = self.lexer.pos();
            let rest = src.get(pos..).unwrap_or("");
            let Some(ch) = rest.chars().next() else {
                if quoted {
                    return Err(Diagnostic::syntax("unterminated string", Span::empty(pos)));
                }
                self.flush_literal(&mut parts, &mut lit, false);
                return Ok((parts, BodyEnd::Eof, Span::empty(pos)));
            };

            if quoted {
                match ch {
                    '"' => {
                        self.lexer.set_pos(pos + 1);
                        self.flush_literal(&mut parts, &mut lit, false);
                        return Ok((parts, BodyEnd::Quote, Span::new(pos, pos + 1)));
                    }
                    '\\' => {
                        let (decoded, len) = decode_escape(rest, pos)?;
                        lit.push(decoded);
                        self.lexer.set_pos(pos + len);
                        continue;
                    }
                    '\n' => return Err(Diagnostic::syntax("unterminated string", Span::empty(pos))),
                    _ => {}
                }
            }

            if rest.starts_with("$${") || rest.starts_with("%%{") {
                lit.push_str(&rest[1..3]);
                self.lexer.set_pos(pos + 3);
                continue;
            }

            if rest.starts_with("${") {
                let strip = rest[2..].starts_with('~');
                self.flush_literal(&mut parts, &mut lit, strip);
                self.lexer.set_pos(pos + 2 + usize::from(strip));
                let expr = self.parse_expr()?;
                self.expect_close("'}' to close interpolation")?;
                parts.push(TemplatePart::Interpolation(expr));
                continue;
            }

            if rest.starts_with("%{") {
                let strip = rest[2..].starts_with('~');
                self.flush_literal(&mut parts, &mut lit, strip);
                self.lexer.set_pos(pos + 2 + usize::from(strip));
                if let Some(end) = self.parse_directive(&mut parts, quoted, pos)? {
                    return Ok((parts, end, Span::new(pos, self.lexer.pos())));
                }
                continue;
            }

            lit.push(ch);
            self.lexer.set_pos(pos + ch.len_utf8());
        }
    }

    /// Parse one directive. `if` and `for` consume through their closing
    /// directive and push a part; `else`, `endif` and `endfor` are returned
    /// to the enclosing body.
    fn parse_directive(
        &mut self,
        parts: &mut Vec<TemplatePart>,
        quoted: bool,
        start: usize,
    ) -> Result<Option<BodyEnd>, Diagnostic> {
        let keyword = self.advance()?;
        let name = match &keyword.kind {
            TokenKind::Ident(name) => name.clone(),
            _ => return Err(unexpected(&keyword, "template directive")),
        };
        match name.as_str() {
            "if" => {
                let cond = self.parse_expr()?;
                self.expect_close("'}' to close if directive")?;
                let (then, end, span) = self.parse_body(quoted)?;
                let (otherwise, end, span) = match end {
                    BodyEnd::Else => self.parse_body(quoted)?,
                    _ => (Vec::new(), end, span),
                };
                if end != BodyEnd::EndIf {
                    return Err(Diagnostic::syntax(
                        format!("expected %{{endif}} for if directive, found {}", end.describe()),
                        span.merge(Span::empty(start)),
                    ));
                }
                parts.push(TemplatePart::If { cond, then, otherwise });
                Ok(None)
            }
            "for" => {
                let first = self.expect_ident("loop variable name")?;
                let (key, value) = if self.eat(&TokenKind::Comma)?.is_some() {
                    (Some(first), self.expect_ident("loop value name")?)
                } else {
                    (None, first)
                };
                let kw = self.advance()?;
                if kw.kind != TokenKind::Ident("in".to_string()) {
                    return Err(unexpected(&kw, "'in'"));
                }
                let collection = self.parse_expr()?;
                self.expect_close("'}' to close for directive")?;
                let (body, end, span) = self.parse_body(quoted)?;
                if end != BodyEnd::EndFor {
                    return Err(Diagnostic::syntax(
                        format!("expected %{{endfor}} for for directive, found {}", end.describe()),
                        span.merge(Span::empty(start)),
                    ));
                }
                parts.push(TemplatePart::For { key, value, collection, body });
                Ok(None)
            }
            "else" | "endif" | "endfor" => {
                self.expect_close("'}' to close directive")?;
                Ok(Some(match name.as_str() {
                    "else" => BodyEnd::Else,
                    "endif" => BodyEnd::EndIf,
                    _ => BodyEnd::EndFor,
                }))
            }
            _ => Err(Diagnostic::syntax(format!("unknown template directive '{name}'"), keyword.span)),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, Diagnostic> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(unexpected(&token, what)),
        }
    }
}

/// Decode a backslash escape at the start of `rest`, returning the character
/// and the number of bytes consumed.
fn decode_escape(rest: &str, pos: usize) -> Result<(char, usize), Diagnostic> {
    let mut chars = rest.chars();
    chars.next();
    let Some(esc) = chars.next() else {
        return Err(Diagnostic::syntax("unterminated escape sequence", Span::new(pos, pos + 1)));
    };
    let simple = match esc {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '"' => Some('"'),
        '\\' => Some('\\'),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((c, 2));
    }
    let digits = match esc {
        'u' => 4,
        'U' => 8,
        other => {
            return Err(Diagnostic::syntax(
                format!("invalid escape sequence '\\{other}'"),
                Span::new(pos, pos + 1 + other.len_utf8()),
            ))
        }
    };
    let hex = rest.get(2..2 + digits).unwrap_or("");
    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|_| hex.len() == digits)
        .and_then(char::from_u32)
        .map(|c| (c, 2 + digits))
        .ok_or_else(|| Diagnostic::syntax("invalid unicode escape", Span::new(pos, pos + 2 + hex.len())))
}
