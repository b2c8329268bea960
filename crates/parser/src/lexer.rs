// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hand-written lexer for the configuration language.
//!
//! Recognizes identifiers, quoted strings with the standard C-style escape
//! table (`\n \t \r \\ \" \xHH`), the keywords `process`/`template`, and the
//! punctuation `{ } ( ) ; . , ->`. Whitespace is insignificant; `#` begins a
//! comment to end-of-line.

use crate::token::{is_ident_char, is_ident_start, Token, TokenKind};
use ncd_core::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("unexpected character '{ch}' at position {}", span.start)]
    UnexpectedChar { ch: char, span: Span },

    #[error("unterminated string literal starting at position {}", span.start)]
    UnterminatedString { span: Span },

    #[error("invalid escape sequence '\\{escape}' at position {}", span.start)]
    InvalidEscape { escape: String, span: Span },

    #[error("invalid \\xHH escape at position {}", span.start)]
    InvalidHexEscape { span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnexpectedChar { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::InvalidEscape { span, .. }
            | LexerError::InvalidHexEscape { span } => *span,
        }
    }
}

/// Tokenizes configuration source text.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, chars: input.char_indices().peekable() }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn pos(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len())
    }

    /// Tokenizes the entire input, always ending with a single [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let start = self.pos();
            let Some(ch) = self.peek_char() else {
                tokens.push(Token::new(TokenKind::Eof, Span::empty(start)));
                break;
            };
            let token = match ch {
                '{' => self.single(TokenKind::LBrace, start),
                '}' => self.single(TokenKind::RBrace, start),
                '(' => self.single(TokenKind::LParen, start),
                ')' => self.single(TokenKind::RParen, start),
                ';' => self.single(TokenKind::Semi, start),
                ',' => self.single(TokenKind::Comma, start),
                '.' => self.single(TokenKind::Dot, start),
                '-' => {
                    self.chars.next();
                    if self.peek_char() == Some('>') {
                        self.chars.next();
                        Token::new(TokenKind::Arrow, Span::new(start, start + 2))
                    } else {
                        return Err(LexerError::UnexpectedChar { ch: '-', span: Span::new(start, start + 1) });
                    }
                }
                '"' => self.read_string(start)?,
                // A bare digit run (`0`, `12`) also lexes as an identifier
                // token: dotted paths use numeric segments to index
                // `_args` (§4.5 "Template call", e.g. `_args.0`), and the
                // grammar has no separate integer-literal production.
                c if is_ident_start(c) || c.is_ascii_digit() => self.read_ident(start),
                c => return Err(LexerError::UnexpectedChar { ch: c, span: Span::new(start, start + c.len_utf8()) }),
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token {
        self.chars.next();
        Token::new(kind, Span::new(start, start + 1))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_ident(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(c) = self.peek_char() {
            if is_ident_char(c) {
                end += c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.input[start..end];
        let kind = match text {
            "process" => TokenKind::Process,
            "template" => TokenKind::Template,
            _ => TokenKind::Ident(text.to_string()),
        };
        Token::new(kind, Span::new(start, end))
    }

    fn read_string(&mut self, start: usize) -> Result<Token, LexerError> {
        self.chars.next(); // opening quote
        let mut bytes = Vec::new();
        loop {
            match self.peek_char() {
                None => return Err(LexerError::UnterminatedString { span: Span::new(start, self.pos()) }),
                Some('"') => {
                    self.chars.next();
                    break;
                }
                Some('\\') => {
                    let esc_start = self.pos();
                    self.chars.next();
                    bytes.push(self.read_escape(start, esc_start)?);
                }
                Some(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    self.chars.next();
                }
            }
        }
        Ok(Token::new(TokenKind::Str(bytes), Span::new(start, self.pos())))
    }

    fn read_escape(&mut self, string_start: usize, esc_start: usize) -> Result<u8, LexerError> {
        match self.peek_char() {
            Some('n') => {
                self.chars.next();
                Ok(b'\n')
            }
            Some('t') => {
                self.chars.next();
                Ok(b'\t')
            }
            Some('r') => {
                self.chars.next();
                Ok(b'\r')
            }
            Some('\\') => {
                self.chars.next();
                Ok(b'\\')
            }
            Some('"') => {
                self.chars.next();
                Ok(b'"')
            }
            Some('\'') => {
                self.chars.next();
                Ok(b'\'')
            }
            Some('x') => {
                self.chars.next();
                let h1 = self.peek_char().filter(char::is_ascii_hexdigit);
                if h1.is_some() {
                    self.chars.next();
                }
                let h2 = self.peek_char().filter(char::is_ascii_hexdigit);
                if h2.is_some() {
                    self.chars.next();
                }
                match (h1, h2) {
                    (Some(h1), Some(h2)) => {
                        let hex: String = [h1, h2].into_iter().collect();
                        u8::from_str_radix(&hex, 16)
                            .map_err(|_| LexerError::InvalidHexEscape { span: Span::new(esc_start, self.pos()) })
                    }
                    _ => Err(LexerError::InvalidHexEscape { span: Span::new(esc_start, self.pos()) }),
                }
            }
            Some(other) => {
                let len = other.len_utf8();
                self.chars.next();
                Err(LexerError::InvalidEscape { escape: other.to_string(), span: Span::new(esc_start, esc_start + 1 + len) })
            }
            None => Err(LexerError::UnterminatedString { span: Span::new(string_start, self.pos()) }),
        }
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
