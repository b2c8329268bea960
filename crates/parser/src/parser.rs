// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser that transforms tokens into the configuration
//! [`Program`] AST (§4.3 grammar).

use crate::ast::{DottedName, Expr, ProcessDefinition, Program, Statement};
use crate::error::ParseError;
use crate::token::{Span, Token, TokenKind};
use std::collections::HashSet;

/// Recursive-descent parser over a pre-lexed token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Grammar: `program := (process | template)*`
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let start = self.current_span_start();
        let mut processes = Vec::new();
        let mut seen = HashSet::new();

        while !self.at_eof() {
            let def = self.parse_process_definition()?;
            if !seen.insert(def.name.clone()) {
                return Err(ParseError::DuplicateProcessName { name: def.name.clone(), span: def.span });
            }
            processes.push(def);
        }

        let end = self.current_span_end();
        Ok(Program { processes, span: Span::new(start, end.max(start)) })
    }

    /// Grammar: `process := 'process' IDENT '{' stmt* '}'` (or `template`).
    fn parse_process_definition(&mut self) -> Result<ProcessDefinition, ParseError> {
        let start = self.current_span_start();
        let is_template = match self.peek_kind() {
            Some(TokenKind::Process) => {
                self.advance();
                false
            }
            Some(TokenKind::Template) => {
                self.advance();
                true
            }
            _ => return Err(self.unexpected_token("'process' or 'template'")),
        };

        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut statements = Vec::new();
        while !matches!(self.peek_kind(), Some(TokenKind::RBrace)) {
            if self.at_eof() {
                return Err(self.unexpected_token("'}'"));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;

        let end = self.current_span_end();
        Ok(ProcessDefinition { name, is_template, statements, span: Span::new(start, end) })
    }

    /// Grammar: `stmt := (dotted '->')? dotted '(' args? ')' (';' | ';' label)`
    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span_start();
        let first = self.parse_dotted()?;

        let (object_prefix, method) = if matches!(self.peek_kind(), Some(TokenKind::Arrow)) {
            self.advance();
            (Some(first), self.parse_dotted()?)
        } else {
            (None, first)
        };

        self.expect(TokenKind::LParen)?;
        let args = if matches!(self.peek_kind(), Some(TokenKind::RParen)) { Vec::new() } else { self.parse_args()? };
        self.expect(TokenKind::RParen)?;

        let label = match self.peek_kind() {
            Some(TokenKind::Ident(_)) => Some(self.expect_ident()?),
            _ => None,
        };

        self.expect(TokenKind::Semi)?;

        let end = self.current_span_end();
        Ok(Statement { object_prefix, method, args, label, span: Span::new(start, end) })
    }

    /// Grammar: `dotted := IDENT ('.' IDENT)*`
    fn parse_dotted(&mut self) -> Result<DottedName, ParseError> {
        let start = self.current_span_start();
        let mut segments = vec![self.expect_ident()?];
        while matches!(self.peek_kind(), Some(TokenKind::Dot)) {
            self.advance();
            segments.push(self.expect_ident()?);
        }
        let end = self.current_span_end();
        Ok(DottedName { segments, span: Span::new(start, end) })
    }

    /// Grammar: `args := expr (',' expr)*`
    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![self.parse_expr()?];
        while matches!(self.peek_kind(), Some(TokenKind::Comma)) {
            self.advance();
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    /// Grammar: `expr := STRING | dotted | '{' args? '}'`
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Str(_)) => {
                let start = self.current_span_start();
                let Some(Token { kind: TokenKind::Str(bytes), span }) = self.advance().cloned() else {
                    unreachable!("peeked Str token")
                };
                let _ = start;
                Ok(Expr::Str(bytes, span))
            }
            Some(TokenKind::LBrace) => {
                let start = self.current_span_start();
                self.advance();
                let items = if matches!(self.peek_kind(), Some(TokenKind::RBrace)) { Vec::new() } else { self.parse_args()? };
                self.expect(TokenKind::RBrace)?;
                let end = self.current_span_end();
                Ok(Expr::List(items, Span::new(start, end)))
            }
            Some(TokenKind::Ident(_)) => Ok(Expr::Var(self.parse_dotted()?)),
            _ => Err(self.unexpected_token("string literal, variable reference, or '{'")),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::Ident(name)) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected_token("identifier")),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        match self.peek_kind() {
            Some(k) if *k == kind => match self.advance() {
                Some(token) => Ok(token),
                None => unreachable!("peek_kind verified token exists"),
            },
            _ => Err(self.unexpected_token(&kind.to_string())),
        }
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    #[inline]
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    #[inline]
    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    #[inline]
    fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), Some(TokenKind::Eof) | None)
    }

    fn current_span_start(&self) -> usize {
        self.peek().map(|t| t.span.start).unwrap_or(0)
    }

    fn current_span_end(&self) -> usize {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.end
        } else {
            self.current_span_start()
        }
    }

    fn unexpected_token(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) if !matches!(token.kind, TokenKind::Eof) => {
                ParseError::UnexpectedToken { found: token.kind.clone(), expected: expected.to_string(), span: token.span }
            }
            _ => ParseError::UnexpectedEof { expected: expected.to_string() },
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
