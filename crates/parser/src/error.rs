// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser error types and diagnostic rendering.

use crate::lexer::LexerError;
use crate::token::{Span, TokenKind};
use ncd_core::span::{context_snippet, diagnostic_context};
use thiserror::Error;

/// Parser errors for the configuration language (§4.3, §7 "ParseError").
///
/// Use [`ParseError::diagnostic`] to generate a rustc-style snippet showing
/// where the error occurred, matching the "line/column-annotated" contract
/// the spec requires of parser errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("unexpected token {found} at position {}, expected {expected}", span.start)]
    UnexpectedToken { found: TokenKind, expected: String, span: Span },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("duplicate process name '{name}'")]
    DuplicateProcessName { name: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lexer(e) => Some(e.span()),
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::DuplicateProcessName { span, .. } => Some(*span),
        }
    }

    /// Generate a context snippet showing where the error occurred.
    pub fn context(&self, input: &str, context_chars: usize) -> Option<String> {
        Some(context_snippet(input, self.span()?, context_chars))
    }

    /// Generate a rich diagnostic with line/column info, or `None` if the
    /// error has no associated span (e.g. unexpected end of input).
    pub fn diagnostic(&self, input: &str) -> Option<String> {
        Some(diagnostic_context(input, self.span()?, &self.to_string()))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
