// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors a module's `new()` can raise, corresponding to the `WrongArity`,
//! `WrongType`, and `ResourceError` rows of the error taxonomy (§7).

use ncd_core::ValueKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    WrongArity { expected: usize, got: usize },

    #[error("argument {index} ({name}): expected {expected}, got {got}")]
    WrongType { index: usize, name: &'static str, expected: ValueKind, got: ValueKind },

    #[error("argument {index} ({name}) may not contain embedded NULs")]
    EmbeddedNul { index: usize, name: &'static str },

    #[error("module type '{type_name}' is unknown")]
    UnknownType { type_name: String },

    #[error("resource error: {message}")]
    Resource { message: String },
}
