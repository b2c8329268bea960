// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's slice of the §7 error taxonomy: everything that can abort
//! a process rather than a single statement's module-local retry. Parser
//! and module-argument errors are `ncd_parser::ParseError` /
//! `ncd_module::ModuleError` respectively and are wrapped here rather than
//! re-declared.

use ncd_module::ModuleError;
use ncd_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Load-time failure: the config text itself failed to parse (§7
    /// `ParseError`).
    #[error("config parse error: {0}")]
    Parse(#[from] ParseError),

    /// `Engine::load` found two process definitions with the same name.
    /// Dead code in practice — `ncd-parser` already rejects this at parse
    /// time — kept so `Engine::load`'s contract is self-contained if that
    /// invariant ever moves.
    #[error("duplicate process name '{name}'")]
    DuplicateProcessName { name: String },

    /// `Engine::start`/`call` named a process that isn't in the loaded
    /// config.
    #[error("no such process '{name}'")]
    UnknownProcess { name: String },

    /// `Engine::start` named a process defined with `template`, or `call`
    /// named one defined with `process`.
    #[error("process '{name}' is {found}, expected {expected}")]
    WrongProcessKind { name: String, found: &'static str, expected: &'static str },

    /// §4.5 "Variable/object resolution": a dotted reference didn't
    /// resolve to any earlier statement, `_caller`, or `_args` entry.
    #[error("variable '{name}' not found in process '{process}'")]
    VariableNotFound { process: String, name: String },

    /// §4.4 "Argument type declarations": surfaced via the statement's own
    /// `backend_error` in normal operation, but also raised directly by
    /// `Advance` when it can check arity ahead of calling `new`.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// Registry lookup failure at `Advance` time (§7 `ModuleTypeUnknown`).
    #[error("module type '{type_name}' is unknown")]
    ModuleTypeUnknown { type_name: String },

    /// §7 `InternalInvariant`: a debug assertion the scheduler relies on
    /// (monotone prefix, unique active, cursor in bounds) was violated.
    /// Reaching this is always a defect in the scheduler itself, never a
    /// consequence of a bad config.
    #[error("internal scheduler invariant violated: {detail}")]
    InternalInvariant { detail: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
