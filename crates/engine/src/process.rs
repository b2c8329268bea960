// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process instance and statement instance (§3): the running realization
//! of a `ProcessDefinition`.

use std::rc::Rc;

use ncd_core::OwnedValue;
use ncd_module::Module;
use ncd_parser::ProcessDefinition;

use crate::state::{Direction, StatementState};

ncd_core::define_id! {
    /// Identifies a running [`ProcessInstance`]. Used only for logging and
    /// debug correlation (§3 [NEW]) — never for variable-resolution
    /// semantics, which is purely by label.
    pub struct ProcessInstanceId("proc");
}

/// Identifies the call site (process + statement) that instantiated a
/// template as a sub-process, backing `_args`/`_caller` resolution for the
/// sub-process's own statements (§4.5 "Template call").
#[derive(Debug, Clone, Copy)]
pub struct CallerRef {
    pub process: ProcessInstanceId,
    pub statement: usize,
}

/// Why a process is currently `Direction::Unwinding` (§4.5 "Rollback
/// trigger"): a recoverable `backend_down` on one Up statement (with its
/// index, exclusive bound of the teardown), or a full process termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwindReason {
    Down(usize),
    Terminate,
}

pub struct StatementInstance {
    pub state: StatementState,
    pub module: Option<Box<dyn Module>>,
    /// Resolved from `Statement::effective_label` once, at instance
    /// creation (§4.5 "Labels").
    pub label: String,
    /// The statement's evaluated argument values, retained past `new()`
    /// returning so `ModuleRuntime::args` can re-fetch them (§4.4).
    pub args: Vec<OwnedValue>,
}

impl StatementInstance {
    fn new(label: String) -> Self {
        Self { state: StatementState::Pending, module: None, label, args: Vec::new() }
    }
}

pub struct ProcessInstance {
    pub id: ProcessInstanceId,
    pub name: String,
    pub definition: Rc<ProcessDefinition>,
    pub statements: Vec<StatementInstance>,
    pub cursor: usize,
    pub direction: Direction,
    pub unwind_reason: Option<UnwindReason>,
    pub terminating: bool,
    /// The process's `_args` namespace (§4.5), empty unless started as a
    /// template sub-process with caller-supplied arguments.
    pub args: Vec<OwnedValue>,
    /// Set when this instance was spawned as a template sub-process
    /// (§4.5 "Template call"); `None` for top-level processes.
    pub caller: Option<CallerRef>,
    /// Set when the process aborts due to a statement's `backend_error`
    /// or an Advance-time evaluation failure (§4.6).
    pub aborted: Option<String>,
    /// Deduplicates the scheduler's pending-job enqueue: a process never
    /// has more than one outstanding step job at a time.
    pub(crate) step_scheduled: bool,
}

impl ProcessInstance {
    pub fn new(
        id: ProcessInstanceId,
        name: String,
        definition: Rc<ProcessDefinition>,
        args: Vec<OwnedValue>,
        caller: Option<CallerRef>,
    ) -> Self {
        let statements = definition.statements.iter().map(|stmt| StatementInstance::new(stmt.effective_label().to_string())).collect();
        Self {
            id,
            name,
            definition,
            statements,
            cursor: 0,
            direction: Direction::Advancing,
            unwind_reason: None,
            terminating: false,
            args,
            caller,
            aborted: None,
            step_scheduled: false,
        }
    }

    /// §3 invariant: the process is quiescent once the cursor has advanced
    /// past the last statement while still advancing.
    pub fn is_quiescent(&self) -> bool {
        self.direction == Direction::Advancing && self.cursor >= self.statements.len()
    }

    /// Backward-visibility label lookup (§4.5 "Labels"): the most recent
    /// statement labeled `label` strictly before index `before`.
    pub fn label_index(&self, label: &str, before: usize) -> Option<usize> {
        let end = before.min(self.statements.len());
        (0..end).rev().find(|&i| self.statements[i].label == label)
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
