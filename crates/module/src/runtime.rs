// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Module Runtime Interface (§4.4): the contract by which modules
//! communicate with the engine.
//!
//! Two traits meet here. [`ModuleRuntime`] is implemented by `ncd-engine`
//! and handed to every module call — it bundles the engine callbacks
//! (`backend_up`/`backend_down`/`backend_dead`/`backend_error`, logging,
//! and the `get_reactor`/`get_process_manager`/`get_string_index`
//! accessors) so `ncd-module` never has to depend on `ncd-engine` (which
//! depends on `ncd-module`). [`Module`] and [`ObjectRef`] are implemented
//! by each catalog entry.

use std::rc::Rc;

use ncd_core::{OwnedValue, StringId, Value, ValueArena, ValueKind};
use ncd_runtime::{ProcessManager, Reactor};

use crate::error::ModuleError;

/// A read-only reference a statement exposes for `a.b` sub-object lookups
/// (§4.4 `getobj`). Both [`Module`] and the values `getobj` returns
/// implement this.
pub trait ObjectRef {
    /// `getvar`: given a variable name local to this reference (typically
    /// `""` for the primary result), materialize the value into `arena`.
    fn getvar<'a>(&self, name: &str, arena: &'a ValueArena<'a>) -> Option<Value<'a>>;

    /// `getobj`: given a sub-object name, return a lightweight reference
    /// the caller can `getvar`/`getobj` on. Objects without sub-objects
    /// report `None`.
    fn getobj(&self, _name: &str) -> Option<Box<dyn ObjectRef>> {
        None
    }
}

/// One argument declaration in a module's `const ARGS: &[ArgSpec]` (§4.4
/// "Argument type declarations"), used by the engine's `Advance` step to
/// raise `WrongArity`/`WrongType` before calling `new`.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    /// If true, a string argument containing an embedded NUL is rejected.
    pub no_null: bool,
}

impl ArgSpec {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind, no_null: false }
    }

    pub const fn no_null(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind, no_null: true }
    }
}

/// Validates `args` against `spec`, the shared entry point every catalog
/// module's `new()` calls first (§4.4, §7 `WrongArity`/`WrongType`).
pub fn check_args(spec: &[ArgSpec], args: &[Value<'_>]) -> Result<(), ModuleError> {
    if args.len() != spec.len() {
        return Err(ModuleError::WrongArity { expected: spec.len(), got: args.len() });
    }
    for (index, (value, decl)) in args.iter().zip(spec.iter()).enumerate() {
        let kind = value.kind();
        if kind != decl.kind {
            return Err(ModuleError::WrongType { index, name: decl.name, expected: decl.kind, got: kind });
        }
        if decl.no_null {
            if let Some(bytes) = value.as_bytes() {
                if bytes.contains(&0) {
                    return Err(ModuleError::EmbeddedNul { index, name: decl.name });
                }
            }
        }
    }
    Ok(())
}

/// What happens when a `call`-instantiated template fails to come up
/// (§9 Open Question c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnFailure {
    /// Fatal to the calling statement: surfaces as `backend_error`.
    #[default]
    Error,
    /// Recoverable: surfaces as `backend_down`, letting the process retry.
    Down,
}

/// A handle to a sub-process instantiated by `call` (§4.5 "Template call").
/// Opaque to modules; only used to stop the sub-process via
/// [`ModuleRuntime::stop_template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubProcessHandle(pub u64);

/// Listener callbacks a module registers when asking the engine to
/// instantiate a template as a sub-process (§4.5 "Template call").
pub struct TemplateListener {
    pub on_up: Box<dyn FnMut()>,
    pub on_down: Box<dyn FnMut()>,
    pub on_failed: Box<dyn FnMut(String)>,
}

/// The engine-provided callback surface every module call receives.
///
/// Implemented by `ncd-engine`'s scheduler context and always handed to
/// modules as `Rc<dyn ModuleRuntime>` rather than a borrowed reference: a
/// module that needs to act later (a sleep timer firing, a child process
/// exiting) clones the `Rc` into its `'static` reactor/process-manager
/// callback, the same pattern the `Reactor` itself uses for its own
/// callbacks (§4.1). All mutating calls (`backend_*`, `spawn_template`,
/// `stop_template`) are reentrant-safe: the engine trampolines them through
/// the Reactor's pending-job queue (§4.1, §5 "no re-entry") rather than
/// acting on the caller's stack frame.
pub trait ModuleRuntime {
    /// Starting → Up. Unblocks the cursor to advance.
    fn backend_up(&self);

    /// Up → Starting: requests a rollback of successors, then a re-start
    /// of this statement.
    fn backend_down(&self);

    /// Dying → Forgotten. The module is freed after this call returns.
    fn backend_dead(&self);

    /// Starting-time failure; equivalent to an immediate `backend_dead`
    /// with a process-abort marker.
    fn backend_error(&self, message: String);

    /// Structured log line against this statement's channel.
    fn log(&self, message: &str);

    fn reactor(&self) -> &Reactor;

    fn process_manager(&self) -> &ProcessManager;

    /// Interns `bytes` into the process-wide String Index, returning its ID.
    fn intern(&self, bytes: &[u8]) -> StringId;

    /// Resolves a previously-interned [`StringId`] back to its bytes.
    fn resolve(&self, id: StringId) -> Vec<u8>;

    /// Re-fetches this statement's evaluated argument values, materialized
    /// into `arena`. Used by modules that re-resolve after construction
    /// (e.g. `alias`, `ondemand`) — the reference catalog does not need it
    /// but the accessor is part of the engine contract (§4.4).
    fn args<'a>(&self, arena: &'a ValueArena<'a>) -> Vec<Value<'a>>;

    /// Requests the engine instantiate `template` as a sub-process whose
    /// `_caller` is this statement's process and whose `_args` is `args`
    /// (§4.5 "Template call"). `listener` is driven as the sub-process
    /// transitions; its up/down is mirrored to whatever this module does
    /// with it (typically re-emitting `backend_up`/`backend_down` itself).
    fn spawn_template(&self, template: &str, args: Vec<OwnedValue>, listener: TemplateListener) -> Result<SubProcessHandle, ModuleError>;

    /// Tears down a sub-process started with `spawn_template`.
    fn stop_template(&self, handle: SubProcessHandle);
}

/// A Module (§4.4): a typed, stateful piece of functionality backing one
/// statement. `new`/`die` are free functions rather than trait methods
/// returning `Self` so the type stays object-safe; the registry stores a
/// factory closure per module type (see [`crate::registry::Registry`]).
pub trait Module: ObjectRef {
    /// Request termination (Up or Starting → Dying). Must eventually call
    /// [`ModuleRuntime::backend_dead`].
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>);

    /// Engine hint that no successor statements remain alive; the module
    /// may release large buffers. Optional — the default does nothing.
    fn clean(&mut self) {}

    /// Upcasts to the `ObjectRef` supertrait view variable resolution
    /// (§4.5) needs — `dyn Module` and `dyn ObjectRef` are distinct trait
    /// objects, so the engine can't coerce one to the other on its own.
    fn as_object_ref(&self) -> &dyn ObjectRef {
        self
    }
}

/// A module type's constructor: evaluate the statement's argument values,
/// allocate and return module-private state, calling `backend_up` or
/// `backend_error` on `ctx` before or after returning.
pub type ModuleFactory = fn(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError>;

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
