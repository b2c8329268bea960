// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bundled process-wide singletons (§5 [NEW] "Context"): the Reactor,
//! the Process Manager, the String Index, the static symbol table, and the
//! module registry, all built once at program start and threaded by
//! reference through every scheduler step and module call — the
//! explicit-context-handle redesign spec.md §9 already calls for, so there
//! is nothing left to decide but naming the struct.

use std::cell::RefCell;

use ncd_core::{StringId, StringIndex, Symbols};
use ncd_module::Registry;
use ncd_runtime::{ProcessManager, Reactor};

pub struct Context {
    pub reactor: Reactor,
    pub process_manager: ProcessManager,
    pub registry: Registry,
    pub symbols: Symbols,
    strings: RefCell<StringIndex>,
}

impl Context {
    pub fn new(registry: Registry) -> Self {
        let reactor = Reactor::new();
        let process_manager = ProcessManager::new(reactor.clone());
        let mut strings = StringIndex::new();
        let symbols = Symbols::init(&mut strings);
        Self { reactor, process_manager, registry, symbols, strings: RefCell::new(strings) }
    }

    pub fn intern(&self, bytes: &[u8]) -> StringId {
        self.strings.borrow_mut().intern(bytes)
    }

    pub fn resolve(&self, id: StringId) -> Vec<u8> {
        self.strings.borrow().resolve(id).to_vec()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
