// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A fake [`ModuleRuntime`] for catalog unit tests, recording every
//! callback a module makes so tests can assert on it without a real
//! engine/scheduler.

use std::cell::RefCell;

use ncd_core::{OwnedValue, StringId, StringIndex, Value, ValueArena};
use ncd_runtime::{ProcessManager, Reactor};

use crate::error::ModuleError;
use crate::runtime::{ModuleRuntime, SubProcessHandle, TemplateListener};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Up,
    Down,
    Dead,
    Error(String),
    Log(String),
}

pub struct FakeRuntime {
    pub reactor: Reactor,
    pub process_manager: ProcessManager,
    strings: RefCell<StringIndex>,
    events: RefCell<Vec<Event>>,
    args: RefCell<Vec<OwnedValue>>,
    next_handle: RefCell<u64>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        let reactor = Reactor::new();
        let process_manager = ProcessManager::new(reactor.clone());
        Self {
            reactor,
            process_manager,
            strings: RefCell::new(StringIndex::new()),
            events: RefCell::new(Vec::new()),
            args: RefCell::new(Vec::new()),
            next_handle: RefCell::new(0),
        }
    }

    /// Sets the argument values `ModuleRuntime::args` returns on next call.
    pub fn set_args(&self, args: Vec<OwnedValue>) {
        *self.args.borrow_mut() = args;
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn was_up(&self) -> bool {
        self.events.borrow().iter().any(|e| *e == Event::Up)
    }

    pub fn was_dead(&self) -> bool {
        self.events.borrow().iter().any(|e| *e == Event::Dead)
    }
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRuntime for FakeRuntime {
    fn backend_up(&self) {
        self.events.borrow_mut().push(Event::Up);
    }

    fn backend_down(&self) {
        self.events.borrow_mut().push(Event::Down);
    }

    fn backend_dead(&self) {
        self.events.borrow_mut().push(Event::Dead);
    }

    fn backend_error(&self, message: String) {
        self.events.borrow_mut().push(Event::Error(message));
    }

    fn log(&self, message: &str) {
        self.events.borrow_mut().push(Event::Log(message.to_string()));
    }

    fn reactor(&self) -> &Reactor {
        &self.reactor
    }

    fn process_manager(&self) -> &ProcessManager {
        &self.process_manager
    }

    fn intern(&self, bytes: &[u8]) -> StringId {
        self.strings.borrow_mut().intern(bytes)
    }

    fn resolve(&self, id: StringId) -> Vec<u8> {
        self.strings.borrow().resolve(id).to_vec()
    }

    fn args<'a>(&self, arena: &'a ValueArena<'a>) -> Vec<Value<'a>> {
        self.args.borrow().iter().map(|v| arena.alloc_owned(v)).collect()
    }

    fn spawn_template(&self, _template: &str, _args: Vec<OwnedValue>, _listener: TemplateListener) -> Result<SubProcessHandle, ModuleError> {
        let mut next = self.next_handle.borrow_mut();
        let id = *next;
        *next += 1;
        Ok(SubProcessHandle(id))
    }

    fn stop_template(&self, _handle: SubProcessHandle) {}
}
