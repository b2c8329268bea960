// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `block()` — an in-memory toggle module with no output, used by
//! scenario 5 to drive `backend_down`/`backend_up` from a test (§4.4).

use std::cell::RefCell;
use std::rc::Rc;

use ncd_core::{Value, ValueArena};

use crate::error::ModuleError;
use crate::runtime::{check_args, ArgSpec, Module, ModuleRuntime, ObjectRef};

const ARGS: &[ArgSpec] = &[];

pub struct Block {
    blocked: Rc<RefCell<bool>>,
}

impl ObjectRef for Block {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        None
    }
}

impl Module for Block {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        ctx.backend_dead();
    }
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(ARGS, args)?;
    ctx.backend_up();
    Ok(Box::new(Block { blocked: Rc::new(RefCell::new(false)) }))
}

/// A test-only handle onto a running [`Block`] instance, letting a test
/// flip its up/down state without going through the parser/scheduler.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct BlockHandle {
    blocked: Rc<RefCell<bool>>,
    ctx: Rc<dyn ModuleRuntime>,
}

#[cfg(any(test, feature = "test-support"))]
impl BlockHandle {
    pub fn set_blocked(&self, blocked: bool) {
        let mut current = self.blocked.borrow_mut();
        if *current == blocked {
            return;
        }
        *current = blocked;
        drop(current);
        if blocked {
            self.ctx.backend_down();
        } else {
            self.ctx.backend_up();
        }
    }

    pub fn is_blocked(&self) -> bool {
        *self.blocked.borrow()
    }
}

/// Constructs a `block()` module alongside a [`BlockHandle`] a test can
/// drive directly, bypassing the registry (which only returns `dyn Module`).
#[cfg(any(test, feature = "test-support"))]
pub fn new_with_handle(ctx: Rc<dyn ModuleRuntime>) -> (Box<dyn Module>, BlockHandle) {
    ctx.backend_up();
    let blocked = Rc::new(RefCell::new(false));
    let handle = BlockHandle { blocked: blocked.clone(), ctx };
    (Box::new(Block { blocked }), handle)
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
