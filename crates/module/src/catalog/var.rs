// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `var(value)` — immediately up, `getvar("")` returns its one argument
//! (§4.4). Used by scenario 2.

use std::rc::Rc;

use ncd_core::{OwnedValue, Value, ValueArena, ValueKind};

use crate::error::ModuleError;
use crate::runtime::{check_args, ArgSpec, Module, ModuleRuntime, ObjectRef};

const ARGS: &[ArgSpec] = &[ArgSpec::new("value", ValueKind::Str)];

pub struct Var {
    value: OwnedValue,
}

impl ObjectRef for Var {
    fn getvar<'a>(&self, name: &str, arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        if name.is_empty() {
            Some(arena.alloc_owned(&self.value))
        } else {
            None
        }
    }
}

impl Module for Var {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        ctx.backend_dead();
    }
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(ARGS, args)?;
    let value = OwnedValue::from(args[0]);
    ctx.backend_up();
    Ok(Box::new(Var { value }))
}

#[cfg(test)]
#[path = "var_tests.rs"]
mod tests;
