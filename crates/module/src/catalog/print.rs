// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `print(value)` — logs its argument and comes straight up (§4.4).

use std::rc::Rc;

use ncd_core::{OwnedValue, Value, ValueArena, ValueKind};

use crate::error::ModuleError;
use crate::runtime::{check_args, ArgSpec, Module, ModuleRuntime, ObjectRef};

const ARGS: &[ArgSpec] = &[ArgSpec::new("value", ValueKind::Str)];

struct Print {
    value: OwnedValue,
}

impl ObjectRef for Print {
    fn getvar<'a>(&self, name: &str, arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        if name.is_empty() {
            Some(arena.alloc_owned(&self.value))
        } else {
            None
        }
    }
}

impl Module for Print {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        ctx.backend_dead();
    }
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(ARGS, args)?;
    let value = args[0];
    let text = value.as_str().unwrap_or("<binary>");
    tracing::info!(%text, "print");
    ctx.backend_up();
    Ok(Box::new(Print { value: OwnedValue::from(value) }))
}

#[cfg(test)]
#[path = "print_tests.rs"]
mod tests;
