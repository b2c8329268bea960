// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `list(v1, v2, ...)` — a variadic module exposing each argument
//! positionally via `getobj("0")`, `getobj("1")`, ... (§4.4). This backs
//! `_args.0`-style lookups in scenario 4.

use std::rc::Rc;

use ncd_core::{OwnedValue, Value, ValueArena};

use crate::error::ModuleError;
use crate::runtime::{Module, ModuleRuntime, ObjectRef};

pub struct List {
    items: Vec<OwnedValue>,
}

/// A lightweight, read-only reference to one positional element of a
/// [`List`], returned by `List::getobj`.
struct Element(OwnedValue);

impl ObjectRef for Element {
    fn getvar<'a>(&self, name: &str, arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        if name.is_empty() {
            Some(arena.alloc_owned(&self.0))
        } else {
            None
        }
    }
}

impl ObjectRef for List {
    fn getvar<'a>(&self, name: &str, arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        if name.is_empty() {
            let items: Vec<Value<'a>> = self.items.iter().map(|v| arena.alloc_owned(v)).collect();
            Some(arena.list(items))
        } else {
            None
        }
    }

    fn getobj(&self, name: &str) -> Option<Box<dyn ObjectRef>> {
        let index: usize = name.parse().ok()?;
        self.items.get(index).map(|v| Box::new(Element(v.clone())) as Box<dyn ObjectRef>)
    }
}

impl Module for List {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        ctx.backend_dead();
    }
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    let items = args.iter().map(|v| OwnedValue::from(*v)).collect();
    ctx.backend_up();
    Ok(Box::new(List { items }))
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
