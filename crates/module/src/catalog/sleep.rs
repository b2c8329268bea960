// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sleep(ms)` — a one-shot Reactor timer (§4.4). Used by scenario 6.

use std::rc::Rc;
use std::time::Duration;

use ncd_core::{Value, ValueArena, ValueKind};
use ncd_runtime::TimerId;

use crate::error::ModuleError;
use crate::runtime::{check_args, ArgSpec, Module, ModuleRuntime, ObjectRef};

const ARGS: &[ArgSpec] = &[ArgSpec::new("ms", ValueKind::Str)];

pub struct Sleep {
    timer: Option<TimerId>,
}

impl ObjectRef for Sleep {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        None
    }
}

impl Module for Sleep {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        if let Some(timer) = self.timer.take() {
            ctx.reactor().cancel_timer(timer);
        }
        ctx.backend_dead();
    }
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(ARGS, args)?;
    let text = args[0].as_str().ok_or_else(|| ModuleError::Resource { message: "ms argument is not valid UTF-8".to_string() })?;
    let ms: u64 = text.parse().map_err(|_| ModuleError::Resource { message: format!("'{text}' is not a valid duration in milliseconds") })?;

    let on_fire = ctx.clone();
    let timer = ctx.reactor().set_timeout(Duration::from_millis(ms), move || on_fire.backend_up());

    Ok(Box::new(Sleep { timer: Some(timer) }))
}

#[cfg(test)]
#[path = "sleep_tests.rs"]
mod tests;
