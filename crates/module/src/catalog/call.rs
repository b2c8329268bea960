// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `call(template_name, args_list, [on_failure])` — instantiates a named
//! template as a sub-process and mirrors its lifecycle (§4.4, §4.5
//! "Template call"). The optional third argument selects the retry policy
//! from §9 Open Question (c): `"error"` (default) surfaces `backend_error`
//! on sub-process failure, `"down"` surfaces `backend_down` instead.

use std::rc::Rc;

use ncd_core::{OwnedValue, Value, ValueArena, ValueKind};

use crate::error::ModuleError;
use crate::runtime::{Module, ModuleRuntime, ObjectRef, OnFailure, SubProcessHandle, TemplateListener};

pub struct Call {
    handle: Option<SubProcessHandle>,
}

impl ObjectRef for Call {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        // The reference catalog does not expose the sub-process's own
        // labeled statements back through `call` — a production `call`
        // would forward `getobj` to the sub-process context.
        None
    }
}

impl Module for Call {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        if let Some(handle) = self.handle.take() {
            ctx.stop_template(handle);
        }
        ctx.backend_dead();
    }
}

fn parse_on_failure(value: Value<'_>, index: usize) -> Result<OnFailure, ModuleError> {
    let kind = value.kind();
    if kind != ValueKind::Str {
        return Err(ModuleError::WrongType { index, name: "on_failure", expected: ValueKind::Str, got: kind });
    }
    match value.as_str() {
        Some("error") => Ok(OnFailure::Error),
        Some("down") => Ok(OnFailure::Down),
        Some(other) => Err(ModuleError::Resource { message: format!("unknown on_failure policy '{other}'") }),
        None => Err(ModuleError::Resource { message: "on_failure policy is not valid UTF-8".to_string() }),
    }
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    if args.len() != 2 && args.len() != 3 {
        return Err(ModuleError::WrongArity { expected: 2, got: args.len() });
    }

    let template_kind = args[0].kind();
    if template_kind != ValueKind::Str {
        return Err(ModuleError::WrongType { index: 0, name: "template_name", expected: ValueKind::Str, got: template_kind });
    }
    let args_list_kind = args[1].kind();
    if args_list_kind != ValueKind::List {
        return Err(ModuleError::WrongType { index: 1, name: "args_list", expected: ValueKind::List, got: args_list_kind });
    }
    let on_failure = match args.get(2) {
        Some(value) => parse_on_failure(*value, 2)?,
        None => OnFailure::Error,
    };

    let template_name = args[0].as_str().ok_or_else(|| ModuleError::Resource { message: "template_name is not valid UTF-8".to_string() })?.to_string();
    let items: Vec<OwnedValue> = args[1].as_list().unwrap_or(&[]).iter().map(|v| OwnedValue::from(*v)).collect();

    let up_ctx = ctx.clone();
    let down_ctx = ctx.clone();
    let failed_ctx = ctx.clone();
    let listener = TemplateListener {
        on_up: Box::new(move || up_ctx.backend_up()),
        on_down: Box::new(move || down_ctx.backend_down()),
        on_failed: Box::new(move |message| match on_failure {
            OnFailure::Error => failed_ctx.backend_error(message),
            OnFailure::Down => failed_ctx.backend_down(),
        }),
    };

    let handle = ctx.spawn_template(&template_name, items, listener)?;
    Ok(Box::new(Call { handle: Some(handle) }))
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;
