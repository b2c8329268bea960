// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `exec(argv...)` — runs a child process via `ncd-runtime`'s Process
//! Manager (§4.2, §4.4); up on successful exit, `backend_error` on nonzero
//! exit unless the statement passes a trailing `{ignore_status: "true"}`
//! options map.

use std::rc::Rc;

use ncd_core::{Value, ValueArena, ValueKind};
use ncd_runtime::ProcessHandle;
use nix::sys::signal::Signal;

use crate::error::ModuleError;
use crate::runtime::{Module, ModuleRuntime, ObjectRef};

pub struct Exec {
    handle: Option<ProcessHandle>,
}

impl ObjectRef for Exec {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
        None
    }
}

impl Module for Exec {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        if let Some(handle) = self.handle.take() {
            let _ = ctx.process_manager().signal(handle, Signal::SIGTERM);
            ctx.process_manager().free(handle);
        }
        ctx.backend_dead();
    }
}

/// Splits a trailing options map (currently only `ignore_status`) off the
/// argv list, if the caller passed one.
fn split_options<'a>(args: &'a [Value<'a>]) -> (&'a [Value<'a>], bool) {
    let Some(last) = args.last() else {
        return (args, false);
    };
    if last.kind() != ValueKind::Map {
        return (args, false);
    }
    let ignore_status = last.as_map().unwrap_or(&[]).iter().any(|(k, v)| k.as_str() == Some("ignore_status") && v.as_str() == Some("true"));
    (&args[..args.len() - 1], ignore_status)
}

pub fn new(args: &[Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    let (argv_values, ignore_status) = split_options(args);
    if argv_values.is_empty() {
        return Err(ModuleError::WrongArity { expected: 1, got: 0 });
    }

    let mut argv = Vec::with_capacity(argv_values.len());
    for (index, value) in argv_values.iter().enumerate() {
        let kind = value.kind();
        if kind != ValueKind::Str {
            return Err(ModuleError::WrongType { index, name: "argv", expected: ValueKind::Str, got: kind });
        }
        let text = value.as_str().ok_or(ModuleError::EmbeddedNul { index, name: "argv" })?;
        argv.push(text.to_string());
    }

    let executable = argv[0].clone();
    let exe_for_spawn = executable.clone();
    let rest = argv[1..].to_vec();

    let up_ctx = ctx.clone();
    let err_ctx = ctx.clone();
    let handle = ctx
        .process_manager()
        .spawn(&exe_for_spawn, &rest, None, move |status| {
            if status.is_success() || ignore_status {
                up_ctx.backend_up();
            } else {
                err_ctx.backend_error(format!("'{executable}' exited with status {:?}", status.code));
            }
        })
        .map_err(|source| ModuleError::Resource { message: source.to_string() })?;

    Ok(Box::new(Exec { handle: Some(handle) }))
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
