// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable/object resolution (§4.5 "Variable/object resolution"):
//! evaluates a statement's argument expressions against earlier statements
//! in the same process, with the `_args`/`_caller` fallbacks for template
//! sub-processes.

use ncd_core::{OwnedValue, Value, ValueArena};
use ncd_module::ObjectRef;
use ncd_parser::{DottedName, Expr};

use crate::error::EngineError;
use crate::process::ProcessInstance;
use crate::scheduler::EngineInner;

/// Evaluates every argument expression of a statement into `arena`,
/// resolving variable references backward from statement index `before` in
/// `process`.
pub(crate) fn eval_args<'a>(
    engine: &EngineInner,
    process: &ProcessInstance,
    before: usize,
    arena: &'a ValueArena<'a>,
    exprs: &[Expr],
) -> Result<Vec<Value<'a>>, EngineError> {
    exprs.iter().map(|expr| eval_expr(engine, process, before, arena, expr)).collect()
}

fn eval_expr<'a>(
    engine: &EngineInner,
    process: &ProcessInstance,
    before: usize,
    arena: &'a ValueArena<'a>,
    expr: &Expr,
) -> Result<Value<'a>, EngineError> {
    match expr {
        Expr::Str(bytes, _) => Ok(arena.str(bytes.clone())),
        Expr::Var(name) => resolve_dotted(engine, process, before, arena, name),
        Expr::List(items, _) => {
            let values = items.iter().map(|item| eval_expr(engine, process, before, arena, item)).collect::<Result<Vec<_>, _>>()?;
            Ok(arena.list(values))
        }
    }
}

/// Resolves one dotted reference (`a`, `a.b`, `_args.0`, `_caller.x`)
/// against `process`, backward from statement index `before`.
fn resolve_dotted<'a>(
    engine: &EngineInner,
    process: &ProcessInstance,
    before: usize,
    arena: &'a ValueArena<'a>,
    name: &DottedName,
) -> Result<Value<'a>, EngineError> {
    let head = name.first();
    let rest = &name.segments[1..];
    let not_found = || EngineError::VariableNotFound { process: process.name.clone(), name: name.to_dotted_string() };

    if let Some(value) = resolve_local(process, before, arena, head, rest) {
        return Ok(value);
    }

    if head == "_caller" {
        if let Some(caller) = process.caller {
            let resolved = engine.with_process(caller.process, |caller_process| resolve_caller(caller_process, caller.statement, arena, rest)).flatten();
            if let Some(value) = resolved {
                return Ok(value);
            }
        }
    }

    Err(not_found())
}

/// Resolution confined to a single process: a backward-visible label, or
/// the process's own `_args` namespace.
fn resolve_local<'a>(process: &ProcessInstance, before: usize, arena: &'a ValueArena<'a>, head: &str, rest: &[String]) -> Option<Value<'a>> {
    if head == "_args" {
        return resolve_args_namespace(&process.args, rest, arena);
    }
    let index = process.label_index(head, before)?;
    let module = process.statements[index].module.as_deref()?.as_object_ref();
    resolve_chain(module, rest, arena)
}

/// `_caller.x...`: `x` is resolved against the labels visible to the call
/// statement itself, in the caller's own process (§4.5 "Template call").
fn resolve_caller<'a>(caller_process: &ProcessInstance, caller_statement: usize, arena: &'a ValueArena<'a>, rest: &[String]) -> Option<Value<'a>> {
    let (head, tail) = rest.split_first()?;
    resolve_local(caller_process, caller_statement, arena, head, tail)
}

fn resolve_args_namespace<'a>(args: &[OwnedValue], rest: &[String], arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
    match rest.split_first() {
        None => Some(arena.list(args.iter().map(|v| arena.alloc_owned(v)).collect())),
        Some((index_segment, tail)) if tail.is_empty() => {
            let index: usize = index_segment.parse().ok()?;
            args.get(index).map(|v| arena.alloc_owned(v))
        }
        Some(_) => None,
    }
}

/// Walks `getobj` for every segment but the last, then `getvar`s the final
/// segment (`""` if there is no `rest` at all) on whatever object that
/// chain lands on (§4.4 `getvar`/`getobj`).
fn resolve_chain<'a>(start: &dyn ObjectRef, rest: &[String], arena: &'a ValueArena<'a>) -> Option<Value<'a>> {
    match rest.split_last() {
        None => start.getvar("", arena),
        Some((last, chain)) if chain.is_empty() => start.getvar(last, arena),
        Some((last, chain)) => {
            let obj = getobj_chain(start, chain)?;
            obj.getvar(last, arena)
        }
    }
}

fn getobj_chain(start: &dyn ObjectRef, chain: &[String]) -> Option<Box<dyn ObjectRef>> {
    let mut iter = chain.iter();
    let mut current = start.getobj(iter.next()?)?;
    for segment in iter {
        current = current.getobj(segment)?;
    }
    Some(current)
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
