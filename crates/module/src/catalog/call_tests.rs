// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::rc::Rc;

use ncd_core::ValueArena;

use super::*;
use crate::test_support::FakeRuntime;

#[test]
fn call_spawns_the_named_template_with_default_policy() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"worker"), arena.list(vec![arena.str(*b"a")])];

    let module = new(&args, ctx);

    assert!(module.is_ok());
}

#[test]
fn call_accepts_optional_on_failure_policy() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"worker"), arena.list(vec![]), arena.str(*b"down")];

    assert!(new(&args, ctx).is_ok());
}

#[test]
fn call_rejects_unknown_on_failure_policy() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"worker"), arena.list(vec![]), arena.str(*b"retry")];

    let err = new(&args, ctx).unwrap_err();

    assert!(matches!(err, ModuleError::Resource { .. }));
}

#[test]
fn call_rejects_wrong_arity() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"worker")];

    let err = new(&args, ctx).unwrap_err();

    assert_eq!(err, ModuleError::WrongArity { expected: 2, got: 1 });
}

#[test]
fn call_rejects_non_list_args_list() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"worker"), arena.str(*b"not-a-list")];

    let err = new(&args, ctx).unwrap_err();

    assert_eq!(err, ModuleError::WrongType { index: 1, name: "args_list", expected: ValueKind::List, got: ValueKind::Str });
}

#[test]
fn call_die_stops_the_sub_process_and_reports_dead() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"worker"), arena.list(vec![])];
    let mut module = new(&args, ctx.clone()).unwrap();

    module.die(ctx.clone());

    assert!(ctx.was_dead());
}
