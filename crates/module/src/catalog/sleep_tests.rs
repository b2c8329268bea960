// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::rc::Rc;

use ncd_core::ValueArena;

use super::*;
use crate::test_support::{Event, FakeRuntime};

#[test]
fn sleep_comes_up_after_its_timer_fires() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"0")];

    let _module = new(&args, ctx.clone()).unwrap();
    assert!(ctx.events().is_empty());

    ctx.reactor.run_once();
    assert_eq!(ctx.events(), vec![Event::Up]);
}

#[test]
fn sleep_die_cancels_the_timer_and_reports_dead_without_firing() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"1000")];

    let mut module = new(&args, ctx.clone()).unwrap();
    module.die(ctx.clone());
    ctx.reactor.run_once();

    assert_eq!(ctx.events(), vec![Event::Dead]);
}

#[test]
fn sleep_rejects_non_numeric_duration() {
    let arena = ValueArena::new();
    let ctx = Rc::new(FakeRuntime::new());
    let args = [arena.str(*b"soon")];

    let err = new(&args, ctx).unwrap_err();

    assert!(matches!(err, ModuleError::Resource { .. }));
}
