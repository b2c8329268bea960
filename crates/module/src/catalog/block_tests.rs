// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::rc::Rc;

use ncd_core::ValueArena;

use super::*;
use crate::test_support::{Event, FakeRuntime};

#[test]
fn block_comes_up_immediately_and_has_no_output() {
    let ctx = Rc::new(FakeRuntime::new());
    let module = new(&[], ctx.clone()).unwrap();

    assert!(ctx.was_up());
    let arena = ValueArena::new();
    assert!(module.getvar("", &arena).is_none());
}

#[test]
fn block_handle_toggles_down_then_up() {
    let ctx = Rc::new(FakeRuntime::new());
    let (_module, handle) = new_with_handle(ctx.clone());
    assert_eq!(ctx.events(), vec![Event::Up]);

    handle.set_blocked(true);
    assert_eq!(ctx.events(), vec![Event::Up, Event::Down]);

    handle.set_blocked(false);
    assert_eq!(ctx.events(), vec![Event::Up, Event::Down, Event::Up]);
}

#[test]
fn block_handle_is_idempotent_when_state_unchanged() {
    let ctx = Rc::new(FakeRuntime::new());
    let (_module, handle) = new_with_handle(ctx.clone());

    handle.set_blocked(false);
    assert_eq!(ctx.events(), vec![Event::Up]);
}
