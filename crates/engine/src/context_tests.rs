// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ncd_module::Registry;

use super::*;

#[test]
fn symbols_are_preinterned_on_construction() {
    let ctx = Context::new(Registry::new());
    assert_eq!(ctx.resolve(ctx.symbols.true_), b"true");
}

#[test]
fn intern_round_trips_through_resolve() {
    let ctx = Context::new(Registry::new());
    let id = ctx.intern(b"hello");
    assert_eq!(ctx.resolve(id), b"hello");
}

#[test]
fn registry_is_empty_until_modules_are_registered() {
    let ctx = Context::new(Registry::new());
    assert!(!ctx.registry.is_known("print"));
}
