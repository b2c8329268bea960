// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scheduler scenarios, matching spec §8 literally: linear up,
//! variable resolution, backward-only visibility, template call, down
//! cascade, die under contention. Each uses `ncd_parser::parse` for real
//! configuration text and the reference module catalog, plus a handful of
//! test-only module types (registered only here) that give the test
//! observability or control a production module wouldn't expose.

use std::cell::RefCell;
use std::rc::Rc;

use ncd_core::ValueKind;
use ncd_module::{check_args, ArgSpec, Module, ModuleError, ModuleRuntime, ObjectRef, Registry};

use super::*;
use crate::context::Context;

thread_local! {
    static CAPTURED: RefCell<Vec<String>> = RefCell::new(Vec::new());
    static TOGGLE_CTX: RefCell<Vec<Rc<dyn ModuleRuntime>>> = RefCell::new(Vec::new());
    static PENDING_CTX: RefCell<Vec<Rc<dyn ModuleRuntime>>> = RefCell::new(Vec::new());
    static PENDING_DIE_CALLS: RefCell<usize> = RefCell::new(0);
}

fn reset_test_state() {
    CAPTURED.with(|c| c.borrow_mut().clear());
    TOGGLE_CTX.with(|c| c.borrow_mut().clear());
    PENDING_CTX.with(|c| c.borrow_mut().clear());
    PENDING_DIE_CALLS.with(|c| *c.borrow_mut() = 0);
}

/// `capture(value)` — records its argument for the test to inspect, then
/// comes straight up. Stands in for `print` (§8 scenarios 1-4).
struct Capture;

impl ObjectRef for Capture {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ncd_core::ValueArena<'a>) -> Option<ncd_core::Value<'a>> {
        None
    }
}

impl Module for Capture {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        ctx.backend_dead();
    }
}

fn capture_new(args: &[ncd_core::Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(&[ArgSpec::new("value", ValueKind::Str)], args)?;
    let text = args[0].as_str().unwrap_or("<binary>").to_string();
    CAPTURED.with(|c| c.borrow_mut().push(text));
    ctx.backend_up();
    Ok(Box::new(Capture))
}

/// `toggle()` — comes up immediately and stashes its `ctx` so the test can
/// drive `backend_down`/`backend_up` from outside (§8 scenario 5).
struct Toggle;

impl ObjectRef for Toggle {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ncd_core::ValueArena<'a>) -> Option<ncd_core::Value<'a>> {
        None
    }
}

impl Module for Toggle {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        ctx.backend_dead();
    }
}

fn toggle_new(args: &[ncd_core::Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(&[], args)?;
    ctx.backend_up();
    TOGGLE_CTX.with(|c| c.borrow_mut().push(ctx));
    Ok(Box::new(Toggle))
}

fn toggle_send_down() {
    TOGGLE_CTX.with(|c| {
        if let Some(ctx) = c.borrow().last() {
            ctx.backend_down();
        }
    });
}

fn toggle_send_up() {
    TOGGLE_CTX.with(|c| {
        if let Some(ctx) = c.borrow().last() {
            ctx.backend_up();
        }
    });
}

/// `pending()` — never calls `backend_up` on its own; stays `Starting`
/// until the test calls [`pending_release`] (§8 scenario 6).
struct Pending;

impl ObjectRef for Pending {
    fn getvar<'a>(&self, _name: &str, _arena: &'a ncd_core::ValueArena<'a>) -> Option<ncd_core::Value<'a>> {
        None
    }
}

impl Module for Pending {
    fn die(&mut self, ctx: Rc<dyn ModuleRuntime>) {
        PENDING_DIE_CALLS.with(|c| *c.borrow_mut() += 1);
        ctx.backend_dead();
    }
}

fn pending_new(args: &[ncd_core::Value<'_>], ctx: Rc<dyn ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    check_args(&[], args)?;
    PENDING_CTX.with(|c| c.borrow_mut().push(ctx));
    Ok(Box::new(Pending))
}

fn pending_release() {
    PENDING_CTX.with(|c| {
        if let Some(ctx) = c.borrow().last() {
            ctx.backend_up();
        }
    });
}

fn engine_for(source: &str, extra: impl FnOnce(&mut Registry)) -> Engine {
    let program = ncd_parser::parse(source).expect("test config parses");
    let mut registry = ncd_module::reference_registry();
    extra(&mut registry);
    let context = Context::new(registry);
    let config = Engine::load(&program).expect("test config loads");
    Engine::new(context, config)
}

/// Drives the reactor until nothing further is scheduled. Bounded so a
/// scheduler defect that loops forever fails the test instead of hanging.
fn drain(engine: &Engine) {
    for _ in 0..500 {
        engine.context().reactor.run_once();
    }
}

#[test]
fn scenario_1_linear_up_then_reverse_teardown_on_terminate() {
    reset_test_state();
    let engine = engine_for(r#"process main { capture("a"); capture("b"); capture("c"); }"#, |r| {
        r.register("capture", capture_new);
    });

    let handle = engine.start("main", Vec::new()).unwrap();
    drain(&engine);
    assert_eq!(CAPTURED.with(|c| c.borrow().clone()), vec!["a", "b", "c"]);

    let outcome = Rc::new(RefCell::new(None));
    let recorded = outcome.clone();
    engine.on_complete(handle, move |o| *recorded.borrow_mut() = Some(o));
    engine.terminate(handle);
    drain(&engine);
    assert!(matches!(*outcome.borrow(), Some(ProcessOutcome::Completed)));
}

#[test]
fn scenario_2_variable_resolution_passes_the_earlier_statements_value() {
    reset_test_state();
    let engine = engine_for(r#"process main { var("hello") x; capture(x); }"#, |r| {
        r.register("capture", capture_new);
    });

    engine.start("main", Vec::new()).unwrap();
    drain(&engine);
    assert_eq!(CAPTURED.with(|c| c.borrow().clone()), vec!["hello"]);
}

#[test]
fn scenario_3_backward_only_visibility_aborts_the_process() {
    reset_test_state();
    let engine = engine_for(r#"process main { capture(y); var("hi") y; }"#, |r| {
        r.register("capture", capture_new);
    });

    let handle = engine.start("main", Vec::new()).unwrap();
    let outcome = Rc::new(RefCell::new(None));
    let recorded = outcome.clone();
    engine.on_complete(handle, move |o| *recorded.borrow_mut() = Some(o));
    drain(&engine);

    assert!(CAPTURED.with(|c| c.borrow().is_empty()), "capture must never have started");
    assert!(matches!(*outcome.borrow(), Some(ProcessOutcome::Aborted(_))));
}

#[test]
fn scenario_4_template_call_propagates_args_and_mirrors_up() {
    reset_test_state();
    let engine = engine_for(
        r#"
        template t { capture(_args.0); }
        process main { call("t", {"world"}); }
        "#,
        |r| r.register("capture", capture_new),
    );

    let handle = engine.start("main", Vec::new()).unwrap();
    drain(&engine);
    assert_eq!(CAPTURED.with(|c| c.borrow().clone()), vec!["world"]);

    let outcome = Rc::new(RefCell::new(None));
    let recorded = outcome.clone();
    engine.on_complete(handle, move |o| *recorded.borrow_mut() = Some(o));
    engine.terminate(handle);
    drain(&engine);
    assert!(matches!(*outcome.borrow(), Some(ProcessOutcome::Completed)));
}

#[test]
fn scenario_5_backend_down_tears_down_successors_before_reemitting_up() {
    reset_test_state();
    let engine = engine_for(r#"process main { toggle() b; capture("x"); }"#, |r| {
        r.register("toggle", toggle_new);
    });

    engine.start("main", Vec::new()).unwrap();
    drain(&engine);
    assert_eq!(CAPTURED.with(|c| c.borrow().clone()), vec!["x"]);

    toggle_send_down();
    drain(&engine);
    // `capture` has been torn down, but `b` hasn't re-emitted up yet, so it
    // has not restarted.
    assert_eq!(CAPTURED.with(|c| c.borrow().clone()), vec!["x"]);

    toggle_send_up();
    drain(&engine);
    assert_eq!(CAPTURED.with(|c| c.borrow().clone()), vec!["x", "x"]);
}

#[test]
fn scenario_6_die_under_contention_waits_for_backend_up_before_dying() {
    reset_test_state();
    let engine = engine_for(r#"process main { pending(); }"#, |r| {
        r.register("pending", pending_new);
    });

    let handle = engine.start("main", Vec::new()).unwrap();
    drain(&engine);
    assert_eq!(PENDING_DIE_CALLS.with(|c| *c.borrow()), 0, "new() never called backend_up; statement is still Starting");

    let outcome = Rc::new(RefCell::new(None));
    let recorded = outcome.clone();
    engine.on_complete(handle, move |o| *recorded.borrow_mut() = Some(o));
    engine.terminate(handle);
    drain(&engine);
    assert_eq!(PENDING_DIE_CALLS.with(|c| *c.borrow()), 0, "die() must wait for backend_up, not fire while still Starting");

    pending_release();
    drain(&engine);
    assert_eq!(PENDING_DIE_CALLS.with(|c| *c.borrow()), 1, "die() fires immediately once backend_up is honored");
    assert!(matches!(*outcome.borrow(), Some(ProcessOutcome::Completed)));
}

#[test]
fn unknown_module_type_aborts_the_process_with_backend_error_semantics() {
    reset_test_state();
    let engine = engine_for(r#"process main { nonexistent_type(); }"#, |_| {});

    let handle = engine.start("main", Vec::new()).unwrap();
    let outcome = Rc::new(RefCell::new(None));
    let recorded = outcome.clone();
    engine.on_complete(handle, move |o| *recorded.borrow_mut() = Some(o));
    drain(&engine);

    assert!(matches!(*outcome.borrow(), Some(ProcessOutcome::Aborted(_))));
}

#[test]
fn starting_a_template_directly_is_rejected() {
    reset_test_state();
    let engine = engine_for("template t { capture(\"x\"); }", |r| r.register("capture", capture_new));
    let err = engine.start("t", Vec::new()).unwrap_err();
    assert!(matches!(err, EngineError::WrongProcessKind { .. }));
}
