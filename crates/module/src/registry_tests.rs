// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::rc::Rc;

use ncd_core::Value;

use super::*;
use crate::error::ModuleError;
use crate::runtime::Module;

fn stub_factory(_args: &[Value<'_>], _ctx: Rc<dyn crate::runtime::ModuleRuntime>) -> Result<Box<dyn Module>, ModuleError> {
    Err(ModuleError::UnknownType { type_name: "stub".to_string() })
}

#[test]
fn register_and_lookup_round_trips() {
    let mut registry = Registry::new();
    registry.register("stub", stub_factory as ModuleFactory);

    assert!(registry.is_known("stub"));
    assert!(registry.lookup("stub").is_some());
    assert!(!registry.is_known("missing"));
    assert!(registry.lookup("missing").is_none());
}

#[test]
fn re_registering_replaces_the_factory() {
    let mut registry = Registry::new();
    registry.register("stub", stub_factory as ModuleFactory);
    registry.register("stub", stub_factory as ModuleFactory);

    assert_eq!(registry.type_names().filter(|n| *n == "stub").count(), 1);
}
