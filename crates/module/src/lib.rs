// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ncd-module: the Module Runtime Interface and the reference module
//! catalog (§4.4).

pub mod catalog;
pub mod error;
pub mod registry;
pub mod runtime;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::ModuleError;
pub use registry::Registry;
pub use runtime::{check_args, ArgSpec, Module, ModuleFactory, ModuleRuntime, ObjectRef, OnFailure, SubProcessHandle, TemplateListener};

/// Builds a [`Registry`] pre-populated with the reference module catalog
/// (§4.4): `print`, `var`, `list`, `sleep`, `call`, `block`, `exec`.
pub fn reference_registry() -> Registry {
    let mut registry = Registry::new();
    catalog::register_all(&mut registry);
    registry
}
