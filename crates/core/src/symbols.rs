// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Well-known identifiers pre-interned at startup, so hot-path comparisons
//! against them never have to intern or byte-compare.

use crate::string_index::{StringId, StringIndex};

/// The static symbol table. Built once, alongside the process's
/// [`StringIndex`], and then read-only for the life of the process.
#[derive(Debug, Clone, Copy)]
pub struct Symbols {
    pub empty: StringId,
    pub true_: StringId,
    pub false_: StringId,
    pub none: StringId,
}

impl Symbols {
    /// Interns every well-known symbol into `index` and returns their IDs.
    ///
    /// Method/object path segments are deliberately *not* included here —
    /// pre-populating every module type name would require this table to
    /// know the module registry, which would invert the dependency
    /// direction (`ncd-core` must not depend on `ncd-module`). Those
    /// segments intern lazily the first time the parser sees them.
    pub fn init(index: &mut StringIndex) -> Self {
        Self {
            empty: index.intern(b""),
            true_: index.intern_str("true"),
            false_: index.intern_str("false"),
            none: index.intern_str("<none>"),
        }
    }
}
