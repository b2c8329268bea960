// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An arena-free, owned mirror of [`ValueData`].
//!
//! A module's private state must not hold a [`Value`] past the end of its
//! `new()` call — the per-statement argument arena is freed once the
//! statement leaves `Starting` (§3 "StatementInstance"). Modules that need
//! to remember an argument value past that point (e.g. `var`, `list`,
//! `call`) convert it to an [`OwnedValue`] first.

use super::arena::{Value, ValueArena, ValueData};
use crate::string_index::StringId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedValue {
    Invalid,
    Str(Vec<u8>),
    List(Vec<OwnedValue>),
    Map(Vec<(OwnedValue, OwnedValue)>),
}

impl OwnedValue {
    pub fn str(bytes: impl Into<Vec<u8>>) -> Self {
        OwnedValue::Str(bytes.into())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            OwnedValue::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[OwnedValue]> {
        match self {
            OwnedValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl<'a> From<Value<'a>> for OwnedValue {
    fn from(value: Value<'a>) -> Self {
        match value {
            ValueData::Invalid => OwnedValue::Invalid,
            ValueData::Str(bytes, _) => OwnedValue::Str(bytes.to_vec()),
            ValueData::List(items) => OwnedValue::List(items.iter().map(|v| OwnedValue::from(*v)).collect()),
            ValueData::Map(entries) => {
                OwnedValue::Map(entries.iter().map(|(k, v)| (OwnedValue::from(*k), OwnedValue::from(*v))).collect())
            }
        }
    }
}

impl<'a> ValueArena<'a> {
    /// Materializes an [`OwnedValue`] back into this arena.
    pub fn alloc_owned(&'a self, owned: &OwnedValue) -> Value<'a> {
        match owned {
            OwnedValue::Invalid => self.invalid(),
            OwnedValue::Str(bytes) => self.str(bytes.clone()),
            OwnedValue::List(items) => {
                let allocated = items.iter().map(|v| self.alloc_owned(v)).collect();
                self.list(allocated)
            }
            OwnedValue::Map(entries) => {
                let allocated = entries.iter().map(|(k, v)| (self.alloc_owned(k), self.alloc_owned(v))).collect();
                self.map(allocated)
            }
        }
    }

    /// Materializes an interned string as an owned value, resolving its ID
    /// for the O(1)-comparison fast path if the caller has one handy.
    pub fn alloc_owned_interned(&'a self, bytes: &[u8], id: StringId) -> Value<'a> {
        self.str_interned(bytes.to_vec(), id)
    }
}

#[cfg(test)]
#[path = "owned_tests.rs"]
mod tests;
