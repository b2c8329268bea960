// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arena allocation for [`ValueData`], built on `typed_arena::Arena`'s
//! well-known self-referential-node pattern: the arena hands back `&'a`
//! references into nodes that themselves hold further `&'a` references,
//! with no unsafe code and no reference counting.

use super::ValueKind;
use crate::string_index::StringId;
use typed_arena::Arena;

/// One node in the Value Universe. Strings store raw bytes rather than
/// `String` because NCD values may contain embedded NULs except where a
/// module's argument declares "no-null" (checked at the module boundary,
/// not here).
#[derive(Debug)]
pub enum ValueData<'a> {
    Invalid,
    Str(Box<[u8]>, Option<StringId>),
    List(Vec<Value<'a>>),
    Map(Vec<(Value<'a>, Value<'a>)>),
}

/// A reference to a value, valid for as long as the arena that allocated it.
pub type Value<'a> = &'a ValueData<'a>;

impl<'a> ValueData<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueData::Invalid => ValueKind::Invalid,
            ValueData::Str(..) => ValueKind::Str,
            ValueData::List(_) => ValueKind::List,
            ValueData::Map(_) => ValueKind::Map,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ValueData::Str(bytes, _) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the string contents if this value is a string and its bytes
    /// happen to be valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn string_id(&self) -> Option<StringId> {
        match self {
            ValueData::Str(_, id) => *id,
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            ValueData::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value<'a>, Value<'a>)]> {
        match self {
            ValueData::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValueData::Invalid)
    }
}

impl<'a> PartialEq for ValueData<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueData::Invalid, ValueData::Invalid) => true,
            (ValueData::Str(b1, id1), ValueData::Str(b2, id2)) => match (id1, id2) {
                (Some(a), Some(b)) if a == b => true,
                _ => b1 == b2,
            },
            (ValueData::List(a), ValueData::List(b)) => a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y),
            (ValueData::Map(a), ValueData::Map(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
            }
            _ => false,
        }
    }
}

/// A bump allocator for one scope's worth of [`ValueData`] nodes (a
/// per-statement or per-resolve-call arena, per the spec's "value memory").
///
/// No value allocated here outlives the arena; the borrow checker enforces
/// this directly because every [`Value`] is `&'a ValueData<'a>`.
pub struct ValueArena<'a> {
    arena: Arena<ValueData<'a>>,
}

impl<'a> ValueArena<'a> {
    pub fn new() -> Self {
        Self { arena: Arena::new() }
    }

    pub fn alloc(&'a self, data: ValueData<'a>) -> Value<'a> {
        self.arena.alloc(data)
    }

    pub fn invalid(&'a self) -> Value<'a> {
        self.alloc(ValueData::Invalid)
    }

    pub fn str(&'a self, bytes: impl Into<Box<[u8]>>) -> Value<'a> {
        self.alloc(ValueData::Str(bytes.into(), None))
    }

    /// Allocates a string value that already carries its interned ID, for
    /// the O(1)-comparison fast path.
    pub fn str_interned(&'a self, bytes: impl Into<Box<[u8]>>, id: StringId) -> Value<'a> {
        self.alloc(ValueData::Str(bytes.into(), Some(id)))
    }

    pub fn list(&'a self, items: Vec<Value<'a>>) -> Value<'a> {
        self.alloc(ValueData::List(items))
    }

    pub fn map(&'a self, entries: Vec<(Value<'a>, Value<'a>)>) -> Value<'a> {
        self.alloc(ValueData::Map(entries))
    }

    /// Deep-copies a value living in any arena into this one. Deep copy
    /// across arenas is always explicit, per the spec's arena-safety
    /// invariant — there is no implicit cross-arena reference.
    pub fn deep_copy(&'a self, value: Value<'_>) -> Value<'a> {
        match value {
            ValueData::Invalid => self.invalid(),
            ValueData::Str(bytes, id) => match id {
                Some(id) => self.str_interned(bytes.clone(), *id),
                None => self.str(bytes.clone()),
            },
            ValueData::List(items) => {
                let copied = items.iter().map(|v| self.deep_copy(v)).collect();
                self.list(copied)
            }
            ValueData::Map(entries) => {
                let copied = entries.iter().map(|(k, v)| (self.deep_copy(k), self.deep_copy(v))).collect();
                self.map(copied)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}

impl<'a> Default for ValueArena<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "arena_tests.rs"]
mod tests;
