// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-lifetime interning of identifier-like strings to dense integer
//! IDs, enabling O(1) keyed comparisons in hot paths.

use std::collections::HashMap;

/// A dense nonnegative integer assigned by the [`StringIndex`] on first
/// sight. ID 0 is always the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringId(u32);

impl StringId {
    /// The empty string is always interned first and always gets ID 0.
    pub const EMPTY: StringId = StringId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for StringId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A process-wide string interner.
///
/// Two strings compare equal iff either both carry the same [`StringId`], or
/// byte-equality succeeds. `StringIndex` itself only ever compares by bytes
/// (it is the authority the ID comparison shortcut is checked against).
pub struct StringIndex {
    strings: Vec<Box<[u8]>>,
    by_bytes: HashMap<Box<[u8]>, StringId>,
}

impl StringIndex {
    /// Creates a fresh index with the empty string pre-interned as ID 0.
    pub fn new() -> Self {
        let mut index = Self { strings: Vec::new(), by_bytes: HashMap::new() };
        let empty = index.intern(b"");
        debug_assert_eq!(empty, StringId::EMPTY);
        index
    }

    /// Interns `bytes`, returning its existing ID or assigning a new one.
    pub fn intern(&mut self, bytes: &[u8]) -> StringId {
        if let Some(id) = self.by_bytes.get(bytes) {
            return *id;
        }
        let id = StringId(self.strings.len() as u32);
        let boxed: Box<[u8]> = bytes.into();
        self.strings.push(boxed.clone());
        self.by_bytes.insert(boxed, id);
        id
    }

    /// Interns a UTF-8 string, returning its existing ID or assigning a new
    /// one.
    pub fn intern_str(&mut self, s: &str) -> StringId {
        self.intern(s.as_bytes())
    }

    /// Looks up an already-interned string without assigning a new ID.
    pub fn lookup(&self, bytes: &[u8]) -> Option<StringId> {
        self.by_bytes.get(bytes).copied()
    }

    /// Resolves an ID back to its bytes. Panics (debug assertion) if `id`
    /// was never issued by this index — IDs are valid only for the lifetime
    /// of the index that issued them, per the String Index invariant.
    pub fn resolve(&self, id: StringId) -> &[u8] {
        debug_assert!(id.index() < self.strings.len(), "StringId {id} not issued by this index");
        self.strings.get(id.index()).map(|b| b.as_ref()).unwrap_or(b"")
    }

    /// Resolves an ID back to a `&str`. Interned bytes are not guaranteed to
    /// be valid UTF-8 in general (NCD strings may embed arbitrary bytes
    /// except where a module says "no-null"), so callers that only ever
    /// intern UTF-8 text can use this convenience accessor.
    pub fn resolve_str(&self, id: StringId) -> Option<&str> {
        std::str::from_utf8(self.resolve(id)).ok()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "string_index_tests.rs"]
mod tests;
