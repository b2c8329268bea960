// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_string_is_always_id_zero() {
    let index = StringIndex::new();
    assert_eq!(index.lookup(b"").unwrap(), StringId::EMPTY);
}

#[test]
fn repeated_intern_returns_same_id() {
    let mut index = StringIndex::new();
    let a = index.intern_str("eth0");
    let b = index.intern_str("eth0");
    assert_eq!(a, b);
}

#[test]
fn distinct_strings_get_distinct_ids() {
    let mut index = StringIndex::new();
    let a = index.intern_str("eth0");
    let b = index.intern_str("eth1");
    assert_ne!(a, b);
}

#[test]
fn resolve_returns_original_bytes() {
    let mut index = StringIndex::new();
    let id = index.intern_str("wlan0");
    assert_eq!(index.resolve_str(id), Some("wlan0"));
}

#[test]
fn lookup_does_not_assign_new_ids() {
    let mut index = StringIndex::new();
    assert!(index.lookup(b"never-seen").is_none());
    assert_eq!(index.len(), 1); // only the empty string
}

#[test]
fn strings_with_embedded_nuls_intern_fine() {
    let mut index = StringIndex::new();
    let id = index.intern(b"a\0b");
    assert_eq!(index.resolve(id), b"a\0b");
}

use proptest::prelude::*;

proptest! {
    #[test]
    fn interning_is_consistent_with_byte_equality(s1 in "[a-z]{0,12}", s2 in "[a-z]{0,12}") {
        let mut index = StringIndex::new();
        let id1 = index.intern_str(&s1);
        let id2 = index.intern_str(&s2);
        prop_assert_eq!(id1 == id2, s1.as_bytes() == s2.as_bytes());
    }

    #[test]
    fn resolve_round_trips_interned_bytes(s in "[a-zA-Z0-9_.]{0,24}") {
        let mut index = StringIndex::new();
        let id = index.intern_str(&s);
        prop_assert_eq!(index.resolve(id), s.as_bytes());
    }
}
