use super::*;

#[test]
fn owned_value_round_trips_through_an_arena() {
    let source = ValueArena::new();
    let original = source.list(vec![source.str(b"a".to_vec()), source.str(b"b".to_vec())]);
    let owned = OwnedValue::from(original);

    let dest = ValueArena::new();
    let rematerialized = dest.alloc_owned(&owned);
    assert_eq!(rematerialized, original);
}

#[test]
fn owned_value_outlives_its_source_arena() {
    let owned = {
        let arena = ValueArena::new();
        let value = arena.str(b"hello".to_vec());
        OwnedValue::from(value)
    };
    assert_eq!(owned.as_str(), Some("hello"));
}

#[test]
fn owned_map_preserves_key_value_structure() {
    let source = ValueArena::new();
    let value = source.map(vec![(source.str(b"k".to_vec()), source.str(b"v".to_vec()))]);
    let owned = OwnedValue::from(value);
    match owned {
        OwnedValue::Map(entries) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].0.as_str(), Some("k"));
            assert_eq!(entries[0].1.as_str(), Some("v"));
        }
        other => panic!("expected map, got {other:?}"),
    }
}
