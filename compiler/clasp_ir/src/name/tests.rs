use super::*;

#[test]
fn raw_roundtrip() {
    let name = Name::from_raw(42);
    assert_eq!(name.raw(), 42);
    assert_eq!(name.index(), 42);
}

#[test]
fn default_is_empty() {
    assert_eq!(Name::default(), Name::EMPTY);
}

#[test]
fn names_order_by_index() {
    assert!(Name::from_raw(1) < Name::from_raw(2));
}
