use pretty_assertions::assert_eq;

use super::*;

#[test]
fn intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("Point");
    let b = interner.intern("Point");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "Point");
}

#[test]
fn distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    assert_ne!(interner.intern("x"), interner.intern("y"));
}

#[test]
fn empty_string_is_name_zero() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn operator_groups_are_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("@constructor").is_some());
    assert!(interner.get("operator==").is_some());
    assert!(interner.get("not-interned-yet").is_none());
}

#[test]
fn unknown_name_looks_up_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(u32::MAX)), "");
}
