use pretty_assertions::assert_eq;

use super::*;

#[test]
fn primitive_tags_match_fixed_indices() {
    for raw in 0..crate::Idx::PRIMITIVE_COUNT {
        let tag = Tag::primitive(raw).unwrap_or_else(|| panic!("no tag for {raw}"));
        assert_eq!(u32::from(tag as u8), raw);
        assert!(tag.is_primitive());
    }
    assert_eq!(Tag::primitive(crate::Idx::PRIMITIVE_COUNT), None);
}

#[test]
fn categories() {
    assert_eq!(Tag::Int32.category(), TypeCategory::Scalar);
    assert_eq!(Tag::Bool.category(), TypeCategory::Scalar);
    assert_eq!(Tag::Pointer.category(), TypeCategory::Derived);
    assert_eq!(Tag::LvalueRef.category(), TypeCategory::Other);
    assert_eq!(Tag::Delegate.category(), TypeCategory::Delegate);
    assert_eq!(Tag::ClassDelegate.category(), TypeCategory::ClassDelegate);
    assert_eq!(Tag::Class.category(), TypeCategory::Class);
    assert_eq!(Tag::Void.category(), TypeCategory::Other);
    assert_eq!(Tag::Null.category(), TypeCategory::Other);
}

#[test]
fn numeric_predicates() {
    assert!(Tag::UInt16.is_integer());
    assert!(!Tag::UInt16.is_signed());
    assert!(Tag::Int64.is_signed());
    assert!(Tag::Float32.is_floating_point());
    assert!(Tag::Float32.is_numeric());
    assert!(!Tag::Bool.is_numeric());
    assert!(!Tag::Char.is_integer());
}

#[test]
fn bit_widths() {
    assert_eq!(Tag::Int8.bit_width(), Some(8));
    assert_eq!(Tag::UInt64.bit_width(), Some(64));
    assert_eq!(Tag::Char.bit_width(), Some(32));
    assert_eq!(Tag::Pointer.bit_width(), None);
}
