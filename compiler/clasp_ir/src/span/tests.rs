use pretty_assertions::assert_eq;

use super::*;

#[test]
fn merge_covers_both() {
    let a = Span::new(4, 10);
    let b = Span::new(8, 20);
    assert_eq!(a.merge(b), Span::new(4, 20));
    assert_eq!(b.merge(a), Span::new(4, 20));
}

#[test]
fn try_from_range_accepts_small_ranges() {
    assert_eq!(Span::try_from_range(3..7), Ok(Span::new(3, 7)));
    assert_eq!(Span::new(3, 7).len(), 4);
}

#[test]
fn try_from_range_rejects_inverted() {
    assert_eq!(
        Span::try_from_range(7..3),
        Err(SpanError::Inverted { start: 7, end: 3 })
    );
}

#[cfg(target_pointer_width = "64")]
#[test]
fn try_from_range_rejects_overflow() {
    let big = u32::MAX as usize + 1;
    assert_eq!(
        Span::try_from_range(0..big),
        Err(SpanError::EndTooLarge(big))
    );
}

#[test]
fn dummy_is_empty() {
    assert!(Span::DUMMY.is_empty());
    assert!(Span::DUMMY.is_dummy());
    assert_eq!(format!("{:?}", Span::new(1, 2)), "1..2");
}
