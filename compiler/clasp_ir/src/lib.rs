//! Clasp IR - shared leaf types for the Clasp compiler.
//!
//! This crate holds the few data structures every other phase needs:
//! - Spans for source locations
//! - Names for interned identifiers and operator group names
//! - The string interner that owns the text behind each `Name`
//!
//! Every type here is `Copy` or cheaply clonable and compares in O(1).

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Name, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(Name, 4);
}
