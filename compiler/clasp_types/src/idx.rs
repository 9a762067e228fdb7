//! Type index handle.
//!
//! All types live in a [`Pool`](crate::Pool) and are referenced by a 32-bit
//! index. Primitive types have fixed indices so they can be named without a
//! pool and compared without a lookup.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-14) ===
    pub const VOID: Self = Self(0);
    pub const BOOL: Self = Self(1);
    pub const INT8: Self = Self(2);
    pub const UINT8: Self = Self(3);
    pub const INT16: Self = Self(4);
    pub const UINT16: Self = Self(5);
    pub const INT32: Self = Self(6);
    pub const UINT32: Self = Self(7);
    pub const INT64: Self = Self(8);
    pub const UINT64: Self = Self(9);
    pub const FLOAT32: Self = Self(10);
    pub const FLOAT64: Self = Self(11);
    /// Unicode scalar value (32 bits, unsigned).
    pub const CHAR: Self = Self(12);
    /// Type of the `null` literal; converts to any pointer type.
    pub const NULL: Self = Self(13);
    /// Placeholder type of an argument that names a function rather than a value.
    pub const FN_REF: Self = Self(14);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 15;

    /// Sentinel for "no type".
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Source-level name of a primitive, `None` for pool-allocated types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("void"),
            1 => Some("bool"),
            2 => Some("int8"),
            3 => Some("uint8"),
            4 => Some("int16"),
            5 => Some("uint16"),
            6 => Some("int32"),
            7 => Some("uint32"),
            8 => Some("int64"),
            9 => Some("uint64"),
            10 => Some("float32"),
            11 => Some("float64"),
            12 => Some("char"),
            13 => Some("null"),
            14 => Some("<fnref>"),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.name().unwrap_or("<type>")
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None if self.is_none() => write!(f, "Idx(NONE)"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl Default for Idx {
    fn default() -> Self {
        Self::NONE
    }
}
