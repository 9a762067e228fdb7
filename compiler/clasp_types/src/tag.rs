//! Type kind tag.
//!
//! Tags are grouped into ranges:
//! - 0-15: primitives (data unused)
//! - 16-31: derived types (data = base `Idx`)
//! - 80-95: nominal types (data = index into the declaration table)

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Tag {
    // === Primitives (0-15) ===
    Void = 0,
    Bool = 1,
    Int8 = 2,
    UInt8 = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float32 = 10,
    Float64 = 11,
    Char = 12,
    Null = 13,
    FnRef = 14,

    // === Derived (16-31) ===
    /// `T*`
    Pointer = 16,
    /// `T&`
    LvalueRef = 17,
    /// `T&&`
    RvalueRef = 18,

    // === Nominal (80-95) ===
    Delegate = 80,
    ClassDelegate = 81,
    Class = 82,
}

/// Which operation repository owns a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeCategory {
    /// Built-in numeric, `bool` and `char` types.
    Scalar,
    /// Pointer types.
    Derived,
    Delegate,
    ClassDelegate,
    Class,
    /// `void`, `null`, function references and reference types: no
    /// operations of their own.
    Other,
}

impl Tag {
    /// Tag of a primitive by its fixed index.
    pub const fn primitive(raw: u32) -> Option<Tag> {
        match raw {
            0 => Some(Tag::Void),
            1 => Some(Tag::Bool),
            2 => Some(Tag::Int8),
            3 => Some(Tag::UInt8),
            4 => Some(Tag::Int16),
            5 => Some(Tag::UInt16),
            6 => Some(Tag::Int32),
            7 => Some(Tag::UInt32),
            8 => Some(Tag::Int64),
            9 => Some(Tag::UInt64),
            10 => Some(Tag::Float32),
            11 => Some(Tag::Float64),
            12 => Some(Tag::Char),
            13 => Some(Tag::Null),
            14 => Some(Tag::FnRef),
            _ => None,
        }
    }

    pub const fn category(self) -> TypeCategory {
        match self {
            Tag::Bool
            | Tag::Int8
            | Tag::UInt8
            | Tag::Int16
            | Tag::UInt16
            | Tag::Int32
            | Tag::UInt32
            | Tag::Int64
            | Tag::UInt64
            | Tag::Float32
            | Tag::Float64
            | Tag::Char => TypeCategory::Scalar,
            Tag::Pointer => TypeCategory::Derived,
            Tag::Delegate => TypeCategory::Delegate,
            Tag::ClassDelegate => TypeCategory::ClassDelegate,
            Tag::Class => TypeCategory::Class,
            Tag::Void | Tag::Null | Tag::FnRef | Tag::LvalueRef | Tag::RvalueRef => {
                TypeCategory::Other
            }
        }
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) < 16
    }

    #[inline]
    pub const fn is_derived(self) -> bool {
        matches!(self, Tag::Pointer | Tag::LvalueRef | Tag::RvalueRef)
    }

    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, Tag::LvalueRef | Tag::RvalueRef)
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Tag::Int8
                | Tag::UInt8
                | Tag::Int16
                | Tag::UInt16
                | Tag::Int32
                | Tag::UInt32
                | Tag::Int64
                | Tag::UInt64
        )
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Tag::Int8 | Tag::Int16 | Tag::Int32 | Tag::Int64 | Tag::Float32 | Tag::Float64
        )
    }

    #[inline]
    pub const fn is_floating_point(self) -> bool {
        matches!(self, Tag::Float32 | Tag::Float64)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_floating_point()
    }

    /// Storage width in bits of a scalar, `None` for everything else.
    pub const fn bit_width(self) -> Option<u32> {
        match self {
            Tag::Bool => Some(1),
            Tag::Int8 | Tag::UInt8 => Some(8),
            Tag::Int16 | Tag::UInt16 => Some(16),
            Tag::Int32 | Tag::UInt32 | Tag::Float32 | Tag::Char => Some(32),
            Tag::Int64 | Tag::UInt64 | Tag::Float64 => Some(64),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tag::Void => "void",
            Tag::Bool => "bool",
            Tag::Int8 => "int8",
            Tag::UInt8 => "uint8",
            Tag::Int16 => "int16",
            Tag::UInt16 => "uint16",
            Tag::Int32 => "int32",
            Tag::UInt32 => "uint32",
            Tag::Int64 => "int64",
            Tag::UInt64 => "uint64",
            Tag::Float32 => "float32",
            Tag::Float64 => "float64",
            Tag::Char => "char",
            Tag::Null => "null",
            Tag::FnRef => "fnref",
            Tag::Pointer => "pointer",
            Tag::LvalueRef => "lvalue-ref",
            Tag::RvalueRef => "rvalue-ref",
            Tag::Delegate => "delegate",
            Tag::ClassDelegate => "class-delegate",
            Tag::Class => "class",
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag::{}", self.name())
    }
}

#[cfg(test)]
mod tests;
