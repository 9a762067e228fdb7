//! Function symbols.
//!
//! Every callable of a compile unit lives in one [`FnTable`] and is named by
//! an [`FnId`]. Compiler-synthesized operations are recognized by handle
//! identity: the engine returns the same `FnId` every time the same
//! operation is requested for the same type.

use bitflags::bitflags;
use clasp_ir::{Name, Span};
use smallvec::SmallVec;

use crate::Idx;

/// Handle to a [`FunctionSymbol`] in a [`FnTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FnId(u32);

impl FnId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FnId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FnFlags: u16 {
        /// Only callable by explicit request (casts, direct construction).
        const EXPLICIT = 1 << 0;
        const NOTHROW = 1 << 1;
        /// Constructor converting a value of another type.
        const CONVERTING_CTOR = 1 << 2;
        /// First parameter is the receiver object.
        const MEMBER = 1 << 3;
        /// Built-in operation of a scalar, pointer or delegate type.
        const INTRINSIC = 1 << 4;
        /// Member-wise operation synthesized for a class.
        const SYNTHESIZED = 1 << 5;
    }
}

/// Preference class of a conversion; lower is better.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ConversionRank {
    ExactMatch,
    Promotion,
    Conversion,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConversionKind {
    Implicit,
    Explicit,
}

/// Metadata of a converting constructor, consumed by overload tie-breaking.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConversionInfo {
    pub target: Idx,
    pub source: Idx,
    pub kind: ConversionKind,
    pub rank: ConversionRank,
    pub distance: u8,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Idx,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: Name,
    /// Operator group this function is found under (`operator+`, `@constructor`).
    pub group: Name,
    /// Type the function belongs to, `Idx::NONE` for free functions.
    pub owner: Idx,
    pub params: SmallVec<[Param; 3]>,
    pub ret: Idx,
    pub flags: FnFlags,
    pub conversion: Option<ConversionInfo>,
    pub span: Span,
}

impl FunctionSymbol {
    pub fn new(name: Name, group: Name, owner: Idx, ret: Idx) -> Self {
        FunctionSymbol {
            name,
            group,
            owner,
            params: SmallVec::new(),
            ret,
            flags: FnFlags::NOTHROW,
            conversion: None,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: Name, ty: Idx) -> Self {
        self.params.push(Param { name, ty });
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FnFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_conversion(mut self, conversion: ConversionInfo) -> Self {
        self.flags |= FnFlags::CONVERTING_CTOR;
        if conversion.kind == ConversionKind::Explicit {
            self.flags |= FnFlags::EXPLICIT;
        }
        self.conversion = Some(conversion);
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn param_types(&self) -> impl Iterator<Item = Idx> + '_ {
        self.params.iter().map(|p| p.ty)
    }

    #[inline]
    pub fn is_member(&self) -> bool {
        self.flags.contains(FnFlags::MEMBER)
    }

    /// Written by the user rather than produced by the compiler.
    #[inline]
    pub fn is_user_defined(&self) -> bool {
        !self
            .flags
            .intersects(FnFlags::INTRINSIC | FnFlags::SYNTHESIZED)
    }
}

/// Arena owning every function symbol of a compile unit.
///
/// Symbols are never removed; an `FnId` stays valid for the life of the table.
#[derive(Clone, Debug, Default)]
pub struct FnTable {
    fns: Vec<FunctionSymbol>,
}

impl FnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol and return its handle.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` functions are registered.
    pub fn push(&mut self, symbol: FunctionSymbol) -> FnId {
        let raw = u32::try_from(self.fns.len())
            .unwrap_or_else(|_| panic!("function table exceeded u32::MAX entries"));
        self.fns.push(symbol);
        FnId(raw)
    }

    /// # Panics
    /// Panics if `id` was not issued by this table.
    #[inline]
    pub fn get(&self, id: FnId) -> &FunctionSymbol {
        &self.fns[id.index()]
    }

    #[inline]
    pub fn try_get(&self, id: FnId) -> Option<&FunctionSymbol> {
        self.fns.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FnId, &FunctionSymbol)> {
        self.fns.iter().enumerate().map(|(i, f)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "push() rejects tables larger than u32::MAX"
            )]
            let id = FnId(i as u32);
            (id, f)
        })
    }

    /// The single user-defined function with this name, `None` if absent or overloaded.
    pub fn find_user(&self, name: Name) -> Option<FnId> {
        let mut found = None;
        for (id, f) in self.iter() {
            if f.name == name && f.is_user_defined() {
                if found.is_some() {
                    return None;
                }
                found = Some(id);
            }
        }
        found
    }
}
