//! Operation kinds and cache keys.

use clasp_types::{FnId, Idx, Pool, SpecialMember, TypeCategory};

/// Every operation the engine can synthesize.
///
/// The discriminant is the tag written into compiled-library metadata.
/// New kinds go at the end; existing values are never reordered or reused.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum OpKind {
    DefaultCtor = 0,
    CopyCtor = 1,
    MoveCtor = 2,
    CopyAssignment = 3,
    MoveAssignment = 4,
    Equal = 5,
    Less = 6,
    Add = 7,
    Sub = 8,
    Mul = 9,
    Div = 10,
    Rem = 11,
    Shl = 12,
    Shr = 13,
    BitAnd = 14,
    BitOr = 15,
    BitXor = 16,
    Not = 17,
    UnaryPlus = 18,
    UnaryMinus = 19,
    Complement = 20,
    Increment = 21,
    Decrement = 22,
    ConvertingCtor = 23,
    Deref = 24,
    AddressOf = 25,
    PtrPlusOffset = 26,
    OffsetPlusPtr = 27,
    PtrMinusOffset = 28,
    PtrMinusPtr = 29,
    NullToPtr = 30,
    PtrToVoidPtr = 31,
    VoidPtrToPtr = 32,
    VoidPtrToInt = 33,
    CtorFromFunction = 34,
    AssignFromFunction = 35,
}

impl OpKind {
    pub const ALL: [OpKind; 36] = [
        OpKind::DefaultCtor,
        OpKind::CopyCtor,
        OpKind::MoveCtor,
        OpKind::CopyAssignment,
        OpKind::MoveAssignment,
        OpKind::Equal,
        OpKind::Less,
        OpKind::Add,
        OpKind::Sub,
        OpKind::Mul,
        OpKind::Div,
        OpKind::Rem,
        OpKind::Shl,
        OpKind::Shr,
        OpKind::BitAnd,
        OpKind::BitOr,
        OpKind::BitXor,
        OpKind::Not,
        OpKind::UnaryPlus,
        OpKind::UnaryMinus,
        OpKind::Complement,
        OpKind::Increment,
        OpKind::Decrement,
        OpKind::ConvertingCtor,
        OpKind::Deref,
        OpKind::AddressOf,
        OpKind::PtrPlusOffset,
        OpKind::OffsetPlusPtr,
        OpKind::PtrMinusOffset,
        OpKind::PtrMinusPtr,
        OpKind::NullToPtr,
        OpKind::PtrToVoidPtr,
        OpKind::VoidPtrToPtr,
        OpKind::VoidPtrToInt,
        OpKind::CtorFromFunction,
        OpKind::AssignFromFunction,
    ];

    /// Persisted tag.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<OpKind> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    pub const fn from_special(member: SpecialMember) -> OpKind {
        match member {
            SpecialMember::Default => OpKind::DefaultCtor,
            SpecialMember::Copy => OpKind::CopyCtor,
            SpecialMember::Move => OpKind::MoveCtor,
            SpecialMember::CopyAssign => OpKind::CopyAssignment,
            SpecialMember::MoveAssign => OpKind::MoveAssignment,
            SpecialMember::Equal => OpKind::Equal,
        }
    }

    /// The special member this kind implements, if it is one a class can synthesize.
    pub const fn special_member(self) -> Option<SpecialMember> {
        match self {
            OpKind::DefaultCtor => Some(SpecialMember::Default),
            OpKind::CopyCtor => Some(SpecialMember::Copy),
            OpKind::MoveCtor => Some(SpecialMember::Move),
            OpKind::CopyAssignment => Some(SpecialMember::CopyAssign),
            OpKind::MoveAssignment => Some(SpecialMember::MoveAssign),
            OpKind::Equal => Some(SpecialMember::Equal),
            _ => None,
        }
    }

    /// Binary operators of the scalar arithmetic, bitwise and shift family.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            OpKind::Add
                | OpKind::Sub
                | OpKind::Mul
                | OpKind::Div
                | OpKind::Rem
                | OpKind::Shl
                | OpKind::Shr
                | OpKind::BitAnd
                | OpKind::BitOr
                | OpKind::BitXor
        )
    }

    pub const fn is_unary(self) -> bool {
        matches!(
            self,
            OpKind::Not | OpKind::UnaryPlus | OpKind::UnaryMinus | OpKind::Complement
        )
    }

    /// Constructors, including converting ones.
    pub const fn is_constructor(self) -> bool {
        matches!(
            self,
            OpKind::DefaultCtor
                | OpKind::CopyCtor
                | OpKind::MoveCtor
                | OpKind::ConvertingCtor
                | OpKind::NullToPtr
                | OpKind::PtrToVoidPtr
                | OpKind::VoidPtrToPtr
                | OpKind::VoidPtrToInt
                | OpKind::CtorFromFunction
        )
    }

    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            OpKind::CopyAssignment | OpKind::MoveAssignment | OpKind::AssignFromFunction
        )
    }

    /// Kinds that take a receiver pointer as their first parameter.
    pub const fn has_receiver(self) -> bool {
        self.is_constructor() || self.is_assignment()
    }

    /// Whether an operation of this kind can exist for a type of `category`.
    pub const fn applies_to(self, category: TypeCategory) -> bool {
        match category {
            TypeCategory::Scalar => !matches!(
                self,
                OpKind::Deref
                    | OpKind::AddressOf
                    | OpKind::PtrPlusOffset
                    | OpKind::OffsetPlusPtr
                    | OpKind::PtrMinusOffset
                    | OpKind::PtrMinusPtr
                    | OpKind::NullToPtr
                    | OpKind::PtrToVoidPtr
                    | OpKind::VoidPtrToPtr
                    | OpKind::CtorFromFunction
                    | OpKind::AssignFromFunction
            ),
            TypeCategory::Derived => matches!(
                self,
                OpKind::DefaultCtor
                    | OpKind::CopyCtor
                    | OpKind::MoveCtor
                    | OpKind::CopyAssignment
                    | OpKind::MoveAssignment
                    | OpKind::Equal
                    | OpKind::Less
                    | OpKind::Increment
                    | OpKind::Decrement
                    | OpKind::Deref
                    | OpKind::AddressOf
                    | OpKind::PtrPlusOffset
                    | OpKind::OffsetPlusPtr
                    | OpKind::PtrMinusOffset
                    | OpKind::PtrMinusPtr
                    | OpKind::NullToPtr
                    | OpKind::PtrToVoidPtr
                    | OpKind::VoidPtrToPtr
            ),
            TypeCategory::Delegate | TypeCategory::ClassDelegate => matches!(
                self,
                OpKind::DefaultCtor
                    | OpKind::CopyCtor
                    | OpKind::MoveCtor
                    | OpKind::CopyAssignment
                    | OpKind::MoveAssignment
                    | OpKind::Equal
                    | OpKind::CtorFromFunction
                    | OpKind::AssignFromFunction
            ),
            TypeCategory::Class => self.special_member().is_some(),
            TypeCategory::Other => false,
        }
    }
}

/// Extra discriminator of an operation beyond its owning type and kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OpAux {
    None,
    /// Source type of a conversion.
    Type(Idx),
    /// Function bound by a delegate constructor or assignment.
    Function(FnId),
}

/// Identity of a synthesized operation within a compile unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct OpKey {
    /// Owning type: the receiver's type for constructors and assignments,
    /// the operand type otherwise.
    pub ty: Idx,
    pub kind: OpKind,
    pub aux: OpAux,
}

impl OpKey {
    #[inline]
    pub const fn new(ty: Idx, kind: OpKind) -> Self {
        OpKey {
            ty,
            kind,
            aux: OpAux::None,
        }
    }

    #[inline]
    pub const fn with_type(ty: Idx, kind: OpKind, source: Idx) -> Self {
        OpKey {
            ty,
            kind,
            aux: OpAux::Type(source),
        }
    }

    #[inline]
    pub const fn with_function(ty: Idx, kind: OpKind, func: FnId) -> Self {
        OpKey {
            ty,
            kind,
            aux: OpAux::Function(func),
        }
    }

    /// Whether `aux` has the shape `kind` takes: a source type for the
    /// converting constructors, a bound function for delegate binding, and
    /// nothing for every other kind.
    pub const fn is_well_formed(&self) -> bool {
        match self.kind {
            OpKind::ConvertingCtor | OpKind::PtrToVoidPtr => matches!(self.aux, OpAux::Type(_)),
            OpKind::CtorFromFunction | OpKind::AssignFromFunction => {
                matches!(self.aux, OpAux::Function(_))
            }
            _ => matches!(self.aux, OpAux::None),
        }
    }

    /// Category of the cache that owns this operation.
    ///
    /// Equal to the owning type's category except for `void*`-to-integer
    /// conversions, which belong to the pointer family.
    pub fn cache_category(&self, pool: &Pool) -> TypeCategory {
        if self.kind == OpKind::VoidPtrToInt {
            TypeCategory::Derived
        } else {
            pool.category(self.ty)
        }
    }
}
