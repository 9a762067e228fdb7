//! Nominal type declarations: classes, delegates and class delegates.

use bitflags::bitflags;
use clasp_ir::{Name, Span};
use rustc_hash::FxHashMap;

use crate::{FnId, Idx};

/// A special member function the compiler may synthesize for a class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SpecialMember {
    Default,
    Copy,
    Move,
    CopyAssign,
    MoveAssign,
    Equal,
}

impl SpecialMember {
    pub const ALL: [SpecialMember; 6] = [
        SpecialMember::Default,
        SpecialMember::Copy,
        SpecialMember::Move,
        SpecialMember::CopyAssign,
        SpecialMember::MoveAssign,
        SpecialMember::Equal,
    ];

    /// Human-readable description used in diagnostics.
    pub const fn description(self) -> &'static str {
        match self {
            SpecialMember::Default => "default constructor",
            SpecialMember::Copy => "copy constructor",
            SpecialMember::Move => "move constructor",
            SpecialMember::CopyAssign => "copy assignment",
            SpecialMember::MoveAssign => "move assignment",
            SpecialMember::Equal => "equality operator",
        }
    }

    pub const fn flag(self) -> SpecialMembers {
        match self {
            SpecialMember::Default => SpecialMembers::DEFAULT,
            SpecialMember::Copy => SpecialMembers::COPY,
            SpecialMember::Move => SpecialMembers::MOVE,
            SpecialMember::CopyAssign => SpecialMembers::COPY_ASSIGN,
            SpecialMember::MoveAssign => SpecialMembers::MOVE_ASSIGN,
            SpecialMember::Equal => SpecialMembers::EQUAL,
        }
    }
}

bitflags! {
    /// Set of special members, used for `= suppress` declarations.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SpecialMembers: u8 {
        const DEFAULT = 1 << 0;
        const COPY = 1 << 1;
        const MOVE = 1 << 2;
        const COPY_ASSIGN = 1 << 3;
        const MOVE_ASSIGN = 1 << 4;
        const EQUAL = 1 << 5;
    }
}

/// A member variable, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberVar {
    pub name: Name,
    pub ty: Idx,
    pub span: Span,
}

impl MemberVar {
    pub fn new(name: Name, ty: Idx) -> Self {
        MemberVar {
            name,
            ty,
            span: Span::DUMMY,
        }
    }
}

/// The body of a class declaration, supplied once names are resolved.
#[derive(Clone, Debug, Default)]
pub struct ClassBody {
    pub base: Option<Idx>,
    pub members: Vec<MemberVar>,
    /// Special members the user wrote, with the function implementing each.
    pub declared: Vec<(SpecialMember, FnId)>,
    /// Special members the user suppressed.
    pub suppressed: SpecialMembers,
}

/// A registered class.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: Name,
    pub span: Span,
    pub base: Option<Idx>,
    pub members: Vec<MemberVar>,
    pub declared: FxHashMap<SpecialMember, FnId>,
    pub suppressed: SpecialMembers,
    /// `false` between `declare_class` and `define_class`.
    pub defined: bool,
}

impl ClassDef {
    #[inline]
    pub fn user_declared(&self, member: SpecialMember) -> Option<FnId> {
        self.declared.get(&member).copied()
    }

    #[inline]
    pub fn is_suppressed(&self, member: SpecialMember) -> bool {
        self.suppressed.contains(member.flag())
    }
}

/// A delegate: a typed function pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegateDef {
    pub name: Name,
    pub params: Vec<Idx>,
    pub ret: Idx,
}

/// A class delegate: an object pointer bound to one of its methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDelegateDef {
    pub name: Name,
    pub params: Vec<Idx>,
    pub ret: Idx,
    /// Delegate type of the bound method, with a leading `void*` object
    /// parameter. Created on first request.
    pub nested: Option<Idx>,
}
