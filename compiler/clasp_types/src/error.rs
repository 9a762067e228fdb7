//! Fatal binding errors.
//!
//! These abort binding of the current compile unit. Synthesis failures that
//! the binder may recover from are not `BindError`s; they travel as values
//! in the engine's `Viability` result.

use std::fmt;

use clasp_diagnostic::{Diagnostic, ErrorCode};
use clasp_ir::Span;

use crate::{Idx, SpecialMember};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// A special member is both declared and suppressed.
    ConflictingSpecifiers {
        class: Idx,
        member: SpecialMember,
        span: Span,
    },
    /// A special member is declared twice.
    DuplicateSpecialMember {
        class: Idx,
        member: SpecialMember,
        span: Span,
    },
    /// The base of a class is not a class (or is the class itself).
    InvalidBase { class: Idx, base: Idx, span: Span },
    /// A member variable has a type that cannot be stored.
    InvalidMemberType { class: Idx, ty: Idx, span: Span },
    /// `define_class` on an index that is not a declared class, or twice.
    NotAClass { ty: Idx, span: Span },
}

impl BindError {
    pub fn span(&self) -> Span {
        match self {
            BindError::ConflictingSpecifiers { span, .. }
            | BindError::DuplicateSpecialMember { span, .. }
            | BindError::InvalidBase { span, .. }
            | BindError::InvalidMemberType { span, .. }
            | BindError::NotAClass { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BindError::ConflictingSpecifiers { .. } | BindError::DuplicateSpecialMember { .. } => {
                ErrorCode::E2105
            }
            BindError::InvalidBase { .. } => ErrorCode::E2106,
            BindError::InvalidMemberType { .. } => ErrorCode::E2107,
            BindError::NotAClass { .. } => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string(), self.span()).with_label("declared here")
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::ConflictingSpecifiers { member, .. } => write!(
                f,
                "{} is both declared and suppressed",
                member.description()
            ),
            BindError::DuplicateSpecialMember { member, .. } => {
                write!(f, "{} is declared more than once", member.description())
            }
            BindError::InvalidBase { .. } => write!(f, "base type is not a class"),
            BindError::InvalidMemberType { .. } => {
                write!(f, "member variable has a type that cannot be stored")
            }
            BindError::NotAClass { ty, .. } => {
                write!(f, "type {ty:?} is not an undefined class declaration")
            }
        }
    }
}

impl std::error::Error for BindError {}
