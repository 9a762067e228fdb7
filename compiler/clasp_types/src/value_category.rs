//! Call-site operands.

use crate::{FnId, Idx};

/// Whether an operand names storage or a temporary.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ValueCategory {
    /// Addressable operand: a variable, a member, a dereferenced pointer.
    Lvalue,
    /// Transient operand: a literal, a call result, a moved-from value.
    #[default]
    Rvalue,
}

/// One operand of a call site as seen by overload resolution.
///
/// Function-reference operands (`&Foo`, `obj.Method` used as a value) carry
/// the referenced function and have type [`Idx::FN_REF`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Argument {
    pub ty: Idx,
    pub category: ValueCategory,
    pub func: Option<FnId>,
}

impl Argument {
    #[inline]
    pub const fn lvalue(ty: Idx) -> Self {
        Argument {
            ty,
            category: ValueCategory::Lvalue,
            func: None,
        }
    }

    #[inline]
    pub const fn rvalue(ty: Idx) -> Self {
        Argument {
            ty,
            category: ValueCategory::Rvalue,
            func: None,
        }
    }

    /// An operand that names a function.
    #[inline]
    pub const fn function(func: FnId) -> Self {
        Argument {
            ty: Idx::FN_REF,
            category: ValueCategory::Rvalue,
            func: Some(func),
        }
    }

    #[inline]
    pub fn is_lvalue(&self) -> bool {
        self.category == ValueCategory::Lvalue
    }

    #[inline]
    pub fn is_rvalue(&self) -> bool {
        self.category == ValueCategory::Rvalue
    }
}
