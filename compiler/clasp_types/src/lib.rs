//! Type system model for Clasp.
//!
//! - [`Idx`]: 32-bit handle into the [`Pool`]; type equality is index equality
//! - [`Tag`] / [`TypeCategory`]: what kind of type an index names, and which
//!   operation repository owns it
//! - [`ClassDef`], [`DelegateDef`], [`ClassDelegateDef`]: nominal declarations
//! - [`FunctionSymbol`] / [`FnTable`] / [`FnId`]: every callable of a compile
//!   unit, user-written or compiler-synthesized, lives in one arena and is
//!   referred to by handle
//!
//! Derived types (`T*`, `T&`, `T&&`) are interned structurally, nominal types
//! (classes, delegates) are fresh on every declaration.

mod class;
mod error;
mod function;
mod idx;
mod pool;
mod tag;
mod value_category;

pub use class::{
    ClassBody, ClassDef, ClassDelegateDef, DelegateDef, MemberVar, SpecialMember, SpecialMembers,
};
pub use error::BindError;
pub use function::{
    ConversionInfo, ConversionKind, ConversionRank, FnFlags, FnId, FnTable, FunctionSymbol, Param,
};
pub use idx::Idx;
pub use pool::Pool;
pub use tag::{Tag, TypeCategory};
pub use value_category::{Argument, ValueCategory};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{FnId, Idx};
    clasp_ir::static_assert_size!(Idx, 4);
    clasp_ir::static_assert_size!(FnId, 4);
}
