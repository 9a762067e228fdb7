//! Operator groups: the per-category applicability rules.
//!
//! A group is a pure strategy. Given a call site it decides which operation
//! keys apply and materializes them through the caches. One module per type
//! category; each exposes a `viable(cx, group, call)` entry point that its
//! repository dispatches to.

mod class;
mod class_delegate;
mod delegate;
mod derived;
mod scalar;

use clasp_ir::{Name, Span};
use clasp_types::{Argument, Idx, Pool};
use smallvec::SmallVec;

use crate::cache::get_or_create;
use crate::session::SynthCx;
use crate::{OpKey, OpKind, Viability};

/// One call site as seen by the engine.
///
/// Constructors and assignments pass the receiver as argument 0, typed `T*`.
#[derive(Copy, Clone, Debug)]
pub struct CallSite<'a> {
    pub group: Name,
    pub arity: usize,
    pub args: &'a [Argument],
    pub span: Span,
}

impl<'a> CallSite<'a> {
    pub fn new(group: Name, args: &'a [Argument], span: Span) -> Self {
        CallSite {
            group,
            arity: args.len(),
            args,
            span,
        }
    }

    /// Override the arity, for binders that check arity before argument types.
    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Arguments, provided the declared arity is `n` and all of them are present.
    pub(crate) fn args_of(&self, n: usize) -> Option<&'a [Argument]> {
        (self.arity == n && self.args.len() == n).then_some(self.args)
    }
}

/// Named operator group, the dispatch key between binder and repositories.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorGroup {
    Constructor,
    Assign,
    Equal,
    Less,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Shl,
    Shr,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,
    Increment,
    Decrement,
}

impl OperatorGroup {
    pub const ALL: [OperatorGroup; 18] = [
        OperatorGroup::Constructor,
        OperatorGroup::Assign,
        OperatorGroup::Equal,
        OperatorGroup::Less,
        OperatorGroup::Plus,
        OperatorGroup::Minus,
        OperatorGroup::Star,
        OperatorGroup::Slash,
        OperatorGroup::Percent,
        OperatorGroup::Shl,
        OperatorGroup::Shr,
        OperatorGroup::Amp,
        OperatorGroup::Pipe,
        OperatorGroup::Caret,
        OperatorGroup::Bang,
        OperatorGroup::Tilde,
        OperatorGroup::Increment,
        OperatorGroup::Decrement,
    ];

    /// Source-level name the binder looks the group up by.
    pub const fn name(self) -> &'static str {
        match self {
            OperatorGroup::Constructor => "@constructor",
            OperatorGroup::Assign => "operator=",
            OperatorGroup::Equal => "operator==",
            OperatorGroup::Less => "operator<",
            OperatorGroup::Plus => "operator+",
            OperatorGroup::Minus => "operator-",
            OperatorGroup::Star => "operator*",
            OperatorGroup::Slash => "operator/",
            OperatorGroup::Percent => "operator%",
            OperatorGroup::Shl => "operator<<",
            OperatorGroup::Shr => "operator>>",
            OperatorGroup::Amp => "operator&",
            OperatorGroup::Pipe => "operator|",
            OperatorGroup::Caret => "operator^",
            OperatorGroup::Bang => "operator!",
            OperatorGroup::Tilde => "operator~",
            OperatorGroup::Increment => "operator++",
            OperatorGroup::Decrement => "operator--",
        }
    }

    /// The group an operation of `kind` is offered under.
    pub const fn of(kind: OpKind) -> OperatorGroup {
        match kind {
            OpKind::DefaultCtor
            | OpKind::CopyCtor
            | OpKind::MoveCtor
            | OpKind::ConvertingCtor
            | OpKind::NullToPtr
            | OpKind::PtrToVoidPtr
            | OpKind::VoidPtrToPtr
            | OpKind::VoidPtrToInt
            | OpKind::CtorFromFunction => OperatorGroup::Constructor,
            OpKind::CopyAssignment | OpKind::MoveAssignment | OpKind::AssignFromFunction => {
                OperatorGroup::Assign
            }
            OpKind::Equal => OperatorGroup::Equal,
            OpKind::Less => OperatorGroup::Less,
            OpKind::Add | OpKind::UnaryPlus | OpKind::PtrPlusOffset | OpKind::OffsetPlusPtr => {
                OperatorGroup::Plus
            }
            OpKind::Sub | OpKind::UnaryMinus | OpKind::PtrMinusOffset | OpKind::PtrMinusPtr => {
                OperatorGroup::Minus
            }
            OpKind::Mul | OpKind::Deref => OperatorGroup::Star,
            OpKind::Div => OperatorGroup::Slash,
            OpKind::Rem => OperatorGroup::Percent,
            OpKind::Shl => OperatorGroup::Shl,
            OpKind::Shr => OperatorGroup::Shr,
            OpKind::BitAnd | OpKind::AddressOf => OperatorGroup::Amp,
            OpKind::BitOr => OperatorGroup::Pipe,
            OpKind::BitXor => OperatorGroup::Caret,
            OpKind::Not => OperatorGroup::Bang,
            OpKind::Complement => OperatorGroup::Tilde,
            OpKind::Increment => OperatorGroup::Increment,
            OpKind::Decrement => OperatorGroup::Decrement,
        }
    }
}

// ── Per-category entry points ───────────────────────────────────────

pub(crate) use class::viable as class_viable;
pub(crate) use class_delegate::method_matches;
pub(crate) use delegate::signature_matches;
pub(crate) use class_delegate::viable as class_delegate_viable;
pub(crate) use delegate::viable as delegate_viable;
pub(crate) use derived::viable as derived_viable;
pub(crate) use scalar::supports as scalar_supports;
pub(crate) use scalar::viable as scalar_viable;

// ── Shared argument helpers ─────────────────────────────────────────

/// Value type of an operand, references stripped.
#[inline]
pub(crate) fn operand_type(pool: &Pool, arg: &Argument) -> Idx {
    pool.strip_reference(arg.ty)
}

/// `T` for a receiver argument of type `T*`.
#[inline]
pub(crate) fn receiver_type(pool: &Pool, arg: &Argument) -> Option<Idx> {
    pool.pointee(operand_type(pool, arg))
}

/// Collects the keys a group found applicable and materializes them in order.
#[derive(Default)]
pub(crate) struct Candidates {
    keys: SmallVec<[OpKey; 2]>,
}

impl Candidates {
    pub(crate) fn push(&mut self, key: OpKey) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Copy for any source, plus move when the source is a temporary.
    pub(crate) fn copy_or_move(&mut self, ty: Idx, source: &Argument, copy: OpKind, mv: OpKind) {
        self.push(OpKey::new(ty, copy));
        if source.is_rvalue() {
            self.push(OpKey::new(ty, mv));
        }
    }

    pub(crate) fn materialize(self, cx: &mut SynthCx<'_>) -> Viability {
        let fns = self
            .keys
            .into_iter()
            .filter_map(|key| get_or_create(cx, key))
            .collect();
        Viability::from_fns(fns)
    }
}
