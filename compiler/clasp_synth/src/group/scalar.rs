//! Built-in scalar types: `bool`, `char`, the integers and the floats.

use clasp_types::{Idx, Pool, Tag, TypeCategory};

use super::{operand_type, receiver_type, CallSite, Candidates, OperatorGroup};
use crate::conversion::{is_implicitly_convertible, numeric_conversion};
use crate::session::SynthCx;
use crate::{OpKey, OpKind, Viability};

pub(crate) fn viable(cx: &mut SynthCx<'_>, group: OperatorGroup, call: &CallSite<'_>) -> Viability {
    let pool = &cx.state.pool;
    let mut out = Candidates::default();
    match group {
        OperatorGroup::Constructor => constructor(pool, call, &mut out),
        OperatorGroup::Assign => assignment(pool, call, &mut out),
        OperatorGroup::Equal => binary(pool, call, OpKind::Equal, &mut out),
        OperatorGroup::Less => binary(pool, call, OpKind::Less, &mut out),
        OperatorGroup::Plus => match call.arity {
            1 => unary(pool, call, OpKind::UnaryPlus, &mut out),
            _ => binary(pool, call, OpKind::Add, &mut out),
        },
        OperatorGroup::Minus => match call.arity {
            1 => unary(pool, call, OpKind::UnaryMinus, &mut out),
            _ => binary(pool, call, OpKind::Sub, &mut out),
        },
        OperatorGroup::Star => binary(pool, call, OpKind::Mul, &mut out),
        OperatorGroup::Slash => binary(pool, call, OpKind::Div, &mut out),
        OperatorGroup::Percent => binary(pool, call, OpKind::Rem, &mut out),
        OperatorGroup::Shl => binary(pool, call, OpKind::Shl, &mut out),
        OperatorGroup::Shr => binary(pool, call, OpKind::Shr, &mut out),
        OperatorGroup::Amp => binary(pool, call, OpKind::BitAnd, &mut out),
        OperatorGroup::Pipe => binary(pool, call, OpKind::BitOr, &mut out),
        OperatorGroup::Caret => binary(pool, call, OpKind::BitXor, &mut out),
        OperatorGroup::Bang => unary(pool, call, OpKind::Not, &mut out),
        OperatorGroup::Tilde => unary(pool, call, OpKind::Complement, &mut out),
        OperatorGroup::Increment => step(pool, call, OpKind::Increment, &mut out),
        OperatorGroup::Decrement => step(pool, call, OpKind::Decrement, &mut out),
    }
    out.materialize(cx)
}

/// Whether a scalar of type `tag` has an operation of `kind`.
pub(crate) fn supports(kind: OpKind, tag: Tag) -> bool {
    if tag.category() != TypeCategory::Scalar {
        return false;
    }
    match kind {
        OpKind::DefaultCtor
        | OpKind::CopyCtor
        | OpKind::MoveCtor
        | OpKind::CopyAssignment
        | OpKind::MoveAssignment
        | OpKind::ConvertingCtor
        | OpKind::Equal => true,
        OpKind::Less => tag.is_numeric() || tag == Tag::Char,
        OpKind::Add
        | OpKind::Sub
        | OpKind::Mul
        | OpKind::Div
        | OpKind::UnaryPlus
        | OpKind::UnaryMinus
        | OpKind::Increment
        | OpKind::Decrement => tag.is_numeric(),
        OpKind::Rem | OpKind::Shl | OpKind::Shr | OpKind::Complement => tag.is_integer(),
        OpKind::BitAnd | OpKind::BitOr | OpKind::BitXor => tag.is_integer() || tag == Tag::Bool,
        OpKind::Not => tag == Tag::Bool,
        _ => false,
    }
}

/// `from` can be passed where `to` is expected without a cast.
fn accepts(pool: &Pool, from: Idx, to: Idx) -> bool {
    from == to || is_implicitly_convertible(pool.tag(from), pool.tag(to))
}

/// Binary operators: each operand type is a candidate; a candidate applies
/// when both operands reach it implicitly.
fn binary(pool: &Pool, call: &CallSite<'_>, kind: OpKind, out: &mut Candidates) {
    let Some(args) = call.args_of(2) else {
        return;
    };
    let (lhs, rhs) = (operand_type(pool, &args[0]), operand_type(pool, &args[1]));
    for ty in [lhs, rhs] {
        if supports(kind, pool.tag(ty)) && accepts(pool, lhs, ty) && accepts(pool, rhs, ty) {
            out.push(OpKey::new(ty, kind));
        }
    }
}

fn unary(pool: &Pool, call: &CallSite<'_>, kind: OpKind, out: &mut Candidates) {
    let Some(args) = call.args_of(1) else {
        return;
    };
    let ty = operand_type(pool, &args[0]);
    if supports(kind, pool.tag(ty)) {
        out.push(OpKey::new(ty, kind));
    }
}

/// `++x` / `--x`: the operand must be addressable.
fn step(pool: &Pool, call: &CallSite<'_>, kind: OpKind, out: &mut Candidates) {
    let Some(args) = call.args_of(1) else {
        return;
    };
    let ty = operand_type(pool, &args[0]);
    if args[0].is_lvalue() && supports(kind, pool.tag(ty)) {
        out.push(OpKey::new(ty, kind));
    }
}

fn constructor(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(receiver) = call.args.first() else {
        return;
    };
    let Some(ty) = receiver_type(pool, receiver).filter(|&ty| pool.is_scalar(ty)) else {
        return;
    };
    if call.args_of(1).is_some() {
        out.push(OpKey::new(ty, OpKind::DefaultCtor));
    } else if let Some(args) = call.args_of(2) {
        let source = operand_type(pool, &args[1]);
        if source == ty {
            out.copy_or_move(ty, &args[1], OpKind::CopyCtor, OpKind::MoveCtor);
        } else if numeric_conversion(pool.tag(source), pool.tag(ty)).is_some() {
            out.push(OpKey::with_type(ty, OpKind::ConvertingCtor, source));
        }
    }
}

fn assignment(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(args) = call.args_of(2) else {
        return;
    };
    let Some(ty) = receiver_type(pool, &args[0]).filter(|&ty| pool.is_scalar(ty)) else {
        return;
    };
    if accepts(pool, operand_type(pool, &args[1]), ty) {
        out.copy_or_move(ty, &args[1], OpKind::CopyAssignment, OpKind::MoveAssignment);
    }
}
