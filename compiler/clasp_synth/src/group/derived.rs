//! Pointer types.
//!
//! Pointers are trivially copyable and comparable. Arithmetic is limited to
//! pointer-plus-integer and the difference of two pointers of one type.
//! Offsets are `int64`; narrower integers widen to it, `uint64` does not.

use clasp_types::{Idx, Pool, Tag, TypeCategory};

use super::{operand_type, receiver_type, CallSite, Candidates, OperatorGroup};
use crate::conversion::is_implicitly_convertible;
use crate::session::SynthCx;
use crate::{OpKey, OpKind, Viability};

pub(crate) fn viable(cx: &mut SynthCx<'_>, group: OperatorGroup, call: &CallSite<'_>) -> Viability {
    let pool = &mut cx.state.pool;
    let mut out = Candidates::default();
    match group {
        OperatorGroup::Constructor => constructor(pool, call, &mut out),
        OperatorGroup::Assign => assignment(pool, call, &mut out),
        OperatorGroup::Equal => comparison(pool, call, OpKind::Equal, &mut out),
        OperatorGroup::Less => comparison(pool, call, OpKind::Less, &mut out),
        OperatorGroup::Plus => plus(pool, call, &mut out),
        OperatorGroup::Minus => minus(pool, call, &mut out),
        OperatorGroup::Star => deref(pool, call, &mut out),
        OperatorGroup::Amp => address_of(pool, call, &mut out),
        OperatorGroup::Increment => step(pool, call, OpKind::Increment, &mut out),
        OperatorGroup::Decrement => step(pool, call, OpKind::Decrement, &mut out),
        _ => {}
    }
    out.materialize(cx)
}

fn constructor(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(ty) = call.args.first().and_then(|r| receiver_type(pool, r)) else {
        return;
    };
    if call.args_of(1).is_some() {
        if pool.is_pointer(ty) {
            out.push(OpKey::new(ty, OpKind::DefaultCtor));
        }
        return;
    }
    let Some(args) = call.args_of(2) else {
        return;
    };
    let source = operand_type(pool, &args[1]);

    // `uint64 h(p)` for a generic pointer `p`: owned by the pointer family.
    if ty == Idx::UINT64 {
        if pool.is_void_pointer(source) {
            out.push(OpKey::new(ty, OpKind::VoidPtrToInt));
        }
        return;
    }
    if !pool.is_pointer(ty) {
        return;
    }
    if source == ty {
        out.copy_or_move(ty, &args[1], OpKind::CopyCtor, OpKind::MoveCtor);
    } else if source == Idx::NULL {
        out.push(OpKey::new(ty, OpKind::NullToPtr));
    } else if pool.is_void_pointer(ty) && pool.is_pointer(source) {
        out.push(OpKey::with_type(ty, OpKind::PtrToVoidPtr, source));
    } else if pool.is_void_pointer(source) {
        out.push(OpKey::new(ty, OpKind::VoidPtrToPtr));
    }
}

fn assignment(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(args) = call.args_of(2) else {
        return;
    };
    let Some(ty) = receiver_type(pool, &args[0]).filter(|&ty| pool.is_pointer(ty)) else {
        return;
    };
    let source = operand_type(pool, &args[1]);
    let implicit = source == ty
        || source == Idx::NULL
        || (pool.is_void_pointer(ty) && pool.is_pointer(source));
    if implicit {
        out.copy_or_move(ty, &args[1], OpKind::CopyAssignment, OpKind::MoveAssignment);
    }
}

/// `==` and `<`: same pointer type, a pointer against `null`, or any
/// pointer against `void*`.
fn comparison(pool: &Pool, call: &CallSite<'_>, kind: OpKind, out: &mut Candidates) {
    let Some(args) = call.args_of(2) else {
        return;
    };
    let (lhs, rhs) = (operand_type(pool, &args[0]), operand_type(pool, &args[1]));
    let ty = match (pool.is_pointer(lhs), pool.is_pointer(rhs)) {
        (true, true) if lhs == rhs => lhs,
        (true, true) if pool.is_void_pointer(lhs) => lhs,
        (true, true) if pool.is_void_pointer(rhs) => rhs,
        (true, false) if rhs == Idx::NULL => lhs,
        (false, true) if lhs == Idx::NULL => rhs,
        _ => return,
    };
    out.push(OpKey::new(ty, kind));
}

/// An offset operand must reach the `int64` offset parameter implicitly.
fn is_offset(pool: &Pool, ty: Idx) -> bool {
    pool.is_integer(ty) && (ty == Idx::INT64 || is_implicitly_convertible(pool.tag(ty), Tag::Int64))
}

fn plus(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(args) = call.args_of(2) else {
        return;
    };
    let (lhs, rhs) = (operand_type(pool, &args[0]), operand_type(pool, &args[1]));
    if pool.is_pointer(lhs) && is_offset(pool, rhs) {
        out.push(OpKey::new(lhs, OpKind::PtrPlusOffset));
    } else if is_offset(pool, lhs) && pool.is_pointer(rhs) {
        out.push(OpKey::new(rhs, OpKind::OffsetPlusPtr));
    }
}

fn minus(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(args) = call.args_of(2) else {
        return;
    };
    let (lhs, rhs) = (operand_type(pool, &args[0]), operand_type(pool, &args[1]));
    if !pool.is_pointer(lhs) {
        return;
    }
    if is_offset(pool, rhs) {
        out.push(OpKey::new(lhs, OpKind::PtrMinusOffset));
    } else if rhs == lhs {
        out.push(OpKey::new(lhs, OpKind::PtrMinusPtr));
    }
}

fn deref(pool: &Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(args) = call.args_of(1) else {
        return;
    };
    let ty = operand_type(pool, &args[0]);
    if pool.pointee(ty).is_some_and(|pointee| pointee != Idx::VOID) {
        out.push(OpKey::new(ty, OpKind::Deref));
    }
}

/// `&x`: owned by the pointer type `T*` of an addressable operand `x: T`.
fn address_of(pool: &mut Pool, call: &CallSite<'_>, out: &mut Candidates) {
    let Some(args) = call.args_of(1) else {
        return;
    };
    let ty = operand_type(pool, &args[0]);
    if args[0].is_lvalue() && pool.category(ty) != TypeCategory::Other {
        out.push(OpKey::new(pool.pointer(ty), OpKind::AddressOf));
    }
}

fn step(pool: &Pool, call: &CallSite<'_>, kind: OpKind, out: &mut Candidates) {
    let Some(args) = call.args_of(1) else {
        return;
    };
    let ty = operand_type(pool, &args[0]);
    if args[0].is_lvalue() && pool.is_pointer(ty) {
        out.push(OpKey::new(ty, kind));
    }
}
