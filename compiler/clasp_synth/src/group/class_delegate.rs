//! Class delegates: an object pointer paired with a method of that object.

use clasp_types::{ClassDelegateDef, FnTable, FunctionSymbol, Idx, Pool, Tag};

use super::delegate::bound_function;
use super::{operand_type, receiver_type, CallSite, Candidates, OperatorGroup};
use crate::session::SynthCx;
use crate::{OpKey, OpKind, Viability};

pub(crate) fn viable(cx: &mut SynthCx<'_>, group: OperatorGroup, call: &CallSite<'_>) -> Viability {
    let (pool, fns) = (&cx.state.pool, &cx.state.fns);
    let mut out = Candidates::default();
    match group {
        OperatorGroup::Constructor => receive(
            pool,
            fns,
            call,
            [OpKind::CopyCtor, OpKind::MoveCtor, OpKind::CtorFromFunction],
            &mut out,
        ),
        OperatorGroup::Assign => receive(
            pool,
            fns,
            call,
            [
                OpKind::CopyAssignment,
                OpKind::MoveAssignment,
                OpKind::AssignFromFunction,
            ],
            &mut out,
        ),
        OperatorGroup::Equal => {
            if let Some(args) = call.args_of(2) {
                let (lhs, rhs) = (operand_type(pool, &args[0]), operand_type(pool, &args[1]));
                if lhs == rhs && pool.tag(lhs) == Tag::ClassDelegate {
                    out.push(OpKey::new(lhs, OpKind::Equal));
                }
            }
        }
        _ => {}
    }
    out.materialize(cx)
}

/// Default (constructor only), copy/move from another class delegate, or
/// `(receiver, object, method)` binding.
fn receive(
    pool: &Pool,
    fns: &FnTable,
    call: &CallSite<'_>,
    [copy, mv, bind]: [OpKind; 3],
    out: &mut Candidates,
) {
    let Some(ty) = call.args.first().and_then(|r| receiver_type(pool, r)) else {
        return;
    };
    let Some(def) = pool.class_delegate_def(ty) else {
        return;
    };
    match call.arity {
        1 if copy == OpKind::CopyCtor && call.args.len() == 1 => {
            out.push(OpKey::new(ty, OpKind::DefaultCtor));
        }
        2 => {
            if let Some(args) = call.args_of(2) {
                if operand_type(pool, &args[1]) == ty {
                    out.copy_or_move(ty, &args[1], copy, mv);
                }
            }
        }
        3 => {
            let Some(args) = call.args_of(3) else {
                return;
            };
            let object = operand_type(pool, &args[1]);
            let Some(func) = bound_function(&args[2]) else {
                return;
            };
            if fns
                .try_get(func)
                .is_some_and(|f| method_matches(pool, def, object, f))
            {
                out.push(OpKey::with_function(ty, bind, func));
            }
        }
        _ => {}
    }
}

/// `f` is a method of the object `object` points to, with the class
/// delegate's parameters after the object and the same return type.
pub(crate) fn method_matches(
    pool: &Pool,
    def: &ClassDelegateDef,
    object: Idx,
    f: &FunctionSymbol,
) -> bool {
    if !f.is_member() || f.ret != def.ret || f.arity() != def.params.len() + 1 {
        return false;
    }
    let mut params = f.param_types();
    let receiver_ok = params
        .next()
        .is_some_and(|p| p == object && pool.pointee(object).is_some_and(|c| pool.is_class(c)));
    receiver_ok && params.eq(def.params.iter().copied())
}
