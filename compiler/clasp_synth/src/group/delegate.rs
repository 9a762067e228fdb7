//! Delegate types: typed function pointers.

use clasp_types::{Argument, DelegateDef, FnId, FnTable, FunctionSymbol, Idx, Pool, Tag};

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
                if lhs == rhs && pool.tag(lhs) == Tag::Delegate {
                    out.push(OpKey::new(lhs, OpKind::Equal));
                }
            }
        }
        _ => {}
    }
    out.materialize(cx)
}

/// Constructor or assignment into a delegate receiver: default (constructor
/// only), copy/move from another delegate value, or binding a function.
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
    let Some(def) = pool.delegate_def(ty) else {
        return;
    };
    if copy == OpKind::CopyCtor && call.args_of(1).is_some() {
        out.push(OpKey::new(ty, OpKind::DefaultCtor));
        return;
    }
    let Some(args) = call.args_of(2) else {
        return;
    };
    let source = &args[1];
    if operand_type(pool, source) == ty {
        out.copy_or_move(ty, source, copy, mv);
    } else if let Some(func) = bound_function(source) {
        if fns
            .try_get(func)
            .is_some_and(|f| signature_matches(pool, def, f))
        {
            out.push(OpKey::with_function(ty, bind, func));
        }
    }
}

/// The function named by a function-reference operand.
pub(super) fn bound_function(arg: &Argument) -> Option<FnId> {
    (arg.ty == Idx::FN_REF).then_some(arg.func).flatten()
}

/// Whether `f` can be stored in a delegate of signature `def`.
///
/// Free functions must match parameter for parameter. A member function
/// matches a delegate whose first parameter is `void*` when its own first
/// parameter is a pointer to its object; this is how the nested delegate of
/// a class delegate holds a method.
pub(crate) fn signature_matches(pool: &Pool, def: &DelegateDef, f: &FunctionSymbol) -> bool {
    if f.ret != def.ret || f.arity() != def.params.len() {
        return false;
    }
    let mut params = f.param_types().zip(def.params.iter().copied());
    if f.is_member() {
        match params.next() {
            Some((object, generic)) if pool.is_pointer(object) && pool.is_void_pointer(generic) => {}
            _ => return false,
        }
    }
    params.all(|(actual, expected)| actual == expected)
}
