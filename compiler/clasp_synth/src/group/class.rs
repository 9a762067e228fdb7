//! User classes. Every candidate goes through member-wise synthesis.

use clasp_types::SpecialMember;

use super::{operand_type, receiver_type, CallSite, OperatorGroup};
use crate::class_synth::synthesize;
use crate::session::SynthCx;
use crate::Viability;

pub(crate) fn viable(cx: &mut SynthCx<'_>, group: OperatorGroup, call: &CallSite<'_>) -> Viability {
    let pool = &cx.state.pool;
    match group {
        OperatorGroup::Constructor | OperatorGroup::Assign => {
            let Some(class) = call
                .args
                .first()
                .and_then(|r| receiver_type(pool, r))
                .filter(|&ty| pool.is_class(ty))
            else {
                return Viability::NotViable;
            };
            let (copy, mv) = if group == OperatorGroup::Constructor {
                if call.args_of(1).is_some() {
                    return synthesize(cx, class, SpecialMember::Default);
                }
                (SpecialMember::Copy, SpecialMember::Move)
            } else {
                (SpecialMember::CopyAssign, SpecialMember::MoveAssign)
            };
            let Some(args) = call.args_of(2) else {
                return Viability::NotViable;
            };
            let source = args[1];
            if operand_type(pool, &source) != class {
                return Viability::NotViable;
            }
            let copied = synthesize(cx, class, copy);
            if source.is_rvalue() {
                copied.merge(synthesize(cx, class, mv))
            } else {
                copied
            }
        }
        OperatorGroup::Equal => {
            let Some(args) = call.args_of(2) else {
                return Viability::NotViable;
            };
            let (lhs, rhs) = (operand_type(pool, &args[0]), operand_type(pool, &args[1]));
            if lhs == rhs && pool.is_class(lhs) {
                synthesize(cx, lhs, SpecialMember::Equal)
            } else {
                Viability::NotViable
            }
        }
        _ => Viability::NotViable,
    }
}
