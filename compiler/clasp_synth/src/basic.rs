//! Symbol shapes of the built-in operations.
//!
//! One shape per [`OpKind`]: the parameter list, return type and flags the
//! binder sees. Bodies are produced separately by `generate`.

use clasp_ir::{Name, Span, StringInterner};
use clasp_types::{
    ConversionInfo, ConversionKind, ConversionRank, FnFlags, FunctionSymbol, Idx, Pool, TypeCategory,
};

use crate::conversion::numeric_conversion;
use crate::group::{method_matches, scalar_supports, signature_matches};
use crate::session::SynthCx;
use crate::{OpAux, OpKey, OpKind, OperatorGroup};

/// Parameter names used by synthesized symbols.
struct ParamNames {
    this: Name,
    that: Name,
    left: Name,
    right: Name,
    operand: Name,
    object: Name,
    offset: Name,
}

impl ParamNames {
    fn new(interner: &StringInterner) -> Self {
        ParamNames {
            this: interner.intern("this"),
            that: interner.intern("that"),
            left: interner.intern("left"),
            right: interner.intern("right"),
            operand: interner.intern("operand"),
            object: interner.intern("object"),
            offset: interner.intern("offset"),
        }
    }
}

fn blank(interner: &StringInterner, kind: OpKind, owner: Idx, ret: Idx) -> FunctionSymbol {
    let group = interner.intern(OperatorGroup::of(kind).name());
    FunctionSymbol::new(group, group, owner, ret)
}

fn conversion(target: Idx, source: Idx, kind: ConversionKind) -> ConversionInfo {
    ConversionInfo {
        target,
        source,
        kind,
        rank: ConversionRank::Conversion,
        distance: 1,
    }
}

/// Symbol of the intrinsic operation `key`, or `None` if the owning type has
/// no operation of that shape.
pub(crate) fn intrinsic_symbol(cx: &mut SynthCx<'_>, key: OpKey) -> Option<FunctionSymbol> {
    let interner = cx.interner;
    let pool = &mut cx.state.pool;
    let fns = &cx.state.fns;
    let OpKey { ty, kind, aux } = key;
    let category = pool.category(ty);
    if !key.is_well_formed() || !kind.applies_to(category) || category == TypeCategory::Class {
        return None;
    }
    let n = ParamNames::new(interner);

    if kind.has_receiver() {
        let this = pool.pointer(ty);
        let sym = blank(interner, kind, ty, Idx::VOID)
            .with_flags(FnFlags::INTRINSIC | FnFlags::MEMBER)
            .with_param(n.this, this);
        let sym = match kind {
            OpKind::DefaultCtor => sym,
            OpKind::CopyCtor | OpKind::CopyAssignment => {
                let that = if category == TypeCategory::ClassDelegate {
                    pool.lvalue_ref(ty)
                } else {
                    ty
                };
                sym.with_param(n.that, that)
            }
            OpKind::MoveCtor | OpKind::MoveAssignment => sym.with_param(n.that, pool.rvalue_ref(ty)),
            OpKind::ConvertingCtor => {
                let OpAux::Type(source) = aux else {
                    return None;
                };
                if category != TypeCategory::Scalar || !pool.is_scalar(source) {
                    return None;
                }
                let rule = numeric_conversion(pool.tag(source), pool.tag(ty))?;
                sym.with_param(n.that, source).with_conversion(ConversionInfo {
                    target: ty,
                    source,
                    kind: rule.kind,
                    rank: rule.rank,
                    distance: rule.distance,
                })
            }
            OpKind::NullToPtr => sym
                .with_param(n.that, Idx::NULL)
                .with_conversion(conversion(ty, Idx::NULL, ConversionKind::Implicit)),
            OpKind::PtrToVoidPtr => {
                let OpAux::Type(source) = aux else {
                    return None;
                };
                if !pool.is_void_pointer(ty) || !pool.is_pointer(source) || source == ty {
                    return None;
                }
                sym.with_param(n.that, source)
                    .with_conversion(conversion(ty, source, ConversionKind::Implicit))
            }
            OpKind::VoidPtrToPtr => {
                if pool.is_void_pointer(ty) {
                    return None;
                }
                let void_ptr = pool.void_pointer();
                sym.with_param(n.that, void_ptr)
                    .with_conversion(conversion(ty, void_ptr, ConversionKind::Explicit))
            }
            OpKind::VoidPtrToInt => {
                if ty != Idx::UINT64 {
                    return None;
                }
                let void_ptr = pool.void_pointer();
                sym.with_param(n.that, void_ptr)
                    .with_conversion(conversion(ty, void_ptr, ConversionKind::Explicit))
            }
            OpKind::CtorFromFunction | OpKind::AssignFromFunction => {
                let OpAux::Function(method) = aux else {
                    return None;
                };
                let f = fns.try_get(method)?;
                if category == TypeCategory::ClassDelegate {
                    let object = f.params.first()?.ty;
                    let def = pool.class_delegate_def(ty)?;
                    if !method_matches(pool, def, object, f) {
                        return None;
                    }
                    sym.with_param(n.object, object).with_param(n.that, Idx::FN_REF)
                } else {
                    let def = pool.delegate_def(ty)?;
                    if !signature_matches(pool, def, f) {
                        return None;
                    }
                    sym.with_param(n.that, Idx::FN_REF)
                }
            }
            _ => return None,
        };
        return Some(sym);
    }

    if category == TypeCategory::Scalar && !scalar_supports(kind, pool.tag(ty)) {
        return None;
    }
    let sym = match kind {
        OpKind::Equal => {
            let operand = if category == TypeCategory::ClassDelegate {
                pool.lvalue_ref(ty)
            } else {
                ty
            };
            blank(interner, kind, ty, Idx::BOOL)
                .with_param(n.left, operand)
                .with_param(n.right, operand)
        }
        OpKind::Less => blank(interner, kind, ty, Idx::BOOL)
            .with_param(n.left, ty)
            .with_param(n.right, ty),
        k if k.is_arithmetic() => blank(interner, kind, ty, ty)
            .with_param(n.left, ty)
            .with_param(n.right, ty),
        k if k.is_unary() => blank(interner, kind, ty, ty).with_param(n.operand, ty),
        OpKind::Increment | OpKind::Decrement => {
            blank(interner, kind, ty, ty).with_param(n.operand, pool.lvalue_ref(ty))
        }
        OpKind::Deref => {
            let pointee = pool.pointee(ty).filter(|&p| p != Idx::VOID)?;
            blank(interner, kind, ty, pool.lvalue_ref(pointee)).with_param(n.operand, ty)
        }
        OpKind::AddressOf => {
            let pointee = pool.pointee(ty)?;
            blank(interner, kind, ty, ty).with_param(n.operand, pool.lvalue_ref(pointee))
        }
        OpKind::PtrPlusOffset | OpKind::PtrMinusOffset => blank(interner, kind, ty, ty)
            .with_param(n.left, ty)
            .with_param(n.offset, Idx::INT64),
        OpKind::OffsetPlusPtr => blank(interner, kind, ty, ty)
            .with_param(n.offset, Idx::INT64)
            .with_param(n.right, ty),
        OpKind::PtrMinusPtr => blank(interner, kind, ty, Idx::INT64)
            .with_param(n.left, ty)
            .with_param(n.right, ty),
        _ => return None,
    };
    Some(sym.with_flags(FnFlags::INTRINSIC))
}

/// Symbol of a member-wise class operation. Legality is checked by the caller.
pub(crate) fn class_symbol(
    interner: &StringInterner,
    pool: &mut Pool,
    class: Idx,
    kind: OpKind,
) -> FunctionSymbol {
    let n = ParamNames::new(interner);
    let span = pool.class_def(class).map_or(Span::DUMMY, |def| def.span);
    let sym = if kind == OpKind::Equal {
        let operand = pool.lvalue_ref(class);
        blank(interner, kind, class, Idx::BOOL)
            .with_param(n.left, operand)
            .with_param(n.right, operand)
    } else {
        let this = pool.pointer(class);
        let sym = blank(interner, kind, class, Idx::VOID)
            .with_flags(FnFlags::MEMBER)
            .with_param(n.this, this);
        match kind {
            OpKind::CopyCtor | OpKind::CopyAssignment => sym.with_param(n.that, pool.lvalue_ref(class)),
            OpKind::MoveCtor | OpKind::MoveAssignment => sym.with_param(n.that, pool.rvalue_ref(class)),
            _ => sym,
        }
    };
    sym.with_flags(FnFlags::SYNTHESIZED).with_span(span)
}
