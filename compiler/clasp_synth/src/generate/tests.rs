use clasp_ir::Span;
use clasp_types::{ClassBody, FnId, Idx, MemberVar, SpecialMember};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::*;
use crate::cache::get_or_create;
use crate::test_helpers::{class, class_with, ptr, session, user_fn};
use crate::{InstrBuffer, SynthSession};

fn v(raw: u32) -> ValueId {
    ValueId::new(raw)
}

fn op(s: &mut SynthSession, key: OpKey) -> FnId {
    get_or_create(&mut s.cx(), key).unwrap()
}

fn special(s: &mut SynthSession, class: Idx, member: SpecialMember) -> FnId {
    s.synthesize_special(class, member).functions()[0]
}

/// Generate `func` with fresh parameter values and return the body.
fn body(s: &mut SynthSession, func: FnId) -> (Option<ValueId>, Vec<Instr>) {
    let mut out = InstrBuffer::new();
    let params = out.params(s.fns().get(func).arity());
    let result = s.generate(func, &mut out, &params).unwrap();
    (result, out.into_instrs())
}

// === Scalars ===

#[test]
fn integer_add_is_one_instruction() {
    let mut s = session();
    let add = op(&mut s, OpKey::new(Idx::INT32, OpKind::Add));
    let (result, instrs) = body(&mut s, add);
    assert_eq!(result, Some(v(2)));
    assert_eq!(
        instrs,
        vec![Instr::Binary {
            dst: v(2),
            op: BinOpcode::Add,
            lhs: v(0),
            rhs: v(1),
        }]
    );
}

#[test]
fn opcodes_follow_signedness_and_domain() {
    let mut s = session();
    for (ty, kind, expected) in [
        (Idx::UINT32, OpKind::Div, BinOpcode::UDiv),
        (Idx::INT32, OpKind::Div, BinOpcode::SDiv),
        (Idx::FLOAT64, OpKind::Mul, BinOpcode::FMul),
        (Idx::INT8, OpKind::Shr, BinOpcode::AShr),
        (Idx::UINT8, OpKind::Shr, BinOpcode::LShr),
        (Idx::BOOL, OpKind::BitXor, BinOpcode::Xor),
    ] {
        let func = op(&mut s, OpKey::new(ty, kind));
        let (_, instrs) = body(&mut s, func);
        assert!(
            matches!(instrs.as_slice(), [Instr::Binary { op, .. }] if *op == expected),
            "{kind:?} on {ty:?}: {instrs:?}"
        );
    }
}

#[test]
fn comparisons_pick_predicates() {
    let mut s = session();
    for (ty, kind, expected) in [
        (Idx::FLOAT32, OpKind::Less, CmpPred::FLt),
        (Idx::UINT16, OpKind::Less, CmpPred::ULt),
        (Idx::INT64, OpKind::Less, CmpPred::SLt),
        (Idx::FLOAT64, OpKind::Equal, CmpPred::FEq),
        (Idx::CHAR, OpKind::Equal, CmpPred::Eq),
    ] {
        let func = op(&mut s, OpKey::new(ty, kind));
        let (_, instrs) = body(&mut s, func);
        assert!(
            matches!(instrs.as_slice(), [Instr::Compare { pred, .. }] if *pred == expected),
            "{kind:?} on {ty:?}: {instrs:?}"
        );
    }
}

#[test]
fn unary_plus_emits_nothing() {
    let mut s = session();
    let plus = op(&mut s, OpKey::new(Idx::INT32, OpKind::UnaryPlus));
    let (result, instrs) = body(&mut s, plus);
    assert_eq!(result, Some(v(0)));
    assert!(instrs.is_empty());
}

#[test]
fn default_constructor_stores_zero() {
    let mut s = session();
    let ctor = op(&mut s, OpKey::new(Idx::INT32, OpKind::DefaultCtor));
    let (result, instrs) = body(&mut s, ctor);
    assert_eq!(result, None);
    assert_eq!(
        instrs,
        vec![
            Instr::Const {
                dst: v(1),
                ty: Idx::INT32,
                value: ConstValue::Zero,
            },
            Instr::Store {
                value: v(1),
                ptr: v(0),
            },
        ]
    );
}

#[test]
fn increment_writes_back_and_yields_new_value() {
    let mut s = session();
    let inc = op(&mut s, OpKey::new(Idx::INT32, OpKind::Increment));
    let (result, instrs) = body(&mut s, inc);
    assert_eq!(result, Some(v(3)));
    assert_eq!(
        instrs,
        vec![
            Instr::Load {
                dst: v(1),
                ty: Idx::INT32,
                ptr: v(0),
            },
            Instr::Const {
                dst: v(2),
                ty: Idx::INT32,
                value: ConstValue::One,
            },
            Instr::Binary {
                dst: v(3),
                op: BinOpcode::Add,
                lhs: v(1),
                rhs: v(2),
            },
            Instr::Store {
                value: v(3),
                ptr: v(0),
            },
        ]
    );
}

#[test]
fn pointer_decrement_steps_back_one_element() {
    let mut s = session();
    let p = ptr(&mut s, Idx::INT32);
    let dec = op(&mut s, OpKey::new(p, OpKind::Decrement));
    let (result, instrs) = body(&mut s, dec);
    assert_eq!(result, Some(v(4)));
    assert_eq!(
        instrs[2..4].to_vec(),
        vec![
            Instr::Unary {
                dst: v(3),
                op: UnOpcode::Neg,
                operand: v(2),
            },
            Instr::PtrOffset {
                dst: v(4),
                ptr: v(1),
                offset: v(3),
                elem: Idx::INT32,
            },
        ]
    );
}

#[test]
fn converting_constructor_extends() {
    let mut s = session();
    let ctor = op(
        &mut s,
        OpKey::with_type(Idx::INT64, OpKind::ConvertingCtor, Idx::INT32),
    );
    let (_, instrs) = body(&mut s, ctor);
    assert_eq!(
        instrs,
        vec![
            Instr::Convert {
                dst: v(2),
                op: ConvOp::SignExtend,
                value: v(1),
                to: Idx::INT64,
            },
            Instr::Store {
                value: v(2),
                ptr: v(0),
            },
        ]
    );
}

// === Pointers and delegates ===

#[test]
fn pointer_difference_divides_by_element() {
    let mut s = session();
    let p = ptr(&mut s, Idx::FLOAT64);
    let diff = op(&mut s, OpKey::new(p, OpKind::PtrMinusPtr));
    let (result, instrs) = body(&mut s, diff);
    assert_eq!(result, Some(v(2)));
    assert_eq!(
        instrs,
        vec![Instr::PtrDiff {
            dst: v(2),
            lhs: v(0),
            rhs: v(1),
            elem: Idx::FLOAT64,
        }]
    );
}

#[test]
fn void_pointer_to_integer() {
    let mut s = session();
    let conv = op(&mut s, OpKey::new(Idx::UINT64, OpKind::VoidPtrToInt));
    let (_, instrs) = body(&mut s, conv);
    assert!(matches!(
        instrs.as_slice(),
        [
            Instr::Convert {
                op: ConvOp::PtrToInt,
                ..
            },
            Instr::Store { .. }
        ]
    ));
}

#[test]
fn delegate_binding_stores_function_address() {
    let mut s = session();
    let name = s.intern("Action");
    let d = s.pool_mut().delegate(name, &[], Idx::VOID);
    let f = user_fn(&mut s, "run", &[], Idx::VOID, false);
    let bind = op(&mut s, OpKey::with_function(d, OpKind::CtorFromFunction, f));
    let (_, instrs) = body(&mut s, bind);
    assert_eq!(
        instrs,
        vec![
            Instr::FunctionAddress { dst: v(2), func: f },
            Instr::Store {
                value: v(2),
                ptr: v(0),
            },
        ]
    );
}

#[test]
fn class_delegate_binding_fills_both_fields() {
    let mut s = session();
    let c = class(&mut s, "Window", &[]);
    let cp = ptr(&mut s, c);
    let name = s.intern("OnClose");
    let cd = s.pool_mut().class_delegate(name, &[], Idx::VOID);
    let method = user_fn(&mut s, "Window.close", &[cp], Idx::VOID, true);
    let bind = op(&mut s, OpKey::with_function(cd, OpKind::CtorFromFunction, method));
    let vp = s.pool_mut().void_pointer();

    let (result, instrs) = body(&mut s, bind);
    assert_eq!(result, None);
    assert_eq!(
        instrs,
        vec![
            Instr::FieldPtr {
                dst: v(3),
                base: v(0),
                aggregate: cd,
                index: 0,
            },
            Instr::BaseCast {
                dst: v(4),
                value: v(1),
                to: vp,
            },
            Instr::Store {
                value: v(4),
                ptr: v(3),
            },
            Instr::FieldPtr {
                dst: v(5),
                base: v(0),
                aggregate: cd,
                index: 1,
            },
            Instr::FunctionAddress {
                dst: v(6),
                func: method,
            },
            Instr::Store {
                value: v(6),
                ptr: v(5),
            },
        ]
    );
}

#[test]
fn class_delegate_equality_compares_both_fields() {
    let mut s = session();
    let name = s.intern("OnOpen");
    let cd = s.pool_mut().class_delegate(name, &[], Idx::VOID);
    let eq = op(&mut s, OpKey::new(cd, OpKind::Equal));
    let (result, instrs) = body(&mut s, eq);
    let compares = instrs
        .iter()
        .filter(|i| matches!(i, Instr::Compare { .. }))
        .count();
    assert_eq!(compares, 2);
    assert!(matches!(
        instrs.last(),
        Some(Instr::Binary {
            op: BinOpcode::And,
            dst,
            ..
        }) if Some(*dst) == result
    ));
}

// === Classes ===

#[test]
fn class_default_constructs_each_member() {
    let mut s = session();
    let point = class(&mut s, "Point", &[("x", Idx::INT32), ("y", Idx::INT32)]);
    let ctor = special(&mut s, point, SpecialMember::Default);
    let (result, instrs) = body(&mut s, ctor);
    assert_eq!(result, None);
    let mut expected = Vec::new();
    for (index, base) in [(0, 1), (1, 3)] {
        expected.push(Instr::FieldPtr {
            dst: v(base),
            base: v(0),
            aggregate: point,
            index,
        });
        expected.push(Instr::Const {
            dst: v(base + 1),
            ty: Idx::INT32,
            value: ConstValue::Zero,
        });
        expected.push(Instr::Store {
            value: v(base + 1),
            ptr: v(base),
        });
    }
    assert_eq!(instrs, expected);
}

#[test]
fn class_copy_loads_source_fields() {
    let mut s = session();
    let point = class(&mut s, "Point", &[("x", Idx::INT32)]);
    let copy = special(&mut s, point, SpecialMember::Copy);
    let (_, instrs) = body(&mut s, copy);
    assert_eq!(
        instrs,
        vec![
            Instr::FieldPtr {
                dst: v(2),
                base: v(0),
                aggregate: point,
                index: 0,
            },
            Instr::FieldPtr {
                dst: v(3),
                base: v(1),
                aggregate: point,
                index: 0,
            },
            Instr::Load {
                dst: v(4),
                ty: Idx::INT32,
                ptr: v(3),
            },
            Instr::Store {
                value: v(4),
                ptr: v(2),
            },
        ]
    );
}

#[test]
fn class_equality_ands_member_results() {
    let mut s = session();
    let pair = class(&mut s, "Pair", &[("a", Idx::INT32), ("b", Idx::FLOAT64)]);
    let eq = special(&mut s, pair, SpecialMember::Equal);
    let (result, instrs) = body(&mut s, eq);
    assert_eq!(result, Some(v(12)));
    assert_eq!(
        instrs.last(),
        Some(&Instr::Binary {
            dst: v(12),
            op: BinOpcode::And,
            lhs: v(6),
            rhs: v(11),
        })
    );
}

#[test]
fn empty_class_equality_is_true() {
    let mut s = session();
    let empty = class(&mut s, "Empty", &[]);
    let eq = special(&mut s, empty, SpecialMember::Equal);
    let (result, instrs) = body(&mut s, eq);
    assert_eq!(result, Some(v(2)));
    assert_eq!(
        instrs,
        vec![Instr::Const {
            dst: v(2),
            ty: Idx::BOOL,
            value: ConstValue::Bool(true),
        }]
    );
}

#[test]
fn nested_class_member_becomes_a_call() {
    let mut s = session();
    let point = class(&mut s, "Point", &[("x", Idx::INT32)]);
    let line = class(&mut s, "Line", &[("from", point)]);
    let copy = special(&mut s, line, SpecialMember::Copy);
    let point_copy = special(&mut s, point, SpecialMember::Copy);
    let (_, instrs) = body(&mut s, copy);
    assert_eq!(
        instrs.last(),
        Some(&Instr::Call {
            dst: None,
            func: point_copy,
            args: smallvec![v(2), v(3)],
        })
    );
}

#[test]
fn base_part_goes_through_base_cast() {
    let mut s = session();
    let base = class(&mut s, "Base", &[("id", Idx::INT32)]);
    let child = class_with(
        &mut s,
        "Child",
        ClassBody {
            base: Some(base),
            ..ClassBody::default()
        },
    );
    let assign = special(&mut s, child, SpecialMember::MoveAssign);
    let base_assign = special(&mut s, base, SpecialMember::MoveAssign);
    let base_ptr = ptr(&mut s, base);
    let (_, instrs) = body(&mut s, assign);
    assert_eq!(
        instrs,
        vec![
            Instr::BaseCast {
                dst: v(2),
                value: v(0),
                to: base_ptr,
            },
            Instr::BaseCast {
                dst: v(3),
                value: v(1),
                to: base_ptr,
            },
            Instr::Call {
                dst: None,
                func: base_assign,
                args: smallvec![v(2), v(3)],
            },
        ]
    );
}

#[test]
fn member_fields_are_numbered_from_zero_after_a_base() {
    let mut s = session();
    let base = class(&mut s, "Base", &[("id", Idx::INT32)]);
    let count = s.intern("count");
    let child = class_with(
        &mut s,
        "Child",
        ClassBody {
            base: Some(base),
            members: vec![MemberVar::new(count, Idx::INT64)],
            ..ClassBody::default()
        },
    );
    let default = special(&mut s, child, SpecialMember::Default);
    let (_, instrs) = body(&mut s, default);
    let fields: Vec<_> = instrs
        .iter()
        .filter_map(|instr| match instr {
            Instr::FieldPtr {
                aggregate, index, ..
            } => Some((*aggregate, *index)),
            _ => None,
        })
        .collect();
    assert!(matches!(instrs[0], Instr::BaseCast { .. }));
    assert!(matches!(instrs[1], Instr::Call { .. }));
    assert_eq!(fields, vec![(child, 0)]);
}

#[test]
fn user_declared_member_is_called() {
    let mut s = session();
    let name = s.intern("Handle");
    let handle = s.pool_mut().declare_class(name, Span::DUMMY);
    let handle_ptr = ptr(&mut s, handle);
    let handle_ref = s.pool_mut().lvalue_ref(handle);
    let custom = user_fn(&mut s, "Handle.copy", &[handle_ptr, handle_ref], Idx::VOID, true);
    let fd = s.intern("fd");
    s.pool_mut()
        .define_class(
            handle,
            ClassBody {
                members: vec![MemberVar::new(fd, Idx::INT32)],
                declared: vec![(SpecialMember::Copy, custom)],
                ..ClassBody::default()
            },
        )
        .unwrap();
    let owner = class(&mut s, "Owner", &[("h", handle)]);
    let copy = special(&mut s, owner, SpecialMember::Copy);
    let (_, instrs) = body(&mut s, copy);
    assert!(matches!(
        instrs.last(),
        Some(Instr::Call { func, .. }) if *func == custom
    ));
}

// === Errors ===

#[test]
fn user_function_has_no_body() {
    let mut s = session();
    let f = user_fn(&mut s, "plain", &[], Idx::VOID, false);
    let mut out = InstrBuffer::new();
    assert_eq!(
        s.generate(f, &mut out, &[]),
        Err(GenerateError::NotSynthesized(f))
    );
    assert!(out.is_empty());
}

#[test]
fn unknown_function_is_rejected() {
    let mut s = session();
    let mut out = InstrBuffer::new();
    let missing = FnId::from_raw(404);
    assert_eq!(
        s.generate(missing, &mut out, &[]),
        Err(GenerateError::UnknownFunction(missing))
    );
}

#[test]
fn argument_count_is_checked() {
    let mut s = session();
    let add = op(&mut s, OpKey::new(Idx::INT32, OpKind::Add));
    let mut out = InstrBuffer::new();
    let params = out.params(1);
    assert_eq!(
        s.generate(add, &mut out, &params),
        Err(GenerateError::ArgumentCount {
            func: add,
            expected: 2,
            found: 1,
        })
    );
}
