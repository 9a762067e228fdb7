//! End-to-end scenarios through the public API: a binder's view of the engine.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use clasp_ir::Span;
use clasp_synth::persist::{decode_ops, encode_ops};
use clasp_synth::{
    BinOpcode, CallSite, ConstValue, Instr, InstrBuffer, OpKey, OpKind, OperatorGroup,
    SynthConfig, SynthSession, ValueId, Viability, ViableSet,
};
use clasp_types::{
    Argument, ClassBody, FnFlags, FnId, FunctionSymbol, Idx, MemberVar, SpecialMember,
    SpecialMembers, TypeCategory,
};
use pretty_assertions::assert_eq;

fn call(session: &mut SynthSession, group: OperatorGroup, args: &[Argument]) -> ViableSet {
    let name = session.intern(group.name());
    session.collect_viable_functions(&CallSite::new(name, args, Span::new(100, 120)))
}

fn receiver(session: &mut SynthSession, ty: Idx) -> Argument {
    Argument::rvalue(session.pool_mut().pointer(ty))
}

fn define(session: &mut SynthSession, name: &str, body: ClassBody) -> Idx {
    let name = session.intern(name);
    let class = session.pool_mut().declare_class(name, Span::DUMMY);
    session.pool_mut().define_class(class, body).unwrap();
    class
}

fn members(session: &SynthSession, fields: &[(&str, Idx)]) -> Vec<MemberVar> {
    fields
        .iter()
        .map(|&(name, ty)| MemberVar::new(session.intern(name), ty))
        .collect()
}

fn body_of(session: &mut SynthSession, func: FnId) -> Vec<Instr> {
    let mut out = InstrBuffer::new();
    let params = out.params(session.fns().get(func).arity());
    session.generate(func, &mut out, &params).unwrap();
    out.into_instrs()
}

fn v(raw: u32) -> ValueId {
    ValueId::new(raw)
}

#[test]
fn int_addition() {
    let mut s = SynthSession::default();
    let set = call(
        &mut s,
        OperatorGroup::Plus,
        &[Argument::lvalue(Idx::INT32), Argument::rvalue(Idx::INT32)],
    );
    let [add] = set.functions() else {
        panic!("expected a single candidate: {:?}", set.functions());
    };
    assert_eq!(s.origin(*add), Some(OpKey::new(Idx::INT32, OpKind::Add)));
    assert_eq!(
        body_of(&mut s, *add),
        vec![Instr::Binary {
            dst: v(2),
            op: BinOpcode::Add,
            lhs: v(0),
            rhs: v(1),
        }]
    );
}

#[test]
fn point_default_and_copy() {
    let mut s = SynthSession::default();
    let fields = members(&s, &[("x", Idx::INT32), ("y", Idx::INT32)]);
    let point = define(
        &mut s,
        "Point",
        ClassBody {
            members: fields,
            ..ClassBody::default()
        },
    );
    let this = receiver(&mut s, point);

    let defaults = call(&mut s, OperatorGroup::Constructor, &[this]);
    let [ctor] = defaults.functions() else {
        panic!("expected a default constructor");
    };
    let symbol = s.fns().get(*ctor);
    assert!(symbol.flags.contains(FnFlags::SYNTHESIZED));
    assert_eq!(
        body_of(&mut s, *ctor),
        vec![
            Instr::FieldPtr {
                dst: v(1),
                base: v(0),
                aggregate: point,
                index: 0,
            },
            Instr::Const {
                dst: v(2),
                ty: Idx::INT32,
                value: ConstValue::Zero,
            },
            Instr::Store {
                value: v(2),
                ptr: v(1),
            },
            Instr::FieldPtr {
                dst: v(3),
                base: v(0),
                aggregate: point,
                index: 1,
            },
            Instr::Const {
                dst: v(4),
                ty: Idx::INT32,
                value: ConstValue::Zero,
            },
            Instr::Store {
                value: v(4),
                ptr: v(3),
            },
        ]
    );

    let copies = call(&mut s, OperatorGroup::Constructor, &[this, Argument::lvalue(point)]);
    let [copy] = copies.functions() else {
        panic!("expected a copy constructor");
    };
    let loads_then_stores: Vec<_> = body_of(&mut s, *copy)
        .into_iter()
        .filter_map(|instr| match instr {
            Instr::Load { .. } => Some("load"),
            Instr::Store { .. } => Some("store"),
            _ => None,
        })
        .collect();
    assert_eq!(loads_then_stores, vec!["load", "store", "load", "store"]);
}

#[test]
fn suppressed_copy_reports_deferred_error() {
    let mut s = SynthSession::default();
    let fields = members(&s, &[("fd", Idx::INT32)]);
    let nc = define(
        &mut s,
        "NonCopyable",
        ClassBody {
            members: fields,
            suppressed: SpecialMembers::COPY,
            ..ClassBody::default()
        },
    );
    let this = receiver(&mut s, nc);
    let set = call(&mut s, OperatorGroup::Constructor, &[this, Argument::lvalue(nc)]);
    assert!(set.is_empty());

    let diags = set.diagnostics(s.pool(), s.interner());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "copy constructor is suppressed");
    assert_eq!(diags[0].span, Span::new(100, 120));
    assert_eq!(
        diags[0].labels[0].message,
        "required here for `NonCopyable`"
    );
}

#[test]
fn nested_suppression_names_the_member() {
    let mut s = SynthSession::default();
    let fields = members(&s, &[("fd", Idx::INT32)]);
    let nc = define(
        &mut s,
        "NonCopyable",
        ClassBody {
            members: fields,
            suppressed: SpecialMembers::COPY,
            ..ClassBody::default()
        },
    );
    let fields = members(&s, &[("inner", nc)]);
    let holder = define(
        &mut s,
        "Holder",
        ClassBody {
            members: fields,
            ..ClassBody::default()
        },
    );
    let this = receiver(&mut s, holder);
    let set = call(&mut s, OperatorGroup::Constructor, &[this, Argument::lvalue(holder)]);
    let diags = set.diagnostics(s.pool(), s.interner());
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "cannot synthesize copy constructor: a member variable lacks one"
    );
    assert_eq!(
        diags[0].notes,
        vec![
            "member `inner` of type `NonCopyable` cannot provide it".to_owned(),
            "class `NonCopyable` suppresses its copy constructor".to_owned(),
        ]
    );
}

#[test]
fn class_delegate_signature_mismatch() {
    let mut s = SynthSession::default();
    let widget = define(&mut s, "Widget", ClassBody::default());
    let widget_ptr = s.pool_mut().pointer(widget);
    let name = s.intern("OnResize");
    let cd = s.pool_mut().class_delegate(name, &[Idx::INT32, Idx::INT32], Idx::VOID);

    let method_name = s.intern("Widget.scale");
    let param = s.intern("factor");
    let this_name = s.intern("this");
    let method = s.fns_mut().push(
        FunctionSymbol::new(method_name, method_name, widget, Idx::VOID)
            .with_param(this_name, widget_ptr)
            .with_param(param, Idx::FLOAT64)
            .with_flags(FnFlags::MEMBER),
    );

    let this = receiver(&mut s, cd);
    let group = s.intern(OperatorGroup::Constructor.name());
    for args in [
        vec![this, Argument::function(method)],
        vec![this, Argument::rvalue(widget_ptr), Argument::function(method)],
    ] {
        let site = CallSite::new(group, &args, Span::DUMMY);
        assert_eq!(
            s.repository_viable(TypeCategory::ClassDelegate, &site),
            Viability::NotViable
        );
    }
}

#[test]
fn identical_requests_share_identity() {
    let mut s = SynthSession::default();
    let p = s.pool_mut().pointer(Idx::CHAR);
    let args = [Argument::rvalue(p), Argument::rvalue(Idx::INT32)];
    let first = call(&mut s, OperatorGroup::Plus, &args);
    let second = call(&mut s, OperatorGroup::Plus, &args);
    assert_eq!(first.functions(), second.functions());
    assert_eq!(s.caches().len(), 1);
}

#[test]
fn pointer_arithmetic() {
    let mut s = SynthSession::default();
    let p = s.pool_mut().pointer(Idx::INT16);
    let q = s.pool_mut().pointer(Idx::INT32);

    let diff = call(&mut s, OperatorGroup::Minus, &[Argument::rvalue(p), Argument::rvalue(p)]);
    assert_eq!(diff.len(), 1);
    let ret = s.fns().get(diff.functions()[0]).ret;
    assert_eq!(ret, Idx::INT64);

    assert!(call(&mut s, OperatorGroup::Minus, &[Argument::rvalue(p), Argument::rvalue(q)]).is_empty());
    assert!(call(&mut s, OperatorGroup::Plus, &[Argument::rvalue(p), Argument::rvalue(p)]).is_empty());
}

#[test]
fn library_round_trip() {
    let mut lib = SynthSession::default();
    let fields = members(&lib, &[("x", Idx::INT32), ("y", Idx::FLOAT32)]);
    let point = define(
        &mut lib,
        "Point",
        ClassBody {
            members: fields,
            ..ClassBody::default()
        },
    );
    let assign = lib.synthesize_special(point, SpecialMember::CopyAssign);
    let Viability::Viable(fns) = assign else {
        panic!("Point is copy-assignable");
    };
    let bytes = encode_ops(&[lib.persist_op(fns[0]).unwrap()]).unwrap();

    let mut user = SynthSession::new(SynthConfig::default());
    let _first = define(&mut user, "Earlier", ClassBody::default());
    let fields = members(&user, &[("x", Idx::INT32), ("y", Idx::FLOAT32)]);
    let point_here = define(
        &mut user,
        "Point",
        ClassBody {
            members: fields,
            ..ClassBody::default()
        },
    );
    let ops = decode_ops(&bytes).unwrap();
    let restored = user.restore_op(&ops[0]).unwrap();
    assert_eq!(
        user.origin(restored),
        Some(OpKey::new(point_here, OpKind::CopyAssignment))
    );
    assert_eq!(body_of(&mut user, restored).len(), 8);
}
