use clasp_diagnostic::ErrorCode;
use clasp_ir::Span;
use clasp_types::{Argument, ClassBody, Idx, MemberVar, SpecialMember, SpecialMembers, TypeCategory};
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{class, class_with, collect, kinds, receiver, session};
use crate::{ConvOp, OpKind, OperatorGroup};

fn noncopyable(s: &mut SynthSession) -> Idx {
    let field = s.intern("fd");
    class_with(
        s,
        "NonCopyable",
        ClassBody {
            members: vec![MemberVar::new(field, Idx::INT32)],
            suppressed: SpecialMembers::COPY,
            ..ClassBody::default()
        },
    )
}

#[test]
fn default_config() {
    let config = SynthConfig::default();
    assert!(config.record_diagnostics);
    assert_eq!(config.max_synthesis_depth, 256);
    assert_eq!(SynthSession::default().config(), &config);
}

#[test]
fn fresh_session_is_empty() {
    let s = session();
    assert!(s.caches().is_empty());
    assert!(s.fns().is_empty());
    assert_eq!(s.pool().len(), Idx::PRIMITIVE_COUNT as usize);
}

#[test]
fn sessions_share_nothing() {
    let mut a = session();
    let mut b = session();
    let args = [Argument::rvalue(Idx::INT32), Argument::rvalue(Idx::INT32)];
    collect(&mut a, OperatorGroup::Plus, &args);
    assert_eq!(a.caches().len(), 1);
    assert!(b.caches().is_empty());
    let set = collect(&mut b, OperatorGroup::Plus, &args);
    assert_eq!(set.len(), 1);
}

#[test]
fn repeated_collection_returns_identical_functions() {
    let mut s = session();
    let args = [Argument::lvalue(Idx::UINT16), Argument::lvalue(Idx::UINT16)];
    let first = collect(&mut s, OperatorGroup::Pipe, &args);
    let second = collect(&mut s, OperatorGroup::Pipe, &args);
    assert_eq!(first.functions(), second.functions());
    assert_eq!(s.fns().len(), 1);
}

#[test]
fn class_candidates_merge_with_other_repositories() {
    let mut s = session();
    let point = class(&mut s, "Point", &[("x", Idx::INT32)]);
    let this = receiver(&mut s, point);
    let set = collect(&mut s, OperatorGroup::Constructor, &[this, Argument::rvalue(point)]);
    assert_eq!(
        kinds(&s, set.functions()),
        vec![(point, OpKind::CopyCtor), (point, OpKind::MoveCtor)]
    );
    assert!(!set.has_deferred_errors());
}

#[test]
fn illegal_copy_is_deferred_with_call_span() {
    let mut s = session();
    let nc = noncopyable(&mut s);
    let this = receiver(&mut s, nc);
    let set = collect(&mut s, OperatorGroup::Constructor, &[this, Argument::lvalue(nc)]);
    assert!(set.is_empty());
    assert_eq!(set.deferred_errors().len(), 1);
    assert_eq!(set.deferred_errors()[0].span, Span::new(10, 20));

    let diags = set.diagnostics(s.pool(), s.interner());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E2101);
    assert_eq!(diags[0].message, "copy constructor is suppressed");
}

#[test]
fn rvalue_source_falls_back_to_move() {
    let mut s = session();
    let nc = noncopyable(&mut s);
    let this = receiver(&mut s, nc);
    let set = collect(&mut s, OperatorGroup::Constructor, &[this, Argument::rvalue(nc)]);
    assert_eq!(kinds(&s, set.functions()), vec![(nc, OpKind::MoveCtor)]);
    assert!(!set.has_deferred_errors());
}

#[test]
fn diagnostics_can_be_switched_off() {
    let mut s = SynthSession::new(SynthConfig {
        record_diagnostics: false,
        ..SynthConfig::default()
    });
    let nc = noncopyable(&mut s);
    let this = receiver(&mut s, nc);
    let set = collect(&mut s, OperatorGroup::Constructor, &[this, Argument::lvalue(nc)]);
    assert!(set.is_empty());
    assert!(!set.has_deferred_errors());
}

#[test]
fn repository_viable_queries_one_category() {
    let mut s = session();
    let name = s.intern(OperatorGroup::Equal.name());
    let args = [Argument::rvalue(Idx::INT8), Argument::rvalue(Idx::INT8)];
    let call = CallSite::new(name, &args, Span::DUMMY);
    assert!(s.repository_viable(TypeCategory::Scalar, &call).is_viable());
    assert_eq!(
        s.repository_viable(TypeCategory::Derived, &call),
        Viability::NotViable
    );
}

#[test]
fn conversion_query() {
    let s = session();
    let widen = s.conversion(Idx::INT64, Idx::UINT8);
    assert_eq!(widen.map(|c| c.op), Some(ConvOp::ZeroExtend));
    assert_eq!(s.conversion(Idx::BOOL, Idx::INT32), None);
}

#[test]
fn type_names_use_the_session_interner() {
    let mut s = session();
    let point = class(&mut s, "Point", &[]);
    let pp = s.pool_mut().pointer(point);
    assert_eq!(s.type_name(pp), "Point*");
}

#[test]
fn synthesize_special_matches_call_site_result() {
    let mut s = session();
    let point = class(&mut s, "Point", &[("x", Idx::INT32)]);
    let direct = s.synthesize_special(point, SpecialMember::Default);
    let this = receiver(&mut s, point);
    let set = collect(&mut s, OperatorGroup::Constructor, &[this]);
    assert_eq!(direct.functions(), set.functions());
}
