use clasp_types::ClassBody;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn suppressed_message_names_the_member() {
    let err = SynthError::Suppressed {
        class: Idx::from_raw(20),
        member: SpecialMember::Copy,
    };
    assert_eq!(err.to_string(), "copy constructor is suppressed");
    assert_eq!(err.code(), ErrorCode::E2101);
}

#[test]
fn root_cause_follows_the_chain() {
    let inner = SynthError::Suppressed {
        class: Idx::from_raw(21),
        member: SpecialMember::MoveAssign,
    };
    let err = SynthError::MemberLacks {
        class: Idx::from_raw(22),
        field: Name::from_raw(1),
        ty: Idx::from_raw(21),
        member: SpecialMember::MoveAssign,
        cause: Some(Box::new(inner.clone())),
    };
    assert_eq!(err.root_cause(), &inner);
    assert_eq!(err.class(), Idx::from_raw(22));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn diagnostic_lists_the_chain() {
    let interner = StringInterner::new();
    let mut pool = Pool::new();
    let inner_ty = pool.declare_class(interner.intern("Handle"), Span::DUMMY);
    pool.define_class(inner_ty, ClassBody::default()).unwrap();
    let outer_ty = pool.declare_class(interner.intern("Owner"), Span::DUMMY);
    pool.define_class(outer_ty, ClassBody::default()).unwrap();

    let err = SynthError::MemberLacks {
        class: outer_ty,
        field: interner.intern("handle"),
        ty: inner_ty,
        member: SpecialMember::Copy,
        cause: Some(Box::new(SynthError::Suppressed {
            class: inner_ty,
            member: SpecialMember::Copy,
        })),
    };
    let diag = err.to_diagnostic(&pool, &interner, Span::new(4, 9));
    assert_eq!(diag.code, ErrorCode::E2103);
    assert_eq!(diag.span, Span::new(4, 9));
    assert_eq!(
        diag.notes,
        vec![
            "member `handle` of type `Handle` cannot provide it".to_string(),
            "class `Handle` suppresses its copy constructor".to_string(),
        ]
    );
}

#[test]
fn generate_error_display() {
    let err = GenerateError::ArgumentCount {
        func: FnId::from_raw(7),
        expected: 2,
        found: 1,
    };
    assert_eq!(err.to_string(), "function FnId(7) takes 2 arguments, 1 supplied");
}
