//! Shared fixtures for engine tests. Only compiled in test builds.

use clasp_ir::Span;
use clasp_types::{
    Argument, ClassBody, FnFlags, FnId, FunctionSymbol, Idx, MemberVar, TypeCategory,
};

use crate::{CallSite, OpKind, OperatorGroup, SynthConfig, SynthSession, Viability, ViableSet};

pub(crate) fn session() -> SynthSession {
    SynthSession::new(SynthConfig::default())
}

/// Collect candidates of every repository for `group(args...)`.
pub(crate) fn collect(session: &mut SynthSession, group: OperatorGroup, args: &[Argument]) -> ViableSet {
    let name = session.intern(group.name());
    session.collect_viable_functions(&CallSite::new(name, args, Span::new(10, 20)))
}

/// Candidates of one repository only.
pub(crate) fn collect_in(
    session: &mut SynthSession,
    category: TypeCategory,
    group: OperatorGroup,
    args: &[Argument],
) -> Viability {
    let name = session.intern(group.name());
    session.repository_viable(category, &CallSite::new(name, args, Span::DUMMY))
}

/// `(owner, kind)` of each synthesized candidate, in order.
pub(crate) fn kinds(session: &SynthSession, fns: &[FnId]) -> Vec<(Idx, OpKind)> {
    fns.iter()
        .filter_map(|&f| session.origin(f))
        .map(|key| (key.ty, key.kind))
        .collect()
}

/// Receiver operand `T*` of a constructor or assignment.
pub(crate) fn receiver(session: &mut SynthSession, ty: Idx) -> Argument {
    Argument::rvalue(session.pool_mut().pointer(ty))
}

pub(crate) fn ptr(session: &mut SynthSession, ty: Idx) -> Idx {
    session.pool_mut().pointer(ty)
}

/// Declare and define a class with the given member variables.
pub(crate) fn class(session: &mut SynthSession, name: &str, members: &[(&str, Idx)]) -> Idx {
    let members = members
        .iter()
        .map(|&(field, ty)| MemberVar::new(session.intern(field), ty))
        .collect();
    class_with(
        session,
        name,
        ClassBody {
            members,
            ..ClassBody::default()
        },
    )
}

pub(crate) fn class_with(session: &mut SynthSession, name: &str, body: ClassBody) -> Idx {
    let name = session.intern(name);
    let idx = session.pool_mut().declare_class(name, Span::DUMMY);
    session
        .pool_mut()
        .define_class(idx, body)
        .unwrap_or_else(|e| panic!("class definition rejected: {e}"));
    idx
}

/// Register a user function.
pub(crate) fn user_fn(
    session: &mut SynthSession,
    name: &str,
    params: &[Idx],
    ret: Idx,
    member: bool,
) -> FnId {
    let name = session.intern(name);
    let mut symbol = FunctionSymbol::new(name, name, Idx::NONE, ret);
    for (i, &ty) in params.iter().enumerate() {
        let param = session.intern(&format!("p{i}"));
        symbol = symbol.with_param(param, ty);
    }
    if member {
        symbol = symbol.with_flags(FnFlags::MEMBER);
    }
    session.fns_mut().push(symbol)
}
