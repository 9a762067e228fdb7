//! Member-wise synthesis of special members for user classes.
//!
//! A class operation exists when the user neither declared nor suppressed it
//! and every part of the class can perform the same operation: the base
//! first, then each member variable in declaration order. Parts are resolved
//! through the repository that owns their type, so a pointer member gets the
//! pointer family's copy and a class member recurses back here.
//!
//! Classes in progress are tracked on the context; meeting one again means
//! the class contains itself by value. The depth limit counts the chain of
//! classes an operation spans, so a cached operation is checked against it
//! again wherever it is reused, and legality does not depend on the order
//! of earlier queries.

use clasp_ir::{Name, Span};
use clasp_types::{Argument, FnId, Idx, SpecialMember, TypeCategory};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace, warn};

use crate::basic::class_symbol;
use crate::cache::CompositePlan;
use crate::session::SynthCx;
use crate::stack::ensure_sufficient_stack;
use crate::{CallSite, OpKey, OpKind, OperatorGroup, SynthError, Viability};

/// The synthesized `member` of `class`, or why there is none.
///
/// A user-declared member yields `NotViable`: the user's function is the
/// candidate, and the binder already has it.
pub(crate) fn synthesize(cx: &mut SynthCx<'_>, class: Idx, member: SpecialMember) -> Viability {
    let kind = OpKind::from_special(member);
    let key = OpKey::new(class, kind);
    if let Some(func) = cx.state.caches.get(TypeCategory::Class, &key) {
        // A cached operation still has to fit below the classes in progress.
        let depth = cx.state.caches.plan(func).map_or(1, |plan| plan.depth);
        let limit = cx.config.max_synthesis_depth;
        if cx.active.len() + depth > limit {
            return Viability::Illegal(SynthError::DepthExceeded { class, limit });
        }
        return Viability::single(func);
    }
    if let Some(error) = cx.state.caches.failure(&key) {
        return Viability::Illegal(error.clone());
    }

    let Some(def) = cx.state.pool.class_def(class) else {
        return Viability::NotViable;
    };
    if !def.defined {
        return Viability::Illegal(SynthError::Incomplete { class });
    }
    if def.user_declared(member).is_some() {
        trace!(?class, ?member, "user-declared special member");
        return Viability::NotViable;
    }
    if def.is_suppressed(member) {
        return fail(cx, key, SynthError::Suppressed { class, member });
    }
    if cx.active.contains(&class) {
        return Viability::Illegal(SynthError::RecursiveLayout { class });
    }
    let limit = cx.config.max_synthesis_depth;
    if cx.active.len() >= limit {
        warn!(?class, limit, "class synthesis depth limit reached");
        return Viability::Illegal(SynthError::DepthExceeded { class, limit });
    }

    let base = def.base;
    let members: SmallVec<[(Name, Idx); 8]> = def.members.iter().map(|m| (m.name, m.ty)).collect();

    cx.active.push(class);
    let plan = ensure_sufficient_stack(|| compose(cx, class, member, base, &members));
    cx.active.pop();

    match plan {
        Ok(plan) => {
            let symbol = class_symbol(cx.interner, &mut cx.state.pool, class, kind);
            let func = cx.state.fns.push(symbol);
            cx.state.caches.record(TypeCategory::Class, key, func);
            cx.state.caches.set_plan(func, plan);
            debug!(?class, ?member, ?func, members = members.len(), "synthesized class operation");
            Viability::single(func)
        }
        Err(error) if depends_on_path(&error, class) => {
            debug!(?class, ?member, %error, "class operation is illegal on this path");
            Viability::Illegal(error)
        }
        Err(error) => fail(cx, key, error),
    }
}

/// Failures caused by the depth limit, or by a cycle that closes on a class
/// further out, hold only for the current query and are not cached.
fn depends_on_path(error: &SynthError, class: Idx) -> bool {
    match error.root_cause() {
        SynthError::DepthExceeded { .. } => true,
        SynthError::RecursiveLayout { class: cycle } => *cycle != class,
        _ => false,
    }
}

fn fail(cx: &mut SynthCx<'_>, key: OpKey, error: SynthError) -> Viability {
    debug!(class = ?key.ty, kind = ?key.kind, %error, "class operation is illegal");
    cx.state.caches.record_failure(key, error.clone());
    Viability::Illegal(error)
}

fn compose(
    cx: &mut SynthCx<'_>,
    class: Idx,
    member: SpecialMember,
    base: Option<Idx>,
    members: &[(Name, Idx)],
) -> Result<CompositePlan, SynthError> {
    let base_fn = match base {
        Some(base) => Some(resolve_part(cx, base, member).map_err(|cause| {
            SynthError::BaseLacks {
                class,
                base,
                member,
                cause: cause.map(Box::new),
            }
        })?),
        None => None,
    };

    let mut parts = SmallVec::with_capacity(members.len());
    for &(field, ty) in members {
        let func = resolve_part(cx, ty, member).map_err(|cause| SynthError::MemberLacks {
            class,
            field,
            ty,
            member,
            cause: cause.map(Box::new),
        })?;
        parts.push(func);
    }
    let depth = base_fn
        .iter()
        .chain(parts.iter())
        .filter_map(|&func| cx.state.caches.plan(func))
        .map(|plan| plan.depth)
        .max()
        .unwrap_or(0)
        + 1;
    Ok(CompositePlan {
        base: base_fn,
        parts,
        depth,
    })
}

/// The operation a part of type `ty` contributes to `member`.
///
/// `Err(None)` when the part's type simply has no such operation,
/// `Err(Some(_))` when its own synthesis failed.
fn resolve_part(
    cx: &mut SynthCx<'_>,
    ty: Idx,
    member: SpecialMember,
) -> Result<FnId, Option<SynthError>> {
    let kind = OpKind::from_special(member);
    let category = cx.state.pool.category(ty);

    if category == TypeCategory::Class {
        return match synthesize(cx, ty, member) {
            Viability::Viable(fns) => fns.first().copied().ok_or(None),
            Viability::Illegal(error) => Err(Some(error)),
            Viability::NotViable => cx
                .state
                .pool
                .class_def(ty)
                .and_then(|def| def.user_declared(member))
                .ok_or(None),
        };
    }

    let repos = cx.repos;
    let Some(repo) = repos.get(category) else {
        return Err(None);
    };
    let args = part_arguments(cx, ty, member);
    let group = cx.interner.intern(OperatorGroup::of(kind).name());
    let call = CallSite::new(group, &args, Span::DUMMY);
    let wanted = Some(OpKey::new(ty, kind));
    repo.collect_viable_functions(cx, &call)
        .functions()
        .iter()
        .copied()
        .find(|&func| cx.state.caches.origin(func) == wanted)
        .ok_or(None)
}

/// Call-site operands that ask a repository for `member` of `ty`.
fn part_arguments(cx: &mut SynthCx<'_>, ty: Idx, member: SpecialMember) -> SmallVec<[Argument; 2]> {
    let this = Argument::rvalue(cx.state.pool.pointer(ty));
    match member {
        SpecialMember::Default => smallvec![this],
        SpecialMember::Copy | SpecialMember::CopyAssign => smallvec![this, Argument::lvalue(ty)],
        SpecialMember::Move | SpecialMember::MoveAssign => smallvec![this, Argument::rvalue(ty)],
        SpecialMember::Equal => smallvec![Argument::lvalue(ty), Argument::lvalue(ty)],
    }
}
