//! Per-category operation caches.
//!
//! Each category owns one [`OpCache`] mapping an [`OpKey`] to the single
//! [`FnId`] created for it. Slots go from empty to populated once and are
//! never reset; the symbols themselves live in the session's `FnTable`.

use clasp_types::{FnId, TypeCategory};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::basic::intrinsic_symbol;
use crate::session::SynthCx;
use crate::{OpAux, OpKey, OpKind, SynthError};

/// Memoization table of one type category.
#[derive(Clone, Debug, Default)]
pub struct OpCache {
    slots: FxHashMap<OpKey, FnId>,
}

impl OpCache {
    #[inline]
    pub fn get(&self, key: &OpKey) -> Option<FnId> {
        self.slots.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OpKey, FnId)> {
        self.slots.iter().map(|(key, &func)| (key, func))
    }

    fn insert(&mut self, key: OpKey, func: FnId) {
        let previous = self.slots.insert(key, func);
        debug_assert!(previous.is_none(), "cache slot {key:?} populated twice");
    }
}

/// How a composite operation is assembled from other operations.
///
/// Classes: the base operation, then one operation per member in declaration
/// order. Class delegates: the nested delegate's binding operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CompositePlan {
    pub base: Option<FnId>,
    pub parts: SmallVec<[FnId; 4]>,
    /// Longest chain of synthesized classes this operation spans, itself
    /// included. Zero for class delegates.
    pub depth: usize,
}

/// The caches of one compile unit.
#[derive(Clone, Debug, Default)]
pub struct Caches {
    scalar: OpCache,
    derived: OpCache,
    delegate: OpCache,
    class_delegate: OpCache,
    class: OpCache,
    /// Reverse map: which key produced a function.
    origins: FxHashMap<FnId, OpKey>,
    plans: FxHashMap<FnId, CompositePlan>,
    /// Class operations found illegal, so repeated queries give the same answer.
    failures: FxHashMap<OpKey, SynthError>,
}

impl Caches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache of one category, `None` for [`TypeCategory::Other`].
    pub fn cache(&self, category: TypeCategory) -> Option<&OpCache> {
        match category {
            TypeCategory::Scalar => Some(&self.scalar),
            TypeCategory::Derived => Some(&self.derived),
            TypeCategory::Delegate => Some(&self.delegate),
            TypeCategory::ClassDelegate => Some(&self.class_delegate),
            TypeCategory::Class => Some(&self.class),
            TypeCategory::Other => None,
        }
    }

    fn cache_mut(&mut self, category: TypeCategory) -> Option<&mut OpCache> {
        match category {
            TypeCategory::Scalar => Some(&mut self.scalar),
            TypeCategory::Derived => Some(&mut self.derived),
            TypeCategory::Delegate => Some(&mut self.delegate),
            TypeCategory::ClassDelegate => Some(&mut self.class_delegate),
            TypeCategory::Class => Some(&mut self.class),
            TypeCategory::Other => None,
        }
    }

    pub fn get(&self, category: TypeCategory, key: &OpKey) -> Option<FnId> {
        self.cache(category)?.get(key)
    }

    /// Key a synthesized function was created for.
    pub fn origin(&self, func: FnId) -> Option<OpKey> {
        self.origins.get(&func).copied()
    }

    /// Total number of synthesized functions.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub(crate) fn record(&mut self, category: TypeCategory, key: OpKey, func: FnId) {
        if let Some(cache) = self.cache_mut(category) {
            cache.insert(key, func);
            self.origins.insert(func, key);
        }
    }

    pub(crate) fn plan(&self, func: FnId) -> Option<&CompositePlan> {
        self.plans.get(&func)
    }

    pub(crate) fn set_plan(&mut self, func: FnId, plan: CompositePlan) {
        self.plans.insert(func, plan);
    }

    pub(crate) fn failure(&self, key: &OpKey) -> Option<&SynthError> {
        self.failures.get(key)
    }

    pub(crate) fn record_failure(&mut self, key: OpKey, error: SynthError) {
        self.failures.insert(key, error);
    }
}

/// The intrinsic operation for `key`, created on first request.
///
/// Returns `None` when no operation of that shape exists for the type. Class
/// operations are not created here; they need legality checks first.
pub(crate) fn get_or_create(cx: &mut SynthCx<'_>, key: OpKey) -> Option<FnId> {
    let category = key.cache_category(&cx.state.pool);
    if let Some(func) = cx.state.caches.get(category, &key) {
        trace!(?key, ?func, "operation cache hit");
        return Some(func);
    }
    if category == TypeCategory::Class {
        return None;
    }

    let symbol = intrinsic_symbol(cx, key)?;
    let func = cx.state.fns.push(symbol);
    cx.state.caches.record(category, key, func);
    debug!(?key, ?func, ?category, "materialized intrinsic operation");

    if category == TypeCategory::ClassDelegate {
        compose_class_delegate(cx, key, func);
    }
    Some(func)
}

/// Route a class delegate's method binding through the delegate cache of its
/// nested delegate type.
fn compose_class_delegate(cx: &mut SynthCx<'_>, key: OpKey, func: FnId) {
    let OpAux::Function(method) = key.aux else {
        return;
    };
    if !matches!(key.kind, OpKind::CtorFromFunction | OpKind::AssignFromFunction) {
        return;
    }
    let Some(nested) = cx.state.pool.class_delegate_nested(key.ty) else {
        return;
    };
    let inner = get_or_create(cx, OpKey::with_function(nested, key.kind, method));
    cx.state.caches.set_plan(
        func,
        CompositePlan {
            base: None,
            parts: inner.into_iter().collect(),
            depth: 0,
        },
    );
}
