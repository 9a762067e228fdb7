//! Outcomes of viability queries and the binder-facing viable set.

use clasp_diagnostic::Diagnostic;
use clasp_ir::{Span, StringInterner};
use clasp_types::{FnId, Pool};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::SynthError;

/// Result of asking one repository for candidates at one call site.
///
/// "Not applicable" and "applicable but illegal" are different answers: the
/// first contributes nothing silently, the second is kept so the binder can
/// report it if no other candidate wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viability {
    NotViable,
    Viable(SmallVec<[FnId; 2]>),
    Illegal(SynthError),
}

impl Viability {
    pub fn single(func: FnId) -> Self {
        Viability::Viable(smallvec::smallvec![func])
    }

    /// `Viable` for a non-empty list, `NotViable` otherwise.
    pub fn from_fns(fns: SmallVec<[FnId; 2]>) -> Self {
        if fns.is_empty() {
            Viability::NotViable
        } else {
            Viability::Viable(fns)
        }
    }

    #[inline]
    pub fn is_viable(&self) -> bool {
        matches!(self, Viability::Viable(_))
    }

    #[inline]
    pub fn is_illegal(&self) -> bool {
        matches!(self, Viability::Illegal(_))
    }

    pub fn functions(&self) -> &[FnId] {
        match self {
            Viability::Viable(fns) => fns,
            Viability::NotViable | Viability::Illegal(_) => &[],
        }
    }

    /// Combine two answers for one call site. Legal candidates win over
    /// errors; of two errors the first is kept.
    #[must_use]
    pub fn merge(self, other: Viability) -> Viability {
        match (self, other) {
            (Viability::Viable(mut fns), Viability::Viable(more)) => {
                for func in more {
                    if !fns.contains(&func) {
                        fns.push(func);
                    }
                }
                Viability::Viable(fns)
            }
            (v @ Viability::Viable(_), _) | (_, v @ Viability::Viable(_)) => v,
            (err @ Viability::Illegal(_), _) | (Viability::NotViable, err) => err,
        }
    }

    pub fn error(&self) -> Option<&SynthError> {
        match self {
            Viability::Illegal(err) => Some(err),
            _ => None,
        }
    }
}

/// A synthesis failure recorded against a call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferredError {
    pub error: SynthError,
    pub span: Span,
}

/// Candidates collected for one call site, in discovery order, without duplicates.
#[derive(Clone, Debug, Default)]
pub struct ViableSet {
    fns: Vec<FnId>,
    seen: FxHashSet<FnId>,
    deferred: Vec<DeferredError>,
}

impl ViableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate. Returns `false` if it was already present.
    pub fn insert(&mut self, func: FnId) -> bool {
        if self.seen.insert(func) {
            self.fns.push(func);
            true
        } else {
            false
        }
    }

    /// Merge one repository's answer. Illegal outcomes are kept only when
    /// `record` is set.
    pub fn absorb(&mut self, viability: Viability, span: Span, record: bool) {
        match viability {
            Viability::NotViable => {}
            Viability::Viable(fns) => {
                for func in fns {
                    self.insert(func);
                }
            }
            Viability::Illegal(error) => {
                if record {
                    self.deferred.push(DeferredError { error, span });
                }
            }
        }
    }

    pub fn functions(&self) -> &[FnId] {
        &self.fns
    }

    pub fn contains(&self, func: FnId) -> bool {
        self.seen.contains(&func)
    }

    pub fn len(&self) -> usize {
        self.fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }

    pub fn deferred_errors(&self) -> &[DeferredError] {
        &self.deferred
    }

    pub fn has_deferred_errors(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Diagnostics for the deferred errors, for a binder that found no candidate.
    pub fn diagnostics(&self, pool: &Pool, interner: &StringInterner) -> Vec<Diagnostic> {
        self.deferred
            .iter()
            .map(|d| d.error.to_diagnostic(pool, interner, d.span))
            .collect()
    }
}
