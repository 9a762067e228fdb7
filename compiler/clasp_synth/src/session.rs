//! The bound-compile-unit owner.
//!
//! A [`SynthSession`] holds everything synthesis needs for one compile unit:
//! the type pool, the function table, the caches, and the repositories.
//! Nothing is global; two sessions in one process share no state.

use clasp_ir::{Name, StringInterner};
use clasp_types::{FnId, FnTable, Idx, Pool, SpecialMember, TypeCategory};
use tracing::debug;

use crate::conversion::numeric_conversion;
use crate::generate::generate_body;
use crate::{
    CallSite, Caches, Emitter, GenerateError, NumericConversion, OpKey, Repositories, ValueId,
    Viability, ViableSet,
};

/// Per-session settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthConfig {
    /// Keep illegal-synthesis outcomes in the viable set as deferred errors.
    pub record_diagnostics: bool,
    /// Deepest chain of nested class synthesis before giving up.
    pub max_synthesis_depth: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            record_diagnostics: true,
            max_synthesis_depth: 256,
        }
    }
}

/// Mutable state of a session.
#[derive(Clone, Debug, Default)]
pub(crate) struct SynthState {
    pub pool: Pool,
    pub fns: FnTable,
    pub caches: Caches,
}

/// Context threaded through groups, caches and class synthesis for one query.
pub struct SynthCx<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) config: &'a SynthConfig,
    pub(crate) repos: &'a Repositories,
    pub(crate) state: &'a mut SynthState,
    /// Classes whose synthesis is in progress, outermost first.
    pub(crate) active: Vec<Idx>,
}

/// Synthesis state of one compile unit.
pub struct SynthSession {
    interner: StringInterner,
    config: SynthConfig,
    repos: Repositories,
    pub(crate) state: SynthState,
}

impl SynthSession {
    pub fn new(config: SynthConfig) -> Self {
        Self::with_interner(StringInterner::new(), config)
    }

    pub fn with_interner(interner: StringInterner, config: SynthConfig) -> Self {
        let repos = Repositories::new(&interner);
        SynthSession {
            interner,
            config,
            repos,
            state: SynthState::default(),
        }
    }

    pub(crate) fn cx(&mut self) -> SynthCx<'_> {
        SynthCx {
            interner: &self.interner,
            config: &self.config,
            repos: &self.repos,
            state: &mut self.state,
            active: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.state.pool
    }

    pub fn fns(&self) -> &FnTable {
        &self.state.fns
    }

    pub fn fns_mut(&mut self) -> &mut FnTable {
        &mut self.state.fns
    }

    pub fn caches(&self) -> &Caches {
        &self.state.caches
    }

    /// Display name of a type.
    pub fn type_name(&self, ty: Idx) -> String {
        self.state.pool.type_name(ty, &self.interner)
    }

    // === Queries ===

    /// Union of every repository's candidates for `call`.
    pub fn collect_viable_functions(&mut self, call: &CallSite<'_>) -> ViableSet {
        let record = self.config.record_diagnostics;
        let repos = &self.repos;
        let mut cx = SynthCx {
            interner: &self.interner,
            config: &self.config,
            repos,
            state: &mut self.state,
            active: Vec::new(),
        };
        let mut set = ViableSet::new();
        for repo in repos.iter() {
            let viability = repo.collect_viable_functions(&mut cx, call);
            set.absorb(viability, call.span, record);
        }
        debug!(
            group = self.interner.lookup(call.group),
            arity = call.arity,
            candidates = set.len(),
            deferred = set.deferred_errors().len(),
            "collected viable functions"
        );
        set
    }

    /// Candidates of one repository only.
    pub fn repository_viable(&mut self, category: TypeCategory, call: &CallSite<'_>) -> Viability {
        let repos = &self.repos;
        let Some(repo) = repos.get(category) else {
            return Viability::NotViable;
        };
        let mut cx = SynthCx {
            interner: &self.interner,
            config: &self.config,
            repos,
            state: &mut self.state,
            active: Vec::new(),
        };
        repo.collect_viable_functions(&mut cx, call)
    }

    /// Ask for a class's special member directly, without a call site.
    pub fn synthesize_special(&mut self, class: Idx, member: SpecialMember) -> Viability {
        crate::class_synth::synthesize(&mut self.cx(), class, member)
    }

    /// The key a synthesized function was created for; `None` for user functions.
    pub fn origin(&self, func: FnId) -> Option<OpKey> {
        self.state.caches.origin(func)
    }

    /// Built-in conversion between two scalar types.
    pub fn conversion(&self, target: Idx, source: Idx) -> Option<NumericConversion> {
        numeric_conversion(self.state.pool.tag(source), self.state.pool.tag(target))
    }

    /// Emit the body of synthesized function `func`.
    ///
    /// `args` are the incoming values, one per parameter. Returns the result
    /// value, `None` for functions returning `void`.
    pub fn generate(
        &mut self,
        func: FnId,
        emitter: &mut dyn Emitter,
        args: &[ValueId],
    ) -> Result<Option<ValueId>, GenerateError> {
        generate_body(&mut self.state, func, emitter, args)
    }
}

impl Default for SynthSession {
    fn default() -> Self {
        Self::new(SynthConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
