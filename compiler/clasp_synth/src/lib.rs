//! Operation synthesis for the Clasp binder.
//!
//! For every type category the language defines a set of operations the
//! programmer never writes: constructors, assignments, comparisons,
//! arithmetic, pointer arithmetic, conversions. This crate manufactures them
//! on demand and offers them to overload resolution.
//!
//! # Flow
//!
//! ```text
//! binder -> SynthSession::collect_viable_functions(call)
//!        -> each OperationRepository looks up call.group in its group table
//!        -> group strategy picks applicable OpKeys from the argument shapes
//!        -> Caches::get_or_create materializes a FunctionSymbol on first use
//!        -> FnIds flow back into the ViableSet
//! ```
//!
//! User classes go through [`class_synth`], which checks legality and asks
//! the repository owning each member's type for that member's operation.
//! Code generation later calls [`SynthSession::generate`] on a returned
//! function to emit its body into an [`Emitter`].
//!
//! # Identity
//!
//! One compile unit owns one [`SynthSession`]. Within it, the operation for a
//! given `(type, kind, aux)` is created once and the same [`FnId`] is handed
//! out on every later request.
//!
//! [`FnId`]: clasp_types::FnId

mod basic;
mod cache;
mod class_synth;
mod conversion;
mod error;
mod generate;
mod group;
pub mod ir;
mod op;
pub mod persist;
mod repository;
mod session;
mod stack;
#[cfg(test)]
mod test_helpers;
mod viable;

pub use cache::{Caches, OpCache};
pub use conversion::{numeric_conversion, NumericConversion};
pub use error::{GenerateError, SynthError};
pub use group::{CallSite, OperatorGroup};
pub use ir::{BinOpcode, CmpPred, ConstValue, ConvOp, Emitter, Instr, InstrBuffer, UnOpcode, ValueId};
pub use op::{OpAux, OpKey, OpKind};
pub use persist::{PersistError, PersistedOp};
pub use repository::{
    ClassDelegateRepository, ClassRepository, DelegateRepository, DerivedRepository,
    OperationRepository, Repositories, ScalarRepository,
};
pub use session::{SynthConfig, SynthSession};
pub use viable::{DeferredError, Viability, ViableSet};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for engine diagnostics.
///
/// Call once at startup; later calls do nothing. Output is enabled only when
/// `RUST_LOG` is set, e.g. `RUST_LOG=clasp_synth=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
