//! Stack growth for member-wise class synthesis.
//!
//! Synthesizing a class operation recurses into every class-typed member and
//! base. Deep class hierarchies would exhaust the native stack, so each
//! recursion level runs inside [`ensure_sufficient_stack`].
//!
//! - Native targets grow the stack with `stacker`.
//! - WASM targets call through directly.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
