//! Diagnostic system for the Clasp compiler.
//!
//! Diagnostics are plain values: the phase that detects a problem builds one,
//! and the binder decides whether and when to report it. Nothing in this crate
//! prints or aborts.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
