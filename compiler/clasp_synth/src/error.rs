//! Synthesis and generation errors.
//!
//! [`SynthError`] is the "applicable but illegal" outcome of class synthesis.
//! It is never raised; it travels inside [`Viability::Illegal`] and ends up
//! as a deferred error in the binder's viable set.
//!
//! [`Viability::Illegal`]: crate::Viability::Illegal

use std::fmt;

use clasp_diagnostic::{Diagnostic, ErrorCode};
use clasp_ir::{Name, Span, StringInterner};
use clasp_types::{FnId, Idx, Pool, SpecialMember};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SynthError {
    /// The class suppressed this special member.
    Suppressed { class: Idx, member: SpecialMember },
    /// The base class has no usable operation of this kind.
    BaseLacks {
        class: Idx,
        base: Idx,
        member: SpecialMember,
        cause: Option<Box<SynthError>>,
    },
    /// A member variable's type has no usable operation of this kind.
    MemberLacks {
        class: Idx,
        field: Name,
        ty: Idx,
        member: SpecialMember,
        cause: Option<Box<SynthError>>,
    },
    /// The class contains itself by value, directly or through members or bases.
    RecursiveLayout { class: Idx },
    /// The class was declared but never defined.
    Incomplete { class: Idx },
    /// Member-wise synthesis nested deeper than the session allows.
    DepthExceeded { class: Idx, limit: usize },
}

impl SynthError {
    /// The class whose synthesis failed.
    pub fn class(&self) -> Idx {
        match self {
            SynthError::Suppressed { class, .. }
            | SynthError::BaseLacks { class, .. }
            | SynthError::MemberLacks { class, .. }
            | SynthError::RecursiveLayout { class }
            | SynthError::Incomplete { class }
            | SynthError::DepthExceeded { class, .. } => *class,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SynthError::Suppressed { .. } => ErrorCode::E2101,
            SynthError::BaseLacks { .. } => ErrorCode::E2102,
            SynthError::MemberLacks { .. } => ErrorCode::E2103,
            SynthError::RecursiveLayout { .. } => ErrorCode::E2104,
            SynthError::Incomplete { .. } | SynthError::DepthExceeded { .. } => ErrorCode::E9001,
        }
    }

    /// Innermost error of a `BaseLacks`/`MemberLacks` chain.
    pub fn root_cause(&self) -> &SynthError {
        let mut err = self;
        while let SynthError::BaseLacks {
            cause: Some(cause), ..
        }
        | SynthError::MemberLacks {
            cause: Some(cause), ..
        } = err
        {
            err = &**cause;
        }
        err
    }

    /// Render for the binder, with type names resolved and the cause chain as notes.
    pub fn to_diagnostic(&self, pool: &Pool, interner: &StringInterner, span: Span) -> Diagnostic {
        let class = pool.type_name(self.class(), interner);
        let mut diag = Diagnostic::error(self.code(), self.to_string(), span)
            .with_label(format!("required here for `{class}`"));

        let mut err = self;
        loop {
            match err {
                SynthError::BaseLacks { base, cause, .. } => {
                    diag = diag.with_note(format!(
                        "base class `{}` cannot provide it",
                        pool.type_name(*base, interner)
                    ));
                    match cause {
                        Some(cause) => err = &**cause,
                        None => break,
                    }
                }
                SynthError::MemberLacks {
                    field, ty, cause, ..
                } => {
                    diag = diag.with_note(format!(
                        "member `{}` of type `{}` cannot provide it",
                        interner.lookup(*field),
                        pool.type_name(*ty, interner)
                    ));
                    match cause {
                        Some(cause) => err = &**cause,
                        None => break,
                    }
                }
                SynthError::Suppressed { class, member } if !std::ptr::eq(err, self) => {
                    diag = diag.with_note(format!(
                        "class `{}` suppresses its {}",
                        pool.type_name(*class, interner),
                        member.description()
                    ));
                    break;
                }
                _ => break,
            }
        }
        diag
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Suppressed { member, .. } => {
                write!(f, "{} is suppressed", member.description())
            }
            SynthError::BaseLacks { member, .. } => write!(
                f,
                "cannot synthesize {}: base class lacks one",
                member.description()
            ),
            SynthError::MemberLacks { member, .. } => write!(
                f,
                "cannot synthesize {}: a member variable lacks one",
                member.description()
            ),
            SynthError::RecursiveLayout { .. } => write!(f, "class contains itself by value"),
            SynthError::Incomplete { .. } => write!(f, "class is declared but not defined"),
            SynthError::DepthExceeded { limit, .. } => {
                write!(f, "member-wise synthesis nested deeper than {limit} levels")
            }
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::BaseLacks { cause, .. } | SynthError::MemberLacks { cause, .. } => cause
                .as_deref()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

/// Failure to emit the body of a function through [`SynthSession::generate`].
///
/// [`SynthSession::generate`]: crate::SynthSession::generate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// The handle does not name a function of this session.
    UnknownFunction(FnId),
    /// The function was not produced by this engine.
    NotSynthesized(FnId),
    ArgumentCount {
        func: FnId,
        expected: usize,
        found: usize,
    },
    /// A synthesized class operation whose member-wise plan was never recorded.
    MissingPlan(FnId),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::UnknownFunction(func) => write!(f, "unknown function {func:?}"),
            GenerateError::NotSynthesized(func) => {
                write!(f, "function {func:?} has no synthesized body")
            }
            GenerateError::ArgumentCount {
                func,
                expected,
                found,
            } => write!(
                f,
                "function {func:?} takes {expected} arguments, {found} supplied"
            ),
            GenerateError::MissingPlan(func) => {
                write!(f, "no member-wise plan recorded for {func:?}")
            }
        }
    }
}

impl std::error::Error for GenerateError {}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
