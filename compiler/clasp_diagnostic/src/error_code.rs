//! Error codes for compiler diagnostics.
//!
//! Format: E#### where the first digit names the phase:
//! - E2xxx: binding and type errors
//! - E9xxx: internal compiler errors

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Binding Errors (E2xxx)
    /// No viable function for a call site
    E2001,
    /// Implicit special member is suppressed by the class
    E2101,
    /// Base class lacks the special member being synthesized
    E2102,
    /// A member variable's type lacks the special member being synthesized
    E2103,
    /// Class contains itself by value
    E2104,
    /// Special member both declared and suppressed
    E2105,
    /// Base of a class is not a class type
    E2106,
    /// Member variable has an invalid type
    E2107,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Compiled-library metadata could not be decoded
    E9002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2101 => "E2101",
            ErrorCode::E2102 => "E2102",
            ErrorCode::E2103 => "E2103",
            ErrorCode::E2104 => "E2104",
            ErrorCode::E2105 => "E2105",
            ErrorCode::E2106 => "E2106",
            ErrorCode::E2107 => "E2107",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this code belongs to the binder (E2xxx range).
    pub fn is_binding_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
