//! Diagnostic codes.
//!
//! One variant per row in the "Diagnostics codes (minimal required set)" table
//! of the engine design. `severity()` gives each code's default severity;
//! `unknown-dispatcher-registry` is the one warning in an otherwise
//! error-shaped list.

use std::fmt;

use crate::Severity;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticCode {
    DuplicateDeclaration,
    DuplicateDispatchKey,
    UnknownPath,
    UnknownDispatcherRegistry,
    SuperPastRoot,
    TypeArgCountMismatch,
    StaticKeyOnNonDispatcherNonStruct,
    DynamicIndexInDispatchStatement,
    FallbackOnDispatchLhs,
    ReservedWordAsIdentifier,
    InvalidEscape,
    NumberOutOfRangeForSuffix,
    CycleWithoutLaziness,
    UnterminatedString,
    UnexpectedToken,
    UnknownInjectionTarget,
}

impl DiagnosticCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateDeclaration => "duplicate-declaration",
            Self::DuplicateDispatchKey => "duplicate-dispatch-key",
            Self::UnknownPath => "unknown-path",
            Self::UnknownDispatcherRegistry => "unknown-dispatcher-registry",
            Self::SuperPastRoot => "super-past-root",
            Self::TypeArgCountMismatch => "type-arg-count-mismatch",
            Self::StaticKeyOnNonDispatcherNonStruct => "static-key-on-non-dispatcher-non-struct",
            Self::DynamicIndexInDispatchStatement => "dynamic-index-in-dispatch-statement",
            Self::FallbackOnDispatchLhs => "fallback-on-dispatch-lhs",
            Self::ReservedWordAsIdentifier => "reserved-word-as-identifier",
            Self::InvalidEscape => "invalid-escape",
            Self::NumberOutOfRangeForSuffix => "number-out-of-range-for-suffix",
            Self::CycleWithoutLaziness => "cycle-without-laziness",
            Self::UnterminatedString => "unterminated-string",
            Self::UnexpectedToken => "unexpected-token",
            Self::UnknownInjectionTarget => "unknown-path",
        }
    }

    /// Default severity. Only `unknown-dispatcher-registry` is a warning
    /// (it still yields the fallback case and proceeds); every other listed
    /// code is an error.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::UnknownDispatcherRegistry | Self::DuplicateDeclaration | Self::DuplicateDispatchKey => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
