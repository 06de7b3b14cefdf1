//! Prints diagnostics to stderr and derives a process exit code from them.

use mcdoc_diagnostic::{Diagnostic, Severity};

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        eprintln!("{d}");
    }
}

/// `0` if every diagnostic is a warning, `1` if any is an error.
#[must_use]
pub fn exit_code(diagnostics: &[Diagnostic]) -> i32 {
    i32::from(diagnostics.iter().any(|d| d.severity == Severity::Error))
}
