//! Diagnostic reporting for the mcdoc engine.
//!
//! No query ever aborts the process: every failure surfaces as a
//! [`Diagnostic`] pushed onto a [`DiagnosticQueue`] plus a typed sentinel at
//! the call site (an error type, a fallback union, the earliest-loaded
//! declaration). This crate only models the diagnostics themselves; the
//! sentinels live with the stage that produces them.

mod code;
mod diagnostic;
mod queue;

pub use code::DiagnosticCode;
pub use diagnostic::{Diagnostic, Severity};
pub use queue::DiagnosticQueue;
