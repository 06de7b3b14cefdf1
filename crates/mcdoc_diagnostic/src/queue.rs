use crate::Diagnostic;

/// An ordered collection of diagnostics.
///
/// The engine never aborts on error: every failure pushes a `Diagnostic`
/// here and keeps going with a sentinel value (error type, fallback case,
/// earliest-loaded declaration). `diagnostics()` on the public query API
/// drains this in emission order.
#[derive(Default, Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = %diagnostic.code, path = %diagnostic.logical_path, "diagnostic emitted");
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn extend(&mut self, other: DiagnosticQueue) {
        self.diagnostics.extend(other.diagnostics);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == crate::Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCode;
    use mcdoc_ir::Span;

    #[test]
    fn preserves_emission_order() {
        let mut q = DiagnosticQueue::new();
        q.push(Diagnostic::new(DiagnosticCode::UnknownPath, "a", Span::DUMMY, "first"));
        q.push(Diagnostic::new(DiagnosticCode::UnknownPath, "a", Span::DUMMY, "second"));
        assert_eq!(q.as_slice()[0].message, "first");
        assert_eq!(q.as_slice()[1].message, "second");
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let mut q = DiagnosticQueue::new();
        q.push(Diagnostic::new(
            DiagnosticCode::UnknownDispatcherRegistry,
            "a",
            Span::DUMMY,
            "warn",
        ));
        assert!(!q.has_errors());
        q.push(Diagnostic::new(DiagnosticCode::UnknownPath, "a", Span::DUMMY, "err"));
        assert!(q.has_errors());
    }
}
