//! Diagnostic accumulator shared by the floorplanning stages.

use crate::code::Severity;
use crate::diagnostic::Diagnostic;
use std::cell::RefCell;

/// Collects diagnostics emitted while a floorplan problem is built and solved.
///
/// Stages hold only a shared reference, so emission goes through a `RefCell`.
/// Solving is single-threaded; the sink is not `Sync`.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Returns `true` if any error-severity diagnostic is held.
    pub fn has_errors(&self) -> bool {
        self.worst() == Some(Severity::Error)
    }

    /// Number of error-severity diagnostics held.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of held diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Highest severity held, or `None` for an empty sink.
    pub fn worst(&self) -> Option<Severity> {
        self.diagnostics.borrow().iter().map(|d| d.severity).max()
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Snapshot of the held diagnostics in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}
