//! Diagnostic rendering backends for human-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W302]: symmetry pair references unknown pin
///   --> pin "VINN" of cell "ota_b"
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        if self.color {
            format!("\x1b[1;{}m{}\x1b[0m", diag.severity.ansi_color(), diag.severity)
        } else {
            diag.severity.to_string()
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{}[{}]: {}\n",
            self.header(diag),
            diag.code,
            diag.message
        ));

        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_error_with_subject() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "pin references unknown module")
            .with_subject("pin \"VOUT\"");

        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag);

        assert!(output.contains("error[E301]: pin references unknown module"));
        assert!(output.contains("--> pin \"VOUT\""));
    }

    #[test]
    fn render_warning_with_notes() {
        let code = DiagnosticCode::new(Category::Warning, 302);
        let diag = Diagnostic::warning(code, "symmetry pin not found")
            .with_note("the pair is ignored")
            .with_help("check the symmetry file");

        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag);

        assert!(output.contains("warning[W302]: symmetry pin not found"));
        assert!(output.contains("= note: the pair is ignored"));
        assert!(output.contains("= help: check the symmetry file"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_with_color_wraps_severity() {
        let code = DiagnosticCode::new(Category::Solver, 310);
        let diag = Diagnostic::error(code, "floorplan is infeasible");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m[S310]"));
    }
}
