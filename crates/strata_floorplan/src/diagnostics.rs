//! Diagnostic codes and helpers for floorplanning warnings and notes.
//!
//! Warning codes `W301`--`W303` cover suspicious input that is still
//! usable. `N301` marks degenerate nets. `S301` reports resource overflow in
//! a solved floorplan. `E301`--`E304` mirror [`FloorplanError`] for terminal
//! rendering.

use crate::error::FloorplanError;
use crate::problem::PinSide;
use strata_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// The circuit, the symmetry pairs or a result failed a consistency check.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// The floorplan ILP has no feasible solution.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// The ILP solver failed.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// An internal invariant was broken.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);

/// A pin name is used by more than one module.
pub const W301: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);

/// A symmetry pair references a pin missing from the circuit.
pub const W302: DiagnosticCode = DiagnosticCode::new(Category::Warning, 302);

/// A symmetry pair references a pin that needs no side assignment.
pub const W303: DiagnosticCode = DiagnosticCode::new(Category::Warning, 303);

/// A net has fewer than two assignable pins.
pub const N301: DiagnosticCode = DiagnosticCode::new(Category::Note, 301);

/// A module side needs more pin resource than its height provides.
pub const S301: DiagnosticCode = DiagnosticCode::new(Category::Solver, 301);

/// Converts a pipeline error into a renderable diagnostic.
pub fn error_diagnostic(err: &FloorplanError) -> Diagnostic {
    let code = match err {
        FloorplanError::Infeasible => E302,
        FloorplanError::Solver(_) => E303,
        FloorplanError::Internal(_) => E304,
        _ => E301,
    };
    let diag = Diagnostic::error(code, err.to_string());
    match err {
        FloorplanError::Infeasible => {
            diag.with_help("check the vertical constraint graph for modules that cannot be stacked")
        }
        FloorplanError::Internal(_) => diag.with_note("this is a bug in the floorplanner"),
        _ => diag,
    }
}

pub(crate) fn warn_pin_name_reused(pin: &str, first_module: &str, module: &str) -> Diagnostic {
    Diagnostic::warning(W301, format!("pin name \"{pin}\" is used by several modules"))
        .with_subject(format!("module \"{module}\""))
        .with_note(format!(
            "lookups of the external net box by pin name resolve to module \"{first_module}\""
        ))
}

pub(crate) fn warn_symmetry_pin_missing(pin: &str) -> Diagnostic {
    Diagnostic::warning(W302, "symmetry pair references a pin missing from the circuit")
        .with_subject(format!("pin \"{pin}\""))
        .with_note("the pair is ignored")
}

pub(crate) fn warn_symmetry_pin_not_assignable(pin: &str) -> Diagnostic {
    Diagnostic::warning(W303, "symmetry pair references a pin that needs no side")
        .with_subject(format!("pin \"{pin}\""))
        .with_note("the pair is ignored")
}

pub(crate) fn note_degenerate_net(net: &str, pins: usize) -> Diagnostic {
    Diagnostic::note(
        N301,
        format!("net \"{net}\" has {pins} assignable pin(s) and adds no crossing terms"),
    )
}

pub(crate) fn report_resource_overflow(module: &str, side: PinSide, overflow: f64) -> Diagnostic {
    Diagnostic::new(
        S301,
        format!("{side} side of module \"{module}\" overflows its pin capacity by {overflow} units"),
    )
    .with_subject(format!("module \"{module}\""))
    .with_help("increase the module height or raise resource_per_len for this circuit")
}
