//! Diagnostics for the floorplanner: codes, severities, an accumulator and
//! terminal rendering.
//!
//! A [`Diagnostic`] names the circuit, module or pin it is about through a
//! free-form subject instead of a source span. Stages push into a shared
//! [`DiagnosticSink`]; the CLI drains it through a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod sink;

pub use code::{Category, DiagnosticCode, Severity};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use sink::DiagnosticSink;
