//! Diagnostic codes and severities.
//!
//! Every code belongs to a [`Category`] that fixes its prefix letter and the
//! severity it is reported with by default. Solver outcomes are warnings
//! unless the emitting stage says otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is. Ordered from least to most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Context only; never affects the exit code.
    Note,
    /// Suspicious input or a degraded solution.
    Warning,
    /// The floorplan could not be produced.
    Error,
}

impl Severity {
    /// Lowercase label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// ANSI SGR color number for terminal output.
    pub fn ansi_color(self) -> u8 {
        match self {
            Severity::Note => 36,
            Severity::Warning => 33,
            Severity::Error => 31,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Input errors, prefixed with `E`.
    Error,
    /// Warnings about suspicious but usable input, prefixed with `W`.
    Warning,
    /// Informational notes, prefixed with `N`.
    Note,
    /// Solver outcomes, prefixed with `S`.
    Solver,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
            Category::Solver => 'S',
        }
    }

    /// Severity a code of this category is normally reported with.
    pub fn default_severity(self) -> Severity {
        match self {
            Category::Error => Severity::Error,
            Category::Warning | Category::Solver => Severity::Warning,
            Category::Note => Severity::Note,
        }
    }
}

/// A category prefix plus a numeric identifier, displayed as e.g. `E301`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    }

    #[test]
    fn default_severities() {
        assert_eq!(Category::Error.default_severity(), Severity::Error);
        assert_eq!(Category::Solver.default_severity(), Severity::Warning);
        assert_eq!(Category::Note.default_severity(), Severity::Note);
    }

    #[test]
    fn display_format() {
        assert_eq!(DiagnosticCode::new(Category::Error, 301).to_string(), "E301");
        assert_eq!(DiagnosticCode::new(Category::Solver, 7).to_string(), "S007");
    }
}
