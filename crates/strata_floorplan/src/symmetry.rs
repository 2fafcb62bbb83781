//! Mirrored pin pairs supplied by the symmetry-net description.
//!
//! Reading the description file is the caller's job; the floorplanner only
//! consumes the resulting pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names one pin of a circuit: its module and its own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinRef {
    /// Name of the owning module.
    pub module: String,
    /// Name of the pin within that module.
    pub pin: String,
}

impl PinRef {
    /// Creates a pin reference.
    pub fn new(module: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            pin: pin.into(),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.pin)
    }
}

/// Two pins whose sides must always be geometric opposites.
///
/// The primary pin owns the ILP variable; the secondary pin's side is its
/// complement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetryPair {
    /// The pin whose side is decided by the solver.
    pub primary: PinRef,
    /// The pin mirrored from the primary.
    pub secondary: PinRef,
}

impl SymmetryPair {
    /// Creates a pair from two pin references.
    pub fn new(primary: PinRef, secondary: PinRef) -> Self {
        Self { primary, secondary }
    }
}
