//! Error type for building, solving and applying floorplans.

use strata_common::InternalError;

/// Errors returned by the floorplanning pipeline.
///
/// Input-consistency variants are raised while the problem model is built,
/// before any ILP work starts.
#[derive(Debug, thiserror::Error)]
pub enum FloorplanError {
    /// The design source has no circuit with this index.
    #[error("unknown circuit index {0}")]
    UnknownCircuit(usize),

    /// A pin names an owning module index outside the module table.
    #[error("pin \"{pin}\" references module index {module}, but the circuit has {count} modules")]
    InvalidModuleRef {
        /// Name of the offending pin.
        pin: String,
        /// The module index it references.
        module: u32,
        /// Number of modules in the circuit.
        count: usize,
    },

    /// A net names a pin index outside the pin table.
    #[error("net \"{net}\" references pin index {pin}, but the circuit has {count} pins")]
    InvalidPinRef {
        /// Name of the offending net.
        net: String,
        /// The pin index it references.
        pin: u32,
        /// Number of pins in the circuit.
        count: usize,
    },

    /// A pin is listed on more than one net.
    #[error("pin \"{pin}\" is on both net \"{first}\" and net \"{second}\"")]
    PinOnTwoNets {
        /// Name of the pin.
        pin: String,
        /// The first net listing it.
        first: String,
        /// The second net listing it.
        second: String,
    },

    /// Two modules share a name.
    #[error("duplicate module name \"{0}\"")]
    DuplicateModule(String),

    /// Two pins of the same module share a name.
    #[error("duplicate pin \"{pin}\" on module \"{module}\"")]
    DuplicatePin {
        /// Name of the module.
        module: String,
        /// Name of the pin.
        pin: String,
    },

    /// A module or pin box has `lo > hi` on some axis.
    #[error("{what} \"{name}\" has an inverted bounding box")]
    InvertedBox {
        /// `"module"` or `"pin"`.
        what: &'static str,
        /// Name of the object.
        name: String,
    },

    /// A pin appears in more than one symmetry pair.
    #[error("pin \"{0}\" appears in more than one symmetry pair")]
    DuplicateSymmetryPin(String),

    /// A symmetry pair names the same pin twice.
    #[error("symmetry pair pairs pin \"{0}\" with itself")]
    SelfSymmetricPair(String),

    /// The resource quantization factor is not positive.
    #[error("pin resource per length must be positive, got {0}")]
    InvalidResourceLen(i64),

    /// The per-pin resource demand is not positive.
    #[error("pin resource must be positive, got {0}")]
    InvalidPinResource(i64),

    /// The solver proved the ILP infeasible.
    #[error("floorplan ILP is infeasible")]
    Infeasible,

    /// The solver failed for another reason.
    #[error("ILP solver failed: {0}")]
    Solver(String),

    /// `write_out` was called without a successful solve.
    #[error("no successful solve to write out")]
    NotSolved,

    /// The result object has already been populated.
    #[error("floorplan result has already been written")]
    ResultAlreadyWritten,

    /// An empty result was passed where a solved one is required.
    #[error("floorplan result is empty; the solve did not succeed")]
    EmptyResult,

    /// A result is applied to a different circuit than it was solved for.
    #[error("result belongs to circuit \"{result}\", not \"{design}\"")]
    CircuitMismatch {
        /// Circuit the result was solved for.
        result: String,
        /// Circuit found at the target index.
        design: String,
    },

    /// A design object named by the result does not exist in the target design.
    #[error("{what} \"{name}\" not found in circuit \"{circuit}\"")]
    UnknownDesignObject {
        /// `"module"` or `"pin"`.
        what: &'static str,
        /// Name of the object.
        name: String,
        /// Circuit searched.
        circuit: String,
    },

    /// A broken internal invariant.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_module_ref() {
        let err = FloorplanError::InvalidModuleRef {
            pin: "VOUT".into(),
            module: 7,
            count: 3,
        };
        assert_eq!(
            format!("{err}"),
            "pin \"VOUT\" references module index 7, but the circuit has 3 modules"
        );
    }

    #[test]
    fn internal_error_is_transparent() {
        let err: FloorplanError = InternalError::new("cycle").into();
        assert_eq!(format!("{err}"), "internal floorplanner error: cycle");
    }
}
