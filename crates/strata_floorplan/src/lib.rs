//! Top-level ILP floorplanner for the Strata analog layout flow.
//!
//! This crate takes one circuit of a design database (modules with fixed
//! horizontal placement, their pins and nets) plus a list of mirrored pin
//! pairs, and decides which side of its module each pin goes to and how
//! the modules stack vertically. Both decisions come from one integer
//! linear program. The output is a read-only [`FloorplanResult`] that can be
//! written back into the design with [`apply_fp_solution`].
//!
//! # Pipeline
//!
//! 1. **Build**: classify pins and validate the circuit into a [`FloorplanProblem`]
//! 2. **Graph**: sweep line over module x-extents into "below" edges
//! 3. **Formulate**: variables, constraints and the weighted objective
//! 4. **Solve**: `good_lp` over the pure-Rust `microlp` backend
//! 5. **Extract**: pin sides, module positions and external net boxes
//!
//! # Usage
//!
//! ```ignore
//! use strata_floorplan::solve_floorplan;
//!
//! let result = solve_floorplan(&design, 0, &symmetry, &settings, &sink)?;
//! let side = result.pin_assign_sol("ota_a", "VINP"); // 0 left, 1 right
//! ```

#![warn(missing_docs)]

pub mod constraint_graph;
pub mod design;
pub mod diagnostics;
pub mod error;
pub mod geom;
pub mod ids;
pub mod ilp;
pub mod problem;
pub mod result;
pub mod symmetry;

pub use constraint_graph::{vertical_sweep_line, ConstraintEdge};
pub use design::{
    apply_fp_solution, CircuitDef, Design, DesignSink, DesignSource, ModuleDef, NetDef, PinDef,
};
pub use error::FloorplanError;
pub use geom::Rect;
pub use ids::{ModuleId, NetId, PinId};
pub use ilp::{IlpFloorplan, IlpOptions, IlpSolution};
pub use problem::{FloorplanProblem, FpModule, FpNet, FpPin, PinKind, PinSide};
pub use result::{FloorplanResult, ModuleRecord, PinRecord};
pub use symmetry::{PinRef, SymmetryPair};

use strata_config::FloorplanSettings;
use strata_diagnostics::DiagnosticSink;

/// Runs the complete floorplanning pipeline on one circuit.
///
/// Builds the problem, applies the resource quantization from `settings`,
/// solves the ILP and extracts the result. Resource overflow in the solved
/// floorplan is reported to `sink`.
pub fn solve_floorplan(
    design: &dyn DesignSource,
    circuit: usize,
    symmetry: &[SymmetryPair],
    settings: &FloorplanSettings,
    sink: &DiagnosticSink,
) -> Result<FloorplanResult, FloorplanError> {
    // 1. Problem model
    let mut problem = FloorplanProblem::build(design, circuit, symmetry, sink)?;
    problem.set_pin_resource_len(settings.resource_per_len)?;

    // 2. Formulate and solve
    let mut ilp = IlpFloorplan::new(&problem, IlpOptions::from(settings));
    ilp.solve()?;
    ilp.report_overflow(sink);

    // 3. Extract
    let mut result = FloorplanResult::new();
    ilp.write_out(&mut result)?;
    Ok(result)
}
