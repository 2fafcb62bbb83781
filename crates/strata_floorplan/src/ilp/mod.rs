//! Integer linear program for pin-side assignment and vertical stacking.
//!
//! [`IlpFloorplan`] turns a [`FloorplanProblem`] into an ILP in five steps:
//!
//! 1. **Graph**: vertical ordering edges from the sweep line
//! 2. **Variables**: pin sides, per-side slack, lower y, upper y, crossings
//! 3. **Constraints**: ordering, capacity, crossing, boundary
//! 4. **Objective**: weighted height, overflow, crossings, compaction
//! 5. **Solve**: via `good_lp`, keeping the solved values on success
//!
//! A successful solve can then be written into a [`FloorplanResult`] once.

mod constraints;
mod objective;
mod solver;
mod variables;

pub use constraints::IlpConstraints;
pub use objective::{objective, overflow_price};
pub use variables::{crossing_count, crossing_index, IlpVariables, SideTerm};

use crate::constraint_graph::{vertical_sweep_line, ConstraintEdge};
use crate::diagnostics;
use crate::error::FloorplanError;
use crate::geom::Rect;
use crate::ids::{ModuleId, PinId};
use crate::problem::{FloorplanProblem, PinSide};
use crate::result::{FloorplanResult, ModuleRecord, PinRecord};
use good_lp::{ProblemVariables, Solution};
use strata_config::{EdgePolicy, FloorplanSettings, ObjectiveWeights, DEFAULT_PIN_RESOURCE};
use strata_diagnostics::DiagnosticSink;

/// Knobs of the ILP formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct IlpOptions {
    /// Resource units one pin consumes on its side.
    pub pin_resource: i64,
    /// Which vertical ordering edges to emit.
    pub edge_policy: EdgePolicy,
    /// Objective weights.
    pub weights: ObjectiveWeights,
}

impl Default for IlpOptions {
    fn default() -> Self {
        Self {
            pin_resource: DEFAULT_PIN_RESOURCE,
            edge_policy: EdgePolicy::default(),
            weights: ObjectiveWeights::default(),
        }
    }
}

impl From<&FloorplanSettings> for IlpOptions {
    fn from(settings: &FloorplanSettings) -> Self {
        Self {
            pin_resource: settings.pin_resource,
            edge_policy: settings.edge_policy,
            weights: settings.weights,
        }
    }
}

/// Solved values of a floorplan ILP.
#[derive(Debug, Clone, PartialEq)]
pub struct IlpSolution {
    /// Side of every pin, `Undefined` for excluded pins.
    pub sides: Vec<PinSide>,
    /// Lower y of every module.
    pub y_lo: Vec<i64>,
    /// Top of the floorplan, as solved for the `upper_y` variable.
    pub upper_y: i64,
    /// Per module left/right overflow, in resource units.
    pub slack: Vec<[f64; 2]>,
    /// Solved crossing variables of every net, in [`crossing_index`] order.
    pub crossing: Vec<Vec<bool>>,
    /// Number of set crossing variables.
    pub crossings: usize,
    /// Objective value.
    pub objective: f64,
}

/// The ILP floorplanner for one problem.
#[derive(Debug)]
pub struct IlpFloorplan<'p> {
    problem: &'p FloorplanProblem,
    options: IlpOptions,
    vertical_edges: Vec<ConstraintEdge>,
    solution: Option<IlpSolution>,
}

impl<'p> IlpFloorplan<'p> {
    /// Creates a floorplanner over `problem`.
    pub fn new(problem: &'p FloorplanProblem, options: IlpOptions) -> Self {
        Self {
            problem,
            options,
            vertical_edges: Vec::new(),
            solution: None,
        }
    }

    /// Builds and solves the ILP.
    ///
    /// On failure no solved values are kept, even if an earlier call
    /// succeeded.
    pub fn solve(&mut self) -> Result<(), FloorplanError> {
        let _span = tracing::info_span!("floorplan_solve", circuit = self.problem.circuit()).entered();
        self.solution = None;
        if self.options.pin_resource <= 0 {
            return Err(FloorplanError::InvalidPinResource(self.options.pin_resource));
        }

        let problem = self.problem;
        self.vertical_edges = vertical_sweep_line(problem.modules(), self.options.edge_policy)
            .map_err(|e| e.in_stage("floorplan solve"))?;

        let mut pv = ProblemVariables::new();
        let vars = IlpVariables::allocate(problem, &mut pv);
        let constraints =
            IlpConstraints::assemble(problem, &vars, &self.vertical_edges, self.options.pin_resource);
        let obj = objective(problem, &vars, &self.options.weights, self.options.pin_resource);
        tracing::debug!(
            variables = vars.count(),
            constraints = constraints.count(),
            "solving floorplan ilp"
        );

        let solution = solver::run(pv, obj.clone(), constraints.into_vec())?;
        let extracted = extract(problem, &vars, &solution, solution.eval(obj));
        tracing::info!(
            upper_y = extracted.upper_y,
            crossings = extracted.crossings,
            objective = extracted.objective,
            "floorplan solved"
        );
        self.solution = Some(extracted);
        Ok(())
    }

    /// Solved values of the last successful solve.
    pub fn solution(&self) -> Option<&IlpSolution> {
        self.solution.as_ref()
    }

    /// Ordering edges used by the last solve.
    pub fn vertical_edges(&self) -> &[ConstraintEdge] {
        &self.vertical_edges
    }

    /// Reports every module side whose pins exceed its capacity.
    pub fn report_overflow(&self, sink: &DiagnosticSink) {
        let Some(solution) = &self.solution else {
            return;
        };
        for (m, slack) in solution.slack.iter().enumerate() {
            for (side, &amount) in PinSide::BOTH.iter().zip(slack) {
                if amount > 0.5 {
                    let module = self.problem.module_name(ModuleId::from_index(m));
                    sink.emit(diagnostics::report_resource_overflow(module, *side, amount.round()));
                }
            }
        }
    }

    /// Writes the solved floorplan into `result`.
    ///
    /// Fails with [`FloorplanError::NotSolved`] without a successful solve and
    /// with [`FloorplanError::ResultAlreadyWritten`] if `result` is populated.
    pub fn write_out(&self, result: &mut FloorplanResult) -> Result<(), FloorplanError> {
        let solution = self.solution.as_ref().ok_or(FloorplanError::NotSolved)?;
        if result.is_populated() {
            return Err(FloorplanError::ResultAlreadyWritten);
        }
        let problem = self.problem;

        let modules = problem
            .modules()
            .iter()
            .map(|m| ModuleRecord {
                name: problem.module_name(m.id).to_string(),
                height: m.height(),
                y_lo: solution.y_lo[m.id.index()],
            })
            .collect();

        let placed = solved_pin_boxes(problem, solution);
        let external = external_boxes(problem, &placed);

        let mut pins = Vec::with_capacity(problem.num_assignable_pins());
        for pin in problem.pins() {
            if !pin.kind.is_assignable() {
                continue;
            }
            pins.push(PinRecord {
                module: pin.module,
                name: problem.pin_name(pin.id).to_string(),
                side: solution.sides[pin.id.index()],
                external_bbox: external[pin.id.index()],
            });
        }

        result.populate(
            problem.circuit().to_string(),
            modules,
            pins,
            solution.upper_y,
            solution.objective,
        )
    }
}

fn extract(
    problem: &FloorplanProblem,
    vars: &IlpVariables,
    solution: &impl Solution,
    objective: f64,
) -> IlpSolution {
    let sides: Vec<PinSide> = problem
        .pins()
        .iter()
        .map(|p| {
            vars.side(problem, p.id).map_or(PinSide::Undefined, |term| {
                PinSide::from_value(solution.eval(term.right()))
            })
        })
        .collect();
    let y_lo: Vec<i64> = vars
        .lower_y
        .iter()
        .map(|&v| solution.value(v).round() as i64)
        .collect();
    let upper_y = solution.value(vars.upper_y).round() as i64;
    let slack = vars
        .slack
        .iter()
        .map(|&[l, r]| [solution.value(l).max(0.0), solution.value(r).max(0.0)])
        .collect();
    let crossing: Vec<Vec<bool>> = vars
        .crossing
        .iter()
        .map(|row| row.iter().map(|&c| solution.value(c) > 0.5).collect())
        .collect();
    let crossings = crossing.iter().flatten().filter(|&&c| c).count();

    for (i, &y) in y_lo.iter().enumerate() {
        tracing::trace!(module = problem.module_name(ModuleId::from_index(i)), y_lo = y);
    }
    for (p, side) in sides.iter().enumerate() {
        if *side != PinSide::Undefined {
            tracing::trace!(pin = problem.pin_name(PinId::from_index(p)), %side);
        }
    }

    IlpSolution {
        sides,
        y_lo,
        upper_y,
        slack,
        crossing,
        crossings,
        objective,
    }
}

/// Pin boxes at their solved location: on the chosen module edge, shifted
/// by the module's vertical displacement. Excluded pins get an invalid box.
fn solved_pin_boxes(problem: &FloorplanProblem, solution: &IlpSolution) -> Vec<Rect> {
    problem
        .pins()
        .iter()
        .map(|pin| {
            let module = problem.module(pin.module);
            let x = match solution.sides[pin.id.index()] {
                PinSide::Left => module.bbox.x_lo,
                PinSide::Right => module.bbox.x_hi,
                PinSide::Undefined => return Rect::INVALID,
            };
            let dy = solution.y_lo[pin.module.index()] - module.bbox.y_lo;
            Rect::new(x, pin.bbox.y_lo + dy, x, pin.bbox.y_hi + dy)
        })
        .collect()
}

/// For every pin, the union of the solved boxes of the other pins on its net.
fn external_boxes(problem: &FloorplanProblem, placed: &[Rect]) -> Vec<Rect> {
    let mut external = vec![Rect::INVALID; problem.pins().len()];
    for net in problem.nets() {
        let boxes: Vec<Rect> = net.pins.iter().map(|p| placed[p.index()]).collect();
        let k = boxes.len();
        // suffix[i] = union of boxes[i..]
        let mut suffix = vec![Rect::INVALID; k + 1];
        for i in (0..k).rev() {
            suffix[i] = boxes[i].union(suffix[i + 1]);
        }
        let mut prefix = Rect::INVALID;
        for (i, &pin) in net.pins.iter().enumerate() {
            external[pin.index()] = prefix.union(suffix[i + 1]);
            prefix = prefix.union(boxes[i]);
        }
    }
    external
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::diff_pair_design;
    use crate::symmetry::{PinRef, SymmetryPair};

    fn problem(symmetric: bool) -> FloorplanProblem {
        let design = diff_pair_design();
        let sink = DiagnosticSink::new();
        let sym = if symmetric {
            vec![SymmetryPair::new(
                PinRef::new("ota_a", "VIN"),
                PinRef::new("ota_b", "VIN"),
            )]
        } else {
            vec![]
        };
        FloorplanProblem::build(&design, 0, &sym, &sink).unwrap()
    }

    #[test]
    fn write_out_before_solve_fails() {
        let p = problem(false);
        let ilp = IlpFloorplan::new(&p, IlpOptions::default());
        let mut result = FloorplanResult::new();
        let err = ilp.write_out(&mut result).unwrap_err();
        assert!(matches!(err, FloorplanError::NotSolved));
        assert!(!result.is_populated());
    }

    #[test]
    fn non_positive_pin_resource_is_rejected() {
        let p = problem(false);
        let options = IlpOptions {
            pin_resource: 0,
            ..IlpOptions::default()
        };
        let mut ilp = IlpFloorplan::new(&p, options);
        let err = ilp.solve().unwrap_err();
        assert!(matches!(err, FloorplanError::InvalidPinResource(0)));
        assert!(ilp.solution().is_none());
    }

    #[test]
    fn solve_stacks_overlapping_modules() {
        let p = problem(false);
        let mut ilp = IlpFloorplan::new(&p, IlpOptions::default());
        ilp.solve().unwrap();
        let sol = ilp.solution().unwrap();
        // bias (height 2) must sit on top of both height-4 amplifiers
        assert_eq!(sol.y_lo, vec![0, 0, 4]);
        assert_eq!(sol.upper_y, 6);
        let top = p
            .modules()
            .iter()
            .map(|m| sol.y_lo[m.id.index()] + m.height())
            .max()
            .unwrap();
        assert_eq!(sol.upper_y, top);
        assert_eq!(ilp.vertical_edges().len(), 2);
    }

    #[test]
    fn crossing_variables_match_solved_sides() {
        for symmetric in [false, true] {
            let p = problem(symmetric);
            let mut ilp = IlpFloorplan::new(&p, IlpOptions::default());
            ilp.solve().unwrap();
            let sol = ilp.solution().unwrap();
            assert_eq!(sol.crossing.len(), p.nets().len());
            for net in p.nets() {
                let k = net.pins.len();
                let row = &sol.crossing[net.id.index()];
                assert_eq!(row.len(), crossing_count(k));
                for i in 0..k {
                    for j in i + 1..k {
                        let split = sol.sides[net.pins[i].index()] != sol.sides[net.pins[j].index()];
                        assert_eq!(row[crossing_index(k, i, j)], split, "net {} ({i}, {j})", net.id);
                    }
                }
            }
            assert_eq!(sol.crossings, sol.crossing.iter().flatten().filter(|&&c| c).count());
        }
    }

    #[test]
    fn symmetric_pair_lands_on_opposite_sides() {
        let p = problem(true);
        let mut ilp = IlpFloorplan::new(&p, IlpOptions::default());
        ilp.solve().unwrap();
        let sol = ilp.solution().unwrap();
        assert_ne!(sol.sides[0], PinSide::Undefined);
        assert_eq!(sol.sides[1], sol.sides[0].mirrored());
        assert_eq!(sol.sides[3], PinSide::Undefined);
    }

    #[test]
    fn write_out_is_write_once() {
        let p = problem(false);
        let mut ilp = IlpFloorplan::new(&p, IlpOptions::default());
        ilp.solve().unwrap();
        let mut result = FloorplanResult::new();
        ilp.write_out(&mut result).unwrap();
        assert_eq!(result.circuit(), Some("diff"));
        assert_eq!(result.target_module_height("bias"), 2);
        assert_eq!(result.module_y_lo("bias"), Some(4));
        // VDD is excluded from assignment
        assert_eq!(result.pin_assign_sol("bias", "VDD"), -1);
        assert_eq!(result.pins().len(), 4);

        let err = ilp.write_out(&mut result).unwrap_err();
        assert!(matches!(err, FloorplanError::ResultAlreadyWritten));
    }

    #[test]
    fn external_box_of_two_pin_net_is_the_other_pin() {
        let p = problem(false);
        let sol = IlpSolution {
            sides: vec![
                PinSide::Left,
                PinSide::Right,
                PinSide::Left,
                PinSide::Undefined,
                PinSide::Right,
            ],
            y_lo: vec![0, 10, 4],
            upper_y: 14,
            slack: vec![[0.0; 2]; 3],
            crossing: vec![vec![true], vec![true]],
            crossings: 2,
            objective: 0.0,
        };
        let placed = solved_pin_boxes(&p, &sol);
        // ota_b/VIN: right edge x = 22, shifted up by 10
        assert_eq!(placed[1], Rect::new(22, 11, 22, 12));
        // Other pins are never placed
        assert_eq!(placed[3], Rect::INVALID);

        let external = external_boxes(&p, &placed);
        assert_eq!(external[0], placed[1]);
        assert_eq!(external[1], placed[0]);
        // bias net: IB and VOUT see each other, VDD sees nothing
        assert_eq!(external[2], placed[4]);
        assert_eq!(external[3], Rect::INVALID);
    }
}
