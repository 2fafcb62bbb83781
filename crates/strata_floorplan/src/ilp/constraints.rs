//! Constraint assembly.
//!
//! Symmetry needs no constraint of its own: a secondary pin's side term is
//! already the complement of its primary's variable.

use super::variables::IlpVariables;
use crate::constraint_graph::ConstraintEdge;
use crate::ids::ModuleId;
use crate::problem::{FloorplanProblem, PinSide};
use good_lp::{constraint, Constraint, Expression};

/// All constraints of the floorplan ILP, grouped by family.
#[derive(Debug, Default)]
pub struct IlpConstraints {
    /// Vertical ordering along constraint-graph edges.
    pub ordering: Vec<Constraint>,
    /// Per module and side pin capacity.
    pub capacity: Vec<Constraint>,
    /// Crossing linearization.
    pub crossing: Vec<Constraint>,
    /// Upper-y bound over all modules.
    pub boundary: Vec<Constraint>,
}

impl IlpConstraints {
    /// Builds every constraint family.
    pub fn assemble(
        problem: &FloorplanProblem,
        vars: &IlpVariables,
        edges: &[ConstraintEdge],
        pin_resource: i64,
    ) -> Self {
        let constraints = IlpConstraints {
            ordering: ordering(problem, vars, edges),
            capacity: capacity(problem, vars, pin_resource),
            crossing: crossing(problem, vars),
            boundary: boundary(problem, vars),
        };
        tracing::debug!(
            ordering = constraints.ordering.len(),
            capacity = constraints.capacity.len(),
            crossing = constraints.crossing.len(),
            boundary = constraints.boundary.len(),
            "ilp constraints assembled"
        );
        constraints
    }

    /// Total number of constraints.
    pub fn count(&self) -> usize {
        self.ordering.len() + self.capacity.len() + self.crossing.len() + self.boundary.len()
    }

    /// Consumes the families into a single list.
    pub fn into_vec(self) -> Vec<Constraint> {
        let mut all = self.ordering;
        all.extend(self.capacity);
        all.extend(self.crossing);
        all.extend(self.boundary);
        all
    }
}

fn height(problem: &FloorplanProblem, m: ModuleId) -> f64 {
    problem.module(m).height() as f64
}

/// `lower_y[above] >= lower_y[below] + height[below]`
fn ordering(
    problem: &FloorplanProblem,
    vars: &IlpVariables,
    edges: &[ConstraintEdge],
) -> Vec<Constraint> {
    edges
        .iter()
        .map(|e| {
            let below = vars.lower_y[e.below.index()];
            let above = vars.lower_y[e.above.index()];
            constraint!(above - below >= height(problem, e.below))
        })
        .collect()
}

/// `sum(pin_resource * on_side) - slack[side] <= height * resource_per_len`
fn capacity(problem: &FloorplanProblem, vars: &IlpVariables, pin_resource: i64) -> Vec<Constraint> {
    let per_pin = pin_resource as f64;
    let rpl = problem.resource_per_len() as f64;
    let mut out = Vec::with_capacity(2 * problem.modules().len());

    for module in problem.modules() {
        let pins = problem.module_pins(module.id);
        if pins.is_empty() {
            continue;
        }
        let cap = module.height() as f64 * rpl;
        for (s, side) in PinSide::BOTH.into_iter().enumerate() {
            let mut demand = Expression::with_capacity(pins.len());
            for &pin in pins {
                if let Some(term) = vars.side(problem, pin) {
                    demand += term.on(side) * per_pin;
                }
            }
            let slack = vars.slack[module.id.index()][s];
            out.push(constraint!(demand - slack <= cap));
        }
    }
    out
}

/// Forces each crossing binary to the exclusive-or of its two pins' sides.
fn crossing(problem: &FloorplanProblem, vars: &IlpVariables) -> Vec<Constraint> {
    let mut out = Vec::new();
    for net in problem.nets() {
        let terms: Vec<Expression> = net
            .pins
            .iter()
            .filter_map(|&p| vars.side(problem, p))
            .map(|t| t.right())
            .collect();
        let k = terms.len();
        for i in 0..k {
            for j in i + 1..k {
                let c = vars.crossing(problem, net.id, i, j);
                let (si, sj) = (&terms[i], &terms[j]);
                out.push(constraint!(c >= si.clone() - sj.clone()));
                out.push(constraint!(c >= sj.clone() - si.clone()));
                out.push(constraint!(c <= si.clone() + sj.clone()));
                out.push(constraint!(c <= Expression::from(2.0) - si.clone() - sj.clone()));
            }
        }
    }
    out
}

/// `upper_y >= lower_y[m] + height[m]`
fn boundary(problem: &FloorplanProblem, vars: &IlpVariables) -> Vec<Constraint> {
    problem
        .modules()
        .iter()
        .map(|m| {
            let y = vars.lower_y[m.id.index()];
            constraint!(vars.upper_y - y >= height(problem, m.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::diff_pair_design;
    use crate::symmetry::{PinRef, SymmetryPair};
    use good_lp::ProblemVariables;
    use strata_config::EdgePolicy;
    use strata_diagnostics::DiagnosticSink;

    fn assembled(symmetric: bool) -> IlpConstraints {
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
        let problem = FloorplanProblem::build(&design, 0, &sym, &sink).unwrap();
        let mut pv = ProblemVariables::new();
        let vars = IlpVariables::allocate(&problem, &mut pv);
        let edges =
            crate::constraint_graph::vertical_sweep_line(problem.modules(), EdgePolicy::AllOverlaps)
                .unwrap();
        IlpConstraints::assemble(&problem, &vars, &edges, 1)
    }

    #[test]
    fn family_sizes() {
        // bias overlaps both amplifier halves; the halves are disjoint.
        let c = assembled(false);
        assert_eq!(c.ordering.len(), 2);
        // every module has at least one assignable pin
        assert_eq!(c.capacity.len(), 6);
        // nets "in" and "bias" each have two assignable pins: one pair each
        assert_eq!(c.crossing.len(), 8);
        assert_eq!(c.boundary.len(), 3);
        assert_eq!(c.count(), 19);
    }

    #[test]
    fn symmetry_adds_no_constraints() {
        assert_eq!(assembled(true).count(), assembled(false).count());
    }
}
