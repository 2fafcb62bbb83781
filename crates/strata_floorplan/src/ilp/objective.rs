//! The weighted objective.

use super::variables::IlpVariables;
use crate::problem::FloorplanProblem;
use good_lp::Expression;
use strata_config::ObjectiveWeights;

/// Builds the minimized expression
///
/// ```text
/// w_height * upper_y + (overflow_price / pin_resource) * sum(slack)
///   + w_crossing * sum(crossing) + w_compaction * sum(lower_y)
/// ```
///
/// Slack is measured in resource units, so dividing by `pin_resource` makes
/// [`overflow_price`] the cost of one overflowing pin.
pub fn objective(
    problem: &FloorplanProblem,
    vars: &IlpVariables,
    weights: &ObjectiveWeights,
    pin_resource: i64,
) -> Expression {
    let mut obj = weights.height * vars.upper_y;

    let per_unit = overflow_price(problem, weights) / pin_resource as f64;
    for &[left, right] in &vars.slack {
        obj += per_unit * left;
        obj += per_unit * right;
    }
    for row in &vars.crossing {
        for &c in row {
            obj += weights.crossing * c;
        }
    }
    for &y in &vars.lower_y {
        obj += weights.compaction * y;
    }
    obj
}

/// Cost of one overflowing pin.
///
/// Moving a pin to the other side flips its crossing status against every
/// other pin of its net, at most `max_k - 1` pairs for the largest net. The
/// configured resource weight is raised by that many crossings so one pin of
/// overflow always costs more than any crossings its removal can add.
pub fn overflow_price(problem: &FloorplanProblem, weights: &ObjectiveWeights) -> f64 {
    let max_k = problem.nets().iter().map(|n| n.pins.len()).max().unwrap_or(0);
    weights.resource + weights.crossing * max_k.saturating_sub(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{CircuitDef, Design, ModuleDef, NetDef, PinDef};
    use crate::geom::Rect;
    use strata_diagnostics::DiagnosticSink;

    fn problem_with_net_of(k: usize) -> FloorplanProblem {
        let pins: Vec<PinDef> = (0..k)
            .map(|i| PinDef {
                name: format!("P{i}"),
                module: 0,
                bbox: Rect::new(0, 0, 1, 1),
                assignable: true,
                side: None,
            })
            .collect();
        let mut design = Design::new();
        design.add_circuit(CircuitDef {
            name: "wide".into(),
            modules: vec![ModuleDef {
                name: "m".into(),
                bbox: Rect::new(0, 0, 4, 4),
                planned_height: None,
                planned_y_lo: None,
            }],
            pins,
            nets: vec![NetDef {
                name: "n".into(),
                pins: (0..k as u32).collect(),
            }],
        });
        FloorplanProblem::build(&design, 0, &[], &DiagnosticSink::new()).unwrap()
    }

    #[test]
    fn overflow_price_covers_the_largest_net() {
        let weights = ObjectiveWeights::default();
        assert_eq!(overflow_price(&problem_with_net_of(2), &weights), 11.0);
        assert_eq!(overflow_price(&problem_with_net_of(14), &weights), 23.0);
        for k in [2, 5, 14, 40] {
            let price = overflow_price(&problem_with_net_of(k), &weights);
            assert!(price > weights.crossing * (k - 1) as f64, "k={k}");
        }
    }

    #[test]
    fn zero_crossing_weight_keeps_configured_price() {
        let weights = ObjectiveWeights {
            crossing: 0.0,
            ..ObjectiveWeights::default()
        };
        assert_eq!(overflow_price(&problem_with_net_of(30), &weights), weights.resource);
    }
}
