//! Adapter over the `good_lp` solver backend.

use crate::error::FloorplanError;
use good_lp::{
    default_solver, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel,
};

/// Minimizes `objective` subject to `constraints`.
///
/// Infeasibility is reported as [`FloorplanError::Infeasible`]; every other
/// solver failure as [`FloorplanError::Solver`].
pub(crate) fn run(
    vars: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
) -> Result<impl Solution, FloorplanError> {
    let mut model = vars.minimise(objective).using(default_solver);
    for c in constraints {
        model.add_constraint(c);
    }
    model.solve().map_err(|err| match err {
        ResolutionError::Infeasible => FloorplanError::Infeasible,
        other => FloorplanError::Solver(other.to_string()),
    })
}
