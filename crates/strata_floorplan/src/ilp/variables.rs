//! ILP variable allocation.
//!
//! Side variables encode 0 = left and 1 = right. Only asymmetric and
//! symmetric-primary pins get one; a secondary's side is the complement of
//! its primary's variable.

use crate::ids::{NetId, PinId};
use crate::problem::{FloorplanProblem, PinKind, PinSide};
use good_lp::{variable, Expression, ProblemVariables, Variable};

/// Position of the unordered pair `(i, j)` among the `k(k-1)/2` pairs of a
/// `k`-pin net.
///
/// Pairs are laid out row by row: row `i` holds `(i, i+1) .. (i, k-1)`, so
/// row `i` starts at `sum_{t<i} (k - t - 1)`. The order of `i` and `j` does
/// not matter. `i` and `j` must differ and be less than `k`.
pub fn crossing_index(k: usize, i: usize, j: usize) -> usize {
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    debug_assert!(i != j && j < k);
    let row_offset = i * (k - 1) - i * (i.saturating_sub(1)) / 2;
    row_offset + (j - i - 1)
}

/// Number of unordered pin pairs of a `k`-pin net.
pub fn crossing_count(k: usize) -> usize {
    k * k.saturating_sub(1) / 2
}

/// Side of a pin as an affine term of the side variables.
#[derive(Debug, Clone, Copy)]
pub enum SideTerm {
    /// The variable itself.
    Direct(Variable),
    /// `1 - variable`.
    Complement(Variable),
}

impl SideTerm {
    /// The side as an expression: 1 for right, 0 for left.
    pub fn right(self) -> Expression {
        match self {
            SideTerm::Direct(v) => Expression::from(v),
            SideTerm::Complement(v) => Expression::from(1.0) - v,
        }
    }

    /// Complement of [`SideTerm::right`]: 1 for left, 0 for right.
    pub fn left(self) -> Expression {
        match self {
            SideTerm::Direct(v) => Expression::from(1.0) - v,
            SideTerm::Complement(v) => Expression::from(v),
        }
    }

    /// Indicator expression of a given side. `Undefined` yields zero.
    pub fn on(self, side: PinSide) -> Expression {
        match side {
            PinSide::Left => self.left(),
            PinSide::Right => self.right(),
            PinSide::Undefined => Expression::from(0.0),
        }
    }
}

/// Every variable of the floorplan ILP.
#[derive(Debug)]
pub struct IlpVariables {
    /// One binary per asymmetric pin, by slot.
    pub asym: Vec<Variable>,
    /// One binary per symmetric primary pin, by slot.
    pub sym: Vec<Variable>,
    /// Per module: overflow of the left and right side, in resource units.
    pub slack: Vec<[Variable; 2]>,
    /// Per module: solved lower y.
    pub lower_y: Vec<Variable>,
    /// Top of the tallest stack.
    pub upper_y: Variable,
    /// Per net: one binary per pin pair, laid out by [`crossing_index`].
    pub crossing: Vec<Vec<Variable>>,
}

impl IlpVariables {
    /// Declares all variables of `problem` in `vars`.
    pub fn allocate(problem: &FloorplanProblem, vars: &mut ProblemVariables) -> Self {
        let asym = (0..problem.num_asym_pins())
            .map(|i| vars.add(variable().binary().name(format!("asym_{i}"))))
            .collect();
        let sym = (0..problem.num_sym_pri_pins())
            .map(|i| vars.add(variable().binary().name(format!("sym_{i}"))))
            .collect();

        let mut slack = Vec::with_capacity(problem.modules().len());
        let mut lower_y = Vec::with_capacity(problem.modules().len());
        for m in 0..problem.modules().len() {
            slack.push(PinSide::BOTH.map(|side| {
                vars.add(variable().min(0.0).name(format!("slack_{m}_{side}")))
            }));
            lower_y.push(vars.add(variable().min(0.0).name(format!("lower_y_{m}"))));
        }
        let upper_y = vars.add(variable().min(0.0).name("upper_y"));

        let mut crossing = Vec::with_capacity(problem.nets().len());
        for net in problem.nets() {
            let k = net.pins.len();
            let mut row = Vec::with_capacity(crossing_count(k));
            for i in 0..k {
                for j in i + 1..k {
                    debug_assert_eq!(row.len(), crossing_index(k, i, j));
                    let name = format!("cross_{}_{i}_{j}", net.id);
                    row.push(vars.add(variable().binary().name(name)));
                }
            }
            crossing.push(row);
        }

        IlpVariables {
            asym,
            sym,
            slack,
            lower_y,
            upper_y,
            crossing,
        }
    }

    /// Side term of a pin, or `None` for pins excluded from assignment.
    pub fn side(&self, problem: &FloorplanProblem, pin: PinId) -> Option<SideTerm> {
        let pin = problem.pin(pin);
        let slot = pin.slot?;
        match pin.kind {
            PinKind::Asymmetric => Some(SideTerm::Direct(self.asym[slot])),
            PinKind::SymmetricPrimary { .. } => Some(SideTerm::Direct(self.sym[slot])),
            PinKind::SymmetricSecondary { .. } => Some(SideTerm::Complement(self.sym[slot])),
            PinKind::Other => None,
        }
    }

    /// Crossing variable of the pins at positions `i` and `j` of `net`.
    pub fn crossing(&self, problem: &FloorplanProblem, net: NetId, i: usize, j: usize) -> Variable {
        let k = problem.net(net).pins.len();
        self.crossing[net.index()][crossing_index(k, i, j)]
    }

    /// Number of declared variables.
    pub fn count(&self) -> usize {
        self.asym.len()
            + self.sym.len()
            + 2 * self.slack.len()
            + self.lower_y.len()
            + 1
            + self.crossing.iter().map(Vec::len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn crossing_index_is_a_bijection() {
        for k in 2..=12 {
            let mut seen = HashSet::new();
            for i in 0..k {
                for j in i + 1..k {
                    let idx = crossing_index(k, i, j);
                    assert!(idx < crossing_count(k), "k={k} i={i} j={j} idx={idx}");
                    assert!(seen.insert(idx), "k={k} collision at ({i}, {j})");
                }
            }
            assert_eq!(seen.len(), crossing_count(k));
        }
    }

    #[test]
    fn crossing_index_is_symmetric() {
        assert_eq!(crossing_index(5, 1, 3), crossing_index(5, 3, 1));
    }

    #[test]
    fn crossing_index_row_major() {
        // k = 4: (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
        assert_eq!(crossing_index(4, 0, 1), 0);
        assert_eq!(crossing_index(4, 0, 3), 2);
        assert_eq!(crossing_index(4, 1, 2), 3);
        assert_eq!(crossing_index(4, 1, 3), 4);
        assert_eq!(crossing_index(4, 2, 3), 5);
    }

    #[test]
    fn crossing_counts() {
        assert_eq!(crossing_count(0), 0);
        assert_eq!(crossing_count(1), 0);
        assert_eq!(crossing_count(2), 1);
        assert_eq!(crossing_count(5), 10);
    }
}
