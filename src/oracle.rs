//! The satisfiability backend the solving strategies consult.

use log::trace;
use thiserror::Error;
use varisat::{CnfFormula, Lit, Solver, Var};

/// Reasons an [`Oracle`] may fail to give an answer.
///
/// An unsatisfiable formula is not a failure; it is reported as `Ok(None)`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SolverFailure {
    /// The SAT backend stopped without deciding the formula.
    #[error("the SAT backend failed: {0}")]
    Backend(String),
}

/// A total assignment to the variables of a formula, as returned by an [`Oracle`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    /// The value of `var`; variables the solver never saw read as false.
    pub fn value(&self, var: Var) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }

    /// Whether `lit` is true under this model.
    pub fn satisfies(&self, lit: Lit) -> bool {
        self.value(lit.var()) == lit.is_positive()
    }

    /// Number of variables assigned.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable is assigned at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Lit>> for Model {
    fn from(lits: Vec<Lit>) -> Self {
        let mut values = vec![false; lits.iter().map(|lit| lit.var().index() + 1).max().unwrap_or(0)];
        for lit in lits {
            values[lit.var().index()] = lit.is_positive();
        }
        Self { values }
    }
}

/// A boolean satisfiability decision procedure.
///
/// From the caller's point of view an oracle keeps no state between calls.
pub trait Oracle {
    /// Decide `formula`, returning a model if it is satisfiable.
    fn solve(&self, formula: &CnfFormula) -> Result<Option<Model>, SolverFailure> {
        self.solve_under(formula, &[])
    }

    /// Decide `formula` with every literal in `assumptions` forced true.
    fn solve_under(&self, formula: &CnfFormula, assumptions: &[Lit]) -> Result<Option<Model>, SolverFailure>;
}

/// An [`Oracle`] backed by a fresh [`varisat::Solver`] for every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarisatOracle;

impl Oracle for VarisatOracle {
    fn solve_under(&self, formula: &CnfFormula, assumptions: &[Lit]) -> Result<Option<Model>, SolverFailure> {
        let mut solver = Solver::new();
        solver.add_formula(formula);
        solver.assume(assumptions);

        let satisfiable = solver.solve()
            .map_err(|err| SolverFailure::Backend(format!("{:?}", err)))?;
        trace!("oracle: {} clauses, {} assumptions, satisfiable: {}", formula.len(), assumptions.len(), satisfiable);

        if !satisfiable {
            return Ok(None);
        }

        solver.model()
            .map(|lits| Some(Model::from(lits)))
            .ok_or_else(|| SolverFailure::Backend("satisfiable formula without a model".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use varisat::ExtendFormula;

    use super::*;

    #[test]
    fn model_of_satisfiable_formula() {
        let mut formula = CnfFormula::new();
        let (a, b) = (formula.new_var(), formula.new_var());
        formula.add_clause(&[a.positive(), b.positive()]);
        formula.add_clause(&[a.negative()]);

        let model = VarisatOracle.solve(&formula).unwrap().unwrap();
        assert!(!model.value(a));
        assert!(model.value(b));
        assert!(model.satisfies(b.positive()));
        // never mentioned to the solver
        assert!(!model.value(Var::from_index(100)));
    }

    #[test]
    fn assumptions_are_forced() {
        let mut formula = CnfFormula::new();
        let (a, b) = (formula.new_var(), formula.new_var());
        formula.add_clause(&[a.negative(), b.negative()]);

        let model = VarisatOracle.solve_under(&formula, &[a.positive()]).unwrap().unwrap();
        assert!(model.value(a));
        assert!(!model.value(b));
        assert_eq!(VarisatOracle.solve_under(&formula, &[a.positive(), b.positive()]), Ok(None));
        // assumptions do not stick
        assert!(VarisatOracle.solve_under(&formula, &[b.positive()]).unwrap().is_some());
    }
}
