//! Searches over a compiled puzzle, from a single SAT call to deliberately naive baselines.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use itertools::Itertools;
use log::{debug, info};
use strum::{Display, EnumString, VariantArray};
use varisat::{CnfFormula, Lit, Var};

use crate::compiler::Encoding;
use crate::oracle::{Model, Oracle, SolverFailure};

/// The ways a compiled puzzle can be searched for a model.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, VariantArray, Eq, Hash, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum Strategy {
    /// Hand the whole formula to the oracle once.
    #[default]
    #[strum(to_string = "direct", serialize = "pysat")]
    Direct,
    /// Try every assignment of the bridge multiplicity variables in turn.
    #[strum(to_string = "exhaustive", serialize = "brute")]
    Exhaustive,
    /// Depth-first search over the bridge multiplicity variables.
    #[strum(to_string = "backtracking")]
    Backtracking,
    /// Best-first search over partial assignments of every constrained variable.
    #[strum(to_string = "best-first", serialize = "astar")]
    BestFirst,
}

impl Strategy {
    /// Search `encoding` for a model. `Ok(None)` means the search space was exhausted without finding one.
    pub fn run(&self, encoding: &Encoding, oracle: &impl Oracle) -> Result<Option<Model>, SolverFailure> {
        let model = match self {
            Self::Direct => direct(encoding, oracle),
            Self::Exhaustive => exhaustive(encoding, oracle),
            Self::Backtracking => backtracking(encoding, oracle),
            Self::BestFirst => best_first(encoding, oracle),
        }?;

        info!("{} search {}", self, if model.is_some() { "found a model" } else { "found no model" });
        Ok(model)
    }
}

/// A single oracle call over the full formula.
pub fn direct(encoding: &Encoding, oracle: &impl Oracle) -> Result<Option<Model>, SolverFailure> {
    oracle.solve(encoding.formula())
}

/// Step `values` to the next assignment, counting with `true` before `false` and the last position fastest.
/// Returns false once every assignment has been visited.
fn next_assignment(values: &mut [bool]) -> bool {
    match values.iter().rposition(|value| *value) {
        None => false,
        Some(position) => {
            values[position] = false;
            values[position + 1..].fill(true);
            true
        }
    }
}

/// Fix every bridge multiplicity variable in every possible way, all true first, and ask the oracle about each.
///
/// Takes `2^k` oracle calls in the worst case for `k` multiplicity variables.
pub fn exhaustive(encoding: &Encoding, oracle: &impl Oracle) -> Result<Option<Model>, SolverFailure> {
    let vars = encoding.multiplicity_vars();
    let mut values = vec![true; vars.len()];
    let mut tried = 0usize;

    loop {
        tried += 1;
        let assumptions = vars.iter().zip(&values).map(|(var, value)| var.lit(*value)).collect_vec();
        if let Some(model) = oracle.solve_under(encoding.formula(), &assumptions)? {
            debug!("exhaustive search accepted assignment {}", tried);
            return Ok(Some(model));
        }

        if !next_assignment(&mut values) {
            debug!("exhaustive search rejected all {} assignments", tried);
            return Ok(None);
        }
    }
}

fn backtrack(
    encoding: &Encoding,
    oracle: &impl Oracle,
    vars: &[Var],
    assignment: &mut Vec<Lit>,
) -> Result<Option<Model>, SolverFailure> {
    let Some(var) = vars.get(assignment.len()) else {
        return oracle.solve_under(encoding.formula(), assignment);
    };

    for value in [true, false] {
        assignment.push(var.lit(value));
        let found = backtrack(encoding, oracle, vars, assignment)?;
        assignment.pop();

        if found.is_some() {
            return Ok(found);
        }
    }

    Ok(None)
}

/// Assign bridge multiplicity variables depth-first, true before false, consulting the oracle at every full assignment.
pub fn backtracking(encoding: &Encoding, oracle: &impl Oracle) -> Result<Option<Model>, SolverFailure> {
    let vars = encoding.multiplicity_vars();
    backtrack(encoding, oracle, &vars, &mut Vec::with_capacity(vars.len()))
}

/// The formula with every fixed literal of a search state added as a unit clause.
fn with_units(formula: &CnfFormula, fixed: &[Lit]) -> CnfFormula {
    CnfFormula::from(formula.iter()
        .map(|clause| clause.to_vec())
        .chain(fixed.iter().map(|lit| vec![*lit])))
}

/// Best-first search over partial assignments of every variable that appears in the formula.
///
/// A state's cost is the number of variables it fixes and its heuristic the number it leaves open,
/// so every state has the same priority and the frontier is worked in insertion order, i.e. breadth first.
/// Each state popped is checked with a fresh oracle call and accepted as soon as the oracle finds a model.
/// States already queued are not queued again.
pub fn best_first(encoding: &Encoding, oracle: &impl Oracle) -> Result<Option<Model>, SolverFailure> {
    let vars = encoding.constrained_vars();
    let heuristic = |fixed: &[Lit]| vars.len() - fixed.len();

    let mut counter = 0usize;
    let mut frontier = BinaryHeap::new();
    let mut states: HashMap<usize, Vec<Lit>> = HashMap::new();
    let mut seen: HashSet<Vec<Lit>> = HashSet::new();

    frontier.push(Reverse((heuristic(&[]), counter)));
    states.insert(counter, Vec::new());
    seen.insert(Vec::new());

    while let Some(Reverse((_, id))) = frontier.pop() {
        let Some(fixed) = states.remove(&id) else {
            continue;
        };

        if let Some(model) = oracle.solve(&with_units(encoding.formula(), &fixed))? {
            debug!("best-first search accepted a state fixing {} of {} variables after {} states", fixed.len(), vars.len(), counter + 1);
            return Ok(Some(model));
        }

        for var in &vars {
            if fixed.iter().any(|lit| lit.var() == *var) {
                continue;
            }

            for value in [true, false] {
                let mut next = fixed.clone();
                next.push(var.lit(value));
                next.sort_by_key(|lit| lit.var().index());

                if !seen.insert(next.clone()) {
                    continue;
                }

                counter += 1;
                let cost = next.len();
                frontier.push(Reverse((cost + heuristic(&next), counter)));
                states.insert(counter, next);
            }
        }
    }

    debug!("best-first search exhausted {} states", counter + 1);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use test_log::test;

    use super::*;
    use crate::grid::Grid;
    use crate::oracle::VarisatOracle;
    use crate::puzzle::Puzzle;

    /// Counts calls on the way through to varisat.
    #[derive(Default)]
    struct CountingOracle {
        calls: Cell<usize>,
    }

    impl Oracle for CountingOracle {
        fn solve_under(&self, formula: &CnfFormula, assumptions: &[Lit]) -> Result<Option<Model>, SolverFailure> {
            self.calls.set(self.calls.get() + 1);
            VarisatOracle.solve_under(formula, assumptions)
        }
    }

    fn encoding(text: &str) -> Encoding {
        Puzzle::from(text.parse::<Grid>().unwrap()).compile()
    }

    #[test]
    fn assignments_count_down_from_all_true() {
        let mut values = vec![true, true];
        let mut seen = vec![values.clone()];
        while next_assignment(&mut values) {
            seen.push(values.clone());
        }

        assert_eq!(seen, vec![
            vec![true, true],
            vec![true, false],
            vec![false, true],
            vec![false, false],
        ]);
        assert!(!next_assignment(&mut []));
    }

    #[test]
    fn strategy_names() {
        assert_eq!("direct".parse::<Strategy>(), Ok(Strategy::Direct));
        assert_eq!("brute".parse::<Strategy>(), Ok(Strategy::Exhaustive));
        assert_eq!("astar".parse::<Strategy>(), Ok(Strategy::BestFirst));
        assert_eq!("Backtracking".parse::<Strategy>(), Ok(Strategy::Backtracking));
        assert!("simulated-annealing".parse::<Strategy>().is_err());
        assert_eq!(Strategy::BestFirst.to_string(), "best-first");
    }

    #[test]
    fn exhaustive_stops_at_first_acceptance() {
        // variables are (single, double); (T, T) breaks capacity, (T, F) is too little, (F, T) is the answer
        let oracle = CountingOracle::default();
        let model = exhaustive(&encoding("2,2"), &oracle).unwrap();

        assert!(model.is_some());
        assert_eq!(oracle.calls.get(), 3);
    }

    #[test]
    fn exhaustive_and_backtracking_visit_everything_on_failure() {
        // "3,1" has one bridge, so two multiplicity variables and four assignments
        for (strategy, calls) in [(Strategy::Exhaustive, 4), (Strategy::Backtracking, 4), (Strategy::Direct, 1)] {
            let oracle = CountingOracle::default();
            assert_eq!(strategy.run(&encoding("3,1"), &oracle), Ok(None), "{}", strategy);
            assert_eq!(oracle.calls.get(), calls, "{}", strategy);
        }
    }

    #[test]
    fn best_first_accepts_satisfiable_root() {
        let oracle = CountingOracle::default();
        assert!(best_first(&encoding("1,0,1"), &oracle).unwrap().is_some());
        assert_eq!(oracle.calls.get(), 1);
    }

    #[test]
    fn best_first_exhausts_every_partial_assignment() {
        // a lone island of value 1: one constrained variable, so the root plus its two extensions
        let oracle = CountingOracle::default();
        assert_eq!(best_first(&encoding("1"), &oracle), Ok(None));
        assert_eq!(oracle.calls.get(), 3);
    }
}
