use std::iter::once;
use std::ops::Index;

use itertools::Itertools;
use varisat::{ExtendFormula, Lit};

/// No two of `lits` are true; (!A + !B) * (!A + !C) * ...
pub(crate) fn at_most_one(lits: &[Lit]) -> Vec<Vec<Lit>> {
    lits.iter()
        .combinations(2)
        .map(|pair| vec![!**pair.index(0), !**pair.index(1)])
        .collect_vec()
}

/// Exactly one of `lits` is true.
///
/// An empty `lits` yields the empty clause; callers decide how to state that.
pub(crate) fn exactly_one(lits: Vec<Lit>) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(lits.len() * (lits.len() + 1) / 2 + 1);

    clauses.extend(at_most_one(&lits));
    // at least one is true; A + B + C + ...
    clauses.push(lits);

    clauses
}

/// The weighted sum of true `terms` equals `bound` exactly.
///
/// This is a weighted sequential counter. For the i-th term we allocate `bound + 1` fresh variables `s(i, j)`,
/// `s(i, j)` being true iff the weight of true terms among the first i reaches at least j.
/// Both directions of that definition are encoded, so the counter variables are fully determined by the terms:
///
/// - `s(i-1, j) => s(i, j)` and `s(i, j) => s(i-1, j) + x_i + ...`
/// - for `j <= w_i`, `x_i => s(i, j)` and `s(i, j) => s(i-1, j) + x_i`
/// - for `j > w_i`, `x_i * s(i-1, j - w_i) => s(i, j)` and `s(i, j) => s(i-1, j) + s(i-1, j - w_i)`
///
/// Finally `s(n, bound)` must hold and `s(n, bound + 1)` must not.
/// With no terms at all and a positive bound the result contains the empty clause.
pub(crate) fn weighted_equals(pool: &mut impl ExtendFormula, terms: &[(Lit, usize)], bound: usize) -> Vec<Vec<Lit>> {
    let top = bound + 1;
    let mut clauses = Vec::new();
    // counter of the previous prefix, indexed by j - 1; absent before the first term
    let mut previous: Option<Vec<Lit>> = None;

    for &(x, weight) in terms {
        let current = (0..top).map(|_| pool.new_var().positive()).collect_vec();

        for j in 1..=top {
            let s = current[j - 1];
            let prev_same = previous.as_ref().map(|prev| prev[j - 1]);
            let prev_short = previous.as_ref()
                .filter(|_| j > weight)
                .map(|prev| prev[j - weight - 1]);

            if let Some(prev) = prev_same {
                clauses.push(vec![!prev, s]);
            }
            if j <= weight {
                clauses.push(vec![!x, s]);
            } else if let Some(prev) = prev_short {
                clauses.push(vec![!x, !prev, s]);
            }

            clauses.push(once(!s).chain(prev_same).chain(once(x)).collect_vec());
            if j > weight {
                clauses.push(once(!s).chain(prev_same).chain(prev_short).collect_vec());
            }
        }

        previous = Some(current);
    }

    match previous {
        // nothing to count, so the sum is 0
        None => if bound > 0 {
            clauses.push(vec![]);
        },
        Some(last) => {
            if bound > 0 {
                clauses.push(vec![last[bound - 1]]);
            }
            clauses.push(vec![!last[top - 1]]);
        }
    }

    clauses
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use test_log::test;
    use varisat::{CnfFormula, ExtendFormula, Lit, Solver};

    use super::*;

    fn satisfiable(formula: &CnfFormula, assumptions: &[Lit]) -> bool {
        let mut solver = Solver::new();
        solver.add_formula(formula);
        solver.assume(assumptions);
        solver.solve().unwrap()
    }

    #[test]
    fn exactly_one_pairwise() {
        let mut formula = CnfFormula::new();
        let lits = (0..3).map(|_| formula.new_var().positive()).collect_vec();
        for clause in exactly_one(lits.clone()) {
            formula.add_clause(&clause);
        }

        for assignment in (0..3).map(|_| [true, false]).multi_cartesian_product() {
            let assumptions = lits.iter().zip(&assignment).map(|(lit, value)| lit.var().lit(*value)).collect_vec();
            let ones = assignment.iter().filter(|value| **value).count();
            assert_eq!(satisfiable(&formula, &assumptions), ones == 1, "{:?}", assignment);
        }
    }

    #[test]
    fn exactly_one_of_nothing_is_empty_clause() {
        assert_eq!(exactly_one(vec![]), vec![Vec::<Lit>::new()]);
    }

    #[test]
    fn weighted_sum_matches_bound_exactly() {
        let weights = [1, 2, 1, 2];

        for bound in 0..=7 {
            let mut formula = CnfFormula::new();
            let terms = weights.iter().map(|weight| (formula.new_var().positive(), *weight)).collect_vec();
            for clause in weighted_equals(&mut formula, &terms, bound) {
                formula.add_clause(&clause);
            }

            for assignment in (0..weights.len()).map(|_| [true, false]).multi_cartesian_product() {
                let assumptions = terms.iter().zip(&assignment).map(|((lit, _), value)| lit.var().lit(*value)).collect_vec();
                let sum: usize = weights.iter().zip(&assignment).filter(|(_, value)| **value).map(|(weight, _)| weight).sum();
                assert_eq!(satisfiable(&formula, &assumptions), sum == bound, "bound {} {:?}", bound, assignment);
            }
        }
    }

    #[test]
    fn weighted_sum_of_nothing() {
        let mut formula = CnfFormula::new();
        assert!(weighted_equals(&mut formula, &[], 0).is_empty());
        assert_eq!(weighted_equals(&mut formula, &[], 2), vec![Vec::<Lit>::new()]);
        assert_eq!(formula.var_count(), 0);
    }
}
