//! Compilation of a [`Puzzle`] into CNF.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;
use varisat::{CnfFormula, ExtendFormula, Lit, Var};

use crate::bridge::BridgeId;
use crate::island::IslandId;
use crate::logic::{exactly_one, weighted_equals};
use crate::puzzle::Puzzle;

/// The pair of variables deciding how many bridges a candidate carries.
///
/// Both false means no bridge; at most one of them may be true.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BridgeVars {
    /// True iff exactly one bridge is built.
    pub single: Var,
    /// True iff two bridges are built.
    pub double: Var,
}

/// Size of a compiled puzzle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    /// Variables allocated, auxiliary ones included.
    pub variables: usize,
    /// Clauses emitted.
    pub clauses: usize,
    /// Islands on the grid.
    pub islands: usize,
    /// Candidate bridges found.
    pub bridges: usize,
    /// Pairs of candidate bridges which cross.
    pub crossings: usize,
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  variables: {}", self.variables)?;
        writeln!(f, "  clauses: {}", self.clauses)?;
        writeln!(f, "  islands: {}", self.islands)?;
        writeln!(f, "  possible bridges: {}", self.bridges)?;
        write!(f, "  crossing pairs: {}", self.crossings)
    }
}

/// A puzzle compiled to CNF, along with the bookkeeping needed to read answers back.
///
/// Read-only once built; every solving strategy works from the same encoding.
#[derive(Debug)]
pub struct Encoding {
    formula: CnfFormula,
    bridge_vars: Vec<BridgeVars>,
    flow_vars: HashMap<(IslandId, IslandId), Var>,
    statistics: Statistics,
}

impl Encoding {
    /// The full constraint set.
    pub fn formula(&self) -> &CnfFormula {
        &self.formula
    }

    /// The multiplicity variables of `bridge`.
    pub fn bridge_vars(&self, bridge: BridgeId) -> BridgeVars {
        self.bridge_vars[bridge.0]
    }

    /// Every bridge multiplicity variable, single before double, in bridge id order.
    pub fn multiplicity_vars(&self) -> Vec<Var> {
        self.bridge_vars.iter()
            .flat_map(|vars| [vars.single, vars.double])
            .collect_vec()
    }

    /// The variable stating that flow runs from `from` to `to`, if a candidate bridge joins them.
    pub fn flow_var(&self, from: IslandId, to: IslandId) -> Option<Var> {
        self.flow_vars.get(&(from, to)).copied()
    }

    /// Every variable which appears in some clause, ascending.
    pub fn constrained_vars(&self) -> Vec<Var> {
        self.formula.iter()
            .flat_map(|clause| clause.iter().map(|lit| lit.var()))
            .sorted_by_key(|var| var.index())
            .dedup()
            .collect_vec()
    }

    /// Sizes of this encoding.
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }
}

/// Builds the constraint set of one puzzle. Owns the variable pool for the duration of that single pass.
struct Compiler<'a> {
    puzzle: &'a Puzzle,
    formula: CnfFormula,
    bridge_vars: Vec<BridgeVars>,
    flow_vars: HashMap<(IslandId, IslandId), Var>,
    // stands in for the empty clause, see `add_clause`
    falsum: Option<Var>,
}

impl<'a> Compiler<'a> {
    fn new(puzzle: &'a Puzzle) -> Self {
        Self {
            puzzle,
            formula: CnfFormula::new(),
            bridge_vars: Vec::with_capacity(puzzle.bridges().len()),
            flow_vars: HashMap::with_capacity(2 * puzzle.bridges().len()),
            falsum: None,
        }
    }

    /// Add one clause. The empty clause becomes `[F]` for a variable F which is itself forced false.
    fn add_clause(&mut self, clause: &[Lit]) {
        if !clause.is_empty() {
            self.formula.add_clause(clause);
            return;
        }

        let falsum = match self.falsum {
            Some(var) => var,
            None => {
                let var = self.formula.new_var();
                self.formula.add_clause(&[var.negative()]);
                self.falsum = Some(var);
                var
            }
        };
        self.formula.add_clause(&[falsum.positive()]);
    }

    fn add_clauses(&mut self, clauses: Vec<Vec<Lit>>) {
        for clause in clauses {
            self.add_clause(&clause);
        }
    }

    fn allocate_variables(&mut self) {
        let puzzle = self.puzzle;
        for _ in puzzle.bridges() {
            let vars = BridgeVars { single: self.formula.new_var(), double: self.formula.new_var() };
            self.bridge_vars.push(vars);
        }

        // flow may run either way over a bridge, whatever its compass direction
        for bridge in puzzle.bridges() {
            for key in [(bridge.from, bridge.to), (bridge.to, bridge.from)] {
                let var = self.formula.new_var();
                self.flow_vars.insert(key, var);
            }
        }
    }

    /// A bridge is absent, single, or double, never single and double at once.
    fn add_capacity_constraints(&mut self) {
        for vars in self.bridge_vars.clone() {
            self.add_clause(&[vars.single.negative(), vars.double.negative()]);
        }
    }

    /// Single bridges weigh 1 and doubles 2; the weights around an island add up to its value.
    fn add_island_value_constraints(&mut self) {
        let puzzle = self.puzzle;
        for island in puzzle.islands().iter() {
            let terms = puzzle.incident(island.id)
                .flat_map(|bridge| {
                    let vars = self.bridge_vars[bridge.id.0];
                    [(vars.single.positive(), 1), (vars.double.positive(), 2)]
                })
                .collect_vec();

            // an island nothing can reach gets the empty clause unless its value is 0
            let clauses = weighted_equals(&mut self.formula, &terms, usize::from(island.value));
            self.add_clauses(clauses);
        }
    }

    /// Of two crossing bridges, at least one is absent.
    fn add_no_crossing_constraints(&mut self) {
        let puzzle = self.puzzle;
        for pair in puzzle.crossings() {
            let x = self.bridge_vars[pair.0.0];
            let y = self.bridge_vars[pair.1.0];

            for (a, b) in [x.single, x.double].into_iter().cartesian_product([y.single, y.double]) {
                self.add_clause(&[a.negative(), b.negative()]);
            }
        }
    }

    /// Certify that the built bridges connect every island.
    ///
    /// Island 0 is the root. Every other island picks exactly one parent among its neighbours by receiving one unit of flow
    /// over a built bridge, flow never runs both ways over one bridge, and there are `N - 1` parent edges in total.
    /// Parents are also kept strictly shallower than their children (see [`Self::add_depth_constraints`]),
    /// so following parents always ends at the root and the bridges contain a spanning tree.
    fn add_connectivity_constraints(&mut self) {
        let puzzle = self.puzzle;
        let island_count = puzzle.islands().len();
        if island_count <= 1 {
            return;
        }
        let root = IslandId(0);

        for bridge in puzzle.bridges() {
            let vars = self.bridge_vars[bridge.id.0];
            let forward = self.flow_vars[&(bridge.from, bridge.to)];
            let backward = self.flow_vars[&(bridge.to, bridge.from)];

            // flow needs a bridge to run over
            self.add_clause(&[forward.negative(), vars.single.positive(), vars.double.positive()]);
            self.add_clause(&[backward.negative(), vars.single.positive(), vars.double.positive()]);
            // and runs in at most one direction
            self.add_clause(&[forward.negative(), backward.negative()]);
        }

        let mut all_inflow = Vec::new();
        for island in puzzle.islands().iter().filter(|island| island.id != root) {
            let inflow = self.inflow(island.id);
            all_inflow.extend(inflow.iter().map(|lit| (*lit, 1)));
            // an island with no neighbours at all cannot be reached; this is the empty clause
            self.add_clauses(exactly_one(inflow));
        }

        let clauses = weighted_equals(&mut self.formula, &all_inflow, island_count - 1);
        self.add_clauses(clauses);

        self.add_depth_constraints(root);
    }

    fn inflow(&self, island: IslandId) -> Vec<Lit> {
        self.puzzle.incident(island)
            .map(|bridge| self.flow_vars[&(bridge.other(island), island)].positive())
            .collect_vec()
    }

    /// Give every island a depth in `0..N`, order encoded: `deep(i, k)` holds iff island i sits at depth `k` or deeper.
    /// The root is at depth 0 and flow from j to i forces `depth(i) > depth(j)`, which rules out cycles of parents.
    fn add_depth_constraints(&mut self, root: IslandId) {
        let island_count = self.puzzle.islands().len();
        // deep[i][k - 1] for k in 1..N
        let deep = (0..island_count)
            .map(|_| (1..island_count).map(|_| self.formula.new_var()).collect_vec())
            .collect_vec();

        for ladder in &deep {
            for (deeper, shallower) in ladder.iter().skip(1).zip(ladder.iter()) {
                self.add_clause(&[deeper.negative(), shallower.positive()]);
            }
        }
        self.add_clause(&[deep[root.0][0].negative()]);

        let flows = self.flow_vars.iter()
            .map(|((from, to), var)| (*from, *to, *var))
            .sorted_by_key(|(_, _, var)| var.index())
            .collect_vec();

        for (parent, child, flow) in flows {
            self.add_clause(&[flow.negative(), deep[child.0][0].positive()]);

            for k in 1..island_count {
                let parent_deep = deep[parent.0][k - 1];
                match deep[child.0].get(k) {
                    // deep(parent, k) => deep(child, k + 1)
                    Some(child_deeper) => self.add_clause(&[flow.negative(), parent_deep.negative(), child_deeper.positive()]),
                    // nothing is deeper than N - 1
                    None => self.add_clause(&[flow.negative(), parent_deep.negative()]),
                }
            }
        }
    }

    fn finish(self) -> Encoding {
        let statistics = Statistics {
            variables: self.formula.var_count(),
            clauses: self.formula.len(),
            islands: self.puzzle.islands().len(),
            bridges: self.puzzle.bridges().len(),
            crossings: self.puzzle.crossings().len(),
        };
        debug!("compiled {} islands into {} variables and {} clauses", statistics.islands, statistics.variables, statistics.clauses);

        Encoding {
            formula: self.formula,
            bridge_vars: self.bridge_vars,
            flow_vars: self.flow_vars,
            statistics,
        }
    }
}

/// Translate `puzzle` into a constraint set whose models are exactly its legal solutions, up to the choice of flow and counters.
///
/// This never fails; a puzzle without solutions compiles to an unsatisfiable formula.
pub fn compile(puzzle: &Puzzle) -> Encoding {
    let mut compiler = Compiler::new(puzzle);

    compiler.allocate_variables();
    compiler.add_capacity_constraints();
    compiler.add_island_value_constraints();
    compiler.add_no_crossing_constraints();
    compiler.add_connectivity_constraints();

    compiler.finish()
}
