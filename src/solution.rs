use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Dfs;
use thiserror::Error;
use varisat::Lit;

use crate::bridge::BridgeId;
use crate::compiler::Encoding;
use crate::island::IslandId;
use crate::oracle::Model;
use crate::puzzle::Puzzle;

/// Number of bridges built along a candidate: 0, 1 or 2.
pub type Multiplicity = u8;

/// Ways a [`Solution`] can break the rules of the puzzle.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Violation {
    /// The solution does not cover the puzzle's candidate bridges.
    #[error("the solution has {found} bridges but the puzzle has {expected}")]
    WrongShape {
        /// Candidate bridges in the puzzle.
        expected: usize,
        /// Entries in the solution.
        found: usize,
    },
    /// A candidate carries something other than 0, 1 or 2 bridges.
    #[error("{bridge} carries {multiplicity} bridges")]
    BadMultiplicity {
        /// The offending bridge.
        bridge: BridgeId,
        /// What it carries.
        multiplicity: Multiplicity,
    },
    /// An island ends up with the wrong number of bridge ends.
    #[error("{island} needs {expected} bridges but has {found}")]
    WrongCount {
        /// The offending island.
        island: IslandId,
        /// Its value.
        expected: usize,
        /// Bridge ends actually touching it.
        found: usize,
    },
    /// Two built bridges cross.
    #[error("{0} and {1} cross")]
    Crossing(BridgeId, BridgeId),
    /// The built bridges leave some island unreachable.
    #[error("only {reached} of {total} islands are connected")]
    Disconnected {
        /// Islands reachable from the first island.
        reached: usize,
        /// All islands.
        total: usize,
    },
}

/// How many bridges are built along each candidate bridge of a puzzle.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Solution {
    multiplicities: Vec<Multiplicity>,
}

impl From<Vec<Multiplicity>> for Solution {
    fn from(multiplicities: Vec<Multiplicity>) -> Self {
        Self { multiplicities }
    }
}

impl Solution {
    /// Read bridge multiplicities off `model`: 1 if the single variable is true, 2 if the double one is, 0 otherwise.
    pub fn decode(encoding: &Encoding, model: &Model) -> Self {
        let multiplicities = (0..encoding.statistics().bridges)
            .map(|index| {
                let vars = encoding.bridge_vars(BridgeId(index));
                match (model.value(vars.single), model.value(vars.double)) {
                    (true, _) => 1,
                    (false, true) => 2,
                    (false, false) => 0,
                }
            })
            .collect();

        Self { multiplicities }
    }

    /// The multiplicity of `bridge`.
    pub fn multiplicity(&self, bridge: BridgeId) -> Multiplicity {
        self.multiplicities.get(bridge.0).copied().unwrap_or(0)
    }

    /// `(bridge, multiplicity)` for every candidate bridge, in id order.
    pub fn iter(&self) -> impl Iterator<Item=(BridgeId, Multiplicity)> + '_ {
        self.multiplicities.iter().enumerate().map(|(index, multiplicity)| (BridgeId(index), *multiplicity))
    }

    /// Bridges which are actually built.
    pub fn built(&self) -> impl Iterator<Item=BridgeId> + '_ {
        self.iter().filter(|(_, multiplicity)| *multiplicity > 0).map(|(bridge, _)| bridge)
    }

    /// State this solution as literals over the multiplicity variables of `encoding`, e.g. to hand back to an oracle.
    pub fn assumptions(&self, encoding: &Encoding) -> Vec<Lit> {
        self.iter()
            .flat_map(|(bridge, multiplicity)| {
                let vars = encoding.bridge_vars(bridge);
                [vars.single.lit(multiplicity == 1), vars.double.lit(multiplicity == 2)]
            })
            .collect()
    }

    /// Check this solution against every rule of `puzzle`: island counts, crossings, and connectivity.
    pub fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        if self.multiplicities.len() != puzzle.bridges().len() {
            return Err(Violation::WrongShape { expected: puzzle.bridges().len(), found: self.multiplicities.len() });
        }

        if let Some((bridge, multiplicity)) = self.iter().find(|(_, multiplicity)| *multiplicity > 2) {
            return Err(Violation::BadMultiplicity { bridge, multiplicity });
        }

        for island in puzzle.islands().iter() {
            let found: usize = puzzle.incident(island.id)
                .map(|bridge| usize::from(self.multiplicity(bridge.id)))
                .sum();
            if found != usize::from(island.value) {
                return Err(Violation::WrongCount { island: island.id, expected: usize::from(island.value), found });
            }
        }

        if let Some(pair) = puzzle.crossings().iter()
            .find(|pair| self.multiplicity(pair.0) > 0 && self.multiplicity(pair.1) > 0) {
            return Err(Violation::Crossing(pair.0, pair.1));
        }

        let total = puzzle.islands().len();
        if total == 0 {
            return Ok(());
        }

        let mut built: UnGraphMap<IslandId, BridgeId> = UnGraphMap::with_capacity(total, self.multiplicities.len());
        for island in puzzle.islands().iter() {
            built.add_node(island.id);
        }
        for bridge in self.built().map(|id| puzzle.bridge(id)) {
            built.add_edge(bridge.from, bridge.to, bridge.id);
        }

        let mut reached = 0;
        let mut dfs = Dfs::new(&built, IslandId(0));
        while dfs.next(&built).is_some() {
            reached += 1;
        }

        match reached == total {
            true => Ok(()),
            false => Err(Violation::Disconnected { reached, total }),
        }
    }
}
