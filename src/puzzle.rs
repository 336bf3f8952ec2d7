use std::fmt::{Display, Formatter};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::bridge::{candidate_bridges, BridgeId, CandidateBridge};
use crate::compiler::{compile, Encoding};
use crate::crossing::{crossing_pairs, CrossingPair};
use crate::direction::Axis;
use crate::grid::Grid;
use crate::island::{IslandId, Islands};
use crate::oracle::{Oracle, SolverFailure};
use crate::solution::Solution;
use crate::solver::Strategy;

/// A Hashiwokakero puzzle with its geometry worked out: islands, candidate bridges and the crossings between them.
///
/// Built from a [`Grid`]; everything here is immutable once derived.
#[derive(Clone, Debug)]
pub struct Puzzle {
    grid: Grid,
    islands: Islands,
    bridges: Vec<CandidateBridge>,
    crossings: Vec<CrossingPair>,
    // islands as nodes, candidate bridges as edges
    graph: UnGraphMap<IslandId, BridgeId>,
}

impl From<Grid> for Puzzle {
    fn from(grid: Grid) -> Self {
        let islands = Islands::extract(&grid);
        let bridges = candidate_bridges(&grid, &islands);
        let crossings = crossing_pairs(&bridges, &islands);

        let mut graph = UnGraphMap::with_capacity(islands.len(), bridges.len());
        for island in islands.iter() {
            graph.add_node(island.id);
        }
        for bridge in &bridges {
            graph.add_edge(bridge.from, bridge.to, bridge.id);
        }

        Self { grid, islands, bridges, crossings, graph }
    }
}

impl Puzzle {
    /// The grid this puzzle was read from.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All islands.
    pub fn islands(&self) -> &Islands {
        &self.islands
    }

    /// All candidate bridges, indexed by [`BridgeId`].
    pub fn bridges(&self) -> &[CandidateBridge] {
        &self.bridges
    }

    /// A candidate bridge by id.
    pub fn bridge(&self, id: BridgeId) -> &CandidateBridge {
        &self.bridges[id.0]
    }

    /// Every pair of candidate bridges which cannot coexist.
    pub fn crossings(&self) -> &[CrossingPair] {
        &self.crossings
    }

    /// Candidate bridges ending at `island`, in bridge id order.
    pub fn incident(&self, island: IslandId) -> impl Iterator<Item=&CandidateBridge> + '_ {
        self.graph.edges(island)
            .map(|(_, _, id)| *id)
            .sorted()
            .map(|id| self.bridge(id))
    }

    /// Compile this puzzle to CNF; see [`compile`].
    pub fn compile(&self) -> Encoding {
        compile(self)
    }

    /// Compile this puzzle and search for a solution with `strategy`, asking `oracle` for satisfiability.
    ///
    /// Returns `Ok(None)` when the puzzle has no solution.
    pub fn solve(&self, strategy: Strategy, oracle: &impl Oracle) -> Result<Option<Solution>, SolverFailure> {
        let encoding = self.compile();
        Ok(strategy.run(&encoding, oracle)?
            .map(|model| Solution::decode(&encoding, &model)))
    }

    /// Draw `solution` over the grid: `-` and `=` for horizontal single and double bridges, `|` and `‖` for vertical ones.
    pub fn render(&self, solution: &Solution) -> String {
        let mut canvas = self.grid.canvas();

        for bridge in &self.bridges {
            let symbol = match (bridge.direction.axis(), solution.multiplicity(bridge.id)) {
                (_, 0) => continue,
                (Axis::Horizontal, 1) => '-',
                (Axis::Horizontal, _) => '=',
                (Axis::Vertical, 1) => '|',
                (Axis::Vertical, _) => '‖',
            };

            for location in bridge.segment(&self.islands).interior() {
                canvas[location.as_index()] = symbol;
            }
        }

        Grid::print(&canvas)
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.grid)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn incidence_in_bridge_order() {
        // island 2 sits in the middle of a plus
        let puzzle = Puzzle::from("0,1,0\n1,2,1\n0,1,0".parse::<Grid>().unwrap());

        let around_centre = puzzle.incident(IslandId(2)).map(|bridge| bridge.id).collect_vec();
        assert_eq!(around_centre.len(), 4);
        assert!(around_centre.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(puzzle.incident(IslandId(0)).all(|bridge| bridge.touches(IslandId(0))));
        assert!(puzzle.crossings().is_empty());
    }

    #[test]
    fn render_bridges() {
        let puzzle = Puzzle::from("2,0,2\n0,0,0\n2,0,2".parse::<Grid>().unwrap());
        let solution = Solution::from(vec![1, 2, 2, 1]);

        assert_eq!(format!("{}", puzzle), "2.2
...
2.2
");
        // bridges are 0-1 (top), 0-2 (left), 1-3 (right), 2-3 (bottom)
        assert_eq!(puzzle.render(&solution), "2-2
‖.‖
2-2
");
    }
}
