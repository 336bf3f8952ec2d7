use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;

use crate::direction::{Axis, Direction};
use crate::grid::Grid;
use crate::island::{IslandId, Islands};
use crate::location::{Coord, Location};

/// Identity of a candidate bridge; ids are handed out in generation order starting at 0.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BridgeId(pub usize);

impl Display for BridgeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "bridge {}", self.0)
    }
}

/// A straight connection that may be built between two islands with a clear line of sight.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CandidateBridge {
    /// Identity of this bridge.
    pub id: BridgeId,
    /// First endpoint; always the lower island id.
    pub from: IslandId,
    /// Second endpoint.
    pub to: IslandId,
    /// Direction from `from` towards `to`.
    pub direction: Direction,
}

/// The straight run of cells a bridge covers, endpoints included.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    pub(crate) axis: Axis,
    /// Row of a horizontal segment, column of a vertical one.
    pub(crate) line: Coord,
    /// Lowest and highest column (horizontal) or row (vertical).
    pub(crate) span: (Coord, Coord),
}

impl Segment {
    /// Cells strictly between the two endpoints.
    pub(crate) fn interior(&self) -> impl Iterator<Item=Location> + '_ {
        (self.span.0 + 1..self.span.1).map(|along| match self.axis {
            Axis::Horizontal => Location(self.line, along),
            Axis::Vertical => Location(along, self.line),
        })
    }
}

impl CandidateBridge {
    /// Whether `island` is one of this bridge's endpoints.
    pub fn touches(&self, island: IslandId) -> bool {
        self.from == island || self.to == island
    }

    /// The endpoint opposite `island`.
    pub fn other(&self, island: IslandId) -> IslandId {
        if self.from == island { self.to } else { self.from }
    }

    pub(crate) fn segment(&self, islands: &Islands) -> Segment {
        let a = islands.get(self.from).location;
        let b = islands.get(self.to).location;

        match self.direction.axis() {
            Axis::Horizontal => Segment {
                axis: Axis::Horizontal,
                line: a.row(),
                span: (a.column().min(b.column()), a.column().max(b.column())),
            },
            Axis::Vertical => Segment {
                axis: Axis::Vertical,
                line: a.column(),
                span: (a.row().min(b.row()), a.row().max(b.row())),
            },
        }
    }
}

/// Find every pair of islands sharing a row or column with nothing but water between them.
///
/// At most one bridge is produced per pair, oriented from the lower island id to the higher.
pub fn candidate_bridges(grid: &Grid, islands: &Islands) -> Vec<CandidateBridge> {
    let mut bridges = Vec::new();

    for (a, b) in islands.iter().tuple_combinations() {
        let Some(direction) = Direction::between(a.location, b.location) else {
            continue;
        };

        let candidate = CandidateBridge {
            id: BridgeId(bridges.len()),
            from: a.id,
            to: b.id,
            direction,
        };

        if candidate.segment(islands).interior().any(|location| grid.is_island(location)) {
            continue;
        }

        bridges.push(candidate);
    }

    debug!("{} islands admit {} candidate bridges", islands.len(), bridges.len());
    bridges
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn bridges_of(text: &str) -> Vec<(usize, usize, Direction)> {
        let grid: Grid = text.parse().unwrap();
        let islands = Islands::extract(&grid);
        candidate_bridges(&grid, &islands).into_iter()
            .map(|bridge| (bridge.from.0, bridge.to.0, bridge.direction))
            .collect()
    }

    #[test]
    fn adjacent_pair() {
        assert_eq!(bridges_of("2,2"), vec![(0, 1, Direction::East)]);
    }

    #[test]
    fn blocked_line_of_sight() {
        // the middle island hides the outer two from each other
        assert_eq!(bridges_of("1,0,2,0,1"), vec![
            (0, 1, Direction::East),
            (1, 2, Direction::East),
        ]);
    }

    #[test]
    fn directions_follow_island_order() {
        // island 0 at (0, 2), island 1 at (2, 0), island 2 at (2, 2)
        assert_eq!(bridges_of("0,0,1\n0,0,0\n1,0,2"), vec![
            (0, 2, Direction::South),
            (1, 2, Direction::East),
        ]);
        // island 0 at (0, 1), island 1 at (1, 0): not aligned
        assert_eq!(bridges_of("0,1\n1,0"), vec![]);
    }

    #[test]
    fn segment_interior() {
        let grid: Grid = "1,0,0,1".parse().unwrap();
        let islands = Islands::extract(&grid);
        let bridges = candidate_bridges(&grid, &islands);
        let segment = bridges[0].segment(&islands);

        assert_eq!(segment, Segment { axis: Axis::Horizontal, line: 0, span: (0, 3) });
        assert_eq!(segment.interior().collect::<Vec<_>>(), vec![Location(0, 1), Location(0, 2)]);
        assert_eq!(bridges[0].other(IslandId(0)), IslandId(1));
        assert!(bridges[0].touches(IslandId(1)));
    }
}
