use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::cell::{Cell, IslandValue};
use crate::grid::Grid;
use crate::location::Location;

/// Stable identity of an island; ids are handed out in row-major order starting at 0.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IslandId(pub usize);

impl Display for IslandId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "island {}", self.0)
    }
}

/// A numbered cell which bridges connect to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Island {
    /// Identity of this island.
    pub id: IslandId,
    /// Where on the grid it sits.
    pub location: Location,
    /// How many bridge ends it needs.
    pub value: IslandValue,
}

/// Every island of one puzzle, indexed by id and by location.
#[derive(Clone, Debug, Default)]
pub struct Islands {
    islands: Vec<Island>,
    by_location: HashMap<Location, IslandId>,
}

impl Islands {
    /// Scan `grid` row by row and number its islands.
    pub fn extract(grid: &Grid) -> Self {
        let mut islands = Vec::new();
        let mut by_location = HashMap::new();

        for (location, cell) in grid.indexed_cells() {
            if let Cell::Island { value } = cell {
                let id = IslandId(islands.len());
                islands.push(Island { id, location, value });
                by_location.insert(location, id);
            }
        }

        Self { islands, by_location }
    }

    /// Look an island up by id.
    ///
    /// # Panics
    /// If `id` was not handed out by this collection.
    pub fn get(&self, id: IslandId) -> &Island {
        &self.islands[id.0]
    }

    /// The island at `location`, if there is one.
    pub fn at(&self, location: Location) -> Option<&Island> {
        self.by_location.get(&location).map(|id| self.get(*id))
    }

    /// All islands in id order.
    pub fn iter(&self) -> impl Iterator<Item=&Island> + Clone + '_ {
        self.islands.iter()
    }

    /// Number of islands.
    pub fn len(&self) -> usize {
        self.islands.len()
    }

    /// Whether the grid held no islands at all.
    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use test_log::test;

    use super::*;

    #[test]
    fn islands_numbered_row_major() {
        let grid: Grid = "0,3,0\n2,0,1".parse().unwrap();
        let islands = Islands::extract(&grid);

        assert_eq!(islands.len(), 3);
        assert_eq!(islands.iter().map(|island| (island.location, island.value)).collect::<Vec<_>>(), vec![
            (Location(0, 1), 3),
            (Location(1, 0), 2),
            (Location(1, 2), 1),
        ]);
        assert_eq!(islands.at(Location(1, 2)).map(|island| island.id), Some(IslandId(2)));
        assert!(islands.at(Location(0, 0)).is_none());
    }

    #[test]
    fn island_pairs_in_id_order() {
        let grid: Grid = "1,0,1\n0,0,0\n1,0,0".parse().unwrap();
        let islands = Islands::extract(&grid);

        let pairs = islands.iter()
            .tuple_combinations()
            .map(|(a, b): (&Island, &Island)| (a.id.0, b.id.0))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn empty_grid_has_no_islands() {
        let grid: Grid = "0,0\n0,0".parse().unwrap();
        assert!(Islands::extract(&grid).is_empty());
    }
}
