use std::cmp::Ordering;

use strum::Display;

use crate::location::Location;

/// Orientation of a straight bridge.
#[derive(Copy, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Axis {
    /// Along a row.
    Horizontal,
    /// Along a column.
    Vertical,
}

/// Compass direction of a bridge, from its first island towards its second.
///
/// Rows grow southwards and columns grow eastwards, so [`South`](Direction::South) and [`East`](Direction::East) are the "forward" directions:
/// stepping in them leads to a location ordered after the origin.
#[derive(Copy, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Direction {
    /// Towards row 0.
    #[strum(serialize = "N")]
    North,
    /// Towards the last row.
    #[strum(serialize = "S")]
    South,
    /// Towards the last column.
    #[strum(serialize = "E")]
    East,
    /// Towards column 0.
    #[strum(serialize = "W")]
    West,
}

impl Direction {
    /// Determine the direction from `a` to `b`, if they share a row or a column.
    ///
    /// Returns [`None`] when the two are equal or not aligned.
    pub fn between(a: Location, b: Location) -> Option<Self> {
        if a.row() == b.row() {
            match a.column().cmp(&b.column()) {
                Ordering::Less => Some(Self::East),
                Ordering::Greater => Some(Self::West),
                Ordering::Equal => None,
            }
        } else if a.column() == b.column() {
            match a.row().cmp(&b.row()) {
                Ordering::Less => Some(Self::South),
                Ordering::Greater => Some(Self::North),
                Ordering::Equal => None,
            }
        } else {
            None
        }
    }

    /// The axis a bridge running in this direction lies on.
    pub fn axis(&self) -> Axis {
        match self {
            Self::East | Self::West => Axis::Horizontal,
            Self::North | Self::South => Axis::Vertical,
        }
    }
}
