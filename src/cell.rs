use std::fmt::{Display, Formatter};

/// Required bridge count of an island, 1 through 8.
pub type IslandValue = u8;

/// Largest value an island may carry: two bridges in each of four directions.
pub const MAX_ISLAND_VALUE: IslandValue = 8;

/// One cell of a puzzle grid.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cell {
    /// An island which must end up with exactly `value` bridge ends.
    Island {
        /// Bridge ends this island needs.
        value: IslandValue,
    },
    /// Water; bridges may pass over it.
    #[default]
    Empty,
}

impl Cell {
    /// Interpret a raw grid number, `0` being empty water.
    pub(crate) fn from_value(value: IslandValue) -> Self {
        match value {
            0 => Self::Empty,
            value => Self::Island { value },
        }
    }

    pub(crate) fn is_island(&self) -> bool {
        matches!(self, Self::Island { .. })
    }

    /// The character this cell is drawn as: its value, or `.` for water.
    pub(crate) fn symbol(&self) -> char {
        match self {
            Self::Island { value } => char::from_digit(u32::from(*value), 10).unwrap_or('?'),
            Self::Empty => '.',
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
