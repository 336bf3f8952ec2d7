use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ndarray::Array2;
use thiserror::Error;

use crate::cell::{Cell, IslandValue, MAX_ISLAND_VALUE};
use crate::location::{Coord, Location};

/// Reasons raw grid input may be rejected.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GridError {
    /// No rows, or only empty rows, were supplied.
    #[error("the grid has no cells")]
    Empty,
    /// A row has a different number of cells than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: Coord,
        /// Width of the first row.
        expected: Coord,
        /// Width of the offending row.
        found: Coord,
    },
    /// A cell holds a number outside `0..=8`.
    #[error("cell ({row}, {column}) holds {value}, which is not a valid island value")]
    BadValue {
        /// Row of the offending cell.
        row: Coord,
        /// Column of the offending cell.
        column: Coord,
        /// The value found there.
        value: u32,
    },
    /// A cell could not be read as a number at all.
    #[error("cell ({row}, {column}) is not a number: {text:?}")]
    NotANumber {
        /// Row of the offending cell.
        row: Coord,
        /// Column of the offending cell.
        column: Coord,
        /// The raw text of the cell.
        text: String,
    },
}

/// A rectangular Hashiwokakero grid as given, before any solving.
///
/// Build one by parsing the comma separated text format,
/// ```
/// let grid: hashi::Grid = "2,0,2\n0,0,0\n2,0,2".parse().unwrap();
/// assert_eq!(grid.dims(), (3, 3));
/// ```
/// or from numeric rows with [`Grid::from_rows`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Build a grid from rows of raw numbers, `0` being empty and `1..=8` an island.
    ///
    /// Rows must all have the same, nonzero, length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridError> {
        let width = match rows.first() {
            None => return Err(GridError::Empty),
            Some(first) if first.is_empty() => return Err(GridError::Empty),
            Some(first) => first.len(),
        };

        if let Some((row, found)) = rows.iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width) {
            return Err(GridError::Ragged { row, expected: width, found });
        }

        let mut cells = Vec::with_capacity(rows.len() * width);
        for (row, values) in rows.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                cells.push(Cell::from_value(checked_value(row, column, *value)?));
            }
        }

        let cells = Array2::from_shape_vec((rows.len(), width), cells)
            .map_err(|_| GridError::Empty)?;
        Ok(Self { cells })
    }

    /// `(rows, columns)`.
    pub fn dims(&self) -> (Coord, Coord) {
        self.cells.dim()
    }

    /// The cell at `location`, or `None` if it lies outside the grid.
    pub fn get(&self, location: Location) -> Option<Cell> {
        self.cells.get(location.as_index()).copied()
    }

    pub(crate) fn is_island(&self, location: Location) -> bool {
        self.get(location).is_some_and(|cell| cell.is_island())
    }

    /// Every cell with its location, row-major.
    pub(crate) fn indexed_cells(&self) -> impl Iterator<Item=(Location, Cell)> + '_ {
        self.cells.indexed_iter().map(|(index, cell)| (Location::from(index), *cell))
    }

    /// A blank canvas of this grid's size, islands drawn in and water marked `.`.
    pub(crate) fn canvas(&self) -> Array2<char> {
        self.cells.map(Cell::symbol)
    }

    pub(crate) fn print(canvas: &Array2<char>) -> String {
        let mut out = String::with_capacity(canvas.nrows() * (canvas.ncols() + 1));

        for row in canvas.rows() {
            for col in row {
                out.push(*col);
            }
            out.push('\n');
        }

        out
    }
}

fn checked_value(row: Coord, column: Coord, value: u32) -> Result<IslandValue, GridError> {
    IslandValue::try_from(value)
        .ok()
        .filter(|value| *value <= MAX_ISLAND_VALUE)
        .ok_or(GridError::BadValue { row, column, value })
}

impl FromStr for Grid {
    type Err = GridError;

    /// One row per line, cells separated by commas; blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| line.split(',')
                .map(str::trim)
                .enumerate()
                .map(|(column, text)| text.parse::<u32>().map_err(|_| GridError::NotANumber {
                    row,
                    column,
                    text: text.to_string(),
                }))
                .collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(rows)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::print(&self.canvas()))
    }
}
