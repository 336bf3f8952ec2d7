use ndarray::Ix;

pub(crate) type Coord = usize;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(row, column)` on a grid. The top left corner is `Location(0, 0)`.
///
/// The derived ordering is row-major, which is also the order islands are numbered in.
pub struct Location(pub Coord, pub Coord);

impl Location {
    #[inline]
    pub(crate) fn row(&self) -> Coord {
        self.0
    }

    #[inline]
    pub(crate) fn column(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.0, self.1)
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}
