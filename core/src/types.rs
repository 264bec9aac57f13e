use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for bomb counts and total-tile counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// Indexes adjacent to a tile, at most eight of them.
pub type AdjacentIndexes = SmallVec<[usize; 8]>;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Which tiles count as neighbors when numbering a board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    /// All eight surrounding tiles, diagonals included.
    #[default]
    Eight,
    /// Only the tiles directly above, below, left and right.
    Four,
}

impl Adjacency {
    const fn displacements(self) -> &'static [(isize, isize)] {
        match self {
            Self::Eight => &EIGHT_DISPLACEMENTS,
            Self::Four => &FOUR_DISPLACEMENTS,
        }
    }

    /// Neighbors of `center` inside a `bounds` (rows, columns) grid.
    pub fn iter_neighbors(self, center: Coord2, bounds: Coord2) -> NeighborIter {
        NeighborIter::new(center, bounds, self.displacements())
    }

    /// Flat indexes adjacent to `index` on a row-major `width × height` grid.
    ///
    /// Returns an empty set when `index` is off the grid. The tile itself is never included and the
    /// result is sorted.
    pub fn find_adjacent_indexes(self, index: usize, width: Coord, height: Coord) -> AdjacentIndexes {
        let width = usize::from(width);
        let height = usize::from(height);
        if width == 0 || index >= width * height {
            return AdjacentIndexes::new();
        }

        // row and column both fit in Coord since they are below width and height
        let center = ((index / width) as Coord, (index % width) as Coord);
        self.iter_neighbors(center, (height as Coord, width as Coord))
            .map(|(row, column)| usize::from(row) * width + usize::from(column))
            .collect()
    }
}

/// Canonical eight-neighbor form of [`Adjacency::find_adjacent_indexes`].
pub fn find_adjacent_indexes(index: usize, width: Coord, height: Coord) -> AdjacentIndexes {
    Adjacency::Eight.find_adjacent_indexes(index, width, height)
}

// ordered so that the yielded flat indexes come out ascending
const EIGHT_DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const FOUR_DISPLACEMENTS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, column) = coords;
    let (d_row, d_column) = delta;
    let (max_row, max_column) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_column = column.checked_add_signed(d_column.try_into().ok()?)?;
    if next_column >= max_column {
        return None;
    }

    Some((next_row, next_column))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(isize, isize)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
