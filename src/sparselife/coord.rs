//! Cell coordinates and the Moore-neighborhood offset table.

use std::fmt;

/// A single grid cell on the unbounded plane.
///
/// Neighbor arithmetic wraps in two's complement, so live cells must stay
/// strictly inside `i32::MIN + 1 ..= i32::MAX - 1`. Cells on the outermost
/// row/column would fold onto the opposite edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The 8 surrounding cells, in `NEIGHBOR_OFFSETS` order.
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(i32, i32)> for Coord {
    #[inline(always)]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for (i32, i32) {
    #[inline(always)]
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Moore neighborhood deltas, walked clockwise from the upper-left cell.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
];
