//! The set of live cells.

use std::fmt;

use super::coord::Coord;
use super::coord_map::CoordMap;
use super::hash::{CoordHasher, SplitMixHash};

/// All currently-alive cells of one generation. Iteration order is
/// unspecified; equality is plain set equality.
pub struct LiveSet<H = SplitMixHash> {
    cells: CoordMap<(), H>,
}

impl<H: CoordHasher> Default for LiveSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CoordHasher> LiveSet<H> {
    pub fn new() -> Self {
        Self {
            cells: CoordMap::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            cells: CoordMap::with_capacity(cap),
        }
    }

    /// Returns `true` if the cell was not already alive.
    #[inline]
    pub fn insert(&mut self, c: Coord) -> bool {
        self.cells.insert(c, ()).is_none()
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(c)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Empty the set, keeping its allocation.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Cells the set holds before its table grows.
    pub fn capacity(&self) -> usize {
        self.cells.capacity()
    }

    pub fn reserve_for(&mut self, cells: usize) {
        self.cells.reserve_for(cells);
    }

    /// Insert every cell of the half-open rectangle `[min, max)`.
    pub fn insert_rect(&mut self, min: Coord, max: Coord) {
        if min.x >= max.x || min.y >= max.y {
            return;
        }
        let width = (max.x as i64 - min.x as i64) as usize;
        let height = (max.y as i64 - min.y as i64) as usize;
        self.reserve_for(self.len().saturating_add(width.saturating_mul(height)));
        for y in min.y..max.y {
            for x in min.x..max.x {
                self.insert(Coord::new(x, y));
            }
        }
    }

    /// Insert the square `[origin - h, origin + h)` on both axes.
    /// `h <= 0` inserts nothing.
    pub fn insert_block(&mut self, origin: Coord, half_extent: i32) {
        let h = half_extent.max(0);
        self.insert_rect(
            Coord::new(origin.x.saturating_sub(h), origin.y.saturating_sub(h)),
            Coord::new(origin.x.saturating_add(h), origin.y.saturating_add(h)),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys()
    }

    /// `(min_x, min_y, max_x, max_y)` of the live cells.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        self.iter().fold(None, |acc, c| match acc {
            None => Some((c.x, c.y, c.x, c.y)),
            Some((min_x, min_y, max_x, max_y)) => Some((
                min_x.min(c.x),
                min_y.min(c.y),
                max_x.max(c.x),
                max_y.max(c.y),
            )),
        })
    }

    /// Cells sorted by `(x, y)`, for stable printing and comparisons.
    pub fn to_sorted_vec(&self) -> Vec<Coord> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_unstable();
        out
    }
}

impl<H> Clone for LiveSet<H> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
        }
    }
}

impl<H: CoordHasher> PartialEq for LiveSet<H> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|c| other.contains(c))
    }
}

impl<H: CoordHasher> Eq for LiveSet<H> {}

impl<H: CoordHasher> fmt::Debug for LiveSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.to_sorted_vec()).finish()
    }
}

impl<H: CoordHasher> Extend<Coord> for LiveSet<H> {
    fn extend<I: IntoIterator<Item = Coord>>(&mut self, iter: I) {
        for c in iter {
            self.insert(c);
        }
    }
}

impl<H: CoordHasher> FromIterator<Coord> for LiveSet<H> {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl<H: CoordHasher> FromIterator<(i32, i32)> for LiveSet<H> {
    fn from_iter<I: IntoIterator<Item = (i32, i32)>>(iter: I) -> Self {
        iter.into_iter().map(Coord::from).collect()
    }
}
