//! Sparse B3/S23 stepping by neighbor-count accumulation.
//!
//! Every live cell adds one to each of its 8 neighbors in a transient count
//! map; only coordinates that received at least one count are examined
//! afterwards. Work per generation is O(8 * population) regardless of how
//! far apart the live cells are.

use tracing::trace;

use super::coord::{Coord, NEIGHBOR_OFFSETS};
use super::coord_map::CoordMap;
use super::hash::{CoordHasher, SplitMixHash};
use super::live_set::LiveSet;

/// Cells reserved up front when no capacity is configured.
const DEFAULT_INITIAL_CAPACITY: usize = 10_000;

/// Half-width of the square stamped by a single click.
pub const DEFAULT_STAMP_HALF_EXTENT: i32 = 12;

/// B3/S23: born with exactly 3 neighbors, survives with 2 or 3.
#[inline(always)]
pub fn next_alive(neighbors: u8, alive: bool) -> bool {
    neighbors == 3 || (neighbors == 2 && alive)
}

/// Reusable scratch for [`evolve`]. Output never depends on what the
/// scratch held before.
pub struct Evolver<H = SplitMixHash> {
    counts: CoordMap<u8, H>,
}

impl<H: CoordHasher> Default for Evolver<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CoordHasher> Evolver<H> {
    pub fn new() -> Self {
        Self {
            counts: CoordMap::new(),
        }
    }

    /// Write the generation after `current` into `next`, replacing whatever
    /// `next` held. `current` is only read.
    pub fn evolve_into(&mut self, current: &LiveSet<H>, next: &mut LiveSet<H>) {
        let counts = &mut self.counts;
        counts.clear();
        counts.reserve_for(current.len().saturating_mul(NEIGHBOR_OFFSETS.len()));

        for p in current.iter() {
            for &(dx, dy) in &NEIGHBOR_OFFSETS {
                *counts.value_or_default(p.offset(dx, dy)) += 1;
            }
        }

        next.clear();
        next.reserve_for(current.len());
        for (c, n) in counts.iter() {
            // Membership is only needed for the survive-on-2 case.
            if n == 3 || (n == 2 && current.contains(c)) {
                next.insert(c);
            }
        }
    }

    pub fn evolve(&mut self, current: &LiveSet<H>) -> LiveSet<H> {
        let mut next = LiveSet::new();
        self.evolve_into(current, &mut next);
        next
    }
}

/// The generation after `current`, using a throwaway count map.
pub fn evolve<H: CoordHasher>(current: &LiveSet<H>) -> LiveSet<H> {
    Evolver::new().evolve(current)
}

/// Configuration for a [`SparseLife`] instance.
#[derive(Clone, Debug, Default)]
pub struct LifeConfig {
    /// Live cells to reserve room for up front.
    /// `None` means `DEFAULT_INITIAL_CAPACITY`.
    pub initial_capacity: Option<usize>,
    /// Start with stepping suspended.
    pub start_paused: bool,
}

impl LifeConfig {
    pub fn initial_capacity(mut self, cells: usize) -> Self {
        self.initial_capacity = Some(cells);
        self
    }

    pub fn start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }
}

/// Input produced by a render/input driver for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Stamp the square `[origin - h, origin + h)` on both axes.
    InsertBlock { origin: Coord, half_extent: i32 },
    InsertCell(Coord),
    SetPaused(bool),
    TogglePause,
    Clear,
}

/// A live set plus the double buffer and scratch needed to advance it.
pub struct SparseLife<H = SplitMixHash> {
    current: LiveSet<H>,
    next: LiveSet<H>,
    evolver: Evolver<H>,
    generation: u64,
    paused: bool,
}

impl<H: CoordHasher> Default for SparseLife<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CoordHasher> SparseLife<H> {
    pub fn new() -> Self {
        Self::with_config(LifeConfig::default())
    }

    pub fn with_config(config: LifeConfig) -> Self {
        let cap = config.initial_capacity.unwrap_or(DEFAULT_INITIAL_CAPACITY);
        Self {
            current: LiveSet::with_capacity(cap),
            next: LiveSet::with_capacity(cap),
            evolver: Evolver::new(),
            generation: 0,
            paused: config.start_paused,
        }
    }

    /// Start from an existing live set.
    pub fn from_live_set(cells: LiveSet<H>) -> Self {
        let mut engine = Self::new();
        engine.current = cells;
        engine
    }

    /// Returns `true` if the cell was dead before.
    pub fn insert(&mut self, c: Coord) -> bool {
        self.current.insert(c)
    }

    pub fn insert_cells<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Coord>,
    {
        self.current.extend(cells);
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.current.contains(c)
    }

    /// Mark every cell of the half-open rectangle `[min, max)` alive.
    pub fn insert_rect(&mut self, min: Coord, max: Coord) {
        self.current.insert_rect(min, max);
    }

    /// Stamp the `2h x 2h` square `[origin - h, origin + h)` used by
    /// click-drag editing. `h <= 0` stamps nothing.
    pub fn insert_block(&mut self, origin: Coord, half_extent: i32) {
        self.current.insert_block(origin, half_extent);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Flip the pause flag and return the new state.
    pub fn toggle_paused(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drop every live cell. Generation count is kept.
    pub fn clear(&mut self) {
        self.current.clear();
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::InsertBlock {
                origin,
                half_extent,
            } => self.insert_block(origin, half_extent),
            Command::InsertCell(c) => {
                self.insert(c);
            }
            Command::SetPaused(paused) => self.set_paused(paused),
            Command::TogglePause => {
                self.toggle_paused();
            }
            Command::Clear => self.clear(),
        }
    }

    /// Advance one generation, ignoring the pause flag.
    pub fn step(&mut self) {
        self.evolver.evolve_into(&self.current, &mut self.next);
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
        trace!(
            generation = self.generation,
            population = self.current.len(),
            "stepped"
        );
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Advance one generation unless paused. Returns whether it stepped.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.step();
        true
    }

    /// One outer-loop iteration: apply this frame's input, advance unless
    /// paused, then hand back the cells to draw.
    pub fn frame<I>(&mut self, commands: I) -> &LiveSet<H>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.apply(command);
        }
        self.tick();
        &self.current
    }

    /// Read-only view of the current generation.
    pub fn live_cells(&self) -> &LiveSet<H> {
        &self.current
    }

    pub fn for_each_live<F: FnMut(Coord)>(&self, mut f: F) {
        for c in self.current.iter() {
            f(c);
        }
    }

    pub fn population(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        self.current.bounds()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparselife::hash::CombineHash;

    fn set(cells: &[(i32, i32)]) -> LiveSet {
        cells.iter().copied().collect()
    }

    #[test]
    fn rule_predicate_matches_b3_s23() {
        for n in 0..=8u8 {
            assert_eq!(next_alive(n, true), n == 2 || n == 3, "live n={n}");
            assert_eq!(next_alive(n, false), n == 3, "dead n={n}");
        }
    }

    #[test]
    fn scratch_reuse_does_not_change_output() {
        let glider = set(&[(1, 0), (2, -1), (0, -2), (1, -2), (2, -2)]);
        let soup = set(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 2), (2, 2), (3, 1)]);

        let mut shared = Evolver::new();
        let _ = shared.evolve(&soup);
        let reused = shared.evolve(&glider);
        let fresh = evolve(&glider);
        assert_eq!(reused, fresh);
    }

    #[test]
    fn evolve_leaves_input_untouched() {
        let blinker = set(&[(0, 0), (1, 0), (2, 0)]);
        let snapshot = blinker.clone();
        let _ = evolve(&blinker);
        assert_eq!(blinker, snapshot);
    }

    #[test]
    fn evolve_into_overwrites_stale_next() {
        let block = set(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let mut next = set(&[(50, 50), (-9, 3)]);
        Evolver::new().evolve_into(&block, &mut next);
        assert_eq!(next, block);
    }

    #[test]
    fn insert_block_stamps_half_open_square() {
        let mut life = SparseLife::<CombineHash>::new();
        life.insert_block(Coord::new(100, -40), DEFAULT_STAMP_HALF_EXTENT);

        assert_eq!(life.population(), 24 * 24);
        assert_eq!(life.bounds(), Some((88, -52, 111, -29)));
        assert!(life.contains(Coord::new(88, -52)));
        assert!(!life.contains(Coord::new(112, -40)));

        life.insert_block(Coord::ORIGIN, 0);
        assert_eq!(life.population(), 24 * 24);
    }

    #[test]
    fn tables_shrink_after_population_collapses() {
        let mut life = SparseLife::<SplitMixHash>::new();
        let baseline = life.current.capacity();
        life.insert_rect(Coord::new(0, 0), Coord::new(300, 300));
        life.step();
        assert!(life.evolver.counts.capacity() >= 8 * 90_000);
        assert!(life.current.capacity() >= 90_000 || life.next.capacity() >= 90_000);

        life.clear();
        life.insert_cells([(0, 0), (1, 0), (2, 0)].map(Coord::from));
        life.step_n(2);

        assert!(life.evolver.counts.capacity() < 64);
        assert_eq!(life.current.capacity(), baseline);
        assert_eq!(life.next.capacity(), baseline);
        assert_eq!(*life.live_cells(), set(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn paused_tick_is_a_no_op() {
        let config = LifeConfig::default().start_paused(true);
        let mut life = SparseLife::<SplitMixHash>::with_config(config);
        life.insert_cells([(0, 0), (1, 0), (2, 0)].map(Coord::from));

        assert!(!life.tick());
        assert_eq!(life.generation(), 0);
        assert!(life.contains(Coord::new(0, 0)));

        assert!(!life.toggle_paused());
        assert!(life.tick());
        assert_eq!(life.generation(), 1);
        assert!(life.contains(Coord::new(1, -1)));
    }

    #[test]
    fn frame_applies_input_before_stepping() {
        let mut life = SparseLife::<SplitMixHash>::new();
        let view = life.frame([
            Command::InsertCell(Coord::new(0, 0)),
            Command::InsertCell(Coord::new(1, 0)),
            Command::InsertCell(Coord::new(2, 0)),
        ]);
        assert_eq!(*view, set(&[(1, -1), (1, 0), (1, 1)]));

        let view = life.frame([Command::SetPaused(true), Command::Clear]);
        assert!(view.is_empty());
        assert_eq!(life.generation(), 1);
        assert!(life.is_paused());
    }
}
