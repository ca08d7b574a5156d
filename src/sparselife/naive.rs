//! Reference stepper: probe-and-rescan.
//!
//! Each live cell probes its 8 neighbors directly and remembers the dead
//! ones; a second pass re-probes every remembered dead cell to decide
//! births. Same output as [`super::engine::evolve`] with up to twice the
//! probes, so it is only used to cross-check the production stepper.

use super::coord::Coord;
use super::engine::next_alive;
use super::hash::{CoordHasher, SplitMixHash};
use super::live_set::LiveSet;

#[inline]
fn live_neighbors<H: CoordHasher>(current: &LiveSet<H>, c: Coord) -> u8 {
    c.neighbors().filter(|&n| current.contains(n)).count() as u8
}

/// Probe-and-rescan stepper with reusable candidate-dead scratch.
pub struct DeadScan<H = SplitMixHash> {
    dead: LiveSet<H>,
}

impl<H: CoordHasher> Default for DeadScan<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CoordHasher> DeadScan<H> {
    pub fn new() -> Self {
        Self {
            dead: LiveSet::new(),
        }
    }

    pub fn evolve_into(&mut self, current: &LiveSet<H>, next: &mut LiveSet<H>) {
        let dead = &mut self.dead;
        dead.clear();
        next.clear();

        for p in current.iter() {
            let mut count = 0u8;
            for n in p.neighbors() {
                if current.contains(n) {
                    count += 1;
                } else {
                    // Set insert dedups repeated candidates.
                    dead.insert(n);
                }
            }
            if next_alive(count, true) {
                next.insert(p);
            }
        }

        for d in dead.iter() {
            if next_alive(live_neighbors(current, d), false) {
                next.insert(d);
            }
        }
    }

    pub fn evolve(&mut self, current: &LiveSet<H>) -> LiveSet<H> {
        let mut next = LiveSet::with_capacity(current.len());
        self.evolve_into(current, &mut next);
        next
    }
}

/// One probe-and-rescan generation with fresh scratch.
pub fn evolve_dead_scan<H: CoordHasher>(current: &LiveSet<H>) -> LiveSet<H> {
    DeadScan::new().evolve(current)
}
