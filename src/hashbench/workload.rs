//! Synthetic coordinate workloads.
//!
//! Both generators are deterministic: the random one through a seeded
//! `StdRng`, the clustered one by construction.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::BenchError;
use crate::sparselife::Coord;

/// Seed shared by every strategy so they are measured on identical points.
pub const DEFAULT_SEED: u64 = 12345;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Each component uniform over `[-spread, spread]`.
    Random,
    /// Raster walk over `[-spread/2, spread/2]`, modelling rectangle stamps.
    Clustered,
}

impl Pattern {
    pub const ALL: [Pattern; 2] = [Pattern::Random, Pattern::Clustered];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Random => "random",
            Pattern::Clustered => "clustered",
        }
    }

    pub fn generate(self, count: usize, spread: i32, seed: u64) -> Result<Vec<Coord>, BenchError> {
        match self {
            Pattern::Random => random_points(count, spread, seed),
            Pattern::Clustered => clustered_points(count, spread),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Pattern::Random),
            "clustered" => Ok(Pattern::Clustered),
            other => Err(format!(
                "unknown pattern: {other} (expected random or clustered)"
            )),
        }
    }
}

pub fn random_points(count: usize, spread: i32, seed: u64) -> Result<Vec<Coord>, BenchError> {
    if spread < 0 {
        return Err(BenchError::NegativeSpread(spread));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x = rng.random_range(-spread..=spread);
        let y = rng.random_range(-spread..=spread);
        points.push(Coord::new(x, y));
    }
    Ok(points)
}

/// Walk `[-spread/2, spread/2]` row by row with stride
/// `max(2, max(8, spread/16) / 4)`, restarting from the corner once the
/// square is exhausted. Always yields exactly `count` points.
pub fn clustered_points(count: usize, spread: i32) -> Result<Vec<Coord>, BenchError> {
    if spread < 0 {
        return Err(BenchError::NegativeSpread(spread));
    }
    let cluster = (spread / 16).max(8);
    let step = (cluster / 4).max(2);
    let lo = -spread / 2;
    let hi = spread / 2;

    let mut points = Vec::with_capacity(count);
    let (mut x, mut y) = (lo, lo);
    for _ in 0..count {
        points.push(Coord::new(x, y));
        x += step;
        if x > hi {
            x = lo;
            y += step;
        }
        if y > hi {
            y = lo;
        }
    }
    Ok(points)
}
