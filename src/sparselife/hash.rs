//! Coordinate hashing strategies.
//!
//! A strategy is a zero-sized type implementing [`CoordHasher`]; tables take it
//! as a type parameter so the probe loop monomorphizes per strategy. Both
//! strategies are pure functions of the coordinate and agree with `Coord`
//! equality.

use std::fmt;
use std::str::FromStr;

use super::coord::Coord;

/// Golden-ratio mixing constant used by the combine fold.
const COMBINE_GOLDEN: u64 = 0x9e37_79b9;

/// splitmix64 increment and finalizer multipliers.
const SPLITMIX_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const SPLITMIX_M1: u64 = 0xbf58_476d_1ce4_e5b9;
const SPLITMIX_M2: u64 = 0x94d0_49bb_1331_11eb;

pub trait CoordHasher {
    /// Short label used in benchmark reports.
    const NAME: &'static str;

    fn hash(c: Coord) -> u64;
}

/// Seed with `x`, then fold `y` in with the golden-ratio combine step.
///
/// Cheap, but neighbors that differ by small regular deltas produce
/// correlated low bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombineHash;

impl CoordHasher for CombineHash {
    const NAME: &'static str = "combine";

    #[inline(always)]
    fn hash(c: Coord) -> u64 {
        // Integer hashing is the identity on the sign-extended component.
        let mut seed = c.x as i64 as u64;
        let hy = c.y as i64 as u64;
        seed ^= hy
            .wrapping_add(COMBINE_GOLDEN)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2);
        seed
    }
}

/// Pack both components into one 64-bit key and run the splitmix64
/// finalizer over it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitMixHash;

impl SplitMixHash {
    /// `(x as u32) << 32 | (y as u32)`. Negative components keep their
    /// two's-complement bit pattern.
    #[inline(always)]
    pub const fn pack(c: Coord) -> u64 {
        ((c.x as u32 as u64) << 32) | (c.y as u32 as u64)
    }
}

#[inline(always)]
pub const fn splitmix64(mut k: u64) -> u64 {
    k = k.wrapping_add(SPLITMIX_GAMMA);
    k = (k ^ (k >> 30)).wrapping_mul(SPLITMIX_M1);
    k = (k ^ (k >> 27)).wrapping_mul(SPLITMIX_M2);
    k ^ (k >> 31)
}

impl CoordHasher for SplitMixHash {
    const NAME: &'static str = "splitmix";

    #[inline(always)]
    fn hash(c: Coord) -> u64 {
        splitmix64(Self::pack(c))
    }
}

/// Runtime name for a hashing strategy, for CLI selection and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashKind {
    Combine,
    SplitMix,
}

impl HashKind {
    pub const ALL: [HashKind; 2] = [HashKind::Combine, HashKind::SplitMix];

    pub fn name(self) -> &'static str {
        match self {
            HashKind::Combine => CombineHash::NAME,
            HashKind::SplitMix => SplitMixHash::NAME,
        }
    }

    /// Hash a single coordinate with this strategy.
    pub fn hash(self, c: Coord) -> u64 {
        match self {
            HashKind::Combine => CombineHash::hash(c),
            HashKind::SplitMix => SplitMixHash::hash(c),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combine" => Ok(HashKind::Combine),
            "splitmix" => Ok(HashKind::SplitMix),
            other => Err(format!(
                "unknown hash strategy: {other} (expected combine or splitmix)"
            )),
        }
    }
}
