//! Sparse Game of Life: hashed live sets and the neighbor-count stepper.

mod coord;
mod coord_map;
mod engine;
mod hash;
mod live_set;
pub mod naive;

pub use coord::{Coord, NEIGHBOR_OFFSETS};
pub use coord_map::CoordMap;
pub use engine::{
    Command, DEFAULT_STAMP_HALF_EXTENT, Evolver, LifeConfig, SparseLife, evolve, next_alive,
};
pub use hash::{CombineHash, CoordHasher, HashKind, SplitMixHash, splitmix64};
pub use live_set::LiveSet;
