//! Sparse hash-set Conway's Game of Life engine (B3/S23) and a coordinate
//! hashing microbenchmark.

pub mod hashbench;
pub mod logging;
pub mod sparselife;
pub use sparselife::{Coord, HashKind, LiveSet, SparseLife, evolve};
