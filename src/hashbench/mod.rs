//! Hash strategy microbenchmark: synthetic workloads, timed insert/lookup
//! passes and median-of-trials reporting.

mod config;
mod error;
mod measure;
mod sweep;
mod workload;

pub use config::{BenchConfig, SweepConfig};
pub use error::BenchError;
pub use measure::{BenchResult, TrialSample, median, run_bench, run_bench_kind, run_trial};
pub use sweep::{CSV_HEADER, SweepRow, format_result, run_single, run_sweep};
pub use workload::{DEFAULT_SEED, Pattern, clustered_points, random_points};
