//! Insert/lookup throughput of a `CoordMap` under one hashing strategy.
//!
//! Trials run back to back on one thread; each gets a fresh table sized for
//! twice the workload so growth never lands inside a timed pass.

use std::hint::black_box;
use std::time::Instant;

use tracing::{debug, warn};

use super::error::BenchError;
use crate::sparselife::{CombineHash, Coord, CoordHasher, CoordMap, HashKind, SplitMixHash};

/// Timer floor so a sub-resolution pass does not report infinite throughput.
const MIN_ELAPSED_SECS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialSample {
    pub insert_mops: f64,
    pub lookup_mops: f64,
    pub hits: usize,
}

/// Median throughput over all trials, in millions of operations per second.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchResult {
    pub name: String,
    pub insert_mops: f64,
    pub lookup_mops: f64,
}

#[inline]
fn mops(ops: usize, secs: f64) -> f64 {
    ops as f64 / secs.max(MIN_ELAPSED_SECS) / 1e6
}

/// Upper median: the element at `len / 2` once selected. `None` if empty.
pub fn median(samples: &mut [f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mid = samples.len() / 2;
    let (_, value, _) = samples.select_nth_unstable_by(mid, f64::total_cmp);
    Some(*value)
}

/// Time one insert pass and one all-hit lookup pass over `points`.
pub fn run_trial<H: CoordHasher>(points: &[Coord]) -> TrialSample {
    let mut table = CoordMap::<(), H>::with_capacity(points.len() * 2);

    let start = Instant::now();
    for &p in points {
        table.insert(p, ());
    }
    let insert_secs = start.elapsed().as_secs_f64();

    let mut hits = 0usize;
    let start = Instant::now();
    for &p in points {
        hits += table.contains(black_box(p)) as usize;
    }
    let lookup_secs = start.elapsed().as_secs_f64();
    black_box(&table);

    TrialSample {
        insert_mops: mops(points.len(), insert_secs),
        lookup_mops: mops(points.len(), lookup_secs),
        hits,
    }
}

/// Log a warning when a lookup pass over `points` keys found none of them,
/// which means hashing and equality disagree. Returns whether it warned.
fn flag_lookup_misses(
    hasher: &str,
    label: &str,
    trial: usize,
    points: usize,
    hits: usize,
) -> bool {
    if points == 0 || hits > 0 {
        return false;
    }
    warn!(hasher, label, trial, points, "unexpected: zero hits on lookup pass");
    true
}

/// Run `trials` trials and report the median of each throughput column.
///
/// A trial with zero lookup hits means hashing and equality disagree; it is
/// logged and still counted.
pub fn run_bench<H: CoordHasher>(
    name: &str,
    points: &[Coord],
    trials: usize,
) -> Result<BenchResult, BenchError> {
    if trials == 0 {
        return Err(BenchError::NoTrials);
    }
    if points.is_empty() {
        return Err(BenchError::EmptyWorkload);
    }

    let mut insert_samples = Vec::with_capacity(trials);
    let mut lookup_samples = Vec::with_capacity(trials);
    for trial in 0..trials {
        let sample = run_trial::<H>(points);
        flag_lookup_misses(H::NAME, name, trial, points.len(), sample.hits);
        debug!(
            hasher = H::NAME,
            label = name,
            trial,
            insert_mops = sample.insert_mops,
            lookup_mops = sample.lookup_mops,
            hits = sample.hits,
            "trial done"
        );
        insert_samples.push(sample.insert_mops);
        lookup_samples.push(sample.lookup_mops);
    }

    Ok(BenchResult {
        name: name.to_owned(),
        insert_mops: median(&mut insert_samples).unwrap_or_default(),
        lookup_mops: median(&mut lookup_samples).unwrap_or_default(),
    })
}

/// [`run_bench`] with the strategy picked at runtime.
pub fn run_bench_kind(
    kind: HashKind,
    name: &str,
    points: &[Coord],
    trials: usize,
) -> Result<BenchResult, BenchError> {
    match kind {
        HashKind::Combine => run_bench::<CombineHash>(name, points, trials),
        HashKind::SplitMix => run_bench::<SplitMixHash>(name, points, trials),
    }
}
