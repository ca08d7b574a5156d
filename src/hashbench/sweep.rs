//! Single comparison and CSV sweep drivers plus their output formats.

use std::fmt;

use tracing::info;

use super::config::{BenchConfig, SweepConfig};
use super::error::BenchError;
use super::measure::{BenchResult, run_bench_kind};
use super::workload::Pattern;
use crate::sparselife::HashKind;

pub const CSV_HEADER: &str = "count,spread,pattern,hash,insert_mops,lookup_mops";

/// Label printed for each strategy in the human-readable report.
fn single_label(kind: HashKind) -> &'static str {
    match kind {
        HashKind::Combine => "combine hash",
        HashKind::SplitMix => "packed splitmix",
    }
}

/// `<name padded to 28> insert: N Mops/s  lookup: N Mops/s`
pub fn format_result(result: &BenchResult) -> String {
    format!(
        "{:<28} insert: {:.2} Mops/s  lookup: {:.2} Mops/s",
        result.name, result.insert_mops, result.lookup_mops
    )
}

/// Every strategy against the workload described by `cfg`, in
/// `HashKind::ALL` order.
pub fn run_single(cfg: &BenchConfig) -> Result<Vec<BenchResult>, BenchError> {
    cfg.validate()?;
    let points = cfg.pattern.generate(cfg.count, cfg.spread, cfg.seed)?;
    info!(
        pattern = cfg.pattern.name(),
        count = cfg.count,
        spread = cfg.spread,
        trials = cfg.trials,
        "running single comparison"
    );
    HashKind::ALL
        .iter()
        .map(|&kind| run_bench_kind(kind, single_label(kind), &points, cfg.trials))
        .collect()
}

/// One line of sweep output.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepRow {
    pub count: usize,
    pub spread: i32,
    pub pattern: Pattern,
    pub hash: HashKind,
    pub insert_mops: f64,
    pub lookup_mops: f64,
}

impl fmt::Display for SweepRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{:.4},{:.4}",
            self.count, self.spread, self.pattern, self.hash, self.insert_mops, self.lookup_mops
        )
    }
}

/// Run counts x spreads x patterns x strategies, handing each row to `emit`
/// as soon as it is measured. Rows for one `(count, spread)` come out as
/// random/combine, random/splitmix, clustered/combine, clustered/splitmix.
pub fn run_sweep<F>(cfg: &SweepConfig, mut emit: F) -> Result<usize, BenchError>
where
    F: FnMut(&SweepRow),
{
    cfg.validate()?;
    let mut rows = 0usize;
    for &count in &cfg.counts {
        for &spread in &cfg.spreads {
            info!(count, spread, "sweep cell");
            for pattern in Pattern::ALL {
                let points = pattern.generate(count, spread, cfg.seed)?;
                for kind in HashKind::ALL {
                    let result = run_bench_kind(kind, kind.name(), &points, cfg.trials)?;
                    emit(&SweepRow {
                        count,
                        spread,
                        pattern,
                        hash: kind,
                        insert_mops: result.insert_mops,
                        lookup_mops: result.lookup_mops,
                    });
                    rows += 1;
                }
            }
        }
    }
    Ok(rows)
}
