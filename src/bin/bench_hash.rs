//! Coordinate hash strategy benchmark: insert and lookup throughput.
//! Run with: cargo run --release --bin bench_hash [-- --csv | [--pattern P] count [spread [trials]]]

#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use sparse_life::hashbench::{
    BenchConfig, CSV_HEADER, DEFAULT_SEED, Pattern, SweepConfig, format_result, run_single,
    run_sweep,
};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "bench_hash",
    about = "Compare combine and packed-splitmix coordinate hashing"
)]
struct Args {
    /// Run the full count x spread x pattern x hash sweep and print CSV.
    #[arg(long)]
    csv: bool,
    /// Seed for the uniform-random workload.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Workload for the single comparison: random or clustered.
    #[arg(long)]
    pattern: Option<Pattern>,
    /// Points per workload (single comparison only).
    count: Option<usize>,
    /// Components drawn from [-spread, spread] (single comparison only).
    spread: Option<i32>,
    /// Trials per strategy; the median is reported (single comparison only).
    trials: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    sparse_life::logging::init();
    let args = Args::parse();

    if args.csv {
        if args.count.is_some()
            || args.spread.is_some()
            || args.trials.is_some()
            || args.pattern.is_some()
        {
            warn!("overrides only apply to the single comparison; ignoring them");
        }
        let cfg = SweepConfig::default().seed(args.seed);
        println!("{CSV_HEADER}");
        let rows = run_sweep(&cfg, |row| println!("{row}"))?;
        info!(rows, "sweep complete");
        return Ok(());
    }

    let mut cfg = BenchConfig::default().seed(args.seed);
    if let Some(count) = args.count {
        cfg = cfg.count(count);
    }
    if let Some(spread) = args.spread {
        cfg = cfg.spread(spread);
    }
    if let Some(trials) = args.trials {
        cfg = cfg.trials(trials);
    }
    if let Some(pattern) = args.pattern {
        cfg = cfg.pattern(pattern);
    }

    for result in run_single(&cfg)? {
        println!("{}", format_result(&result));
    }
    Ok(())
}
