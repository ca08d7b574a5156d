#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::time::{Duration, Instant};

use anyhow::bail;
use clap::Parser;
use rand::{Rng, SeedableRng};
use sparse_life::sparselife::naive::DeadScan;
use sparse_life::sparselife::{
    CombineHash, Command, Coord, CoordHasher, DEFAULT_STAMP_HALF_EXTENT, HashKind, LifeConfig,
    LiveSet, SparseLife, SplitMixHash,
};
use tracing::{info, warn};

/// Upper bound on cells reserved before the first frame.
const MAX_PRESIZE_CELLS: usize = 1 << 24;

/// Headless stand-in for the interactive driver: stamps blocks, runs frames
/// and reports population, optionally checked against the reference stepper.
#[derive(Debug, Parser)]
#[command(name = "sparse-life")]
struct Args {
    /// Generations to advance.
    #[arg(long, default_value_t = 2000)]
    generations: u64,
    /// Report every N generations.
    #[arg(long, default_value_t = 250)]
    check_interval: u64,
    /// Blocks stamped before the first frame.
    #[arg(long, default_value_t = 40)]
    stamps: usize,
    /// Half-width of each stamped block.
    #[arg(long, default_value_t = DEFAULT_STAMP_HALF_EXTENT)]
    half_extent: i32,
    /// Stamp origins are drawn from [-spread, spread].
    #[arg(long, default_value_t = 400)]
    spread: i32,
    #[arg(long, default_value_t = 0x5EED_1234_ABCD_EF01)]
    seed: u64,
    /// Coordinate hashing strategy: combine or splitmix.
    #[arg(long, default_value_t = HashKind::SplitMix)]
    hash: HashKind,
    /// Frames to hold paused halfway through the run.
    #[arg(long, default_value_t = 0)]
    pause_frames: u64,
    /// Cross-check every generation against the probe-and-rescan stepper.
    #[arg(long)]
    verify: bool,
}

fn stamp_commands(args: &Args) -> Vec<Command> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);
    let spread = args.spread.max(0);
    (0..args.stamps)
        .map(|_| Command::InsertBlock {
            origin: Coord::new(
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            ),
            half_extent: args.half_extent,
        })
        .collect()
}

/// Cells covered by the initial stamps, capped at [`MAX_PRESIZE_CELLS`].
fn presize_cells(stamps: usize, half_extent: i32) -> usize {
    let side = (half_extent.max(0) as usize).saturating_mul(2);
    stamps
        .saturating_mul(side.saturating_mul(side))
        .min(MAX_PRESIZE_CELLS)
}

fn run<H: CoordHasher>(args: &Args) -> anyhow::Result<()> {
    let config =
        LifeConfig::default().initial_capacity(presize_cells(args.stamps, args.half_extent));
    let mut life = SparseLife::<H>::with_config(config);
    let mut reference: Option<(DeadScan<H>, LiveSet<H>)> =
        args.verify.then(|| (DeadScan::new(), LiveSet::new()));
    let mut pending = stamp_commands(args);

    let pause_at = args.generations / 2;
    let check_interval = args.check_interval.max(1);
    let mut paused_frames = 0u64;
    let mut mismatches = 0u64;
    let mut total = Duration::ZERO;
    let mut phase = Duration::ZERO;

    info!(
        hash = H::NAME,
        stamps = args.stamps,
        generations = args.generations,
        verify = args.verify,
        "starting run"
    );

    while life.generation() < args.generations {
        let mut commands = std::mem::take(&mut pending);
        if args.pause_frames > 0 && life.generation() == pause_at {
            if !life.is_paused() && paused_frames == 0 {
                commands.push(Command::SetPaused(true));
            } else if paused_frames >= args.pause_frames {
                commands.push(Command::SetPaused(false));
            }
        }
        if let Some((_, cells)) = reference.as_mut() {
            for command in &commands {
                if let Command::InsertBlock {
                    origin,
                    half_extent,
                } = *command
                {
                    cells.insert_block(origin, half_extent);
                }
            }
        }

        let before = life.generation();
        let start = Instant::now();
        life.frame(commands.iter().copied());
        let elapsed = start.elapsed();
        total += elapsed;
        phase += elapsed;

        if life.generation() == before {
            paused_frames += 1;
            continue;
        }

        if let Some((scan, cells)) = reference.as_mut() {
            *cells = scan.evolve(cells);
            if *cells != *life.live_cells() {
                mismatches += 1;
                warn!(
                    generation = life.generation(),
                    engine = life.population(),
                    reference = cells.len(),
                    "generation diverged from reference stepper"
                );
            }
        }

        let generation = life.generation();
        if generation % check_interval == 0 || generation == args.generations {
            let status = match (&reference, mismatches) {
                (None, _) => "",
                (Some(_), 0) => " [MATCH]",
                (Some(_), _) => " [MISMATCH]",
            };
            let phase_ms = phase.as_secs_f64() * 1000.0;
            println!(
                "Generation {generation}: population = {}{status}  ({phase_ms:.3} ms since last report)",
                life.population()
            );
            phase = Duration::ZERO;
        }
    }

    let total_ms = total.as_secs_f64() * 1000.0;
    let avg_ms = total_ms / args.generations.max(1) as f64;
    println!("\n--- Summary ({} generations, hash = {}) ---", args.generations, H::NAME);
    println!("Total: {total_ms:.3} ms, {avg_ms:.6} ms/gen, paused frames = {paused_frames}");
    match life.bounds() {
        Some((min_x, min_y, max_x, max_y)) => {
            println!("Bounds: x {min_x}..={max_x}, y {min_y}..={max_y}")
        }
        None => println!("Bounds: empty"),
    }

    if mismatches > 0 {
        bail!("{mismatches} generations diverged from the reference stepper");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    sparse_life::logging::init();
    let args = Args::parse();
    match args.hash {
        HashKind::Combine => run::<CombineHash>(&args),
        HashKind::SplitMix => run::<SplitMixHash>(&args),
    }
}
