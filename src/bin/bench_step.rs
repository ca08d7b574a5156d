//! Per-generation cost of the neighbor-count stepper against the
//! probe-and-rescan reference, for both hashing strategies.
//! Run with: cargo run --release --bin bench_step

#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::RngCore;
use rand::SeedableRng;
use sparse_life::sparselife::naive::DeadScan;
use sparse_life::sparselife::{CombineHash, Coord, CoordHasher, Evolver, LiveSet, SplitMixHash};
use std::time::Instant;

const DENSITY: f64 = 0.35;
const WARMUP: u64 = 3;

fn soup<H: CoordHasher>(side: i32, density: f64, seed: u64) -> LiveSet<H> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut cells = LiveSet::new();
    for y in 0..side {
        for x in 0..side {
            if rng.next_u64() <= threshold {
                cells.insert(Coord::new(x - side / 2, y - side / 2));
            }
        }
    }
    cells
}

/// Returns `(neighbor_count_ms, dead_scan_ms, final_population)` per step.
fn bench<H: CoordHasher>(side: i32, iters: u64) -> (f64, f64, usize) {
    let start_cells = soup::<H>(side, DENSITY, 0x5EED_1234_ABCD_EF01);

    let mut evolver = Evolver::<H>::new();
    let mut current = start_cells.clone();
    let mut next = LiveSet::new();
    for _ in 0..WARMUP {
        evolver.evolve_into(&current, &mut next);
        std::mem::swap(&mut current, &mut next);
    }
    let warm = current.clone();

    let start = Instant::now();
    for _ in 0..iters {
        evolver.evolve_into(&current, &mut next);
        std::mem::swap(&mut current, &mut next);
    }
    let counted_ms = start.elapsed().as_secs_f64() * 1000.0 / iters as f64;
    let population = current.len();

    let mut dead_scan = DeadScan::<H>::new();
    let mut current = warm;
    let start = Instant::now();
    for _ in 0..iters {
        dead_scan.evolve_into(&current, &mut next);
        std::mem::swap(&mut current, &mut next);
    }
    let scanned_ms = start.elapsed().as_secs_f64() * 1000.0 / iters as f64;
    std::hint::black_box(current.len());

    (counted_ms, scanned_ms, population)
}

fn print_row(hash: &str, side: i32, iters: u64, (counted, scanned, pop): (f64, f64, usize)) {
    println!(
        "{:<10} {:<10} {:>6} {:>14.4} {:>14.4} {:>8.2}x {:>10}",
        hash,
        format!("{side}x{side}"),
        iters,
        counted,
        scanned,
        scanned / counted,
        pop
    );
}

fn main() {
    sparse_life::logging::init();

    let scales: &[(i32, u64)] = &[(64, 400), (128, 200), (256, 100), (512, 40), (1024, 10)];

    println!(
        "{:<10} {:<10} {:>6} {:>14} {:>14} {:>9} {:>10}",
        "Hash", "Soup", "Iters", "Count(ms/gen)", "Scan(ms/gen)", "Speedup", "Pop"
    );
    println!("{}", "-".repeat(80));

    for &(side, iters) in scales {
        print_row(CombineHash::NAME, side, iters, bench::<CombineHash>(side, iters));
        print_row(SplitMixHash::NAME, side, iters, bench::<SplitMixHash>(side, iters));
    }
}
