use std::collections::{HashMap, HashSet};

use rand::RngCore;
use rand::SeedableRng;
use sparse_life::sparselife::naive::DeadScan;
use sparse_life::sparselife::{CombineHash, Coord, CoordHasher, LiveSet, SparseLife, SplitMixHash};

fn step_naive(live: &HashSet<(i32, i32)>) -> HashSet<(i32, i32)> {
    let mut counts: HashMap<(i32, i32), u8> = HashMap::new();
    for &(x, y) in live {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                *counts.entry((x + dx, y + dy)).or_insert(0) += 1;
            }
        }
    }
    counts
        .into_iter()
        .filter(|&(cell, n)| n == 3 || (n == 2 && live.contains(&cell)))
        .map(|(cell, _)| cell)
        .collect()
}

fn to_tuples<H: CoordHasher>(cells: &LiveSet<H>) -> HashSet<(i32, i32)> {
    cells.iter().map(<(i32, i32)>::from).collect()
}

fn soup(width: i32, height: i32, density: f64, seed: u64) -> Vec<(i32, i32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut out = Vec::new();
    for y in -(height / 2)..=(height / 2) {
        for x in -(width / 2)..=(width / 2) {
            if rng.next_u64() <= threshold {
                out.push((x, y));
            }
        }
    }
    out
}

fn run_parity_case<H: CoordHasher>(cells: &[(i32, i32)], steps: u64, label: &str) {
    let mut engine = SparseLife::<H>::new();
    engine.insert_cells(cells.iter().copied().map(Coord::from));
    let mut scanned: LiveSet<H> = cells.iter().copied().collect();
    let mut scan = DeadScan::<H>::new();
    let mut naive: HashSet<(i32, i32)> = cells.iter().copied().collect();

    for generation in 1..=steps {
        engine.step();
        scanned = scan.evolve(&scanned);
        naive = step_naive(&naive);

        assert_eq!(
            engine.population(),
            naive.len(),
            "population mismatch for {label} ({}) at generation {generation}",
            H::NAME
        );
        assert_eq!(
            to_tuples(engine.live_cells()),
            naive,
            "live-set mismatch for {label} ({}) at generation {generation}",
            H::NAME
        );
        assert_eq!(
            *engine.live_cells(),
            scanned,
            "dead-scan mismatch for {label} ({}) at generation {generation}",
            H::NAME
        );
    }
}

fn run_both(cells: &[(i32, i32)], steps: u64, label: &str) {
    run_parity_case::<CombineHash>(cells, steps, label);
    run_parity_case::<SplitMixHash>(cells, steps, label);
}

#[test]
fn parity_sparse_mid_dense() {
    run_both(&soup(96, 96, 0.10, 0xA1), 6, "density 0.10");
    run_both(&soup(96, 96, 0.42, 0xB2), 6, "density 0.42");
    run_both(&soup(96, 96, 0.83, 0xC3), 4, "density 0.83");
}

#[test]
fn parity_multiple_seeds() {
    for seed in [11u64, 22, 33, 44] {
        run_both(&soup(72, 72, 0.35, seed), 7, &format!("seed {seed}"));
    }
}

#[test]
fn parity_hand_patterns() {
    let glider = [(1, 0), (2, -1), (0, -2), (1, -2), (2, -2)];
    let r_pentomino = [(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)];
    let lwss = [
        (1, 0),
        (4, 0),
        (0, 1),
        (0, 2),
        (4, 2),
        (0, 3),
        (1, 3),
        (2, 3),
        (3, 3),
    ];
    run_both(&glider, 16, "glider");
    run_both(&r_pentomino, 60, "r-pentomino");
    run_both(&lwss, 20, "lwss");
}

#[test]
fn parity_far_apart_clusters() {
    let mut cells = Vec::new();
    for &(ox, oy) in &[(0, 0), (1_000_000, -1_000_000), (-2_000_000_000, 2_000_000_000)] {
        let cluster = soup(24, 24, 0.4, ox as u64 ^ 0x77);
        cells.extend(cluster.into_iter().map(|(x, y)| (x + ox, y + oy)));
    }
    run_both(&cells, 8, "far clusters");
}
