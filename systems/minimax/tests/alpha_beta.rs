use std::num::NonZeroU32;

use maze_chase_core::{CellCoord, MazeView};
use maze_chase_system_minimax::{Minimax, CAPTURE_SCORE};
use maze_chase_world::Maze;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TRIALS: u64 = 150;

#[test]
fn pruned_selection_matches_exhaustive_minimax() {
    for seed in 0..TRIALS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = random_maze(&mut rng);
        let view = maze.view();
        let open: Vec<_> = maze.open_cells().collect();
        if open.is_empty() {
            continue;
        }
        let from = open[rng.gen_range(0..open.len())];
        let target = open[rng.gen_range(0..open.len())];
        let depth = rng.gen_range(1..=4);

        let mut minimax = Minimax::seeded(NonZeroU32::new(depth).expect("depth"), 0.0, seed);

        assert_eq!(
            minimax.next_step(from, target, view),
            exhaustive_step(from, target, view, depth),
            "seed {seed}: pruning changed the selection"
        );
    }
}

#[test]
fn jitter_never_overrides_a_capture() {
    for seed in 0..TRIALS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x77);
        let maze = random_maze(&mut rng);
        let view = maze.view();
        let open: Vec<_> = maze.open_cells().collect();
        let Some(&from) = open.get(rng.gen_range(0..open.len().max(1))) else {
            continue;
        };
        let Some(target) = view.neighbors(from).last() else {
            continue;
        };

        let mut minimax = Minimax::seeded(NonZeroU32::new(3).expect("depth"), 0.1, seed);

        assert_eq!(minimax.next_step(from, target, view), Some(target));
    }
}

fn exhaustive_step(
    from: CellCoord,
    target: CellCoord,
    view: MazeView<'_>,
    depth: u32,
) -> Option<CellCoord> {
    let candidates: Vec<_> = view.neighbors(from).collect();
    if candidates.contains(&target) {
        return Some(target);
    }

    let mut best: Option<(CellCoord, f64)> = None;
    for candidate in candidates {
        let score = exhaustive_score(candidate, target, view, depth, false);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best.map(|(cell, _)| cell)
}

fn exhaustive_score(
    cell: CellCoord,
    target: CellCoord,
    view: MazeView<'_>,
    depth: u32,
    maximizing: bool,
) -> f64 {
    if cell == target {
        return CAPTURE_SCORE;
    }
    let leaf = -f64::from(cell.manhattan_distance(target));
    if depth == 0 {
        return leaf;
    }
    let children: Vec<f64> = view
        .neighbors(cell)
        .map(|neighbor| exhaustive_score(neighbor, target, view, depth - 1, !maximizing))
        .collect();
    if children.is_empty() {
        return leaf;
    }

    if maximizing {
        children.into_iter().fold(f64::NEG_INFINITY, f64::max)
    } else {
        children.into_iter().fold(f64::INFINITY, f64::min)
    }
}

fn random_maze(rng: &mut ChaCha8Rng) -> Maze {
    let width = rng.gen_range(3..8);
    let height = rng.gen_range(3..8);
    let mut blocked = Vec::new();
    for row in 0..height {
        for column in 0..width {
            if rng.gen_bool(0.25) {
                blocked.push(CellCoord::new(column, row));
            }
        }
    }
    Maze::from_blocked(width, height, blocked)
}
