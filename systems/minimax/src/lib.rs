#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Depth-limited minimax pursuer with alpha-beta pruning.
//!
//! The game tree is implicit: a node is the pursuer cell together with the
//! remaining depth and whether the ply maximizes. Both plies move the same
//! pursuer cell; the minimizing ply models a pessimistic choice of follow-up
//! moves. Leaves score the negated Manhattan distance to the target plus a
//! small jitter drawn from an injected generator.

use std::num::NonZeroU32;

use maze_chase_core::{CellCoord, MazeView, DEFAULT_JITTER_AMPLITUDE, DEFAULT_JITTER_SEED};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Score of any node whose cell coincides with the target.
pub const CAPTURE_SCORE: f64 = 1000.0;

/// Minimax decision maker owning its jitter source.
#[derive(Clone, Debug)]
pub struct Minimax<R = ChaCha8Rng> {
    depth: NonZeroU32,
    amplitude: f64,
    rng: R,
}

impl Minimax<ChaCha8Rng> {
    /// Creates a searcher with the default jitter amplitude and seed.
    #[must_use]
    pub fn new(depth: NonZeroU32) -> Self {
        Self::seeded(depth, DEFAULT_JITTER_AMPLITUDE, DEFAULT_JITTER_SEED)
    }

    /// Creates a searcher whose jitter comes from a ChaCha generator seeded with `seed`.
    #[must_use]
    pub fn seeded(depth: NonZeroU32, amplitude: f64, seed: u64) -> Self {
        Self::with_rng(depth, amplitude, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Minimax<R> {
    /// Creates a searcher drawing jitter from the provided generator.
    ///
    /// Amplitudes that are negative or not finite disable jitter.
    #[must_use]
    pub fn with_rng(depth: NonZeroU32, amplitude: f64, rng: R) -> Self {
        let amplitude = if amplitude.is_finite() && amplitude > 0.0 {
            amplitude
        } else {
            0.0
        };
        Self {
            depth,
            amplitude,
            rng,
        }
    }

    /// Number of plies searched below each candidate move.
    #[must_use]
    pub const fn depth(&self) -> NonZeroU32 {
        self.depth
    }

    /// Half-width of the uniform jitter added to leaf scores.
    #[must_use]
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Chooses the neighbor of `from` with the greatest minimax score.
    ///
    /// A neighbor equal to `target` is taken immediately. Otherwise every
    /// neighbor is scored with a fresh alpha-beta window starting at the
    /// minimizing ply, and the first neighbor with the strictly greatest score
    /// wins. Returns `None` when `from` has no valid neighbor.
    pub fn next_step(
        &mut self,
        from: CellCoord,
        target: CellCoord,
        maze: MazeView<'_>,
    ) -> Option<CellCoord> {
        let candidates = maze.neighbors(from);
        if candidates.len() == 0 {
            return None;
        }
        if candidates.clone().any(|cell| cell == target) {
            return Some(target);
        }

        let depth = self.depth.get();
        let mut search = Search {
            target,
            maze,
            amplitude: self.amplitude,
            rng: &mut self.rng,
            leaves: 0,
        };
        let mut best: Option<(CellCoord, f64)> = None;
        for candidate in candidates {
            let score = search.score(candidate, depth, false, f64::NEG_INFINITY, f64::INFINITY);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        let leaves = search.leaves;
        tracing::trace!(?from, ?target, leaves, "minimax search finished");
        best.map(|(cell, _)| cell)
    }
}

struct Search<'a, R> {
    target: CellCoord,
    maze: MazeView<'a>,
    amplitude: f64,
    rng: &'a mut R,
    leaves: u64,
}

impl<R: Rng> Search<'_, R> {
    fn score(
        &mut self,
        cell: CellCoord,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        if cell == self.target {
            return CAPTURE_SCORE;
        }
        let neighbors = self.maze.neighbors(cell);
        if depth == 0 || neighbors.len() == 0 {
            return self.evaluate(cell);
        }

        if maximizing {
            let mut value = f64::NEG_INFINITY;
            for neighbor in neighbors {
                value = value.max(self.score(neighbor, depth - 1, false, alpha, beta));
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = f64::INFINITY;
            for neighbor in neighbors {
                value = value.min(self.score(neighbor, depth - 1, true, alpha, beta));
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        }
    }

    fn evaluate(&mut self, cell: CellCoord) -> f64 {
        self.leaves += 1;
        let distance = f64::from(cell.manhattan_distance(self.target));
        if self.amplitude == 0.0 {
            return -distance;
        }
        -distance + self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_world::Maze;

    fn depth(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).expect("non-zero depth")
    }

    #[test]
    fn adjacent_target_is_captured() {
        let maze = Maze::bordered(7, 7);
        let mut minimax = Minimax::new(depth(3));

        for target in [
            CellCoord::new(3, 2),
            CellCoord::new(3, 4),
            CellCoord::new(2, 3),
            CellCoord::new(4, 3),
        ] {
            assert_eq!(
                minimax.next_step(CellCoord::new(3, 3), target, maze.view()),
                Some(target)
            );
        }
    }

    #[test]
    fn capture_beats_an_equally_scored_dead_end() {
        let maze = Maze::parse(
            "
            #####
            #...#
            #####
            ",
        )
        .expect("valid maze");
        let mut minimax = Minimax::seeded(depth(3), 0.0, 1);

        assert_eq!(
            minimax.next_step(CellCoord::new(2, 1), CellCoord::new(3, 1), maze.view()),
            Some(CellCoord::new(3, 1))
        );
    }

    #[test]
    fn enclosed_pursuer_stays_put() {
        let maze = Maze::parse(
            "
            ###
            #.#
            ###
            ",
        )
        .expect("valid maze");
        let mut minimax = Minimax::new(depth(3));

        assert_eq!(
            minimax.next_step(CellCoord::new(1, 1), CellCoord::new(1, 1), maze.view()),
            None
        );
    }

    #[test]
    fn corner_pursuer_moves_toward_the_target() {
        let maze = Maze::bordered(5, 5);
        let mut minimax = Minimax::seeded(depth(3), 0.0, 0);

        let step = minimax.next_step(CellCoord::new(1, 1), CellCoord::new(3, 3), maze.view());

        assert!(matches!(
            step,
            Some(cell) if cell == CellCoord::new(1, 2) || cell == CellCoord::new(2, 1)
        ));
    }

    #[test]
    fn corridor_pursuer_walks_toward_the_target() {
        let maze = Maze::parse(
            "
            #########
            #.......#
            #########
            ",
        )
        .expect("valid maze");
        let mut minimax = Minimax::seeded(depth(3), 0.0, 0);

        assert_eq!(
            minimax.next_step(CellCoord::new(4, 1), CellCoord::new(7, 1), maze.view()),
            Some(CellCoord::new(5, 1))
        );
    }

    #[test]
    fn constructors_keep_the_requested_depth() {
        assert_eq!(Minimax::new(depth(3)).depth().get(), 3);
        assert_eq!(Minimax::seeded(depth(7), 0.0, 1).depth().get(), 7);
    }

    #[test]
    fn invalid_amplitudes_disable_jitter() {
        let seed = 3;
        assert_eq!(Minimax::seeded(depth(1), -1.0, seed).amplitude(), 0.0);
        assert_eq!(Minimax::seeded(depth(1), f64::NAN, seed).amplitude(), 0.0);
        assert_eq!(Minimax::seeded(depth(1), 0.25, seed).amplitude(), 0.25);
    }

    #[test]
    fn leaf_jitter_stays_within_amplitude() {
        let maze = Maze::bordered(9, 9);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut search = Search {
            target: CellCoord::new(7, 7),
            maze: maze.view(),
            amplitude: 0.1,
            rng: &mut rng,
            leaves: 0,
        };

        for _ in 0..100 {
            let score = search.evaluate(CellCoord::new(4, 7));
            assert!((-3.1..=-2.9).contains(&score), "score {score} out of range");
        }
        assert_eq!(search.leaves, 100);
    }

    #[test]
    fn equal_seeds_produce_equal_decisions() {
        let maze = Maze::classic(25, 19);
        let mut first = Minimax::seeded(depth(3), 0.1, 42);
        let mut second = Minimax::seeded(depth(3), 0.1, 42);
        let target = CellCoord::new(12, 12);

        for cell in maze.open_cells().take(40) {
            assert_eq!(
                first.next_step(cell, target, maze.view()),
                second.next_step(cell, target, maze.view())
            );
        }
    }
}
