#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit controller that throttles pursuers and dispatches their decisions
//! to A* or minimax.

use maze_chase_core::{
    Algorithm, CellCoord, Command, Event, MazeView, MoveThrottle, PursuerConfig, PursuerId,
    PursuerView, StrategyConfig,
};
use maze_chase_system_minimax::Minimax;
use thiserror::Error;

/// Decision algorithm fixed for the lifetime of a pursuer.
#[derive(Clone, Debug)]
pub enum Strategy {
    /// Follows the first step of a shortest route.
    AStar,
    /// Follows the best move of a depth-limited game tree.
    Minimax(Minimax),
}

impl Strategy {
    /// Builds the strategy described by a validated configuration.
    #[must_use]
    pub fn from_config(config: StrategyConfig) -> Self {
        match config {
            StrategyConfig::AStar => Self::AStar,
            StrategyConfig::Minimax {
                depth,
                jitter,
                seed,
            } => Self::Minimax(Minimax::seeded(depth, jitter, seed)),
        }
    }

    /// Tag of the algorithm backing the strategy.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::AStar => Algorithm::AStar,
            Self::Minimax(_) => Algorithm::Minimax,
        }
    }

    /// Proposes the next cell for a pursuer standing on `from`.
    pub fn next_step(
        &mut self,
        from: CellCoord,
        target: CellCoord,
        maze: MazeView<'_>,
    ) -> Option<CellCoord> {
        match self {
            Self::AStar => maze_chase_system_astar::next_step(from, target, maze),
            Self::Minimax(minimax) => minimax.next_step(from, target, maze),
        }
    }
}

/// A single computer-controlled chaser.
#[derive(Clone, Debug)]
pub struct Pursuer {
    cell: CellCoord,
    throttle: MoveThrottle,
    strategy: Strategy,
}

impl Pursuer {
    /// Places a pursuer on `cell` with the configured throttle and strategy.
    #[must_use]
    pub fn new(cell: CellCoord, config: &PursuerConfig) -> Self {
        Self {
            cell,
            throttle: MoveThrottle::new(config.move_delay()),
            strategy: Strategy::from_config(config.strategy()),
        }
    }

    /// Cell the pursuer currently occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Move-rate throttle state.
    #[must_use]
    pub const fn throttle(&self) -> MoveThrottle {
        self.throttle
    }

    /// Algorithm the pursuer decides with.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.strategy.algorithm()
    }

    /// Advances the throttle and, once it releases, moves toward the target.
    ///
    /// Returns the newly committed cell, or `None` when the throttle held the
    /// pursuer back or the strategy found no move.
    pub fn on_tick(&mut self, target: CellCoord, maze: MazeView<'_>) -> Option<CellCoord> {
        if !self.throttle.tick() {
            return None;
        }
        let next = self.strategy.next_step(self.cell, target, maze)?;
        self.cell = next;
        Some(next)
    }

    /// Overrides the pursuer's cell with the authoritative position.
    pub fn relocate(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    /// Clears accumulated throttle progress.
    pub fn reset_throttle(&mut self) {
        self.throttle.reset();
    }
}

/// Errors raised while assembling the pursuit system.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PursuitError {
    /// The number of configurations differs from the number of spawned pursuers.
    #[error("{configured} pursuer configurations for {spawned} spawned pursuers")]
    RosterMismatch {
        /// Number of configurations supplied.
        configured: usize,
        /// Number of pursuers present in the world.
        spawned: usize,
    },
}

/// Pure system that reacts to world ticks and emits pursuer moves.
#[derive(Debug)]
pub struct Pursuit {
    roster: Vec<(PursuerId, Pursuer)>,
}

impl Pursuit {
    /// Pairs configurations with the spawned pursuers in identifier order.
    pub fn new(configs: &[PursuerConfig], pursuers: &PursuerView) -> Result<Self, PursuitError> {
        if configs.len() != pursuers.len() {
            return Err(PursuitError::RosterMismatch {
                configured: configs.len(),
                spawned: pursuers.len(),
            });
        }

        warn_on_shared_seeds(configs);
        let roster = pursuers
            .iter()
            .zip(configs)
            .map(|(snapshot, config)| (snapshot.id, Pursuer::new(snapshot.cell, config)))
            .collect();
        Ok(Self { roster })
    }

    /// Looks up the controller state of a pursuer.
    #[must_use]
    pub fn pursuer(&self, id: PursuerId) -> Option<&Pursuer> {
        self.roster
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, pursuer)| pursuer)
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// The target cell is held fixed for the whole batch.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: MazeView<'_>,
        target: CellCoord,
        pursuers: &PursuerView,
        out: &mut Vec<Command>,
    ) {
        for (id, pursuer) in &mut self.roster {
            if let Some(cell) = pursuers.cell_of(*id) {
                pursuer.relocate(cell);
            }
        }

        for event in events {
            match event {
                Event::SessionReset => {
                    for (_, pursuer) in &mut self.roster {
                        pursuer.reset_throttle();
                    }
                }
                Event::TimeAdvanced { .. } => self.advance(maze, target, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, maze: MazeView<'_>, target: CellCoord, out: &mut Vec<Command>) {
        for (id, pursuer) in &mut self.roster {
            let from = pursuer.cell();
            let Some(to) = pursuer.on_tick(target, maze) else {
                continue;
            };
            tracing::debug!(
                pursuer = id.get(),
                algorithm = %pursuer.algorithm(),
                ?from,
                ?to,
                "pursuer decided"
            );
            out.push(Command::MovePursuer { pursuer: *id, to });
        }
    }
}

fn warn_on_shared_seeds(configs: &[PursuerConfig]) {
    let seeds: Vec<u64> = configs
        .iter()
        .filter_map(|config| match config.strategy() {
            StrategyConfig::Minimax { jitter, seed, .. } if jitter > 0.0 => Some(seed),
            _ => None,
        })
        .collect();
    for (index, seed) in seeds.iter().enumerate() {
        if seeds[..index].contains(seed) {
            tracing::warn!(seed, "minimax pursuers share a jitter seed");
        }
    }
}
