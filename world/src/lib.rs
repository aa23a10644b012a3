#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Maze Chase.
//!
//! The world owns the maze, the target, the pursuer positions, the dots and
//! the score. It changes only through [`apply`], which validates each
//! [`Command`] and reports accepted mutations as [`Event`] values. Rejected
//! commands produce no events.

use std::num::NonZeroU32;

use maze_chase_core::{
    CellCoord, Command, Direction, Event, MoveThrottle, PlayStatus, PursuerId, PursuerSnapshot,
};
use thiserror::Error;

pub mod maze;
pub mod spawn;

pub use maze::{Maze, MazeParseError, CLASSIC_HEIGHT, CLASSIC_WIDTH};
pub use spawn::{scatter, SpawnError, SpawnLayout, DEFAULT_MIN_PURSUER_DISTANCE};

/// Ticks the target needs between steps unless configured otherwise.
pub const DEFAULT_TARGET_MOVE_DELAY: NonZeroU32 = match NonZeroU32::new(6) {
    Some(delay) => delay,
    None => NonZeroU32::MIN,
};

/// Score awarded for each collected dot.
pub const DOT_SCORE: u32 = 10;

/// Reasons a world cannot be created from the provided layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The target spawn cell is blocked or outside the maze.
    #[error("target spawn {0:?} is not an open cell")]
    TargetSpawnBlocked(CellCoord),
    /// A pursuer spawn cell is blocked or outside the maze.
    #[error("pursuer {index} spawn {cell:?} is not an open cell")]
    PursuerSpawnBlocked {
        /// Position of the pursuer within the layout.
        index: usize,
        /// Offending spawn cell.
        cell: CellCoord,
    },
}

/// Represents the authoritative Maze Chase session state.
#[derive(Debug)]
pub struct World {
    maze: Maze,
    layout: SpawnLayout,
    target: CellCoord,
    target_throttle: MoveThrottle,
    pursuers: Vec<Pursuer>,
    dots: Vec<bool>,
    dots_remaining: usize,
    score: u32,
    status: PlayStatus,
    tick_index: u64,
}

impl World {
    /// Creates a session on the maze with agents placed per the layout.
    ///
    /// Every open cell other than the spawn cells receives a dot.
    pub fn new(maze: Maze, layout: SpawnLayout) -> Result<Self, WorldError> {
        let view = maze.view();
        if !view.is_valid(layout.target) {
            return Err(WorldError::TargetSpawnBlocked(layout.target));
        }
        if let Some((index, cell)) = layout
            .pursuers
            .iter()
            .copied()
            .enumerate()
            .find(|(_, cell)| !view.is_valid(*cell))
        {
            return Err(WorldError::PursuerSpawnBlocked { index, cell });
        }

        let mut world = Self {
            target: layout.target,
            target_throttle: MoveThrottle::new(DEFAULT_TARGET_MOVE_DELAY),
            pursuers: Vec::new(),
            dots: Vec::new(),
            dots_remaining: 0,
            score: 0,
            status: PlayStatus::Playing,
            tick_index: 0,
            maze,
            layout,
        };
        world.reset();
        Ok(world)
    }

    /// Replaces the number of ticks the target needs between steps.
    #[must_use]
    pub fn with_target_move_delay(mut self, delay: NonZeroU32) -> Self {
        self.target_throttle = MoveThrottle::new(delay);
        self
    }

    fn reset(&mut self) {
        self.target = self.layout.target;
        self.target_throttle.reset();
        self.pursuers = self
            .layout
            .pursuers
            .iter()
            .enumerate()
            .map(|(index, cell)| Pursuer {
                id: PursuerId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                cell: *cell,
            })
            .collect();

        let view = self.maze.view();
        self.dots = vec![false; view.cell_count()];
        self.dots_remaining = 0;
        for cell in self.maze.open_cells() {
            if cell == self.target || self.pursuers.iter().any(|pursuer| pursuer.cell == cell) {
                continue;
            }
            if let Some(slot) = view.index(cell).and_then(|index| self.dots.get_mut(index)) {
                *slot = true;
                self.dots_remaining += 1;
            }
        }

        self.score = 0;
        self.status = PlayStatus::Playing;
        self.tick_index = 0;
    }

    fn step_target(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.target_throttle.tick() {
            return;
        }

        let Some(destination) = self
            .target
            .step(direction)
            .filter(|cell| self.maze.view().is_valid(*cell))
        else {
            return;
        };

        let from = self.target;
        self.target = destination;
        out_events.push(Event::TargetMoved {
            from,
            to: destination,
        });

        self.collect_dot(out_events);
        if self.resolve_capture(out_events) {
            return;
        }
        self.resolve_cleared(out_events);
    }

    fn move_pursuer(&mut self, id: PursuerId, to: CellCoord, out_events: &mut Vec<Event>) {
        if !self.maze.view().is_valid(to) {
            return;
        }
        let Some(pursuer) = self.pursuers.iter_mut().find(|pursuer| pursuer.id == id) else {
            return;
        };
        if pursuer.cell.direction_to(to).is_none() {
            return;
        }

        let from = pursuer.cell;
        pursuer.cell = to;
        out_events.push(Event::PursuerMoved {
            pursuer: id,
            from,
            to,
        });
        let _ = self.resolve_capture(out_events);
    }

    fn collect_dot(&mut self, out_events: &mut Vec<Event>) {
        let view = self.maze.view();
        let Some(slot) = view
            .index(self.target)
            .and_then(|index| self.dots.get_mut(index))
        else {
            return;
        };
        if !*slot {
            return;
        }

        *slot = false;
        self.dots_remaining -= 1;
        self.score += DOT_SCORE;
        out_events.push(Event::DotCollected {
            cell: self.target,
            score: self.score,
        });
    }

    fn resolve_capture(&mut self, out_events: &mut Vec<Event>) -> bool {
        let Some(pursuer) = self
            .pursuers
            .iter()
            .find(|pursuer| pursuer.cell == self.target)
            .map(|pursuer| pursuer.id)
        else {
            return false;
        };

        self.status = PlayStatus::Caught;
        tracing::debug!(pursuer = pursuer.get(), tick = self.tick_index, "target caught");
        out_events.push(Event::TargetCaught { pursuer });
        true
    }

    /// Ends the session once no dot is left, including layouts that spawn none.
    fn resolve_cleared(&mut self, out_events: &mut Vec<Event>) {
        if self.dots_remaining > 0 {
            return;
        }

        self.status = PlayStatus::Cleared;
        tracing::debug!(score = self.score, "all dots collected");
        out_events.push(Event::DotsCleared);
    }
}

/// Applies the provided command to the world, emitting resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Restart => {
            if world.status.is_over() {
                world.reset();
                tracing::debug!("session reset");
                out_events.push(Event::SessionReset);
            }
        }
        _ if world.status.is_over() => {}
        Command::Tick => {
            world.tick_index += 1;
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.resolve_cleared(out_events);
        }
        Command::StepTarget { direction } => world.step_target(direction, out_events),
        Command::MovePursuer { pursuer, to } => world.move_pursuer(pursuer, to, out_events),
    }
}

/// Query functions that expose read-only world state.
pub mod query {
    use maze_chase_core::{CellCoord, MazeView, PlayStatus, PursuerView};

    use super::World;

    /// Read-only query surface over the maze topology.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        world.maze.view()
    }

    /// Cell currently occupied by the target.
    #[must_use]
    pub fn target_cell(world: &World) -> CellCoord {
        world.target
    }

    /// Snapshot of every pursuer ordered by identifier.
    #[must_use]
    pub fn pursuer_view(world: &World) -> PursuerView {
        PursuerView::from_snapshots(
            world
                .pursuers
                .iter()
                .map(|pursuer| pursuer.snapshot())
                .collect(),
        )
    }

    /// Number of dots still waiting to be collected.
    #[must_use]
    pub fn dots_remaining(world: &World) -> usize {
        world.dots_remaining
    }

    /// Reports whether a dot lies on the cell.
    #[must_use]
    pub fn has_dot(world: &World, cell: CellCoord) -> bool {
        world
            .maze
            .view()
            .index(cell)
            .and_then(|index| world.dots.get(index).copied())
            .unwrap_or(false)
    }

    /// Score accumulated during the session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn status(world: &World) -> PlayStatus {
        world.status
    }

    /// Number of ticks elapsed since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug)]
struct Pursuer {
    id: PursuerId,
    cell: CellCoord,
}

impl Pursuer {
    fn snapshot(&self) -> PursuerSnapshot {
        PursuerSnapshot {
            id: self.id,
            cell: self.cell,
        }
    }
}
