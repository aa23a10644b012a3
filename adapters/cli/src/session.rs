//! Headless session loop wiring the world, the pursuit system and the autopilot.

use std::num::NonZeroU32;

use anyhow::{Context, Result};
use maze_chase_core::{Command, Event, PlayStatus};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, scatter, World, DEFAULT_MIN_PURSUER_DISTANCE};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{autopilot::Autopilot, config::SimulationSettings};

/// Final state of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) ticks: u64,
    pub(crate) status: PlayStatus,
    pub(crate) score: u32,
    pub(crate) dots_remaining: usize,
}

/// One headless Maze Chase session.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    pursuit: Pursuit,
    autopilot: Autopilot,
    log: Vec<Event>,
}

impl Session {
    /// Builds the maze, places every agent and wires the pursuit system.
    pub(crate) fn new(settings: &SimulationSettings) -> Result<Self> {
        let configs = settings.pursuer_configs()?;
        let maze = settings.maze.build();
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);

        let layout = scatter(&maze, configs.len(), DEFAULT_MIN_PURSUER_DISTANCE, &mut rng)
            .context("failed to place agents")?;
        let target_delay = NonZeroU32::new(settings.target.move_delay_ticks)
            .context("target move delay must be a positive number of ticks")?;
        let world = World::new(maze, layout)?.with_target_move_delay(target_delay);
        let pursuit = Pursuit::new(&configs, &query::pursuer_view(&world))?;

        tracing::info!(
            seed = settings.seed,
            pursuers = configs.len(),
            dots = query::dots_remaining(&world),
            "session ready"
        );

        Ok(Self {
            world,
            pursuit,
            autopilot: Autopilot::new(rng),
            log: Vec::new(),
        })
    }

    /// Borrows the authoritative world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Steers the target, then advances the clock so pursuers chase its new cell.
    pub(crate) fn tick(&mut self) {
        let target = query::target_cell(&self.world);
        if let Some(direction) = self.autopilot.steer(target, query::maze_view(&self.world)) {
            self.dispatch(Command::StepTarget { direction });
        }
        if query::status(&self.world).is_over() {
            return;
        }

        self.dispatch(Command::Tick);
    }

    /// Runs until the session ends or `ticks` ticks have elapsed.
    pub(crate) fn run(&mut self, ticks: u64) -> Outcome {
        for _ in 0..ticks {
            if query::status(&self.world).is_over() {
                break;
            }
            self.tick();
        }

        let outcome = Outcome {
            ticks: query::tick_index(&self.world),
            status: query::status(&self.world),
            score: query::score(&self.world),
            dots_remaining: query::dots_remaining(&self.world),
        };
        tracing::info!(
            ticks = outcome.ticks,
            status = ?outcome.status,
            score = outcome.score,
            "session finished"
        );
        outcome
    }

    fn dispatch(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            for event in &events {
                match event {
                    Event::TargetCaught { pursuer } => {
                        tracing::info!(pursuer = pursuer.get(), "target caught");
                    }
                    Event::DotsCleared => tracing::info!("all dots cleared"),
                    _ => {}
                }
            }

            let mut commands = Vec::new();
            self.pursuit.handle(
                &events,
                query::maze_view(&self.world),
                query::target_cell(&self.world),
                &query::pursuer_view(&self.world),
                &mut commands,
            );
            self.log.append(&mut events);

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

#[cfg(test)]
impl Session {
    fn log(&self) -> &[Event] {
        &self.log
    }
}
