//! Simulation settings loaded from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_core::{Algorithm, PursuerConfig, PursuerSettings, DEFAULT_PURSUER_MOVE_DELAY};
use maze_chase_world::{Maze, CLASSIC_HEIGHT, CLASSIC_WIDTH};
use serde::Deserialize;

const DEFAULT_SEED: u64 = 7;
const DEFAULT_TICKS: u64 = 600;
const DEFAULT_TARGET_MOVE_DELAY: u32 = 6;

/// Complete description of a headless session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SimulationSettings {
    #[serde(default = "default_seed")]
    pub(crate) seed: u64,
    #[serde(default = "default_ticks")]
    pub(crate) ticks: u64,
    #[serde(default)]
    pub(crate) maze: MazeSettings,
    #[serde(default)]
    pub(crate) target: TargetSettings,
    #[serde(default = "default_pursuers")]
    pub(crate) pursuers: Vec<PursuerSettings>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            ticks: DEFAULT_TICKS,
            maze: MazeSettings::default(),
            target: TargetSettings::default(),
            pursuers: default_pursuers(),
        }
    }
}

impl SimulationSettings {
    /// Reads settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Parses settings from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("failed to parse simulation settings")?;
        if settings.pursuers.is_empty() {
            tracing::warn!("no pursuers configured; the session can only end by clearing the dots");
        }
        Ok(settings)
    }

    /// Validates every pursuer entry.
    ///
    /// Minimax pursuers without an explicit seed derive one from the session
    /// seed and their position so that their jitter streams differ.
    pub(crate) fn pursuer_configs(&self) -> Result<Vec<PursuerConfig>> {
        self.pursuers
            .iter()
            .enumerate()
            .map(|(index, settings)| {
                let mut settings = settings.clone();
                let algorithm = settings.algorithm.parse::<Algorithm>().ok();
                if algorithm == Some(Algorithm::Minimax) && settings.seed.is_none() {
                    settings.seed = Some(self.seed.wrapping_add(index as u64 + 1));
                }
                PursuerConfig::try_from(settings)
                    .with_context(|| format!("invalid configuration for pursuer {index}"))
            })
            .collect()
    }
}

/// Maze layout selection.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MazeSettings {
    #[serde(default)]
    pub(crate) layout: MazeLayout,
    #[serde(default = "default_width")]
    pub(crate) width: u32,
    #[serde(default = "default_height")]
    pub(crate) height: u32,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            layout: MazeLayout::default(),
            width: CLASSIC_WIDTH,
            height: CLASSIC_HEIGHT,
        }
    }
}

impl MazeSettings {
    /// Builds the configured maze.
    pub(crate) fn build(&self) -> Maze {
        match self.layout {
            MazeLayout::Classic => Maze::classic(self.width, self.height),
            MazeLayout::Bordered => Maze::bordered(self.width, self.height),
        }
    }
}

/// Procedural layouts available from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MazeLayout {
    #[default]
    Classic,
    Bordered,
}

/// Player-side agent settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TargetSettings {
    #[serde(default = "default_target_move_delay")]
    pub(crate) move_delay_ticks: u32,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            move_delay_ticks: DEFAULT_TARGET_MOVE_DELAY,
        }
    }
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_ticks() -> u64 {
    DEFAULT_TICKS
}

fn default_width() -> u32 {
    CLASSIC_WIDTH
}

fn default_height() -> u32 {
    CLASSIC_HEIGHT
}

fn default_target_move_delay() -> u32 {
    DEFAULT_TARGET_MOVE_DELAY
}

fn default_pursuers() -> Vec<PursuerSettings> {
    vec![
        PursuerSettings {
            algorithm: Algorithm::AStar.tag().to_owned(),
            move_delay_ticks: DEFAULT_PURSUER_MOVE_DELAY,
            search_depth: None,
            jitter: None,
            seed: None,
        },
        PursuerSettings {
            algorithm: Algorithm::Minimax.tag().to_owned(),
            move_delay_ticks: DEFAULT_PURSUER_MOVE_DELAY,
            search_depth: None,
            jitter: None,
            seed: None,
        },
    ]
}
