//! Pursuer configuration surface and its construction-time validation.

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Plies explored after each candidate move when no depth is configured.
pub const DEFAULT_SEARCH_DEPTH: NonZeroU32 = match NonZeroU32::new(3) {
    Some(depth) => depth,
    None => NonZeroU32::MIN,
};

/// Ticks between pursuer moves when none is configured.
pub const DEFAULT_PURSUER_MOVE_DELAY: i64 = 12;

/// Half-width of the uniform jitter added to minimax leaf evaluations.
pub const DEFAULT_JITTER_AMPLITUDE: f64 = 0.1;

/// Seed used for the jitter generator when none is configured.
pub const DEFAULT_JITTER_SEED: u64 = 0x5eed_9e05_7c4a_11d3;

/// Deepest search accepted from configuration. Work grows as `4^depth`.
const MAX_SEARCH_DEPTH: u32 = 10;

/// Pursuit algorithms a pursuer may be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Shortest-path pursuit using A* over the maze.
    AStar,
    /// Depth-limited minimax with alpha-beta pruning.
    Minimax,
}

impl Algorithm {
    /// Configuration tag that selects the algorithm.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::AStar => "a_star",
            Self::Minimax => "minimax",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "a_star" => Ok(Self::AStar),
            "minimax" => Ok(Self::Minimax),
            other => Err(ConfigError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

/// Reasons a pursuer configuration is rejected at construction time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The algorithm tag does not name a known pursuit algorithm.
    #[error("unknown pursuit algorithm `{0}`; expected `a_star` or `minimax`")]
    UnknownAlgorithm(String),
    /// The move delay is not a positive tick count.
    #[error("move delay must be a positive number of ticks, got {0}")]
    InvalidMoveDelay(i64),
    /// The search depth is not a positive ply count within the supported range.
    #[error("search depth must be between 1 and 10 plies, got {0}")]
    InvalidSearchDepth(i64),
    /// The jitter amplitude is negative or not finite.
    #[error("jitter amplitude must be a finite non-negative number, got {0}")]
    InvalidJitter(f64),
    /// A minimax-specific option was supplied for another algorithm.
    #[error("`{option}` only applies to minimax pursuers, not `{algorithm}`")]
    MinimaxOnlyOption {
        /// Algorithm the pursuer was configured with.
        algorithm: Algorithm,
        /// Name of the offending option.
        option: &'static str,
    },
}

/// Raw per-pursuer settings as they appear in configuration files.
///
/// Values are kept loosely typed so that every mistake surfaces as a
/// [`ConfigError`] from [`PursuerConfig::try_from`] rather than as an opaque
/// deserialization failure.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PursuerSettings {
    /// Algorithm tag, `a_star` or `minimax`.
    pub algorithm: String,
    /// Ticks between successive moves.
    #[serde(default = "default_move_delay_ticks")]
    pub move_delay_ticks: i64,
    /// Minimax search depth in plies.
    #[serde(default)]
    pub search_depth: Option<i64>,
    /// Minimax jitter amplitude.
    #[serde(default)]
    pub jitter: Option<f64>,
    /// Minimax jitter seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Algorithm-specific parameters of a validated pursuer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrategyConfig {
    /// A* pursuit has no tunable parameters.
    AStar,
    /// Minimax pursuit parameters.
    Minimax {
        /// Plies explored after each candidate move.
        depth: NonZeroU32,
        /// Half-width of the uniform leaf jitter; zero disables jitter.
        jitter: f64,
        /// Seed for the jitter generator.
        seed: u64,
    },
}

/// Validated configuration for a single pursuer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerConfig {
    move_delay: NonZeroU32,
    strategy: StrategyConfig,
}

impl PursuerConfig {
    /// Configures an A* pursuer that moves once every `move_delay_ticks` ticks.
    pub fn a_star(move_delay_ticks: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            move_delay: move_delay(move_delay_ticks)?,
            strategy: StrategyConfig::AStar,
        })
    }

    /// Configures a minimax pursuer with default jitter.
    pub fn minimax(move_delay_ticks: i64, search_depth: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            move_delay: move_delay(move_delay_ticks)?,
            strategy: StrategyConfig::Minimax {
                depth: search_depth_from(search_depth)?,
                jitter: DEFAULT_JITTER_AMPLITUDE,
                seed: DEFAULT_JITTER_SEED,
            },
        })
    }

    /// Replaces the jitter amplitude and seed of a minimax pursuer.
    pub fn with_jitter(self, amplitude: f64, seed: u64) -> Result<Self, ConfigError> {
        let StrategyConfig::Minimax { depth, .. } = self.strategy else {
            return Err(ConfigError::MinimaxOnlyOption {
                algorithm: self.algorithm(),
                option: "jitter",
            });
        };
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(ConfigError::InvalidJitter(amplitude));
        }

        Ok(Self {
            move_delay: self.move_delay,
            strategy: StrategyConfig::Minimax {
                depth,
                jitter: amplitude,
                seed,
            },
        })
    }

    /// Algorithm selected by the configuration.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self.strategy {
            StrategyConfig::AStar => Algorithm::AStar,
            StrategyConfig::Minimax { .. } => Algorithm::Minimax,
        }
    }

    /// Ticks between successive moves.
    #[must_use]
    pub const fn move_delay(&self) -> NonZeroU32 {
        self.move_delay
    }

    /// Algorithm-specific parameters.
    #[must_use]
    pub const fn strategy(&self) -> StrategyConfig {
        self.strategy
    }
}

impl TryFrom<PursuerSettings> for PursuerConfig {
    type Error = ConfigError;

    fn try_from(settings: PursuerSettings) -> Result<Self, Self::Error> {
        match settings.algorithm.parse::<Algorithm>()? {
            Algorithm::AStar => {
                let option = if settings.search_depth.is_some() {
                    Some("search_depth")
                } else if settings.jitter.is_some() {
                    Some("jitter")
                } else if settings.seed.is_some() {
                    Some("seed")
                } else {
                    None
                };
                if let Some(option) = option {
                    return Err(ConfigError::MinimaxOnlyOption {
                        algorithm: Algorithm::AStar,
                        option,
                    });
                }
                Self::a_star(settings.move_delay_ticks)
            }
            Algorithm::Minimax => {
                let depth = settings
                    .search_depth
                    .unwrap_or_else(|| i64::from(DEFAULT_SEARCH_DEPTH.get()));
                Self::minimax(settings.move_delay_ticks, depth)?.with_jitter(
                    settings.jitter.unwrap_or(DEFAULT_JITTER_AMPLITUDE),
                    settings.seed.unwrap_or(DEFAULT_JITTER_SEED),
                )
            }
        }
    }
}

fn move_delay(ticks: i64) -> Result<NonZeroU32, ConfigError> {
    u32::try_from(ticks)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ConfigError::InvalidMoveDelay(ticks))
}

fn search_depth_from(plies: i64) -> Result<NonZeroU32, ConfigError> {
    u32::try_from(plies)
        .ok()
        .filter(|depth| *depth <= MAX_SEARCH_DEPTH)
        .and_then(NonZeroU32::new)
        .ok_or(ConfigError::InvalidSearchDepth(plies))
}

fn default_move_delay_ticks() -> i64 {
    DEFAULT_PURSUER_MOVE_DELAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(algorithm: &str, move_delay_ticks: i64) -> PursuerSettings {
        PursuerSettings {
            algorithm: algorithm.to_owned(),
            move_delay_ticks,
            search_depth: None,
            jitter: None,
            seed: None,
        }
    }

    #[test]
    fn algorithm_tags_round_trip_through_parsing() {
        for algorithm in [Algorithm::AStar, Algorithm::Minimax] {
            assert_eq!(algorithm.tag().parse::<Algorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let error = PursuerConfig::try_from(settings("dijkstra", 4)).unwrap_err();
        assert_eq!(error, ConfigError::UnknownAlgorithm("dijkstra".to_owned()));
    }

    #[test]
    fn non_positive_move_delay_is_rejected() {
        assert_eq!(
            PursuerConfig::a_star(0).unwrap_err(),
            ConfigError::InvalidMoveDelay(0)
        );
        assert_eq!(
            PursuerConfig::minimax(-3, 3).unwrap_err(),
            ConfigError::InvalidMoveDelay(-3)
        );
    }

    #[test]
    fn search_depth_outside_supported_range_is_rejected() {
        assert_eq!(
            PursuerConfig::minimax(12, 0).unwrap_err(),
            ConfigError::InvalidSearchDepth(0)
        );
        assert_eq!(
            PursuerConfig::minimax(12, 11).unwrap_err(),
            ConfigError::InvalidSearchDepth(11)
        );
    }

    #[test]
    fn minimax_defaults_fill_missing_settings() {
        let config = PursuerConfig::try_from(settings("minimax", 12)).expect("valid settings");

        assert_eq!(config.algorithm(), Algorithm::Minimax);
        assert_eq!(config.move_delay().get(), 12);
        assert_eq!(
            config.strategy(),
            StrategyConfig::Minimax {
                depth: DEFAULT_SEARCH_DEPTH,
                jitter: DEFAULT_JITTER_AMPLITUDE,
                seed: DEFAULT_JITTER_SEED,
            }
        );
    }

    #[test]
    fn minimax_options_are_refused_for_a_star() {
        let mut raw = settings("a_star", 12);
        raw.search_depth = Some(3);

        assert_eq!(
            PursuerConfig::try_from(raw).unwrap_err(),
            ConfigError::MinimaxOnlyOption {
                algorithm: Algorithm::AStar,
                option: "search_depth",
            }
        );
        assert!(PursuerConfig::a_star(12)
            .expect("valid delay")
            .with_jitter(0.0, 1)
            .is_err());
    }

    #[test]
    fn negative_jitter_is_rejected() {
        let config = PursuerConfig::minimax(12, 3).expect("valid config");
        assert_eq!(
            config.with_jitter(-0.5, 1).unwrap_err(),
            ConfigError::InvalidJitter(-0.5)
        );
        assert!(config.with_jitter(f64::NAN, 1).is_err());
    }

    #[test]
    fn settings_deserialize_from_toml() {
        let raw: PursuerSettings = toml::from_str(
            r#"
                algorithm = "minimax"
                move_delay_ticks = 10
                search_depth = 2
                jitter = 0.0
                seed = 99
            "#,
        )
        .expect("valid toml");

        let config = PursuerConfig::try_from(raw).expect("valid settings");
        assert_eq!(
            config.strategy(),
            StrategyConfig::Minimax {
                depth: NonZeroU32::new(2).expect("non-zero"),
                jitter: 0.0,
                seed: 99,
            }
        );
    }

    #[test]
    fn missing_move_delay_falls_back_to_default() {
        let raw: PursuerSettings = toml::from_str(r#"algorithm = "a_star""#).expect("valid toml");
        assert_eq!(raw.move_delay_ticks, DEFAULT_PURSUER_MOVE_DELAY);

        let config = PursuerConfig::try_from(raw).expect("valid settings");
        assert_eq!(config.move_delay().get(), 12);
    }

    #[test]
    fn unknown_settings_fields_are_rejected() {
        let parsed = toml::from_str::<PursuerSettings>(
            r#"
                algorithm = "a_star"
                move_delay_ticks = 10
                speed = 3
            "#,
        );
        assert!(parsed.is_err());
    }
}
