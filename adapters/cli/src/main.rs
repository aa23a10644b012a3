#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Chase session.

mod autopilot;
mod board;
mod config;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{config::SimulationSettings, session::Session};

/// Runs a headless Maze Chase session and reports how it ended.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about)]
struct Args {
    /// Simulation settings in TOML format.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of ticks to simulate, overriding the settings file.
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for spawn placement and the target autopilot, overriding the settings file.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final board after the session ends.
    #[arg(long)]
    show_board: bool,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => SimulationSettings::load(path)?,
        None => SimulationSettings::default(),
    };
    if let Some(ticks) = args.ticks {
        settings.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let mut session = Session::new(&settings)?;
    let outcome = session.run(settings.ticks);

    if args.show_board {
        println!("{}", board::render(session.world()));
    }
    println!(
        "{:?} after {} ticks: score {}, {} dots left",
        outcome.status, outcome.ticks, outcome.score, outcome.dots_remaining
    );
    Ok(())
}
