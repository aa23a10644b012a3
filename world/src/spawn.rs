//! Starting positions for the target and the pursuers.

use maze_chase_core::CellCoord;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::maze::Maze;

/// Pursuers spawn strictly farther than this many steps from the target.
pub const DEFAULT_MIN_PURSUER_DISTANCE: u32 = 8;

/// Reasons a spawn layout cannot be produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The maze interior has no open cell for the target.
    #[error("maze interior has no open cell")]
    NoOpenCells,
    /// Too few open cells lie far enough from the target.
    #[error("requested {requested} pursuer spawns but only {available} cells are far enough from the target")]
    InsufficientSpace {
        /// Number of pursuer spawns requested.
        requested: usize,
        /// Number of eligible cells found.
        available: usize,
    },
}

/// Initial cells of every agent in a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnLayout {
    /// Cell the target starts on.
    pub target: CellCoord,
    /// Cells the pursuers start on, in pursuer identifier order.
    pub pursuers: Vec<CellCoord>,
}

/// Places the target on a random interior cell and scatters pursuers away from it.
///
/// Interior cells exclude the outermost ring. Pursuers are sampled without
/// replacement from the open interior cells whose Manhattan distance to the
/// target exceeds `min_distance`.
pub fn scatter<R>(
    maze: &Maze,
    pursuer_count: usize,
    min_distance: u32,
    rng: &mut R,
) -> Result<SpawnLayout, SpawnError>
where
    R: Rng + ?Sized,
{
    let last_column = maze.width().saturating_sub(1);
    let last_row = maze.height().saturating_sub(1);
    let interior: Vec<CellCoord> = maze
        .open_cells()
        .filter(|cell| {
            (1..last_column).contains(&cell.column()) && (1..last_row).contains(&cell.row())
        })
        .collect();

    let target = *interior.choose(rng).ok_or(SpawnError::NoOpenCells)?;

    let distant: Vec<CellCoord> = interior
        .iter()
        .copied()
        .filter(|cell| cell.manhattan_distance(target) > min_distance)
        .collect();
    if distant.len() < pursuer_count {
        return Err(SpawnError::InsufficientSpace {
            requested: pursuer_count,
            available: distant.len(),
        });
    }

    let pursuers = distant
        .choose_multiple(rng, pursuer_count)
        .copied()
        .collect();

    Ok(SpawnLayout { target, pursuers })
}
