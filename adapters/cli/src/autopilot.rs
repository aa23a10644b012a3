//! Scripted stand-in for the human player.

use maze_chase_core::{CellCoord, Direction, MazeView};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Walks the target through the maze, keeping its heading while the way ahead
/// stays open and turning at random otherwise.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    heading: Option<Direction>,
}

impl Autopilot {
    pub(crate) fn new(rng: ChaCha8Rng) -> Self {
        Self { rng, heading: None }
    }

    /// Picks the direction to request for the target standing on `cell`.
    pub(crate) fn steer(&mut self, cell: CellCoord, maze: MazeView<'_>) -> Option<Direction> {
        let open = |direction: Direction| {
            cell.step(direction)
                .is_some_and(|next| maze.is_valid(next))
        };

        if let Some(heading) = self.heading.filter(|heading| open(*heading)) {
            return Some(heading);
        }

        let choices: Vec<Direction> = Direction::ALL.into_iter().filter(|d| open(*d)).collect();
        self.heading = choices.choose(&mut self.rng).copied();
        self.heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_world::Maze;
    use rand::SeedableRng;

    #[test]
    fn keeps_heading_until_blocked() {
        let maze = Maze::parse(
            "
            #######
            #.....#
            #######
            ",
        )
        .expect("valid maze");
        let mut autopilot = Autopilot::new(ChaCha8Rng::seed_from_u64(0));

        assert_eq!(
            autopilot.steer(CellCoord::new(1, 1), maze.view()),
            Some(Direction::Right)
        );
        assert_eq!(
            autopilot.steer(CellCoord::new(4, 1), maze.view()),
            Some(Direction::Right)
        );
        assert_eq!(
            autopilot.steer(CellCoord::new(5, 1), maze.view()),
            Some(Direction::Left)
        );
    }

    #[test]
    fn enclosed_target_has_no_direction() {
        let maze = Maze::bordered(3, 3);
        let mut autopilot = Autopilot::new(ChaCha8Rng::seed_from_u64(0));

        assert_eq!(autopilot.steer(CellCoord::new(1, 1), maze.view()), None);
    }

    #[test]
    fn chosen_directions_are_always_open() {
        let maze = Maze::classic(25, 19);
        let mut autopilot = Autopilot::new(ChaCha8Rng::seed_from_u64(9));

        for cell in maze.open_cells() {
            if let Some(direction) = autopilot.steer(cell, maze.view()) {
                let next = cell.step(direction).expect("in bounds");
                assert!(maze.view().is_valid(next));
            }
        }
    }
}
