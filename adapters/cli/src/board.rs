//! ASCII rendering of the session state.

use std::fmt::Write as _;

use maze_chase_core::CellCoord;
use maze_chase_world::{query, World};

const WALL: char = '#';
const DOT: char = '.';
const EMPTY: char = ' ';
const TARGET: char = 'T';
const PURSUER: char = 'G';

/// Draws the maze with walls, dots, the target and every pursuer.
///
/// Pursuers are drawn over the target when they share a cell.
pub(crate) fn render(world: &World) -> String {
    let view = query::maze_view(world);
    let (width, height) = view.dimensions();
    let target = query::target_cell(world);
    let pursuers = query::pursuer_view(world);

    let mut board = String::new();
    for row in 0..height {
        for column in 0..width {
            let cell = CellCoord::new(column, row);
            let glyph = if pursuers.iter().any(|pursuer| pursuer.cell == cell) {
                PURSUER
            } else if cell == target {
                TARGET
            } else if view.is_blocked(cell) {
                WALL
            } else if query::has_dot(world, cell) {
                DOT
            } else {
                EMPTY
            };
            board.push(glyph);
        }
        board.push('\n');
    }
    let _ = write!(
        board,
        "score {} | dots left {} | {:?}",
        query::score(world),
        query::dots_remaining(world),
        query::status(world)
    );
    board
}
