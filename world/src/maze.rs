//! Owned maze topology and the layouts used to build it.

use maze_chase_core::{CellCoord, MazeView};
use thiserror::Error;

/// Width of the classic layout in cells.
pub const CLASSIC_WIDTH: u32 = 25;
/// Height of the classic layout in cells.
pub const CLASSIC_HEIGHT: u32 = 19;

const BLOCKED_GLYPH: char = '#';
const OPEN_GLYPH: char = '.';

/// Reasons a textual maze description is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeParseError {
    /// The description contains no rows.
    #[error("maze description is empty")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A cell uses a glyph other than `#` or `.`.
    #[error("unknown glyph `{glyph}` at column {column}, row {row}")]
    UnknownGlyph {
        /// The unrecognised character.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// The description exceeds the addressable grid size.
    #[error("maze description is too large")]
    TooLarge,
}

/// Dense grid of passable and blocked cells.
///
/// A maze is built once per session and never mutated afterwards; systems
/// only ever observe it through [`MazeView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
}

impl Maze {
    /// Creates a maze of the provided size with the listed cells blocked.
    ///
    /// Cells outside the grid are ignored.
    #[must_use]
    pub fn from_blocked(
        width: u32,
        height: u32,
        cells: impl IntoIterator<Item = CellCoord>,
    ) -> Self {
        let mut maze = Self::open(width, height);
        for cell in cells {
            maze.block(cell);
        }
        maze
    }

    /// Creates a maze whose outer ring is blocked and whose interior is open.
    #[must_use]
    pub fn bordered(width: u32, height: u32) -> Self {
        let mut maze = Self::open(width, height);
        maze.block_border();
        maze
    }

    /// Creates the classic sparse layout: a border ring, short wall segments
    /// on a fixed lattice, and four single walls around the centre.
    #[must_use]
    pub fn classic(width: u32, height: u32) -> Self {
        let mut maze = Self::bordered(width, height);

        for column in (3..width.saturating_sub(3)).step_by(8) {
            for row in (3..height.saturating_sub(3)).step_by(6) {
                for offset in 0..3 {
                    if column + offset < width.saturating_sub(1) {
                        maze.block(CellCoord::new(column + offset, row));
                    }
                }
            }
        }

        for column in (6..width.saturating_sub(6)).step_by(8) {
            for row in (4..height.saturating_sub(4)).step_by(6) {
                for offset in 0..2 {
                    if row + offset < height.saturating_sub(1) {
                        maze.block(CellCoord::new(column, row + offset));
                    }
                }
            }
        }

        let singles = [
            (width / 4, height / 2),
            (3 * width / 4, height / 2),
            (width / 2, height / 4),
            (width / 2, 3 * height / 4),
        ];
        for (column, row) in singles {
            let inside_columns = 1 < column && column < width.saturating_sub(2);
            let inside_rows = 1 < row && row < height.saturating_sub(2);
            if inside_columns && inside_rows {
                maze.block(CellCoord::new(column, row));
            }
        }

        maze
    }

    /// Parses a maze drawn with `#` for blocked and `.` or space for open cells.
    ///
    /// Surrounding whitespace and blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, MazeParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(MazeParseError::Empty);
        };

        let expected = first.chars().count();
        let width = u32::try_from(expected).map_err(|_| MazeParseError::TooLarge)?;
        let height = u32::try_from(rows.len()).map_err(|_| MazeParseError::TooLarge)?;
        let mut maze = Self::open(width, height);

        for (row_index, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(MazeParseError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }

            for (column_index, glyph) in line.chars().enumerate() {
                match glyph {
                    BLOCKED_GLYPH => {
                        let column =
                            u32::try_from(column_index).map_err(|_| MazeParseError::TooLarge)?;
                        let row = u32::try_from(row_index).map_err(|_| MazeParseError::TooLarge)?;
                        maze.block(CellCoord::new(column, row));
                    }
                    OPEN_GLYPH | ' ' => {}
                    other => {
                        return Err(MazeParseError::UnknownGlyph {
                            glyph: other,
                            column: column_index,
                            row: row_index,
                        })
                    }
                }
            }
        }

        Ok(maze)
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Borrows a read-only query surface over the maze.
    #[must_use]
    pub fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.blocked, self.width, self.height)
    }

    /// Iterator over every valid cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let view = self.view();
        (0..self.height).flat_map(move |row| {
            (0..self.width)
                .map(move |column| CellCoord::new(column, row))
                .filter(move |cell| view.is_valid(*cell))
        })
    }

    fn open(width: u32, height: u32) -> Self {
        let cell_count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            blocked: vec![false; cell_count],
        }
    }

    fn block(&mut self, cell: CellCoord) {
        if let Some(index) = self.view().index(cell) {
            if let Some(slot) = self.blocked.get_mut(index) {
                *slot = true;
            }
        }
    }

    fn block_border(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        for column in 0..self.width {
            self.block(CellCoord::new(column, 0));
            self.block(CellCoord::new(column, self.height - 1));
        }
        for row in 0..self.height {
            self.block(CellCoord::new(0, row));
            self.block(CellCoord::new(self.width - 1, row));
        }
    }
}
