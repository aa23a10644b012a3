#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable views such as
//! [`MazeView`] and [`PursuerView`], and respond exclusively with new command
//! batches.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

mod config;

pub use config::{
    Algorithm, ConfigError, PursuerConfig, PursuerSettings, StrategyConfig,
    DEFAULT_JITTER_AMPLITUDE, DEFAULT_JITTER_SEED, DEFAULT_PURSUER_MOVE_DELAY, DEFAULT_SEARCH_DEPTH,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock by a single decision tick.
    Tick,
    /// Requests that the target attempt a single step in the provided direction.
    StepTarget {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a pursuer move onto an adjacent cell.
    MovePursuer {
        /// Identifier of the pursuer attempting to move.
        pursuer: PursuerId,
        /// Cell the pursuer wants to occupy after the move.
        to: CellCoord,
    },
    /// Requests that a finished session be restored to its initial layout.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started, counted from one.
        tick: u64,
    },
    /// Confirms that the target moved between two cells.
    TargetMoved {
        /// Cell the target occupied before moving.
        from: CellCoord,
        /// Cell the target occupies after the move.
        to: CellCoord,
    },
    /// Confirms that a pursuer moved between two cells.
    PursuerMoved {
        /// Identifier of the pursuer that moved.
        pursuer: PursuerId,
        /// Cell the pursuer occupied before moving.
        from: CellCoord,
        /// Cell the pursuer occupies after the move.
        to: CellCoord,
    },
    /// Reports that the target collected the dot placed on a cell.
    DotCollected {
        /// Cell that held the collected dot.
        cell: CellCoord,
        /// Score accumulated after the collection.
        score: u32,
    },
    /// Reports that a pursuer reached the target's cell, ending the session.
    TargetCaught {
        /// Identifier of the pursuer that caught the target.
        pursuer: PursuerId,
    },
    /// Reports that every dot was collected, ending the session.
    DotsCleared,
    /// Announces that the session returned to its initial layout.
    SessionReset,
}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayStatus {
    /// The session accepts movement and advances time.
    Playing,
    /// A pursuer caught the target.
    Caught,
    /// The target collected every dot.
    Cleared,
}

impl PlayStatus {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Cardinal movement directions in their canonical enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order neighbors are enumerated.
    ///
    /// Search tie-breaking depends on this order, so it must stay
    /// up, down, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Unique identifier assigned to a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PursuerId(u32);

impl PursuerId {
    /// Creates a new pursuer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell adjacent to this one in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are left to the caller's grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Direction that leads from this cell to an orthogonally adjacent cell.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(to.column);
        let row_diff = self.row.abs_diff(to.row);
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column > self.column {
                Some(Direction::Right)
            } else {
                Some(Direction::Left)
            }
        } else if to.row > self.row {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

/// Read-only query surface over the maze topology.
///
/// The view borrows a dense, row-major blocked mask owned by the world. It is
/// `Copy`, so every pursuer computation within a tick can hold its own handle
/// to the same immutable data.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    blocked: &'a [bool],
    width: u32,
    height: u32,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by the provided blocked mask.
    ///
    /// Cells whose index falls outside `blocked` are treated as open.
    #[must_use]
    pub fn new(blocked: &'a [bool], width: u32, height: u32) -> Self {
        Self {
            blocked,
            width,
            height,
        }
    }

    /// Provides the dimensions of the maze as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of cells covered by the maze.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::try_from(u64::from(self.width) * u64::from(self.height)).unwrap_or(0)
    }

    /// Reports whether the cell lies inside the maze bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Reports whether the cell is part of the blocked set.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.blocked.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether an agent may stand on the cell.
    #[must_use]
    pub fn is_valid(&self, cell: CellCoord) -> bool {
        self.contains(cell) && !self.is_blocked(cell)
    }

    /// Valid orthogonal neighbors of the cell, enumerated up, down, left, right.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        for direction in Direction::ALL {
            if let Some(candidate) = cell.step(direction) {
                if self.is_valid(candidate) {
                    neighbors.push(candidate);
                }
            }
        }
        neighbors
    }

    /// Row-major index of the cell, if it lies inside the maze.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Fixed-capacity iterator over the valid neighbors of a cell.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Neighbors {}

/// Move-rate throttle that releases an action once every `threshold` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveThrottle {
    counter: u32,
    threshold: NonZeroU32,
}

impl MoveThrottle {
    /// Creates a throttle that releases on every `threshold`-th tick.
    #[must_use]
    pub const fn new(threshold: NonZeroU32) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Advances the counter, returning `true` when an action is released.
    ///
    /// The counter resets to zero whenever it reaches the threshold.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.threshold.get() {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Discards any partially accumulated ticks.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Ticks accumulated since the last release.
    #[must_use]
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Number of ticks required per release.
    #[must_use]
    pub const fn threshold(&self) -> NonZeroU32 {
        self.threshold
    }
}

/// Immutable representation of a single pursuer's position used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PursuerSnapshot {
    /// Unique identifier assigned to the pursuer.
    pub id: PursuerId,
    /// Grid cell currently occupied by the pursuer.
    pub cell: CellCoord,
}

/// Read-only snapshot describing every pursuer in the maze.
#[derive(Clone, Debug, Default)]
pub struct PursuerView {
    snapshots: Vec<PursuerSnapshot>,
}

impl PursuerView {
    /// Creates a new pursuer view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PursuerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &PursuerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of pursuers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no pursuers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cell currently occupied by the pursuer, if it exists.
    #[must_use]
    pub fn cell_of(&self, id: PursuerId) -> Option<CellCoord> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.id == id)
            .map(|snapshot| snapshot.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_mask(width: u32, height: u32) -> Vec<bool> {
        vec![false; (width * height) as usize]
    }

    fn bordered_mask(width: u32, height: u32) -> Vec<bool> {
        let mut mask = open_mask(width, height);
        for row in 0..height {
            for column in 0..width {
                if row == 0 || column == 0 || row + 1 == height || column + 1 == width {
                    mask[(row * width + column) as usize] = true;
                }
            }
        }
        mask
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_leave_the_quadrant() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Down), Some(CellCoord::new(0, 1)));
        assert_eq!(origin.step(Direction::Right), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn direction_to_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.direction_to(CellCoord::new(3, 2)), Some(Direction::Up));
        assert_eq!(origin.direction_to(CellCoord::new(3, 4)), Some(Direction::Down));
        assert_eq!(origin.direction_to(CellCoord::new(2, 3)), Some(Direction::Left));
        assert_eq!(origin.direction_to(CellCoord::new(4, 3)), Some(Direction::Right));
        assert_eq!(origin.direction_to(origin), None);
        assert_eq!(origin.direction_to(CellCoord::new(4, 4)), None);
    }

    #[test]
    fn interior_cell_lists_four_neighbors_in_canonical_order() {
        let mask = open_mask(5, 5);
        let maze = MazeView::new(&mask, 5, 5);

        let neighbors: Vec<_> = maze.neighbors(CellCoord::new(2, 2)).collect();

        assert_eq!(
            neighbors,
            vec![
                CellCoord::new(2, 1),
                CellCoord::new(2, 3),
                CellCoord::new(1, 2),
                CellCoord::new(3, 2),
            ]
        );
    }

    #[test]
    fn walled_corner_lists_two_neighbors_in_canonical_order() {
        let mask = bordered_mask(5, 5);
        let maze = MazeView::new(&mask, 5, 5);

        let neighbors: Vec<_> = maze.neighbors(CellCoord::new(1, 1)).collect();

        assert_eq!(neighbors, vec![CellCoord::new(1, 2), CellCoord::new(2, 1)]);
    }

    #[test]
    fn grid_corner_without_walls_stays_in_bounds() {
        let mask = open_mask(3, 3);
        let maze = MazeView::new(&mask, 3, 3);

        let neighbors: Vec<_> = maze.neighbors(CellCoord::new(2, 2)).collect();

        assert_eq!(neighbors, vec![CellCoord::new(2, 1), CellCoord::new(1, 2)]);
    }

    #[test]
    fn blocked_and_valid_are_distinct_queries() {
        let mask = bordered_mask(4, 4);
        let maze = MazeView::new(&mask, 4, 4);

        assert!(maze.is_blocked(CellCoord::new(0, 0)));
        assert!(!maze.is_valid(CellCoord::new(0, 0)));
        assert!(maze.is_valid(CellCoord::new(1, 1)));

        let outside = CellCoord::new(9, 1);
        assert!(!maze.is_blocked(outside));
        assert!(!maze.is_valid(outside));
    }

    #[test]
    fn enclosed_cell_has_no_neighbors() {
        let mask = bordered_mask(3, 3);
        let maze = MazeView::new(&mask, 3, 3);

        assert_eq!(maze.neighbors(CellCoord::new(1, 1)).count(), 0);
    }

    #[test]
    fn throttle_releases_on_threshold_tick() {
        let mut throttle = MoveThrottle::new(NonZeroU32::new(3).expect("non-zero"));
        assert_eq!(throttle.threshold().get(), 3);

        assert!(!throttle.tick());
        assert!(!throttle.tick());
        assert!(throttle.tick());
        assert_eq!(throttle.counter(), 0);
        assert!(!throttle.tick());
    }

    #[test]
    fn throttle_with_unit_threshold_releases_every_tick() {
        let mut throttle = MoveThrottle::new(NonZeroU32::MIN);

        assert!((0..5).all(|_| throttle.tick()));
    }

    #[test]
    fn throttle_reset_discards_progress() {
        let mut throttle = MoveThrottle::new(NonZeroU32::new(2).expect("non-zero"));
        assert!(!throttle.tick());

        throttle.reset();

        assert!(!throttle.tick());
        assert!(throttle.tick());
    }

    #[test]
    fn pursuer_view_orders_by_identifier() {
        let view = PursuerView::from_snapshots(vec![
            PursuerSnapshot {
                id: PursuerId::new(2),
                cell: CellCoord::new(1, 1),
            },
            PursuerSnapshot {
                id: PursuerId::new(0),
                cell: CellCoord::new(3, 3),
            },
        ]);

        let ids: Vec<_> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(view.cell_of(PursuerId::new(0)), Some(CellCoord::new(3, 3)));
        assert_eq!(view.cell_of(PursuerId::new(1)), None);
    }
}
