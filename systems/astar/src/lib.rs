#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid A* search that proposes the next pursuer step toward a goal cell.
//!
//! Every call rebuilds its search state from scratch. Edges have unit cost
//! and the heuristic is the Manhattan distance, which is admissible on a
//! four-connected grid, so the returned route is always a shortest one.

use std::{cmp::Ordering, collections::BinaryHeap};

use maze_chase_core::{CellCoord, MazeView};

/// Shortest route produced by [`find_path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    steps: Vec<CellCoord>,
    expanded: usize,
}

impl Path {
    /// Cells visited after leaving the start, ending with the goal.
    #[must_use]
    pub fn steps(&self) -> &[CellCoord] {
        &self.steps
    }

    /// Number of moves along the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Reports whether the route contains no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First cell to move onto when following the route.
    #[must_use]
    pub fn first_step(&self) -> Option<CellCoord> {
        self.steps.first().copied()
    }

    /// Number of nodes expanded while searching.
    #[must_use]
    pub const fn expanded_nodes(&self) -> usize {
        self.expanded
    }
}

/// Returns the cell a pursuer at `start` should move onto to approach `goal`.
///
/// `None` when the pursuer already stands on the goal or when the goal is not
/// reachable through valid cells.
#[must_use]
pub fn next_step(start: CellCoord, goal: CellCoord, maze: MazeView<'_>) -> Option<CellCoord> {
    find_path(start, goal, maze).and_then(|path| path.first_step())
}

/// Searches for a shortest route from `start` to `goal`.
///
/// The route excludes `start` and includes `goal`. Frontier entries with an
/// equal `f = g + h` pop in the order they were inserted.
#[must_use]
pub fn find_path(start: CellCoord, goal: CellCoord, maze: MazeView<'_>) -> Option<Path> {
    if start == goal {
        return None;
    }
    let start_index = maze.index(start)?;

    let node_count = maze.cell_count();
    let mut cost = vec![u32::MAX; node_count];
    let mut came_from: Vec<Option<CellCoord>> = vec![None; node_count];
    let mut closed = vec![false; node_count];
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0_u64;
    let mut expanded = 0_usize;

    cost[start_index] = 0;
    frontier.push(FrontierEntry {
        estimate: start.manhattan_distance(goal),
        sequence,
        cell: start,
    });

    while let Some(entry) = frontier.pop() {
        let Some(index) = maze.index(entry.cell) else {
            continue;
        };
        if closed[index] {
            continue;
        }
        closed[index] = true;
        expanded += 1;

        if entry.cell == goal {
            let steps = reconstruct(&came_from, maze, start, goal);
            tracing::trace!(
                ?start,
                ?goal,
                expanded,
                length = steps.len(),
                "a* route found"
            );
            return Some(Path { steps, expanded });
        }

        let tentative = cost[index].saturating_add(1);
        for neighbor in maze.neighbors(entry.cell) {
            let Some(neighbor_index) = maze.index(neighbor) else {
                continue;
            };
            if closed[neighbor_index] || tentative >= cost[neighbor_index] {
                continue;
            }

            cost[neighbor_index] = tentative;
            came_from[neighbor_index] = Some(entry.cell);
            sequence += 1;
            frontier.push(FrontierEntry {
                estimate: tentative.saturating_add(neighbor.manhattan_distance(goal)),
                sequence,
                cell: neighbor,
            });
        }
    }

    tracing::trace!(?start, ?goal, expanded, "a* frontier exhausted");
    None
}

fn reconstruct(
    came_from: &[Option<CellCoord>],
    maze: MazeView<'_>,
    start: CellCoord,
    goal: CellCoord,
) -> Vec<CellCoord> {
    let mut steps = vec![goal];
    let mut current = goal;
    while let Some(previous) = maze
        .index(current)
        .and_then(|index| came_from.get(index).copied().flatten())
    {
        if previous == start {
            break;
        }
        steps.push(previous);
        current = previous;
    }
    steps.reverse();
    steps
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    estimate: u32,
    sequence: u64,
    cell: CellCoord,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
