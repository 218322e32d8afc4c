/// Pursuer pathfinding: breadth-first search over the static grid.
///
/// All steps cost 1, so a FIFO queue expands cells in order of distance and
/// the first time the target is reached the path is shortest.
///
/// Visited tracking is per cell: `came_from` is a dense arena indexed by
/// `GridMap::index_of`, written once when a cell is first discovered. A cell
/// never enters the queue twice, so work and memory stay O(rows * cols).
///
/// Ties between equally short paths are broken by the fixed neighbour order
/// in `grid::DIRS` (up, down, left, right), which makes results repeatable.

use std::collections::VecDeque;

use tracing::trace;

use super::grid::{Cell, GridMap};

/// Marks the search root in `came_from`.
const ROOT: usize = usize::MAX;

/// Ordered cells from start to target, each step orthogonally adjacent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    pub fn target(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// The first move along the path, or `None` if already at the target.
    pub fn next_step(&self) -> Option<Cell> {
        self.cells.get(1).copied()
    }
}

#[cfg(test)]
impl Path {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Shortest walkable path from `start` to `target`.
///
/// Returns `None` when no such path exists, including when either endpoint
/// is a wall or out of bounds. `start == target` yields a one-cell path
/// without searching.
pub fn find_path(map: &GridMap, start: Cell, target: Cell) -> Option<Path> {
    if start == target {
        return Some(Path { cells: vec![start] });
    }
    if !map.is_walkable(start) || !map.is_walkable(target) {
        return None;
    }

    let start_idx = map.index_of(start)?;
    let target_idx = map.index_of(target)?;

    let mut came_from: Vec<Option<usize>> = vec![None; map.cell_count()];
    came_from[start_idx] = Some(ROOT);

    let mut queue: VecDeque<Cell> = VecDeque::with_capacity(64);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let Some(cur_idx) = map.index_of(current) else { continue };

        for next in map.neighbors(current) {
            let Some(next_idx) = map.index_of(next) else { continue };
            if came_from[next_idx].is_some() { continue; }

            came_from[next_idx] = Some(cur_idx);
            if next_idx == target_idx {
                return Some(reconstruct(map, &came_from, target_idx));
            }
            queue.push_back(next);
        }
    }

    trace!(%start, %target, "no path");
    None
}

/// Walk `came_from` back from the target to the root, then reverse.
fn reconstruct(map: &GridMap, came_from: &[Option<usize>], target_idx: usize) -> Path {
    let mut cells = Vec::new();
    let mut idx = target_idx;
    loop {
        cells.push(map.cell_at(idx));
        match came_from[idx] {
            Some(ROOT) | None => break,
            Some(prev) => idx = prev,
        }
    }
    cells.reverse();
    Path { cells }
}
