/// Cells and the static grid map.
///
/// Coordinates are `(row, col)` with row 0 at the top. Both are signed so a
/// neighbour of an edge cell can be formed and then rejected by bounds
/// checks instead of underflowing.
///
/// The map is stored row-major in a single `Vec`; it has no mutation
/// operations and lives unchanged for the whole session.

use std::fmt;

use super::error::GameError;
use super::tile::Terrain;

/// Neighbour expansion order: up, down, left, right.
/// Pathfinding tie-breaks depend on this order staying fixed.
pub const DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    pub fn offset(self, drow: i32, dcol: i32) -> Cell {
        Cell::new(self.row + drow, self.col + dcol)
    }

    /// Is `other` one orthogonal step away?
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    terrain: Vec<Terrain>,
}

impl GridMap {
    /// Build a map from text rows (`*` = Wall, `.` = Open).
    ///
    /// Fails if there are no rows, rows differ in length, a character is
    /// not a terrain symbol, or nothing is walkable.
    pub fn parse<S: AsRef<str>>(layout: &[S]) -> Result<GridMap, GameError> {
        let first = layout.first().ok_or(GameError::EmptyMap)?;
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(GameError::EmptyMap);
        }

        let mut terrain = Vec::with_capacity(layout.len() * cols);
        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != cols {
                return Err(GameError::RaggedRow { row, expected: cols, found });
            }
            for (col, ch) in line.chars().enumerate() {
                let t = Terrain::from_char(ch)
                    .ok_or(GameError::UnknownTerrain { row, col, ch })?;
                terrain.push(t);
            }
        }

        let map = GridMap { rows: layout.len(), cols, terrain };
        if map.open_count() == 0 {
            return Err(GameError::NoOpenCells);
        }
        Ok(map)
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    /// Dense row-major index, or `None` outside the map.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) { return None; }
        Some(cell.row as usize * self.cols + cell.col as usize)
    }

    /// Inverse of `index_of`. Caller guarantees `idx < rows * cols`.
    pub fn cell_at(&self, idx: usize) -> Cell {
        Cell::new((idx / self.cols) as i32, (idx % self.cols) as i32)
    }

    pub fn terrain(&self, cell: Cell) -> Option<Terrain> {
        self.index_of(cell).map(|i| self.terrain[i])
    }

    /// False outside the map and on walls.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.terrain(cell).map_or(false, Terrain::is_walkable)
    }

    /// Total cells, walls included. Sizes per-cell arenas.
    pub fn cell_count(&self) -> usize {
        self.terrain.len()
    }

    pub fn open_count(&self) -> usize {
        self.open_cells().count()
    }

    /// Walkable cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.terrain
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_walkable())
            .map(|(i, _)| self.cell_at(i))
    }

    /// Walkable 4-neighbours in `DIRS` order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRS.iter()
            .map(move |&(dr, dc)| cell.offset(dr, dc))
            .filter(move |&n| self.is_walkable(n))
    }
}
