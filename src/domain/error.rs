/// Errors that make a session impossible to create.
///
/// Gameplay itself has no error states: wall bumps, an unreachable goal
/// and shared cells are all normal outcomes handled by the rules.

use std::path::PathBuf;

use thiserror::Error;

use super::grid::Cell;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid map: layout has no rows")]
    EmptyMap,

    #[error("invalid map: row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("invalid map: unknown terrain {ch:?} at row {row}, column {col}")]
    UnknownTerrain { row: usize, col: usize, ch: char },

    #[error("invalid map: no open cells to spawn on")]
    NoOpenCells,

    #[error("could not place player, pursuer and goal after {attempts} attempts")]
    SpawnExhaustion { attempts: u32 },

    #[error("invalid placement: {reason} ({cell})")]
    InvalidPlacement { cell: Cell, reason: &'static str },

    #[error("could not read map file {}: {source}", path.display())]
    MapIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GameError {
    /// Every variant that stems from a malformed layout.
    pub fn is_invalid_map(&self) -> bool {
        matches!(
            self,
            GameError::EmptyMap
                | GameError::RaggedRow { .. }
                | GameError::UnknownTerrain { .. }
                | GameError::NoOpenCells
        )
    }
}
