use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board must be at least 4x4, got {height}x{width}")]
    BoardTooSmall { height: Coord, width: Coord },
    #[error("Too many mines: {mines} requested, at most {max} fit outside the safe zone")]
    TooManyMines { mines: CellCount, max: CellCount },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Saved session does not match its grid")]
    InconsistentSession,
}

pub type Result<T> = core::result::Result<T, GameError>;
