#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use grid::*;
pub use types::*;
pub use view::*;

mod cell;
mod engine;
mod error;
mod game;
mod generator;
mod grid;
mod types;
mod view;

/// Cells in the mine-free block around the first reveal.
pub const SAFE_ZONE_CELLS: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(height, width)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    /// Smallest accepted height and width.
    pub const MIN_SIDE: Coord = 4;

    pub const BEGINNER: Self = Self::new_unchecked((9, 9), 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked((16, 16), 40);
    pub const EXPERT: Self = Self::new_unchecked((16, 30), 99);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn height(&self) -> Coord {
        self.size.0
    }

    pub const fn width(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Checks that the board is at least 4x4 and that the mines leave room for the safe zone.
    pub fn validate(&self) -> Result<()> {
        let (height, width) = self.size;
        if height < Self::MIN_SIDE || width < Self::MIN_SIDE {
            return Err(ConfigError::BoardTooSmall { height, width }.into());
        }

        let outside_safe_zone = self.total_cells() - SAFE_ZONE_CELLS;
        if outside_safe_zone <= self.mines {
            return Err(ConfigError::TooManyMines {
                mines: self.mines,
                max: outside_safe_zone - 1,
            }
            .into());
        }

        Ok(())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::INTERMEDIATE
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won { elapsed_secs: u32 },
    Lost { elapsed_secs: u32, trigger: Coord2 },
}

impl GameStatus {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won { .. })
    }

    pub const fn is_lost(self) -> bool {
        matches!(self, Self::Lost { .. })
    }
}

/// A cell whose visual state changed during an action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub view: CellView,
}

/// Outcome of revealing or chording
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealOutcome {
    pub changes: Vec<CellChange>,
    pub status: GameStatus,
}

impl RevealOutcome {
    pub const fn unchanged(status: GameStatus) -> Self {
        Self {
            changes: Vec::new(),
            status,
        }
    }

    /// Whether this outcome could have caused an update to the game
    pub fn has_update(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Outcome of flagging or question-marking a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOutcome {
    pub changed: bool,
    /// How the mines-left counter moved, one of -1, 0 or 1
    pub mines_left_delta: i8,
    pub view: CellView,
    pub status: GameStatus,
}

impl MarkOutcome {
    pub const fn unchanged(view: CellView, status: GameStatus) -> Self {
        Self {
            changed: false,
            mines_left_delta: 0,
            view,
            status,
        }
    }

    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        self.changed
    }
}
