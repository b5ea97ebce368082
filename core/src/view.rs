use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Owned snapshot of everything a renderer needs to redraw the whole board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub cells: Array2<CellView>,
    pub mines_left: isize,
    pub elapsed_secs: u32,
    /// `None` while waiting for the first reveal
    pub status: Option<GameStatus>,
}

impl BoardView {
    /// All-hidden board for a game that has not started yet.
    pub fn unstarted(config: GameConfig) -> Self {
        Self {
            size: config.size,
            cells: Array2::default(config.size.to_nd_index()),
            mines_left: config.mines as isize,
            elapsed_secs: 0,
            status: None,
        }
    }

    pub fn from_session(session: &GameSession) -> Self {
        let size = session.size();
        let mut cells = Array2::default(size.to_nd_index());
        for coords in iter_coords(size) {
            cells[coords.to_nd_index()] = session.cell_view(coords);
        }

        Self {
            size,
            cells,
            mines_left: session.mines_left(),
            elapsed_secs: session.elapsed_secs(),
            status: Some(session.status()),
        }
    }

    pub fn from_game<G: BoardGenerator>(game: &Game<G>) -> Self {
        match game.session() {
            Some(session) => Self::from_session(session),
            None => Self::unstarted(game.config()),
        }
    }

    /// # Panics
    ///
    /// Panics if `coords` is outside the board.
    pub fn cell_at(&self, coords: Coord2) -> CellView {
        self.cells[coords.to_nd_index()]
    }

    /// Applies the changes reported by an action, so a renderer can keep one view alive.
    pub fn apply(&mut self, changes: &[CellChange]) {
        for change in changes {
            self.cells[change.coords.to_nd_index()] = change.view;
        }
    }
}
