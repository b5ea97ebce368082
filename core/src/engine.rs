use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    InProgress,
    Won,
    Lost { trigger: Coord2 },
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost { .. })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One game on a fixed grid, from the first reveal to a win or a loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedSession")]
pub struct GameSession {
    grid: Grid,
    board: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    elapsed_secs: u32,
    state: SessionState,
}

/// Unchecked form of a deserialized [`GameSession`].
#[derive(Deserialize)]
struct SavedSession {
    grid: Grid,
    board: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    elapsed_secs: u32,
    state: SessionState,
}

impl TryFrom<SavedSession> for GameSession {
    type Error = GameError;

    fn try_from(saved: SavedSession) -> Result<Self> {
        let count = |wanted: CellState| saved.board.iter().filter(|&&state| state == wanted).count();
        let trigger_is_mine = match saved.state {
            SessionState::Lost { trigger } => saved
                .grid
                .validate_coords(trigger)
                .is_ok_and(|trigger| saved.grid.contains_mine(trigger)),
            SessionState::InProgress | SessionState::Won => true,
        };

        let consistent = saved.grid.validate()
            && saved.board.dim() == saved.grid.cells().dim()
            && count(CellState::Revealed) == saved.revealed_count as usize
            && count(CellState::Flagged) == saved.flagged_count as usize
            && trigger_is_mine;
        if !consistent {
            log::debug!("Rejected saved session in state {:?}", saved.state);
            return Err(GameError::InconsistentSession);
        }

        Ok(Self {
            grid: saved.grid,
            board: saved.board,
            revealed_count: saved.revealed_count,
            flagged_count: saved.flagged_count,
            elapsed_secs: saved.elapsed_secs,
            state: saved.state,
        })
    }
}

impl GameSession {
    pub fn new(grid: Grid) -> Self {
        let size = grid.size();
        Self {
            grid,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            elapsed_secs: 0,
            state: Default::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn status(&self) -> GameStatus {
        match self.state {
            SessionState::InProgress => GameStatus::InProgress,
            SessionState::Won => GameStatus::Won {
                elapsed_secs: self.elapsed_secs,
            },
            SessionState::Lost { trigger } => GameStatus::Lost {
                elapsed_secs: self.elapsed_secs,
                trigger,
            },
        }
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.grid.mine_count()
    }

    /// Mines minus flags placed, negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.grid.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        match self.state {
            SessionState::Lost { trigger } => Some(trigger),
            SessionState::InProgress | SessionState::Won => None,
        }
    }

    /// # Panics
    ///
    /// Panics if `coords` is outside the grid.
    pub fn cell_state(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    /// Visual state of a cell, including the end-of-game markers after a loss.
    ///
    /// # Panics
    ///
    /// Panics if `coords` is outside the grid.
    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let trigger = self.triggered_mine();
        let lost = trigger.is_some();

        match (self.board[coords.to_nd_index()], self.grid[coords]) {
            (_, CellValue::Mine) if trigger == Some(coords) => CellView::Exploded,
            (_, CellValue::Mine) if lost => CellView::Mine,
            (CellState::Flagged, CellValue::Adjacent(_)) if lost => CellView::IncorrectFlag,
            (CellState::Hidden, _) => CellView::Hidden,
            (CellState::Flagged, _) => CellView::Flagged,
            (CellState::Questioned, _) => CellView::Questioned,
            (CellState::Revealed, CellValue::Adjacent(count)) => CellView::Revealed(count),
            (CellState::Revealed, CellValue::Mine) => CellView::Mine,
        }
    }

    /// Advances the clock by one second while the game is running.
    pub fn tick(&mut self) {
        if !self.state.is_finished() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    /// Whether chording at `coords` would reveal its neighbors right now.
    pub fn can_chord_reveal(&self, coords: Coord2) -> bool {
        if self.state.is_finished() || self.grid.validate_coords(coords).is_err() {
            return false;
        }

        match (self.board[coords.to_nd_index()], self.grid[coords]) {
            (CellState::Revealed, CellValue::Adjacent(count)) if count > 0 => {
                count == self.count_flagged_neighbors(coords)
            }
            _ => false,
        }
    }

    /// Cycles `Hidden <-> Flagged`, a question mark goes back to hidden.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.mark(coords, false)
    }

    /// Cycles `Hidden -> Flagged -> Questioned -> Hidden`.
    pub fn cycle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.mark(coords, true)
    }

    fn mark(&mut self, coords: Coord2, use_question: bool) -> Result<MarkOutcome> {
        use CellState::*;

        let coords = self.grid.validate_coords(coords)?;
        self.check_in_progress()?;

        let (next, mines_left_delta) = match self.board[coords.to_nd_index()] {
            Hidden => {
                self.flagged_count += 1;
                (Flagged, -1)
            }
            Flagged => {
                self.flagged_count -= 1;
                (if use_question { Questioned } else { Hidden }, 1)
            }
            Questioned => (Hidden, 0),
            Revealed => {
                return Ok(MarkOutcome::unchanged(
                    self.cell_view(coords),
                    self.status(),
                ));
            }
        };
        self.board[coords.to_nd_index()] = next;
        log::trace!("Marked {:?} as {:?}", coords, next);
        self.check_win();

        Ok(MarkOutcome {
            changed: true,
            mines_left_delta,
            view: self.cell_view(coords),
            status: self.status(),
        })
    }

    /// Reveals a hidden cell, flood-filling from it when it has no adjacent mines.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_in_progress()?;

        let mut changes = Vec::new();
        if matches!(self.board[coords.to_nd_index()], CellState::Hidden) {
            self.reveal_hidden(coords, &mut changes);
            self.check_win();
        }

        Ok(RevealOutcome {
            changes,
            status: self.status(),
        })
    }

    /// Reveals every hidden neighbor of a revealed number once exactly that many neighbors are
    /// flagged, otherwise does nothing.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_in_progress()?;

        let mut changes = Vec::new();
        if self.can_chord_reveal(coords) {
            for pos in self.grid.iter_neighbors(coords) {
                if self.state.is_finished() {
                    break;
                }
                if matches!(self.board[pos.to_nd_index()], CellState::Hidden) {
                    self.reveal_hidden(pos, &mut changes);
                }
            }
            self.check_win();
        }

        Ok(RevealOutcome {
            changes,
            status: self.status(),
        })
    }

    fn reveal_hidden(&mut self, coords: Coord2, changes: &mut Vec<CellChange>) {
        match self.grid[coords] {
            CellValue::Mine => self.explode(coords, changes),
            CellValue::Adjacent(count) => {
                self.open(coords, count, changes);
                if count == 0 {
                    self.flood_fill(coords, changes);
                }
            }
        }
    }

    fn open(&mut self, coords: Coord2, count: u8, changes: &mut Vec<CellChange>) {
        self.board[coords.to_nd_index()] = CellState::Revealed;
        self.revealed_count += 1;
        changes.push(CellChange {
            coords,
            view: CellView::Revealed(count),
        });
    }

    /// Opens the zero region connected to `start` and its numbered border.
    fn flood_fill(&mut self, start: Coord2, changes: &mut Vec<CellChange>) {
        let mut to_visit = vec![start];
        log::trace!("Starting flood-fill from {:?}", start);

        while let Some(center) = to_visit.pop() {
            for pos in self.grid.iter_neighbors(center) {
                // flags and question marks block the cascade
                if !matches!(self.board[pos.to_nd_index()], CellState::Hidden) {
                    continue;
                }

                // neighbors of a zero are never mines
                let CellValue::Adjacent(count) = self.grid[pos] else {
                    continue;
                };
                self.open(pos, count, changes);
                log::trace!("Flood opened cell at {:?}, mine count: {}", pos, count);

                if count == 0 {
                    to_visit.push(pos);
                }
            }
        }
    }

    fn explode(&mut self, trigger: Coord2, changes: &mut Vec<CellChange>) {
        self.state = SessionState::Lost { trigger };
        log::debug!("Hit mine at {:?} after {}s", trigger, self.elapsed_secs);

        for coords in iter_coords(self.size()) {
            let view = self.cell_view(coords);
            if matches!(
                view,
                CellView::Exploded | CellView::Mine | CellView::IncorrectFlag
            ) {
                changes.push(CellChange { coords, view });
            }
        }
    }

    /// Won once every mine is flagged and every other cell revealed.
    pub fn check_win(&mut self) -> bool {
        if self.state.is_finished() {
            return matches!(self.state, SessionState::Won);
        }

        let won = self.flagged_count == self.grid.mine_count()
            && self.revealed_count + self.flagged_count == self.grid.total_cells();
        if won {
            self.state = SessionState::Won;
            log::debug!("Won after {}s", self.elapsed_secs);
        }
        won
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.grid
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos.to_nd_index()] == CellState::Flagged)
            .count() as u8
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
