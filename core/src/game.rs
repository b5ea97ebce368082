use crate::*;

/// Holds the configuration between games and creates a session on the first reveal, so the
/// grid can be generated around the first clicked cell.
#[derive(Clone, Debug)]
pub struct Game<G> {
    config: GameConfig,
    generator: G,
    session: Option<GameSession>,
}

impl<G: BoardGenerator> Game<G> {
    pub fn new(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            generator,
            session: None,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// `None` until the first reveal.
    pub fn status(&self) -> Option<GameStatus> {
        self.session.as_ref().map(GameSession::status)
    }

    pub fn mines_left(&self) -> isize {
        match &self.session {
            Some(session) => session.mines_left(),
            None => self.config.mines as isize,
        }
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.session.as_ref().map_or(0, GameSession::elapsed_secs)
    }

    /// Every cell is hidden until the first reveal.
    ///
    /// # Panics
    ///
    /// Panics if `coords` is outside the board once the game has started.
    pub fn cell_view(&self, coords: Coord2) -> CellView {
        self.session
            .as_ref()
            .map_or(CellView::Hidden, |session| session.cell_view(coords))
    }

    /// Drops the current session, the next reveal generates a new grid.
    pub fn restart(&mut self) {
        log::debug!("Restarting {:?}", self.config);
        self.session = None;
    }

    /// Switches to another configuration and restarts.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.restart();
        Ok(())
    }

    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.session_or_start(coords)?.reveal_cell(coords)
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;
        match &mut self.session {
            Some(session) => session.chord_reveal(coords),
            None => Ok(RevealOutcome::unchanged(GameStatus::InProgress)),
        }
    }

    /// Marks are ignored until the first reveal has created the board.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.config.validate_coords(coords)?;
        match &mut self.session {
            Some(session) => session.toggle_flag(coords),
            None => Ok(MarkOutcome::unchanged(CellView::Hidden, GameStatus::InProgress)),
        }
    }

    pub fn cycle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.config.validate_coords(coords)?;
        match &mut self.session {
            Some(session) => session.cycle_mark(coords),
            None => Ok(MarkOutcome::unchanged(CellView::Hidden, GameStatus::InProgress)),
        }
    }

    pub fn tick(&mut self) {
        if let Some(session) = &mut self.session {
            session.tick();
        }
    }

    fn session_or_start(&mut self, coords: Coord2) -> Result<&mut GameSession> {
        match self.session {
            Some(ref mut session) => Ok(session),
            None => {
                let grid = self.generator.generate(self.config, coords)?;
                log::debug!("Started {:?} at {:?}", self.config, coords);
                Ok(self.session.insert(GameSession::new(grid)))
            }
        }
    }
}
