use std::io::{BufRead, Write};
use std::time::Instant;

use minefield_core::{BoardGenerator, BoardView, CellState, Coord2, Game, GameStatus};

use crate::command::{Command, HELP};
use crate::render::{render, status_message};
use crate::stopwatch::Stopwatch;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Routes parsed commands to the game and redraws after every one of them.
pub struct App<G> {
    game: Game<G>,
    stopwatch: Stopwatch,
}

impl<G: BoardGenerator> App<G> {
    pub fn new(game: Game<G>) -> Self {
        Self {
            game,
            stopwatch: Stopwatch::default(),
        }
    }

    pub fn game(&self) -> &Game<G> {
        &self.game
    }

    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
        writeln!(out, "{}", HELP)?;
        self.draw(&mut out)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(command) => {
                    if self.handle(command, Instant::now(), &mut out)? == Flow::Quit {
                        break;
                    }
                }
                Err(err) => writeln!(out, "{}", err)?,
            }
            out.flush()?;
        }

        Ok(())
    }

    pub fn handle(
        &mut self,
        command: Command,
        now: Instant,
        out: &mut impl Write,
    ) -> anyhow::Result<Flow> {
        self.catch_up(now);

        let result = match command {
            Command::Reveal(coords) => self.reveal(coords, now),
            Command::Chord(coords) => self.game.chord_reveal(coords).map(|outcome| outcome.status),
            Command::Flag(coords) => self.game.toggle_flag(coords).map(|outcome| outcome.status),
            Command::Mark(coords) => self.game.cycle_mark(coords).map(|outcome| outcome.status),
            Command::NewGame => {
                self.game.restart();
                self.stopwatch.stop();
                Ok(GameStatus::InProgress)
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        match result {
            Ok(status) if status.is_finished() => self.stopwatch.stop(),
            Ok(_) => {}
            Err(err) => writeln!(out, "{}", err)?,
        }

        self.draw(out)?;
        Ok(Flow::Continue)
    }

    fn reveal(&mut self, coords: Coord2, now: Instant) -> minefield_core::Result<GameStatus> {
        let coords = self.game.config().validate_coords(coords)?;
        let started = self.game.is_started();

        // a revealed number chords, like a primary click on it
        let on_revealed = self
            .game
            .session()
            .is_some_and(|session| session.cell_state(coords) == CellState::Revealed);
        let outcome = if on_revealed {
            self.game.chord_reveal(coords)?
        } else {
            self.game.reveal_cell(coords)?
        };

        if !started && self.game.is_started() {
            self.stopwatch.start(now);
        }
        Ok(outcome.status)
    }

    fn catch_up(&mut self, now: Instant) {
        for _ in 0..self.stopwatch.ticks_due(now) {
            self.game.tick();
        }
    }

    fn draw(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let view = BoardView::from_game(&self.game);
        write!(out, "{}", render(&view))?;
        if let Some(message) = status_message(&view) {
            writeln!(out, "{}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minefield_core::{CellView, GameConfig, Grid, RandomBoardGenerator, iter_coords};
    use std::time::Duration;

    fn app(seed: u64) -> App<RandomBoardGenerator> {
        App::new(Game::new(GameConfig::BEGINNER, RandomBoardGenerator::new(seed)).unwrap())
    }

    /// Always lays the same mines, wherever the first reveal lands.
    struct FixedMines(Vec<Coord2>);

    impl BoardGenerator for FixedMines {
        fn generate(
            &mut self,
            config: GameConfig,
            _start: Coord2,
        ) -> minefield_core::Result<Grid> {
            Grid::from_mine_coords(config.size, &self.0)
        }
    }

    /// 4x4 with a single mine in the corner and the 1 next to it revealed.
    fn corner_mine_app(out: &mut Vec<u8>) -> App<FixedMines> {
        let config = GameConfig::new((4, 4), 1).unwrap();
        let mut app = App::new(Game::new(config, FixedMines(vec![(3, 3)])).unwrap());
        app.handle(Command::Reveal((2, 2)), Instant::now(), out)
            .unwrap();
        assert_eq!(app.game().cell_view((2, 2)), CellView::Revealed(1));
        app
    }

    #[test]
    fn first_reveal_starts_the_clock() {
        let mut app = app(1);
        let mut out = Vec::new();
        let t0 = Instant::now();

        app.handle(Command::Reveal((4, 4)), t0, &mut out).unwrap();
        app.handle(Command::Flag((0, 0)), t0 + Duration::from_secs(3), &mut out)
            .unwrap();

        assert_eq!(app.game().elapsed_secs(), 3);
        assert_eq!(app.game().cell_view((4, 4)), CellView::Revealed(0));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Time: 003"));
    }

    #[test]
    fn errors_are_reported_and_play_continues() {
        let mut app = app(2);
        let mut out = Vec::new();

        let flow = app
            .handle(Command::Reveal((20, 0)), Instant::now(), &mut out)
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(!app.game().is_started());
        assert!(String::from_utf8(out).unwrap().contains("Invalid coordinates"));
    }

    #[test]
    fn new_game_resets_board_and_clock() {
        let mut app = app(3);
        let mut out = Vec::new();
        let t0 = Instant::now();
        app.handle(Command::Reveal((4, 4)), t0, &mut out).unwrap();

        app.handle(Command::NewGame, t0 + Duration::from_secs(5), &mut out)
            .unwrap();
        app.handle(Command::Reveal((0, 0)), t0 + Duration::from_secs(6), &mut out)
            .unwrap();
        app.handle(Command::Help, t0 + Duration::from_secs(8), &mut out)
            .unwrap();

        assert_eq!(app.game().elapsed_secs(), 2);
        assert_eq!(app.game().cell_view((0, 0)), CellView::Revealed(0));
    }

    #[test]
    fn losing_stops_the_clock() {
        let mut app = app(4);
        let mut out = Vec::new();
        let t0 = Instant::now();
        app.handle(Command::Reveal((4, 4)), t0, &mut out).unwrap();

        let grid = app.game().session().unwrap().grid().clone();
        let mine = minefield_core::iter_coords(grid.size())
            .find(|&coords| grid.contains_mine(coords))
            .unwrap();
        app.handle(Command::Reveal(mine), t0 + Duration::from_secs(1), &mut out)
            .unwrap();
        app.handle(Command::Reveal((4, 4)), t0 + Duration::from_secs(9), &mut out)
            .unwrap();

        assert_eq!(
            app.game().status(),
            Some(GameStatus::Lost {
                elapsed_secs: 1,
                trigger: mine
            })
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Game over!"));
        assert!(text.contains("Game already ended"));
    }

    #[test]
    fn reveal_on_a_satisfied_number_chords() {
        let mut out = Vec::new();
        let mut app = corner_mine_app(&mut out);
        app.handle(Command::Flag((3, 3)), Instant::now(), &mut out)
            .unwrap();

        app.handle(Command::Reveal((2, 2)), Instant::now(), &mut out)
            .unwrap();

        for coords in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2)] {
            assert!(
                matches!(app.game().cell_view(coords), CellView::Revealed(_)),
                "{:?} should be open",
                coords
            );
        }
        assert_eq!(app.game().cell_view((3, 3)), CellView::Flagged);
        assert!(app.game().status().is_some_and(|status| status.is_won()));
        assert!(String::from_utf8(out).unwrap().contains("You win!"));
    }

    #[test]
    fn chord_with_wrong_flag_count_changes_nothing() {
        let mut out = Vec::new();
        let mut app = corner_mine_app(&mut out);
        let before = BoardView::from_game(app.game());

        app.handle(Command::Chord((2, 2)), Instant::now(), &mut out)
            .unwrap();

        assert_eq!(BoardView::from_game(app.game()), before);
        let hidden = iter_coords((4, 4))
            .filter(|&coords| app.game().cell_view(coords) == CellView::Hidden)
            .count();
        assert_eq!(hidden, 15);
    }

    #[test]
    fn marking_twice_leaves_a_question() {
        let mut out = Vec::new();
        let mut app = corner_mine_app(&mut out);

        app.handle(Command::Mark((0, 0)), Instant::now(), &mut out)
            .unwrap();
        assert_eq!(app.game().cell_view((0, 0)), CellView::Flagged);
        assert_eq!(app.game().mines_left(), 0);

        app.handle(Command::Mark((0, 0)), Instant::now(), &mut out)
            .unwrap();

        assert_eq!(app.game().cell_view((0, 0)), CellView::Questioned);
        assert_eq!(app.game().mines_left(), 1);
        assert!(String::from_utf8(out).unwrap().contains("  0  ?"));
    }

    #[test]
    fn run_reads_commands_until_quit() {
        let mut app = app(5);
        let mut out = Vec::new();

        app.run("r 4 4\n\nbogus\nq\nr 0 0\n".as_bytes(), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Unknown command \"bogus\""));
        assert!(app.game().is_started());
        // the initial board and the one after `r 4 4`, nothing after quit
        assert_eq!(text.matches("Mines:").count(), 2);
    }
}
