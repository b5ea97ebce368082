use std::io;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use minefield_core::{CellCount, Coord, Game, GameConfig, RandomBoardGenerator};

use crate::app::App;

mod app;
mod command;
mod render;
mod stopwatch;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 9x9, 10 mines
    Beginner,
    /// 16x16, 40 mines
    Intermediate,
    /// 16x30, 99 mines
    Expert,
}

impl Preset {
    const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::BEGINNER,
            Self::Intermediate => GameConfig::INTERMEDIATE,
            Self::Expert => GameConfig::EXPERT,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board to start from, individual dimensions can be overridden
    #[arg(short, long, value_enum, default_value_t = Preset::Intermediate)]
    preset: Preset,

    /// Number of rows
    #[arg(long)]
    height: Option<Coord>,

    /// Number of columns
    #[arg(long)]
    width: Option<Coord>,

    /// Number of mines
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> GameConfig {
        let preset = self.preset.config();
        GameConfig::new_unchecked(
            (
                self.height.unwrap_or(preset.height()),
                self.width.unwrap_or(preset.width()),
            ),
            self.mines.unwrap_or(preset.mines),
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let config = args.config();
    let game = Game::new(config, RandomBoardGenerator::new(seed))
        .with_context(|| format!("Could not set up a {:?} board", config))?;

    let mut app = App::new(game);
    app.run(io::stdin().lock(), io::stdout().lock())?;
    log::debug!("Final status: {:?}", app.game().status());
    Ok(())
}
