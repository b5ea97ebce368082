use std::str::{FromStr, SplitWhitespace};

use anyhow::{Context, anyhow, bail};
use minefield_core::{Coord, Coord2};

pub const HELP: &str = "\
Commands (coordinates are `row col`, counting from 0):
  r ROW COL   reveal a cell, on a revealed number reveal its neighbors
  c ROW COL   reveal the neighbors of a number whose flags are all placed
  f ROW COL   flag or unflag a cell
  m ROW COL   cycle flag / question mark / nothing
  n           new game
  h           this help
  q           quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Chord(Coord2),
    Flag(Coord2),
    Mark(Coord2),
    NewGame,
    Help,
    Quit,
}

fn parse_coord(parts: &mut SplitWhitespace<'_>, axis: &str) -> anyhow::Result<Coord> {
    let part = parts.next().ok_or_else(|| anyhow!("Missing {}", axis))?;
    part.parse()
        .with_context(|| format!("Invalid {} {:?}", axis, part))
}

fn parse_coords(parts: &mut SplitWhitespace<'_>) -> anyhow::Result<Coord2> {
    let row = parse_coord(parts, "row")?;
    let col = parse_coord(parts, "column")?;
    Ok((row, col))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| anyhow!("Empty command"))?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut parts)?),
            "c" | "chord" => Self::Chord(parse_coords(&mut parts)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut parts)?),
            "m" | "mark" => Self::Mark(parse_coords(&mut parts)?),
            "n" | "new" => Self::NewGame,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("Unknown command {:?}, type h for help", other),
        };

        if let Some(extra) = parts.next() {
            bail!("Unexpected {:?} after command", extra);
        }
        Ok(command)
    }
}
