use crate::*;
pub use random::*;

mod random;

/// Produces the grid for a new game once the first cell to reveal is known.
pub trait BoardGenerator {
    fn generate(&mut self, config: GameConfig, start: Coord2) -> Result<Grid>;
}
