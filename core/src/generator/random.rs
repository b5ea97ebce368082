use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Places `config.mines` mines uniformly at random, none of them within the 3x3 block around
/// `start`, then fills in every adjacency count.
///
/// Candidates are drawn by rejection sampling without an attempt bound. `GameConfig::validate`
/// guarantees at least one free cell remains, so this terminates for any sane random source.
pub fn generate<R: Rng>(config: GameConfig, start: Coord2, rng: &mut R) -> Result<Grid> {
    config.validate()?;
    let start = config.validate_coords(start)?;
    let (height, width) = config.size;

    let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
    let mut mines_placed: CellCount = 0;
    let mut attempts: u64 = 0;

    while mines_placed < config.mines {
        let candidate = (rng.random_range(0..height), rng.random_range(0..width));
        attempts += 1;

        if mines[candidate.to_nd_index()] || in_safe_zone(start, candidate) {
            continue;
        }

        mines[candidate.to_nd_index()] = true;
        mines_placed += 1;
    }

    log::debug!(
        "Placed {} mines on {}x{} around start {:?} in {} attempts",
        mines_placed,
        height,
        width,
        start,
        attempts
    );

    Ok(Grid::from_mine_mask(&mines))
}

/// Seeded generator, the same seed and sequence of first clicks always produce the same boards.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    seed: u64,
    rng: SmallRng,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self, config: GameConfig, start: Coord2) -> Result<Grid> {
        generate(config, start, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mines_in(grid: &Grid) -> usize {
        grid.cells().iter().filter(|value| value.is_mine()).count()
    }

    #[test]
    fn places_exact_mine_count_outside_safe_zone() {
        let cases = [
            ((4, 4), 6, (0, 0)),
            ((4, 4), 1, (2, 1)),
            ((9, 9), 10, (4, 4)),
            ((16, 16), 40, (0, 15)),
            ((16, 30), 99, (8, 29)),
            ((5, 12), 50, (2, 6)),
        ];

        for (seed, &(size, mines, start)) in cases.iter().enumerate() {
            let config = GameConfig::new(size, mines).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed as u64);
            let grid = generate(config, start, &mut rng).unwrap();

            assert_eq!(grid.size(), size);
            assert_eq!(mines_in(&grid), usize::from(mines));
            assert_eq!(grid.mine_count(), mines);
            for coords in iter_coords(size) {
                if in_safe_zone(start, coords) {
                    assert!(!grid.contains_mine(coords), "mine at {:?} near {:?}", coords, start);
                }
            }
        }
    }

    #[test]
    fn indicators_match_brute_force_count() {
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = generate(GameConfig::EXPERT, (3, 3), &mut rng).unwrap();

        for coords in iter_coords(grid.size()) {
            let CellValue::Adjacent(count) = grid[coords] else {
                continue;
            };
            let (row, col) = (i16::from(coords.0), i16::from(coords.1));
            let mut expected = 0;
            for d_row in -1..=1 {
                for d_col in -1..=1 {
                    let (r, c) = (row + d_row, col + d_col);
                    if (d_row, d_col) == (0, 0) || r < 0 || c < 0 || r >= 16 || c >= 30 {
                        continue;
                    }
                    if grid.contains_mine((r as Coord, c as Coord)) {
                        expected += 1;
                    }
                }
            }
            assert_eq!(count, expected, "indicator at {:?}", coords);
        }
        assert!(grid.validate());
    }

    #[test]
    fn single_mine_on_four_by_four_avoids_corner_start() {
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let grid = generate(GameConfig::new_unchecked((4, 4), 1), (0, 0), &mut rng).unwrap();

            for coords in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                assert!(!grid.contains_mine(coords));
            }
            assert_eq!(grid.mine_count(), 1);
        }
    }

    #[test]
    fn eight_mines_on_four_by_four_is_invalid() {
        let mut rng = SmallRng::seed_from_u64(0);

        let result = generate(GameConfig::new_unchecked((4, 4), 8), (0, 0), &mut rng);

        assert!(matches!(result, Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn tiny_board_is_invalid() {
        let mut rng = SmallRng::seed_from_u64(0);

        let result = generate(GameConfig::new_unchecked((3, 8), 1), (0, 0), &mut rng);

        assert_eq!(
            result,
            Err(GameError::InvalidConfiguration(ConfigError::BoardTooSmall {
                height: 3,
                width: 8
            }))
        );
    }

    #[test]
    fn start_outside_board_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(0);

        let result = generate(GameConfig::BEGINNER, (9, 0), &mut rng);

        assert_eq!(result, Err(GameError::InvalidCoords));
    }

    #[test]
    fn same_seed_same_board() {
        let mut a = RandomBoardGenerator::new(42);
        let mut b = RandomBoardGenerator::new(42);

        let first = a.generate(GameConfig::INTERMEDIATE, (5, 5)).unwrap();
        assert_eq!(first, b.generate(GameConfig::INTERMEDIATE, (5, 5)).unwrap());
        assert_eq!(a.seed(), 42);

        // the stream moves on, so a restart gets a fresh board
        let second = a.generate(GameConfig::INTERMEDIATE, (5, 5)).unwrap();
        assert_ne!(second, first);
        assert_eq!(second, b.generate(GameConfig::INTERMEDIATE, (5, 5)).unwrap());
    }
}
