use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Counts the mines among the in-bounds 8 neighbors of `coords`.
pub fn count_adjacent_mines(cells: &Array2<CellValue>, coords: Coord2) -> u8 {
    cells
        .iter_neighbors(coords)
        .filter(|&pos| cells[pos.to_nd_index()].is_mine())
        .count() as u8
}

/// Immutable mine layout of one game, every safe cell carrying its adjacency count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<CellValue>,
    mine_count: CellCount,
}

impl Grid {
    /// Builds a grid from a mine mask, deriving every indicator.
    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let mut cells = mine_mask.map(|&is_mine| {
            if is_mine {
                CellValue::Mine
            } else {
                CellValue::default()
            }
        });
        let mut mine_count = 0;

        let (rows, cols) = cells.dim();
        for coords in iter_coords((rows as Coord, cols as Coord)) {
            if cells[coords.to_nd_index()].is_mine() {
                mine_count += 1;
            } else {
                let adjacent = count_adjacent_mines(&cells, coords);
                cells[coords.to_nd_index()] = CellValue::Adjacent(adjacent);
            }
        }

        Self { cells, mine_count }
    }

    /// Builds a grid with mines at exactly `mine_coords`, duplicates ignored.
    ///
    /// No size floor and no safe zone are applied, this is meant for replaying a known layout.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidCoords);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Board size as `(height, width)`.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub fn cells(&self) -> &Array2<CellValue> {
        &self.cells
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        count_adjacent_mines(&self.cells, coords)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Recomputes every indicator and the mine total, returns whether they all agree.
    pub fn validate(&self) -> bool {
        let mut mines = 0;
        for coords in iter_coords(self.size()) {
            match self[coords] {
                CellValue::Mine => mines += 1,
                CellValue::Adjacent(count) if count != self.count_adjacent_mines(coords) => {
                    log::debug!("Stale indicator at {:?}: stored {}", coords, count);
                    return false;
                }
                CellValue::Adjacent(_) => {}
            }
        }
        mines == self.mine_count
    }
}

impl Index<Coord2> for Grid {
    type Output = CellValue;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
