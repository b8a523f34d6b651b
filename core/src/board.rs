use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::*;

/// Value a cell is assigned at generation time and never afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine,
    /// Number of mines among the up-to-8 neighbors.
    Count(u8),
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// Fixed mine layout plus the derived adjacency counts for one game.
///
/// A board is immutable once built; all play-time state lives in
/// [`Game`](crate::Game).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl Board {
    /// Builds a board with mines at exactly the given positions; adjacency
    /// counts are derived here. Duplicates collapse into a single mine.
    ///
    /// Intended for tests and replays where the layout must be pinned down
    /// rather than drawn from a seed.
    pub fn from_mine_positions(rows: Coord, cols: Coord, mine_positions: &[Pos]) -> Result<Self> {
        for &(row, col) in mine_positions {
            if row >= rows || col >= cols {
                return Err(GameError::InvalidConfiguration {
                    rows,
                    cols,
                    mines: mine_positions.len() as CellCount,
                });
            }
        }

        let mut mask: Array2<bool> = Array2::default((rows, cols).to_nd_index());
        for &pos in mine_positions {
            mask[pos.to_nd_index()] = true;
        }

        let board = Self::from_mine_mask(rows, cols, &mask);
        board.config().validate()?;
        Ok(board)
    }

    /// Derives the full cell grid from a mine mask. The caller is responsible
    /// for validating the resulting configuration.
    pub(crate) fn from_mine_mask(rows: Coord, cols: Coord, mask: &Array2<bool>) -> Self {
        let mut mines = 0;
        let cells = Array2::from_shape_fn((rows, cols).to_nd_index(), |(row, col)| {
            let pos = (row as Coord, col as Coord);
            if mask[pos.to_nd_index()] {
                mines += 1;
                Cell::Mine
            } else {
                let adjacent = mask
                    .iter_neighbors(pos)
                    .filter(|&neighbor| mask[neighbor.to_nd_index()])
                    .count();
                Cell::Count(adjacent as u8)
            }
        });
        Self {
            cells,
            rows,
            cols,
            mines,
        }
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn mine_count(&self) -> CellCount {
        self.mines
    }

    pub const fn size(&self) -> Pos {
        (self.rows, self.cols)
    }

    pub const fn config(&self) -> GameConfig {
        GameConfig::new(self.rows, self.cols, self.mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    /// Number of cells that must be revealed to win.
    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[pos.to_nd_index()]
    }

    pub fn is_mine(&self, pos: Pos) -> bool {
        self.cell(pos).is_mine()
    }

    pub(crate) fn iter_neighbors(&self, pos: Pos) -> NeighborIter {
        self.cells.iter_neighbors(pos)
    }
}

impl Index<Pos> for Board {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}
