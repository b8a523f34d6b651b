use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the player can see of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisibleCell {
    Hidden,
    Flagged,
    /// A revealed mine, only ever visible after the losing move.
    Mine,
    Count(u8),
}

impl VisibleCell {
    /// Single-character form used on the wire and in rendered boards.
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Flagged => 'F',
            Self::Mine => '*',
            Self::Count(count) => (b'0' + count) as char,
        }
    }
}

impl Game {
    /// Projects the player-visible board. Pure: callable at any point in the
    /// game without changing it, and it never leaks unrevealed mines.
    pub fn visible_view(&self) -> Array2<VisibleCell> {
        Array2::from_shape_fn(self.board().size().to_nd_index(), |(row, col)| {
            let pos = (row as Coord, col as Coord);
            match self.cell_state(pos) {
                CellState::Flagged => VisibleCell::Flagged,
                CellState::Hidden => VisibleCell::Hidden,
                CellState::Revealed => match self.board().cell(pos) {
                    Cell::Mine => VisibleCell::Mine,
                    Cell::Count(count) => VisibleCell::Count(count),
                },
            }
        })
    }
}

/// Everything an external agent is allowed to observe: the symbol grid plus
/// aggregate counters, never the mine layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub board: Vec<Vec<char>>,
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    pub flags_placed: CellCount,
    pub cells_revealed: CellCount,
}

impl Observation {
    pub fn from_game(game: &Game) -> Self {
        let view = game.visible_view();
        let board = view
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        Self {
            board,
            rows: game.rows(),
            cols: game.cols(),
            mines: game.mine_count(),
            flags_placed: game.flag_count(),
            cells_revealed: game.revealed_count(),
        }
    }

    pub fn symbol_at(&self, pos: Pos) -> char {
        self.board[usize::from(pos.0)][usize::from(pos.1)]
    }
}
