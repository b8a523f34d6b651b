//! Deterministic Minesweeper engine built for scoring external agents.
//!
//! A game is constructed from a [`GameConfig`] and an optional seed; the same
//! seed always yields the same board, and the same action sequence on it
//! always yields the same outcome sequence. Play happens exclusively through
//! [`Game::do_action`], which takes raw JSON requests and answers with an
//! [`Outcome`] instead of an error: rejected requests are themselves moves,
//! and they lose the game.

use serde::{Deserialize, Serialize};

pub use action::*;
pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;
pub use view::*;

mod action;
mod board;
mod engine;
mod error;
mod generator;
mod types;
mod view;

/// Board shape and mine budget for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Rejects shapes no game can be played on. A mine count of zero is
    /// allowed; a board made only of mines is not.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfiguration {
                rows: self.rows,
                cols: self.cols,
                mines: self.mines,
            });
        }
        Ok(())
    }
}
