use crate::types::{CellCount, Coord};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Board parameters that cannot produce a playable game: an empty board,
    /// or a mine budget that leaves no safe cell.
    #[error("invalid configuration: {rows}x{cols} board with {mines} mines")]
    InvalidConfiguration {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
