use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};

use crate::*;

/// Overall game lifecycle stage.
///
/// Valid transitions:
/// - Ongoing -> Failed
/// - Ongoing -> Success
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ongoing,
    Failed,
    Success,
}

impl Status {
    /// Indicates the game has ended and no request can change it anymore.
    pub const fn is_finished(self) -> bool {
        match self {
            Self::Ongoing => false,
            Self::Failed => true,
            Self::Success => true,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Ongoing
    }
}

/// Player-side knowledge about one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One game from construction to its terminal status.
///
/// The mine layout is fixed at construction; everything that changes during
/// play lives in the state grid and the counters, and the only mutator is
/// [`Game::do_action`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    grid: Array2<CellState>,
    revealed_count: CellCount,
    flag_count: CellCount,
    status: Status,
}

impl Game {
    /// Generates a fresh board and starts a game on it. Without a seed the
    /// layout comes from entropy; callers that need to reproduce it should
    /// pick the seed themselves and pass it in.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let generator = match seed {
            Some(seed) => UniformGenerator::new(seed),
            None => UniformGenerator::from_entropy(),
        };
        Ok(Self::from_board(generator.generate(config)?))
    }

    /// Starts a game on an existing board, e.g. a pinned layout from
    /// [`Board::from_mine_positions`].
    pub fn from_board(board: Board) -> Self {
        let grid = Array2::default(board.size().to_nd_index());
        Self {
            board,
            grid,
            revealed_count: 0,
            flag_count: 0,
            status: Status::Ongoing,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn rows(&self) -> Coord {
        self.board.rows()
    }

    pub fn cols(&self) -> Coord {
        self.board.cols()
    }

    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn cell_state(&self, pos: Pos) -> CellState {
        self.grid[pos.to_nd_index()]
    }

    /// Applies one wire-level action request; the sole mutator.
    ///
    /// Always answers with an [`Outcome`]. A rejected request is not retried
    /// or ignored: it fails the game on the spot. Once the game has ended,
    /// every further request answers [`Outcome::GameOver`] and changes
    /// nothing.
    pub fn do_action(&mut self, request: &Value) -> Outcome {
        if self.status.is_finished() {
            return Outcome::GameOver;
        }

        let action = match classify_request(request, self.board.rows(), self.board.cols()) {
            Ok(action) => action,
            Err(rejection) => {
                self.status = Status::Failed;
                log::debug!("rejected request -> {rejection}");
                return rejection;
            }
        };

        let outcome = match action {
            Action::Reveal(pos) => self.reveal(pos),
            Action::Flag(pos) => self.toggle_flag(pos),
        };
        log::debug!("{action:?} -> {outcome} ({:?})", self.status);
        outcome
    }

    fn fail(&mut self, rejection: Outcome) -> Outcome {
        self.status = Status::Failed;
        rejection
    }

    fn reveal(&mut self, pos: Pos) -> Outcome {
        match self.grid[pos.to_nd_index()] {
            CellState::Revealed => self.fail(Outcome::AlreadyRevealed),
            CellState::Flagged => self.fail(Outcome::FlaggedCell),
            CellState::Hidden => {
                let outcome = self.reveal_flood(pos);
                if outcome == Outcome::Mine {
                    return outcome;
                }
                if self.revealed_count == self.board.safe_cell_count() {
                    self.status = Status::Success;
                    Outcome::Win
                } else {
                    outcome
                }
            }
        }
    }

    /// Iterative flood fill from `start`. Revealing a zero-count cell spreads
    /// to its hidden neighbors and keeps going through further zero cells;
    /// flagged cells are a hard barrier the fill never crosses. Hitting a
    /// mine fails the game immediately, before any win check.
    fn reveal_flood(&mut self, start: Pos) -> Outcome {
        let mut visited = HashSet::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(pos) = to_visit.pop_front() {
            if !visited.insert(pos) {
                continue;
            }
            if self.grid[pos.to_nd_index()] != CellState::Hidden {
                continue;
            }

            self.grid[pos.to_nd_index()] = CellState::Revealed;
            self.revealed_count += 1;

            match self.board.cell(pos) {
                Cell::Mine => {
                    self.status = Status::Failed;
                    log::debug!("revealed a mine at {pos:?}");
                    return Outcome::Mine;
                }
                Cell::Count(0) => {
                    log::trace!("flood fill opened {pos:?}, spreading");
                    to_visit.extend(
                        self.board
                            .iter_neighbors(pos)
                            .filter(|&neighbor| {
                                self.grid[neighbor.to_nd_index()] == CellState::Hidden
                            })
                            .filter(|neighbor| !visited.contains(neighbor)),
                    );
                }
                Cell::Count(count) => {
                    log::trace!("flood fill opened {pos:?} with count {count}");
                }
            }
        }

        Outcome::Ok
    }

    fn toggle_flag(&mut self, pos: Pos) -> Outcome {
        match self.grid[pos.to_nd_index()] {
            CellState::Revealed => self.fail(Outcome::InvalidFlag),
            CellState::Hidden => {
                self.grid[pos.to_nd_index()] = CellState::Flagged;
                self.flag_count += 1;
                Outcome::Ok
            }
            CellState::Flagged => {
                self.grid[pos.to_nd_index()] = CellState::Hidden;
                self.flag_count -= 1;
                Outcome::Ok
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture(rows: Coord, cols: Coord, mines: &[Pos]) -> Game {
        Game::from_board(Board::from_mine_positions(rows, cols, mines).unwrap())
    }

    fn reveal(row: Coord, col: Coord) -> Value {
        Action::Reveal((row, col)).to_request()
    }

    fn flag(row: Coord, col: Coord) -> Value {
        Action::Flag((row, col)).to_request()
    }

    #[test]
    fn corner_reveal_floods_and_wins_in_one_move() {
        // single mine tucked in the far corner: every other cell is reachable
        // through the zero-region in front of it
        let mut game = fixture(3, 3, &[(2, 2)]);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::Win);
        assert_eq!(game.status(), Status::Success);
        assert_eq!(game.revealed_count(), 8);
        assert_eq!(game.cell_state((2, 2)), CellState::Hidden);
        assert_eq!(game.cell_state((1, 1)), CellState::Revealed);
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&reveal(1, 1)), Outcome::Mine);
        assert_eq!(game.status(), Status::Failed);
        // the mine itself counts as revealed
        assert_eq!(game.revealed_count(), 1);
        assert_eq!(game.cell_state((1, 1)), CellState::Revealed);
    }

    #[test]
    fn flag_toggles_on_off_on() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&flag(0, 0)), Outcome::Ok);
        assert_eq!(game.flag_count(), 1);
        assert_eq!(game.do_action(&flag(0, 0)), Outcome::Ok);
        assert_eq!(game.flag_count(), 0);
        assert_eq!(game.cell_state((0, 0)), CellState::Hidden);
        assert_eq!(game.do_action(&flag(0, 0)), Outcome::Ok);
        assert_eq!(game.flag_count(), 1);
        assert_eq!(game.status(), Status::Ongoing);
    }

    #[test]
    fn out_of_bounds_reveal_fails_the_game() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&reveal(99, 99)), Outcome::OutOfBounds);
        assert_eq!(game.status(), Status::Failed);
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn malformed_request_fails_the_game() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(
            game.do_action(&json!({"type": "poke", "row": 0, "col": 0})),
            Outcome::InvalidFormat
        );
        assert_eq!(game.status(), Status::Failed);
    }

    #[test]
    fn finished_games_answer_game_over_and_freeze() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&reveal(1, 1)), Outcome::Mine);

        let frozen = game.clone();
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::GameOver);
        assert_eq!(game.do_action(&flag(0, 0)), Outcome::GameOver);
        assert_eq!(game.do_action(&json!("garbage")), Outcome::GameOver);
        assert_eq!(game, frozen);
    }

    #[test]
    fn revealing_a_revealed_cell_fails() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::Ok);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::AlreadyRevealed);
        assert_eq!(game.status(), Status::Failed);
    }

    #[test]
    fn revealing_a_flagged_cell_fails() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&flag(0, 0)), Outcome::Ok);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::FlaggedCell);
        assert_eq!(game.status(), Status::Failed);
    }

    #[test]
    fn flagging_a_revealed_cell_fails() {
        let mut game = fixture(3, 3, &[(1, 1)]);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::Ok);
        assert_eq!(game.do_action(&flag(0, 0)), Outcome::InvalidFlag);
        assert_eq!(game.status(), Status::Failed);
    }

    #[test]
    fn flags_block_the_flood_fill() {
        // one open corridor, mine at the far end
        let mut game = fixture(1, 5, &[(0, 4)]);
        assert_eq!(game.do_action(&flag(0, 2)), Outcome::Ok);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::Ok);
        assert_eq!(game.cell_state((0, 1)), CellState::Revealed);
        assert_eq!(game.cell_state((0, 2)), CellState::Flagged);
        assert_eq!(game.cell_state((0, 3)), CellState::Hidden);
        assert_eq!(game.revealed_count(), 2);

        // lifting the flag reopens the corridor
        assert_eq!(game.do_action(&flag(0, 2)), Outcome::Ok);
        assert_eq!(game.do_action(&reveal(0, 2)), Outcome::Win);
        assert_eq!(game.cell_state((0, 3)), CellState::Revealed);
        assert_eq!(game.cell_state((0, 4)), CellState::Hidden);
    }

    #[test]
    fn flood_fill_stops_at_numbered_cells() {
        // 4x4 with a mine at (3, 3): the numbered ring around it stays the
        // frontier, the zero region beyond it opens in one reveal
        let mut game = fixture(4, 4, &[(3, 3)]);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::Win);
        assert_eq!(game.revealed_count(), 15);
        assert_eq!(game.cell_state((3, 3)), CellState::Hidden);
    }

    #[test]
    fn revealing_the_last_mine_still_loses() {
        // two safe cells, two mines; after one safe reveal the mine reveal
        // brings the revealed count up to the safe-cell count, but a mine
        // outranks the win condition
        let mut game = fixture(2, 2, &[(0, 0), (1, 1)]);
        assert_eq!(game.do_action(&reveal(0, 1)), Outcome::Ok);
        assert_eq!(game.do_action(&reveal(0, 0)), Outcome::Mine);
        assert_eq!(game.status(), Status::Failed);
        assert_eq!(game.revealed_count(), game.board().safe_cell_count());
    }

    #[test]
    fn win_requires_every_safe_cell() {
        let mut game = fixture(2, 2, &[(0, 0)]);
        assert_eq!(game.do_action(&reveal(0, 1)), Outcome::Ok);
        assert_eq!(game.status(), Status::Ongoing);
        assert_eq!(game.do_action(&reveal(1, 0)), Outcome::Ok);
        assert_eq!(game.do_action(&reveal(1, 1)), Outcome::Win);
        assert_eq!(game.status(), Status::Success);
    }

    #[test]
    fn zero_mine_board_wins_on_first_reveal() {
        let mut game = fixture(2, 3, &[]);
        assert_eq!(game.do_action(&reveal(1, 2)), Outcome::Win);
        assert_eq!(game.revealed_count(), 6);
    }

    #[test]
    fn same_seed_same_game() {
        let config = GameConfig::new(8, 8, 10);
        let mut first = Game::new(config, Some(42)).unwrap();
        let mut second = Game::new(config, Some(42)).unwrap();
        assert_eq!(first.board(), second.board());

        let request = reveal(0, 0);
        assert_eq!(first.do_action(&request), second.do_action(&request));
        assert_eq!(first, second);
    }

    #[test]
    fn construction_rejects_unplayable_configurations() {
        let config = GameConfig::new(2, 2, 4);
        assert!(matches!(
            Game::new(config, Some(1)),
            Err(GameError::InvalidConfiguration { .. })
        ));
    }
}
