use anyhow::Result;
use chrono::{DateTime, Utc};
use minegym_core::{CellCount, Game, GameConfig, Observation, Outcome, Status};
use serde::Serialize;
use serde_json::Value;

use crate::agent::{Agent, AgentMove};

/// Configuration for one scored episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeConfig {
    pub game: GameConfig,
    pub seed: u64,
    pub max_moves: usize,
}

impl EpisodeConfig {
    #[must_use]
    pub fn new(game: GameConfig, seed: u64) -> Self {
        Self {
            game,
            seed,
            max_moves: 512,
        }
    }

    #[must_use]
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }
}

/// One request/outcome exchange from an episode transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    pub index: usize,
    pub request: Value,
    pub rationale: Option<String>,
    pub outcome: Outcome,
    pub status: Status,
    pub cells_revealed: CellCount,
    pub flags_placed: CellCount,
}

/// Full scored result of one episode.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeReport {
    pub agent: String,
    pub seed: u64,
    pub config: GameConfig,
    pub status: Status,
    pub last_outcome: Option<Outcome>,
    pub moves_played: usize,
    pub cells_revealed: CellCount,
    pub safe_cells: CellCount,
    pub flags_placed: CellCount,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub transcript: Vec<MoveRecord>,
}

impl EpisodeReport {
    /// Fraction of the reveal target reached, the primary score. A struck
    /// mine counts as a revealed cell, same as in the transcript counters.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        f64::from(self.cells_revealed) / f64::from(self.safe_cells)
    }

    #[must_use]
    pub fn won(&self) -> bool {
        self.status == Status::Success
    }
}

/// Drives one game through an agent, one exchange per call.
///
/// The episode ends when the game does, or at the move cap; a report can be
/// taken at any point with [`EpisodeSession::finish`].
pub struct EpisodeSession {
    game: Game,
    seed: u64,
    max_moves: usize,
    transcript: Vec<MoveRecord>,
    started_at: DateTime<Utc>,
}

impl EpisodeSession {
    /// Generates the board from the episode seed and opens the session.
    pub fn new(config: EpisodeConfig) -> Result<Self> {
        let game = Game::new(config.game, Some(config.seed))?;
        Ok(Self::from_game(game, config.seed, config.max_moves))
    }

    /// Opens a session on an existing game, e.g. a pinned fixture board.
    #[must_use]
    pub fn from_game(game: Game, seed: u64, max_moves: usize) -> Self {
        Self {
            game,
            seed,
            max_moves,
            transcript: Vec::new(),
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::from_game(&self.game)
    }

    #[must_use]
    pub fn moves_played(&self) -> usize {
        self.transcript.len()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.game.is_finished() || self.transcript.len() >= self.max_moves
    }

    /// One exchange: ask the agent, apply its request, record the answer.
    /// Returns `None` once the episode is over.
    pub fn advance(&mut self, agent: &mut dyn Agent) -> Option<MoveRecord> {
        if self.is_done() {
            return None;
        }

        let observation = self.observation();
        let AgentMove { request, rationale } = agent.propose(&observation);
        let outcome = self.game.do_action(&request);

        let record = MoveRecord {
            index: self.transcript.len(),
            request,
            rationale,
            outcome,
            status: self.game.status(),
            cells_revealed: self.game.revealed_count(),
            flags_placed: self.game.flag_count(),
        };
        log::debug!("move {}: {} -> {}", record.index, record.request, record.outcome);
        self.transcript.push(record.clone());
        Some(record)
    }

    /// Plays the remaining moves and closes the session.
    pub fn run(mut self, agent: &mut dyn Agent) -> EpisodeReport {
        while self.advance(agent).is_some() {}
        self.finish(agent.name())
    }

    pub fn finish(self, agent: &str) -> EpisodeReport {
        let config = self.game.config();
        EpisodeReport {
            agent: agent.to_string(),
            seed: self.seed,
            config,
            status: self.game.status(),
            last_outcome: self.transcript.last().map(|record| record.outcome),
            moves_played: self.transcript.len(),
            cells_revealed: self.game.revealed_count(),
            safe_cells: config.safe_cells(),
            flags_placed: self.game.flag_count(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            transcript: self.transcript,
        }
    }
}

/// Plays one whole episode start to finish.
pub fn run_episode(config: EpisodeConfig, agent: &mut dyn Agent) -> Result<EpisodeReport> {
    let session = EpisodeSession::new(config)?;
    let report = session.run(agent);
    log::info!(
        "{} finished seed {} with status {:?} after {} moves",
        report.agent,
        report.seed,
        report.status,
        report.moves_played
    );
    Ok(report)
}
