use std::collections::VecDeque;
use std::fmt;

use clap::ValueEnum;
use minegym_core::{neighbors, Action, Coord, Observation, Pos};
use rand::prelude::*;
use serde_json::Value;

/// Move proposed by an [`Agent`], as the raw request handed to the game.
#[derive(Debug, Clone)]
pub struct AgentMove {
    pub request: Value,
    pub rationale: Option<String>,
}

impl AgentMove {
    #[must_use]
    pub fn new(request: Value, rationale: Option<String>) -> Self {
        Self { request, rationale }
    }

    /// A deliberately unanswerable move: `null` is rejected by the game, so
    /// an agent with nothing left to say forfeits.
    #[must_use]
    pub fn forfeit(reason: &str) -> Self {
        Self {
            request: Value::Null,
            rationale: Some(reason.to_string()),
        }
    }
}

/// Interface for automated players.
///
/// Implementations only ever see the [`Observation`] a remote decision-maker
/// would receive, never the mine layout, and they answer in the wire format
/// the game validates itself.
pub trait Agent {
    /// Name used for logging and reports.
    fn name(&self) -> &'static str;

    /// Propose the next request for the given observation.
    fn propose(&mut self, observation: &Observation) -> AgentMove;
}

/// Built-in agents selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum AgentKind {
    Random,
    SinglePoint,
}

impl AgentKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::SinglePoint => "single-point",
        }
    }

    #[must_use]
    pub fn create(self, seed: u64) -> Box<dyn Agent + Send> {
        match self {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::SinglePoint => Box::new(SinglePointAgent::new(seed)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Replays a fixed request sequence, then forfeits.
pub struct ScriptedAgent {
    script: VecDeque<Value>,
}

impl ScriptedAgent {
    pub fn new(requests: impl IntoIterator<Item = Value>) -> Self {
        Self {
            script: requests.into_iter().collect(),
        }
    }

    /// Convenience constructor for replaying well-formed actions.
    pub fn replaying(actions: &[Action]) -> Self {
        Self::new(actions.iter().map(|action| action.to_request()))
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn propose(&mut self, _observation: &Observation) -> AgentMove {
        match self.script.pop_front() {
            Some(request) => AgentMove::new(request, None),
            None => AgentMove::forfeit("script exhausted"),
        }
    }
}

/// Reveals a uniformly random hidden cell each turn; never flags.
pub struct RandomAgent {
    rng: SmallRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn propose(&mut self, observation: &Observation) -> AgentMove {
        let hidden = hidden_cells(observation);
        if hidden.is_empty() {
            return AgentMove::forfeit("no hidden cells left");
        }
        let pick = hidden[self.rng.random_range(0..hidden.len())];
        AgentMove::new(Action::Reveal(pick).to_request(), None)
    }
}

/// Classic single-point player: acts on certain deductions from one counted
/// cell at a time, and guesses like [`RandomAgent`] when nothing is certain.
pub struct SinglePointAgent {
    rng: SmallRng,
}

impl SinglePointAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Agent for SinglePointAgent {
    fn name(&self) -> &'static str {
        "single-point"
    }

    fn propose(&mut self, observation: &Observation) -> AgentMove {
        if let Some(certain) = deduce(observation) {
            return certain;
        }
        let hidden = hidden_cells(observation);
        if hidden.is_empty() {
            return AgentMove::forfeit("no hidden cells left");
        }
        let pick = hidden[self.rng.random_range(0..hidden.len())];
        AgentMove::new(
            Action::Reveal(pick).to_request(),
            Some("no certain move, guessing".to_string()),
        )
    }
}

/// Single-point deductions over the visible symbols: a count matched by its
/// flags makes the remaining hidden neighbors safe, and a count matched by
/// flags plus hidden neighbors makes those neighbors all mines. Safe reveals
/// are preferred over flag placements.
fn deduce(observation: &Observation) -> Option<AgentMove> {
    let bounds = (observation.rows, observation.cols);
    let mut flag_move: Option<AgentMove> = None;

    for (row, symbols) in observation.board.iter().enumerate() {
        for (col, symbol) in symbols.iter().enumerate() {
            let Some(count) = symbol.to_digit(10) else {
                continue;
            };
            let center = (row as Coord, col as Coord);

            let mut hidden = Vec::new();
            let mut flagged = 0;
            for neighbor in neighbors(center, bounds) {
                match observation.symbol_at(neighbor) {
                    '.' => hidden.push(neighbor),
                    'F' => flagged += 1,
                    _ => {}
                }
            }
            if hidden.is_empty() {
                continue;
            }

            if count == flagged {
                return Some(AgentMove::new(
                    Action::Reveal(hidden[0]).to_request(),
                    Some(format!("count at {center:?} is satisfied")),
                ));
            }
            if count == flagged + hidden.len() as u32 && flag_move.is_none() {
                flag_move = Some(AgentMove::new(
                    Action::Flag(hidden[0]).to_request(),
                    Some(format!("all hidden neighbors of {center:?} are mines")),
                ));
            }
        }
    }

    flag_move
}

fn hidden_cells(observation: &Observation) -> Vec<Pos> {
    let mut cells = Vec::new();
    for (row, symbols) in observation.board.iter().enumerate() {
        for (col, &symbol) in symbols.iter().enumerate() {
            if symbol == '.' {
                cells.push((row as Coord, col as Coord));
            }
        }
    }
    cells
}
