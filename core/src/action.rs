use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::{Coord, Pos};

/// Result of applying one action request to a game.
///
/// The engine never fails with an error here: anything that can go wrong is
/// itself an outcome, and the faulty codes double as the game's cause of
/// death.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Win,
    Mine,
    GameOver,
    InvalidFormat,
    OutOfBounds,
    AlreadyRevealed,
    FlaggedCell,
    InvalidFlag,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Win => "win",
            Self::Mine => "mine",
            Self::GameOver => "game_over",
            Self::InvalidFormat => "invalid_format",
            Self::OutOfBounds => "out_of_bounds",
            Self::AlreadyRevealed => "already_revealed",
            Self::FlaggedCell => "flagged_cell",
            Self::InvalidFlag => "invalid_flag",
        }
    }

    /// Whether this outcome reports a rejected move. A fault always leaves
    /// the game failed.
    pub const fn is_fault(self) -> bool {
        matches!(
            self,
            Self::InvalidFormat
                | Self::OutOfBounds
                | Self::AlreadyRevealed
                | Self::FlaggedCell
                | Self::InvalidFlag
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action that passed validation; the only form the engine acts on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Reveal(Pos),
    Flag(Pos),
}

impl Action {
    pub const fn target(self) -> Pos {
        match self {
            Self::Reveal(pos) => pos,
            Self::Flag(pos) => pos,
        }
    }

    /// Wire-level request for this action, in the shape agents are asked to
    /// produce.
    pub fn to_request(self) -> Value {
        let (kind, (row, col)) = match self {
            Self::Reveal(pos) => ("reveal", pos),
            Self::Flag(pos) => ("flag", pos),
        };
        serde_json::json!({ "type": kind, "row": row, "col": col })
    }
}

/// Classifies a wire-level request into a well-formed [`Action`] or the
/// rejection the game must answer with.
///
/// Classification runs in two phases. Structure first: the request must be a
/// JSON object with a `reveal`/`flag` kind and coordinates that coerce to
/// integers, anything else is [`Outcome::InvalidFormat`]. Range second:
/// coordinates that fall outside the board, negatives included, are
/// [`Outcome::OutOfBounds`].
pub fn classify_request(request: &Value, rows: Coord, cols: Coord) -> Result<Action, Outcome> {
    let Value::Object(fields) = request else {
        return Err(Outcome::InvalidFormat);
    };

    // both key spellings show up in requests; serialized actions use "type"
    let kind = fields
        .get("type")
        .or_else(|| fields.get("kind"))
        .and_then(Value::as_str);
    let make: fn(Pos) -> Action = match kind {
        Some("reveal") => Action::Reveal,
        Some("flag") => Action::Flag,
        _ => return Err(Outcome::InvalidFormat),
    };

    let (Some(row), Some(col)) = (
        coerce_coord(fields.get("row")),
        coerce_coord(fields.get("col")),
    ) else {
        return Err(Outcome::InvalidFormat);
    };

    if !(0..i64::from(rows)).contains(&row) || !(0..i64::from(cols)).contains(&col) {
        return Err(Outcome::OutOfBounds);
    }

    Ok(make((row as Coord, col as Coord)))
}

/// Integer coercion for wire coordinates: integer numbers as-is, finite
/// floats truncated toward zero, and strings holding an integer (surrounding
/// whitespace allowed). Everything else is malformed.
fn coerce_coord(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Some(integer)
            } else {
                let float = number.as_f64()?;
                float.is_finite().then(|| float as i64)
            }
        }
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
