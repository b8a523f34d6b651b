//! Evaluation harness around [`minegym_core`]: seeded episodes, baseline and
//! scripted agents, move transcripts, and the prompt surface for wiring an
//! external decision-maker into the loop.

pub use agent::*;
pub use episode::*;
pub use prompt::*;

mod agent;
mod episode;
mod prompt;
