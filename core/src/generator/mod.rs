use crate::*;

pub use random::*;

mod random;

/// Builds the fixed board for one game from its configuration.
pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}
