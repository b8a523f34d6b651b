use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Places mines uniformly at random, without replacement, from a fixed seed.
/// The same seed and configuration always produce the same layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformGenerator {
    seed: u64,
}

impl UniformGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Draws a fresh seed from thread entropy. Read it back with
    /// [`UniformGenerator::seed`] to make the layout reproducible.
    pub fn from_entropy() -> Self {
        Self {
            seed: rand::random(),
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for UniformGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        config.validate()?;

        let cols = usize::from(config.cols);
        let mut mask: Array2<bool> = Array2::default([usize::from(config.rows), cols]);

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let picks = rand::seq::index::sample(
            &mut rng,
            usize::from(config.total_cells()),
            usize::from(config.mines),
        );
        for index in picks {
            // cells are numbered row-major, left to right, top to bottom
            mask[[index / cols, index % cols]] = true;
        }

        log::debug!(
            "generated {}x{} board with {} mines from seed {}",
            config.rows,
            config.cols,
            config.mines,
            self.seed
        );
        Ok(Board::from_mine_mask(config.rows, config.cols, &mask))
    }
}
