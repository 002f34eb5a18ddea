use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Generation strategy that plants every mine on a uniformly chosen free cell, driven by a seeded RNG so that a seed
/// always reproduces the same field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Uses the seed from `config`, or a fresh random one if it has none.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.seed.unwrap_or_else(rand::random))
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Minefield> {
        config.validate()?;

        log::debug!(
            "Generating {:?} minefield with {} mines, seed: {}",
            config.size,
            config.mines,
            self.seed
        );
        let mut field = Minefield::new(config.size)?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        field.plant_mines_randomly(config.mines, &mut rng)?;

        Ok(field)
    }
}
