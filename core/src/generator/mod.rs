use crate::*;
pub use random::*;

mod random;

/// Builds a fully mined field for a game.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Minefield>;
}
