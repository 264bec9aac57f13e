use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}

/// Guarantee given for the first tile a player reveals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartTile {
    /// No guarantee, the first reveal may hit a bomb.
    Random,
    /// The first revealed tile is never a bomb.
    #[default]
    SimpleSafe,
    /// The first revealed tile and all of its neighbors are bomb free.
    AlwaysZero,
}
