//! Board model and rules for Bomb Finder, a minesweeper-style puzzle.
//!
//! Boards are square grids of [`Tile`]s stored in row-major order, so a tile's flat index is
//! `row * width + column`. [`Board::create`] generates a fresh random board, and [`PlayEngine`]
//! runs a game on top of it.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use score::*;
pub use settings::*;
pub use stopwatch::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod score;
mod settings;
mod stopwatch;
mod tile;
mod types;

/// Dimensions and bomb count of a square board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameConfigFields")]
pub struct GameConfig {
    size: Coord,
    bombs: CellCount,
}

#[derive(Deserialize)]
struct GameConfigFields {
    size: Coord,
    bombs: CellCount,
}

impl TryFrom<GameConfigFields> for GameConfig {
    type Error = GameError;

    fn try_from(fields: GameConfigFields) -> Result<Self> {
        Self::new(fields.size, fields.bombs)
    }
}

impl GameConfig {
    /// Requires `size >= 1` and `bombs <= size * size`.
    pub fn new(size: Coord, bombs: CellCount) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }
        if bombs > mult(size, size) {
            return Err(GameError::TooManyBombs);
        }
        Ok(Self { size, bombs })
    }

    /// Like [`GameConfig::new`] but pulls out-of-range values back into range.
    pub fn clamped(size: Coord, bombs: CellCount) -> Self {
        let size = size.max(1);
        let bombs = bombs.min(mult(size, size));
        Self { size, bombs }
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn bombs(&self) -> CellCount {
        self.bombs
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size, self.size)
    }

    /// Upper bound offered to players picking a bomb count: half the board.
    pub const fn max_bombs(size: Coord) -> CellCount {
        mult(size, size) / 2
    }

    /// Resizes the board. A bomb count that no longer fits under [`GameConfig::max_bombs`] is
    /// reset to `size`.
    pub fn with_size(self, size: Coord) -> Self {
        let size = size.max(1);
        let max_bombs = Self::max_bombs(size);
        let bombs = if self.bombs >= max_bombs {
            CellCount::from(size)
        } else {
            self.bombs
        };
        Self {
            size,
            bombs: bombs.min(max_bombs),
        }
    }

    pub const fn beginner() -> Self {
        Self { size: 9, bombs: 10 }
    }

    pub const fn intermediate() -> Self {
        Self {
            size: 16,
            bombs: 40,
        }
    }
}

/// Outcome of changing a tile marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed(FlagIcon),
}

/// Outcome of revealing a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitBomb,
    Won,
}
