use serde::{Deserialize, Serialize};

use crate::*;

/// Difficulty presets, expressed as bomb density so they apply to any board size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Easy,
    Intermediate,
    Hard,
}

impl Level {
    /// Density as `(bombs, tiles)` of the classic 9x9, 16x16 and 30x16 boards.
    pub const fn bomb_ratio(self) -> (CellCount, CellCount) {
        match self {
            Self::Easy => (10, 81),
            Self::Intermediate => (40, 256),
            Self::Hard => (99, 480),
        }
    }

    /// Bomb count for a `size × size` board, rounded, at least one and never above
    /// [`GameConfig::max_bombs`].
    pub fn bombs_for(self, size: Coord) -> CellCount {
        let (bombs, tiles) = self.bomb_ratio();
        let total = u64::from(mult(size, size));
        let rounded = (total * u64::from(bombs) + u64::from(tiles) / 2) / u64::from(tiles);
        // never more than total, which is a CellCount
        let rounded = rounded as CellCount;
        rounded.max(1).min(GameConfig::max_bombs(size))
    }
}

/// Player preferences that pick the next game. Passed around explicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: Level,
    pub size: Coord,
    /// Overrides the level's bomb count.
    pub bombs: Option<CellCount>,
    pub adjacency: Adjacency,
    pub start_tile: StartTile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Easy,
            size: 9,
            bombs: None,
            adjacency: Adjacency::Eight,
            start_tile: StartTile::SimpleSafe,
        }
    }
}

impl Settings {
    pub fn bombs(&self) -> CellCount {
        self.bombs
            .unwrap_or_else(|| self.level.bombs_for(self.size))
    }

    pub fn game_config(&self) -> Result<GameConfig> {
        GameConfig::new(self.size, self.bombs())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            adjacency: self.adjacency,
            start_tile: self.start_tile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_match_classic_densities() {
        assert_eq!(Level::Easy.bombs_for(9), 10);
        assert_eq!(Level::Intermediate.bombs_for(16), 40);
        assert_eq!(Level::Hard.bombs_for(20), 83);
    }

    #[test]
    fn level_bombs_stay_in_slider_range() {
        assert_eq!(Level::Easy.bombs_for(2), 1);
        assert_eq!(Level::Hard.bombs_for(1), 0);
        for size in 2..64 {
            for level in [Level::Easy, Level::Intermediate, Level::Hard] {
                let bombs = level.bombs_for(size);
                assert!(bombs >= 1 && bombs <= GameConfig::max_bombs(size));
            }
        }
    }

    #[test]
    fn explicit_bombs_override_level() {
        let settings = Settings {
            bombs: Some(3),
            size: 4,
            ..Default::default()
        };

        assert_eq!(settings.game_config().unwrap(), GameConfig::new(4, 3).unwrap());
    }

    #[test]
    fn default_settings_give_a_beginner_board() {
        let settings = Settings::default();

        assert_eq!(settings.game_config().unwrap(), GameConfig::beginner());
        assert_eq!(settings.rules(), Rules::default());
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"size": 16, "level": "intermediate", "adjacency": "four"}"#)
                .unwrap();

        assert_eq!(settings.game_config().unwrap(), GameConfig::intermediate());
        assert_eq!(settings.adjacency, Adjacency::Four);
        assert_eq!(settings.start_tile, StartTile::SimpleSafe);
    }

    #[test]
    fn impossible_settings_are_rejected() {
        let settings = Settings {
            size: 0,
            ..Default::default()
        };

        assert_eq!(settings.game_config(), Err(GameError::InvalidSize));
    }
}
