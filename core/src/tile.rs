use serde::{Deserialize, Serialize};

/// What a tile holds underneath its cover.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileValue {
    Bomb,
    /// Number of bombs among the neighbors.
    Number(u8),
}

impl TileValue {
    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }

    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Bomb => None,
            Self::Number(count) => Some(count),
        }
    }
}

impl Default for TileValue {
    fn default() -> Self {
        Self::Number(0)
    }
}

/// Player marker on a hidden tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagIcon {
    #[default]
    None,
    Flag,
    Question,
}

impl FlagIcon {
    /// `None -> Flag -> Question -> None`
    pub const fn next(self) -> Self {
        match self {
            Self::None => Self::Flag,
            Self::Flag => Self::Question,
            Self::Question => Self::None,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    value: TileValue,
    shown: bool,
    flag_icon: FlagIcon,
}

impl Tile {
    pub const fn new(value: TileValue) -> Self {
        Self {
            value,
            shown: false,
            flag_icon: FlagIcon::None,
        }
    }

    pub const fn value(&self) -> TileValue {
        self.value
    }

    pub const fn is_bomb(&self) -> bool {
        self.value.is_bomb()
    }

    pub const fn is_shown(&self) -> bool {
        self.shown
    }

    pub const fn flag_icon(&self) -> FlagIcon {
        self.flag_icon
    }

    /// Uncovers the tile, dropping any marker. Returns whether it was hidden before.
    pub(crate) fn show(&mut self) -> bool {
        if self.shown {
            return false;
        }
        self.shown = true;
        self.flag_icon = FlagIcon::None;
        true
    }

    /// Advances the marker of a hidden tile, shown tiles keep `None`.
    pub(crate) fn cycle_flag(&mut self) -> Option<FlagIcon> {
        if self.shown {
            return None;
        }
        self.flag_icon = self.flag_icon.next();
        Some(self.flag_icon)
    }
}
