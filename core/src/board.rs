use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// Square grid of tiles with a fixed bomb layout.
///
/// Tiles are addressed by flat row-major index. Only the `shown` flag and the flag icon of a tile
/// ever change after construction, and only through the methods here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardFields")]
pub struct Board {
    tiles: Array2<Tile>,
    number_of_bombs: CellCount,
    adjacency: Adjacency,
}

#[derive(Deserialize)]
struct BoardFields {
    tiles: Array2<Tile>,
    number_of_bombs: CellCount,
    adjacency: Adjacency,
}

impl TryFrom<BoardFields> for Board {
    type Error = GameError;

    /// Rebuilds the numbers from the stored bomb layout and keeps the stored tile state only if
    /// everything agrees.
    fn try_from(fields: BoardFields) -> Result<Self> {
        let (height, width) = fields.tiles.dim();
        if height != width {
            return Err(GameError::InvalidBoardShape);
        }
        let size = Coord::try_from(width).map_err(|_| GameError::InvalidBoardShape)?;
        if size == 0 {
            return Err(GameError::InvalidSize);
        }

        let bomb_mask = fields.tiles.iter().map(|tile| tile.is_bomb()).collect();
        let mut board = Self::from_bomb_mask(size, bomb_mask, fields.adjacency)?;
        if board.number_of_bombs != fields.number_of_bombs {
            return Err(GameError::InconsistentBoard);
        }

        for (rebuilt, stored) in board.tiles.iter_mut().zip(fields.tiles.iter()) {
            if rebuilt.value() != stored.value() {
                return Err(GameError::InconsistentBoard);
            }
            // showing a tile always clears its marker
            if stored.is_shown() && !stored.flag_icon().is_none() {
                return Err(GameError::InconsistentBoard);
            }
            *rebuilt = *stored;
        }
        Ok(board)
    }
}

impl Board {
    /// Random `size × size` board with exactly `number_of_bombs` bombs.
    pub fn create(size: Coord, number_of_bombs: CellCount) -> Result<Self> {
        let config = GameConfig::new(size, number_of_bombs)?;
        RandomBoardGenerator::from_entropy().generate(config)
    }

    /// Board with bombs at the given indexes, numbers computed with `adjacency`.
    pub fn from_bomb_indexes(size: Coord, bombs: &[usize], adjacency: Adjacency) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }
        let total_tiles = mult(size, size) as usize;
        let mut bomb_mask = vec![false; total_tiles];
        for &index in bombs {
            *bomb_mask.get_mut(index).ok_or(GameError::InvalidIndex)? = true;
        }
        Self::from_bomb_mask(size, bomb_mask, adjacency)
    }

    /// Numbers every non-bomb tile of a row-major bomb mask.
    pub(crate) fn from_bomb_mask(
        size: Coord,
        bomb_mask: Vec<bool>,
        adjacency: Adjacency,
    ) -> Result<Self> {
        let bounds = (size, size);
        let bomb_mask = Array2::from_shape_vec(bounds.to_nd_index(), bomb_mask)
            .map_err(|_| GameError::InvalidBoardShape)?;

        let tiles = Array2::from_shape_fn(bounds.to_nd_index(), |(row, column)| {
            if bomb_mask[(row, column)] {
                return Tile::new(TileValue::Bomb);
            }
            // row and column are below size, so they fit in Coord
            let count = adjacency
                .iter_neighbors((row as Coord, column as Coord), bounds)
                .filter(|&pos| bomb_mask[pos.to_nd_index()])
                .count();
            Tile::new(TileValue::Number(count as u8))
        });

        let number_of_bombs = tiles
            .iter()
            .filter(|tile| tile.is_bomb())
            .count()
            .try_into()
            .map_err(|_| GameError::TooManyBombs)?;

        Ok(Self {
            tiles,
            number_of_bombs,
            adjacency,
        })
    }

    pub fn width(&self) -> Coord {
        // shape comes from a Coord2, it always fits back
        self.tiles.ncols() as Coord
    }

    pub fn height(&self) -> Coord {
        self.tiles.nrows() as Coord
    }

    pub fn number_of_bombs(&self) -> CellCount {
        self.number_of_bombs
    }

    pub fn adjacency(&self) -> Adjacency {
        self.adjacency
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::clamped(self.width(), self.number_of_bombs)
    }

    pub fn total_tiles(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        self.tiles.as_slice().expect("layout should be standard")
    }

    pub fn tile(&self, index: usize) -> Result<&Tile> {
        self.tiles().get(index).ok_or(GameError::InvalidIndex)
    }

    pub fn index_of(&self, (row, column): Coord2) -> Result<usize> {
        if row < self.height() && column < self.width() {
            Ok(usize::from(row) * usize::from(self.width()) + usize::from(column))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn coords_of(&self, index: usize) -> Result<Coord2> {
        if index >= self.tiles.len() {
            return Err(GameError::InvalidIndex);
        }
        let width = usize::from(self.width());
        Ok(((index / width) as Coord, (index % width) as Coord))
    }

    pub fn adjacent_indexes(&self, index: usize) -> AdjacentIndexes {
        self.adjacency
            .find_adjacent_indexes(index, self.width(), self.height())
    }

    /// Bombs around `index`, counted from the layout rather than the stored number.
    pub fn adjacent_bomb_count(&self, index: usize) -> Result<u8> {
        self.tile(index)?;
        let tiles = self.tiles();
        Ok(self
            .adjacent_indexes(index)
            .into_iter()
            .filter(|&adjacent| tiles[adjacent].is_bomb())
            .count() as u8)
    }

    pub fn bomb_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles()
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_bomb())
            .map(|(index, _)| index)
    }

    pub fn shown_count(&self) -> CellCount {
        self.tiles.iter().filter(|tile| tile.is_shown()).count() as CellCount
    }

    pub fn flag_count(&self) -> CellCount {
        self.tiles
            .iter()
            .filter(|tile| tile.flag_icon() == FlagIcon::Flag)
            .count() as CellCount
    }

    /// Whether every non-bomb tile has been shown.
    pub fn is_cleared(&self) -> bool {
        self.tiles
            .iter()
            .all(|tile| tile.is_bomb() || tile.is_shown())
    }

    /// Shows a single tile. Returns whether it was hidden.
    pub fn reveal(&mut self, index: usize) -> Result<bool> {
        Ok(self.tile_mut(index)?.show())
    }

    pub fn reveal_all(&mut self) {
        for tile in self.tiles.iter_mut() {
            tile.show();
        }
    }

    /// Shows a number tile and, when it is a zero, flood-fills through connected zeros.
    ///
    /// Bombs are never shown this way, and the fill stops at the first non-zero number on each
    /// path. Returns how many tiles were newly shown.
    pub fn reveal_empty_spaces(&mut self, index: usize) -> Result<CellCount> {
        let start = self.tile(index)?;
        if start.is_shown() || start.is_bomb() {
            return Ok(0);
        }

        let mut shown_count = 0;
        let mut visited = HashSet::new();
        visited.insert(index);
        let mut to_visit = VecDeque::from([index]);

        while let Some(visit_index) = to_visit.pop_front() {
            let tile = self.tile_mut(visit_index)?;
            let TileValue::Number(count) = tile.value() else {
                continue;
            };
            if tile.show() {
                shown_count += 1;
                log::trace!("Flood showed tile {}, bomb count: {}", visit_index, count);
            }
            if count != 0 {
                continue;
            }

            for adjacent in self.adjacent_indexes(visit_index) {
                if !self.tiles()[adjacent].is_shown() && visited.insert(adjacent) {
                    to_visit.push_back(adjacent);
                }
            }
        }

        Ok(shown_count)
    }

    /// Cycles the flag icon of a hidden tile.
    pub fn cycle_flag(&mut self, index: usize) -> Result<MarkOutcome> {
        Ok(match self.tile_mut(index)?.cycle_flag() {
            Some(icon) => MarkOutcome::Changed(icon),
            None => MarkOutcome::NoChange,
        })
    }

    fn tile_mut(&mut self, index: usize) -> Result<&mut Tile> {
        let coords = self.coords_of(index)?;
        Ok(&mut self.tiles[coords.to_nd_index()])
    }
}
