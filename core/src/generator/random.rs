use super::*;

/// Generation strategy that can optionally keep the starting tile safe or zero, but other than that
/// places bombs by a uniform shuffle.
///
/// Seeded generators replay the same layout. Unseeded ones shuffle straight from the thread-local
/// entropy source, so every layout stays reachable.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: Option<u64>,
    adjacency: Adjacency,
    start: Option<(usize, StartTile)>,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            adjacency: Adjacency::default(),
            start: None,
        }
    }

    /// Generator drawing from the thread-local entropy source, a different layout every time.
    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            ..Self::new(0)
        }
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Constrains the tile at `start`, see [`StartTile`].
    pub fn with_start(mut self, start: usize, start_tile: StartTile) -> Self {
        self.start = Some((start, start_tile));
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Indexes that must stay bomb free, after falling back to what the board can fit.
    fn reserved_indexes(&self, config: GameConfig) -> Result<AdjacentIndexes> {
        use StartTile::*;

        let mut reserved = AdjacentIndexes::new();
        let Some((start, start_tile)) = self.start else {
            return Ok(reserved);
        };
        if start >= config.total_tiles() as usize {
            return Err(GameError::InvalidIndex);
        }

        let neighbors = self
            .adjacency
            .find_adjacent_indexes(start, config.size(), config.size());
        let zero_area = neighbors.len() as CellCount + 1;

        let actual_start_tile = match start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if config.bombs() + 1 > config.total_tiles() => {
                log::warn!("Cannot make start tile safe, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.bombs() + zero_area > config.total_tiles() => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        match actual_start_tile {
            Random => {}
            SimpleSafe => reserved.push(start),
            AlwaysZero => {
                reserved.push(start);
                reserved.extend(neighbors);
            }
        }
        Ok(reserved)
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use rand::prelude::*;

        let total_tiles = config.total_tiles();
        if config.size() == 0 {
            return Err(GameError::InvalidSize);
        }
        if config.bombs() > total_tiles {
            return Err(GameError::TooManyBombs);
        }

        let reserved = self.reserved_indexes(config)?;
        let free_tiles = total_tiles as usize - reserved.len();
        let bombs = config.bombs() as usize;

        // bombs first then placeholders, shuffled into place
        let mut placement: Vec<bool> = (0..free_tiles).map(|i| i < bombs).collect();
        match self.seed {
            Some(seed) => placement.shuffle(&mut SmallRng::seed_from_u64(seed)),
            None => placement.shuffle(&mut rand::rng()),
        }

        let mut placement = placement.into_iter();
        let bomb_mask: Vec<bool> = (0..total_tiles as usize)
            .map(|index| !reserved.contains(&index) && placement.next().unwrap_or(false))
            .collect();

        let board = Board::from_bomb_mask(config.size(), bomb_mask, self.adjacency)?;

        // double check bomb count
        if board.number_of_bombs() != config.bombs() {
            log::warn!(
                "Generated board bomb count mismatch, actual: {}, requested: {}",
                board.number_of_bombs(),
                config.bombs()
            );
        }
        log::debug!(
            "Generated {0}x{0} board with {1} bombs from seed {2:?}",
            config.size(),
            config.bombs(),
            self.seed
        );
        Ok(board)
    }
}
