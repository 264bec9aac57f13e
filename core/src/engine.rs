use rand::RngExt;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Rule switches that stay fixed for every board an engine generates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub adjacency: Adjacency,
    pub start_tile: StartTile,
}

/// Runs games on freshly generated boards, from the first reveal to a win or a loss.
#[derive(Clone, Debug)]
pub struct PlayEngine {
    config: GameConfig,
    rules: Rules,
    board: Board,
    state: EngineState,
    triggered_bomb: Option<usize>,
    stopwatch: Stopwatch,
    /// Seed stream for reproducible engines, boards come from entropy without one.
    rng: Option<SmallRng>,
}

impl PlayEngine {
    /// Engine whose boards are all drawn from the thread-local entropy source.
    pub fn new(config: GameConfig, rules: Rules) -> Result<Self> {
        let board = generate_board(None, config, rules, None)?;
        Ok(Self::from_parts(config, rules, board, None))
    }

    /// Engine whose boards are all derived from `seed`.
    pub fn with_seed(config: GameConfig, rules: Rules, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = generate_board(Some(&mut rng), config, rules, None)?;
        Ok(Self::from_parts(config, rules, board, Some(rng)))
    }

    /// Engine starting on a prepared board. Later games use random boards of the same shape.
    pub fn with_board(board: Board, rules: Rules, seed: u64) -> Self {
        let config = board.game_config();
        let rules = Rules {
            adjacency: board.adjacency(),
            ..rules
        };
        Self::from_parts(config, rules, board, Some(SmallRng::seed_from_u64(seed)))
    }

    fn from_parts(config: GameConfig, rules: Rules, board: Board, rng: Option<SmallRng>) -> Self {
        Self {
            config,
            rules,
            board,
            state: EngineState::default(),
            triggered_bomb: None,
            stopwatch: Stopwatch::new(),
            rng,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn triggered_bomb(&self) -> Option<usize> {
        self.triggered_bomb
    }

    /// Bombs not yet flagged, negative when the player over-flags.
    pub fn bombs_left(&self) -> i64 {
        i64::from(self.board.number_of_bombs()) - i64::from(self.board.flag_count())
    }

    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// Finishing time, once the game is won.
    pub fn score(&self) -> Option<Score> {
        matches!(self.state, EngineState::Won).then(|| {
            Score::new(
                self.config.size(),
                self.config.bombs(),
                self.stopwatch.elapsed(),
            )
        })
    }

    /// Stops the clock while the player is away.
    pub fn pause(&mut self) {
        self.stopwatch.pause();
    }

    pub fn resume(&mut self) {
        self.stopwatch.resume();
    }

    pub fn reveal(&mut self, index: usize) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        self.check_not_finished()?;
        let tile = *self.board.tile(index)?;
        if tile.is_shown() || !tile.flag_icon().is_none() {
            return Ok(NoChange);
        }

        if self.state.is_ready() && !self.start_tile_satisfied(&tile) {
            log::debug!(
                "First reveal at {} does not satisfy {:?}, regenerating",
                index,
                self.rules.start_tile
            );
            self.board = generate_board(self.rng.as_mut(), self.config, self.rules, Some(index))?;
        }

        match self.board.tile(index)?.value() {
            TileValue::Bomb => {
                self.triggered_bomb = Some(index);
                self.end_game(false);
                Ok(HitBomb)
            }
            TileValue::Number(count) => {
                let shown = self.board.reveal_empty_spaces(index)?;
                log::debug!("Revealed tile {}, bomb count: {}, shown: {}", index, count, shown);
                self.mark_started();

                if self.board.is_cleared() {
                    self.end_game(true);
                    Ok(Won)
                } else {
                    Ok(Revealed)
                }
            }
        }
    }

    pub fn cycle_flag(&mut self, index: usize) -> Result<MarkOutcome> {
        self.check_not_finished()?;
        self.board.cycle_flag(index)
    }

    /// Deals a new board with the same configuration and resets the clock.
    pub fn play_again(&mut self) -> Result<()> {
        self.board = generate_board(self.rng.as_mut(), self.config, self.rules, None)?;
        self.state = EngineState::Ready;
        self.triggered_bomb = None;
        self.stopwatch.reset();
        log::debug!("New game with {:?}", self.config);
        Ok(())
    }

    fn start_tile_satisfied(&self, tile: &Tile) -> bool {
        match self.rules.start_tile {
            StartTile::Random => true,
            StartTile::SimpleSafe => !tile.is_bomb(),
            StartTile::AlwaysZero => tile.value() == TileValue::Number(0),
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            self.state = EngineState::Active;
            self.stopwatch.start();
            log::debug!("Game started");
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        self.stopwatch.stop();
        self.board.reveal_all();
        log::debug!(
            "Game ended, won: {}, elapsed: {:?}",
            won,
            self.stopwatch.elapsed()
        );
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

fn generate_board(
    rng: Option<&mut SmallRng>,
    config: GameConfig,
    rules: Rules,
    start: Option<usize>,
) -> Result<Board> {
    let generator = match rng {
        Some(rng) => RandomBoardGenerator::new(rng.random()),
        None => RandomBoardGenerator::from_entropy(),
    };
    let mut generator = generator.with_adjacency(rules.adjacency);
    if let Some(start) = start {
        generator = generator.with_start(start, rules.start_tile);
    }
    generator.generate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord, bombs: &[usize]) -> PlayEngine {
        let board = Board::from_bomb_indexes(size, bombs, Adjacency::Eight).unwrap();
        PlayEngine::with_board(board, Rules::default(), 0)
    }

    #[test]
    fn reveal_flood_fills_and_wins() {
        let mut engine = engine(3, &[8]);

        assert_eq!(engine.reveal(0).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.state(), EngineState::Won);
        assert!(engine.board().tiles().iter().all(Tile::is_shown));
        assert!(engine.score().is_some());
    }

    #[test]
    fn reveal_number_keeps_game_active() {
        let mut engine = engine(3, &[0, 8]);

        assert_eq!(engine.reveal(4).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.state(), EngineState::Active);
        assert_eq!(engine.board().shown_count(), 1);
        assert_eq!(engine.score(), None);
    }

    #[test]
    fn hitting_a_bomb_loses_and_reveals_the_board() {
        let mut engine = engine(3, &[0, 8]);

        engine.reveal(4).unwrap();
        assert_eq!(engine.reveal(8).unwrap(), RevealOutcome::HitBomb);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.triggered_bomb(), Some(8));
        assert_eq!(engine.board().shown_count(), 9);
        assert_eq!(engine.reveal(1), Err(GameError::AlreadyEnded));
        assert_eq!(engine.cycle_flag(1), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn first_reveal_on_a_bomb_regenerates_the_board() {
        let mut engine = engine(3, &[0, 1, 2]);

        let outcome = engine.reveal(0).unwrap();

        assert_ne!(outcome, RevealOutcome::HitBomb);
        assert!(!engine.board().tile(0).unwrap().is_bomb());
        assert!(engine.board().tile(0).unwrap().is_shown());
        assert_eq!(engine.board().number_of_bombs(), 3);
    }

    #[test]
    fn random_start_can_lose_on_first_reveal() {
        let board = Board::from_bomb_indexes(2, &[0], Adjacency::Eight).unwrap();
        let rules = Rules {
            start_tile: StartTile::Random,
            ..Default::default()
        };
        let mut engine = PlayEngine::with_board(board, rules, 0);

        assert_eq!(engine.reveal(0).unwrap(), RevealOutcome::HitBomb);
        assert_eq!(engine.state(), EngineState::Lost);
    }

    #[test]
    fn always_zero_start_opens_an_area() {
        let config = GameConfig::new(6, 8).unwrap();
        let rules = Rules {
            start_tile: StartTile::AlwaysZero,
            ..Default::default()
        };

        for seed in 0..16 {
            let mut engine = PlayEngine::with_seed(config, rules, seed).unwrap();
            engine.reveal(14).unwrap();

            assert_eq!(
                engine.board().tile(14).unwrap().value(),
                TileValue::Number(0)
            );
            assert!(engine.board().shown_count() >= 9);
        }
    }

    #[test]
    fn flagged_tiles_ignore_reveals() {
        let mut engine = engine(3, &[0, 8]);

        assert_eq!(
            engine.cycle_flag(4).unwrap(),
            MarkOutcome::Changed(FlagIcon::Flag)
        );
        assert_eq!(engine.reveal(4).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.state(), EngineState::Ready);

        engine.cycle_flag(4).unwrap();
        assert_eq!(engine.reveal(4).unwrap(), RevealOutcome::NoChange);

        engine.cycle_flag(4).unwrap();
        assert_eq!(engine.reveal(4).unwrap(), RevealOutcome::Revealed);
    }

    #[test]
    fn flags_count_against_bombs_left() {
        let mut engine = engine(3, &[0]);

        engine.cycle_flag(0).unwrap();
        engine.cycle_flag(5).unwrap();

        assert_eq!(engine.bombs_left(), -1);
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn revealing_a_shown_tile_changes_nothing() {
        let mut engine = engine(3, &[0, 8]);

        engine.reveal(4).unwrap();
        assert_eq!(engine.reveal(4).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.reveal(9), Err(GameError::InvalidIndex));
    }

    #[test]
    fn clock_stops_when_the_game_ends() {
        let mut engine = engine(2, &[0]);

        engine.reveal(1).unwrap();
        engine.reveal(2).unwrap();
        assert_eq!(engine.reveal(3).unwrap(), RevealOutcome::Won);

        let elapsed = engine.elapsed();
        assert_eq!(engine.elapsed(), elapsed);
        assert_eq!(engine.score().unwrap().time, elapsed);
        assert_eq!(engine.score().unwrap().leaderboard_id(), "com.ericjlabs.bomb_finder_2_1");
    }

    #[test]
    fn play_again_deals_a_fresh_board() {
        let config = GameConfig::new(8, 10).unwrap();
        let mut engine = PlayEngine::with_seed(config, Rules::default(), 9).unwrap();
        let first = engine.board().clone();

        engine.reveal(0).unwrap();
        engine.play_again().unwrap();

        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.board().shown_count(), 0);
        assert_eq!(engine.board().number_of_bombs(), 10);
        assert_ne!(engine.board(), &first);
        assert_eq!(engine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn unseeded_engine_keeps_the_first_reveal_safe() {
        let config = GameConfig::new(4, 15).unwrap();

        for _ in 0..16 {
            let mut engine = PlayEngine::new(config, Rules::default()).unwrap();
            assert_eq!(engine.reveal(5).unwrap(), RevealOutcome::Won);
            assert_eq!(engine.board().number_of_bombs(), 15);

            engine.play_again().unwrap();
            assert_eq!(engine.board().number_of_bombs(), 15);
        }
    }

    #[test]
    fn same_seed_plays_the_same_game() {
        let config = GameConfig::new(9, 10).unwrap();
        let mut a = PlayEngine::with_seed(config, Rules::default(), 77).unwrap();
        let mut b = PlayEngine::with_seed(config, Rules::default(), 77).unwrap();

        assert_eq!(a.reveal(40).unwrap(), b.reveal(40).unwrap());
        assert_eq!(a.board(), b.board());
    }
}
