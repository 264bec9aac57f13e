use anyhow::{Context, Result, bail};
use bombfinder_core::{
    Adjacency, BestTimes, BoardGenerator, CellCount, Coord, Coord2, GameConfig, Level, PlayEngine,
    RandomBoardGenerator, RevealOutcome, Settings, StartTile, format_elapsed,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

mod text;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Settings file in TOML format
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a freshly generated board
    Generate {
        #[command(flatten)]
        board: BoardArgs,

        /// Print the board as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
    /// Play a game, reading moves from stdin
    Play {
        #[command(flatten)]
        board: BoardArgs,

        /// Guarantee for the first revealed tile
        #[arg(long, value_enum)]
        start_tile: Option<StartTileArg>,
    },
}

#[derive(Args, Debug)]
struct BoardArgs {
    /// Board width and height
    #[arg(short, long)]
    size: Option<Coord>,

    /// Number of bombs, overrides the level
    #[arg(short, long)]
    bombs: Option<CellCount>,

    /// Difficulty used to pick the bomb count
    #[arg(short, long, value_enum)]
    level: Option<LevelArg>,

    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,

    /// Count only orthogonal neighbors
    #[arg(long)]
    four: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LevelArg {
    Easy,
    Intermediate,
    Hard,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Easy => Level::Easy,
            LevelArg::Intermediate => Level::Intermediate,
            LevelArg::Hard => Level::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StartTileArg {
    Random,
    Safe,
    Zero,
}

impl From<StartTileArg> for StartTile {
    fn from(start_tile: StartTileArg) -> Self {
        match start_tile {
            StartTileArg::Random => StartTile::Random,
            StartTileArg::Safe => StartTile::SimpleSafe,
            StartTileArg::Zero => StartTile::AlwaysZero,
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read settings from {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid settings in {}", path.display()))
}

impl BoardArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(level) = self.level {
            settings.level = level.into();
            settings.bombs = None;
        }
        if let Some(size) = self.size {
            // a fixed bomb count follows the size the same way the bomb slider does
            settings.bombs = settings
                .bombs
                .map(|bombs| GameConfig::clamped(settings.size, bombs).with_size(size).bombs());
            settings.size = size;
        }
        if let Some(bombs) = self.bombs {
            settings.bombs = Some(bombs);
        }
        if self.four {
            settings.adjacency = Adjacency::Four;
        }
    }
}

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Move {
    Reveal(Coord2),
    Flag(Coord2),
    New,
    Pause,
    Resume,
    Quit,
}

fn parse_coords<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let (Some(row), Some(column), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected a row and a column");
    };
    let row: Coord = row.parse().with_context(|| format!("bad row {row:?}"))?;
    let column: Coord = column
        .parse()
        .with_context(|| format!("bad column {column:?}"))?;
    Ok((row, column))
}

fn parse_move(line: &str) -> Result<Move> {
    let mut parts = line.split_whitespace();
    Ok(match parts.next() {
        Some("r" | "reveal") => Move::Reveal(parse_coords(parts)?),
        Some("f" | "flag") => Move::Flag(parse_coords(parts)?),
        Some("new") => Move::New,
        Some("pause") => Move::Pause,
        Some("resume") => Move::Resume,
        Some("q" | "quit") => Move::Quit,
        Some(other) => bail!("unknown command {other:?}"),
        None => bail!("empty command"),
    })
}

fn generate(settings: &Settings, seed: Option<u64>, json: bool) -> Result<()> {
    let config = settings.game_config()?;
    let generator = match seed {
        Some(seed) => RandomBoardGenerator::new(seed),
        None => RandomBoardGenerator::from_entropy(),
    };
    log::debug!("seed: {:?}", generator.seed());
    let board = generator
        .with_adjacency(settings.adjacency)
        .generate(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        println!("{}", text::layout(&board));
    }
    Ok(())
}

/// What the play loop shows after a move.
#[derive(Clone, Debug, PartialEq)]
enum Reply {
    Quit,
    /// Clock changes, nothing to redraw.
    Silent,
    Rejected(String),
    /// Redraw the board, after an optional message.
    Board(Option<String>),
}

fn apply_move(engine: &mut PlayEngine, best_times: &mut BestTimes, mv: Move) -> Result<Reply> {
    let outcome = match mv {
        Move::Quit => return Ok(Reply::Quit),
        Move::Pause => {
            engine.pause();
            return Ok(Reply::Silent);
        }
        Move::Resume => {
            engine.resume();
            return Ok(Reply::Silent);
        }
        Move::New => {
            engine.play_again()?;
            return Ok(Reply::Board(None));
        }
        Move::Reveal(coords) => engine
            .board()
            .index_of(coords)
            .and_then(|index| engine.reveal(index)),
        Move::Flag(coords) => engine
            .board()
            .index_of(coords)
            .and_then(|index| engine.cycle_flag(index))
            .map(|_| RevealOutcome::NoChange),
    };

    let message = match outcome {
        Err(err) => return Ok(Reply::Rejected(err.to_string())),
        Ok(RevealOutcome::HitBomb) => {
            let position = engine
                .triggered_bomb()
                .and_then(|index| engine.board().coords_of(index).ok());
            Some(match position {
                Some((row, column)) => format!(
                    "Boom! Hit the bomb at row {row}, column {column}. Type `new` to play again."
                ),
                None => "Boom! Type `new` to play again.".to_owned(),
            })
        }
        Ok(RevealOutcome::Won) => engine.score().map(|score| {
            let new_best = best_times.record(&score);
            format!(
                "Cleared in {}{}",
                format_elapsed(score.time, true),
                if new_best { ", best time!" } else { "" }
            )
        }),
        Ok(_) => None,
    };
    Ok(Reply::Board(message))
}

/// Reads moves line by line until `quit` or the end of input.
fn run_session(engine: &mut PlayEngine, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut best_times = BestTimes::new();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mv = match parse_move(&line) {
            Ok(mv) => mv,
            Err(err) => {
                writeln!(out, "{err:#}")?;
                continue;
            }
        };

        match apply_move(engine, &mut best_times, mv)? {
            Reply::Quit => break,
            Reply::Silent => continue,
            Reply::Rejected(reason) => {
                writeln!(out, "{reason}")?;
                continue;
            }
            Reply::Board(message) => {
                if let Some(message) = message {
                    writeln!(out, "{message}")?;
                }
            }
        }

        writeln!(out, "{}", text::player_view(engine.board()))?;
        writeln!(
            out,
            "bombs left: {}, time: {}",
            engine.bombs_left(),
            format_elapsed(engine.elapsed(), false)
        )?;
        out.flush()?;
    }

    Ok(())
}

fn play(settings: &Settings, seed: Option<u64>) -> Result<()> {
    let config = settings.game_config()?;
    let mut engine = match seed {
        Some(seed) => PlayEngine::with_seed(config, settings.rules(), seed)?,
        None => PlayEngine::new(config, settings.rules())?,
    };

    println!(
        "{0}x{0} board, {1} bombs. Commands: r <row> <col>, f <row> <col>, new, pause, resume, quit",
        config.size(),
        config.bombs()
    );
    println!("{}", text::player_view(engine.board()));

    run_session(&mut engine, io::stdin().lock(), io::stdout().lock())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let mut settings = load_settings(cli.config.as_deref())?;
    log::debug!("settings: {:?}", settings);

    match cli.command {
        Command::Generate { board, json } => {
            board.apply(&mut settings);
            generate(&settings, board.seed, json)
        }
        Command::Play { board, start_tile } => {
            board.apply(&mut settings);
            if let Some(start_tile) = start_tile {
                settings.start_tile = start_tile.into();
            }
            play(&settings, board.seed)
        }
    }
}
