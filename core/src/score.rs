use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::*;

const LEADERBOARD_PREFIX: &str = "com.ericjlabs.bomb_finder";

/// Key shared by all scores for one board setup.
pub fn leaderboard_id(size: Coord, bombs: CellCount) -> String {
    format!("{LEADERBOARD_PREFIX}_{size}_{bombs}")
}

/// Finishing time of a won game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub size: Coord,
    pub bombs: CellCount,
    pub time: Duration,
}

impl Score {
    pub fn new(size: Coord, bombs: CellCount, time: Duration) -> Self {
        Self { size, bombs, time }
    }

    pub fn from_hundredths(size: Coord, bombs: CellCount, hundredths: u64) -> Self {
        Self::new(size, bombs, Duration::from_millis(hundredths.saturating_mul(10)))
    }

    pub fn leaderboard_id(&self) -> String {
        leaderboard_id(self.size, self.bombs)
    }

    /// Time as an integer count of hundredths of a second, truncated.
    pub fn hundredths(&self) -> u64 {
        u64::try_from(self.time.as_millis() / 10).unwrap_or(u64::MAX)
    }
}

/// Best finishing time per board setup, kept in hundredths like a leaderboard entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BestTimes {
    times: HashMap<String, u64>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self, size: Coord, bombs: CellCount) -> Option<Duration> {
        let hundredths = *self.times.get(&leaderboard_id(size, bombs))?;
        Some(Score::from_hundredths(size, bombs, hundredths).time)
    }

    /// Keeps the faster time. Returns true when `score` matches or beats the previous best, to
    /// the hundredth.
    pub fn record(&mut self, score: &Score) -> bool {
        let hundredths = score.hundredths();
        match self.times.entry(score.leaderboard_id()) {
            Entry::Vacant(entry) => {
                entry.insert(hundredths);
                true
            }
            Entry::Occupied(mut entry) if hundredths <= *entry.get() => {
                entry.insert(hundredths);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Formats a clock reading as `s`, `m:ss` or `h:mm:ss`, optionally with two-digit hundredths.
pub fn format_elapsed(elapsed: Duration, show_hundredths: bool) -> String {
    let total_secs = elapsed.as_secs();
    let (hours, minutes, secs) = (total_secs / 3600, total_secs / 60 % 60, total_secs % 60);

    let mut text = if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else if minutes > 0 {
        format!("{minutes}:{secs:02}")
    } else {
        format!("{secs}")
    };

    if show_hundredths {
        let hundredths = elapsed.subsec_millis() / 10;
        text.push_str(&format!(".{hundredths:02}"));
    }
    text
}
