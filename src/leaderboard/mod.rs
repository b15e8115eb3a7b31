//! Ranked high scores: the entry type, the top-N policy and the backends.

pub mod local;
pub mod remote;
pub mod store;

pub use local::LocalBoard;
pub use remote::RemoteBoard;
pub use store::{Backend, ScoreStore};

use chrono::{SecondsFormat, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const MAX_HIGH_SCORES: usize = 10;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

pub const LOADING_MESSAGE: &str = "Loading…";
pub const EMPTY_BOARD_MESSAGE: &str = "No scores yet. Play to claim the top!";

/// One ranked result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// ISO-8601 timestamp of when the score was recorded
    pub date: String,
}

impl ScoreEntry {
    /// Builds an entry stamped with the current time.
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            name: normalize_name(name),
            score,
            date: now_iso8601(),
        }
    }
}

pub(crate) fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Trims the name; blank names become [`DEFAULT_PLAYER_NAME`].
pub fn normalize_name(name: &str) -> String {
    match name.trim() {
        "" => DEFAULT_PLAYER_NAME.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Whether `score` earns a place on a board currently holding `top`.
///
/// A zero score never qualifies. Otherwise any score qualifies while the
/// board has free slots, and beyond that it must beat the last place.
pub fn qualifies(score: u32, top: &[ScoreEntry]) -> bool {
    score > 0
        && top
            .get(MAX_HIGH_SCORES - 1)
            .map_or(true, |last| score > last.score)
}

/// Sorts descending by score, keeping arrival order for ties, and keeps the top N.
pub fn rank<I>(entries: I) -> Vec<ScoreEntry>
where
    I: IntoIterator<Item = ScoreEntry>,
{
    entries
        .into_iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .take(MAX_HIGH_SCORES)
        .collect()
}

/// Contract of a hosted leaderboard backend
pub trait Leaderboard: Send + Sync {
    /// Fresh ranked top list, at most [`MAX_HIGH_SCORES`] long.
    fn fetch_top(&self) -> Result<Vec<ScoreEntry>>;

    fn submit(&self, entry: &ScoreEntry) -> Result<()>;
}

/// What the leaderboard panel should currently show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoardView {
    #[default]
    Loading,
    Empty,
    Entries(Vec<ScoreEntry>),
}

impl From<Vec<ScoreEntry>> for BoardView {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        if entries.is_empty() {
            BoardView::Empty
        } else {
            BoardView::Entries(entries)
        }
    }
}

#[cfg(test)]
pub(crate) fn entry(name: &str, score: u32) -> ScoreEntry {
    ScoreEntry {
        name: name.to_string(),
        score,
        date: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board(lowest: u32) -> Vec<ScoreEntry> {
        (0..MAX_HIGH_SCORES as u32)
            .map(|i| entry(&format!("p{i}"), lowest + 9 - i))
            .collect()
    }

    #[test]
    fn zero_never_qualifies() {
        assert!(!qualifies(0, &[]));
        assert!(!qualifies(0, &full_board(0)));
    }

    #[test]
    fn any_positive_score_qualifies_with_free_slots() {
        assert!(qualifies(1, &[]));
        let nine: Vec<_> = full_board(50).into_iter().take(9).collect();
        assert!(qualifies(1, &nine));
    }

    #[test]
    fn full_board_needs_to_beat_last_place() {
        let top = full_board(5);
        assert_eq!(top[9].score, 5);
        assert!(!qualifies(4, &top));
        assert!(!qualifies(5, &top));
        assert!(qualifies(6, &top));
    }

    #[test]
    fn normalize_name_trims_and_defaults() {
        assert_eq!(normalize_name("  ada "), "ada");
        assert_eq!(normalize_name(""), DEFAULT_PLAYER_NAME);
        assert_eq!(normalize_name(" \t "), DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn new_entry_is_stamped() {
        let e = ScoreEntry::new(" ", 3);
        assert_eq!(e.name, DEFAULT_PLAYER_NAME);
        assert_eq!(e.score, 3);
        assert!(chrono::DateTime::parse_from_rfc3339(&e.date).is_ok());
    }

    #[test]
    fn rank_sorts_descending_and_keeps_tie_order() {
        let ranked = rank(vec![
            entry("a", 50),
            entry("b", 30),
            entry("c", 80),
            entry("d", 50),
        ]);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "d", "b"]);
    }

    #[test]
    fn rank_truncates_to_top_ten() {
        let ranked = rank((1..=15).map(|s| entry("x", s)));
        assert_eq!(ranked.len(), MAX_HIGH_SCORES);
        assert_eq!(ranked[0].score, 15);
        assert_eq!(ranked[9].score, 6);
    }

    #[test]
    fn board_view_from_entries() {
        assert_eq!(BoardView::from(vec![]), BoardView::Empty);
        assert_eq!(
            BoardView::from(vec![entry("a", 1)]),
            BoardView::Entries(vec![entry("a", 1)])
        );
    }
}
