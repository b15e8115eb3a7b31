use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{rank, ScoreEntry};
use crate::app_dirs::AppDirs;
use crate::error::Result;

/// Top-N list kept as a JSON array of `{name, score, date}` in a single file
#[derive(Debug, Clone)]
pub struct LocalBoard {
    path: PathBuf,
}

impl LocalBoard {
    pub fn new() -> Self {
        Self {
            path: AppDirs::scores_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored list; a missing file is an empty board.
    pub fn load(&self) -> Result<Vec<ScoreEntry>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(rank(serde_json::from_slice::<Vec<ScoreEntry>>(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the stored list. The new list is written to a temp file in
    /// the same directory and renamed over the old one, so an interrupted
    /// save never leaves a truncated file.
    pub fn save(&self, scores: &[ScoreEntry]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(scores)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// The board as it would look with `entry` added. Nothing is written.
    ///
    /// An unreadable file counts as empty so a corrupt list never blocks a
    /// new score from being kept.
    pub fn ranked_with(&self, entry: ScoreEntry) -> Vec<ScoreEntry> {
        let mut scores = self.load().unwrap_or_else(|e| {
            log::warn!("discarding unreadable scores {}: {e}", self.path.display());
            Vec::new()
        });
        scores.push(entry);
        rank(scores)
    }

    /// Adds `entry` and returns the new top list. Saving is best effort: a
    /// failed write is logged and the list is still returned for display.
    pub fn insert(&self, entry: ScoreEntry) -> Vec<ScoreEntry> {
        let ranked = self.ranked_with(entry);
        if let Err(e) = self.save(&ranked) {
            log::warn!("could not persist local leaderboard: {e}");
        }
        ranked
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl Default for LocalBoard {
    fn default() -> Self {
        Self::new()
    }
}
