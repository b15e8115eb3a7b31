use super::{Leaderboard, LocalBoard, RemoteBoard, ScoreEntry};
use crate::config::Config;

/// Which backend an operation talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Backend {
    Remote,
    Local,
}

/// Reads and writes high scores, preferring the hosted table and falling
/// back to the local file. Backend failures are logged and swallowed here.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    local: LocalBoard,
    remote: Option<RemoteBoard>,
}

impl ScoreStore {
    pub fn new(local: LocalBoard, remote: Option<RemoteBoard>) -> Self {
        Self { local, remote }
    }

    /// Local-only store at `cfg`'s score path, plus the remote table when
    /// both its url and key are set.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            LocalBoard::with_path(cfg.scores_path()),
            cfg.remote().map(|remote| RemoteBoard::new(&remote)),
        )
    }

    pub fn local(&self) -> &LocalBoard {
        &self.local
    }

    pub fn backend(&self) -> Backend {
        if self.remote.is_some() {
            Backend::Remote
        } else {
            Backend::Local
        }
    }

    /// Current top list. Never fails: a broken remote falls back to the
    /// local file and a broken local file reads as empty.
    pub fn fetch_top(&self) -> Vec<ScoreEntry> {
        if let Some(remote) = &self.remote {
            match remote.fetch_top() {
                Ok(top) => return top,
                Err(e) => log::warn!("remote leaderboard unavailable, using local: {e}"),
            }
        }
        self.local.load().unwrap_or_else(|e| {
            log::warn!("local leaderboard unreadable: {e}");
            Vec::new()
        })
    }

    /// Records a score and returns the list the board should now show.
    ///
    /// A successful remote submit re-reads the remote ranking. Otherwise the
    /// entry goes into the local list, which is returned as written without
    /// a second read.
    pub fn submit(&self, name: &str, score: u32) -> Vec<ScoreEntry> {
        let entry = ScoreEntry::new(name, score);

        if let Some(remote) = &self.remote {
            match remote.submit(&entry) {
                Ok(()) => {
                    log::info!("submitted {} by {} to remote leaderboard", score, entry.name);
                    return self.fetch_top();
                }
                Err(e) => log::warn!("remote submit failed, keeping score locally: {e}"),
            }
        }

        self.local.insert(entry)
    }
}
