//! Error types for leaderboard backends

/// Failure talking to a leaderboard backend.
///
/// These never reach the player: the score store logs them and falls back to
/// the local list or an empty result.
#[derive(thiserror::Error, Debug)]
pub enum LeaderboardError {
    /// Reading or writing the local score file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local file or request body could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection, DNS, TLS or timeout failure
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Server answered 2xx with a body of the wrong shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ureq::Error> for LeaderboardError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => LeaderboardError::Status(code),
            ureq::Error::Transport(t) => LeaderboardError::Http(t.to_string()),
        }
    }
}

/// Result type for leaderboard backend operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;
