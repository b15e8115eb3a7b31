//! Background leaderboard requests.
//!
//! Backend I/O may be slow, so every request runs on its own thread and
//! reports back into the event loop as a [`GameEvent::Scores`]. There is no
//! retry and no cancellation: a request finishes or falls back on its own.
//! Before exiting, the binary waits on [`ScoreWorker::wait_idle`] so a
//! submit in flight still reaches the store.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::leaderboard::{qualifies, ScoreEntry, ScoreStore};
use crate::runtime::GameEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreRequest {
    /// Re-read the ranking for display
    Refresh,
    /// A timed game ended with `score`; decide whether it makes the board
    CheckHighScore { score: u32, generation: u64 },
    Submit { name: String, score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    /// Ranking to show
    Board(Vec<ScoreEntry>),
    /// The score from game `generation` earned a place and needs a name
    Qualified { score: u32, generation: u64 },
}

/// Where the game controller sends leaderboard work
pub trait ScoreDispatch {
    fn dispatch(&self, request: ScoreRequest);
}

/// Runs requests against a [`ScoreStore`] on background threads.
/// Clones share the same store and the same set of running requests.
#[derive(Clone)]
pub struct ScoreWorker {
    store: Arc<ScoreStore>,
    tx: Sender<GameEvent>,
    running: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ScoreWorker {
    pub fn new(store: Arc<ScoreStore>, tx: Sender<GameEvent>) -> Self {
        Self {
            store,
            tx,
            running: Arc::default(),
        }
    }

    /// Waits up to `timeout` for every dispatched request to finish.
    /// Returns false if some were still running when time ran out.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let finished = {
                let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
                let (finished, pending): (Vec<_>, Vec<_>) =
                    running.drain(..).partition(|h| h.is_finished());
                *running = pending;
                if running.is_empty() && finished.is_empty() {
                    return true;
                }
                finished
            };
            for handle in finished {
                if handle.join().is_err() {
                    log::error!("leaderboard request panicked");
                }
            }
            if Instant::now() >= deadline {
                let left = self.running.lock().unwrap_or_else(PoisonError::into_inner).len();
                if left > 0 {
                    log::warn!("{left} leaderboard request(s) still running at exit");
                    return false;
                }
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Performs `request` synchronously.
    pub fn resolve(store: &ScoreStore, request: ScoreRequest) -> ScoreEvent {
        match request {
            ScoreRequest::Refresh => ScoreEvent::Board(store.fetch_top()),
            ScoreRequest::CheckHighScore { score, generation } => {
                let top = store.fetch_top();
                if qualifies(score, &top) {
                    ScoreEvent::Qualified { score, generation }
                } else {
                    ScoreEvent::Board(top)
                }
            }
            ScoreRequest::Submit { name, score } => ScoreEvent::Board(store.submit(&name, score)),
        }
    }
}

impl ScoreDispatch for ScoreWorker {
    fn dispatch(&self, request: ScoreRequest) {
        log::debug!("leaderboard request {request:?} via {} backend", self.store.backend());
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let handle = thread::spawn(move || {
            let event = ScoreWorker::resolve(&store, request);
            if tx.send(GameEvent::Scores(event)).is_err() {
                log::debug!("event loop gone, dropping leaderboard result");
            }
        });

        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        running.retain(|h| !h.is_finished());
        running.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{LocalBoard, MAX_HIGH_SCORES};
    use assert_matches::assert_matches;
    use crate::config::RemoteConfig;
    use crate::leaderboard::RemoteBoard;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> ScoreStore {
        ScoreStore::new(LocalBoard::with_path(dir.path().join("scores.json")), None)
    }

    #[test]
    fn zero_score_is_not_qualified_and_shows_board() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(
            ScoreWorker::resolve(&store, ScoreRequest::CheckHighScore { score: 0, generation: 1 }),
            ScoreEvent::Board(vec![])
        );
    }

    #[test]
    fn qualifying_score_asks_for_a_name() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(
            ScoreWorker::resolve(&store, ScoreRequest::CheckHighScore { score: 3, generation: 2 }),
            ScoreEvent::Qualified { score: 3, generation: 2 }
        );
    }

    #[test]
    fn low_score_on_full_board_shows_board() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        for s in 10..20 {
            store.submit("p", s);
        }
        let event = ScoreWorker::resolve(&store, ScoreRequest::CheckHighScore { score: 10, generation: 1 });
        assert_matches!(event, ScoreEvent::Board(top) if top.len() == MAX_HIGH_SCORES);
    }

    #[test]
    fn submit_returns_the_new_board() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let event = ScoreWorker::resolve(
            &store,
            ScoreRequest::Submit {
                name: "ada".into(),
                score: 8,
            },
        );
        assert_matches!(event, ScoreEvent::Board(top) if top[0].name == "ada" && top[0].score == 8);
    }

    #[test]
    fn dispatch_posts_result_to_the_loop() {
        let dir = tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let worker = ScoreWorker::new(Arc::new(store_in(&dir)), tx);

        worker.dispatch(ScoreRequest::Refresh);
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_matches!(event, GameEvent::Scores(ScoreEvent::Board(top)) if top.is_empty());
    }

    #[test]
    fn wait_idle_lets_a_pending_submit_land() {
        let dir = tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let store = Arc::new(store_in(&dir));
        let worker = ScoreWorker::new(Arc::clone(&store), tx);

        worker.clone().dispatch(ScoreRequest::Submit {
            name: "ada".into(),
            score: 5,
        });
        drop(rx);

        assert!(worker.wait_idle(Duration::from_secs(5)));
        assert!(worker.running.lock().unwrap().is_empty());
        let saved = store.local().load().unwrap();
        assert_eq!(saved[0].name, "ada");
        assert_eq!(saved[0].score, 5);
    }

    #[test]
    fn wait_idle_gives_up_on_a_stalled_request() {
        let dir = tempdir().unwrap();
        // accepts connections into the backlog but never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let remote = RemoteBoard::new(&RemoteConfig {
            base_url: format!("http://{}", listener.local_addr().unwrap()),
            anon_key: "k".into(),
        });
        let store = ScoreStore::new(LocalBoard::with_path(dir.path().join("s.json")), Some(remote));
        let (tx, _rx) = mpsc::channel();
        let worker = ScoreWorker::new(Arc::new(store), tx);

        worker.dispatch(ScoreRequest::Refresh);
        assert!(!worker.wait_idle(Duration::from_millis(50)));
        drop(listener);
    }

    #[test]
    fn wait_idle_without_requests_returns_at_once() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = mpsc::channel();
        let worker = ScoreWorker::new(Arc::new(store_in(&dir)), tx);
        assert!(worker.wait_idle(Duration::ZERO));
    }
}
