//! The game session controller: countdown, target spawning, scoring and the
//! hand-off to the leaderboard when a timed game runs out.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::leaderboard::{BoardView, DEFAULT_PLAYER_NAME};
use crate::session::{GameSettings, Session};
use crate::target::{Arena, Point, Target};
use crate::timer::{Deadline, Interval};
use crate::worker::{ScoreDispatch, ScoreEvent, ScoreRequest};

pub const MAX_NAME_LEN: usize = 24;
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartLabel {
    Start,
    Playing,
    GameOver(u32),
    PlayAgain,
}

impl fmt::Display for StartLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartLabel::Start => write!(f, "Start Game"),
            StartLabel::Playing => write!(f, "Playing..."),
            StartLabel::GameOver(score) => write!(f, "Game Over! Score: {score}"),
            StartLabel::PlayAgain => write!(f, "Play Again"),
        }
    }
}

/// The start button as the player sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartControl {
    pub label: StartLabel,
    pub enabled: bool,
}

impl StartControl {
    fn ready(label: StartLabel) -> Self {
        Self {
            label,
            enabled: true,
        }
    }

    fn disabled(label: StartLabel) -> Self {
        Self {
            label,
            enabled: false,
        }
    }
}

/// Pending name entry for a score that made the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePrompt {
    pub score: u32,
    pub input: String,
}

pub struct GameController {
    settings: GameSettings,
    arena: Arena,
    rng: StdRng,
    scores: Box<dyn ScoreDispatch>,
    open: bool,
    session: Session,
    countdown: Option<Interval>,
    spawner: Option<Interval>,
    targets: Vec<Target>,
    next_target_id: u64,
    start_control: StartControl,
    replay: Option<Deadline>,
    prompt: Option<NamePrompt>,
    board: BoardView,
}

impl GameController {
    pub fn new(settings: GameSettings, scores: Box<dyn ScoreDispatch>) -> Self {
        Self {
            session: Session::new(settings.duration_secs),
            settings,
            arena: Arena::default(),
            rng: StdRng::from_entropy(),
            scores,
            open: false,
            countdown: None,
            spawner: None,
            targets: Vec::new(),
            next_target_id: 0,
            start_control: StartControl::ready(StartLabel::Start),
            replay: None,
            prompt: None,
            board: BoardView::Loading,
        }
    }

    /// Replaces the entropy-seeded generator, for reproducible placement.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn start_control(&self) -> StartControl {
        self.start_control
    }

    pub fn board(&self) -> &BoardView {
        &self.board
    }

    pub fn name_prompt(&self) -> Option<&NamePrompt> {
        self.prompt.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Resizes the play area. Live targets keep their spot; new ones use the new bounds.
    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = arena;
    }

    /// Shows the loading placeholder and asks for a fresh ranking.
    pub fn refresh_board(&mut self) {
        self.board = BoardView::Loading;
        self.scores.dispatch(ScoreRequest::Refresh);
    }

    pub fn open(&mut self) {
        if self.open {
            return;
        }
        log::debug!("game opened");
        self.open = true;
        self.reset();
        self.refresh_board();
    }

    pub fn reset(&mut self) {
        self.countdown = None;
        self.spawner = None;
        self.replay = None;
        self.session.clear(self.settings.duration_secs);
        self.targets.clear();
        self.start_control = StartControl::ready(StartLabel::Start);
    }

    /// Starts a timed game. Ignored while one is running, while the start
    /// control is disabled, or while a name is being entered.
    pub fn start(&mut self, now: Instant) {
        if self.session.running
            || !self.open
            || !self.start_control.enabled
            || self.prompt.is_some()
        {
            return;
        }
        self.session.generation += 1;
        self.session.clear(self.settings.duration_secs);
        self.session.running = true;
        self.targets.clear();
        self.replay = None;
        self.start_control = StartControl::disabled(StartLabel::Playing);
        self.countdown = Some(Interval::new(now, COUNTDOWN_PERIOD));
        self.spawner = Some(Interval::new(now, self.settings.spawn_interval));
        log::info!("game {} started", self.session.generation);
        self.spawn_target(now);
    }

    /// Stops the game. Only the first end of a game that ran out of time
    /// starts the high-score flow; ending a stopped game does nothing more
    /// than clearing the field.
    pub fn end(&mut self, now: Instant) {
        self.countdown = None;
        self.spawner = None;
        self.targets.clear();
        let was_running = std::mem::replace(&mut self.session.running, false);
        if !was_running {
            return;
        }

        let score = self.session.score;
        if self.session.timed_out() {
            log::info!("game {} over with score {score}", self.session.generation);
            self.start_control = StartControl::disabled(StartLabel::GameOver(score));
            self.replay = Some(Deadline::after(now, self.settings.replay_delay));
            self.board = BoardView::Loading;
            self.scores.dispatch(ScoreRequest::CheckHighScore {
                score,
                generation: self.session.generation,
            });
        } else {
            log::info!("game {} stopped early at score {score}", self.session.generation);
            self.start_control = StartControl::ready(StartLabel::Start);
        }
    }

    /// Hides the game. A name entry still open is submitted with the default name.
    pub fn close(&mut self, now: Instant) {
        log::debug!("game closed");
        self.open = false;
        self.end(now);
        if let Some(prompt) = self.prompt.take() {
            self.submit(DEFAULT_PLAYER_NAME, prompt.score);
        }
    }

    /// Advances every timer to `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.replay.is_some_and(|d| d.is_due(now)) {
            self.replay = None;
            self.start_control = StartControl::ready(StartLabel::PlayAgain);
        }

        let seconds = self.countdown.as_mut().map_or(0, |c| c.poll(now));
        for _ in 0..seconds {
            if !self.session.running {
                break;
            }
            self.session.time_remaining = self.session.time_remaining.saturating_sub(1);
            if self.session.timed_out() {
                self.end(now);
            }
        }

        let spawns = self.spawner.as_mut().map_or(0, |s| s.poll(now));
        for _ in 0..spawns {
            self.spawn_target(now);
        }

        let vanish = self.settings.vanish_duration;
        self.targets.retain_mut(|t| t.advance(now, vanish));
    }

    /// Click at `point` in arena coordinates. Returns true when it scored.
    pub fn hit(&mut self, point: Point, now: Instant) -> bool {
        if !self.session.running {
            return false;
        }
        let vanish = self.settings.vanish_duration;
        let scored = self
            .targets
            .iter_mut()
            .rev()
            .find(|t| t.is_live() && t.contains(point))
            .is_some_and(|t| t.pop(now, vanish));
        if scored {
            self.session.score += 1;
        }
        scored
    }

    pub fn on_score_event(&mut self, event: ScoreEvent) {
        match event {
            ScoreEvent::Board(entries) => self.board = entries.into(),
            ScoreEvent::Qualified { score, generation } => {
                let current = self.open
                    && generation == self.session.generation
                    && !self.session.running
                    && self.prompt.is_none();
                if current {
                    self.prompt = Some(NamePrompt {
                        score,
                        input: String::new(),
                    });
                } else {
                    log::debug!("high score {score} from game {generation} saved without a name");
                    self.submit(DEFAULT_PLAYER_NAME, score);
                }
            }
        }
    }

    pub fn prompt_input(&mut self, c: char) {
        if let Some(prompt) = self.prompt.as_mut() {
            if !c.is_control() && prompt.input.chars().count() < MAX_NAME_LEN {
                prompt.input.push(c);
            }
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.input.pop();
        }
    }

    /// Submits the typed name; a blank name becomes the default.
    pub fn confirm_name(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            self.submit(&prompt.input, prompt.score);
        }
    }

    /// Dismisses the prompt; the score is still kept under the default name.
    pub fn cancel_name(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            self.submit(DEFAULT_PLAYER_NAME, prompt.score);
        }
    }

    fn submit(&mut self, name: &str, score: u32) {
        self.scores.dispatch(ScoreRequest::Submit {
            name: name.to_string(),
            score,
        });
    }

    fn spawn_target(&mut self, now: Instant) {
        if !self.session.running {
            return;
        }
        let (w, h) = (self.settings.target_width, self.settings.target_height);
        let pos = self.arena.random_position(w, h, &mut self.rng);
        self.next_target_id += 1;
        self.targets.push(Target::new(
            self.next_target_id,
            pos,
            w,
            h,
            now,
            self.settings.target_lifetime,
        ));
    }
}
