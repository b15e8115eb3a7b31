use std::time::Duration;

/// Gameplay timing and sizing
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub duration_secs: u32,
    pub spawn_interval: Duration,
    pub target_lifetime: Duration,
    /// Length of the pop (hit) and fade (timeout) animations
    pub vanish_duration: Duration,
    /// Delay before the start control comes back after a timed-out game
    pub replay_delay: Duration,
    pub target_width: u16,
    pub target_height: u16,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            duration_secs: 15,
            spawn_interval: Duration::from_millis(800),
            target_lifetime: Duration::from_millis(1500),
            vanish_duration: Duration::from_millis(200),
            replay_delay: Duration::from_secs(2),
            target_width: 5,
            target_height: 3,
        }
    }
}

/// State of one play-through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub score: u32,
    pub time_remaining: u32,
    pub running: bool,
    /// Bumped on every start so late worker results can be matched to their game
    pub generation: u64,
}

impl Session {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            score: 0,
            time_remaining: duration_secs,
            running: false,
            generation: 0,
        }
    }

    /// Back to defaults, keeping the generation counter.
    pub fn clear(&mut self, duration_secs: u32) {
        self.score = 0;
        self.time_remaining = duration_secs;
        self.running = false;
    }

    pub fn timed_out(&self) -> bool {
        self.time_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_the_game_rules() {
        let s = GameSettings::default();
        assert_eq!(s.duration_secs, 15);
        assert_eq!(s.spawn_interval, Duration::from_millis(800));
        assert_eq!(s.target_lifetime, Duration::from_millis(1500));
        assert_eq!(s.replay_delay, Duration::from_secs(2));
    }

    #[test]
    fn clear_keeps_generation() {
        let mut session = Session::new(15);
        session.generation = 4;
        session.score = 9;
        session.time_remaining = 0;
        session.running = true;

        session.clear(15);
        assert_eq!(session, Session { generation: 4, ..Session::new(15) });
        assert!(!session.timed_out());
    }
}
