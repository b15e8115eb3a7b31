use std::time::{Duration, Instant};

use rand::Rng;

use crate::timer::Deadline;

/// Cell position inside the play area, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Size of the play area in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: u16,
    pub height: u16,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 60,
            height: 18,
        }
    }
}

impl Arena {
    /// Uniform position for a `w`×`h` target that keeps it fully inside.
    /// Targets larger than the arena are pinned to the origin on that axis.
    pub fn random_position<R: Rng + ?Sized>(&self, w: u16, h: u16, rng: &mut R) -> Point {
        let max_x = self.width.saturating_sub(w);
        let max_y = self.height.saturating_sub(h);
        Point::new(rng.gen_range(0..=max_x), rng.gen_range(0..=max_y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Clickable until the deadline, then it starts fading
    Live(Deadline),
    /// Hit and scored, showing the pop
    Popping(Deadline),
    /// Missed, fading out
    Fading(Deadline),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: u64,
    pub pos: Point,
    pub width: u16,
    pub height: u16,
    pub state: TargetState,
}

impl Target {
    pub fn new(id: u64, pos: Point, width: u16, height: u16, now: Instant, lifetime: Duration) -> Self {
        Self {
            id,
            pos,
            width,
            height,
            state: TargetState::Live(Deadline::after(now, lifetime)),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.pos.x
            && p.y >= self.pos.y
            && p.x - self.pos.x < self.width
            && p.y - self.pos.y < self.height
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, TargetState::Live(_))
    }

    /// Turns a live target into a popping one. Returns false if it already
    /// had an outcome.
    pub fn pop(&mut self, now: Instant, vanish: Duration) -> bool {
        if !self.is_live() {
            return false;
        }
        self.state = TargetState::Popping(Deadline::after(now, vanish));
        true
    }

    /// Advances the lifecycle; returns false once the target should be removed.
    pub fn advance(&mut self, now: Instant, vanish: Duration) -> bool {
        match self.state {
            TargetState::Live(expiry) if expiry.is_due(now) => {
                self.state = TargetState::Fading(Deadline::after(now, vanish));
                true
            }
            TargetState::Live(_) => true,
            TargetState::Popping(done) | TargetState::Fading(done) => !done.is_due(now),
        }
    }
}
