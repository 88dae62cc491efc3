//! Countdown arithmetic and the one-shot celebration latch.

use serde::Serialize;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time split into display fields. `total` is the raw difference in
/// milliseconds, 0 once the deadline has passed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total: i64,
}

impl TimeLeft {
    pub fn until(target_ms: i64, now_ms: i64) -> Self {
        let delta = target_ms.saturating_sub(now_ms);
        if delta <= 0 {
            return Self::default();
        }
        Self {
            days: delta / MS_PER_DAY,
            hours: (delta / MS_PER_HOUR) % 24,
            minutes: (delta / MS_PER_MINUTE) % 60,
            seconds: (delta / MS_PER_SECOND) % 60,
            total: delta,
        }
    }

    pub fn is_over(&self) -> bool {
        self.total <= 0
    }

    /// Whole seconds represented by the display fields.
    pub fn whole_seconds(&self) -> i64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    /// `[days, hours, minutes, seconds]`, zero-padded to two digits.
    pub fn padded(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|v| format!("{v:02}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Celebrating,
}

/// Result of one countdown timer firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub left: TimeLeft,
    /// True on exactly one tick: the first one at or past the deadline.
    pub celebrate: bool,
}

#[derive(Clone, Debug)]
pub struct Countdown {
    target_ms: i64,
    phase: Phase,
}

impl Countdown {
    pub fn new(target_ms: i64) -> Self {
        Self {
            target_ms,
            phase: Phase::Counting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_celebrating(&self) -> bool {
        self.phase == Phase::Celebrating
    }

    pub fn tick(&mut self, now_ms: i64) -> Tick {
        let left = TimeLeft::until(self.target_ms, now_ms);
        let celebrate = left.is_over() && self.phase == Phase::Counting;
        if celebrate {
            self.phase = Phase::Celebrating;
        }
        Tick { left, celebrate }
    }
}
