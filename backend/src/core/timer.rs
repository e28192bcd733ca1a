//! Level countdown
//!
//! The level runs against a single decrementing tick counter. Reaching zero
//! is a one-shot event: the tick on which the countdown hits zero reports
//! `JustExpired` exactly once, after which the countdown stops and every
//! further tick reports `Expired`.

use serde::{Deserialize, Serialize};

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    /// Time remains
    Running,

    /// The countdown reached zero on this tick (fires exactly once)
    JustExpired,

    /// The countdown already expired on an earlier tick
    Expired,
}

/// One-shot decrementing tick counter
///
/// # Example
/// ```
/// use busjam_core_rs::{Countdown, CountdownStatus};
///
/// let mut countdown = Countdown::new(2);
/// assert_eq!(countdown.tick(), CountdownStatus::Running);
/// assert_eq!(countdown.tick(), CountdownStatus::JustExpired);
/// assert_eq!(countdown.tick(), CountdownStatus::Expired);
/// assert_eq!(countdown.remaining(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    remaining: usize,
    expired: bool,
}

impl Countdown {
    /// Create a countdown with `ticks` remaining
    pub fn new(ticks: usize) -> Self {
        Self {
            remaining: ticks,
            expired: ticks == 0,
        }
    }

    /// Advance by one tick
    pub fn tick(&mut self) -> CountdownStatus {
        if self.expired {
            return CountdownStatus::Expired;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.expired = true;
            CountdownStatus::JustExpired
        } else {
            CountdownStatus::Running
        }
    }

    /// Ticks remaining
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Check if the countdown has reached zero
    pub fn is_expired(&self) -> bool {
        self.expired
    }
}
