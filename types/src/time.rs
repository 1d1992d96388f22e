//! Timestamp type and the injectable clock.
//!
//! Timestamps are Unix epoch seconds (UTC). Every time-dependent decision in
//! the core reads the current time through a [`Clock`] so tests can drive it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether strictly more than `window_secs` have passed between this
    /// timestamp and `now`.
    ///
    /// A timestamp in the future relative to `now` is never older than any window.
    pub fn is_older_than(&self, window_secs: u64, now: Timestamp) -> bool {
        now.0 > self.0 && self.elapsed_since(now) > window_secs
    }

    /// Seconds remaining until [`is_older_than`](Self::is_older_than) becomes true.
    pub fn remaining_in_window(&self, window_secs: u64, now: Timestamp) -> u64 {
        if self.is_older_than(window_secs, now) {
            return 0;
        }
        self.0
            .saturating_add(window_secs)
            .saturating_add(1)
            .saturating_sub(now.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A system clock set before 1970 reads as the epoch.
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timestamp::new(secs)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
