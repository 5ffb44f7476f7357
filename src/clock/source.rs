//! # Time sources.
//!
//! [`TimeSource`] is what the clock producer samples: the current Unix time
//! and whether the clock has been synchronized yet. Synchronization itself
//! (SNTP, RTC, ...) is the platform's business.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Datelike, Utc};

/// A clock whose year is earlier than this has never been set.
pub const MIN_SYNCED_YEAR: i32 = 2016;

/// Source of wall-clock time.
pub trait TimeSource: Send + Sync + 'static {
    /// Current Unix time in seconds (UTC; local offsets are applied when rendering).
    fn now(&self) -> i64;

    /// True once the clock holds a trustworthy time.
    fn is_synchronized(&self) -> bool {
        looks_synchronized(self.now())
    }
}

/// True if `timestamp` falls in or after [`MIN_SYNCED_YEAR`].
pub fn looks_synchronized(timestamp: i64) -> bool {
    DateTime::<Utc>::from_timestamp(timestamp, 0).is_some_and(|t| t.year() >= MIN_SYNCED_YEAR)
}

/// Host wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for tests and demos.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
    synchronized: AtomicBool,
}

impl ManualClock {
    /// A synchronized clock reading `timestamp`.
    pub fn new(timestamp: i64) -> Self {
        Self {
            now: AtomicI64::new(timestamp),
            synchronized: AtomicBool::new(true),
        }
    }

    /// A clock that reports itself unsynchronized until [`set_synchronized`](Self::set_synchronized).
    pub fn unsynchronized(timestamp: i64) -> Self {
        Self {
            now: AtomicI64::new(timestamp),
            synchronized: AtomicBool::new(false),
        }
    }

    pub fn set(&self, timestamp: i64) {
        self.now.store(timestamp, Ordering::Relaxed);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::Relaxed);
    }

    pub fn set_synchronized(&self, synced: bool) {
        self.synchronized.store(synced, Ordering::Relaxed);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }

    fn is_synchronized(&self) -> bool {
        self.synchronized.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_is_not_synchronized() {
        assert!(!looks_synchronized(0));
        // 2015-12-31T23:59:59Z
        assert!(!looks_synchronized(1_451_606_399));
        // 2016-01-01T00:00:00Z
        assert!(looks_synchronized(1_451_606_400));
    }

    #[test]
    fn test_system_clock_is_set_on_host() {
        assert!(SystemClock.is_synchronized());
    }

    #[test]
    fn test_system_clock_reports_utc_seconds() {
        let before = Utc::now().timestamp();
        let now = SystemClock.now();
        let after = Utc::now().timestamp();
        assert!((before..=after).contains(&now), "{before} <= {now} <= {after}");
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::unsynchronized(10);
        assert!(!clock.is_synchronized());
        clock.advance(5);
        clock.set_synchronized(true);
        assert_eq!(clock.now(), 15);
        assert!(clock.is_synchronized());
    }
}
