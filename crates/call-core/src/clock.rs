//! Wall-clock sources
//!
//! Call timestamps and the simulated status progression are expressed in
//! epoch milliseconds. Components take a [`Clock`] so tests can pin or advance
//! time instead of sleeping.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of "now" in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall time that follows the tokio clock
///
/// Anchored to a base timestamp at construction and advanced by tokio's
/// monotonic clock, so it moves with `tokio::time::pause`/`advance` in tests.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor: tokio::time::Instant,
    base_millis: i64,
}

impl TokioClock {
    pub fn new(base_millis: i64) -> Self {
        Self {
            anchor: tokio::time::Instant::now(),
            base_millis,
        }
    }

    /// Anchor at the current system time
    pub fn from_system() -> Self {
        Self::new(SystemClock.now_millis())
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        let elapsed = tokio::time::Instant::now().duration_since(self.anchor);
        self.base_millis + elapsed.as_millis() as i64
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
