//! Injectable time source.
//!
//! The verification service reads the current time through [`TimeProvider`]
//! so expiry can be exercised deterministically. Use [`SystemTimeProvider`]
//! in production and [`SimulatedTimeProvider`] in tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of the current wall-clock time
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production time provider using the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests.
///
/// Clones share the same underlying time, so a clone handed to a service can
/// be advanced from the test body.
#[derive(Debug, Clone)]
pub struct SimulatedTimeProvider {
    current_ms: Arc<AtomicI64>,
}

impl SimulatedTimeProvider {
    /// Start at the given instant
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_ms: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Start at the current system time
    pub fn from_system_time() -> Self {
        Self::new(Utc::now())
    }

    /// Move time forward
    pub fn advance(&self, delta: Duration) {
        self.current_ms
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }

    /// Jump to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        self.current_ms
            .store(instant.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Default for SimulatedTimeProvider {
    fn default() -> Self {
        Self::from_system_time()
    }
}

impl TimeProvider for SimulatedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.current_ms.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(ms)
            .single()
            .unwrap_or_else(Utc::now)
    }
}
