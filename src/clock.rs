//! Process-wide time source
//!
//! A [`ResolvedConfig`](crate::ResolvedConfig) carries a [`Clock`] so that
//! time-dependent service code (instance expiry, request timeouts, iterator
//! backoff) can be driven by a [`MockClock`] in tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> OffsetDateTime;

    /// Milliseconds since the Unix epoch
    fn milliseconds(&self) -> i64 {
        let nanos = self.now().unix_timestamp_nanos();
        i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
    }

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

impl std::fmt::Debug for dyn Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock").field("now", &self.now()).finish()
    }
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Manually driven clock for deterministic tests
///
/// `sleep` advances the clock instead of blocking.
///
/// # Example
///
/// ```
/// use confdef::{Clock, MockClock};
/// use std::time::Duration;
///
/// let clock = MockClock::new(1_000);
/// clock.sleep(Duration::from_millis(250));
/// assert_eq!(clock.milliseconds(), 1_250);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    millis: AtomicI64,
}

impl MockClock {
    /// Start at `millis` since the Unix epoch
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        let delta = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> OffsetDateTime {
        let nanos = i128::from(self.millis.load(Ordering::SeqCst)) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    fn milliseconds(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_advances() {
        let clock = MockClock::new(0);
        assert_eq!(clock.milliseconds(), 0);

        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.milliseconds(), 2_000);

        clock.sleep(Duration::from_millis(50));
        assert_eq!(clock.milliseconds(), 2_050);
        assert_eq!(clock.now().unix_timestamp(), 2);

        clock.set(300_000);
        assert_eq!(clock.milliseconds(), 300_000);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        let clock = SystemClock;
        assert!(clock.milliseconds() > 1_600_000_000_000);
    }
}
