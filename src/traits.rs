//! Time source abstraction.
//!
//! Session expiry and "open now" both depend on the current time; screens
//! take a `&dyn Clock` so tests can pin it.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, Utc};

pub trait Clock: Send + Sync {
    /// Get the current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get the current time in the local timezone.
    fn now_local(&self) -> DateTime<Local>;
}

/// Wall clock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a settable instant; clones share the same instant.
#[derive(Debug, Clone)]
pub struct MockClock {
    utc_time: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            utc_time: Arc::new(Mutex::new(time)),
        }
    }

    fn time(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.utc_time.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.time() = time;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.time();
        *time += duration;
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.time()
    }

    fn now_local(&self) -> DateTime<Local> {
        self.now_utc().with_timezone(&Local)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_system_clock_returns_current_time() {
        let clock = SystemClock;
        let before = Utc::now();
        let clock_time = clock.now_utc();
        let after = Utc::now();

        assert!(clock_time >= before);
        assert!(clock_time <= after);
    }

    #[test]
    fn test_mock_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let clock = MockClock::new(start);
        let shared = clock.clone();

        clock.advance(chrono::Duration::minutes(90));
        assert_eq!(
            shared.now_utc(),
            Utc.with_ymd_and_hms(2024, 6, 15, 11, 30, 0).unwrap()
        );

        shared.set_time(start);
        assert_eq!(clock.now_utc(), start);
    }
}
