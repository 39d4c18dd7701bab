//! Time sources for the booking engine.
//!
//! The engine never reads the system clock directly. Production code uses
//! [`SystemClock`]; tests drive time explicitly with [`ManualClock`].

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use roomhold::clock::{Clock, ManualClock};
///
/// let start = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::hours(6));
/// assert_eq!(clock.now(), start + Duration::hours(6));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_set_and_today() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2030, 3, 31, 23, 59, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2030, 3, 31).unwrap());

        clock.advance(Duration::minutes(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2030, 4, 1).unwrap());

        let later = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
