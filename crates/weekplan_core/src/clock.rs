//! Time source injected into the repository and migrator.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for timestamps and week resolution.
pub trait Clock {
    /// Current instant, used for `createdAt` stamps.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, used to resolve the current week.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock. Weeks are resolved in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Rc::new(Cell::new(instant)),
        }
    }

    /// Starts at midday UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let midday = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self::new(midday.and_utc())
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.instant.set(instant);
    }

    pub fn advance(&self, delta: TimeDelta) {
        let current = self.instant.get();
        self.instant
            .set(current.checked_add_signed(delta).unwrap_or(current));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.get()
    }
}
