//! Time source for date evaluation
//!
//! Keyword dates (`today`, `now`, `yesterday`, `tomorrow`) and relative
//! expressions read the current time through a [`Clock`], so tests can pin it.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Source of the current local date and time
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant
    fn now(&self) -> NaiveDateTime;

    /// Midnight of the current day
    fn today(&self) -> NaiveDateTime {
        self.now().date().and_time(NaiveTime::MIN)
    }
}

/// Reads the host's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: NaiveDateTime,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// A clock stopped at midnight of `date`
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.at
    }
}
