//! Oracle INTERVAL values
//!
//! INTERVAL DAY TO SECOND maps onto `chrono::TimeDelta`. INTERVAL YEAR TO
//! MONTH has no chrono counterpart and converts to a total month count.

use chrono::TimeDelta;

use crate::error::{Error, Result};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Oracle INTERVAL DAY TO SECOND
///
/// All components share the sign of the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalDs {
    /// Days
    pub days: i64,
    /// Hours (-23 to 23)
    pub hours: i32,
    /// Minutes (-59 to 59)
    pub minutes: i32,
    /// Seconds (-59 to 59)
    pub seconds: i32,
    /// Fractional seconds in nanoseconds
    pub nanoseconds: i32,
}

impl IntervalDs {
    /// Create a new interval
    pub fn new(days: i64, hours: i32, minutes: i32, seconds: i32, nanoseconds: i32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
            nanoseconds,
        }
    }

    /// Convert to a `TimeDelta`
    pub fn to_time_delta(&self) -> Result<TimeDelta> {
        let seconds = self
            .days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|s| s.checked_add(self.hours as i64 * 3600))
            .and_then(|s| s.checked_add(self.minutes as i64 * 60))
            .and_then(|s| s.checked_add(self.seconds as i64));

        seconds
            .and_then(TimeDelta::try_seconds)
            .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(self.nanoseconds as i64)))
            .ok_or_else(|| Error::NumericOverflow {
                value: format!("{self:?}"),
                target: "TimeDelta".to_string(),
            })
    }
}

impl From<TimeDelta> for IntervalDs {
    fn from(delta: TimeDelta) -> Self {
        let total_seconds = delta.num_seconds();
        let nanos = delta
            .checked_sub(&TimeDelta::seconds(total_seconds))
            .and_then(|d| d.num_nanoseconds())
            .unwrap_or(0);
        let days = total_seconds / SECONDS_PER_DAY;
        let rest = total_seconds % SECONDS_PER_DAY;

        Self {
            days,
            hours: (rest / 3600) as i32,
            minutes: ((rest % 3600) / 60) as i32,
            seconds: (rest % 60) as i32,
            nanoseconds: (nanos % NANOS_PER_SECOND) as i32,
        }
    }
}

/// Oracle INTERVAL YEAR TO MONTH
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalYm {
    /// Years
    pub years: i32,
    /// Months (-11 to 11)
    pub months: i32,
}

impl IntervalYm {
    /// Create a new interval
    pub fn new(years: i32, months: i32) -> Self {
        Self { years, months }
    }

    /// Split a month count into years and months
    pub fn from_months(total: i64) -> Self {
        Self {
            years: (total / 12) as i32,
            months: (total % 12) as i32,
        }
    }

    /// Length of the interval in months
    pub fn total_months(&self) -> i64 {
        self.years as i64 * 12 + self.months as i64
    }
}
