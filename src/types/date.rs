//! Oracle DATE and TIMESTAMP values
//!
//! Both carry calendar fields the way the server reports them. DATE has
//! second precision; TIMESTAMP adds microseconds and an optional time zone
//! offset. Conversions to `chrono::NaiveDateTime` keep the wall clock and drop
//! the offset, so TIMESTAMP WITH (LOCAL) TIME ZONE values read as local time.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/// Oracle DATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleDate {
    /// Year (e.g., 2024)
    pub year: i32,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl OracleDate {
    /// Create a new Oracle date
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Create a date-only value (time set to 00:00:00)
    pub fn date(year: i32, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Wall clock as a `NaiveDateTime`
    ///
    /// Fails with `DataConversionError` when the fields don't form a real date.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        naive_from_parts(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
    }
}

impl Default for OracleDate {
    fn default() -> Self {
        Self::new(1, 1, 1, 0, 0, 0)
    }
}

/// Truncates sub-second precision
impl From<NaiveDateTime> for OracleDate {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(
            value.year(),
            value.month() as u8,
            value.day() as u8,
            value.hour() as u8,
            value.minute() as u8,
            value.second() as u8,
        )
    }
}

/// Oracle TIMESTAMP (with optional timezone)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleTimestamp {
    /// Year (e.g., 2024)
    pub year: i32,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Fractional seconds in microseconds (0-999999)
    pub microsecond: u32,
    /// Timezone hour offset (-12 to +14)
    pub tz_hour_offset: i8,
    /// Timezone minute offset (-59 to +59)
    pub tz_minute_offset: i8,
}

impl OracleTimestamp {
    /// Create a new timestamp without timezone
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        microsecond: u32,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond,
            tz_hour_offset: 0,
            tz_minute_offset: 0,
        }
    }

    /// Attach a timezone offset
    pub fn with_offset(mut self, tz_hour_offset: i8, tz_minute_offset: i8) -> Self {
        self.tz_hour_offset = tz_hour_offset;
        self.tz_minute_offset = tz_minute_offset;
        self
    }

    /// Check if this timestamp has a timezone
    pub fn has_timezone(&self) -> bool {
        self.tz_hour_offset != 0 || self.tz_minute_offset != 0
    }

    /// Convert to OracleDate (loses fractional seconds and timezone)
    pub fn to_date(&self) -> OracleDate {
        OracleDate::new(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }

    /// Wall clock as a `NaiveDateTime`, ignoring any offset
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        naive_from_parts(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.microsecond,
        )
    }
}

impl Default for OracleTimestamp {
    fn default() -> Self {
        Self::new(1, 1, 1, 0, 0, 0, 0)
    }
}

impl From<OracleDate> for OracleTimestamp {
    fn from(date: OracleDate) -> Self {
        Self::new(
            date.year,
            date.month,
            date.day,
            date.hour,
            date.minute,
            date.second,
            0,
        )
    }
}

impl From<NaiveDateTime> for OracleTimestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(
            value.year(),
            value.month() as u8,
            value.day() as u8,
            value.hour() as u8,
            value.minute() as u8,
            value.second() as u8,
            value.nanosecond() / 1000,
        )
    }
}

fn naive_from_parts(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: u32,
) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|d| {
            d.and_hms_micro_opt(hour as u32, minute as u32, second as u32, microsecond)
        })
        .ok_or_else(|| {
            Error::DataConversionError(format!(
                "invalid date/time {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{microsecond:06}"
            ))
        })
}
