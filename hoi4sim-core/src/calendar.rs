//! 365-day game calendar.
//!
//! HOI4 removed leap years: February is always 28 days and every year is
//! exactly 365 days long. Standard calendar types would insert Feb 29 in
//! 1936 and 1940 and silently shift every date after it, so day-offset
//! conversion is done by hand here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Days per in-game year. No leap-year correction, ever.
pub const DAYS_PER_YEAR: i64 = 365;

const MONTH_DAYS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },
    #[error("cannot parse '{0}' as a date (expected Y-M-D)")]
    ParseDate(String),
}

/// A specific in-game date.
///
/// Fields are public for pattern matching; construct through [`Date::new`]
/// to get month/day validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u8, // 1-12
    pub day: u8,   // 1..=length of month
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        if month < 1 || month > 12 || day < 1 || day > MONTH_DAYS[(month - 1) as usize] {
            return Err(CalendarError::InvalidDate { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Absolute day count under the 365-day calendar.
    ///
    /// Differences of day numbers give exact day offsets between dates.
    pub fn day_number(&self) -> i64 {
        let mut days = DAYS_PER_YEAR * i64::from(self.year);
        for len in &MONTH_DAYS[..(self.month - 1) as usize] {
            days += i64::from(*len);
        }
        days + i64::from(self.day)
    }

    fn from_day_number(n: i64) -> Self {
        let year = (n - 1).div_euclid(DAYS_PER_YEAR);
        let mut remaining = (n - 1).rem_euclid(DAYS_PER_YEAR); // zero-based day of year
        let mut month = 1u8;
        for len in MONTH_DAYS {
            if remaining < i64::from(len) {
                break;
            }
            remaining -= i64::from(len);
            month += 1;
        }
        Self {
            year: year as i32,
            month,
            day: (remaining + 1) as u8,
        }
    }

    /// Date `days` days after (or before, if negative) this one.
    pub fn add_days(&self, days: i64) -> Self {
        Self::from_day_number(self.day_number() + days)
    }
}

/// Day offset from `from` to `to` (positive when `to` is later).
pub fn days_between(from: Date, to: Date) -> i64 {
    to.day_number() - from.day_number()
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(CalendarError::ParseDate(s.to_string()));
        };
        let year = y.parse().map_err(|_| CalendarError::ParseDate(s.to_string()))?;
        let month = m.parse().map_err(|_| CalendarError::ParseDate(s.to_string()))?;
        let day = d.parse().map_err(|_| CalendarError::ParseDate(s.to_string()))?;
        Date::new(year, month, day)
    }
}
