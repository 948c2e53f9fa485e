//! Calendar-month keys and tolerant calendar-date values.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::BudgetError;

/// A calendar month identified as `YYYY-MM`.
///
/// Ordering follows calendar time: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, BudgetError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(BudgetError::InvalidMonth(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(next) => next - Duration::days(1),
            None => NaiveDate::from_ymd_opt(self.year, self.month, 31).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Moves the key by `months` calendar months (negative values go backward).
    ///
    /// Fails with `InvalidMonth` when the result falls outside years 0000..=9999.
    pub fn shift(&self, months: i32) -> Result<Self, BudgetError> {
        let out_of_range = || BudgetError::InvalidMonth(format!("{self} shifted by {months} months"));
        let index = self.index().checked_add(months).ok_or_else(out_of_range)?;
        Self::new(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
            .map_err(|_| out_of_range())
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &MonthKey) -> i32 {
        other.index() - self.index()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn index(&self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = BudgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || BudgetError::InvalidMonth(raw.to_string());
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = BudgetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(value: NaiveDate) -> Self {
        Self::from_date(value)
    }
}

/// A calendar date kept exactly as it was stored.
///
/// Records coming from the API may carry dates in more than one shape, or no valid
/// date at all. Parsing is deferred to the point of use so that one malformed record
/// can be excluded instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(String);

impl CalendarDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
    pub fn parse(&self) -> Option<NaiveDate> {
        let raw = self.0.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.parse().map(MonthKey::from_date)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value.format("%Y-%m-%d").to_string())
    }
}

impl From<&str> for CalendarDate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
