use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A local calendar day. Every per-day record is indexed by one of these.
///
/// Serialised as `YYYY-MM-DD`, which also keeps `BTreeMap<DateKey, _>` in
/// chronological order when written out as a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

/// Which weekday a calendar week begins on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl DateKey {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn parse(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .with_context(|| format!("Invalid date '{s}'. Must be YYYY-MM-DD"))
    }

    /// Current day in the local time zone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Truncate an instant to the local calendar day it falls on.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Local).date_naive())
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Shift by `n` calendar days; `n` may be negative. Stops at the first or
    /// last representable day rather than overflowing.
    #[must_use]
    pub fn add_days(self, n: i64) -> Self {
        let days = Days::new(n.unsigned_abs());
        let shifted = if n < 0 {
            self.0.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
        } else {
            self.0.checked_add_days(days).unwrap_or(NaiveDate::MAX)
        };
        Self(shifted)
    }

    /// 0 = Sunday … 6 = Saturday.
    #[must_use]
    pub fn weekday_index(self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    #[must_use]
    pub fn start_of_week(self, week_start: WeekStart) -> Self {
        let offset = match week_start {
            WeekStart::Sunday => self.0.weekday().num_days_from_sunday(),
            WeekStart::Monday => self.0.weekday().num_days_from_monday(),
        };
        self.add_days(-i64::from(offset))
    }

    /// The seven days of the calendar week containing `self`, in order.
    #[must_use]
    pub fn week_days(self, week_start: WeekStart) -> [DateKey; 7] {
        let start = self.start_of_week(week_start);
        let mut days = [start; 7];
        for (offset, day) in (0_i64..).zip(days.iter_mut()) {
            *day = start.add_days(offset);
        }
        days
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl WeekStart {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            _ => anyhow::bail!("Invalid week start '{s}'. Must be one of: sunday, monday"),
        }
    }
}
