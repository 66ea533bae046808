//! The fixed in-game calendar: 12 named months of 28 days in a single year.
//!
//! Every month has the same length, so month arithmetic never has to clamp the
//! day of month. Dates serialize as `YYYY-MM-DD` and times of day as `HH:mm`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// In-fiction month names, in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "Miesiąc Adanosa",
    "Miesiąc Innosa",
    "Miesiąc Beliara",
    "Miesiąc Kruka",
    "Miesiąc Starego Obozu",
    "Miesiąc Nowego Obozu",
    "Miesiąc Bractwa",
    "Miesiąc Khorinis",
    "Miesiąc Górniczej Doliny",
    "Miesiąc Jarkendaru",
    "Miesiąc Irdorath",
    "Miesiąc Końca",
];

/// Weekday column headers of the month grid.
pub const DAYS_OF_WEEK: [&str; 7] = ["Pon", "Wto", "Śro", "Czw", "Pią", "Sob", "Nie"];

pub const MONTHS_IN_YEAR: u8 = 12;
pub const DAYS_IN_MONTH: u8 = 28;
pub const FIXED_YEAR: u16 = 2025;
pub const HOURS_PER_DAY: u8 = 24;

const MAX_YEAR: i64 = 9999;

/// A day in the fixed calendar. Months are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: u16,
    month: u8,
    day: u8,
}

impl CalendarDate {
    /// Build a date, rejecting months outside 1..=12 and days outside 1..=28.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self> {
        if i64::from(year) > MAX_YEAR {
            return Err(Error::Validation(format!("year {} out of range", year)));
        }
        if !(1..=MONTHS_IN_YEAR).contains(&month) {
            return Err(Error::Validation(format!(
                "month {} out of range 1..={}",
                month, MONTHS_IN_YEAR
            )));
        }
        if !(1..=DAYS_IN_MONTH).contains(&day) {
            return Err(Error::Validation(format!(
                "day {} out of range 1..={}",
                day, DAYS_IN_MONTH
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Build a date in the fixed year, clamping month and day into range.
    pub fn clamped(month: i64, day: i64) -> Self {
        Self {
            year: FIXED_YEAR,
            month: month.clamp(1, i64::from(MONTHS_IN_YEAR)) as u8,
            day: day.clamp(1, i64::from(DAYS_IN_MONTH)) as u8,
        }
    }

    /// First day of the first month of the fixed year.
    pub fn start_of_year() -> Self {
        Self {
            year: FIXED_YEAR,
            month: 1,
            day: 1,
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Display name of this date's month.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month - 1)]
    }

    /// Same month, different day (clamped to the month).
    pub fn with_day(self, day: u8) -> Self {
        Self {
            day: day.clamp(1, DAYS_IN_MONTH),
            ..self
        }
    }

    /// Move by `delta` months, rolling the year over at either end.
    ///
    /// The day of month is kept as is; all months share the same length.
    pub fn shift_months(self, delta: i32) -> Self {
        let months = i64::from(MONTHS_IN_YEAR);
        let index = i64::from(self.year) * months + i64::from(self.month - 1) + i64::from(delta);
        let index = index.clamp(0, MAX_YEAR * months + months - 1);
        Self {
            year: index.div_euclid(months) as u16,
            month: (index.rem_euclid(months) + 1) as u8,
            day: self.day,
        }
    }

    /// True when both dates fall on the same month and day, whatever the year.
    pub fn same_day_of_year(&self, other: &CalendarDate) -> bool {
        self.month == other.month && self.day == other.day
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("invalid date '{}', expected YYYY-MM-DD", s));

        let mut parts = s.split('-');
        let (year, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d), None) => (y, m, d),
            _ => return Err(invalid()),
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }

        let year: u16 = parse_digits(year).ok_or_else(invalid)?;
        let month: u8 = parse_digits(month).ok_or_else(invalid)?;
        let day: u8 = parse_digits(day).ok_or_else(invalid)?;

        Self::new(year, month, day)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

/// A wall time within a day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
    pub const NOON: TimeOfDay = TimeOfDay { hour: 12, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour >= HOURS_PER_DAY || minute >= 60 {
            return Err(Error::Validation(format!(
                "time {:02}:{:02} out of range",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Add whole hours, wrapping past midnight. Minutes are kept.
    pub fn plus_hours(self, hours: u8) -> Self {
        Self {
            hour: ((u16::from(self.hour) + u16::from(hours)) % u16::from(HOURS_PER_DAY)) as u8,
            minute: self.minute,
        }
    }

    /// Whether `[start, end)` overlaps the hour slot `[hour, hour + 1)`.
    pub fn overlaps_hour(start: TimeOfDay, end: TimeOfDay, hour: u8) -> bool {
        let slot_start = u16::from(hour) * 60;
        let slot_end = slot_start + 60;
        start.minutes_since_midnight() < slot_end && end.minutes_since_midnight() > slot_start
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("invalid time '{}', expected HH:mm", s));

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = parse_digits(hour).ok_or_else(invalid)?;
        let minute: u8 = parse_digits(minute).ok_or_else(invalid)?;

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

// `str::parse` accepts a leading '+', which the wire formats do not.
fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
