//! ISO-8601 week identity and week-id arithmetic.
//!
//! # Responsibility
//! - Map calendar dates to `YYYY-Www` week ids and back to the week's Monday.
//! - Navigate between weeks, including across year boundaries.
//! - Render the human-readable Monday–Sunday label of a week.
//!
//! # Invariants
//! - A `WeekId` always names a week that exists in its ISO week-year
//!   (`1..=weeks_in_year(year)`), so every conversion below is total.
//! - Ids produced by `date_to_week_id` carry the ISO week-year, which can
//!   differ from the calendar year of the date near January 1st.
//! - `add_weeks` round-trips through calendar dates, never through raw
//!   week-number arithmetic.

use crate::clock::Clock;
use chrono::{Datelike, NaiveDate, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static WEEK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-W(\d{2})$").expect("valid week id regex"));

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Errors from parsing or constructing a week id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekIdError {
    /// Text does not match `YYYY-Www`.
    Malformed(String),
    /// Week number does not exist in the given ISO week-year.
    OutOfRange { year: i32, week: u32 },
}

impl Display for WeekIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed week id `{value}`; expected YYYY-Www"),
            Self::OutOfRange { year, week } => {
                write!(f, "week {week} does not exist in ISO week-year {year}")
            }
        }
    }
}

impl Error for WeekIdError {}

/// One ISO week, identified by ISO week-year and week number.
///
/// Ordering is by `(year, week)`, which is chronological for every id this
/// module can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Builds a week id after checking the week exists in `year`.
    pub fn new(year: i32, week: u32) -> Result<Self, WeekIdError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || week == 0 || week > weeks_in_year(year) {
            return Err(WeekIdError::OutOfRange { year, week });
        }
        Ok(Self { year, week })
    }

    /// Parses `YYYY-Www` text.
    pub fn parse(value: &str) -> Result<Self, WeekIdError> {
        let captures = WEEK_ID_RE
            .captures(value.trim())
            .ok_or_else(|| WeekIdError::Malformed(value.to_string()))?;
        let year = captures[1]
            .parse::<i32>()
            .map_err(|_| WeekIdError::Malformed(value.to_string()))?;
        let week = captures[2]
            .parse::<u32>()
            .map_err(|_| WeekIdError::Malformed(value.to_string()))?;
        Self::new(year, week)
    }

    /// ISO week-year as written in the id.
    pub fn year(self) -> i32 {
        self.year
    }

    /// ISO week number, 1-based.
    pub fn week(self) -> u32 {
        self.week
    }
}

impl Display for WeekId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = WeekIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WeekId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Number of ISO weeks (52 or 53) in an ISO week-year.
pub fn weeks_in_year(year: i32) -> u32 {
    // December 28th always falls in the last ISO week of its year.
    NaiveDate::from_ymd_opt(year, 12, 28).map_or(52, |date| date.iso_week().week())
}

/// Maps a calendar date to the ISO week containing it.
///
/// The date is shifted to the Thursday of its Monday-based week; that
/// Thursday's year is the ISO week-year and its ordinal fixes the week number.
pub fn date_to_week_id(date: NaiveDate) -> WeekId {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let thursday = date
        .checked_add_signed(TimeDelta::days(3 - offset))
        .unwrap_or(date);
    WeekId {
        year: thursday.year(),
        week: thursday.ordinal0() / 7 + 1,
    }
}

/// Week containing the clock's current date.
pub fn current_week_id(clock: &dyn Clock) -> WeekId {
    date_to_week_id(clock.today())
}

/// Returns the Monday that starts `week_id`.
pub fn week_id_to_monday(week_id: WeekId) -> NaiveDate {
    // January 4th is always inside ISO week 1.
    let Some(anchor) = NaiveDate::from_ymd_opt(week_id.year, 1, 4) else {
        return NaiveDate::default();
    };
    let back_to_monday = i64::from(anchor.weekday().num_days_from_monday());
    let weeks_forward = i64::from(week_id.week.saturating_sub(1)) * 7;
    anchor
        .checked_add_signed(TimeDelta::days(weeks_forward - back_to_monday))
        .unwrap_or(anchor)
}

/// Moves `delta` weeks forward (or backward when negative).
///
/// Returns `week_id` unchanged when the target would leave the four-digit
/// year range.
pub fn add_weeks(week_id: WeekId, delta: i64) -> WeekId {
    let Some(step) = TimeDelta::try_weeks(delta) else {
        return week_id;
    };
    let Some(target) = week_id_to_monday(week_id).checked_add_signed(step) else {
        return week_id;
    };
    let shifted = date_to_week_id(target);
    if (MIN_YEAR..=MAX_YEAR).contains(&shifted.year) {
        shifted
    } else {
        week_id
    }
}

/// Compares two week ids by their parsed `(year, week)` pairs.
pub fn compare_week_ids(a: WeekId, b: WeekId) -> Ordering {
    a.cmp(&b)
}

/// Returns whether `target` lies strictly before `reference`.
pub fn is_past_week(target: WeekId, reference: WeekId) -> bool {
    compare_week_ids(target, reference) == Ordering::Less
}

/// Formats the Monday–Sunday range of a week, e.g. `Jan 1 – Jan 7`.
pub fn week_label(week_id: WeekId) -> String {
    let monday = week_id_to_monday(week_id);
    let sunday = monday.checked_add_signed(TimeDelta::days(6)).unwrap_or(monday);
    format!("{} – {}", monday.format("%b %-d"), sunday.format("%b %-d"))
}
