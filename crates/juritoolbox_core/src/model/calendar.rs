//! Calendar primitives.
//!
//! # Responsibility
//! - Provide the date type, holiday set and counting mode used by deadlines.
//! - Own pt-BR display formatting (weekday names, `DD/MM/YYYY`).
//!
//! # Invariants
//! - `HolidaySet` membership is O(1) amortized and deduplicated.
//! - Date text parsing accepts only full dates; partial input is rejected.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Year-month-day value without time component.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CalendarDate = NaiveDate;

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
/// Accepted input formats with the field index holding the year.
const ACCEPTED_DATE_FORMATS: &[(&str, usize)] =
    &[("%Y-%m-%d", 0), ("%d/%m/%Y", 2), ("%Y/%m/%d", 0)];

/// How a day amount is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// Only weekdays outside the holiday set count.
    BusinessDays,
    /// Raw day offset.
    CalendarDays,
}

impl CountingMode {
    /// Stable snake_case label used in logs and adapters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BusinessDays => "business_days",
            Self::CalendarDays => "calendar_days",
        }
    }

    /// Parses a label produced by [`CountingMode::as_str`].
    ///
    /// Also accepts the short forms `business` and `calendar`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "business_days" | "business" => Some(Self::BusinessDays),
            "calendar_days" | "calendar" => Some(Self::CalendarDays),
            _ => None,
        }
    }
}

/// Deduplicated, unordered set of holiday dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet {
    dates: HashSet<CalendarDate>,
}

impl HolidaySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a date. Returns `false` when it was already present.
    pub fn insert(&mut self, date: CalendarDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns the dates in ascending order.
    pub fn sorted(&self) -> Vec<CalendarDate> {
        let mut dates = self.dates.iter().copied().collect::<Vec<_>>();
        dates.sort_unstable();
        dates
    }
}

impl FromIterator<CalendarDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl Extend<CalendarDate> for HolidaySet {
    fn extend<I: IntoIterator<Item = CalendarDate>>(&mut self, iter: I) {
        self.dates.extend(iter);
    }
}

/// Returns whether the weekday is one of the two designated weekend days.
pub fn is_weekend(date: CalendarDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns the pt-BR weekday name for a date.
pub fn weekday_name(date: CalendarDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Formats a date as `DD/MM/YYYY`.
pub fn format_display_date(date: CalendarDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parses trimmed date text in ISO (`YYYY-MM-DD`), pt-BR (`DD/MM/YYYY`)
/// or slash-ISO (`YYYY/MM/DD`) form.
///
/// Returns `None` for blank or unrecognized input. The year must have
/// exactly four digits; `10/11/24` is rejected, not read as year 0024.
pub fn parse_calendar_date(value: &str) -> Option<CalendarDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    ACCEPTED_DATE_FORMATS
        .iter()
        .filter(|(_, year_field)| has_four_digit_year(trimmed, *year_field))
        .find_map(|(format, _)| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn has_four_digit_year(value: &str, year_field: usize) -> bool {
    value
        .split(['-', '/'])
        .nth(year_field)
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|byte| byte.is_ascii_digit()))
}
