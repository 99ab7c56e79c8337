//! Deadline request/result model.
//!
//! # Responsibility
//! - Define the explicit request/result pair consumed by the calculator.
//! - Define the fatal validation taxonomy for a single calculation.
//!
//! # Invariants
//! - `amount >= 1` for every request accepted by `validate()`.
//! - Timeline entries are strictly ascending, one per calendar day, starting
//!   the day after `start` and ending on `end_date` inclusive.

use crate::model::calendar::{format_display_date, CalendarDate, CountingMode, HolidaySet};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fatal, human-readable reasons a calculation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Day amount is zero or negative.
    NonPositiveAmount(i64),
    /// Start date text could not be parsed.
    InvalidStartDate(String),
    /// Day amount exceeds the configured maximum.
    AmountTooLarge { amount: i64, limit: u32 },
    /// Offset leaves the representable calendar.
    DateOutOfRange { date: CalendarDate, days: i64 },
    /// Day-by-day scan did not settle within the configured cap.
    ScanLimitExceeded { limit: u32 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "day amount must be at least 1, got {amount}")
            }
            Self::InvalidStartDate(value) => write!(
                f,
                "invalid start date `{value}`; expected YYYY-MM-DD or DD/MM/YYYY"
            ),
            Self::AmountTooLarge { amount, limit } => {
                write!(f, "day amount {amount} exceeds the maximum of {limit}")
            }
            Self::DateOutOfRange { date, days } => {
                write!(f, "adding {days} day(s) to {date} leaves the supported calendar")
            }
            Self::ScanLimitExceeded { limit } => write!(
                f,
                "no business day found within {limit} scanned day(s); check the holiday list"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Fully parsed deadline calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineRequest {
    /// Day on which counting starts. Never itself counted.
    pub start: CalendarDate,
    /// Number of days to add. Must be >= 1.
    pub amount: i64,
    pub mode: CountingMode,
    pub holidays: HolidaySet,
    /// Calendar mode only: move a non-business end date forward.
    pub postpone_if_non_business: bool,
}

impl DeadlineRequest {
    /// Creates a request with no holidays and postponement disabled.
    pub fn new(start: CalendarDate, amount: i64, mode: CountingMode) -> Self {
        Self {
            start,
            amount,
            mode,
            holidays: HolidaySet::new(),
            postpone_if_non_business: false,
        }
    }

    pub fn with_holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_postponement(mut self, postpone: bool) -> Self {
        self.postpone_if_non_business = postpone;
        self
    }

    /// Validates request-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount < 1 {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

/// One annotated day of the computed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: CalendarDate,
    /// pt-BR weekday name, e.g. `segunda-feira`.
    pub weekday_name: String,
    pub is_business_day: bool,
    pub is_holiday: bool,
}

/// Successful deadline calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineResult {
    pub end_date: CalendarDate,
    /// Ascending; `(end_date - start)` entries.
    pub timeline: Vec<TimelineEntry>,
}

impl DeadlineResult {
    /// End date formatted for display (`DD/MM/YYYY`).
    pub fn formatted_end_date(&self) -> String {
        format_display_date(self.end_date)
    }

    /// Number of business days in the timeline.
    pub fn business_day_count(&self) -> usize {
        self.timeline
            .iter()
            .filter(|entry| entry.is_business_day)
            .count()
    }
}
