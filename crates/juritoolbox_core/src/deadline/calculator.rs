//! Deadline calculator.
//!
//! # Responsibility
//! - Implement the two-phase business-day rule: count forward, then correct
//!   forward.
//! - Implement calendar-day offsets with optional postponement.
//!
//! # Invariants
//! - The start date is never counted; results are strictly after `start`.
//! - Counting stops on the nth qualifying day; it never scans past it.
//! - Runs of consecutive non-business days longer than `max_scan_days` fail
//!   with `ValidationError::ScanLimitExceeded` instead of looping.

use crate::config::CalculatorConfig;
use crate::model::calendar::{is_weekend, weekday_name, CalendarDate, CountingMode, HolidaySet};
use crate::model::deadline::{DeadlineRequest, DeadlineResult, TimelineEntry, ValidationError};
use chrono::Days;
use log::debug;

/// Returns true iff `date` is a weekday (Monday..Friday) not in `holidays`.
///
/// Weekend holidays are excluded by both checks; the result is the same.
pub fn is_business_day(date: CalendarDate, holidays: &HolidaySet) -> bool {
    !is_weekend(date) && !holidays.contains(date)
}

/// Returns `start + days` calendar days with no weekday/holiday awareness.
///
/// Negative `days` move backwards, so `add_calendar_days(add_calendar_days(s, n)?, -n)`
/// recovers `s`.
pub fn add_calendar_days(start: CalendarDate, days: i64) -> Result<CalendarDate, ValidationError> {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        start.checked_add_days(magnitude)
    } else {
        start.checked_sub_days(magnitude)
    };
    shifted.ok_or(ValidationError::DateOutOfRange { date: start, days })
}

/// Adds `n` business days using the default limits.
pub fn add_business_days(
    start: CalendarDate,
    n: i64,
    holidays: &HolidaySet,
) -> Result<CalendarDate, ValidationError> {
    DeadlineCalculator::default().add_business_days(start, n, holidays)
}

/// Computes a deadline using the default limits.
pub fn compute_deadline(request: &DeadlineRequest) -> Result<DeadlineResult, ValidationError> {
    DeadlineCalculator::default().compute_deadline(request)
}

/// Stateless calculator parameterized by scan limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineCalculator {
    max_amount: u32,
    max_scan_days: u32,
}

impl Default for DeadlineCalculator {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl DeadlineCalculator {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            max_amount: config.max_amount,
            max_scan_days: config.max_scan_days,
        }
    }

    /// Adds `n` business days after `start`.
    ///
    /// # Contract
    /// - Phase 1 (`count_business_days`) picks the nth qualifying day.
    /// - Phase 2 (`postpone_to_business_day`) re-checks the candidate and moves
    ///   it forward while it is not a business day.
    /// - Returns `NonPositiveAmount` when `n < 1`.
    pub fn add_business_days(
        &self,
        start: CalendarDate,
        n: i64,
        holidays: &HolidaySet,
    ) -> Result<CalendarDate, ValidationError> {
        let candidate = self.count_business_days(start, n, holidays)?;
        self.postpone_to_business_day(candidate, holidays)
    }

    /// Phase 1: advances one day at a time and returns the nth business day.
    pub fn count_business_days(
        &self,
        start: CalendarDate,
        n: i64,
        holidays: &HolidaySet,
    ) -> Result<CalendarDate, ValidationError> {
        self.check_amount(n)?;

        let mut current = start;
        let mut counted = 0_i64;
        let mut gap = 0_u32;
        loop {
            current = next_day(current)?;
            if is_business_day(current, holidays) {
                counted += 1;
                gap = 0;
                if counted == n {
                    return Ok(current);
                }
            } else {
                gap += 1;
                if gap > self.max_scan_days {
                    return Err(ValidationError::ScanLimitExceeded {
                        limit: self.max_scan_days,
                    });
                }
            }
        }
    }

    /// Phase 2: returns `date` itself when it is a business day, otherwise the
    /// first business day after it.
    pub fn postpone_to_business_day(
        &self,
        date: CalendarDate,
        holidays: &HolidaySet,
    ) -> Result<CalendarDate, ValidationError> {
        let mut current = date;
        let mut advanced = 0_u32;
        while !is_business_day(current, holidays) {
            if advanced >= self.max_scan_days {
                return Err(ValidationError::ScanLimitExceeded {
                    limit: self.max_scan_days,
                });
            }
            current = next_day(current)?;
            advanced += 1;
        }
        if advanced > 0 {
            debug!(
                "event=deadline_postponed module=deadline status=ok from={} to={} days={}",
                date, current, advanced
            );
        }
        Ok(current)
    }

    /// Computes the end date and the annotated timeline for `request`.
    ///
    /// # Contract
    /// - `BusinessDays`: `add_business_days(start, amount, holidays)`.
    /// - `CalendarDays`: `start + amount`, then postponed only when
    ///   `postpone_if_non_business` is set.
    /// - Either a complete result or an error; never a partial timeline.
    pub fn compute_deadline(
        &self,
        request: &DeadlineRequest,
    ) -> Result<DeadlineResult, ValidationError> {
        request.validate()?;
        self.check_amount(request.amount)?;

        let end_date = match request.mode {
            CountingMode::BusinessDays => {
                self.add_business_days(request.start, request.amount, &request.holidays)?
            }
            CountingMode::CalendarDays => {
                let raw = add_calendar_days(request.start, request.amount)?;
                if request.postpone_if_non_business {
                    self.postpone_to_business_day(raw, &request.holidays)?
                } else {
                    raw
                }
            }
        };

        Ok(DeadlineResult {
            end_date,
            timeline: build_timeline(request.start, end_date, &request.holidays),
        })
    }

    fn check_amount(&self, amount: i64) -> Result<(), ValidationError> {
        if amount < 1 {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if amount > i64::from(self.max_amount) {
            return Err(ValidationError::AmountTooLarge {
                amount,
                limit: self.max_amount,
            });
        }
        Ok(())
    }
}

/// Builds one entry per day in `(start, end]`, ascending.
pub fn build_timeline(
    start: CalendarDate,
    end: CalendarDate,
    holidays: &HolidaySet,
) -> Vec<TimelineEntry> {
    start
        .iter_days()
        .skip(1)
        .take_while(|date| *date <= end)
        .map(|date| TimelineEntry {
            date,
            weekday_name: weekday_name(date).to_string(),
            is_business_day: is_business_day(date, holidays),
            is_holiday: holidays.contains(date),
        })
        .collect()
}

fn next_day(date: CalendarDate) -> Result<CalendarDate, ValidationError> {
    date.succ_opt()
        .ok_or(ValidationError::DateOutOfRange { date, days: 1 })
}

#[cfg(test)]
mod tests {
    use super::{
        add_business_days, add_calendar_days, build_timeline, is_business_day,
        DeadlineCalculator,
    };
    use crate::config::CalculatorConfig;
    use crate::model::calendar::HolidaySet;
    use crate::model::deadline::ValidationError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn weekend_holiday_is_excluded_once() {
        let sunday = date(2024, 1, 7);
        let holidays = HolidaySet::from_iter([sunday]);
        assert!(!is_business_day(sunday, &holidays));
        assert!(!is_business_day(sunday, &HolidaySet::new()));
    }

    #[test]
    fn counting_phase_stops_on_nth_business_day() {
        let calculator = DeadlineCalculator::default();
        // Thursday + 2 business days lands on Monday, not the weekend after it.
        let candidate = calculator
            .count_business_days(date(2024, 1, 4), 2, &HolidaySet::new())
            .expect("count should succeed");
        assert_eq!(candidate, date(2024, 1, 8));
    }

    #[test]
    fn postponement_phase_leaves_business_days_untouched() {
        let calculator = DeadlineCalculator::default();
        let holidays = HolidaySet::from_iter([date(2024, 1, 8)]);
        assert_eq!(
            calculator
                .postpone_to_business_day(date(2024, 1, 5), &holidays)
                .expect("friday is a business day"),
            date(2024, 1, 5)
        );
        assert_eq!(
            calculator
                .postpone_to_business_day(date(2024, 1, 6), &holidays)
                .expect("postponement should settle"),
            date(2024, 1, 9)
        );
    }

    #[test]
    fn business_days_skip_listed_holidays() {
        // 2024-01-01 is a Monday; Tuesday is a holiday.
        let holidays = HolidaySet::from_iter([date(2024, 1, 2)]);
        let end = add_business_days(date(2024, 1, 1), 1, &holidays).expect("should succeed");
        assert_eq!(end, date(2024, 1, 3));
    }

    #[test]
    fn holidays_covering_every_day_hit_scan_limit() {
        let config = CalculatorConfig {
            max_scan_days: 30,
            ..CalculatorConfig::default()
        };
        let calculator = DeadlineCalculator::new(&config);
        let start = date(2024, 1, 1);
        let holidays = start.iter_days().take(400).collect::<HolidaySet>();

        let err = calculator
            .count_business_days(start, 1, &holidays)
            .expect_err("starved search must fail");
        assert_eq!(err, ValidationError::ScanLimitExceeded { limit: 30 });

        let err = calculator
            .postpone_to_business_day(date(2024, 2, 1), &holidays)
            .expect_err("starved postponement must fail");
        assert_eq!(err, ValidationError::ScanLimitExceeded { limit: 30 });
    }

    #[test]
    fn amount_above_limit_is_rejected() {
        let config = CalculatorConfig {
            max_amount: 10,
            ..CalculatorConfig::default()
        };
        let err = DeadlineCalculator::new(&config)
            .count_business_days(date(2024, 1, 1), 11, &HolidaySet::new())
            .expect_err("amount above limit must fail");
        assert_eq!(
            err,
            ValidationError::AmountTooLarge {
                amount: 11,
                limit: 10
            }
        );
    }

    #[test]
    fn calendar_offset_reports_overflow() {
        let err = add_calendar_days(NaiveDate::MAX, 1).expect_err("overflow must fail");
        assert!(matches!(err, ValidationError::DateOutOfRange { days: 1, .. }));
    }

    #[test]
    fn timeline_is_empty_when_end_equals_start() {
        let day = date(2024, 1, 1);
        assert!(build_timeline(day, day, &HolidaySet::new()).is_empty());
    }
}
