//! Deadline use-case service.
//!
//! # Responsibility
//! - Parse raw start-date text and holiday uploads.
//! - Run the calculator and package result plus ingestion diagnostics.
//!
//! # Invariants
//! - Holiday problems never fail a calculation; they surface as warnings.
//! - Validation problems always fail it; no partial report is produced.

use crate::config::CalculatorConfig;
use crate::deadline::calculator::DeadlineCalculator;
use crate::holiday::import::{import_holidays_str, HolidayImport, HolidayParseError};
use crate::model::calendar::{parse_calendar_date, CountingMode};
use crate::model::deadline::{DeadlineRequest, DeadlineResult, ValidationError};
use log::{info, warn};

/// Raw calculation input as captured by a form or command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineInput {
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub start: String,
    pub amount: i64,
    pub mode: CountingMode,
    pub postpone_if_non_business: bool,
    /// Uploaded tabular holiday data, if any.
    pub holidays_csv: Option<String>,
}

/// Successful calculation plus holiday ingestion diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineReport {
    pub result: DeadlineResult,
    /// Distinct holiday dates used.
    pub holidays_loaded: usize,
    pub dropped_holiday_rows: usize,
    pub holiday_warning: Option<HolidayParseError>,
}

/// Deadline service facade.
#[derive(Debug, Clone, Default)]
pub struct DeadlineService {
    calculator: DeadlineCalculator,
}

impl DeadlineService {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            calculator: DeadlineCalculator::new(config),
        }
    }

    /// Calculates using `input.holidays_csv` as holiday source.
    pub fn calculate(&self, input: &DeadlineInput) -> Result<DeadlineReport, ValidationError> {
        let holidays = match input.holidays_csv.as_deref() {
            Some(data) => import_holidays_str(data),
            None => HolidayImport::empty(),
        };
        self.calculate_with_import(input, holidays)
    }

    /// Calculates using an already ingested holiday list.
    ///
    /// `input.holidays_csv` is ignored.
    pub fn calculate_with_import(
        &self,
        input: &DeadlineInput,
        holidays: HolidayImport,
    ) -> Result<DeadlineReport, ValidationError> {
        let outcome = self.run(input, holidays);
        match &outcome {
            Ok(report) => info!(
                "event=deadline_computed module=deadline status=ok mode={} amount={} postpone={} holidays={} dropped_rows={} end={}",
                input.mode.as_str(),
                input.amount,
                input.postpone_if_non_business,
                report.holidays_loaded,
                report.dropped_holiday_rows,
                report.result.end_date
            ),
            Err(err) => warn!(
                "event=deadline_rejected module=deadline status=error mode={} reason={}",
                input.mode.as_str(),
                rejection_reason(err)
            ),
        }
        outcome
    }

    fn run(
        &self,
        input: &DeadlineInput,
        holidays: HolidayImport,
    ) -> Result<DeadlineReport, ValidationError> {
        let start = parse_calendar_date(&input.start)
            .ok_or_else(|| ValidationError::InvalidStartDate(input.start.trim().to_string()))?;

        let HolidayImport {
            holidays,
            dropped_rows,
            warning,
            ..
        } = holidays;
        let holidays_loaded = holidays.len();

        let request = DeadlineRequest::new(start, input.amount, input.mode)
            .with_holidays(holidays)
            .with_postponement(input.postpone_if_non_business);
        let result = self.calculator.compute_deadline(&request)?;

        Ok(DeadlineReport {
            result,
            holidays_loaded,
            dropped_holiday_rows: dropped_rows,
            holiday_warning: warning,
        })
    }
}

fn rejection_reason(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::NonPositiveAmount(_) => "non_positive_amount",
        ValidationError::AmountTooLarge { .. } => "amount_too_large",
        ValidationError::InvalidStartDate(_) => "invalid_start_date",
        ValidationError::DateOutOfRange { .. } => "date_out_of_range",
        ValidationError::ScanLimitExceeded { .. } => "scan_limit_exceeded",
    }
}

#[cfg(test)]
mod tests {
    use super::{rejection_reason, DeadlineInput, DeadlineService};
    use crate::model::calendar::CountingMode;
    use crate::model::deadline::ValidationError;

    fn input(start: &str, amount: i64) -> DeadlineInput {
        DeadlineInput {
            start: start.to_string(),
            amount,
            mode: CountingMode::BusinessDays,
            postpone_if_non_business: false,
            holidays_csv: None,
        }
    }

    #[test]
    fn start_date_accepts_brazilian_format() {
        let report = DeadlineService::default()
            .calculate(&input("01/01/2024", 5))
            .expect("calculation should succeed");
        assert_eq!(report.result.formatted_end_date(), "08/01/2024");
    }

    #[test]
    fn malformed_start_is_rejected_with_trimmed_text() {
        let err = DeadlineService::default()
            .calculate(&input(" 2024-13-01 ", 5))
            .expect_err("month 13 must fail");
        assert_eq!(err, ValidationError::InvalidStartDate("2024-13-01".to_string()));
        assert_eq!(rejection_reason(&err), "invalid_start_date");
    }
}
