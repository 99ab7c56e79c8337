//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the calculators to Dart via FRB as flat request/response calls.
//! - Flatten core errors into `ok=false` envelopes with readable messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Dates cross the boundary as ISO `YYYY-MM-DD` strings, plus a
//!   `DD/MM/YYYY` display copy where the UI shows them.

use juritoolbox_core::{
    assess_anpp, core_version as core_version_inner, estimate_sentence, format_display_date,
    init_logging as init_logging_inner, Aggravator, AnppInput, CalculatorConfig, CountingMode,
    DeadlineInput, DeadlineService, DosimetryInput, Reducer, DISCLAIMER,
};
use std::sync::OnceLock;

static CALCULATOR_CONFIG: OnceLock<CalculatorConfig> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Educational-use notice for the UI footer.
#[flutter_rust_bridge::frb(sync)]
pub fn disclaimer() -> String {
    DISCLAIMER.to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One timeline row for table display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    /// ISO date.
    pub date: String,
    /// `DD/MM/YYYY`.
    pub date_display: String,
    pub weekday: String,
    pub is_business_day: bool,
    pub is_holiday: bool,
}

/// Response envelope for deadline calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineResponse {
    pub ok: bool,
    /// Human-readable outcome or validation reason.
    pub message: String,
    /// ISO end date on success.
    pub end_date: Option<String>,
    /// `DD/MM/YYYY` end date on success.
    pub end_date_display: Option<String>,
    pub timeline: Vec<TimelineRow>,
    pub holidays_loaded: u32,
    pub dropped_holiday_rows: u32,
    /// Non-fatal holiday ingestion warning.
    pub holiday_warning: Option<String>,
}

impl DeadlineResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            end_date: None,
            end_date_display: None,
            timeline: Vec::new(),
            holidays_loaded: 0,
            dropped_holiday_rows: 0,
            holiday_warning: None,
        }
    }
}

/// Computes a deadline from form input.
///
/// Input semantics:
/// - `start`: `YYYY-MM-DD` or `DD/MM/YYYY`.
/// - `mode`: `business_days|calendar_days` (short `business|calendar` accepted).
/// - `holidays_csv`: uploaded file content, if any.
///
/// # FFI contract
/// - Sync call, CPU-only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn deadline_calculate(
    start: String,
    amount: i64,
    mode: String,
    postpone_if_non_business: bool,
    holidays_csv: Option<String>,
) -> DeadlineResponse {
    let Some(mode) = CountingMode::parse(&mode) else {
        return DeadlineResponse::failure(format!(
            "deadline_calculate failed: unsupported counting mode `{}`",
            mode.trim()
        ));
    };
    let input = DeadlineInput {
        start,
        amount,
        mode,
        postpone_if_non_business,
        holidays_csv,
    };

    match DeadlineService::new(calculator_config()).calculate(&input) {
        Ok(report) => {
            let end_date_display = report.result.formatted_end_date();
            DeadlineResponse {
                ok: true,
                message: format!("Prazo final: {end_date_display}."),
                end_date: Some(report.result.end_date.to_string()),
                end_date_display: Some(end_date_display),
                timeline: report
                    .result
                    .timeline
                    .into_iter()
                    .map(|entry| TimelineRow {
                        date: entry.date.to_string(),
                        date_display: format_display_date(entry.date),
                        weekday: entry.weekday_name,
                        is_business_day: entry.is_business_day,
                        is_holiday: entry.is_holiday,
                    })
                    .collect(),
                holidays_loaded: saturating_u32(report.holidays_loaded),
                dropped_holiday_rows: saturating_u32(report.dropped_holiday_rows),
                holiday_warning: report.holiday_warning.map(|warning| warning.to_string()),
            }
        }
        Err(err) => DeadlineResponse::failure(format!("deadline_calculate failed: {err}")),
    }
}

/// Response envelope for the ANPP checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnppResponse {
    pub ok: bool,
    pub eligible: bool,
    /// Stable impediment codes, in checklist order.
    pub reason_codes: Vec<String>,
    /// pt-BR impediment descriptions, aligned with `reason_codes`.
    pub reasons: Vec<String>,
    pub message: String,
}

/// Evaluates the ANPP eligibility checklist.
///
/// # FFI contract
/// - Sync call, CPU-only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn anpp_check(
    minimum_penalty_years: f64,
    violence_or_serious_threat: bool,
    formal_confession: bool,
    specific_recidivism: bool,
    habitual_offender: bool,
    heinous_or_domestic_violence: bool,
) -> AnppResponse {
    let input = AnppInput {
        minimum_penalty_years,
        violence_or_serious_threat,
        formal_confession,
        specific_recidivism,
        habitual_offender,
        heinous_or_domestic_violence,
    };
    match assess_anpp(&input) {
        Ok(assessment) => AnppResponse {
            ok: true,
            eligible: assessment.eligible,
            reason_codes: assessment
                .reasons
                .iter()
                .map(|reason| reason.code().to_string())
                .collect(),
            reasons: assessment
                .reason_lines()
                .into_iter()
                .map(str::to_string)
                .collect(),
            message: if assessment.eligible {
                "Elegível, em tese, ao ANPP (art. 28-A CPP).".to_string()
            } else {
                "Não elegível, em tese, ao ANPP (art. 28-A CPP).".to_string()
            },
        },
        Err(err) => AnppResponse {
            ok: false,
            eligible: false,
            reason_codes: Vec::new(),
            reasons: Vec::new(),
            message: format!("anpp_check failed: {err}"),
        },
    }
}

/// Response envelope for the sentencing estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct DosimetryResponse {
    pub ok: bool,
    pub base_years: f64,
    pub phase_one_years: f64,
    pub final_years: f64,
    pub rationale: Vec<String>,
    pub draft: String,
    pub message: String,
}

impl DosimetryResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            base_years: 0.0,
            phase_one_years: 0.0,
            final_years: 0.0,
            rationale: Vec::new(),
            draft: String::new(),
            message: message.into(),
        }
    }
}

/// Runs the simplified sentencing estimate.
///
/// Input semantics:
/// - `scores`: exactly eight values in -1..=1, in statutory order.
/// - `reducers` / `aggravators`: snake_case codes, e.g. `attempt`, `weapon_use`.
///
/// # FFI contract
/// - Sync call, CPU-only.
/// - Never panics; unknown codes fail the call.
#[flutter_rust_bridge::frb(sync)]
pub fn dosimetry_estimate(
    min_years: f64,
    max_years: f64,
    scores: Vec<i32>,
    reducers: Vec<String>,
    aggravators: Vec<String>,
) -> DosimetryResponse {
    match build_dosimetry_input(min_years, max_years, &scores, &reducers, &aggravators) {
        Ok(input) => match estimate_sentence(&input) {
            Ok(result) => DosimetryResponse {
                ok: true,
                message: format!("Pena provisória (didática): {:.2} anos.", result.final_years),
                base_years: result.base_years,
                phase_one_years: result.phase_one_years,
                final_years: result.final_years,
                rationale: result.rationale,
                draft: result.draft,
            },
            Err(err) => DosimetryResponse::failure(format!("dosimetry_estimate failed: {err}")),
        },
        Err(message) => DosimetryResponse::failure(format!("dosimetry_estimate failed: {message}")),
    }
}

fn build_dosimetry_input(
    min_years: f64,
    max_years: f64,
    scores: &[i32],
    reducers: &[String],
    aggravators: &[String],
) -> Result<DosimetryInput, String> {
    let mut input = DosimetryInput::neutral(min_years, max_years);
    if scores.len() != input.circumstances.len() {
        return Err(format!("expected 8 circumstance scores, got {}", scores.len()));
    }
    for (slot, score) in input.circumstances.iter_mut().zip(scores) {
        // Out-of-range values are left for core validation to report.
        *slot = i8::try_from(*score).unwrap_or(i8::MAX);
    }
    input.reducers = reducers
        .iter()
        .map(|code| Reducer::from_code(code).ok_or_else(|| format!("unknown reducer `{code}`")))
        .collect::<Result<_, _>>()?;
    input.aggravators = aggravators
        .iter()
        .map(|code| {
            Aggravator::from_code(code).ok_or_else(|| format!("unknown aggravator `{code}`"))
        })
        .collect::<Result<_, _>>()?;
    Ok(input)
}

fn calculator_config() -> &'static CalculatorConfig {
    CALCULATOR_CONFIG.get_or_init(CalculatorConfig::from_env)
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        anpp_check, core_version, deadline_calculate, dosimetry_estimate, init_logging,
    };

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn deadline_calculate_returns_iso_and_display_dates() {
        let response = deadline_calculate(
            "2024-01-01".to_string(),
            5,
            "business_days".to_string(),
            false,
            None,
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.end_date.as_deref(), Some("2024-01-08"));
        assert_eq!(response.end_date_display.as_deref(), Some("08/01/2024"));
        assert_eq!(response.timeline.len(), 7);
        assert_eq!(response.timeline[0].weekday, "terça-feira");
    }

    #[test]
    fn deadline_calculate_surfaces_holiday_warning_without_failing() {
        let response = deadline_calculate(
            "01/01/2024".to_string(),
            6,
            "calendar".to_string(),
            true,
            Some("isto não é uma data\n".to_string()),
        );
        assert!(response.ok, "{}", response.message);
        assert!(response.holiday_warning.is_some());
        assert_eq!(response.end_date.as_deref(), Some("2024-01-08"));
    }

    #[test]
    fn deadline_calculate_rejects_zero_amount_and_unknown_mode() {
        let response = deadline_calculate(
            "2024-01-01".to_string(),
            0,
            "business_days".to_string(),
            false,
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("at least 1"));
        assert!(response.timeline.is_empty());

        let response =
            deadline_calculate("2024-01-01".to_string(), 3, "weeks".to_string(), false, None);
        assert!(!response.ok);
        assert!(response.message.contains("weeks"));
    }

    #[test]
    fn anpp_check_reports_codes_and_reasons() {
        let response = anpp_check(5.0, false, true, false, false, false);
        assert!(response.ok);
        assert!(!response.eligible);
        assert_eq!(response.reason_codes, vec!["minimum_penalty_too_high"]);
        assert_eq!(response.reasons.len(), 1);
    }

    #[test]
    fn dosimetry_estimate_parses_codes_and_rejects_unknown_ones() {
        let response = dosimetry_estimate(
            1.0,
            5.0,
            vec![0; 8],
            vec!["attempt".to_string()],
            vec!["weapon_use".to_string()],
        );
        assert!(response.ok, "{}", response.message);
        assert!((response.final_years - 3.0 * 0.67 * 1.2).abs() < 1e-9);

        let response = dosimetry_estimate(1.0, 5.0, vec![0; 8], vec!["pardon".to_string()], vec![]);
        assert!(!response.ok);
        assert!(response.message.contains("pardon"));

        let response = dosimetry_estimate(1.0, 5.0, vec![0; 7], vec![], vec![]);
        assert!(!response.ok);

        let response = dosimetry_estimate(1.0, 5.0, vec![0, 0, 0, 0, 0, 0, 0, 300], vec![], vec![]);
        assert!(!response.ok);
    }
}
