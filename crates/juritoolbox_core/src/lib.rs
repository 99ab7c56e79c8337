//! Core calculation logic for JuriToolbox.
//! This crate is the single source of truth for every calculation rule;
//! presentation layers (console, UI bridge) only parse input and render output.

pub mod config;
pub mod deadline;
pub mod eligibility;
pub mod holiday;
pub mod logging;
pub mod model;
pub mod sentencing;
pub mod service;

pub use config::CalculatorConfig;
pub use deadline::calculator::{
    add_business_days, add_calendar_days, build_timeline, compute_deadline, is_business_day,
    DeadlineCalculator,
};
pub use eligibility::anpp::{
    assess_anpp, AnppAssessment, AnppImpediment, AnppInput, AnppInputError,
};
pub use holiday::import::{import_holidays, import_holidays_str, HolidayImport, HolidayParseError};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::calendar::{
    format_display_date, parse_calendar_date, weekday_name, CalendarDate, CountingMode,
    HolidaySet,
};
pub use model::deadline::{DeadlineRequest, DeadlineResult, TimelineEntry, ValidationError};
pub use sentencing::dosimetry::{
    estimate_sentence, Aggravator, Circumstance, DosimetryInput, DosimetryInputError,
    DosimetryResult, Reducer,
};
pub use service::deadline_service::{DeadlineInput, DeadlineReport, DeadlineService};

/// Educational-use notice shown by every presentation layer.
pub const DISCLAIMER: &str =
    "Uso acadêmico. Sempre confira a legislação e a jurisprudência atualizadas.";

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, DISCLAIMER};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn disclaimer_mentions_legislation() {
        assert!(DISCLAIMER.contains("legislação"));
    }
}
