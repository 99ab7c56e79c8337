//! ANPP eligibility checklist (art. 28-A CPP, simplified).
//!
//! # Responsibility
//! - Evaluate the educational impediment rules for a non-prosecution
//!   agreement.
//! - Return every violated rule, in a stable order, with a pt-BR reason.
//!
//! # Invariants
//! - `eligible == reasons.is_empty()`.
//! - Rules are independent; one violation never hides another.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum penalty (years) from which the agreement is barred.
pub const MINIMUM_PENALTY_CEILING_YEARS: f64 = 4.0;

/// Checklist answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnppInput {
    /// Minimum statutory penalty, in years.
    pub minimum_penalty_years: f64,
    pub violence_or_serious_threat: bool,
    pub formal_confession: bool,
    pub specific_recidivism: bool,
    pub habitual_offender: bool,
    pub heinous_or_domestic_violence: bool,
}

impl Default for AnppInput {
    fn default() -> Self {
        Self {
            minimum_penalty_years: 1.0,
            violence_or_serious_threat: false,
            formal_confession: true,
            specific_recidivism: false,
            habitual_offender: false,
            heinous_or_domestic_violence: false,
        }
    }
}

/// One violated eligibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnppImpediment {
    MinimumPenaltyTooHigh,
    ViolenceOrSeriousThreat,
    MissingConfession,
    SpecificRecidivism,
    HabitualOffender,
    HeinousOrDomesticViolence,
}

impl AnppImpediment {
    /// Stable machine code.
    pub fn code(self) -> &'static str {
        match self {
            Self::MinimumPenaltyTooHigh => "minimum_penalty_too_high",
            Self::ViolenceOrSeriousThreat => "violence_or_serious_threat",
            Self::MissingConfession => "missing_confession",
            Self::SpecificRecidivism => "specific_recidivism",
            Self::HabitualOffender => "habitual_offender",
            Self::HeinousOrDomesticViolence => "heinous_or_domestic_violence",
        }
    }

    /// pt-BR reason shown to the user.
    pub fn description(self) -> &'static str {
        match self {
            Self::MinimumPenaltyTooHigh => "Pena mínima igual ou superior a 4 anos.",
            Self::ViolenceOrSeriousThreat => "Crime com violência ou grave ameaça.",
            Self::MissingConfession => "Ausência de confissão formal/circunstancial.",
            Self::SpecificRecidivism => "Reincidência específica em crime doloso.",
            Self::HabitualOffender => "Habitualidade/profissionalidade (reiteração delitiva).",
            Self::HeinousOrDomesticViolence => {
                "Crime hediondo/equiparado ou violência doméstica grave."
            }
        }
    }
}

/// Checklist outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnppAssessment {
    pub eligible: bool,
    /// Violated rules in checklist order.
    pub reasons: Vec<AnppImpediment>,
}

impl AnppAssessment {
    /// Reason lines for display.
    pub fn reason_lines(&self) -> Vec<&'static str> {
        self.reasons.iter().map(|reason| reason.description()).collect()
    }
}

/// Invalid checklist input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnppInputError {
    /// Minimum penalty is negative or not a finite number.
    InvalidMinimumPenalty(f64),
}

impl Display for AnppInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMinimumPenalty(value) => write!(
                f,
                "minimum penalty must be a non-negative number of years, got {value}"
            ),
        }
    }
}

impl Error for AnppInputError {}

/// Evaluates the checklist.
pub fn assess_anpp(input: &AnppInput) -> Result<AnppAssessment, AnppInputError> {
    let penalty = input.minimum_penalty_years;
    if !penalty.is_finite() || penalty < 0.0 {
        return Err(AnppInputError::InvalidMinimumPenalty(penalty));
    }

    let checks = [
        (
            penalty >= MINIMUM_PENALTY_CEILING_YEARS,
            AnppImpediment::MinimumPenaltyTooHigh,
        ),
        (
            input.violence_or_serious_threat,
            AnppImpediment::ViolenceOrSeriousThreat,
        ),
        (!input.formal_confession, AnppImpediment::MissingConfession),
        (input.specific_recidivism, AnppImpediment::SpecificRecidivism),
        (input.habitual_offender, AnppImpediment::HabitualOffender),
        (
            input.heinous_or_domestic_violence,
            AnppImpediment::HeinousOrDomesticViolence,
        ),
    ];
    let reasons = checks
        .into_iter()
        .filter_map(|(violated, impediment)| violated.then_some(impediment))
        .collect::<Vec<_>>();

    Ok(AnppAssessment {
        eligible: reasons.is_empty(),
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::{assess_anpp, AnppImpediment, AnppInput, AnppInputError};

    #[test]
    fn penalty_ceiling_is_inclusive() {
        let below = AnppInput {
            minimum_penalty_years: 3.5,
            ..AnppInput::default()
        };
        assert!(assess_anpp(&below).expect("valid input").eligible);

        let at = AnppInput {
            minimum_penalty_years: 4.0,
            ..AnppInput::default()
        };
        let assessment = assess_anpp(&at).expect("valid input");
        assert!(!assessment.eligible);
        assert_eq!(assessment.reasons, vec![AnppImpediment::MinimumPenaltyTooHigh]);
    }

    #[test]
    fn nan_penalty_is_rejected() {
        let input = AnppInput {
            minimum_penalty_years: f64::NAN,
            ..AnppInput::default()
        };
        assert!(matches!(
            assess_anpp(&input),
            Err(AnppInputError::InvalidMinimumPenalty(_))
        ));
    }

    #[test]
    fn impediment_codes_match_serde_names() {
        let json = serde_json::to_value(AnppImpediment::MissingConfession).expect("serialize");
        assert_eq!(json, AnppImpediment::MissingConfession.code());
    }
}
