//! Simplified sentencing estimate (art. 59 CP, illustrative percentages).
//!
//! # Responsibility
//! - Derive a base penalty from the statutory range.
//! - Apply judicial circumstances (phase 1) and selected reducers/aggravators
//!   (phase 2), clamping each phase to the statutory range.
//! - Render a pt-BR rationale draft.
//!
//! # Invariants
//! - `min_years <= phase_one_years, final_years <= max_years`.
//! - Each circumstance scores -1 (unfavourable, +10 %), 0, or +1
//!   (favourable, -10 %).
//! - Each reducer and aggravator applies at most once, however often it is
//!   selected.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Percentage applied per circumstance point.
pub const CIRCUMSTANCE_STEP_PCT: i32 = 10;

/// Judicial circumstances, in statutory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Circumstance {
    Culpability,
    CriminalRecord,
    SocialConduct,
    Personality,
    Motives,
    Circumstances,
    Consequences,
    VictimBehaviour,
}

impl Circumstance {
    pub const ALL: [Circumstance; 8] = [
        Self::Culpability,
        Self::CriminalRecord,
        Self::SocialConduct,
        Self::Personality,
        Self::Motives,
        Self::Circumstances,
        Self::Consequences,
        Self::VictimBehaviour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Culpability => "Culpabilidade",
            Self::CriminalRecord => "Antecedentes",
            Self::SocialConduct => "Conduta social",
            Self::Personality => "Personalidade",
            Self::Motives => "Motivos",
            Self::Circumstances => "Circunstâncias",
            Self::Consequences => "Consequências",
            Self::VictimBehaviour => "Comportamento da vítima",
        }
    }
}

/// Penalty reducers (minorantes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    SpontaneousConfession,
    Attempt,
    RelativeMinority,
    MinorParticipation,
}

impl Reducer {
    pub const ALL: [Reducer; 4] = [
        Self::SpontaneousConfession,
        Self::Attempt,
        Self::RelativeMinority,
        Self::MinorParticipation,
    ];

    /// Stable snake_case code, matching the serde name.
    pub fn code(self) -> &'static str {
        match self {
            Self::SpontaneousConfession => "spontaneous_confession",
            Self::Attempt => "attempt",
            Self::RelativeMinority => "relative_minority",
            Self::MinorParticipation => "minor_participation",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|reducer| reducer.code() == value)
    }

    /// Signed percentage change.
    pub fn percent(self) -> i32 {
        match self {
            Self::SpontaneousConfession => -10,
            Self::Attempt => -33,
            Self::RelativeMinority => -5,
            Self::MinorParticipation => -20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SpontaneousConfession => "Confissão espontânea",
            Self::Attempt => "Tentativa",
            Self::RelativeMinority => "Menoridade relativa",
            Self::MinorParticipation => "Participação de menor importância",
        }
    }
}

/// Penalty aggravators (majorantes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggravator {
    ConcertOfAgents,
    WeaponUse,
    FutileOrBaseMotive,
    VulnerableVictim,
}

impl Aggravator {
    pub const ALL: [Aggravator; 4] = [
        Self::ConcertOfAgents,
        Self::WeaponUse,
        Self::FutileOrBaseMotive,
        Self::VulnerableVictim,
    ];

    /// Stable snake_case code, matching the serde name.
    pub fn code(self) -> &'static str {
        match self {
            Self::ConcertOfAgents => "concert_of_agents",
            Self::WeaponUse => "weapon_use",
            Self::FutileOrBaseMotive => "futile_or_base_motive",
            Self::VulnerableVictim => "vulnerable_victim",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|aggravator| aggravator.code() == value)
    }

    /// Signed percentage change.
    pub fn percent(self) -> i32 {
        match self {
            Self::ConcertOfAgents => 20,
            Self::WeaponUse => 20,
            Self::FutileOrBaseMotive => 30,
            Self::VulnerableVictim => 50,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ConcertOfAgents => "Concurso de agentes",
            Self::WeaponUse => "Emprego de arma",
            Self::FutileOrBaseMotive => "Motivo fútil/torpe",
            Self::VulnerableVictim => "Crime contra vulnerável",
        }
    }
}

/// Estimator input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosimetryInput {
    pub min_years: f64,
    pub max_years: f64,
    /// Scores in [`Circumstance::ALL`] order.
    pub circumstances: [i8; 8],
    #[serde(default)]
    pub reducers: Vec<Reducer>,
    #[serde(default)]
    pub aggravators: Vec<Aggravator>,
}

impl DosimetryInput {
    /// Input with all circumstances neutral and nothing selected.
    pub fn neutral(min_years: f64, max_years: f64) -> Self {
        Self {
            min_years,
            max_years,
            circumstances: [0; 8],
            reducers: Vec::new(),
            aggravators: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), DosimetryInputError> {
        for bound in [self.min_years, self.max_years] {
            if !bound.is_finite() || bound < 0.0 {
                return Err(DosimetryInputError::InvalidBound(bound));
            }
        }
        if self.max_years < self.min_years {
            return Err(DosimetryInputError::InvertedRange {
                min: self.min_years,
                max: self.max_years,
            });
        }
        for (circumstance, score) in Circumstance::ALL.iter().zip(self.circumstances) {
            if !(-1..=1).contains(&score) {
                return Err(DosimetryInputError::ScoreOutOfRange {
                    circumstance: *circumstance,
                    score,
                });
            }
        }
        Ok(())
    }
}

/// Invalid estimator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DosimetryInputError {
    /// Bound is negative or not a finite number.
    InvalidBound(f64),
    /// Maximum is below minimum.
    InvertedRange { min: f64, max: f64 },
    /// Circumstance score outside -1..=1.
    ScoreOutOfRange {
        circumstance: Circumstance,
        score: i8,
    },
}

impl Display for DosimetryInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBound(value) => {
                write!(f, "penalty bounds must be non-negative numbers, got {value}")
            }
            Self::InvertedRange { min, max } => write!(
                f,
                "maximum penalty ({max:.2}) must not be lower than minimum penalty ({min:.2})"
            ),
            Self::ScoreOutOfRange {
                circumstance,
                score,
            } => write!(
                f,
                "score for `{}` must be -1, 0 or 1, got {score}",
                circumstance.label()
            ),
        }
    }
}

impl Error for DosimetryInputError {}

/// Estimator output. All values in years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosimetryResult {
    pub base_years: f64,
    pub phase_one_years: f64,
    pub final_years: f64,
    /// One line per circumstance, in statutory order.
    pub rationale: Vec<String>,
    /// Multi-line pt-BR draft summarizing the estimate.
    pub draft: String,
}

/// Converts a signed percentage into a multiplicative factor.
pub fn pct_to_factor(pct: i32) -> f64 {
    1.0 + f64::from(pct) / 100.0
}

/// Runs the two-phase estimate.
pub fn estimate_sentence(input: &DosimetryInput) -> Result<DosimetryResult, DosimetryInputError> {
    input.validate()?;
    let (min, max) = (input.min_years, input.max_years);

    let base_years = (min + max) / 2.0;
    let total: i32 = input.circumstances.iter().map(|score| i32::from(*score)).sum();
    // Unfavourable scores are negative and must raise the penalty.
    let phase_one_factor = pct_to_factor(-total * CIRCUMSTANCE_STEP_PCT);
    let phase_one_years = (base_years * phase_one_factor).clamp(min, max);

    let reducers = first_occurrences(&input.reducers);
    let aggravators = first_occurrences(&input.aggravators);
    let adjusted = reducers
        .iter()
        .map(|reducer| reducer.percent())
        .chain(aggravators.iter().map(|aggravator| aggravator.percent()))
        .fold(phase_one_years, |value, pct| value * pct_to_factor(pct));
    let final_years = adjusted.clamp(min, max);

    let rationale = Circumstance::ALL
        .iter()
        .zip(input.circumstances)
        .map(|(circumstance, score)| rationale_line(*circumstance, score))
        .collect::<Vec<_>>();
    let draft = render_draft(min, max, base_years, phase_one_years, final_years, &rationale);

    Ok(DosimetryResult {
        base_years,
        phase_one_years,
        final_years,
        rationale,
        draft,
    })
}

fn first_occurrences<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(*item);
        }
    }
    unique
}

fn rationale_line(circumstance: Circumstance, score: i8) -> String {
    let label = circumstance.label();
    match score {
        -1 => format!("{label}: desfavorável (+{CIRCUMSTANCE_STEP_PCT} %)."),
        1 => format!("{label}: favorável (−{CIRCUMSTANCE_STEP_PCT} %)."),
        _ => format!("{label}: neutra."),
    }
}

fn render_draft(
    min: f64,
    max: f64,
    base: f64,
    phase_one: f64,
    final_years: f64,
    rationale: &[String],
) -> String {
    format!(
        "Pena-base entre {min:.2} e {max:.2} anos; adotada a média ({base:.2} anos).\n\
         Art. 59 CP:\n\
         - {}\n\
         \n\
         Após a 1ª fase, pena provisória: {phase_one:.2} anos (ilustrativa).\n\
         Aplicadas minorantes/majorantes selecionadas (percentuais pedagógicos).\n\
         Pena resultante (limitada ao tipo): {final_years:.2} anos.",
        rationale.join("\n- ")
    )
}

#[cfg(test)]
mod tests {
    use super::{pct_to_factor, rationale_line, Aggravator, Circumstance, Reducer};

    #[test]
    fn codes_match_serde_names_and_parse_back() {
        for reducer in Reducer::ALL {
            let json = serde_json::to_value(reducer).expect("serialize reducer");
            assert_eq!(json, reducer.code());
            assert_eq!(Reducer::from_code(reducer.code()), Some(reducer));
        }
        for aggravator in Aggravator::ALL {
            let json = serde_json::to_value(aggravator).expect("serialize aggravator");
            assert_eq!(json, aggravator.code());
            assert_eq!(Aggravator::from_code(aggravator.code()), Some(aggravator));
        }
        assert_eq!(Reducer::from_code("pardon"), None);
    }

    #[test]
    fn pct_to_factor_handles_signs() {
        assert!((pct_to_factor(-33) - 0.67).abs() < 1e-9);
        assert!((pct_to_factor(50) - 1.5).abs() < 1e-9);
        assert!((pct_to_factor(0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rationale_lines_follow_score_sign() {
        assert_eq!(
            rationale_line(Circumstance::Motives, -1),
            "Motivos: desfavorável (+10 %)."
        );
        assert_eq!(
            rationale_line(Circumstance::Motives, 1),
            "Motivos: favorável (−10 %)."
        );
        assert_eq!(rationale_line(Circumstance::Motives, 0), "Motivos: neutra.");
    }
}
