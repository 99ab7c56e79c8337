//! Calculator configuration.
//!
//! # Responsibility
//! - Hold the iteration caps that keep every day-by-day loop bounded.
//! - Resolve overrides from the process environment.
//!
//! # Invariants
//! - Both limits are always >= 1; invalid overrides fall back to defaults.

use log::warn;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`CalculatorConfig::max_scan_days`].
pub const MAX_SCAN_DAYS_ENV: &str = "JURITOOLBOX_MAX_SCAN_DAYS";
/// Environment variable overriding [`CalculatorConfig::max_amount`].
pub const MAX_AMOUNT_ENV: &str = "JURITOOLBOX_MAX_AMOUNT";

pub const DEFAULT_MAX_SCAN_DAYS: u32 = 366;
pub const DEFAULT_MAX_AMOUNT: u32 = 3660;

/// Limits applied by `DeadlineCalculator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Longest run of consecutive non-business days tolerated while counting
    /// or postponing.
    pub max_scan_days: u32,
    /// Largest accepted day amount.
    pub max_amount: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_scan_days: DEFAULT_MAX_SCAN_DAYS,
            max_amount: DEFAULT_MAX_AMOUNT,
        }
    }
}

impl CalculatorConfig {
    /// Builds a config from environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Blank, non-numeric and zero values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_scan_days: read_limit(&lookup, MAX_SCAN_DAYS_ENV)
                .unwrap_or(defaults.max_scan_days),
            max_amount: read_limit(&lookup, MAX_AMOUNT_ENV).unwrap_or(defaults.max_amount),
        }
    }
}

fn read_limit(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u32> {
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(
                "event=config_override_ignored module=config status=degraded key={}",
                key
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CalculatorConfig, DEFAULT_MAX_SCAN_DAYS, MAX_AMOUNT_ENV, MAX_SCAN_DAYS_ENV};

    #[test]
    fn lookup_overrides_valid_values() {
        let config = CalculatorConfig::from_lookup(|key| match key {
            MAX_SCAN_DAYS_ENV => Some(" 45 ".to_string()),
            MAX_AMOUNT_ENV => Some("100".to_string()),
            _ => None,
        });
        assert_eq!(config.max_scan_days, 45);
        assert_eq!(config.max_amount, 100);
    }

    #[test]
    fn lookup_ignores_zero_blank_and_garbage() {
        for raw in ["0", "", "  ", "-4", "many"] {
            let config = CalculatorConfig::from_lookup(|key| {
                (key == MAX_SCAN_DAYS_ENV).then(|| raw.to_string())
            });
            assert_eq!(config.max_scan_days, DEFAULT_MAX_SCAN_DAYS, "raw={raw:?}");
        }
    }

    #[test]
    fn partial_serialized_config_uses_defaults() {
        let config: CalculatorConfig =
            serde_json::from_str(r#"{"max_scan_days": 10}"#).expect("config should parse");
        assert_eq!(config.max_scan_days, 10);
        assert_eq!(config.max_amount, CalculatorConfig::default().max_amount);
    }
}
