//! Reporting configuration and the per-request context.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NEAR_DUE_WINDOW_DAYS: i64 = 7;

/// Environment variable overriding [`ReportingConfig::near_due_window_days`].
pub const ENV_NEAR_DUE_DAYS: &str = "BACKOFFICE_NEAR_DUE_DAYS";
/// Environment variable overriding [`ReportingConfig::tax_rate`].
pub const ENV_TAX_RATE: &str = "BACKOFFICE_TAX_RATE";

fn default_tax_rate() -> Decimal {
    // 19% VAT, prices are stored tax-inclusive.
    Decimal::new(19, 2)
}

fn default_window() -> i64 {
    DEFAULT_NEAR_DUE_WINDOW_DAYS
}

fn is_valid_window(days: i64) -> bool {
    days >= 0
}

/// A fraction in `0..1`.
fn is_valid_tax_rate(rate: Decimal) -> bool {
    !rate.is_sign_negative() && rate < Decimal::ONE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Pending documents due within this many days count as near-due.
    #[serde(default = "default_window")]
    pub near_due_window_days: i64,
    /// Tax rate embedded in gross prices, as a fraction (0.19 = 19%).
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            near_due_window_days: default_window(),
            tax_rate: default_tax_rate(),
        }
    }
}

impl ReportingConfig {
    /// Defaults overridden by `BACKOFFICE_*` environment variables.
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source (environment, tests).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_NEAR_DUE_DAYS) {
            match raw.trim().parse::<i64>() {
                Ok(days) if is_valid_window(days) => self.near_due_window_days = days,
                _ => tracing::warn!(
                    key = ENV_NEAR_DUE_DAYS,
                    value = %raw,
                    "ignoring invalid near-due window; keeping {}",
                    self.near_due_window_days
                ),
            }
        }

        if let Some(raw) = lookup(ENV_TAX_RATE) {
            match raw.trim().parse::<Decimal>() {
                Ok(rate) if is_valid_tax_rate(rate) => self.tax_rate = rate,
                _ => tracing::warn!(
                    key = ENV_TAX_RATE,
                    value = %raw,
                    "ignoring invalid tax rate; keeping {}",
                    self.tax_rate
                ),
            }
        }

        self
    }

    /// Reset out-of-range values (from a config file, say) to their defaults,
    /// with the same rules as [`ReportingConfig::with_overrides`].
    pub fn sanitized(mut self) -> Self {
        if !is_valid_window(self.near_due_window_days) {
            tracing::warn!(
                value = self.near_due_window_days,
                "ignoring invalid near-due window; using {}",
                DEFAULT_NEAR_DUE_WINDOW_DAYS
            );
            self.near_due_window_days = default_window();
        }

        if !is_valid_tax_rate(self.tax_rate) {
            tracing::warn!(
                value = %self.tax_rate,
                "ignoring invalid tax rate; using {}",
                default_tax_rate()
            );
            self.tax_rate = default_tax_rate();
        }

        self
    }
}

/// Request-scoped inputs every view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub today: NaiveDate,
    pub config: ReportingConfig,
}

impl ReportContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            config: ReportingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReportingConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_business_rules() {
        let cfg = ReportingConfig::default();
        assert_eq!(cfg.near_due_window_days, 7);
        assert_eq!(cfg.tax_rate, Decimal::new(19, 2));
    }

    #[test]
    fn overrides_apply_valid_values() {
        let cfg = ReportingConfig::default()
            .with_overrides(lookup(&[(ENV_NEAR_DUE_DAYS, "15"), (ENV_TAX_RATE, "0.10")]));
        assert_eq!(cfg.near_due_window_days, 15);
        assert_eq!(cfg.tax_rate, Decimal::new(10, 2));
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let cfg = ReportingConfig::default()
            .with_overrides(lookup(&[(ENV_NEAR_DUE_DAYS, "-3"), (ENV_TAX_RATE, "abc")]));
        assert_eq!(cfg, ReportingConfig::default());
    }

    #[test]
    fn sanitized_resets_out_of_range_values() {
        let cfg: ReportingConfig =
            serde_json::from_str(r#"{"near_due_window_days": -1, "tax_rate": "1.5"}"#).unwrap();
        assert_eq!(cfg.sanitized(), ReportingConfig::default());

        let negative_rate = ReportingConfig {
            near_due_window_days: 0,
            tax_rate: Decimal::new(-5, 2),
        }
        .sanitized();
        assert_eq!(negative_rate.near_due_window_days, 0);
        assert_eq!(negative_rate.tax_rate, Decimal::new(19, 2));
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let cfg: ReportingConfig =
            serde_json::from_str(r#"{"near_due_window_days": 30}"#).unwrap();
        assert_eq!(cfg.near_due_window_days, 30);
        assert_eq!(cfg.tax_rate, Decimal::new(19, 2));
    }
}
