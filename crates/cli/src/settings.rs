//! Reporting settings: defaults, then an optional JSON file, then
//! `BACKOFFICE_*` environment variables.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;

use backoffice_reporting::ReportingConfig;

pub fn load(config_path: Option<&Path>) -> anyhow::Result<ReportingConfig> {
    load_with(config_path, |key| std::env::var(key).ok())
}

pub fn load_with(
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ReportingConfig> {
    let base = match config_path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config file {}", path.display()))?;
            let parsed: ReportingConfig = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config file {}", path.display()))?;
            parsed.sanitized()
        }
        None => ReportingConfig::default(),
    };

    let config = base.with_overrides(lookup);
    tracing::debug!(
        near_due_window_days = config.near_due_window_days,
        tax_rate = %config.tax_rate,
        "reporting settings loaded"
    );
    Ok(config)
}
