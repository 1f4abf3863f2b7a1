//! Analysis configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir
//!    (~/.local/share/kosh/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::detect::DetectionConfig;
use crate::error::{Error, Result};
use crate::payoff::PayoffConfig;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Thresholds for the analysis algorithms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    pub detection: DetectionConfig,
    pub payoff: PayoffConfig,
}

impl AnalysisConfig {
    /// Load from an explicit path, the default override location, or the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(p) => {
                debug!("Loading analysis config from {}", p.display());
                fs::read_to_string(p).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", p.display(), e))
                })?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(p) => {
                    debug!("Loading analysis config override from {}", p.display());
                    fs::read_to_string(&p).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", p.display(), e))
                    })?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kosh").join("config").join("analysis.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    detection: Option<RawDetection>,
    payoff: Option<RawPayoff>,
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    min_occurrences: Option<usize>,
    interval_tolerance_days: Option<f64>,
    min_interval_days: Option<f64>,
    max_interval_days: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPayoff {
    max_months: Option<u32>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(detection) = raw.detection {
        if let Some(n) = detection.min_occurrences {
            config.detection.min_occurrences = n;
        }
        if let Some(days) = detection.interval_tolerance_days {
            config.detection.interval_tolerance_days = days;
        }
        if let Some(days) = detection.min_interval_days {
            config.detection.min_interval_days = days;
        }
        if let Some(days) = detection.max_interval_days {
            config.detection.max_interval_days = days;
        }
    }

    if let Some(payoff) = raw.payoff {
        if let Some(months) = payoff.max_months {
            config.payoff.max_months = months;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AnalysisConfig) -> Result<()> {
    let d = &config.detection;
    if d.min_occurrences < 2 {
        return Err(Error::Config(
            "detection.min_occurrences must be at least 2".to_string(),
        ));
    }
    if d.min_interval_days > d.max_interval_days {
        return Err(Error::Config(format!(
            "detection.min_interval_days ({}) exceeds max_interval_days ({})",
            d.min_interval_days, d.max_interval_days
        )));
    }
    if d.interval_tolerance_days < 0.0 {
        return Err(Error::Config(
            "detection.interval_tolerance_days must not be negative".to_string(),
        ));
    }
    if config.payoff.max_months == 0 {
        return Err(Error::Config("payoff.max_months must be positive".to_string()));
    }
    Ok(())
}
