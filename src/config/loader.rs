//! Loading configuration from `benchlight.toml`.
//!
//! Parse failures are hard errors; semantically invalid sections are warned
//! about and replaced with defaults so a bad override never silently changes
//! the engine's calibration.

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::thresholds::{DiagnosisThresholds, SolverBoundsConfig};
use super::EngineConfig;
use crate::errors::EngineError;

/// Parse and validate config from a TOML string.
pub fn parse_and_validate_config(contents: &str) -> Result<EngineConfig, EngineError> {
    let mut config: EngineConfig =
        toml::from_str(contents).map_err(|e| EngineError::ConfigParse(e.to_string()))?;

    if let Err(e) = validate_thresholds(&config.thresholds) {
        log::warn!("invalid [thresholds] section: {e}; using defaults");
        config.thresholds = DiagnosisThresholds::default();
    }
    if let Err(e) = validate_solver(&config.solver) {
        log::warn!("invalid [solver] section: {e}; using defaults");
        config.solver = SolverBoundsConfig::default();
    }

    Ok(config)
}

/// Load configuration from a file path.
pub fn load_from_path(path: &Path) -> anyhow::Result<EngineConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    Ok(parse_and_validate_config(&contents)?)
}

/// Try loading from a path, falling back to defaults on any failure.
pub fn try_load_config_from_path(path: &Path) -> EngineConfig {
    match load_from_path(path) {
        Ok(config) => {
            log::debug!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{e:#}; using default config");
            EngineConfig::default()
        }
    }
}

fn validate_thresholds(t: &DiagnosisThresholds) -> Result<(), EngineError> {
    if t.weak_deviation_pct <= 0.0 || !t.weak_deviation_pct.is_finite() {
        return Err(EngineError::config_validation(
            "weak_deviation_pct must be a positive number",
        ));
    }
    if t.budget_floor < 0.0 || t.budget_constrained_ceiling < t.budget_floor {
        return Err(EngineError::config_validation(
            "budget_constrained_ceiling must be >= budget_floor >= 0",
        ));
    }
    if t.tracking_cr_multiplier <= 0.0 || t.tracking_cr_floor < 0.0 {
        return Err(EngineError::config_validation(
            "tracking sanity thresholds must be positive",
        ));
    }
    Ok(())
}

fn validate_solver(s: &SolverBoundsConfig) -> Result<(), EngineError> {
    let multipliers = [
        s.budget_max_multiple,
        s.cpc_low_multiplier,
        s.cpc_high_multiplier,
        s.cr_low_multiplier,
        s.cr_high_multiplier,
        s.fallback_low_multiplier,
        s.fallback_high_multiplier,
    ];
    if multipliers.iter().any(|m| *m <= 0.0 || !m.is_finite()) {
        return Err(EngineError::config_validation(
            "solver multipliers must be positive",
        ));
    }
    if s.cr_cap <= 0.0 || s.cr_cap > 1.0 {
        return Err(EngineError::config_validation(
            "cr_cap must be in (0, 1]",
        ));
    }
    Ok(())
}
