//! Engine configuration.
//!
//! Every calibration constant the engine uses lives here as a named,
//! overridable field. Configuration can be loaded from a `benchlight.toml`
//! file; missing sections fall back to the shipped defaults.

pub mod loader;
pub mod thresholds;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use loader::{load_from_path, parse_and_validate_config, try_load_config_from_path};
pub use thresholds::{
    DiagnosisThresholds, GoalPolicy, RangeDefaults, RecommendedCplPolicy, SolverBoundsConfig,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub thresholds: DiagnosisThresholds,

    #[serde(default)]
    pub ranges: RangeDefaults,

    #[serde(default)]
    pub solver: SolverBoundsConfig,

    #[serde(default)]
    pub goal: GoalPolicy,
}

static DEFAULT_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::default);

/// Shared default configuration for callers that don't carry their own.
pub fn default_config() -> &'static EngineConfig {
    &DEFAULT_CONFIG
}
