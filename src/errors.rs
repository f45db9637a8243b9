//! Error types for the engine's configuration and payload boundaries.
//!
//! The diagnosis core itself never fails: malformed-but-typed input degrades
//! to `Unknown`/`None` results instead of errors. The only fallible surfaces
//! are loading a configuration file and decoding an externally supplied
//! churn-driver payload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file could not be parsed as TOML.
    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains values the engine cannot use.
    #[error("invalid config value: {0}")]
    ConfigValidation(String),

    /// Churn-driver payload could not be decoded.
    #[error("failed to parse churn driver payload: {0}")]
    PayloadParse(String),
}

impl EngineError {
    pub fn config_validation(message: impl Into<String>) -> Self {
        EngineError::ConfigValidation(message.into())
    }
}
