//! Configuration management for PropLead
//!
//! Supports loading configuration from:
//! - YAML files under `config/`
//! - Environment variables (`PROPLEAD__` prefix, `__` separator)
//!
//! # Scoring Configuration
//!
//! Scoring weights live in `config/scoring.yaml` and are loaded into
//! [`ScoringConfig`], which converts into the core `ScoringRules`. Any
//! section left out of the file keeps its production default.

pub mod domain;
pub mod observability;
pub mod settings;

pub use domain::{
    BudgetScoringConfig, EngagementScoringConfig, InitialScoringConfig, PenaltyConfig,
    PriorityThresholds, RecencyScoringConfig, ResponseScoringConfig, ScoringConfig,
    ScoringConfigError, VisitScoringConfig,
};
pub use observability::init_tracing;
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, RuntimeEnvironment, ScoringSettings,
    Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ScoringConfigError> for ConfigError {
    fn from(err: ScoringConfigError) -> Self {
        match err {
            ScoringConfigError::FileNotFound(path, _) => ConfigError::FileNotFound(path),
            ScoringConfigError::ParseError(msg) => ConfigError::ParseError(msg),
        }
    }
}

impl From<proplead_core::Error> for ConfigError {
    fn from(err: proplead_core::Error) -> Self {
        match err {
            proplead_core::Error::InvalidRules { field, message } => {
                ConfigError::InvalidValue { field, message }
            }
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
