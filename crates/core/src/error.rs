//! Error types for the core crate
//!
//! Scoring itself never fails. These errors only surface where raw strings
//! or user-supplied rule tables cross into typed values.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown lead source: {0}")]
    UnknownSource(String),

    #[error("Unknown lead status: {0}")]
    UnknownStatus(String),

    #[error("Unknown lead priority: {0}")]
    UnknownPriority(String),

    #[error("Invalid scoring rules for {field}: {message}")]
    InvalidRules { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
