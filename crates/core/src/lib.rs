//! Core traits and types for PropLead
//!
//! This crate provides the foundational types used across the other crates:
//! - Lead domain types (source, pipeline status, priority tier, snapshot)
//! - The lead scoring strategy trait and its rule-based implementation
//! - Error types
//!
//! Nothing in here performs I/O. Callers own persistence of scoring results.

pub mod error;
pub mod lead;
pub mod traits;

pub use error::{Error, Result};
pub use lead::{LeadPriority, LeadSnapshot, LeadSource, LeadStatus};

pub use traits::{
    calculate_initial_score, calculate_lead_score, calculate_lead_score_at, get_lead_priority,
    LeadScoringStrategy, RuleBasedLeadScoring, ScoreTier, ScoringBreakdown, ScoringInput,
    ScoringRules, SourceScores,
};
