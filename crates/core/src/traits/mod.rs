//! Core traits for pluggable lead scoring

pub mod scoring;

pub use scoring::{
    calculate_initial_score, calculate_lead_score, calculate_lead_score_at, get_lead_priority,
    LeadScoringStrategy, RuleBasedLeadScoring, ScoreTier, ScoringBreakdown, ScoringInput,
    ScoringRules, SourceScores, MAX_SCORE,
};
