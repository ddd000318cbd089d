//! Domain configuration loaded from YAML

pub mod scoring;

pub use scoring::{
    BudgetScoringConfig, EngagementScoringConfig, InitialScoringConfig, PenaltyConfig,
    PriorityThresholds, RecencyScoringConfig, ResponseScoringConfig, ScoringConfig,
    ScoringConfigError, VisitScoringConfig,
};
