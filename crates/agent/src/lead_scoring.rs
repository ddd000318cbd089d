//! Lead Scoring Engine
//!
//! Entry point for the two flows that produce a lead score:
//! - Lead creation (manual entry, API, CSV import): `initial_assessment`
//! - Caller-triggered recompute once messages and visits accumulate: `rescore`
//!
//! Scores are never recomputed implicitly. The engine only writes the cached
//! `lead_score`/`lead_priority` on the snapshot it is handed; persisting them
//! is the caller's job.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proplead_config::{ConfigError, ScoringConfig};
use proplead_core::{
    LeadPriority, LeadScoringStrategy, LeadSnapshot, LeadSource, RuleBasedLeadScoring,
    ScoringBreakdown, ScoringInput,
};

/// Engagement figures gathered from the messaging store for one lead
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub message_count: u32,
    pub first_response_time_minutes: Option<f64>,
    pub target_property_price: Option<f64>,
}

impl EngagementMetrics {
    fn to_input(self, lead: LeadSnapshot) -> ScoringInput {
        ScoringInput {
            lead,
            message_count: self.message_count,
            first_response_time_minutes: self.first_response_time_minutes,
            target_property_price: self.target_property_price,
        }
    }
}

/// Score and tier assigned to a brand-new lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialAssessment {
    pub score: u32,
    pub priority: LeadPriority,
}

/// Lead Scoring Engine
///
/// Cheap to clone and safe to share across threads; every call reads only its
/// own arguments.
#[derive(Clone)]
pub struct LeadScoringEngine {
    strategy: Arc<dyn LeadScoringStrategy>,
}

impl Default for LeadScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LeadScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadScoringEngine")
            .field("rules", self.strategy.rules())
            .finish()
    }
}

impl LeadScoringEngine {
    /// Create an engine with the production scoring rules
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(RuleBasedLeadScoring::default()))
    }

    /// Create with a custom strategy
    pub fn with_strategy(strategy: Arc<dyn LeadScoringStrategy>) -> Self {
        Self { strategy }
    }

    /// Create from scoring weights loaded from configuration
    pub fn from_config(config: &ScoringConfig) -> Result<Self, ConfigError> {
        let rules = config.to_rules()?;
        Ok(Self::with_strategy(Arc::new(RuleBasedLeadScoring::new(rules))))
    }

    /// Full score as of the current time
    pub fn score(&self, input: &ScoringInput) -> ScoringBreakdown {
        self.score_at(input, Utc::now())
    }

    /// Full score as of `now`
    pub fn score_at(&self, input: &ScoringInput, now: DateTime<Utc>) -> ScoringBreakdown {
        self.strategy.calculate_breakdown(input, now)
    }

    /// Map a raw score to its tier
    pub fn priority(&self, score: u32) -> LeadPriority {
        self.strategy.priority(score)
    }

    /// Score for a lead at creation time, before any interaction exists
    pub fn initial_assessment(&self, source: LeadSource, has_budget: bool) -> InitialAssessment {
        let score = self.strategy.initial_score(source, has_budget);
        let priority = self.strategy.priority(score);

        tracing::debug!(
            source = %source,
            has_budget,
            score,
            priority = %priority,
            "Initial lead score"
        );

        InitialAssessment { score, priority }
    }

    /// Score a lead at creation and write the cached fields
    pub fn assess_new_lead(&self, lead: &mut LeadSnapshot) -> InitialAssessment {
        let assessment = self.initial_assessment(lead.source, lead.has_budget());
        lead.apply_score(assessment.score, assessment.priority);
        assessment
    }

    /// Recompute a lead's score and write the cached fields on the snapshot
    pub fn rescore(
        &self,
        lead: &mut LeadSnapshot,
        metrics: &EngagementMetrics,
        now: DateTime<Utc>,
    ) -> ScoringBreakdown {
        let input = metrics.to_input(lead.clone());
        let breakdown = self.score_at(&input, now);

        let previous = lead.lead_priority;
        lead.apply_score(breakdown.total_score, breakdown.priority);

        if previous != breakdown.priority {
            tracing::info!(
                lead_id = %lead.id,
                from = %previous,
                to = %breakdown.priority,
                score = breakdown.total_score,
                "Lead priority changed"
            );
        }

        breakdown
    }
}
