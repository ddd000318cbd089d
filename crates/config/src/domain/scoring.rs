//! Lead Scoring Configuration
//!
//! Config-driven weights for the rule-based lead scorer. Every section
//! defaults to the production rules, so a file only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use proplead_core::{ScoreTier, ScoringRules, SourceScores};

use crate::ConfigError;

/// Scoring configuration loaded from scoring.yaml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Priority tier thresholds
    #[serde(default)]
    pub thresholds: PriorityThresholds,
    /// First-response speed scoring
    #[serde(default)]
    pub response: ResponseScoringConfig,
    /// Message engagement scoring
    #[serde(default)]
    pub engagement: EngagementScoringConfig,
    /// Site visit scoring
    #[serde(default)]
    pub visit: VisitScoringConfig,
    /// Budget match scoring
    #[serde(default)]
    pub budget: BudgetScoringConfig,
    /// Activity recency scoring
    #[serde(default)]
    pub recency: RecencyScoringConfig,
    /// Source quality per acquisition channel
    #[serde(default)]
    pub source_scores: SourceScores,
    /// Penalty scores
    #[serde(default)]
    pub penalties: PenaltyConfig,
    /// Scoring applied at lead creation
    #[serde(default)]
    pub initial: InitialScoringConfig,
}

impl ScoringConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoringConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScoringConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;

        Self::from_yaml(&content)
    }

    /// Parse from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ScoringConfigError> {
        serde_yaml::from_str(content).map_err(|e| ScoringConfigError::ParseError(e.to_string()))
    }

    /// Convert into validated scoring rules
    pub fn to_rules(&self) -> Result<ScoringRules, ConfigError> {
        let rules = ScoringRules {
            hot_min: self.thresholds.hot,
            warm_min: self.thresholds.warm,
            response_tiers: self.response.tiers.clone(),
            engagement_tiers: self.engagement.tiers.clone(),
            closed_won_points: self.visit.closed_won,
            visit_scheduled_points: self.visit.visit_scheduled,
            upcoming_visit_points: self.visit.upcoming,
            missed_visit_points: self.visit.missed,
            budget_ratio_tiers: self.budget.ratio_tiers.clone(),
            budget_only_points: self.budget.budget_only,
            recency_tiers: self.recency.tiers.clone(),
            source_scores: self.source_scores.clone(),
            stale_penalty_tiers: self.penalties.stale_tiers.clone(),
            closed_lost_penalty: self.penalties.closed_lost,
            new_lead_bonus: self.initial.new_lead_bonus,
            initial_budget_bonus: self.initial.budget_bonus,
        };
        rules.validate()?;
        Ok(rules)
    }
}

/// Priority tier thresholds (minimum score per tier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityThresholds {
    pub hot: u32,
    pub warm: u32,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        let rules = ScoringRules::default();
        Self {
            hot: rules.hot_min,
            warm: rules.warm_min,
        }
    }
}

/// Response speed: tiers keyed by maximum minutes to first reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseScoringConfig {
    pub tiers: Vec<ScoreTier>,
}

impl Default for ResponseScoringConfig {
    fn default() -> Self {
        Self {
            tiers: ScoringRules::default().response_tiers,
        }
    }
}

/// Engagement: tiers keyed by minimum message count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementScoringConfig {
    pub tiers: Vec<ScoreTier>,
}

impl Default for EngagementScoringConfig {
    fn default() -> Self {
        Self {
            tiers: ScoringRules::default().engagement_tiers,
        }
    }
}

/// Site visit scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitScoringConfig {
    pub closed_won: i32,
    pub visit_scheduled: i32,
    pub upcoming: i32,
    /// Applied when the visit date passed without the status advancing
    pub missed: i32,
}

impl Default for VisitScoringConfig {
    fn default() -> Self {
        let rules = ScoringRules::default();
        Self {
            closed_won: rules.closed_won_points,
            visit_scheduled: rules.visit_scheduled_points,
            upcoming: rules.upcoming_visit_points,
            missed: rules.missed_visit_points,
        }
    }
}

/// Budget match: tiers keyed by minimum budget/price percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetScoringConfig {
    pub ratio_tiers: Vec<ScoreTier>,
    /// Partial credit when a budget exists but no target price is known
    pub budget_only: i32,
}

impl Default for BudgetScoringConfig {
    fn default() -> Self {
        let rules = ScoringRules::default();
        Self {
            ratio_tiers: rules.budget_ratio_tiers,
            budget_only: rules.budget_only_points,
        }
    }
}

/// Recency: tiers keyed by maximum hours since last activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyScoringConfig {
    pub tiers: Vec<ScoreTier>,
}

impl Default for RecencyScoringConfig {
    fn default() -> Self {
        Self {
            tiers: ScoringRules::default().recency_tiers,
        }
    }
}

/// Penalty scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Tiers keyed by minimum days idle, zero-message leads only
    pub stale_tiers: Vec<ScoreTier>,
    pub closed_lost: i32,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        let rules = ScoringRules::default();
        Self {
            stale_tiers: rules.stale_penalty_tiers,
            closed_lost: rules.closed_lost_penalty,
        }
    }
}

/// Scoring applied at lead creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialScoringConfig {
    pub new_lead_bonus: i32,
    pub budget_bonus: i32,
}

impl Default for InitialScoringConfig {
    fn default() -> Self {
        let rules = ScoringRules::default();
        Self {
            new_lead_bonus: rules.new_lead_bonus,
            budget_bonus: rules.initial_budget_bonus,
        }
    }
}

/// Errors when loading scoring configuration
#[derive(Debug)]
pub enum ScoringConfigError {
    FileNotFound(String, String),
    ParseError(String),
}

impl std::fmt::Display for ScoringConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path, err) => {
                write!(f, "Scoring config not found at {}: {}", path, err)
            }
            Self::ParseError(err) => write!(f, "Failed to parse scoring config: {}", err),
        }
    }
}

impl std::error::Error for ScoringConfigError {}
