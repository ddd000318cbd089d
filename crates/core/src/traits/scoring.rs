//! Lead Scoring Strategy trait and rule-based implementation
//!
//! Maps a lead snapshot plus a few engagement counters to a 0-100 score and a
//! HOT/WARM/COLD tier. Seven independent sub-scores are computed, summed,
//! clamped, then classified:
//!
//! | Factor     | Range     | Signal                                  |
//! |------------|-----------|-----------------------------------------|
//! | response   | 0..=25    | minutes until the first agent reply     |
//! | engagement | 0..=20    | messages exchanged                      |
//! | visit      | -10..=20  | pipeline status and booked visit date   |
//! | budget     | 0..=15    | budget vs. price of the target property |
//! | recency    | 0..=10    | hours since the last tracked activity   |
//! | source     | 2..=10    | acquisition channel                     |
//! | penalties  | <= 0      | stale zero-engagement leads, lost deals |
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use proplead_core::{calculate_lead_score_at, LeadSnapshot, LeadSource, LeadStatus, ScoringInput};
//!
//! let now = Utc::now();
//! let mut lead = LeadSnapshot::new("lead-1", LeadSource::Manual, LeadStatus::New);
//! lead.last_interaction_at = Some(now);
//!
//! let breakdown = calculate_lead_score_at(&ScoringInput::new(lead, 0), now);
//! assert_eq!(breakdown.total_score, 12);
//! ```

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lead::{LeadPriority, LeadSnapshot, LeadSource, LeadStatus};

/// Upper bound of every total score
pub const MAX_SCORE: u32 = 100;

const HOT_THRESHOLD: u32 = 80;
const WARM_THRESHOLD: u32 = 50;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// One bucket of a step function: `points` awarded when the measured value
/// crosses `threshold`. Whether "crosses" means at-most or at-least depends
/// on the table the tier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    pub threshold: f64,
    pub points: i32,
}

impl ScoreTier {
    pub const fn new(threshold: f64, points: i32) -> Self {
        Self { threshold, points }
    }
}

/// Points for the first tier whose threshold the value does not exceed
fn points_at_most(tiers: &[ScoreTier], value: f64) -> i32 {
    tiers
        .iter()
        .find(|tier| value <= tier.threshold)
        .map_or(0, |tier| tier.points)
}

/// Points for the first tier whose threshold the value reaches
fn points_at_least(tiers: &[ScoreTier], value: f64) -> i32 {
    tiers
        .iter()
        .find(|tier| value >= tier.threshold)
        .map_or(0, |tier| tier.points)
}

/// Source quality points per acquisition channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceScores {
    pub website: i32,
    pub whatsapp: i32,
    pub portal: i32,
    pub facebook: i32,
    #[serde(rename = "walk-in", alias = "walk_in")]
    pub walk_in: i32,
    pub csv: i32,
    pub manual: i32,
}

impl Default for SourceScores {
    fn default() -> Self {
        Self {
            website: 10,
            whatsapp: 8,
            portal: 6,
            facebook: 5,
            walk_in: 4,
            csv: 3,
            manual: 2,
        }
    }
}

impl SourceScores {
    pub fn score(&self, source: LeadSource) -> i32 {
        match source {
            LeadSource::Website => self.website,
            LeadSource::Whatsapp => self.whatsapp,
            LeadSource::Portal => self.portal,
            LeadSource::Facebook => self.facebook,
            LeadSource::WalkIn => self.walk_in,
            LeadSource::Csv => self.csv,
            LeadSource::Manual => self.manual,
        }
    }
}

/// Static weight tables for the rule-based scorer
///
/// `Default` holds the production rules. Tier tables are checked in order and
/// the first matching tier wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    // Priority thresholds
    pub hot_min: u32,
    pub warm_min: u32,

    /// Minutes to first reply, at-most tiers
    pub response_tiers: Vec<ScoreTier>,

    /// Message count, at-least tiers
    pub engagement_tiers: Vec<ScoreTier>,

    // Visit
    pub closed_won_points: i32,
    pub visit_scheduled_points: i32,
    pub upcoming_visit_points: i32,
    pub missed_visit_points: i32,

    /// Budget as a percentage of the target price, at-least tiers
    pub budget_ratio_tiers: Vec<ScoreTier>,
    pub budget_only_points: i32,

    /// Hours since last activity, at-most tiers
    pub recency_tiers: Vec<ScoreTier>,

    pub source_scores: SourceScores,

    /// Days since last activity for zero-message leads, at-least tiers
    pub stale_penalty_tiers: Vec<ScoreTier>,
    pub closed_lost_penalty: i32,

    // Initial score
    pub new_lead_bonus: i32,
    pub initial_budget_bonus: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            hot_min: HOT_THRESHOLD,
            warm_min: WARM_THRESHOLD,

            // Response speed (max 25): 1h, 6h, 24h
            response_tiers: vec![
                ScoreTier::new(60.0, 25),
                ScoreTier::new(360.0, 20),
                ScoreTier::new(1440.0, 10),
            ],

            // Engagement (max 20)
            engagement_tiers: vec![
                ScoreTier::new(5.0, 20),
                ScoreTier::new(3.0, 15),
                ScoreTier::new(1.0, 5),
            ],

            // Visit (max 20)
            closed_won_points: 20,
            visit_scheduled_points: 15,
            upcoming_visit_points: 15,
            missed_visit_points: -10,

            // Budget match (max 15)
            budget_ratio_tiers: vec![
                ScoreTier::new(90.0, 15),
                ScoreTier::new(70.0, 10),
                ScoreTier::new(50.0, 5),
            ],
            budget_only_points: 8,

            // Recency (max 10)
            recency_tiers: vec![ScoreTier::new(24.0, 10), ScoreTier::new(72.0, 5)],

            source_scores: SourceScores::default(),

            // Penalties
            stale_penalty_tiers: vec![ScoreTier::new(10.0, -25), ScoreTier::new(5.0, -15)],
            closed_lost_penalty: -50,

            new_lead_bonus: 10,
            initial_budget_bonus: 5,
        }
    }
}

impl ScoringRules {
    /// Check that thresholds and tier tables are consistent
    pub fn validate(&self) -> Result<()> {
        if self.hot_min > MAX_SCORE {
            return Err(Error::InvalidRules {
                field: "hot_min".to_string(),
                message: format!("must be at most {}", MAX_SCORE),
            });
        }
        if self.warm_min >= self.hot_min {
            return Err(Error::InvalidRules {
                field: "warm_min".to_string(),
                message: format!("must be below hot_min ({})", self.hot_min),
            });
        }

        check_ascending("response_tiers", &self.response_tiers)?;
        check_ascending("recency_tiers", &self.recency_tiers)?;
        check_descending("engagement_tiers", &self.engagement_tiers)?;
        check_descending("budget_ratio_tiers", &self.budget_ratio_tiers)?;
        check_descending("stale_penalty_tiers", &self.stale_penalty_tiers)?;

        for (field, tiers) in [
            ("response_tiers", &self.response_tiers),
            ("engagement_tiers", &self.engagement_tiers),
            ("budget_ratio_tiers", &self.budget_ratio_tiers),
            ("recency_tiers", &self.recency_tiers),
            ("stale_penalty_tiers", &self.stale_penalty_tiers),
        ] {
            for tier in tiers {
                check_points(field, tier.points)?;
            }
        }

        let s = &self.source_scores;
        for (field, points) in [
            ("closed_won_points", self.closed_won_points),
            ("visit_scheduled_points", self.visit_scheduled_points),
            ("upcoming_visit_points", self.upcoming_visit_points),
            ("missed_visit_points", self.missed_visit_points),
            ("budget_only_points", self.budget_only_points),
            ("closed_lost_penalty", self.closed_lost_penalty),
            ("new_lead_bonus", self.new_lead_bonus),
            ("initial_budget_bonus", self.initial_budget_bonus),
            ("source_scores.website", s.website),
            ("source_scores.whatsapp", s.whatsapp),
            ("source_scores.portal", s.portal),
            ("source_scores.facebook", s.facebook),
            ("source_scores.walk-in", s.walk_in),
            ("source_scores.csv", s.csv),
            ("source_scores.manual", s.manual),
        ] {
            check_points(field, points)?;
        }

        Ok(())
    }
}

/// Every single weight stays within one full score in either direction
fn check_points(field: &str, points: i32) -> Result<()> {
    let limit = MAX_SCORE as i32;
    if (-limit..=limit).contains(&points) {
        Ok(())
    } else {
        Err(Error::InvalidRules {
            field: field.to_string(),
            message: format!("points must be within -{}..={}, got {}", limit, limit, points),
        })
    }
}

// At-most tables must list the tightest bound first, at-least tables the
// highest bar first, or later tiers would be unreachable.
fn check_ascending(field: &str, tiers: &[ScoreTier]) -> Result<()> {
    if tiers.windows(2).all(|w| w[0].threshold < w[1].threshold) {
        Ok(())
    } else {
        Err(Error::InvalidRules {
            field: field.to_string(),
            message: "thresholds must be strictly ascending".to_string(),
        })
    }
}

fn check_descending(field: &str, tiers: &[ScoreTier]) -> Result<()> {
    if tiers.windows(2).all(|w| w[0].threshold > w[1].threshold) {
        Ok(())
    } else {
        Err(Error::InvalidRules {
            field: field.to_string(),
            message: "thresholds must be strictly descending".to_string(),
        })
    }
}

/// Everything the scorer needs for one lead, assembled by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringInput {
    pub lead: LeadSnapshot,
    /// Messages exchanged in both directions
    pub message_count: u32,
    /// Minutes between lead creation and the first agent reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_response_time_minutes: Option<f64>,
    /// Price of the property under discussion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property_price: Option<f64>,
}

impl ScoringInput {
    pub fn new(lead: LeadSnapshot, message_count: u32) -> Self {
        Self {
            lead,
            message_count,
            first_response_time_minutes: None,
            target_property_price: None,
        }
    }

    pub fn with_first_response_time(mut self, minutes: f64) -> Self {
        self.first_response_time_minutes = Some(minutes);
        self
    }

    pub fn with_target_property_price(mut self, price: f64) -> Self {
        self.target_property_price = Some(price);
        self
    }
}

/// Score breakdown by factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringBreakdown {
    pub response_score: i32,
    pub engagement_score: i32,
    pub visit_score: i32,
    pub budget_score: i32,
    pub recency_score: i32,
    pub source_score: i32,
    /// Sum of all penalties (zero or negative)
    pub penalties: i32,
    /// Clamped total (0-100)
    pub total_score: u32,
    pub priority: LeadPriority,
}

impl ScoringBreakdown {
    /// Unclamped sum of every factor
    pub fn raw_total(&self) -> i32 {
        [
            self.engagement_score,
            self.visit_score,
            self.budget_score,
            self.recency_score,
            self.source_score,
            self.penalties,
        ]
        .into_iter()
        .fold(self.response_score, i32::saturating_add)
    }
}

/// Lead scoring strategy trait
///
/// Implementations must be pure: the same input and `now` always yield the
/// same breakdown, and `priority` of the result is always
/// `self.priority(total_score)`.
pub trait LeadScoringStrategy: Send + Sync {
    /// Compute the full breakdown as of `now`
    fn calculate_breakdown(&self, input: &ScoringInput, now: DateTime<Utc>) -> ScoringBreakdown;

    /// Map a total score to its tier
    fn priority(&self, score: u32) -> LeadPriority;

    /// Score for a freshly created lead with no interaction history
    fn initial_score(&self, source: LeadSource, has_budget: bool) -> u32;

    /// The weight tables in use
    fn rules(&self) -> &ScoringRules;
}

/// Weighted-sum scorer over [`ScoringRules`]
#[derive(Debug, Clone, Default)]
pub struct RuleBasedLeadScoring {
    rules: ScoringRules,
}

impl RuleBasedLeadScoring {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    fn visit_score(&self, lead: &LeadSnapshot, now: DateTime<Utc>) -> i32 {
        let rules = &self.rules;
        match lead.status {
            LeadStatus::ClosedWon => rules.closed_won_points,
            LeadStatus::VisitScheduled => rules.visit_scheduled_points,
            // Date passed but status never advanced: treat as a missed visit
            _ => match lead.visit_scheduled_at {
                Some(at) if at < now => rules.missed_visit_points,
                Some(_) => rules.upcoming_visit_points,
                None => 0,
            },
        }
    }

    fn budget_score(&self, lead: &LeadSnapshot, target_price: Option<f64>) -> i32 {
        let budget = lead.budget.filter(|b| *b > 0.0);
        let target = target_price.filter(|p| *p > 0.0);
        match (budget, target) {
            (Some(budget), Some(target)) => {
                points_at_least(&self.rules.budget_ratio_tiers, budget * 100.0 / target)
            }
            (Some(_), None) => self.rules.budget_only_points,
            _ => 0,
        }
    }
}

impl LeadScoringStrategy for RuleBasedLeadScoring {
    fn calculate_breakdown(&self, input: &ScoringInput, now: DateTime<Utc>) -> ScoringBreakdown {
        let rules = &self.rules;
        let lead = &input.lead;

        let response_score = input
            .first_response_time_minutes
            .map_or(0, |minutes| points_at_most(&rules.response_tiers, minutes));

        let engagement_score = points_at_least(&rules.engagement_tiers, input.message_count as f64);

        let visit_score = self.visit_score(lead, now);

        let budget_score = self.budget_score(lead, input.target_property_price);

        let hours_since_activity = lead
            .last_activity_at()
            .map(|at| (now - at).num_milliseconds() as f64 / MILLIS_PER_HOUR);

        let recency_score =
            hours_since_activity.map_or(0, |hours| points_at_most(&rules.recency_tiers, hours));

        let source_score = rules.source_scores.score(lead.source);

        // Stale penalty only hits leads that never exchanged a single message
        let mut penalties: i32 = 0;
        if input.message_count == 0 {
            if let Some(hours) = hours_since_activity {
                penalties = penalties
                    .saturating_add(points_at_least(&rules.stale_penalty_tiers, hours / 24.0));
            }
        }
        if lead.status == LeadStatus::ClosedLost {
            penalties = penalties.saturating_add(rules.closed_lost_penalty);
        }

        let mut breakdown = ScoringBreakdown {
            response_score,
            engagement_score,
            visit_score,
            budget_score,
            recency_score,
            source_score,
            penalties,
            total_score: 0,
            priority: LeadPriority::Cold,
        };
        breakdown.total_score = breakdown.raw_total().clamp(0, MAX_SCORE as i32) as u32;
        breakdown.priority = self.priority(breakdown.total_score);

        tracing::debug!(
            lead_id = %lead.id,
            raw_total = breakdown.raw_total(),
            total = breakdown.total_score,
            priority = %breakdown.priority,
            "Calculated lead score"
        );

        breakdown
    }

    fn priority(&self, score: u32) -> LeadPriority {
        if score >= self.rules.hot_min {
            LeadPriority::Hot
        } else if score >= self.rules.warm_min {
            LeadPriority::Warm
        } else {
            LeadPriority::Cold
        }
    }

    fn initial_score(&self, source: LeadSource, has_budget: bool) -> u32 {
        let mut score = self
            .rules
            .source_scores
            .score(source)
            .saturating_add(self.rules.new_lead_bonus);
        if has_budget {
            score = score.saturating_add(self.rules.initial_budget_bonus);
        }
        score.clamp(0, MAX_SCORE as i32) as u32
    }

    fn rules(&self) -> &ScoringRules {
        &self.rules
    }
}

static DEFAULT_SCORING: Lazy<RuleBasedLeadScoring> = Lazy::new(RuleBasedLeadScoring::default);

/// Score a lead against the default rules as of the current wall-clock time
pub fn calculate_lead_score(input: &ScoringInput) -> ScoringBreakdown {
    calculate_lead_score_at(input, Utc::now())
}

/// Score a lead against the default rules as of `now`
pub fn calculate_lead_score_at(input: &ScoringInput, now: DateTime<Utc>) -> ScoringBreakdown {
    DEFAULT_SCORING.calculate_breakdown(input, now)
}

/// Score assigned when a lead is created, before any interaction exists
pub fn calculate_initial_score(source: LeadSource, has_budget: bool) -> u32 {
    DEFAULT_SCORING.initial_score(source, has_budget)
}

/// HOT at 80 and above, WARM at 50 and above, COLD otherwise
pub fn get_lead_priority(score: u32) -> LeadPriority {
    DEFAULT_SCORING.priority(score)
}
