//! Lead domain types
//!
//! A lead is a prospective buyer or renter tracked through the sales pipeline.
//! The snapshot here is the read-only view the scorer works from; the lead
//! record itself lives in the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Channel through which a lead entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    Website,
    Whatsapp,
    Portal,
    #[default]
    Manual,
    Csv,
    Facebook,
    #[serde(rename = "walk-in")]
    WalkIn,
}

impl LeadSource {
    /// Every source, in declaration order
    pub const ALL: [LeadSource; 7] = [
        LeadSource::Website,
        LeadSource::Whatsapp,
        LeadSource::Portal,
        LeadSource::Manual,
        LeadSource::Csv,
        LeadSource::Facebook,
        LeadSource::WalkIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::Whatsapp => "whatsapp",
            LeadSource::Portal => "portal",
            LeadSource::Manual => "manual",
            LeadSource::Csv => "csv",
            LeadSource::Facebook => "facebook",
            LeadSource::WalkIn => "walk-in",
        }
    }

    /// Parse a source column from an imported file.
    ///
    /// Unrecognised or empty values fall back to `Csv`, since the row did
    /// arrive through a CSV import.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(LeadSource::Csv)
    }
}

impl FromStr for LeadSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        LeadSource::ALL
            .into_iter()
            .find(|source| source.as_str() == normalized)
            .ok_or_else(|| Error::UnknownSource(s.to_string()))
    }
}

impl std::fmt::Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pipeline stage of a lead
///
/// Stages normally progress left to right, but nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    VisitScheduled,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::VisitScheduled,
        LeadStatus::Negotiation,
        LeadStatus::ClosedWon,
        LeadStatus::ClosedLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::VisitScheduled => "visit_scheduled",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::ClosedWon => "closed_won",
            LeadStatus::ClosedLost => "closed_lost",
        }
    }

    /// Whether the lead has left the active pipeline
    pub fn is_closed(&self) -> bool {
        matches!(self, LeadStatus::ClosedWon | LeadStatus::ClosedLost)
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority tier derived from a lead score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadPriority {
    Hot,
    Warm,
    #[default]
    Cold,
}

impl LeadPriority {
    /// Sort rank, lower comes first (HOT leads head every queue)
    pub fn rank(&self) -> u8 {
        match self {
            LeadPriority::Hot => 0,
            LeadPriority::Warm => 1,
            LeadPriority::Cold => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::Hot => "HOT",
            LeadPriority::Warm => "WARM",
            LeadPriority::Cold => "COLD",
        }
    }
}

impl FromStr for LeadPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HOT" => Ok(LeadPriority::Hot),
            "WARM" => Ok(LeadPriority::Warm),
            "COLD" => Ok(LeadPriority::Cold),
            _ => Err(Error::UnknownPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeadPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only view of a lead record as seen by the scorer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadSnapshot {
    /// Lead record ID
    pub id: String,

    /// Acquisition channel, immutable after creation
    pub source: LeadSource,

    /// Current pipeline stage
    pub status: LeadStatus,

    /// Buyer's stated budget in currency units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    /// When a site visit was booked (may be in the past)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_scheduled_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Cached output of the last scoring run (0-100)
    #[serde(default)]
    pub lead_score: u32,

    /// Cached tier, always derived from `lead_score`
    #[serde(default)]
    pub lead_priority: LeadPriority,
}

impl LeadSnapshot {
    /// Create a snapshot with no timestamps, budget or cached score
    pub fn new(id: impl Into<String>, source: LeadSource, status: LeadStatus) -> Self {
        Self {
            id: id.into(),
            source,
            status,
            ..Default::default()
        }
    }

    /// Most recent tracked activity: last interaction, then update, then creation
    pub fn last_activity_at(&self) -> Option<DateTime<Utc>> {
        self.last_interaction_at
            .or(self.updated_at)
            .or(self.created_at)
    }

    /// Whether the lead carries a usable budget signal
    ///
    /// A zero budget is treated the same as a missing one.
    pub fn has_budget(&self) -> bool {
        self.budget.is_some_and(|b| b > 0.0)
    }

    /// Write a freshly computed score into the cached fields
    pub fn apply_score(&mut self, score: u32, priority: LeadPriority) {
        self.lead_score = score;
        self.lead_priority = priority;
    }
}
