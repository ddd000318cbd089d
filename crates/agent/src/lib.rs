//! Agent-facing lead workflows
//!
//! Features:
//! - Lead scoring engine for lead creation and on-demand recompute
//! - Pipeline statistics for the dashboard, read from cached scores
//! - Call-queue construction and HOT-first lead ordering

pub mod call_queue;
pub mod lead_scoring;
pub mod stats;

pub use call_queue::{
    build_call_queue, prioritize, CallQueueItem, QueueReason, QueueUrgency, TaskSnapshot,
    TaskStatus, TaskType,
};
pub use lead_scoring::{EngagementMetrics, InitialAssessment, LeadScoringEngine};
pub use stats::PipelineStats;
