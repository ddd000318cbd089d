//! Call-queue prioritization
//!
//! Builds the telecalling queue from cached lead priorities and today's task
//! list. Consumes the HOT/WARM/COLD classification, never recomputes it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proplead_core::{LeadPriority, LeadSnapshot, LeadStatus};

/// HOT leads untouched for longer than this are queued for a call
const HOT_LEAD_CONTACT_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Call,
    Visit,
    Followup,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Done,
    Cancelled,
}

/// Read-only view of a task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: String,
    pub lead_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
}

/// How soon a queued lead should be called
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueUrgency {
    High,
    Medium,
    Low,
}

/// Why a lead is in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueReason {
    CallDueToday,
    FollowupDueToday,
    HotLeadUncontacted,
    NewLead,
}

impl std::fmt::Display for QueueReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueReason::CallDueToday => write!(f, "Call scheduled for today"),
            QueueReason::FollowupDueToday => write!(f, "Follow-up scheduled for today"),
            QueueReason::HotLeadUncontacted => write!(f, "Hot lead - no contact in 24+ hours"),
            QueueReason::NewLead => write!(f, "New lead - needs first contact"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallQueueItem {
    pub lead_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub urgency: QueueUrgency,
    pub reason: QueueReason,
}

/// Build the call queue for the day containing `now`
///
/// Each lead appears at most once, from the first rule that matches:
/// call/follow-up tasks due today, then HOT leads gone quiet for a day, then
/// leads still in `New`. The result is stably ordered by urgency.
pub fn build_call_queue(
    leads: &[LeadSnapshot],
    tasks: &[TaskSnapshot],
    now: DateTime<Utc>,
) -> Vec<CallQueueItem> {
    let today = now.date_naive();
    let mut queue = Vec::new();
    let mut queued: HashSet<&str> = HashSet::new();

    for task in tasks {
        let reason = match task.task_type {
            TaskType::Call => QueueReason::CallDueToday,
            TaskType::Followup => QueueReason::FollowupDueToday,
            TaskType::Visit | TaskType::Other => continue,
        };
        if task.status != TaskStatus::Pending || task.due_date.date_naive() != today {
            continue;
        }
        let Some(lead) = leads.iter().find(|l| l.id == task.lead_id) else {
            tracing::debug!(task_id = %task.id, lead_id = %task.lead_id, "Task references unknown lead");
            continue;
        };
        if !queued.insert(lead.id.as_str()) {
            continue;
        }
        queue.push(CallQueueItem {
            lead_id: lead.id.clone(),
            task_id: Some(task.id.clone()),
            urgency: QueueUrgency::High,
            reason,
        });
    }

    for lead in leads.iter().filter(|l| l.lead_priority == LeadPriority::Hot) {
        // No recorded interaction at all counts as uncontacted
        let stale = lead
            .last_interaction_at
            .map_or(true, |at| now - at > chrono::Duration::hours(HOT_LEAD_CONTACT_HOURS));
        if stale && queued.insert(lead.id.as_str()) {
            queue.push(CallQueueItem {
                lead_id: lead.id.clone(),
                task_id: None,
                urgency: QueueUrgency::High,
                reason: QueueReason::HotLeadUncontacted,
            });
        }
    }

    for lead in leads.iter().filter(|l| l.status == LeadStatus::New) {
        if queued.insert(lead.id.as_str()) {
            queue.push(CallQueueItem {
                lead_id: lead.id.clone(),
                task_id: None,
                urgency: QueueUrgency::Medium,
                reason: QueueReason::NewLead,
            });
        }
    }

    queue.sort_by_key(|item| item.urgency);
    queue
}

/// Order leads HOT first, then by cached score, highest first
pub fn prioritize(leads: &mut [LeadSnapshot]) {
    leads.sort_by(|a, b| {
        a.lead_priority
            .rank()
            .cmp(&b.lead_priority.rank())
            .then_with(|| b.lead_score.cmp(&a.lead_score))
    });
}
