//! Pipeline statistics for the dashboard
//!
//! Built purely from the cached `lead_score`/`lead_priority` fields; nothing
//! here calls the scorer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proplead_core::{LeadPriority, LeadSnapshot, LeadSource, LeadStatus};

use crate::call_queue::{TaskSnapshot, TaskStatus};

const RECENT_LEADS: usize = 5;

/// Aggregate counts over a set of leads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub total_leads: u32,
    pub hot_leads: u32,
    pub warm_leads: u32,
    pub cold_leads: u32,
    pub closed_won: u32,
    /// Percentage of leads closed won, rounded to two decimals
    pub conversion_rate: f64,
    pub followups_due_today: u32,
    pub leads_by_source: BTreeMap<LeadSource, u32>,
    pub leads_by_status: BTreeMap<LeadStatus, u32>,
    /// Newest leads first
    pub recent_lead_ids: Vec<String>,
}

impl PipelineStats {
    pub fn from_leads(leads: &[LeadSnapshot], tasks: &[TaskSnapshot], now: DateTime<Utc>) -> Self {
        let mut stats = PipelineStats::default();

        for lead in leads {
            stats.total_leads += 1;

            match lead.lead_priority {
                LeadPriority::Hot => stats.hot_leads += 1,
                LeadPriority::Warm => stats.warm_leads += 1,
                LeadPriority::Cold => stats.cold_leads += 1,
            }

            *stats.leads_by_source.entry(lead.source).or_insert(0) += 1;
            *stats.leads_by_status.entry(lead.status).or_insert(0) += 1;

            if lead.status == LeadStatus::ClosedWon {
                stats.closed_won += 1;
            }
        }

        if stats.total_leads > 0 {
            let rate = stats.closed_won as f64 / stats.total_leads as f64 * 100.0;
            stats.conversion_rate = (rate * 100.0).round() / 100.0;
        }

        let today = now.date_naive();
        stats.followups_due_today = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending && t.due_date.date_naive() == today)
            .count() as u32;

        let mut recent: Vec<&LeadSnapshot> = leads.iter().collect();
        // Leads without a creation time sort last
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        stats.recent_lead_ids = recent
            .into_iter()
            .take(RECENT_LEADS)
            .map(|lead| lead.id.clone())
            .collect();

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_queue::TaskType;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 15, 0, 0).unwrap()
    }

    fn lead(id: &str, source: LeadSource, status: LeadStatus, priority: LeadPriority, age_days: i64) -> LeadSnapshot {
        let mut lead = LeadSnapshot::new(id, source, status);
        lead.lead_priority = priority;
        lead.created_at = Some(now() - Duration::days(age_days));
        lead
    }

    fn task(id: &str, status: TaskStatus, due: DateTime<Utc>) -> TaskSnapshot {
        TaskSnapshot {
            id: id.to_string(),
            lead_id: "lead-1".to_string(),
            task_type: TaskType::Followup,
            status,
            due_date: due,
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let stats = PipelineStats::from_leads(&[], &[], now());
        assert_eq!(stats.total_leads, 0);
        assert_eq!(stats.conversion_rate, 0.0);
        assert!(stats.recent_lead_ids.is_empty());
    }

    #[test]
    fn test_counts_and_conversion_rate() {
        let leads = vec![
            lead("a", LeadSource::Website, LeadStatus::ClosedWon, LeadPriority::Hot, 9),
            lead("b", LeadSource::Website, LeadStatus::New, LeadPriority::Warm, 1),
            lead("c", LeadSource::Csv, LeadStatus::Contacted, LeadPriority::Cold, 3),
        ];

        let stats = PipelineStats::from_leads(&leads, &[], now());
        assert_eq!(stats.total_leads, 3);
        assert_eq!((stats.hot_leads, stats.warm_leads, stats.cold_leads), (1, 1, 1));
        assert_eq!(stats.closed_won, 1);
        assert_eq!(stats.conversion_rate, 33.33);
        assert_eq!(stats.leads_by_source[&LeadSource::Website], 2);
        assert_eq!(stats.leads_by_source.get(&LeadSource::Portal), None);
        assert_eq!(stats.leads_by_status[&LeadStatus::Contacted], 1);
    }

    #[test]
    fn test_recent_leads_newest_first_and_capped() {
        let leads: Vec<LeadSnapshot> = (0..7)
            .map(|i| {
                lead(
                    &format!("lead-{}", i),
                    LeadSource::Manual,
                    LeadStatus::New,
                    LeadPriority::Cold,
                    i,
                )
            })
            .collect();

        let stats = PipelineStats::from_leads(&leads, &[], now());
        assert_eq!(
            stats.recent_lead_ids,
            vec!["lead-0", "lead-1", "lead-2", "lead-3", "lead-4"]
        );
    }

    #[test]
    fn test_followups_due_today() {
        let tasks = vec![
            task("t1", TaskStatus::Pending, now() + Duration::hours(2)),
            task("t2", TaskStatus::Done, now()),
            task("t3", TaskStatus::Pending, now() + Duration::days(1)),
            task("t4", TaskStatus::Pending, now() - Duration::hours(14)),
        ];

        let stats = PipelineStats::from_leads(&[], &tasks, now());
        assert_eq!(stats.followups_due_today, 2);
    }
}
