//! End-to-end scoring properties through the public API

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use proplead_agent::{EngagementMetrics, LeadScoringEngine};
use proplead_config::ScoringConfig;
use proplead_core::{
    calculate_initial_score, calculate_lead_score_at, get_lead_priority, LeadPriority,
    LeadSnapshot, LeadSource, LeadStatus, ScoringInput,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 20, 9, 15, 0).unwrap()
}

fn snapshot(source: LeadSource, status: LeadStatus) -> LeadSnapshot {
    let mut lead = LeadSnapshot::new("lead-int", source, status);
    lead.last_interaction_at = Some(now());
    lead
}

/// A spread of inputs covering every branch of every factor
fn input_grid() -> Vec<ScoringInput> {
    let statuses = LeadStatus::ALL;
    let visit_offsets = [None, Some(-48), Some(48)];
    let activity_offsets = [None, Some(1), Some(50), Some(24 * 6), Some(24 * 11)];
    let message_counts = [0, 1, 3, 5];
    let response_times = [None, Some(30.0), Some(300.0), Some(1000.0), Some(5000.0)];
    let budgets = [None, Some(0.0), Some(6_000_000.0)];
    let prices = [None, Some(6_500_000.0), Some(20_000_000.0)];

    let mut inputs = Vec::new();
    for source in LeadSource::ALL {
        for status in statuses {
            for visit in visit_offsets {
                for activity in activity_offsets {
                    let mut lead = LeadSnapshot::new("grid", source, status);
                    lead.visit_scheduled_at = visit.map(|h| now() + Duration::hours(h));
                    lead.last_interaction_at = activity.map(|h| now() - Duration::hours(h));
                    for messages in message_counts {
                        for (i, response) in response_times.iter().enumerate() {
                            let mut lead = lead.clone();
                            lead.budget = budgets[i % budgets.len()];
                            inputs.push(ScoringInput {
                                lead,
                                message_count: messages,
                                first_response_time_minutes: *response,
                                target_property_price: prices[(i + messages as usize) % prices.len()],
                            });
                        }
                    }
                }
            }
        }
    }
    inputs
}

#[test]
fn test_total_score_always_clamped() {
    for input in input_grid() {
        let breakdown = calculate_lead_score_at(&input, now());
        assert!(breakdown.total_score <= 100, "{:?}", input);
        let expected = breakdown.raw_total().clamp(0, 100) as u32;
        assert_eq!(breakdown.total_score, expected);
    }
}

#[test]
fn test_priority_always_derived_from_total() {
    for input in input_grid() {
        let breakdown = calculate_lead_score_at(&input, now());
        assert_eq!(breakdown.priority, get_lead_priority(breakdown.total_score));
    }
}

#[test]
fn test_scoring_is_idempotent() {
    for input in input_grid().into_iter().step_by(7) {
        let first = calculate_lead_score_at(&input, now());
        let second = calculate_lead_score_at(&input, now());
        assert_eq!(first, second);
    }
}

#[test]
fn test_zero_signal_lead() {
    let input = ScoringInput::new(snapshot(LeadSource::Manual, LeadStatus::New), 0);
    let breakdown = calculate_lead_score_at(&input, now());
    assert_eq!(breakdown.total_score, 12);
    assert_eq!(breakdown.priority, LeadPriority::Cold);
}

#[test]
fn test_closed_won_reaches_ceiling() {
    let mut lead = snapshot(LeadSource::Website, LeadStatus::ClosedWon);
    lead.budget = Some(9_000_000.0);
    let input = ScoringInput::new(lead, 6)
        .with_first_response_time(30.0)
        .with_target_property_price(10_000_000.0);

    let breakdown = calculate_lead_score_at(&input, now());
    assert_eq!(breakdown.budget_score, 15);
    assert_eq!(breakdown.raw_total(), 100);
    assert_eq!(breakdown.total_score, 100);
    assert_eq!(breakdown.priority, LeadPriority::Hot);
}

#[test]
fn test_stale_csv_lead_floors_at_zero() {
    let mut lead = snapshot(LeadSource::Csv, LeadStatus::New);
    lead.last_interaction_at = Some(now() - Duration::days(12));
    let breakdown = calculate_lead_score_at(&ScoringInput::new(lead, 0), now());

    assert_eq!(breakdown.recency_score, 0);
    assert_eq!(breakdown.source_score, 3);
    assert_eq!(breakdown.penalties, -25);
    assert_eq!(breakdown.raw_total(), -22);
    assert_eq!(breakdown.total_score, 0);
    assert_eq!(breakdown.priority, LeadPriority::Cold);
}

#[test]
fn test_closed_lost_subtracts_fifty() {
    // 25 response + 15 engagement + 10 recency + 10 source = 60 before the penalty
    let input = ScoringInput::new(snapshot(LeadSource::Website, LeadStatus::ClosedLost), 3)
        .with_first_response_time(45.0);
    let breakdown = calculate_lead_score_at(&input, now());

    assert_eq!(breakdown.raw_total() - breakdown.penalties, 60);
    assert_eq!(breakdown.penalties, -50);
    assert_eq!(breakdown.total_score, 10);
    assert_eq!(breakdown.priority, LeadPriority::Cold);
}

#[test]
fn test_missed_visit_and_stale_penalty_both_apply() {
    let mut lead = snapshot(LeadSource::Portal, LeadStatus::Contacted);
    lead.visit_scheduled_at = Some(now() - Duration::days(8));
    lead.last_interaction_at = Some(now() - Duration::days(7));
    let breakdown = calculate_lead_score_at(&ScoringInput::new(lead, 0), now());

    assert_eq!(breakdown.visit_score, -10);
    assert_eq!(breakdown.penalties, -15);
}

#[test]
fn test_initial_score_bounds() {
    assert_eq!(calculate_initial_score(LeadSource::Website, true), 25);
    for source in LeadSource::ALL {
        let without = calculate_initial_score(source, false);
        let with = calculate_initial_score(source, true);
        assert!(with >= without);
        assert!(with <= 100);
    }
}

#[test]
fn test_lead_lifecycle_through_engine() {
    let engine = LeadScoringEngine::new();

    // Created from the website form with a budget
    let mut lead = LeadSnapshot::new("lead-42", LeadSource::Website, LeadStatus::New);
    lead.budget = Some(12_000_000.0);
    lead.created_at = Some(now() - Duration::days(3));
    let created = engine.assess_new_lead(&mut lead);
    assert_eq!(created.score, 25);
    assert_eq!(lead.lead_priority, LeadPriority::Cold);

    // Agent replied fast, visit booked, conversation active
    lead.status = LeadStatus::VisitScheduled;
    lead.visit_scheduled_at = Some(now() + Duration::days(2));
    lead.last_interaction_at = Some(now() - Duration::hours(5));
    let metrics = EngagementMetrics {
        message_count: 5,
        first_response_time_minutes: Some(20.0),
        target_property_price: Some(12_500_000.0),
    };
    let breakdown = engine.rescore(&mut lead, &metrics, now());
    assert_eq!(breakdown.total_score, 95);
    assert_eq!(lead.lead_score, 95);
    assert_eq!(lead.lead_priority, LeadPriority::Hot);

    // Deal lost
    lead.status = LeadStatus::ClosedLost;
    engine.rescore(&mut lead, &metrics, now());
    assert_eq!(lead.lead_score, 45);
    assert_eq!(lead.lead_priority, LeadPriority::Cold);
}

#[test]
fn test_shipped_scoring_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/scoring.yaml");
    let config = ScoringConfig::load(path).unwrap();
    assert_eq!(config, ScoringConfig::default());

    let engine = LeadScoringEngine::from_config(&config).unwrap();
    let input = ScoringInput::new(snapshot(LeadSource::Manual, LeadStatus::New), 0);
    assert_eq!(engine.score_at(&input, now()).total_score, 12);
}

#[test]
fn test_lead_snapshot_from_document_json() {
    let raw = r#"{
        "id": "lead-doc",
        "source": "walk-in",
        "status": "negotiation",
        "budget": 5000000,
        "last_interaction_at": "2025-01-20T08:15:00Z",
        "created_at": "2025-01-02T10:00:00Z",
        "lead_score": 14,
        "lead_priority": "COLD"
    }"#;
    let mut lead: LeadSnapshot = serde_json::from_str(raw).unwrap();
    let engine = LeadScoringEngine::new();

    let metrics = EngagementMetrics {
        message_count: 2,
        ..Default::default()
    };
    let breakdown = engine.rescore(&mut lead, &metrics, now());
    // 5 engagement + 8 budget only + 10 recency + 4 source
    assert_eq!(breakdown.total_score, 27);

    let json = serde_json::to_value(&lead).unwrap();
    assert_eq!(json["lead_score"], 27);
    assert_eq!(json["lead_priority"], "COLD");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scoring_needs_no_locking() {
    let engine = Arc::new(LeadScoringEngine::new());
    let inputs = Arc::new(input_grid());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let engine = Arc::clone(&engine);
        let inputs = Arc::clone(&inputs);
        handles.push(tokio::spawn(async move {
            inputs
                .iter()
                .skip(worker)
                .step_by(8)
                .map(|input| (input.clone(), engine.score_at(input, now())))
                .collect::<Vec<_>>()
        }));
    }

    for handle in handles {
        for (input, breakdown) in handle.await.unwrap() {
            assert_eq!(breakdown, calculate_lead_score_at(&input, now()));
        }
    }
}
