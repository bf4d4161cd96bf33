//! Tests for RenderPipeline
//!
//! Renders into a `SlotFrame` and checks slot order, values and that a
//! second render of the same input is byte-identical.

mod common;

use common::{festival_with_storm, snapshot};
use festival_dashboard_core::coordinator::EventBoard;
use festival_dashboard_core::metrics::{RiskTier, SatisfactionTier};
use festival_dashboard_core::models::{FestivalSnapshot, Tone};
use festival_dashboard_core::render::{CardStatus, DaysRemaining};
use festival_dashboard_core::{RenderPipeline, Slot, SlotFrame, SlotValue, SnapshotError};
use serde_json::json;

fn render(snapshot: &FestivalSnapshot) -> SlotFrame {
    let mut frame = SlotFrame::new();
    RenderPipeline::default()
        .render(snapshot, &EventBoard::new(), &mut frame)
        .unwrap();
    frame
}

#[test]
fn test_slots_written_in_pipeline_order() {
    let frame = render(&snapshot(festival_with_storm()));

    let expected = vec![
        Slot::Budget,
        Slot::TicketsSold,
        Slot::ArtistsCount,
        Slot::VendorsCount,
        Slot::DaysRemaining,
        Slot::ArtistList,
        Slot::VendorList,
        Slot::IncidentAlerts,
        Slot::TotalRevenue,
        Slot::BudgetUsed,
        Slot::AvgTicketPrice,
        Slot::Roi,
        Slot::FestivalScore,
        Slot::ArtistSatisfaction,
        Slot::VendorSatisfaction,
        Slot::MarketingEffectiveness,
        Slot::TotalArtists,
        Slot::TotalVendors,
        Slot::ActiveMarketing,
        Slot::PendingEvents,
        Slot::Synergies,
        Slot::VendorRelationships,
        Slot::EventBoard,
        Slot::RiskAssessment,
        Slot::MarketingRecommendations,
        Slot::ApproachingArtists,
        Slot::ApproachingVendors,
    ];
    assert_eq!(frame.writes(), expected.as_slice());
}

#[test]
fn test_render_is_idempotent() {
    let snapshot = snapshot(festival_with_storm());
    let first = render(&snapshot);
    let second = render(&snapshot);

    assert_eq!(first.to_bytes(), second.to_bytes());
    assert_eq!(first.digest(), second.digest());
}

#[test]
fn test_missing_festival_writes_nothing() {
    let mut frame = SlotFrame::new();
    let result = RenderPipeline::default().render(
        &snapshot(json!({"artists": [{"name": "Orphan"}]})),
        &EventBoard::new(),
        &mut frame,
    );

    assert_eq!(result, Err(SnapshotError::MalformedSnapshot));
    assert!(frame.is_empty());
    assert!(frame.writes().is_empty());
}

#[test]
fn test_aggregate_and_analytics_values() {
    let frame = render(&snapshot(festival_with_storm()));

    assert_eq!(frame.text(Slot::Budget).as_deref(), Some("$50,000"));
    assert_eq!(frame.get(Slot::TicketsSold), Some(&SlotValue::Count(120)));
    assert_eq!(frame.get(Slot::ArtistsCount), Some(&SlotValue::Count(2)));
    assert_eq!(frame.get(Slot::VendorsCount), Some(&SlotValue::Count(1)));
    assert_eq!(
        frame.get(Slot::DaysRemaining),
        Some(&SlotValue::Days(DaysRemaining::Days(45)))
    );

    assert_eq!(frame.text(Slot::TotalRevenue).as_deref(), Some("$6,000"));
    assert_eq!(frame.text(Slot::BudgetUsed).as_deref(), Some("0.0%"));
    assert_eq!(frame.text(Slot::AvgTicketPrice).as_deref(), Some("$50"));
    assert_eq!(frame.text(Slot::Roi).as_deref(), Some("-88.0%"));

    // 25 budget + 20 artists + 5 vendors + 0 marketing + 12 tickets
    assert_eq!(
        frame.get(Slot::FestivalScore),
        Some(&SlotValue::Score { value: 62, max: 100 })
    );
    assert_eq!(
        frame.get(Slot::ArtistSatisfaction),
        Some(&SlotValue::Tier(SatisfactionTier::Fair))
    );
    assert_eq!(
        frame.get(Slot::VendorSatisfaction),
        Some(&SlotValue::Tier(SatisfactionTier::Excellent))
    );
    assert_eq!(frame.text(Slot::MarketingEffectiveness).as_deref(), Some("100%"));
    assert_eq!(frame.get(Slot::PendingEvents), Some(&SlotValue::Count(1)));
}

#[test]
fn test_days_remaining_today_sentinel() {
    let frame = render(&snapshot(json!({"festival": {"budget": 100, "days_remaining": 0}})));
    assert_eq!(frame.text(Slot::DaysRemaining).as_deref(), Some("Today!"));

    let frame = render(&snapshot(json!({"festival": {"budget": 100}})));
    assert_eq!(frame.text(Slot::DaysRemaining).as_deref(), Some("365"));
}

#[test]
fn test_empty_lists_render_placeholders() {
    let frame = render(&snapshot(json!({"festival": {"budget": 100}})));

    assert_eq!(frame.text(Slot::ArtistList).as_deref(), Some("No artists hired yet."));
    assert_eq!(frame.text(Slot::VendorList).as_deref(), Some("No vendors hired yet."));
    assert_eq!(frame.text(Slot::IncidentAlerts).as_deref(), Some("No events at the moment."));
    assert_eq!(
        frame.get(Slot::ArtistSatisfaction),
        Some(&SlotValue::Tier(SatisfactionTier::NotApplicable))
    );
}

#[test]
fn test_incident_alerts_merge_open_incidents() {
    let frame = render(&snapshot(json!({
        "festival": {"budget": 100},
        "artists": [
            {"name": "A", "title": "Stage fright", "description": "Refuses to go on", "severity": "critical"},
            {"name": "B", "title": "Old news", "resolved": true}
        ],
        "vendors": [
            {"name": "V", "title": "Power cut", "description": "Fryers down", "severity": "warning", "timestamp": "12:00"},
            {"name": "W"}
        ]
    })));

    let Some(SlotValue::Alerts(alerts)) = frame.get(Slot::IncidentAlerts) else {
        panic!("expected alerts");
    };
    let titles: Vec<&str> = alerts.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Stage fright", "Power cut"]);
    assert_eq!(alerts[0].tone, Tone::Danger);
    assert_eq!(alerts[1].tone, Tone::Warning);
    assert_eq!(alerts[1].timestamp, "12:00");
}

#[test]
fn test_vendor_rows_and_synergies() {
    let frame = render(&snapshot(json!({
        "festival": {"budget": 100},
        "vendors": [{"name": "Green Bowl", "category": "food", "quality": 70, "vendor_specialties": ["vegan_menu"]}],
        "synergies": [{"name": "Rock Revival", "description": "Rock fans", "artist_count": 3, "marketing_bonus": 0.15, "reputation_bonus": 5}],
        "vendor_relationships": [{"vendor1": "A", "vendor2": "B", "type": "complementary", "effect": "Shared queue"}]
    })));

    assert_eq!(
        frame.text(Slot::VendorList).as_deref(),
        Some("Green Bowl (food • Quality: 70/100) Placement: Food Court")
    );
    let Some(SlotValue::Vendors(rows)) = frame.get(Slot::VendorList) else {
        panic!("expected vendor rows");
    };
    assert_eq!(rows[0].badges, vec!["VEGAN MENU"]);

    assert_eq!(
        frame.text(Slot::Synergies).as_deref(),
        Some("Rock Revival: Artists: 3 | Marketing Bonus: +15% | Reputation Bonus: +5")
    );
    assert_eq!(frame.text(Slot::MarketingEffectiveness).as_deref(), Some("115%"));

    let Some(SlotValue::Relationships(rels)) = frame.get(Slot::VendorRelationships) else {
        panic!("expected relationships");
    };
    assert_eq!(rels[0].tone, Tone::Success);
}

#[test]
fn test_sidebar_values() {
    let frame = render(&snapshot(json!({
        "festival": {"budget": 15000, "reputation": 20, "days_remaining": 10},
        "artists": [{"name": "Headliner", "genre": "pop", "popularity": 95}],
        "vendors": [{"name": "Gourmet", "specialty": "truffles", "quality": 90}]
    })));

    let Some(SlotValue::Risk(risk)) = frame.get(Slot::RiskAssessment) else {
        panic!("expected risk");
    };
    assert_eq!(risk.tier, RiskTier::High);
    assert_eq!(frame.text(Slot::RiskAssessment).as_deref(), Some("High Risk (75/100)"));

    assert_eq!(
        frame.text(Slot::MarketingRecommendations).as_deref(),
        Some("Focus on reputation-building campaigns\nLaunch urgent promotional campaigns")
    );
    assert_eq!(
        frame.text(Slot::ApproachingArtists).as_deref(),
        Some("Headliner (95/100) pop")
    );
    assert_eq!(
        frame.text(Slot::ApproachingVendors).as_deref(),
        Some("Gourmet (90/100) truffles")
    );
}

#[test]
fn test_event_board_cards() {
    let frame = render(&snapshot(festival_with_storm()));

    let Some(SlotValue::Events(cards)) = frame.get(Slot::EventBoard) else {
        panic!("expected event cards");
    };
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].event_type, "storm");
    assert_eq!(cards[0].status, CardStatus::Open);
    assert_eq!(cards[0].options.len(), 2);
    assert_eq!(cards[0].timestamp, "2024-06-01T12:00:00");
}

#[test]
fn test_charts_only_on_request() {
    let snapshot = snapshot(festival_with_storm());
    let pipeline = RenderPipeline::new(100_000.0);
    let mut frame = SlotFrame::new();

    pipeline.render(&snapshot, &EventBoard::new(), &mut frame).unwrap();
    assert!(frame.get(Slot::RevenueChart).is_none());

    pipeline.render_charts(&snapshot, &mut frame).unwrap();
    let Some(SlotValue::Series(revenue)) = frame.get(Slot::RevenueChart) else {
        panic!("expected revenue series");
    };
    // 2000 * $50 * 60% * (1 + 0.2)
    assert_eq!(revenue.labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
    assert!((revenue.values[3] - 72_000.0).abs() < 1e-6);

    let Some(SlotValue::Series(budget)) = frame.get(Slot::BudgetChart) else {
        panic!("expected budget series");
    };
    assert_eq!(budget.values, vec![50_000.0, 50_000.0]);
    assert!(frame.get(Slot::ArtistPopularityChart).is_some());
    assert!(frame.get(Slot::VendorQualityChart).is_some());
}
