//! Render Pipeline
//!
//! Applies a [`FestivalSnapshot`] onto the dashboard's output slots in a
//! fixed order:
//!
//! 1. Aggregate stats (budget, tickets sold, artist and vendor counts)
//! 2. Days remaining
//! 3. Entity lists (artists, vendors, open incident alerts)
//! 4. Analytics (financials, score, tiers, marketing, operational counts)
//! 5. Synergies
//! 6. Vendor relationships
//! 7. Sidebar (event board, risk, recommendations, highlights)
//!
//! # Critical Invariants
//!
//! 1. **Validate first**: a snapshot without a festival object fails before
//!    any slot is written
//! 2. **Deterministic**: rendering the same snapshot and board twice yields
//!    byte-identical slot values
//! 3. **Read-only**: rendering never mutates the snapshot

pub mod format;
pub mod slot;

pub use format::{format_currency, format_number, format_percent};
pub use slot::{
    AlertRow, ArtistRow, CardStatus, DaysRemaining, EventCard, HighlightRow, Notice,
    OptionButton, RelationshipRow, Slot, SlotFrame, SlotValue, SlotWriter, SynergyRow, VendorRow,
};

use crate::config::DEFAULT_INITIAL_BUDGET;
use crate::coordinator::{EventBoard, EventPhase};
use crate::metrics::{
    approaching_artists, approaching_vendors, artist_popularity, budget_usage, financials,
    marketing_effectiveness, marketing_recommendations, operational_counts, revenue_projection,
    risk_assessment, satisfaction_tier, vendor_quality, ScoreBreakdown,
};
use crate::models::{
    Artist, Festival, FestivalSnapshot, GameEvent, Incident, RelationshipKind, SnapshotError,
    Tone, Vendor,
};
use tracing::{debug, error};

/// Stateless apart from the starting budget used by the budget chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPipeline {
    initial_budget: f64,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_BUDGET)
    }
}

impl RenderPipeline {
    pub fn new(initial_budget: f64) -> Self {
        Self { initial_budget }
    }

    pub fn initial_budget(&self) -> f64 {
        self.initial_budget
    }

    /// Write every dashboard slot for `snapshot`
    pub fn render<W: SlotWriter>(
        &self,
        snapshot: &FestivalSnapshot,
        board: &EventBoard,
        writer: &mut W,
    ) -> Result<(), SnapshotError> {
        let festival = snapshot.festival().map_err(|err| {
            error!(error = %err, "Refusing to render snapshot");
            err
        })?;

        debug!("Rendering aggregate stats");
        write_aggregate_stats(snapshot, festival, writer);

        debug!("Rendering days remaining");
        writer.write(
            Slot::DaysRemaining,
            SlotValue::Days(DaysRemaining::from_days(festival.days_until_start())),
        );

        debug!("Rendering entity lists");
        write_entity_lists(snapshot, writer);

        debug!("Rendering analytics");
        write_analytics(snapshot, festival, writer);

        debug!(count = snapshot.synergies.len(), "Rendering synergies");
        writer.write(Slot::Synergies, SlotValue::Synergies(synergy_rows(snapshot)));

        debug!(
            count = snapshot.vendor_relationships.len(),
            "Rendering vendor relationships"
        );
        writer.write(
            Slot::VendorRelationships,
            SlotValue::Relationships(relationship_rows(snapshot)),
        );

        debug!("Rendering sidebar");
        self.write_sidebar(snapshot, festival, board, writer);

        Ok(())
    }

    /// Write the four chart series. Only called after a fresh fetch.
    pub fn render_charts<W: SlotWriter>(
        &self,
        snapshot: &FestivalSnapshot,
        writer: &mut W,
    ) -> Result<(), SnapshotError> {
        let festival = snapshot.festival()?;
        debug!("Rendering charts");

        writer.write(
            Slot::RevenueChart,
            SlotValue::Series(revenue_projection(festival, snapshot.artists.len())),
        );
        writer.write(
            Slot::BudgetChart,
            SlotValue::Series(budget_usage(festival, self.initial_budget)),
        );
        writer.write(
            Slot::ArtistPopularityChart,
            SlotValue::Series(artist_popularity(&snapshot.artists)),
        );
        writer.write(
            Slot::VendorQualityChart,
            SlotValue::Series(vendor_quality(&snapshot.vendors)),
        );
        Ok(())
    }

    /// Re-write only the event board, after a coordinator state change
    pub fn render_event_board<W: SlotWriter>(
        &self,
        snapshot: &FestivalSnapshot,
        board: &EventBoard,
        writer: &mut W,
    ) {
        writer.write(Slot::EventBoard, SlotValue::Events(event_cards(snapshot, board)));
    }

    fn write_sidebar<W: SlotWriter>(
        &self,
        snapshot: &FestivalSnapshot,
        festival: &Festival,
        board: &EventBoard,
        writer: &mut W,
    ) {
        self.render_event_board(snapshot, board, writer);

        writer.write(Slot::RiskAssessment, SlotValue::Risk(risk_assessment(festival)));
        writer.write(
            Slot::MarketingRecommendations,
            SlotValue::Recommendations(
                marketing_recommendations(festival)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
        );

        let artists = approaching_artists(&snapshot.artists)
            .into_iter()
            .map(|a| HighlightRow {
                name: a.name.clone(),
                rating: a.popularity,
                detail: a.genre.clone(),
            })
            .collect();
        writer.write(Slot::ApproachingArtists, SlotValue::Highlights(artists));

        let vendors = approaching_vendors(&snapshot.vendors)
            .into_iter()
            .map(|v| HighlightRow {
                name: v.name.clone(),
                rating: v.quality,
                detail: v.display_specialty().to_string(),
            })
            .collect();
        writer.write(Slot::ApproachingVendors, SlotValue::Highlights(vendors));
    }
}

fn write_aggregate_stats<W: SlotWriter>(
    snapshot: &FestivalSnapshot,
    festival: &Festival,
    writer: &mut W,
) {
    writer.write(Slot::Budget, SlotValue::Currency(festival.available_budget()));
    writer.write(Slot::TicketsSold, SlotValue::Count(snapshot.total_tickets_sold()));
    writer.write(Slot::ArtistsCount, SlotValue::Count(snapshot.artists.len() as u64));
    writer.write(Slot::VendorsCount, SlotValue::Count(snapshot.vendors.len() as u64));
}

fn write_entity_lists<W: SlotWriter>(snapshot: &FestivalSnapshot, writer: &mut W) {
    let artists = snapshot.artists.iter().map(artist_row).collect();
    writer.write(Slot::ArtistList, SlotValue::Artists(artists));

    let vendors = snapshot.vendors.iter().map(vendor_row).collect();
    writer.write(Slot::VendorList, SlotValue::Vendors(vendors));

    writer.write(Slot::IncidentAlerts, SlotValue::Alerts(incident_alerts(snapshot)));
}

fn write_analytics<W: SlotWriter>(
    snapshot: &FestivalSnapshot,
    festival: &Festival,
    writer: &mut W,
) {
    let money = financials(festival, &snapshot.tickets);
    writer.write(Slot::TotalRevenue, SlotValue::Currency(money.total_revenue));
    writer.write(Slot::BudgetUsed, SlotValue::Percent(money.budget_used_pct));
    writer.write(Slot::AvgTicketPrice, SlotValue::Currency(money.avg_ticket_price));
    writer.write(Slot::Roi, SlotValue::Percent(money.roi_pct));

    let score = ScoreBreakdown::compute(snapshot);
    debug!(?score, "Festival score components");
    writer.write(
        Slot::FestivalScore,
        SlotValue::Score {
            value: score.total(),
            max: 100,
        },
    );

    writer.write(
        Slot::ArtistSatisfaction,
        SlotValue::Tier(satisfaction_tier(&snapshot.artists)),
    );
    writer.write(
        Slot::VendorSatisfaction,
        SlotValue::Tier(satisfaction_tier(&snapshot.vendors)),
    );
    writer.write(
        Slot::MarketingEffectiveness,
        SlotValue::WholePercent(marketing_effectiveness(snapshot)),
    );

    let counts = operational_counts(snapshot);
    writer.write(Slot::TotalArtists, SlotValue::Count(counts.artists as u64));
    writer.write(Slot::TotalVendors, SlotValue::Count(counts.vendors as u64));
    writer.write(Slot::ActiveMarketing, SlotValue::Count(counts.active_campaigns as u64));
    writer.write(Slot::PendingEvents, SlotValue::Count(counts.pending_events as u64));
}

fn artist_row(artist: &Artist) -> ArtistRow {
    ArtistRow {
        name: artist.name.clone(),
        genre: artist.genre.clone(),
        popularity: artist.popularity,
        status: artist.status,
    }
}

fn vendor_row(vendor: &Vendor) -> VendorRow {
    VendorRow {
        id: vendor.id,
        name: vendor.name.clone(),
        specialty: vendor.display_specialty().to_string(),
        quality: vendor.quality,
        placement: vendor.placement().to_string(),
        badges: vendor.specialty_badges(),
    }
}

/// Open incidents, artists first then vendors
fn incident_alerts(snapshot: &FestivalSnapshot) -> Vec<AlertRow> {
    let artists = snapshot.artists.iter().map(|a| &a.incident);
    let vendors = snapshot.vendors.iter().map(|v| &v.incident);
    artists
        .chain(vendors)
        .filter(|incident| incident.is_open())
        .map(alert_row)
        .collect()
}

fn alert_row(incident: &Incident) -> AlertRow {
    AlertRow {
        title: incident.title.clone().unwrap_or_default(),
        description: incident.description.clone().unwrap_or_default(),
        timestamp: incident.timestamp.clone().unwrap_or_default(),
        tone: incident.severity.unwrap_or_default().alert_tone(),
    }
}

fn synergy_rows(snapshot: &FestivalSnapshot) -> Vec<SynergyRow> {
    snapshot
        .synergies
        .iter()
        .map(|s| SynergyRow {
            name: s.name.clone(),
            description: s.description.clone(),
            artist_count: s.artist_count,
            marketing_bonus_pct: whole_percent(s.marketing_bonus),
            reputation_bonus: s.reputation_bonus,
        })
        .collect()
}

fn whole_percent(fraction: f64) -> i64 {
    let pct = (fraction * 100.0).round();
    if pct.is_finite() {
        pct as i64
    } else {
        0
    }
}

fn relationship_rows(snapshot: &FestivalSnapshot) -> Vec<RelationshipRow> {
    snapshot
        .vendor_relationships
        .iter()
        .map(|r| RelationshipRow {
            vendor1: r.vendor1.clone(),
            vendor2: r.vendor2.clone(),
            effect: r.effect.clone(),
            kind: r.kind,
            tone: match r.kind {
                RelationshipKind::Complementary => Tone::Success,
                _ => Tone::Warning,
            },
        })
        .collect()
}

/// Visible event cards in snapshot order
fn event_cards(snapshot: &FestivalSnapshot, board: &EventBoard) -> Vec<EventCard> {
    snapshot
        .events()
        .iter()
        .filter_map(|event| event_card(event, board.phase(&event.event_type)))
        .collect()
}

fn event_card(event: &GameEvent, phase: &EventPhase) -> Option<EventCard> {
    let (status, resolution) = match phase {
        EventPhase::Dismissed => return None,
        EventPhase::Submitting { .. } => (CardStatus::Submitting, None),
        EventPhase::Resolved { message, .. } => (CardStatus::Resolved, Some(message.clone())),
        EventPhase::Unresolved if event.resolved => (CardStatus::Resolved, None),
        EventPhase::Unresolved => (CardStatus::Open, None),
    };
    let enabled = status == CardStatus::Open;
    let tone = if status == CardStatus::Resolved {
        Tone::Success
    } else {
        event.severity.board_tone()
    };

    Some(EventCard {
        event_type: event.event_type.clone(),
        description: event.description.clone(),
        tone,
        effects: event.effect_summaries(),
        options: event
            .interactive_options
            .iter()
            .map(|o| OptionButton {
                id: o.id.clone(),
                label: o.label.clone(),
                cost: o.cost,
                description: o.description.clone(),
                enabled,
            })
            .collect(),
        status,
        resolution,
        timestamp: event.timestamp.clone().unwrap_or_default(),
    })
}
