//! Output slots
//!
//! A slot is a named output target. The pipeline hands each slot a
//! structured [`SlotValue`]; turning it into pixels is the UI layer's job.
//! Values also implement `Display` for plain-text consumers.

use crate::metrics::{ChartSeries, RiskAssessment, SatisfactionTier};
use crate::models::{EngagementStatus, RelationshipKind, Tone};
use crate::render::format::{format_currency, format_number, format_percent};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Every output target the dashboard updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    // Aggregate stats
    Budget,
    TicketsSold,
    ArtistsCount,
    VendorsCount,
    DaysRemaining,

    // Entity lists
    ArtistList,
    VendorList,
    IncidentAlerts,

    // Analytics
    TotalRevenue,
    BudgetUsed,
    AvgTicketPrice,
    Roi,
    FestivalScore,
    ArtistSatisfaction,
    VendorSatisfaction,
    MarketingEffectiveness,
    TotalArtists,
    TotalVendors,
    ActiveMarketing,
    PendingEvents,

    Synergies,
    VendorRelationships,

    // Sidebar
    EventBoard,
    RiskAssessment,
    MarketingRecommendations,
    ApproachingArtists,
    ApproachingVendors,

    // Charts
    RevenueChart,
    BudgetChart,
    ArtistPopularityChart,
    VendorQualityChart,

    Notification,
}

/// Days-remaining display: a count, or the festival is today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysRemaining {
    Days(i64),
    Today,
}

impl DaysRemaining {
    pub fn from_days(days: i64) -> Self {
        if days > 0 {
            DaysRemaining::Days(days)
        } else {
            DaysRemaining::Today
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRow {
    pub name: String,
    pub genre: String,
    pub popularity: f64,
    pub status: EngagementStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRow {
    pub id: Option<u64>,
    pub name: String,
    pub specialty: String,
    pub quality: f64,
    pub placement: String,
    pub badges: Vec<String>,
}

/// An unresolved incident raised by an artist or vendor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub title: String,
    pub description: String,
    pub timestamp: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergyRow {
    pub name: String,
    pub description: String,
    pub artist_count: u32,
    /// Whole percent
    pub marketing_bonus_pct: i64,
    pub reputation_bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipRow {
    pub vendor1: String,
    pub vendor2: String,
    pub effect: String,
    pub kind: RelationshipKind,
    pub tone: Tone,
}

/// A featured artist (by popularity) or vendor (by quality)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightRow {
    pub name: String,
    pub rating: f64,
    pub detail: String,
}

/// Where an event card stands from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    /// Options clickable
    Open,
    /// Response in flight, options disabled
    Submitting,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionButton {
    pub id: String,
    pub label: String,
    pub cost: f64,
    pub description: String,
    pub enabled: bool,
}

/// An interactive game event on the sidebar board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCard {
    pub event_type: String,
    pub description: String,
    pub tone: Tone,
    pub effects: Vec<String>,
    pub options: Vec<OptionButton>,
    pub status: CardStatus,
    pub resolution: Option<String>,
    pub timestamp: String,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
}

impl Notice {
    pub fn new(tone: Tone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
        }
    }
}

/// Structured value written to a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SlotValue {
    Currency(f64),
    Count(u64),
    /// One decimal place
    Percent(f64),
    WholePercent(u16),
    Score { value: u8, max: u8 },
    Days(DaysRemaining),
    Tier(SatisfactionTier),
    Risk(RiskAssessment),
    Artists(Vec<ArtistRow>),
    Vendors(Vec<VendorRow>),
    Alerts(Vec<AlertRow>),
    Synergies(Vec<SynergyRow>),
    Relationships(Vec<RelationshipRow>),
    Recommendations(Vec<String>),
    Highlights(Vec<HighlightRow>),
    Events(Vec<EventCard>),
    Series(ChartSeries),
    Notice(Notice),
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Currency(amount) => f.write_str(&format_currency(*amount)),
            SlotValue::Count(n) => f.write_str(&format_number(*n)),
            SlotValue::Percent(p) => f.write_str(&format_percent(*p)),
            SlotValue::WholePercent(p) => write!(f, "{p}%"),
            SlotValue::Score { value, max } => write!(f, "{value}/{max}"),
            SlotValue::Days(DaysRemaining::Days(d)) => write!(f, "{d}"),
            SlotValue::Days(DaysRemaining::Today) => f.write_str("Today!"),
            SlotValue::Tier(tier) => write!(f, "{tier}"),
            SlotValue::Risk(risk) => write!(f, "{} Risk ({}/100)", risk.tier, risk.score),
            SlotValue::Artists(rows) if rows.is_empty() => f.write_str("No artists hired yet."),
            SlotValue::Artists(rows) => write_lines(f, rows, |r| {
                format!("{} ({} • Popularity: {}) [{}]", r.name, r.genre, r.popularity, r.status.as_str())
            }),
            SlotValue::Vendors(rows) if rows.is_empty() => f.write_str("No vendors hired yet."),
            SlotValue::Vendors(rows) => write_lines(f, rows, |r| {
                format!(
                    "{} ({} • Quality: {}/100) Placement: {}",
                    r.name, r.specialty, r.quality, r.placement
                )
            }),
            SlotValue::Alerts(rows) if rows.is_empty() => f.write_str("No events at the moment."),
            SlotValue::Alerts(rows) => {
                write_lines(f, rows, |r| format!("{}: {} {}", r.title, r.description, r.timestamp))
            }
            SlotValue::Synergies(rows) if rows.is_empty() => f.write_str(
                "No synergies available yet. Hire more artists to unlock synergies!",
            ),
            SlotValue::Synergies(rows) => write_lines(f, rows, |r| {
                format!(
                    "{}: Artists: {} | Marketing Bonus: +{}% | Reputation Bonus: +{}",
                    r.name, r.artist_count, r.marketing_bonus_pct, r.reputation_bonus
                )
            }),
            SlotValue::Relationships(rows) if rows.is_empty() => f.write_str(
                "No vendor relationships to display. Hire more vendors to see relationships!",
            ),
            SlotValue::Relationships(rows) => write_lines(f, rows, |r| {
                format!("{} & {}: {}", r.vendor1, r.vendor2, r.effect)
            }),
            SlotValue::Recommendations(lines) => write_lines(f, lines, |l| l.clone()),
            SlotValue::Highlights(rows) => {
                write_lines(f, rows, |r| format!("{} ({}/100) {}", r.name, r.rating, r.detail))
            }
            SlotValue::Events(cards) if cards.is_empty() => f.write_str("No events at the moment."),
            SlotValue::Events(cards) => write_lines(f, cards, |c| match &c.resolution {
                Some(message) => format!("Event Resolved: {message}"),
                None => format!("{}: {} {}", c.event_type, c.description, c.effects.join(", ")),
            }),
            SlotValue::Series(series) => {
                let pairs: Vec<String> = series
                    .labels
                    .iter()
                    .zip(&series.values)
                    .map(|(l, v)| format!("{l}={v}"))
                    .collect();
                f.write_str(&pairs.join(", "))
            }
            SlotValue::Notice(notice) => f.write_str(&notice.message),
        }
    }
}

fn write_lines<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    line: impl Fn(&T) -> String,
) -> fmt::Result {
    let lines: Vec<String> = items.iter().map(line).collect();
    f.write_str(&lines.join("\n"))
}

/// Receives slot updates. Implemented by the UI layer.
pub trait SlotWriter {
    fn write(&mut self, slot: Slot, value: SlotValue);
}

impl<W: SlotWriter + ?Sized> SlotWriter for &mut W {
    fn write(&mut self, slot: Slot, value: SlotValue) {
        (**self).write(slot, value);
    }
}

/// In-memory [`SlotWriter`] keeping the latest value per slot and the order
/// of writes.
#[derive(Debug, Clone, Default)]
pub struct SlotFrame {
    values: BTreeMap<Slot, SlotValue>,
    writes: Vec<Slot>,
}

impl SlotFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.values.get(&slot)
    }

    /// Text of a slot, if written
    pub fn text(&self, slot: Slot) -> Option<String> {
        self.get(slot).map(|v| v.to_string())
    }

    /// Every write in order, including repeats
    pub fn writes(&self) -> &[Slot] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.writes.clear();
    }

    /// Canonical serialisation of the current slot values
    pub fn to_bytes(&self) -> Vec<u8> {
        // Slot keys are unit variants and values are plain data, so this cannot fail
        serde_json::to_vec(&self.values).unwrap_or_default()
    }

    /// SHA-256 of [`Self::to_bytes`], hex encoded
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.to_bytes()))
    }
}

impl SlotWriter for SlotFrame {
    fn write(&mut self, slot: Slot, value: SlotValue) {
        self.writes.push(slot);
        self.values.insert(slot, value);
    }
}
