//! Festival Snapshot
//!
//! One fetched, internally consistent copy of everything the dashboard shows.
//!
//! # Critical Invariants
//!
//! 1. **Wholesale replacement**: a snapshot is never merged with an older one
//! 2. **Vitals patching**: only `budget` (with its `current_budget` mirror)
//!    and `reputation` are ever modified after fetch
//! 3. **Lenient shape**: missing lists are empty, missing numbers are zero;
//!    only a missing `festival` object is an error

use crate::models::bonus::{Synergy, VendorRelationship};
use crate::models::event::GameEvent;
use crate::models::roster::{Artist, Vendor};
use crate::serde_utils::{lenient_vec, null_as_default};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days shown when the server omits `days_remaining`
pub const DEFAULT_DAYS_REMAINING: i64 = 365;

/// Errors raised when a snapshot lacks required structure
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Malformed snapshot: missing festival object")]
    MalformedSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
    #[default]
    #[serde(other)]
    Other,
}

/// A marketing campaign running (or finished) for the festival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingCampaign {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CampaignStatus,

    /// Fraction of full effectiveness (1.0 = 100%)
    #[serde(default, deserialize_with = "null_as_default")]
    pub effectiveness: f64,
}

impl MarketingCampaign {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

/// A ticket tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "type", default)]
    pub ticket_type: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sold_quantity: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,

    #[serde(default)]
    pub total_quantity: Option<u64>,
}

impl Ticket {
    pub fn revenue(&self) -> f64 {
        self.sold_quantity as f64 * self.price
    }
}

/// Festival vitals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Festival {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: f64,

    /// Remaining budget; the server mirrors `budget` here
    #[serde(default)]
    pub current_budget: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reputation: f64,

    #[serde(default)]
    pub days_remaining: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub venue_capacity: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub marketing_budget: f64,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub marketing: Vec<MarketingCampaign>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub events: Vec<GameEvent>,
}

impl Festival {
    /// Budget still available (`current_budget`, else `budget`)
    pub fn available_budget(&self) -> f64 {
        self.current_budget.unwrap_or(self.budget)
    }

    /// Days until the festival starts (365 when unknown)
    pub fn days_until_start(&self) -> i64 {
        self.days_remaining.unwrap_or(DEFAULT_DAYS_REMAINING)
    }

    /// Apply server-authoritative vitals; `None` leaves a field unchanged
    pub fn apply_vitals(&mut self, budget: Option<f64>, reputation: Option<f64>) {
        if let Some(budget) = budget {
            self.budget = budget;
            if self.current_budget.is_some() {
                self.current_budget = Some(budget);
            }
        }
        if let Some(reputation) = reputation {
            self.reputation = reputation;
        }
    }
}

/// Aggregate root returned by `GET /api/festival/{id}`
///
/// # Example
///
/// ```rust
/// use festival_dashboard_core::models::FestivalSnapshot;
///
/// let snapshot: FestivalSnapshot = serde_json::from_str(r#"{
///     "festival": {"budget": 100000, "reputation": 50},
///     "tickets": [{"sold_quantity": 40, "price": 50.0}, {"sold_quantity": 10, "price": 80.0}]
/// }"#).unwrap();
///
/// assert_eq!(snapshot.total_tickets_sold(), 50);
/// assert!(snapshot.artists.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FestivalSnapshot {
    #[serde(default)]
    pub festival: Option<Festival>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub artists: Vec<Artist>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub vendors: Vec<Vendor>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub tickets: Vec<Ticket>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub synergies: Vec<Synergy>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub vendor_relationships: Vec<VendorRelationship>,

    /// Campaigns as emitted at the top level by the server
    #[serde(default, deserialize_with = "lenient_vec")]
    pub marketing: Vec<MarketingCampaign>,

    /// Events as emitted at the top level by the server
    #[serde(default, deserialize_with = "lenient_vec")]
    pub events: Vec<GameEvent>,
}

impl FestivalSnapshot {
    /// The festival object, or `MalformedSnapshot` when absent
    pub fn festival(&self) -> Result<&Festival, SnapshotError> {
        self.festival.as_ref().ok_or(SnapshotError::MalformedSnapshot)
    }

    /// Marketing campaigns: nested `festival.marketing` wins when non-empty,
    /// otherwise the top-level list
    pub fn campaigns(&self) -> &[MarketingCampaign] {
        match &self.festival {
            Some(festival) if !festival.marketing.is_empty() => &festival.marketing,
            _ => &self.marketing,
        }
    }

    /// Game events, resolved with the same precedence as [`Self::campaigns`]
    pub fn events(&self) -> &[GameEvent] {
        match &self.festival {
            Some(festival) if !festival.events.is_empty() => &festival.events,
            _ => &self.events,
        }
    }

    pub fn find_event(&self, event_type: &str) -> Option<&GameEvent> {
        self.events().iter().find(|e| e.event_type == event_type)
    }

    pub fn total_tickets_sold(&self) -> u64 {
        self.tickets.iter().map(|t| t.sold_quantity).sum()
    }

    /// Patch budget and reputation in place. Returns false when there is no festival.
    pub fn apply_vitals(&mut self, budget: Option<f64>, reputation: Option<f64>) -> bool {
        match self.festival.as_mut() {
            Some(festival) => {
                festival.apply_vitals(budget, reputation);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_festival_is_malformed() {
        let snapshot: FestivalSnapshot = serde_json::from_value(json!({ "artists": [] })).unwrap();
        assert_eq!(snapshot.festival(), Err(SnapshotError::MalformedSnapshot));
    }

    #[test]
    fn test_nested_campaigns_take_precedence() {
        let snapshot: FestivalSnapshot = serde_json::from_value(json!({
            "festival": { "marketing": [{ "name": "Radio", "status": "active", "effectiveness": 0.5 }] },
            "marketing": [{ "name": "Flyers", "status": "active" }]
        }))
        .unwrap();
        assert_eq!(snapshot.campaigns().len(), 1);
        assert_eq!(snapshot.campaigns()[0].name, "Radio");
    }

    #[test]
    fn test_top_level_events_used_when_nested_empty() {
        let snapshot: FestivalSnapshot = serde_json::from_value(json!({
            "festival": { "budget": 1000 },
            "events": [{ "type": "storm" }]
        }))
        .unwrap();
        assert!(snapshot.find_event("storm").is_some());
    }

    #[test]
    fn test_apply_vitals_keeps_mirror_in_sync() {
        let mut snapshot: FestivalSnapshot = serde_json::from_value(json!({
            "festival": { "budget": 50000, "current_budget": 50000, "reputation": 40 }
        }))
        .unwrap();

        assert!(snapshot.apply_vitals(Some(45000.0), None));
        let festival = snapshot.festival().unwrap();
        assert_eq!(festival.budget, 45000.0);
        assert_eq!(festival.current_budget, Some(45000.0));
        assert_eq!(festival.reputation, 40.0);
    }

    #[test]
    fn test_days_default() {
        let festival: Festival = serde_json::from_value(json!({ "days_remaining": null })).unwrap();
        assert_eq!(festival.days_until_start(), DEFAULT_DAYS_REMAINING);
    }
}
