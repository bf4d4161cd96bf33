//! Festival score: a 0-100 weighted sum of five independently capped parts.
//!
//! | Component          | Formula                            | Cap |
//! |--------------------|------------------------------------|-----|
//! | budget efficiency  | current / budget * 100             | 25  |
//! | artist quality     | avg popularity / 100 * 25          | 25  |
//! | vendor diversity   | distinct categories * 5            | 20  |
//! | active marketing   | active campaigns * 5               | 15  |
//! | ticket volume      | tickets sold / 10                  | 15  |

use crate::models::FestivalSnapshot;
use std::collections::BTreeSet;

pub const BUDGET_EFFICIENCY_CAP: f64 = 25.0;
pub const ARTIST_QUALITY_CAP: f64 = 25.0;
pub const VENDOR_DIVERSITY_CAP: f64 = 20.0;
pub const ACTIVE_MARKETING_CAP: f64 = 15.0;
pub const TICKET_VOLUME_CAP: f64 = 15.0;

const POINTS_PER_CATEGORY: f64 = 5.0;
const POINTS_PER_CAMPAIGN: f64 = 5.0;
const TICKETS_PER_POINT: f64 = 10.0;

/// The five score components before rounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub budget_efficiency: f64,
    pub artist_quality: f64,
    pub vendor_diversity: f64,
    pub active_marketing: f64,
    pub ticket_volume: f64,
}

impl ScoreBreakdown {
    /// Compute every component from a snapshot.
    ///
    /// A snapshot without a festival object scores 0 on budget efficiency;
    /// the other components only need the entity lists.
    pub fn compute(snapshot: &FestivalSnapshot) -> Self {
        let budget_efficiency = match &snapshot.festival {
            Some(festival) if festival.budget > 0.0 => {
                capped(festival.available_budget() / festival.budget * 100.0, BUDGET_EFFICIENCY_CAP)
            }
            _ => 0.0,
        };

        let artist_quality = if snapshot.artists.is_empty() {
            0.0
        } else {
            let total: f64 = snapshot.artists.iter().map(|a| a.popularity).sum();
            let average = total / snapshot.artists.len() as f64;
            capped(average / 100.0 * ARTIST_QUALITY_CAP, ARTIST_QUALITY_CAP)
        };

        let categories: BTreeSet<&str> = snapshot.vendors.iter().map(|v| v.category_key()).collect();
        let vendor_diversity = capped(
            categories.len() as f64 * POINTS_PER_CATEGORY,
            VENDOR_DIVERSITY_CAP,
        );

        let active = snapshot.campaigns().iter().filter(|c| c.is_active()).count();
        let active_marketing = capped(active as f64 * POINTS_PER_CAMPAIGN, ACTIVE_MARKETING_CAP);

        let ticket_volume = capped(
            snapshot.total_tickets_sold() as f64 / TICKETS_PER_POINT,
            TICKET_VOLUME_CAP,
        );

        Self {
            budget_efficiency,
            artist_quality,
            vendor_diversity,
            active_marketing,
            ticket_volume,
        }
    }

    /// Rounded total, always within 0..=100
    pub fn total(&self) -> u8 {
        let sum = self.budget_efficiency
            + self.artist_quality
            + self.vendor_diversity
            + self.active_marketing
            + self.ticket_volume;
        sum.round().clamp(0.0, 100.0) as u8
    }
}

/// Festival score in 0..=100
pub fn festival_score(snapshot: &FestivalSnapshot) -> u8 {
    ScoreBreakdown::compute(snapshot).total()
}

/// Clamp into `0..=cap`; non-finite input counts as zero
fn capped(value: f64, cap: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, cap)
    } else {
        0.0
    }
}
