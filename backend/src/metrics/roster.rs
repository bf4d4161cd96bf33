//! Roster metrics: satisfaction tiers and "approaching" highlights.

use crate::models::{Artist, EngagementStatus, Engaged, Vendor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Artists above this popularity are highlighted
pub const APPROACHING_ARTIST_POPULARITY: f64 = 80.0;

/// Vendors above this quality are highlighted
pub const APPROACHING_VENDOR_QUALITY: f64 = 85.0;

/// Satisfaction tier derived from the share of confirmed entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionTier {
    /// Nobody hired yet
    NotApplicable,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for SatisfactionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SatisfactionTier::NotApplicable => "N/A",
            SatisfactionTier::Poor => "Poor",
            SatisfactionTier::Fair => "Fair",
            SatisfactionTier::Good => "Good",
            SatisfactionTier::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}

/// Tier by confirmed ratio: >=90% Excellent, >=75% Good, >=50% Fair, else Poor.
///
/// Compared in integer arithmetic so boundary ratios land exactly.
pub fn satisfaction_tier<T: Engaged>(entities: &[T]) -> SatisfactionTier {
    let total = entities.len();
    if total == 0 {
        return SatisfactionTier::NotApplicable;
    }
    let confirmed = entities
        .iter()
        .filter(|e| e.engagement() == EngagementStatus::Confirmed)
        .count();

    let at_least = |percent: usize| confirmed * 100 >= total * percent;
    if at_least(90) {
        SatisfactionTier::Excellent
    } else if at_least(75) {
        SatisfactionTier::Good
    } else if at_least(50) {
        SatisfactionTier::Fair
    } else {
        SatisfactionTier::Poor
    }
}

/// Artists popular enough to feature (popularity > 80)
pub fn approaching_artists(artists: &[Artist]) -> Vec<&Artist> {
    artists
        .iter()
        .filter(|a| a.popularity > APPROACHING_ARTIST_POPULARITY)
        .collect()
}

/// Vendors good enough to feature (quality > 85)
pub fn approaching_vendors(vendors: &[Vendor]) -> Vec<&Vendor> {
    vendors
        .iter()
        .filter(|v| v.quality > APPROACHING_VENDOR_QUALITY)
        .collect()
}
