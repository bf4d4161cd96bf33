//! Numeric series fed to the external chart widgets.

use crate::models::{Artist, Festival, Vendor};
use serde::{Deserialize, Serialize};

/// Ticket price assumed by the revenue projection
pub const PROJECTED_TICKET_PRICE: f64 = 50.0;

/// Each hired artist lifts projected revenue by 10%
const ARTIST_REVENUE_BONUS: f64 = 0.1;

/// Cumulative share of projected revenue reached by each week
const PROJECTION_CURVE: [(&str, f64); 4] = [
    ("Week 1", 0.2),
    ("Week 2", 0.4),
    ("Week 3", 0.7),
    ("Week 4", 1.0),
];

/// Labelled series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// capacity * $50 * reputation% * (1 + 0.1 per artist), spread over four weeks
pub fn revenue_projection(festival: &Festival, artist_count: usize) -> ChartSeries {
    let base = festival.venue_capacity * PROJECTED_TICKET_PRICE;
    let reputation = festival.reputation / 100.0;
    let artist_bonus = artist_count as f64 * ARTIST_REVENUE_BONUS;
    let projected = base * reputation * (1.0 + artist_bonus);

    ChartSeries {
        labels: PROJECTION_CURVE.iter().map(|(l, _)| l.to_string()).collect(),
        values: PROJECTION_CURVE.iter().map(|(_, share)| projected * share).collect(),
    }
}

/// `[used, available]` against the starting budget
pub fn budget_usage(festival: &Festival, initial_budget: f64) -> ChartSeries {
    let used = (initial_budget - festival.budget).max(0.0);
    ChartSeries {
        labels: vec!["Used".to_string(), "Available".to_string()],
        values: vec![used, festival.budget],
    }
}

pub fn artist_popularity(artists: &[Artist]) -> ChartSeries {
    ChartSeries {
        labels: artists.iter().map(|a| a.name.clone()).collect(),
        values: artists.iter().map(|a| a.popularity).collect(),
    }
}

pub fn vendor_quality(vendors: &[Vendor]) -> ChartSeries {
    ChartSeries {
        labels: vendors.iter().map(|v| v.name.clone()).collect(),
        values: vendors.iter().map(|v| v.quality).collect(),
    }
}
