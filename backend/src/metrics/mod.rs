//! Metrics Engine
//!
//! Pure, deterministic functions deriving dashboard statistics from a
//! snapshot. No I/O and no failure modes: absent collections count as empty
//! and absent numbers as zero.
//!
//! # Bounds
//!
//! - festival score: 0..=100
//! - marketing effectiveness: 0..=200
//! - risk score: 0..=100

pub mod charts;
pub mod financials;
pub mod marketing;
pub mod risk;
pub mod roster;
pub mod score;

pub use charts::{artist_popularity, budget_usage, revenue_projection, vendor_quality, ChartSeries};
pub use financials::{financials, operational_counts, Financials, OperationalCounts};
pub use marketing::{marketing_effectiveness, marketing_recommendations, MAX_EFFECTIVENESS};
pub use risk::{risk_assessment, RiskAssessment, RiskTier};
pub use roster::{approaching_artists, approaching_vendors, satisfaction_tier, SatisfactionTier};
pub use score::{festival_score, ScoreBreakdown};
