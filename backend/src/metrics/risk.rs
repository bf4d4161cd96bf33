//! Additive risk score for the festival sidebar.

use crate::models::Festival;
use serde::{Deserialize, Serialize};
use std::fmt;

const LOW_BUDGET: f64 = 20_000.0;
const LOW_BUDGET_RISK: u8 = 30;
const LOW_REPUTATION: f64 = 30.0;
const LOW_REPUTATION_RISK: u8 = 25;
const SHORT_RUNWAY_DAYS: i64 = 30;
const SHORT_RUNWAY_RISK: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0..=100
    pub score: u8,
    pub tier: RiskTier,
}

/// +30 budget < 20k, +25 reputation < 30, +20 fewer than 30 days left.
/// High above 50, Medium above 25.
pub fn risk_assessment(festival: &Festival) -> RiskAssessment {
    let mut score = 0u8;
    if festival.budget < LOW_BUDGET {
        score += LOW_BUDGET_RISK;
    }
    if festival.reputation < LOW_REPUTATION {
        score += LOW_REPUTATION_RISK;
    }
    if festival.days_until_start() < SHORT_RUNWAY_DAYS {
        score += SHORT_RUNWAY_RISK;
    }

    let tier = if score > 50 {
        RiskTier::High
    } else if score > 25 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    RiskAssessment { score, tier }
}
