//! Marketing effectiveness and recommendation rules.

use crate::models::{Festival, FestivalSnapshot};

/// Upper bound of [`marketing_effectiveness`]
pub const MAX_EFFECTIVENESS: u16 = 200;

/// Base effectiveness when no campaign is active, and the cap on the base
const BASE_EFFECTIVENESS: f64 = 100.0;

pub const REPUTATION_ADVICE: &str = "Focus on reputation-building campaigns";
pub const PREMIUM_ADVICE: &str = "Consider premium marketing campaigns";
pub const URGENT_ADVICE: &str = "Launch urgent promotional campaigns";
pub const WELL_POSITIONED: &str = "Your festival is well-positioned!";

/// A recommendation rule: emitted when `applies` holds
struct Rule {
    applies: fn(&Festival) -> bool,
    advice: &'static str,
}

/// Evaluated in declaration order; emission order follows it
const RULES: &[Rule] = &[
    Rule {
        applies: |f| f.reputation < 40.0,
        advice: REPUTATION_ADVICE,
    },
    Rule {
        applies: |f| f.budget > 50_000.0,
        advice: PREMIUM_ADVICE,
    },
    Rule {
        applies: |f| f.days_until_start() < 60,
        advice: URGENT_ADVICE,
    },
];

/// Marketing effectiveness in percent, within 0..=200.
///
/// Base is the summed effectiveness of active campaigns (as percent, capped at
/// 100), or 100 when none is active. Every synergy adds its marketing bonus.
pub fn marketing_effectiveness(snapshot: &FestivalSnapshot) -> u16 {
    let mut active = snapshot.campaigns().iter().filter(|c| c.is_active()).peekable();

    let base = if active.peek().is_none() {
        BASE_EFFECTIVENESS
    } else {
        let total: f64 = active.map(|c| c.effectiveness).sum();
        (total * 100.0).round().min(BASE_EFFECTIVENESS)
    };

    let synergy_bonus: f64 = snapshot
        .synergies
        .iter()
        .map(|s| s.marketing_bonus * 100.0)
        .sum();

    let total = base + synergy_bonus;
    if total.is_finite() {
        total.round().clamp(0.0, f64::from(MAX_EFFECTIVENESS)) as u16
    } else if total > 0.0 {
        MAX_EFFECTIVENESS
    } else {
        0
    }
}

/// Recommendations in rule order, or the single well-positioned message
pub fn marketing_recommendations(festival: &Festival) -> Vec<&'static str> {
    let advice: Vec<&'static str> = RULES
        .iter()
        .filter(|rule| (rule.applies)(festival))
        .map(|rule| rule.advice)
        .collect();

    if advice.is_empty() {
        vec![WELL_POSITIONED]
    } else {
        advice
    }
}
