//! Revenue, budget usage and operational counters.

use crate::models::{Festival, FestivalSnapshot, Ticket};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    /// Sum of sold quantity * price
    pub total_revenue: f64,
    pub tickets_sold: u64,
    /// Share of the budget already spent, one decimal
    pub budget_used_pct: f64,
    /// Revenue per sold ticket, two decimals; 0 when nothing sold
    pub avg_ticket_price: f64,
    /// (revenue - budget) / budget, one decimal
    pub roi_pct: f64,
}

/// Derive the financial figures shown in the analytics panel
pub fn financials(festival: &Festival, tickets: &[Ticket]) -> Financials {
    let total_revenue: f64 = tickets.iter().map(Ticket::revenue).sum();
    let tickets_sold: u64 = tickets.iter().map(|t| t.sold_quantity).sum();

    let (budget_used_pct, roi_pct) = if festival.budget > 0.0 {
        (
            round_to(
                (festival.budget - festival.available_budget()) / festival.budget * 100.0,
                1,
            ),
            round_to((total_revenue - festival.budget) / festival.budget * 100.0, 1),
        )
    } else {
        (0.0, 0.0)
    };

    let avg_ticket_price = if tickets_sold > 0 {
        round_to(total_revenue / tickets_sold as f64, 2)
    } else {
        0.0
    };

    Financials {
        total_revenue,
        tickets_sold,
        budget_used_pct,
        avg_ticket_price,
        roi_pct,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalCounts {
    pub artists: usize,
    pub vendors: usize,
    pub active_campaigns: usize,
    /// Game events not yet resolved server-side
    pub pending_events: usize,
}

pub fn operational_counts(snapshot: &FestivalSnapshot) -> OperationalCounts {
    OperationalCounts {
        artists: snapshot.artists.len(),
        vendors: snapshot.vendors.len(),
        active_campaigns: snapshot.campaigns().iter().filter(|c| c.is_active()).count(),
        pending_events: snapshot.events().iter().filter(|e| !e.resolved).count(),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
