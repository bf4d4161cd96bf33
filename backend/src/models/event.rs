//! Game events and the event-response exchange.
//!
//! A game event is a random disruption (or windfall) generated by the server.
//! Each event may offer interactive options; the player picks one and the
//! server answers with the festival's new budget and reputation.
//!
//! # Example
//!
//! ```rust
//! use festival_dashboard_core::models::{GameEvent, Severity};
//!
//! let event: GameEvent = serde_json::from_str(r#"{
//!     "type": "artist_cancellation",
//!     "severity": "negative",
//!     "description": "Headliner cancelled",
//!     "effects": {"reputation": -10},
//!     "interactive_options": [
//!         {"id": "find_replacement", "label": "Find replacement", "cost": 5000, "description": ""}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(event.severity, Severity::Negative);
//! assert_eq!(event.option("find_replacement").unwrap().cost, 5000.0);
//! ```

use crate::serde_utils::{lenient_vec, null_as_default, string_or_number};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity label attached to events and incidents.
///
/// The dashboard view uses positive/negative/neutral, the alert view uses
/// critical/warning/info, and the server's event catalogue emits
/// high/medium/low. All of them are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Negative,
    #[default]
    Neutral,
    Critical,
    Warning,
    Info,
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

/// Presentation tone handed to the UI layer (maps onto alert colours).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    /// Tone of an interactive event card
    pub fn board_tone(self) -> Tone {
        match self {
            Severity::Positive => Tone::Success,
            Severity::Negative | Severity::Critical | Severity::High => Tone::Danger,
            _ => Tone::Warning,
        }
    }

    /// Tone of an incident alert raised by an artist or vendor
    pub fn alert_tone(self) -> Tone {
        match self {
            Severity::Critical | Severity::Negative | Severity::High => Tone::Danger,
            Severity::Warning | Severity::Medium => Tone::Warning,
            _ => Tone::Info,
        }
    }
}

/// One mitigation choice offered for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,

    /// Budget the option consumes
    #[serde(default, deserialize_with = "null_as_default")]
    pub cost: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default)]
    pub effectiveness: Option<f64>,
}

/// A random in-game disruption requiring a budgeted response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Event type key, also the identifier sent back when responding
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub event_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: Severity,

    /// Stat name → delta. Sorted so repeated renders are identical.
    #[serde(default, deserialize_with = "null_as_default")]
    pub effects: BTreeMap<String, f64>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub interactive_options: Vec<EventOption>,

    /// Free-text suggestions emitted by the server's event catalogue
    #[serde(default, deserialize_with = "lenient_vec")]
    pub solutions: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub resolved: bool,

    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: Option<String>,
}

impl GameEvent {
    /// Find an option by id
    pub fn option(&self, option_id: &str) -> Option<&EventOption> {
        self.interactive_options.iter().find(|o| o.id == option_id)
    }

    /// Effects formatted as `stat: +delta`
    pub fn effect_summaries(&self) -> Vec<String> {
        self.effects
            .iter()
            .map(|(stat, delta)| {
                let sign = if *delta > 0.0 { "+" } else { "" };
                format!("{stat}: {sign}{delta}")
            })
            .collect()
    }
}

/// Body of `POST /api/events/respond/{festival_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponseRequest {
    pub event_type: String,
    pub option_id: String,
}

/// Server answer to an event response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventResponseResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub new_budget: Option<f64>,

    #[serde(default)]
    pub new_reputation: Option<f64>,

    #[serde(default)]
    pub cost: Option<f64>,

    #[serde(default)]
    pub effectiveness: Option<f64>,
}
