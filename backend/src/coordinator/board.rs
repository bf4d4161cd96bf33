//! Event board: the per-event response phase table.
//!
//! ```text
//! Unresolved ──begin──▶ Submitting ──success──▶ Resolved ──linger──▶ Dismissed
//!      ▲                    │                                          │
//!      └──────failure───────┘                                          │
//!      └──────────── new occurrence in a fresh snapshot ───────────────┘
//! ```
//!
//! Events are keyed by their type, which is also what the server expects
//! when a response is submitted. The server draws a fresh set of events on
//! every fetch, so each entry also remembers which occurrence it belongs to
//! (the event's timestamp). A fresh snapshot that still lists an unresolved
//! event of a handled type is a new occurrence once the old one is dismissed
//! or its timestamp differs.

use crate::coordinator::EventResponseError;
use crate::models::{FestivalSnapshot, GameEvent};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

static UNRESOLVED: EventPhase = EventPhase::Unresolved;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPhase {
    Unresolved,
    /// A response is in flight; options are disabled
    Submitting { option_id: String },
    /// Shown as resolved until the linger delay elapses
    Resolved { message: String, at: Instant },
    /// Removed from view
    Dismissed,
}

impl EventPhase {
    pub fn is_visible(&self) -> bool {
        !matches!(self, EventPhase::Dismissed)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    phase: EventPhase,
    /// Timestamp of the occurrence this phase belongs to
    occurrence: Option<String>,
}

impl Entry {
    /// Whether `event` in a fresh snapshot is a different occurrence than this entry's
    fn superseded_by(&self, event: &GameEvent) -> bool {
        match self.phase {
            EventPhase::Submitting { .. } => false,
            _ if event.resolved => false,
            EventPhase::Dismissed => true,
            _ => event.timestamp != self.occurrence,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBoard {
    entries: HashMap<String, Entry>,
}

impl EventBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of an event; untracked events are `Unresolved`
    pub fn phase(&self, event_type: &str) -> &EventPhase {
        self.entries
            .get(event_type)
            .map(|entry| &entry.phase)
            .unwrap_or(&UNRESOLVED)
    }

    /// Move `event` to `Submitting`. Only an `Unresolved` event may be submitted.
    pub fn begin_submit(
        &mut self,
        event: &GameEvent,
        option_id: &str,
    ) -> Result<(), EventResponseError> {
        let event_type = event.event_type.as_str();
        match self.phase(event_type) {
            EventPhase::Unresolved => {
                self.entries.insert(
                    event_type.to_string(),
                    Entry {
                        phase: EventPhase::Submitting {
                            option_id: option_id.to_string(),
                        },
                        occurrence: event.timestamp.clone(),
                    },
                );
                Ok(())
            }
            EventPhase::Submitting { .. } => {
                Err(EventResponseError::AlreadySubmitting(event_type.to_string()))
            }
            EventPhase::Resolved { .. } | EventPhase::Dismissed => {
                Err(EventResponseError::AlreadyResolved(event_type.to_string()))
            }
        }
    }

    /// Back to `Unresolved` after a failed or abandoned submission.
    /// Returns false when the event was not `Submitting`.
    pub fn reenable(&mut self, event_type: &str) -> bool {
        match self.entries.get(event_type) {
            Some(Entry {
                phase: EventPhase::Submitting { .. },
                ..
            }) => {
                self.entries.remove(event_type);
                true
            }
            _ => false,
        }
    }

    pub fn resolve(&mut self, event_type: &str, message: impl Into<String>, at: Instant) {
        let phase = EventPhase::Resolved {
            message: message.into(),
            at,
        };
        match self.entries.get_mut(event_type) {
            Some(entry) => entry.phase = phase,
            None => {
                self.entries.insert(
                    event_type.to_string(),
                    Entry {
                        phase,
                        occurrence: None,
                    },
                );
            }
        }
    }

    /// Dismiss events resolved at least `linger` ago. Returns how many were dismissed.
    pub fn prune(&mut self, now: Instant, linger: Duration) -> usize {
        let mut dismissed = 0;
        for entry in self.entries.values_mut() {
            if let EventPhase::Resolved { at, .. } = entry.phase {
                if now.saturating_duration_since(at) >= linger {
                    entry.phase = EventPhase::Dismissed;
                    dismissed += 1;
                }
            }
        }
        dismissed
    }

    /// Earliest instant at which [`Self::prune`] will dismiss something
    pub fn next_dismissal(&self, linger: Duration) -> Option<Instant> {
        self.entries
            .values()
            .filter_map(|entry| match entry.phase {
                EventPhase::Resolved { at, .. } => Some(at + linger),
                _ => None,
            })
            .min()
    }

    /// Reconcile with a freshly fetched snapshot.
    ///
    /// Forgets events the snapshot no longer carries and events it carries
    /// as a new unresolved occurrence. In-flight submissions are kept so
    /// their outcome can still land.
    pub fn retain_present(&mut self, snapshot: &FestivalSnapshot) {
        self.entries.retain(|event_type, entry| {
            if matches!(entry.phase, EventPhase::Submitting { .. }) {
                return true;
            }
            match snapshot.find_event(event_type) {
                Some(event) => !entry.superseded_by(event),
                None => false,
            }
        });
    }

    pub fn is_visible(&self, event_type: &str) -> bool {
        self.phase(event_type).is_visible()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storm(timestamp: &str) -> GameEvent {
        serde_json::from_value(json!({"type": "storm", "timestamp": timestamp})).unwrap()
    }

    fn snapshot_with(event: serde_json::Value) -> FestivalSnapshot {
        serde_json::from_value(json!({"festival": {"budget": 100, "events": [event]}})).unwrap()
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut board = EventBoard::new();
        board.begin_submit(&storm("t1"), "provide_shelter").unwrap();
        assert_eq!(
            board.begin_submit(&storm("t1"), "monitor_weather"),
            Err(EventResponseError::AlreadySubmitting("storm".to_string()))
        );
    }

    #[test]
    fn test_reenable_allows_retry() {
        let mut board = EventBoard::new();
        board.begin_submit(&storm("t1"), "provide_shelter").unwrap();
        assert!(board.reenable("storm"));
        assert_eq!(board.phase("storm"), &EventPhase::Unresolved);
        assert!(board.begin_submit(&storm("t1"), "provide_shelter").is_ok());
    }

    #[test]
    fn test_reenable_leaves_resolved_alone() {
        let mut board = EventBoard::new();
        board.begin_submit(&storm("t1"), "provide_shelter").unwrap();
        board.resolve("storm", "done", Instant::now());

        assert!(!board.reenable("storm"));
        assert!(matches!(board.phase("storm"), EventPhase::Resolved { .. }));
    }

    #[test]
    fn test_prune_after_linger() {
        let mut board = EventBoard::new();
        let start = Instant::now();
        board.resolve("storm", "Shelters ready", start);

        let linger = Duration::from_millis(3000);
        assert_eq!(board.next_dismissal(linger), Some(start + linger));
        assert_eq!(board.prune(start + Duration::from_millis(2999), linger), 0);
        assert!(board.is_visible("storm"));

        assert_eq!(board.prune(start + linger, linger), 1);
        assert!(!board.is_visible("storm"));
        assert_eq!(board.next_dismissal(linger), None);
        assert_eq!(
            board.begin_submit(&storm("t1"), "x"),
            Err(EventResponseError::AlreadyResolved("storm".to_string()))
        );
    }

    #[test]
    fn test_new_occurrence_resets_resolved_entry() {
        let mut board = EventBoard::new();
        board.begin_submit(&storm("t1"), "provide_shelter").unwrap();
        board.resolve("storm", "done", Instant::now());

        board.retain_present(&snapshot_with(json!({"type": "storm", "timestamp": "t1"})));
        assert!(matches!(board.phase("storm"), EventPhase::Resolved { .. }));

        board.retain_present(&snapshot_with(json!({"type": "storm", "timestamp": "t2"})));
        assert_eq!(board.phase("storm"), &EventPhase::Unresolved);
        assert!(board.begin_submit(&storm("t2"), "provide_shelter").is_ok());
    }

    #[test]
    fn test_dismissed_entry_cleared_by_unresolved_event() {
        let mut board = EventBoard::new();
        let at = Instant::now();
        board.begin_submit(&storm("t1"), "provide_shelter").unwrap();
        board.resolve("storm", "done", at);
        board.prune(at, Duration::ZERO);

        board.retain_present(&snapshot_with(json!({"type": "storm", "timestamp": "t1", "resolved": true})));
        assert_eq!(board.phase("storm"), &EventPhase::Dismissed);

        board.retain_present(&snapshot_with(json!({"type": "storm", "timestamp": "t1"})));
        assert!(board.is_empty());
    }

    #[test]
    fn test_submitting_survives_fresh_snapshot() {
        let mut board = EventBoard::new();
        board.begin_submit(&storm("t1"), "provide_shelter").unwrap();

        board.retain_present(&snapshot_with(json!({"type": "storm", "timestamp": "t2"})));
        board.retain_present(&FestivalSnapshot::default());
        assert!(matches!(board.phase("storm"), EventPhase::Submitting { .. }));
    }
}
