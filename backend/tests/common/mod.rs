//! Shared fixtures: a scripted in-memory `FestivalApi` and snapshot builders.

#![allow(dead_code)]

use async_trait::async_trait;
use festival_dashboard_core::models::{EventResponseRequest, EventResponseResult};
use festival_dashboard_core::{FestivalApi, FestivalSnapshot, FetchError, TransportError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock server. Snapshot answers and event answers are queued; when a queue
/// is empty the last configured default is returned.
pub struct MockApi {
    snapshot: Mutex<Result<FestivalSnapshot, FetchError>>,
    snapshots: Mutex<VecDeque<Result<FestivalSnapshot, FetchError>>>,
    responses: Mutex<VecDeque<Result<EventResponseResult, TransportError>>>,
    fetch_delay: Duration,
    respond_delay: Duration,
    pub fetch_calls: AtomicUsize,
    pub respond_calls: AtomicUsize,
    pub requests: Mutex<Vec<EventResponseRequest>>,
}

impl MockApi {
    pub fn new(snapshot: FestivalSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Ok(snapshot)),
            snapshots: Mutex::new(VecDeque::new()),
            responses: Mutex::new(VecDeque::new()),
            fetch_delay: Duration::ZERO,
            respond_delay: Duration::ZERO,
            fetch_calls: AtomicUsize::new(0),
            respond_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(value: Value) -> Self {
        Self::new(snapshot(value))
    }

    /// Every fetch sleeps this long (on the tokio clock) before answering
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Every event response sleeps this long before its scripted answer is taken
    pub fn with_respond_delay(mut self, delay: Duration) -> Self {
        self.respond_delay = delay;
        self
    }

    pub fn set_snapshot(&self, result: Result<FestivalSnapshot, FetchError>) {
        *self.snapshot.lock().unwrap() = result;
    }

    /// Answer the next fetch with `result` before falling back to the default
    pub fn push_snapshot(&self, result: Result<FestivalSnapshot, FetchError>) {
        self.snapshots.lock().unwrap().push_back(result);
    }

    pub fn push_response(&self, result: Result<EventResponseResult, TransportError>) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn responds(&self) -> usize {
        self.respond_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FestivalApi for MockApi {
    async fn fetch_snapshot(&self) -> Result<FestivalSnapshot, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        if let Some(scripted) = self.snapshots.lock().unwrap().pop_front() {
            return scripted;
        }
        self.snapshot.lock().unwrap().clone()
    }

    async fn respond_to_event(
        &self,
        request: &EventResponseRequest,
    ) -> Result<EventResponseResult, TransportError> {
        self.respond_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if !self.respond_delay.is_zero() {
            tokio::time::sleep(self.respond_delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response".to_string())))
    }
}

pub fn snapshot(value: Value) -> FestivalSnapshot {
    serde_json::from_value(value).unwrap()
}

/// A festival with one interactive event (`storm`) whose options cost
/// 5,000 and 60,000 against a 50,000 budget.
pub fn festival_with_storm() -> Value {
    festival_with_storm_at("2024-06-01T12:00:00")
}

/// [`festival_with_storm`] with the storm raised at `timestamp`
pub fn festival_with_storm_at(timestamp: &str) -> Value {
    json!({
        "festival": {
            "id": 1,
            "name": "Summer Sounds",
            "budget": 50000,
            "reputation": 60,
            "days_remaining": 45,
            "venue_capacity": 2000,
            "events": [{
                "type": "storm",
                "description": "A thunderstorm is heading for the main stage",
                "severity": "negative",
                "effects": {"attendance": -10, "reputation": -5},
                "interactive_options": [
                    {"id": "provide_shelter", "label": "Provide Shelter", "cost": 5000, "description": "Rent tents"},
                    {"id": "reschedule", "label": "Reschedule", "cost": 60000, "description": "Move the headliner"}
                ],
                "timestamp": timestamp
            }]
        },
        "artists": [
            {"id": 1, "name": "The Echoes", "genre": "rock", "popularity": 90, "status": "confirmed"},
            {"id": 2, "name": "Neon Drift", "genre": "electronic", "popularity": 70, "status": "pending"}
        ],
        "vendors": [
            {"id": 1, "name": "Taco Town", "category": "food", "quality": 88, "status": "confirmed"}
        ],
        "tickets": [
            {"type": "general", "sold_quantity": 120, "price": 50.0}
        ]
    })
}

pub fn accepted(message: &str, new_budget: f64, new_reputation: f64) -> EventResponseResult {
    EventResponseResult {
        success: true,
        message: Some(message.to_string()),
        new_budget: Some(new_budget),
        new_reputation: Some(new_reputation),
        ..Default::default()
    }
}

pub fn rejected(error: Option<&str>) -> EventResponseResult {
    EventResponseResult {
        success: false,
        error: error.map(str::to_string),
        ..Default::default()
    }
}
