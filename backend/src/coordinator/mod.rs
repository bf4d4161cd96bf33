//! Event Response Coordinator
//!
//! Handles the player's chosen mitigation for an in-progress game event:
//! checks affordability locally, disables the event's options while the
//! choice is submitted, then reconciles the cached snapshot with the
//! server's authoritative budget and reputation.
//!
//! Submission is split in two so the caller can re-render the disabled
//! options between the steps:
//!
//! 1. [`EventResponseCoordinator::begin`]: validate and move to `Submitting`
//! 2. [`EventResponseCoordinator::submit`]: send, then resolve or re-enable
//!
//! [`EventResponseCoordinator::respond`] runs both.
//!
//! A [`PendingResponse`] holds the event disabled. Dropping it before an
//! answer arrives (a cancelled or timed-out `submit`) re-enables the event.

pub mod board;

pub use board::{EventBoard, EventPhase};

use crate::api::FestivalApi;
use crate::cache::DataCache;
use crate::models::{EventResponseRequest, Tone};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

/// Message surfaced when the server rejects a response without explaining why
pub const GENERIC_FAILURE: &str = "Failed to respond to event";

/// Message used when the server confirms without one
pub const GENERIC_SUCCESS: &str = "Action completed successfully.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EventResponseError {
    #[error("No festival data loaded")]
    NoSnapshot,

    #[error("Unknown event type: {0}")]
    UnknownEvent(String),

    #[error("Unknown option {option_id} for event {event_type}")]
    UnknownOption {
        event_type: String,
        option_id: String,
    },

    #[error("Insufficient budget for this action!")]
    InsufficientBudget { cost: f64, budget: f64 },

    #[error("A response to {0} is already being submitted")]
    AlreadySubmitting(String),

    #[error("Event {0} is already resolved")]
    AlreadyResolved(String),

    /// Server answered `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("Error responding to event: {0}")]
    Transport(String),
}

impl EventResponseError {
    /// Tone of the notice shown for this error
    pub fn tone(&self) -> Tone {
        match self {
            EventResponseError::AlreadySubmitting(_) | EventResponseError::AlreadyResolved(_) => {
                Tone::Info
            }
            _ => Tone::Danger,
        }
    }
}

fn lock(board: &Mutex<EventBoard>) -> MutexGuard<'_, EventBoard> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A validated response waiting to be sent
#[derive(Debug)]
#[must_use = "a pending response keeps its event disabled until submitted"]
pub struct PendingResponse {
    request: EventResponseRequest,
    cost: f64,
    board: Arc<Mutex<EventBoard>>,
    settled: bool,
}

impl PendingResponse {
    pub fn request(&self) -> &EventResponseRequest {
        &self.request
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    fn reenable(mut self) {
        self.settled = true;
        lock(&self.board).reenable(&self.request.event_type);
    }

    fn resolve(mut self, message: &str, at: Instant) {
        self.settled = true;
        lock(&self.board).resolve(&self.request.event_type, message, at);
    }
}

impl Drop for PendingResponse {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if lock(&self.board).reenable(&self.request.event_type) {
            warn!(
                event_type = %self.request.event_type,
                "Event response abandoned before an answer arrived"
            );
        }
    }
}

/// Outcome of a successful response
#[derive(Debug, Clone, PartialEq)]
pub struct EventResolution {
    pub event_type: String,
    pub option_id: String,
    pub message: String,
    pub new_budget: Option<f64>,
    pub new_reputation: Option<f64>,
}

pub struct EventResponseCoordinator<A: FestivalApi> {
    cache: Arc<DataCache<A>>,
    board: Arc<Mutex<EventBoard>>,
    linger: Duration,
}

impl<A: FestivalApi> EventResponseCoordinator<A> {
    pub fn new(cache: Arc<DataCache<A>>, linger: Duration) -> Self {
        Self {
            cache,
            board: Arc::new(Mutex::new(EventBoard::new())),
            linger,
        }
    }

    fn lock_board(&self) -> MutexGuard<'_, EventBoard> {
        lock(&self.board)
    }

    /// Copy of the current board
    pub fn board(&self) -> EventBoard {
        self.lock_board().clone()
    }

    pub fn phase(&self, event_type: &str) -> EventPhase {
        self.lock_board().phase(event_type).clone()
    }

    /// Dismiss resolved events whose linger delay has elapsed
    pub fn prune(&self, now: Instant) -> usize {
        self.lock_board().prune(now, self.linger)
    }

    /// When the next resolved event is due to be dismissed
    pub fn next_dismissal(&self) -> Option<Instant> {
        self.lock_board().next_dismissal(self.linger)
    }

    /// Reconcile the board with a freshly fetched snapshot: forget events
    /// it no longer carries and reset events it carries as a new occurrence
    pub fn sync_with_cache(&self) {
        if let Some(snapshot) = self.cache.current() {
            self.lock_board().retain_present(&snapshot);
        }
    }

    /// Validate a choice against the cached snapshot and disable the event's options.
    ///
    /// Fails without any network call when the option costs more than the
    /// festival's budget.
    pub fn begin(
        &self,
        event_type: &str,
        option_id: &str,
    ) -> Result<PendingResponse, EventResponseError> {
        let snapshot = self.cache.current().ok_or(EventResponseError::NoSnapshot)?;
        let event = snapshot
            .find_event(event_type)
            .ok_or_else(|| EventResponseError::UnknownEvent(event_type.to_string()))?;
        let option = event
            .option(option_id)
            .ok_or_else(|| EventResponseError::UnknownOption {
                event_type: event_type.to_string(),
                option_id: option_id.to_string(),
            })?;
        let budget = snapshot
            .festival()
            .map_err(|_| EventResponseError::NoSnapshot)?
            .budget;

        if option.cost > budget {
            warn!(event_type, option_id, cost = option.cost, budget, "Insufficient budget for event response");
            return Err(EventResponseError::InsufficientBudget {
                cost: option.cost,
                budget,
            });
        }

        self.lock_board().begin_submit(event, option_id)?;

        Ok(PendingResponse {
            request: EventResponseRequest {
                event_type: event_type.to_string(),
                option_id: option_id.to_string(),
            },
            cost: option.cost,
            board: Arc::clone(&self.board),
            settled: false,
        })
    }

    /// Send a validated response and reconcile local state with the answer.
    ///
    /// Cancelling the returned future before it completes re-enables the event.
    pub async fn submit(
        &self,
        pending: PendingResponse,
    ) -> Result<EventResolution, EventResponseError> {
        let request = pending.request.clone();
        let event_type = request.event_type.as_str();

        let result = match self.cache.api().respond_to_event(&request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(event_type, error = %err, "Error responding to event");
                pending.reenable();
                return Err(EventResponseError::Transport(err.to_string()));
            }
        };

        if !result.success {
            let message = result.error.unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(event_type, error = %message, "Event response rejected");
            pending.reenable();
            return Err(EventResponseError::Rejected(message));
        }

        self.cache
            .patch_vitals(result.new_budget, result.new_reputation);

        let message = result
            .message
            .unwrap_or_else(|| GENERIC_SUCCESS.to_string());
        pending.resolve(&message, Instant::now());
        info!(event_type, option_id = %request.option_id, "Event resolved");

        Ok(EventResolution {
            event_type: request.event_type.clone(),
            option_id: request.option_id.clone(),
            message,
            new_budget: result.new_budget,
            new_reputation: result.new_reputation,
        })
    }

    /// [`Self::begin`] then [`Self::submit`]
    pub async fn respond(
        &self,
        event_type: &str,
        option_id: &str,
    ) -> Result<EventResolution, EventResponseError> {
        let pending = self.begin(event_type, option_id)?;
        self.submit(pending).await
    }
}
