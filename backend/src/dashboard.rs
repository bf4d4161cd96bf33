//! Dashboard
//!
//! The single entry point the UI layer talks to. Wires the [`DataCache`],
//! the [`RenderPipeline`] and the [`EventResponseCoordinator`] around one
//! [`SlotWriter`].
//!
//! # Flow
//!
//! ```text
//! refresh(force) ──▶ DataCache::refresh ──▶ prune board ──▶ render ──▶ charts (fresh only)
//! respond_to_event ──▶ begin ──▶ render board ──▶ submit ──▶ render (patched snapshot)
//! ```
//!
//! Every failure is logged and also written to [`Slot::Notification`] as a
//! danger notice before being returned.
//!
//! # Dismissing resolved events
//!
//! A resolved event stays on the board for the configured linger delay.
//! Nothing is spawned to take it down: the host either awaits
//! [`Dashboard::dismiss_when_due`] (typically in its event loop next to the
//! refresh ticker) or calls [`Dashboard::dismiss_expired_events`] on its own
//! schedule. `refresh` also dismisses whatever has expired.

use crate::api::{FestivalApi, FetchError, HttpFestivalApi};
use crate::cache::{DataCache, Refreshed};
use crate::config::{ConfigError, DashboardConfig};
use crate::coordinator::{EventBoard, EventResolution, EventResponseCoordinator, EventResponseError};
use crate::models::{FestivalSnapshot, SnapshotError, Tone};
use crate::render::{Notice, RenderPipeline, Slot, SlotValue, SlotWriter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error loading festival data: {0}")]
    Fetch(#[from] FetchError),

    #[error("Error rendering festival data: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    EventResponse(#[from] EventResponseError),
}

pub struct Dashboard<A: FestivalApi, W: SlotWriter> {
    config: DashboardConfig,
    cache: Arc<DataCache<A>>,
    coordinator: EventResponseCoordinator<A>,
    pipeline: RenderPipeline,
    writer: Mutex<W>,
}

impl<W: SlotWriter> Dashboard<HttpFestivalApi, W> {
    /// Dashboard backed by the game server at `config.base_url`
    pub fn connect(config: DashboardConfig, writer: W) -> Result<Self, DashboardError> {
        config.validate()?;
        let api = HttpFestivalApi::new(&config)?;
        Self::new(config, api, writer)
    }
}

impl<A: FestivalApi, W: SlotWriter> Dashboard<A, W> {
    pub fn new(config: DashboardConfig, api: A, writer: W) -> Result<Self, DashboardError> {
        config.validate()?;

        let cache = Arc::new(DataCache::new(Arc::new(api), config.cache_window()));
        let coordinator =
            EventResponseCoordinator::new(Arc::clone(&cache), config.resolved_event_linger());

        info!(
            festival_id = config.festival_id,
            cache_window_ms = config.cache_window_ms,
            "Dashboard initialised"
        );

        Ok(Self {
            pipeline: RenderPipeline::new(config.initial_budget),
            config,
            cache,
            coordinator,
            writer: Mutex::new(writer),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn lock_writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the slot writer
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.lock_writer())
    }

    /// Latest cached snapshot, if any
    pub fn current_snapshot(&self) -> Option<Arc<FestivalSnapshot>> {
        self.cache.current()
    }

    /// Receive every snapshot the cache publishes (fetches and patches)
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<FestivalSnapshot>>> {
        self.cache.subscribe()
    }

    pub fn event_board(&self) -> EventBoard {
        self.coordinator.board()
    }

    /// Refresh (or reuse) the snapshot and render it.
    ///
    /// Charts are only re-rendered when the snapshot came from the network.
    pub async fn refresh(&self, force: bool) -> Result<Refreshed, DashboardError> {
        let refreshed = match self.cache.refresh(force).await {
            Ok(refreshed) => refreshed,
            Err(err) => return Err(self.fail(err.into())),
        };

        if refreshed.is_fresh() {
            self.coordinator.sync_with_cache();
        }
        self.coordinator.prune(Instant::now());

        let board = self.coordinator.board();
        let mut writer = self.lock_writer();
        let rendered = self
            .pipeline
            .render(&refreshed.snapshot, &board, &mut *writer)
            .and_then(|()| {
                if refreshed.is_fresh() {
                    self.pipeline.render_charts(&refreshed.snapshot, &mut *writer)
                } else {
                    Ok(())
                }
            });
        drop(writer);

        match rendered {
            Ok(()) => Ok(refreshed),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Submit the player's choice for an event and reconcile the dashboard.
    ///
    /// The event's options are rendered disabled while the request is in
    /// flight. On success the patched snapshot is re-rendered; on failure
    /// the options come back. If this future is dropped mid-flight the event
    /// is re-enabled and shows as open from the next render on.
    pub async fn respond_to_event(
        &self,
        event_type: &str,
        option_id: &str,
    ) -> Result<EventResolution, DashboardError> {
        let pending = match self.coordinator.begin(event_type, option_id) {
            Ok(pending) => pending,
            Err(err) => return Err(self.fail_event(err)),
        };
        self.render_board();

        match self.coordinator.submit(pending).await {
            Ok(resolution) => {
                self.notify(Notice::new(Tone::Success, resolution.message.clone()));
                if let Some(snapshot) = self.cache.current() {
                    let board = self.coordinator.board();
                    let mut writer = self.lock_writer();
                    if let Err(err) = self.pipeline.render(&snapshot, &board, &mut *writer) {
                        warn!(error = %err, "Patched snapshot could not be rendered");
                    }
                }
                Ok(resolution)
            }
            Err(err) => {
                self.render_board();
                Err(self.fail_event(err))
            }
        }
    }

    /// Dismiss resolved events whose linger delay has passed and redraw the
    /// board when anything changed. Returns how many were dismissed.
    pub fn dismiss_expired_events(&self) -> usize {
        let dismissed = self.coordinator.prune(Instant::now());
        if dismissed > 0 {
            self.render_board();
        }
        dismissed
    }

    /// Sleep until the earliest resolved event's linger delay has passed,
    /// then dismiss it (and anything else due) and redraw the board.
    ///
    /// Returns 0 at once when no resolved event is waiting.
    pub async fn dismiss_when_due(&self) -> usize {
        let Some(deadline) = self.coordinator.next_dismissal() else {
            return 0;
        };
        tokio::time::sleep_until(deadline).await;
        self.dismiss_expired_events()
    }

    fn render_board(&self) {
        if let Some(snapshot) = self.cache.current() {
            let board = self.coordinator.board();
            self.pipeline
                .render_event_board(&snapshot, &board, &mut *self.lock_writer());
        }
    }

    fn notify(&self, notice: Notice) {
        self.lock_writer().write(Slot::Notification, SlotValue::Notice(notice));
    }

    fn fail(&self, err: DashboardError) -> DashboardError {
        error!(error = %err, "Dashboard update failed");
        self.notify(Notice::new(Tone::Danger, err.to_string()));
        err
    }

    fn fail_event(&self, err: EventResponseError) -> DashboardError {
        warn!(error = %err, "Event response failed");
        self.notify(Notice::new(err.tone(), err.to_string()));
        err.into()
    }
}
