//! Festival Dashboard Core
//!
//! Client-side engine behind the festival-management game dashboard: polls the
//! game server for a festival snapshot, derives statistics from it, and writes
//! structured values into the dashboard's output slots.
//!
//! # Architecture
//!
//! - **models**: Wire types for the festival snapshot and event responses
//! - **metrics**: Pure derived statistics (score, tiers, risk, financials, charts)
//! - **cache**: Time-boxed, single-flight snapshot cache with a watch channel
//! - **render**: Ordered application of a snapshot onto output slots
//! - **coordinator**: Per-event state machine for mitigation responses
//! - **api**: Network seam (`FestivalApi`) and its HTTP implementation
//! - **dashboard**: Facade wiring the above around one slot writer
//!
//! # Critical Invariants
//!
//! 1. Snapshots are replaced wholesale; only budget and reputation are patched
//! 2. Metric functions are total: clamped outputs, no panics on odd input
//! 3. At most one snapshot fetch is in flight at any time

// Module declarations
pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod render;
pub mod serde_utils;

// Re-exports for convenience
pub use api::{FestivalApi, FetchError, HttpFestivalApi, TransportError};
pub use cache::{DataCache, RefreshOrigin, Refreshed};
pub use config::{ConfigError, DashboardConfig};
pub use coordinator::{
    EventBoard, EventPhase, EventResolution, EventResponseCoordinator, EventResponseError,
    PendingResponse,
};
pub use dashboard::{Dashboard, DashboardError};
pub use logging::init_logging;
pub use metrics::{festival_score, ScoreBreakdown};
pub use models::{FestivalSnapshot, SnapshotError};
pub use render::{RenderPipeline, Slot, SlotFrame, SlotValue, SlotWriter};
