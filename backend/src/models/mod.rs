//! Wire-format domain models for the festival dashboard

pub mod bonus;
pub mod event;
pub mod festival;
pub mod roster;

// Re-exports
pub use bonus::{RelationshipKind, Synergy, VendorRelationship};
pub use event::{EventOption, EventResponseRequest, EventResponseResult, GameEvent, Severity, Tone};
pub use festival::{
    CampaignStatus, Festival, FestivalSnapshot, MarketingCampaign, SnapshotError, Ticket,
    DEFAULT_DAYS_REMAINING,
};
pub use roster::{Artist, EngagementStatus, Engaged, Incident, Vendor, DEFAULT_PLACEMENT};
