//! Artists and vendors hired for a festival.
//!
//! Both kinds of entity can also carry incident fields (title, severity,
//! resolved flag...) and then double as event-like alerts on the dashboard.

use crate::models::event::Severity;
use crate::serde_utils::{lenient_vec, null_as_default, string_or_number};
use serde::{Deserialize, Serialize};

/// Placement shown for vendors the server has not placed yet
pub const DEFAULT_PLACEMENT: &str = "Food Court";

/// Engagement status of an artist or vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    Confirmed,
    Pending,
    #[default]
    #[serde(other)]
    Other,
}

impl EngagementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EngagementStatus::Confirmed => "confirmed",
            EngagementStatus::Pending => "pending",
            EngagementStatus::Other => "other",
        }
    }
}

/// Anything with an engagement status (used for satisfaction tiers)
pub trait Engaged {
    fn engagement(&self) -> EngagementStatus;
}

/// Optional event-like fields carried by artists and vendors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolved: bool,

    #[serde(default)]
    pub severity: Option<Severity>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: Option<String>,
}

impl Incident {
    /// An entity is an open incident when it carries a title and is not resolved
    pub fn is_open(&self) -> bool {
        !self.resolved && self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// A performer hired (or being negotiated) for the festival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: String,

    /// 0-100
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: EngagementStatus,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fee: f64,

    #[serde(flatten)]
    pub incident: Incident,
}

impl Engaged for Artist {
    fn engagement(&self) -> EngagementStatus {
        self.status
    }
}

/// A food, merchandise or service vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(rename = "type", default)]
    pub vendor_type: Option<String>,

    #[serde(default)]
    pub specialty: Option<String>,

    /// 0-100
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: EngagementStatus,

    #[serde(default)]
    pub placement_location: Option<String>,

    #[serde(
        default,
        alias = "specialties",
        deserialize_with = "lenient_vec"
    )]
    pub vendor_specialties: Vec<String>,

    #[serde(flatten)]
    pub incident: Incident,
}

impl Vendor {
    /// Key used to count distinct vendor categories: category, then type, then "unknown"
    pub fn category_key(&self) -> &str {
        non_empty(&self.category)
            .or_else(|| non_empty(&self.vendor_type))
            .unwrap_or("unknown")
    }

    /// Specialty shown in lists, falling back to the category
    pub fn display_specialty(&self) -> &str {
        non_empty(&self.specialty)
            .or_else(|| non_empty(&self.category))
            .unwrap_or("")
    }

    pub fn placement(&self) -> &str {
        non_empty(&self.placement_location).unwrap_or(DEFAULT_PLACEMENT)
    }

    /// Specialty badges: first underscore becomes a space, upper-cased
    pub fn specialty_badges(&self) -> Vec<String> {
        self.vendor_specialties
            .iter()
            .map(|s| s.replacen('_', " ", 1).to_uppercase())
            .collect()
    }
}

impl Engaged for Vendor {
    fn engagement(&self) -> EngagementStatus {
        self.status
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
