//! Genre synergies and vendor relationships computed by the server.

use crate::serde_utils::null_as_default;
use serde::{Deserialize, Serialize};

/// Bonus unlocked by artist-genre composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synergy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub artist_count: u32,

    /// Fractional multiplier (0.25 = +25%)
    #[serde(default, deserialize_with = "null_as_default")]
    pub marketing_bonus: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reputation_bonus: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Complementary,
    #[serde(alias = "competitive")]
    Conflicting,
    #[default]
    #[serde(other)]
    Neutral,
}

/// Pairwise effect between two hired vendors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRelationship {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor1: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor2: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: RelationshipKind,

    #[serde(default, alias = "description", deserialize_with = "null_as_default")]
    pub effect: String,

    #[serde(default)]
    pub bonus: Option<f64>,

    #[serde(default)]
    pub penalty: Option<f64>,
}

impl VendorRelationship {
    /// Signed revenue modifier: the bonus when present, otherwise the penalty
    pub fn modifier(&self) -> f64 {
        self.bonus.or(self.penalty).unwrap_or(0.0)
    }
}
