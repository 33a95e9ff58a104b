//! Persisted tender row and its derived stage classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lifecycle stage derived from a release's tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Planning,
    Tender,
    Award,
    /// First tag of a release carrying none of the known stages
    Other(String),
    /// Release had no tags
    Unknown,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Planning => "planning",
            Stage::Tender => "tender",
            Stage::Award => "award",
            Stage::Other(tag) => tag,
            Stage::Unknown => "unknown",
        }
    }

    /// Parse a stored stage value
    pub fn parse(value: &str) -> Self {
        match value {
            "planning" => Stage::Planning,
            "tender" => Stage::Tender,
            "award" => Stage::Award,
            "unknown" | "" => Stage::Unknown,
            other => Stage::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Stage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Stage::parse(&s))
    }
}

/// Canonical stored tender, one per `ocid`
///
/// This structure maps to the `tenders` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderRow {
    /// Upsert key
    pub ocid: String,

    pub release_id: Option<String>,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub stage: Stage,

    pub buyer_name: Option<String>,
    pub buyer_id: Option<String>,

    pub value_amount: Option<f64>,
    pub value_currency: String,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,

    pub published_at: Option<DateTime<Utc>>,
    pub tender_start: Option<DateTime<Utc>>,
    pub tender_end: Option<DateTime<Utc>>,
    pub contract_start: Option<DateTime<Utc>>,
    pub contract_end: Option<DateTime<Utc>>,

    pub cpv_codes: Vec<String>,
    pub region: Option<String>,

    /// Original release, kept for audit
    pub raw_payload: Value,

    pub synced_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
