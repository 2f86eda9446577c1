//! Window-aware availability payloads and the merged per-spot index.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::lot::LotDetails;
use super::spot::{SpotId, SpotStatus};
use crate::error::{LotMapError, Result};

/// Availability of one spot for the queried window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotAvailability {
    pub spot_id: SpotId,
    pub available: bool,
    #[serde(default)]
    pub status: SpotStatus,
    #[serde(rename = "type", default)]
    pub spot_type: Option<String>,
}

/// Lot availability summary for a time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotAvailability {
    #[serde(default)]
    pub lot_id: Option<String>,
    #[serde(default)]
    pub available: u32,
    #[serde(default)]
    pub occupied: u32,
    #[serde(default)]
    pub total: u32,
    /// Available spots per category.
    #[serde(default)]
    pub category_counts: BTreeMap<String, u32>,
    pub spots: Vec<SpotAvailability>,
}

impl LotAvailability {
    /// Parse an availability payload.
    ///
    /// A `spots` field that is missing or not an array is reported as
    /// [`LotMapError::MalformedAvailabilityPayload`] instead of being read as
    /// "no spots", which would silently mark everything unavailable.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value.get("spots") {
            Some(serde_json::Value::Array(_)) => Ok(serde_json::from_value(value)?),
            Some(other) => Err(LotMapError::MalformedAvailabilityPayload {
                message: format!("availability spots is {}, expected an array", json_kind(other)),
            }),
            None => Err(LotMapError::MalformedAvailabilityPayload {
                message: "availability payload has no spots".to_string(),
            }),
        }
    }
}

/// Reject a payload whose `spots` field exists but is not an array.
pub(crate) fn ensure_spot_array(value: &serde_json::Value, context: &str) -> Result<()> {
    match value.get("spots") {
        None | Some(serde_json::Value::Array(_)) => Ok(()),
        Some(other) => Err(LotMapError::MalformedAvailabilityPayload {
            message: format!("{} spots is {}, expected an array", context, json_kind(other)),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Merged answer to "is this spot usable in the current window".
///
/// Built from the catalog's `isAvailableForTime` flags and overridden by the
/// window-aware availability service, which is authoritative. Spots with no
/// record are unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityIndex {
    entries: HashMap<SpotId, bool>,
}

impl AvailabilityIndex {
    /// Create an empty index (every spot unavailable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from catalog spots that carry a window-aware flag.
    pub fn from_details(details: &LotDetails) -> Self {
        let entries = details
            .spots
            .iter()
            .filter_map(|s| s.is_available_for_time.map(|a| (s.spot_id.clone(), a)))
            .collect();
        Self { entries }
    }

    /// Overlay an availability response.
    pub fn apply(&mut self, availability: &LotAvailability) {
        for spot in &availability.spots {
            self.entries.insert(spot.spot_id.clone(), spot.available);
        }
    }

    /// Set a single spot.
    pub fn set(&mut self, spot_id: SpotId, available: bool) {
        self.entries.insert(spot_id, available);
    }

    /// Whether the spot is available in the current window.
    pub fn is_available(&self, spot_id: &SpotId) -> bool {
        self.entries.get(spot_id).copied().unwrap_or(false)
    }

    /// Number of spots with a record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no spot has a record.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of available spots.
    pub fn available_count(&self) -> usize {
        self.entries.values().filter(|a| **a).count()
    }
}
