//! Spot identity and catalog record.

use std::borrow::Borrow;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{SPOT_INDEX_WIDTH, SPOT_LABEL_PREFIX};
use crate::error::{LotMapError, Result};

/// Catalog-wide spot identifier, `<lotId>-<zero padded index>` (e.g. `WST01-0007`).
///
/// The format is shared with the catalog service and used as the join key
/// between map nodes and availability records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
    /// Build an id from a lot id and a sequential spot index.
    pub fn new(lot_id: &str, index: u32) -> Self {
        Self(format!("{}-{:0width$}", lot_id, index, width = SPOT_INDEX_WIDTH))
    }

    /// Build an id from a map label such as `Spot7`.
    pub fn from_label(lot_id: &str, label: &str) -> Result<Self> {
        let index = spot_label_index(label).ok_or_else(|| LotMapError::InvalidSpotLabel {
            label: label.to_string(),
        })?;
        Ok(Self::new(lot_id, index))
    }

    /// Parse and validate an id string.
    pub fn parse(s: &str) -> Result<Self> {
        let id = Self(s.trim().to_string());
        if id.index().is_none() || id.lot_id().is_empty() {
            return Err(LotMapError::InvalidSpotId {
                spot_id: s.to_string(),
            });
        }
        Ok(id)
    }

    /// Lot part of the id (everything before the last `-`).
    pub fn lot_id(&self) -> &str {
        self.0.rsplit_once('-').map(|(lot, _)| lot).unwrap_or("")
    }

    /// Numeric spot index, if the suffix is numeric.
    pub fn index(&self) -> Option<u32> {
        self.0
            .rsplit_once('-')
            .and_then(|(_, suffix)| suffix.parse().ok())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SpotId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn spot_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^{}(\d+)", SPOT_LABEL_PREFIX)).expect("spot label pattern is valid")
    })
}

/// Extract the sequential index from a map label (`Spot7` -> 7).
///
/// Returns `None` for labels that are not spots or whose number does not fit.
pub fn spot_label_index(label: &str) -> Option<u32> {
    spot_label_regex()
        .captures(label.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Catalog status of a spot, independent of any time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    #[default]
    Available,
    Reserved,
    Occupied,
    #[serde(other)]
    Unknown,
}

/// One parking spot as returned by the lot catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// Catalog id.
    pub spot_id: SpotId,
    /// Category (faculty, commuter, ada, ev, ...).
    #[serde(rename = "type", default)]
    pub spot_type: String,
    /// Catalog status.
    #[serde(default)]
    pub status: SpotStatus,
    /// Hourly rate.
    #[serde(default)]
    pub price_per_hour: Option<f64>,
    /// Covered parking.
    #[serde(default)]
    pub covered: Option<bool>,
    /// Zone name.
    #[serde(default)]
    pub zone: Option<String>,
    /// Availability for the requested window, when the catalog was queried with one.
    #[serde(default)]
    pub is_available_for_time: Option<bool>,
}

impl Spot {
    /// Create an available spot with only id and category set.
    pub fn new(spot_id: SpotId, spot_type: impl Into<String>) -> Self {
        Self {
            spot_id,
            spot_type: spot_type.into(),
            status: SpotStatus::Available,
            price_per_hour: None,
            covered: None,
            zone: None,
            is_available_for_time: Some(true),
        }
    }

    /// Whether the spot can be used in the current window.
    pub fn is_available(&self) -> bool {
        self.is_available_for_time.unwrap_or(false)
    }
}
