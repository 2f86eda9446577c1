//! Lot catalog records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::availability::ensure_spot_array;
use super::spot::{Spot, SpotId};
use crate::error::Result;

/// A parking lot as described by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Short lot id used in spot ids and map names.
    pub lot_id: String,
    /// Display name.
    #[serde(default)]
    pub official_lot_name: Option<String>,
    /// Number of spots.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Hourly rate.
    #[serde(default)]
    pub price: Option<f64>,
    /// Opening hours, passed through untouched.
    #[serde(default)]
    pub timings: Option<serde_json::Value>,
    /// Campus name.
    #[serde(default)]
    pub campus: Option<String>,
    /// Nearest building.
    #[serde(default)]
    pub closest_building: Option<String>,
    /// Lot group this lot is drawn with.
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Lot details response: the lot (or every lot of a group) plus its spots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDetails {
    /// Single lot shape of the response.
    #[serde(default)]
    pub lot: Option<Lot>,
    /// Grouped shape of the response.
    #[serde(default)]
    pub lots: Vec<Lot>,
    /// Spots in catalog order.
    #[serde(default)]
    pub spots: Vec<Spot>,
}

impl LotDetails {
    /// Parse a details payload, rejecting a spot list that is not an array.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        ensure_spot_array(&value, "lot details")?;
        Ok(serde_json::from_value(value)?)
    }

    /// Iterate over every lot in the response.
    pub fn all_lots(&self) -> impl Iterator<Item = &Lot> {
        self.lot.iter().chain(self.lots.iter())
    }

    /// Lot ids present in the response. Map groups carrying one of these
    /// names own the spots drawn inside them.
    pub fn known_lot_ids(&self) -> BTreeSet<String> {
        self.all_lots().map(|lot| lot.lot_id.clone()).collect()
    }

    /// Display name of the primary lot.
    pub fn display_name(&self) -> Option<&str> {
        self.all_lots()
            .next()
            .map(|lot| lot.official_lot_name.as_deref().unwrap_or(&lot.lot_id))
    }

    /// Look up a spot by id.
    pub fn spot(&self, spot_id: &SpotId) -> Option<&Spot> {
        self.spots.iter().find(|s| &s.spot_id == spot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LotMapError;
    use serde_json::json;

    #[test]
    fn test_single_lot_shape() {
        let details = LotDetails::from_value(json!({
            "lot": { "lotId": "WST01", "officialLotName": "West 1", "capacity": 40 },
            "spots": [ { "spotId": "WST01-0001", "type": "commuter" } ]
        }))
        .unwrap();
        assert_eq!(details.display_name(), Some("West 1"));
        assert_eq!(details.known_lot_ids().len(), 1);
        assert_eq!(details.spots.len(), 1);
    }

    #[test]
    fn test_grouped_lot_shape() {
        let details = LotDetails::from_value(json!({
            "lots": [
                { "lotId": "CPC01", "groupId": "CPC" },
                { "lotId": "CPC02", "groupId": "CPC" }
            ],
            "spots": []
        }))
        .unwrap();
        let ids: Vec<_> = details.known_lot_ids().into_iter().collect();
        assert_eq!(ids, vec!["CPC01".to_string(), "CPC02".to_string()]);
        // Without a name the lot id is shown.
        assert_eq!(details.display_name(), Some("CPC01"));
    }

    #[test]
    fn test_spots_not_array() {
        let err = LotDetails::from_value(json!({ "lot": { "lotId": "X" }, "spots": {} }))
            .unwrap_err();
        assert!(matches!(err, LotMapError::MalformedAvailabilityPayload { .. }));
    }
}
