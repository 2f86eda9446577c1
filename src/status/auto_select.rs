//! Event-mode auto-selection from facet filters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{AvailabilityIndex, Spot, SpotId};

fn default_spots_needed() -> u32 {
    1
}

/// Facet filters chosen in the event reservation form.
///
/// Facets combine with OR: a spot is a candidate if it matches any facet the
/// user has set. Unset facets never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilters {
    /// Highest acceptable hourly rate.
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Required covered flag.
    #[serde(default)]
    pub covered: Option<bool>,
    /// Required zone. An empty string counts as unset.
    #[serde(default)]
    pub zone: Option<String>,
    /// Checked spot categories.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Number of spots to pick. Values below 1 are treated as 1.
    #[serde(default = "default_spots_needed")]
    pub spots_needed: u32,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            max_price: None,
            covered: None,
            zone: None,
            categories: BTreeSet::new(),
            spots_needed: default_spots_needed(),
        }
    }
}

impl EventFilters {
    /// Filters asking for `spots_needed` spots with no facet set.
    pub fn new(spots_needed: u32) -> Self {
        Self {
            spots_needed,
            ..Self::default()
        }
    }

    /// Check a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Set the zone facet.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Set the covered facet.
    pub fn with_covered(mut self, covered: bool) -> Self {
        self.covered = Some(covered);
        self
    }

    /// Set the price facet.
    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Number of spots to pick, at least 1.
    pub fn spots_needed(&self) -> usize {
        self.spots_needed.max(1) as usize
    }

    fn zone_facet(&self) -> Option<&str> {
        self.zone.as_deref().map(str::trim).filter(|z| !z.is_empty())
    }

    /// Check if any facet is set.
    pub fn has_active_facets(&self) -> bool {
        self.max_price.is_some()
            || self.covered.is_some()
            || self.zone_facet().is_some()
            || !self.categories.is_empty()
    }

    /// Check if the spot matches at least one set facet.
    pub fn matches(&self, spot: &Spot) -> bool {
        let price = match (self.max_price, spot.price_per_hour) {
            (Some(max), Some(price)) => price <= max,
            _ => false,
        };
        let covered = match (self.covered, spot.covered) {
            (Some(want), Some(have)) => want == have,
            _ => false,
        };
        let zone = match (self.zone_facet(), spot.zone.as_deref()) {
            (Some(want), Some(have)) => want == have.trim(),
            _ => false,
        };
        let category = self.categories.contains(&spot.spot_type);

        price || covered || zone || category
    }
}

/// Pick spots for an event.
///
/// Candidates are the available spots matching any set facet. If there are
/// none, every available spot is a candidate. The first `spots_needed`
/// candidates in catalog order are returned; fewer if there are not enough.
pub fn auto_select(spots: &[Spot], availability: &AvailabilityIndex, filters: &EventFilters) -> Vec<SpotId> {
    let available: Vec<&Spot> = spots
        .iter()
        .filter(|spot| availability.is_available(&spot.spot_id))
        .collect();

    let matching: Vec<&Spot> = available
        .iter()
        .copied()
        .filter(|spot| filters.matches(spot))
        .collect();

    let candidates = if matching.is_empty() {
        debug!(
            "No spot matches the filters, falling back to all {} available",
            available.len()
        );
        available
    } else {
        matching
    };

    candidates
        .into_iter()
        .take(filters.spots_needed())
        .map(|spot| spot.spot_id.clone())
        .collect()
}
