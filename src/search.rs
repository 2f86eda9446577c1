//! Ranking of nearby lots for event reservations.
//!
//! The closest-spots search returns individual spots with their walking
//! distance to a building. These are grouped by lot and ranked so the event
//! form can offer the few nearest lots that still have room for the event.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MAX_RANKED_LOTS;
use crate::error::Result;
use crate::model::{LotDetails, SpotId, SpotStatus};
use crate::request::{RequestToken, RequestTracker};

/// One spot returned by the closest-spots search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySpot {
    pub spot_id: SpotId,
    pub distance: f64,
}

/// Search hits of one lot.
#[derive(Debug, Clone, PartialEq)]
pub struct LotGroup {
    pub lot_id: String,
    pub spots: Vec<NearbySpot>,
    /// Distance of the nearest spot.
    pub distance: f64,
}

/// Group search hits by lot, keeping the minimum distance per lot. Lots keep
/// the order in which they first appear.
pub fn group_by_lot(spots: &[NearbySpot]) -> Vec<LotGroup> {
    let mut groups: Vec<LotGroup> = Vec::new();
    let mut by_lot: HashMap<String, usize> = HashMap::new();

    for spot in spots {
        let lot_id = spot.spot_id.lot_id();
        if lot_id.is_empty() {
            warn!("Search hit {} has no lot prefix", spot.spot_id);
            continue;
        }
        let idx = *by_lot.entry(lot_id.to_string()).or_insert_with(|| {
            groups.push(LotGroup {
                lot_id: lot_id.to_string(),
                spots: Vec::new(),
                distance: spot.distance,
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.distance = group.distance.min(spot.distance);
        group.spots.push(spot.clone());
    }
    groups
}

/// A lot offered to the event form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotCandidate {
    pub lot_id: String,
    pub official_lot_name: String,
    pub available_spots: u32,
    pub total_spots: u32,
    pub distance: f64,
}

impl LotCandidate {
    /// Candidate counted from the lot's catalog details.
    pub fn from_details(group: &LotGroup, details: &LotDetails) -> Self {
        let lot = details.all_lots().find(|lot| lot.lot_id == group.lot_id);
        let lot_spots: Vec<_> = details
            .spots
            .iter()
            .filter(|s| s.spot_id.lot_id() == group.lot_id)
            .collect();
        let available = lot_spots
            .iter()
            .filter(|s| s.status == SpotStatus::Available)
            .count() as u32;

        Self {
            lot_id: group.lot_id.clone(),
            official_lot_name: lot
                .and_then(|l| l.official_lot_name.clone())
                .unwrap_or_else(|| group.lot_id.clone()),
            available_spots: available,
            total_spots: lot
                .and_then(|l| l.capacity)
                .unwrap_or(lot_spots.len() as u32),
            distance: group.distance,
        }
    }

    /// Candidate counted from the search hits alone, used when the lot's
    /// details could not be fetched.
    pub fn from_group(group: &LotGroup) -> Self {
        let count = group.spots.len() as u32;
        Self {
            lot_id: group.lot_id.clone(),
            official_lot_name: group.lot_id.clone(),
            available_spots: count,
            total_spots: count,
            distance: group.distance,
        }
    }
}

/// Turn search hits into one candidate per lot.
///
/// A lot found in one of the `details` responses is counted from its catalog
/// spots; any other lot is counted from its hits alone.
pub fn lot_candidates(spots: &[NearbySpot], details: &[LotDetails]) -> Vec<LotCandidate> {
    group_by_lot(spots)
        .iter()
        .map(|group| {
            match details
                .iter()
                .find(|d| d.all_lots().any(|lot| lot.lot_id == group.lot_id))
            {
                Some(details) => LotCandidate::from_details(group, details),
                None => {
                    debug!("No details for {}, counting search hits", group.lot_id);
                    LotCandidate::from_group(group)
                }
            }
        })
        .collect()
}

/// Keep lots with at least `spots_needed` available spots, nearest first,
/// at most [`MAX_RANKED_LOTS`].
pub fn rank_lots(mut candidates: Vec<LotCandidate>, spots_needed: u32) -> Vec<LotCandidate> {
    let needed = spots_needed.max(1);
    candidates.retain(|c| c.available_spots >= needed);
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate(MAX_RANKED_LOTS);
    candidates
}

/// Lot search with supersession: starting a new search makes any earlier
/// one stale, and its results are dropped when they arrive.
#[derive(Debug, Clone, Default)]
pub struct LotSearch {
    requests: RequestTracker,
    results: Vec<LotCandidate>,
    error: Option<String>,
}

impl LotSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search. Clears the previous results.
    pub fn begin(&mut self) -> RequestToken {
        self.results.clear();
        self.error = None;
        self.requests.issue()
    }

    /// Deliver candidates for a search. Returns `false` if superseded.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<Vec<LotCandidate>>,
        spots_needed: u32,
    ) -> bool {
        if !self.requests.complete(token) {
            debug!("Dropping superseded lot search {}", token.generation());
            return false;
        }

        match result {
            Ok(candidates) => {
                self.results = rank_lots(candidates, spots_needed);
                if self.results.is_empty() {
                    self.error = Some(format!(
                        "No parking lots found with at least {} available spots.",
                        spots_needed.max(1)
                    ));
                }
            }
            Err(e) => {
                warn!("Lot search failed: {}", e);
                self.error = Some(e.user_message().to_string());
            }
        }
        true
    }

    /// Whether a search is in flight.
    pub fn is_loading(&self) -> bool {
        self.requests.is_pending()
    }

    /// Ranked lots of the last completed search.
    pub fn results(&self) -> &[LotCandidate] {
        &self.results
    }

    /// Message for the last search, if it failed or found nothing.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
