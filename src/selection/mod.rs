//! Selected-spot set with availability coupling.
//!
//! The set is ordered (insertion order, or catalog order after an
//! auto-selection) and never holds duplicates. It never holds a spot the
//! current [`AvailabilityIndex`] reports unavailable: `select` refuses such
//! spots and [`SelectionManager::evict_unavailable`] must run after every
//! availability update.
//!
//! A revision counter is bumped only when the contents actually change, so
//! observers can skip recomputation cheaply.

use tracing::{debug, warn};

use crate::config::ViewMode;
use crate::model::{AvailabilityIndex, SpotId};

/// Selection set for one lot view.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    mode: ViewMode,
    items: Vec<SpotId>,
    revision: u64,
}

impl SelectionManager {
    /// Create an empty selection for the given mode.
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            items: Vec::new(),
            revision: 0,
        }
    }

    /// Interaction mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch mode. The selection is cleared.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.clear();
        }
    }

    /// Selected ids in order.
    pub fn items(&self) -> &[SpotId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, spot_id: &SpotId) -> bool {
        self.items.contains(spot_id)
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a spot. Returns `true` if the set changed.
    ///
    /// No-op in browse mode, for spots already selected and for spots that
    /// are not available.
    pub fn select(&mut self, spot_id: SpotId, availability: &AvailabilityIndex) -> bool {
        if !self.mode.is_multi_select() {
            debug!("Ignoring select of {} in {} mode", spot_id, self.mode);
            return false;
        }
        if !availability.is_available(&spot_id) {
            warn!("Refusing to select unavailable spot {}", spot_id);
            return false;
        }
        if self.contains(&spot_id) {
            return false;
        }

        debug!("Selected {}", spot_id);
        self.items.push(spot_id);
        self.bump_revision();
        true
    }

    /// Remove a spot. Returns `true` if it was selected.
    pub fn deselect(&mut self, spot_id: &SpotId) -> bool {
        let Some(pos) = self.items.iter().position(|id| id == spot_id) else {
            return false;
        };
        self.items.remove(pos);
        debug!("Deselected {}", spot_id);
        self.bump_revision();
        true
    }

    /// Overwrite the whole set. Duplicates and unavailable spots are dropped.
    /// Returns `true` if the contents changed.
    pub fn replace_all<I>(&mut self, spot_ids: I, availability: &AvailabilityIndex) -> bool
    where
        I: IntoIterator<Item = SpotId>,
    {
        let mut items: Vec<SpotId> = Vec::new();
        for id in spot_ids {
            if !availability.is_available(&id) {
                warn!("Dropping unavailable spot {} from replacement", id);
                continue;
            }
            if !items.contains(&id) {
                items.push(id);
            }
        }

        if items == self.items {
            return false;
        }
        debug!("Selection replaced with {} spot(s)", items.len());
        self.items = items;
        self.bump_revision();
        true
    }

    /// Empty the set.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.bump_revision();
    }

    /// Remove every selected spot that is no longer available. Returns the
    /// evicted ids.
    pub fn evict_unavailable(&mut self, availability: &AvailabilityIndex) -> Vec<SpotId> {
        let (keep, evicted): (Vec<SpotId>, Vec<SpotId>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|id| availability.is_available(id));
        self.items = keep;

        if !evicted.is_empty() {
            for id in &evicted {
                warn!("Evicting {} from selection: no longer available", id);
            }
            self.bump_revision();
        }
        evicted
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
