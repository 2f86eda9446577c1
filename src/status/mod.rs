//! Spot status resolution.
//!
//! Every spot's visual state is a pure function of two inputs: whether the
//! availability service reports it usable for the current window, and whether
//! the selection contains it. Nothing is cached; callers re-resolve after any
//! input changes.

mod auto_select;
mod display;
mod visual;

pub use auto_select::{auto_select, EventFilters};
pub use display::{display_status, match_active_reservation, DisplayStatus};
pub use visual::{click_action, ClickAction, SpotVisualState};

use crate::model::{AvailabilityIndex, SpotId};
use crate::selection::SelectionManager;

/// Read-only view over the inputs of the per-spot state machine.
#[derive(Debug, Clone, Copy)]
pub struct StatusResolver<'a> {
    availability: &'a AvailabilityIndex,
    selection: &'a SelectionManager,
}

impl<'a> StatusResolver<'a> {
    /// Create a resolver over the current availability and selection.
    pub fn new(availability: &'a AvailabilityIndex, selection: &'a SelectionManager) -> Self {
        Self {
            availability,
            selection,
        }
    }

    /// Visual state of one spot.
    pub fn state(&self, spot_id: &SpotId) -> SpotVisualState {
        SpotVisualState::resolve(
            self.availability.is_available(spot_id),
            self.selection.contains(spot_id),
        )
    }

    /// What clicking the spot does in the selection's mode.
    pub fn click(&self, spot_id: &SpotId) -> ClickAction {
        click_action(self.state(spot_id), self.selection.mode(), spot_id)
    }

    /// Resolve every id, keeping input order.
    pub fn resolve_all<'s, I>(&self, spot_ids: I) -> Vec<(SpotId, SpotVisualState)>
    where
        I: IntoIterator<Item = &'s SpotId>,
    {
        spot_ids
            .into_iter()
            .map(|id| (id.clone(), self.state(id)))
            .collect()
    }
}
