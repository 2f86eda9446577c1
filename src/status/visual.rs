//! Per-spot visual state and click resolution.

use serde::Serialize;

use crate::config::ViewMode;
use crate::model::SpotId;

/// Visual state of one spot, recomputed from scratch whenever an input changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpotVisualState {
    /// Not usable in the current window. Never interactive.
    Unavailable,
    /// Usable and not part of the selection.
    AvailableUnselected,
    /// Usable and selected.
    Selected,
}

impl SpotVisualState {
    /// Resolve the state from availability and selection membership.
    ///
    /// Availability wins: a spot that is not available is `Unavailable` even
    /// if a stale selection still names it.
    pub fn resolve(available: bool, selected: bool) -> Self {
        match (available, selected) {
            (false, _) => SpotVisualState::Unavailable,
            (true, true) => SpotVisualState::Selected,
            (true, false) => SpotVisualState::AvailableUnselected,
        }
    }

    /// Check if the spot reacts to clicks.
    pub fn is_interactive(self) -> bool {
        !matches!(self, SpotVisualState::Unavailable)
    }
}

impl std::fmt::Display for SpotVisualState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotVisualState::Unavailable => write!(f, "unavailable"),
            SpotVisualState::AvailableUnselected => write!(f, "available"),
            SpotVisualState::Selected => write!(f, "selected"),
        }
    }
}

/// What a click on a spot should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "spotId", rename_all = "camelCase")]
pub enum ClickAction {
    /// Nothing (unavailable spot, or no spot under the pointer).
    None,
    /// Open the informational detail panel.
    ShowDetails(SpotId),
    /// Add to the selection.
    Select(SpotId),
    /// Remove from the selection.
    Deselect(SpotId),
}

/// Resolve a click on a spot in the given state.
///
/// Browse mode never mutates a selection: every interactive spot opens its
/// details instead.
pub fn click_action(state: SpotVisualState, mode: ViewMode, spot_id: &SpotId) -> ClickAction {
    match (state, mode) {
        (SpotVisualState::Unavailable, _) => ClickAction::None,
        (_, ViewMode::Browse) => ClickAction::ShowDetails(spot_id.clone()),
        (SpotVisualState::AvailableUnselected, ViewMode::EventSelect) => {
            ClickAction::Select(spot_id.clone())
        }
        (SpotVisualState::Selected, ViewMode::EventSelect) => ClickAction::Deselect(spot_id.clone()),
    }
}
