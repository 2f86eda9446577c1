//! Declarative spot bindings: what each map node should look like and do.
//!
//! The renderer applies a [`SpotBinding`] to the node named by its
//! [`NodeRef`]; it never decides paint or interactivity itself.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::ViewMode;
use crate::model::SpotId;
use crate::registry::{MapAsset, NodeRef};
use crate::status::{SpotVisualState, StatusResolver};
use crate::theme::{self, Rgb};

/// Pointer cursor over a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    Pointer,
    NotAllowed,
}

/// Paint directive for one spot node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    pub fill: Rgb,
    /// Fill while hovered. `None` keeps `fill`.
    pub hover_fill: Option<Rgb>,
    pub cursor: Cursor,
}

impl Paint {
    /// Paint for a visual state in a mode.
    pub fn for_state(state: SpotVisualState, mode: ViewMode) -> Self {
        match state {
            SpotVisualState::Unavailable => Paint {
                fill: theme::UNAVAILABLE_FILL,
                hover_fill: (mode == ViewMode::Browse).then_some(theme::UNAVAILABLE_HOVER),
                cursor: Cursor::NotAllowed,
            },
            SpotVisualState::AvailableUnselected => Paint {
                fill: theme::AVAILABLE_FILL,
                hover_fill: Some(theme::AVAILABLE_HOVER),
                cursor: Cursor::Pointer,
            },
            SpotVisualState::Selected => Paint {
                fill: theme::SELECTED_FILL,
                hover_fill: Some(theme::SELECTED_HOVER),
                cursor: Cursor::Pointer,
            },
        }
    }
}

/// Resolved binding for one spot node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotBinding {
    pub spot_id: SpotId,
    pub node_ref: NodeRef,
    pub state: SpotVisualState,
    pub paint: Paint,
    /// Whether a click handler is attached.
    pub interactive: bool,
    /// Glow for the externally highlighted spot (browse mode only).
    pub highlighted: bool,
}

impl SpotBinding {
    /// Glow color to draw around the node, if highlighted.
    pub fn glow(&self) -> Option<Rgb> {
        self.highlighted.then_some(theme::HIGHLIGHT_GLOW)
    }
}

/// Compute bindings for every spot node of `asset`, in document order.
///
/// `known_lots` decides which map groups name a lot of their own (see
/// [`MapAsset::spot_ids`]).
pub fn bind_spots(
    asset: &MapAsset,
    known_lots: &BTreeSet<String>,
    resolver: &StatusResolver<'_>,
    mode: ViewMode,
    highlighted: Option<&SpotId>,
) -> Vec<SpotBinding> {
    asset
        .spot_ids(known_lots)
        .into_iter()
        .map(|(spot_id, node_ref)| {
            let state = resolver.state(&spot_id);
            let highlighted = mode == ViewMode::Browse && highlighted == Some(&spot_id);
            SpotBinding {
                paint: Paint::for_state(state, mode),
                interactive: state.is_interactive(),
                highlighted,
                state,
                node_ref,
                spot_id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AvailabilityIndex;
    use crate::selection::SelectionManager;

    const MAP: &str = r#"<svg width="100" height="50">
  <path data-vectornator-layer-name="Spot1"/>
  <path data-vectornator-layer-name="Spot2"/>
  <path data-vectornator-layer-name="Spot3"/>
  <path data-vectornator-layer-name="Entrance"/>
</svg>"#;

    fn setup(mode: ViewMode) -> (MapAsset, AvailabilityIndex, SelectionManager) {
        let asset = MapAsset::parse_svg("WST01", MAP).unwrap();
        let mut index = AvailabilityIndex::new();
        index.set(SpotId::new("WST01", 1), true);
        index.set(SpotId::new("WST01", 2), true);
        index.set(SpotId::new("WST01", 3), false);
        (asset, index, SelectionManager::new(mode))
    }

    #[test]
    fn test_paint_table() {
        let browse = Paint::for_state(SpotVisualState::Unavailable, ViewMode::Browse);
        assert_eq!(browse.hover_fill, Some(theme::UNAVAILABLE_HOVER));
        assert_eq!(browse.cursor, Cursor::NotAllowed);

        let event = Paint::for_state(SpotVisualState::Unavailable, ViewMode::EventSelect);
        assert_eq!(event.fill, theme::UNAVAILABLE_FILL);
        assert_eq!(event.hover_fill, None);

        let selected = Paint::for_state(SpotVisualState::Selected, ViewMode::EventSelect);
        assert_eq!(selected.fill, theme::SELECTED_FILL);
        assert_eq!(selected.hover_fill, Some(theme::SELECTED_HOVER));
        assert_eq!(selected.cursor, Cursor::Pointer);
    }

    #[test]
    fn test_bind_event_mode() {
        let (asset, index, mut selection) = setup(ViewMode::EventSelect);
        selection.select(SpotId::new("WST01", 2), &index);
        let resolver = StatusResolver::new(&index, &selection);

        let bindings = bind_spots(&asset, &BTreeSet::new(), &resolver, ViewMode::EventSelect, None);
        let states: Vec<_> = bindings.iter().map(|b| b.state).collect();
        assert_eq!(
            states,
            vec![
                SpotVisualState::AvailableUnselected,
                SpotVisualState::Selected,
                SpotVisualState::Unavailable,
            ]
        );
        assert!(bindings[0].interactive);
        assert!(!bindings[2].interactive);
        assert_eq!(bindings[1].node_ref, NodeRef(2));
    }

    #[test]
    fn test_highlight_only_in_browse_mode() {
        let (asset, index, selection) = setup(ViewMode::Browse);
        let resolver = StatusResolver::new(&index, &selection);
        let target = SpotId::new("WST01", 3);

        let bindings = bind_spots(&asset, &BTreeSet::new(), &resolver, ViewMode::Browse, Some(&target));
        let glowing: Vec<_> = bindings.iter().filter(|b| b.highlighted).map(|b| b.spot_id.as_str()).collect();
        assert_eq!(glowing, vec!["WST01-0003"]);
        assert_eq!(bindings[2].glow(), Some(theme::HIGHLIGHT_GLOW));
        assert_eq!(bindings[0].glow(), None);

        let bindings = bind_spots(
            &asset,
            &BTreeSet::new(),
            &resolver,
            ViewMode::EventSelect,
            Some(&target),
        );
        assert!(bindings.iter().all(|b| !b.highlighted));
    }

    #[test]
    fn test_binding_json() {
        let (asset, index, selection) = setup(ViewMode::Browse);
        let resolver = StatusResolver::new(&index, &selection);
        let bindings = bind_spots(&asset, &BTreeSet::new(), &resolver, ViewMode::Browse, None);
        let json = serde_json::to_value(&bindings[2]).unwrap();
        assert_eq!(json["spotId"], "WST01-0003");
        assert_eq!(json["state"], "unavailable");
        assert_eq!(json["paint"]["fill"], "#ffcccc");
        assert_eq!(json["paint"]["cursor"], "not-allowed");
        assert_eq!(json["nodeRef"], 3);
    }
}
