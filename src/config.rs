//! Configuration constants and settings for the map viewport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{SpotId, TimeWindow};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 1e-9;

/// Upper zoom bound (3 = 300%).
pub const MAX_SCALE: f64 = 3.0;

/// Scale change per unit of wheel `delta_y`.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;

/// Multiplicative step for the zoom buttons.
pub const ZOOM_STEP_FACTOR: f64 = 1.1;

/// Offset change for one pan button press, in container units.
pub const PAN_STEP: f64 = 20.0;

/// Zero-padded width of the numeric suffix of a spot id (`WST01-0007`).
pub const SPOT_INDEX_WIDTH: usize = 4;

/// Label prefix marking a map node as a parking spot (`Spot7`).
pub const SPOT_LABEL_PREFIX: &str = "Spot";

/// Layer-name attribute written by the asset cleanup step.
pub const LAYER_NAME_ATTR: &str = "data-vectornator-layer-name";

/// XML namespace of the drawing tool's own attributes.
pub const VECTORNATOR_NS: &str = "http://vectornator.io";

/// Layer-name attribute as exported by the drawing tool (`vectornator:layerName`).
pub const RAW_LAYER_NAME_ATTR: (&str, &str) = (VECTORNATOR_NS, "layerName");

/// Maximum number of lots kept by the event lot search.
pub const MAX_RANKED_LOTS: usize = 5;

/// Interaction mode of a lot view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Single-spot browsing. Clicks only open spot details.
    #[default]
    Browse,
    /// Multi-spot event reservation. Clicks toggle selection.
    EventSelect,
}

impl ViewMode {
    /// Check if clicks mutate the selection set in this mode.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, ViewMode::EventSelect)
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Browse => write!(f, "browse"),
            ViewMode::EventSelect => write!(f, "event"),
        }
    }
}

/// Tunables for the transform controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Upper zoom bound.
    pub max_scale: f64,
    /// Scale change per unit of wheel delta.
    pub wheel_sensitivity: f64,
    /// Multiplicative zoom button step.
    pub zoom_step: f64,
    /// Pan button step in container units.
    pub pan_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_scale: MAX_SCALE,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            zoom_step: ZOOM_STEP_FACTOR,
            pan_step: PAN_STEP,
        }
    }
}

/// Explicit configuration handed to a lot view by its host.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Interaction mode.
    pub mode: ViewMode,
    /// Lot to show.
    pub lot_id: String,
    /// Time window the availability is computed for.
    pub window: TimeWindow,
    /// Spot to glow in browse mode (e.g. the search result the user picked).
    pub highlighted_spot: Option<SpotId>,
    /// Transform tunables.
    pub viewport: ViewportConfig,
}

impl ViewerConfig {
    /// Create a configuration for a lot and window with default tunables.
    pub fn new(mode: ViewMode, lot_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            mode,
            lot_id: lot_id.into(),
            window,
            highlighted_spot: None,
            viewport: ViewportConfig::default(),
        }
    }

    /// Set the highlighted spot.
    pub fn with_highlight(mut self, spot_id: SpotId) -> Self {
        self.highlighted_spot = Some(spot_id);
        self
    }

    /// Window starting at `start` and lasting `hours`.
    pub fn window_from(start: DateTime<Utc>, hours: i64) -> TimeWindow {
        TimeWindow::new(start, start + chrono::Duration::hours(hours))
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a is in range [min, max] with epsilon tolerance.
    #[inline]
    pub fn in_range(a: f64, min: f64, max: f64) -> bool {
        a >= min - EPS && a <= max + EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_config_defaults() {
        let config = ViewportConfig::default();
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.wheel_sensitivity, 0.001);
        assert_eq!(config.zoom_step, 1.1);
        assert_eq!(config.pan_step, 20.0);
    }

    #[test]
    fn test_view_mode_serde() {
        let mode: ViewMode = serde_json::from_str("\"eventSelect\"").unwrap();
        assert_eq!(mode, ViewMode::EventSelect);
        assert!(mode.is_multi_select());
        assert!(!ViewMode::default().is_multi_select());
    }

    #[test]
    fn test_float_cmp() {
        assert!(float_cmp::approx_eq(0.1 + 0.2, 0.3));
        assert!(float_cmp::in_range(-1e-12, 0.0, 1.0));
        assert!(!float_cmp::in_range(1.1, 0.0, 1.0));
    }
}
