//! Viewport state and the cover-fit transform.

use kurbo::{Affine, Point, Size, Vec2};
use serde::Serialize;

/// Size of the loaded map asset in its own units.
pub type ContentMetrics = Size;

/// Size of the hosting viewport element.
pub type ContainerMetrics = Size;

/// Pan and zoom applied to the map: `view = content * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    /// Uniform zoom factor (1.0 = 100%).
    pub scale: f64,
    /// Translation of the content origin in container units.
    pub offset: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    /// Initial state for a content/container pair: cover fit, centered.
    pub fn fit(content: ContentMetrics, container: ContainerMetrics) -> Self {
        let scale = fit_scale(content, container);
        Self {
            scale,
            offset: initial_offset(content, container, scale),
        }
    }

    /// Affine transform for the rendering layer (origin at the top-left corner).
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Map a content point into container coordinates.
    pub fn content_to_view(&self, content_pos: Point) -> Point {
        (content_pos.to_vec2() * self.scale + self.offset).to_point()
    }

    /// Map a container point back into content coordinates.
    pub fn view_to_content(&self, view_pos: Point) -> Point {
        ((view_pos.to_vec2() - self.offset) / self.scale).to_point()
    }

    /// Get the zoom level as a percentage string.
    pub fn zoom_percent(&self) -> String {
        format!("{:.0}%", self.scale * 100.0)
    }
}

/// Smallest scale at which the content covers the container on both axes.
pub fn fit_scale(content: ContentMetrics, container: ContainerMetrics) -> f64 {
    (container.width / content.width).max(container.height / content.height)
}

/// Offset that centers content scaled by `scale` in the container.
pub fn initial_offset(content: ContentMetrics, container: ContainerMetrics, scale: f64) -> Vec2 {
    Vec2::new(
        (container.width - content.width * scale) / 2.0,
        (container.height - content.height * scale) / 2.0,
    )
}

/// Metrics usable for fitting: finite and strictly positive on both axes.
pub fn is_usable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;

    #[test]
    fn test_fit_wide_content() {
        let content = Size::new(1000.0, 500.0);
        let container = Size::new(800.0, 600.0);
        assert!(approx_eq(fit_scale(content, container), 1.2));

        let state = ViewportState::fit(content, container);
        assert!(approx_eq(state.offset.x, -200.0));
        assert!(approx_eq(state.offset.y, 0.0));
    }

    #[test]
    fn test_fit_same_aspect() {
        let state = ViewportState::fit(Size::new(400.0, 300.0), Size::new(800.0, 600.0));
        assert!(approx_eq(state.scale, 2.0));
        assert_eq!(state.offset, Vec2::ZERO);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let state = ViewportState {
            scale: 2.0,
            offset: Vec2::new(-50.0, -30.0),
        };
        let original = Point::new(100.0, 50.0);
        let view = state.content_to_view(original);
        assert!(approx_eq(view.x, 150.0));
        assert!(approx_eq(view.y, 70.0));

        let back = state.view_to_content(view);
        assert!(approx_eq(original.x, back.x));
        assert!(approx_eq(original.y, back.y));
    }

    #[test]
    fn test_affine_matches_point_mapping() {
        let state = ViewportState {
            scale: 1.5,
            offset: Vec2::new(-10.0, -20.0),
        };
        let p = Point::new(40.0, 80.0);
        let a = state.to_affine() * p;
        let b = state.content_to_view(p);
        assert!(approx_eq(a.x, b.x));
        assert!(approx_eq(a.y, b.y));
    }

    #[test]
    fn test_zoom_percent() {
        let state = ViewportState {
            scale: 1.2,
            offset: Vec2::ZERO,
        };
        assert_eq!(state.zoom_percent(), "120%");
    }

    #[test]
    fn test_is_usable() {
        assert!(is_usable(Size::new(1.0, 1.0)));
        assert!(!is_usable(Size::new(0.0, 10.0)));
        assert!(!is_usable(Size::new(10.0, f64::NAN)));
    }
}
