//! Input handling for pan and zoom.

use kurbo::{Point, Size, Vec2};
use serde::Serialize;
use tracing::{debug, warn};

use super::clamp::{clamp_offset, offset_floor};
use super::state::{fit_scale, is_usable, ContainerMetrics, ContentMetrics, ViewportState};
use crate::config::ViewportConfig;

/// Direction of a pan button. Panning up reveals content above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Offset change for one press.
    pub fn delta(self, step: f64) -> Vec2 {
        match self {
            PanDirection::Up => Vec2::new(0.0, step),
            PanDirection::Down => Vec2::new(0.0, -step),
            PanDirection::Left => Vec2::new(step, 0.0),
            PanDirection::Right => Vec2::new(-step, 0.0),
        }
    }
}

/// A UI input event for the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportInput {
    /// Pointer pressed at a container position.
    PointerDown(Point),
    /// Pointer moved to a container position.
    PointerMove(Point),
    /// Pointer released.
    PointerUp,
    /// Pointer left the container.
    PointerLeave,
    /// Wheel scrolled with the pointer at a container position.
    Wheel { pointer: Point, delta_y: f64 },
    /// Zoom-in button.
    ZoomIn,
    /// Zoom-out button.
    ZoomOut,
    /// Pan button.
    Pan(PanDirection),
    /// Container re-measured.
    Resize(ContainerMetrics),
}

/// Which pan/zoom buttons should be enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlAffordances {
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub can_pan_up: bool,
    pub can_pan_down: bool,
    pub can_pan_left: bool,
    pub can_pan_right: bool,
}

/// Turns input events into clamped viewport states.
///
/// Every operation is a no-op until both content and container metrics are
/// known. Changing either metric discards the current pan/zoom and returns to
/// the cover fit.
#[derive(Debug, Clone)]
pub struct TransformController {
    config: ViewportConfig,
    content: Option<ContentMetrics>,
    container: Option<ContainerMetrics>,
    state: ViewportState,
    /// `pointer - offset` captured at drag start.
    drag_anchor: Option<Vec2>,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl TransformController {
    /// Create a controller with no metrics.
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            content: None,
            container: None,
            state: ViewportState::default(),
            drag_anchor: None,
        }
    }

    /// Current viewport state.
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Content metrics, if the asset has been measured.
    pub fn content(&self) -> Option<ContentMetrics> {
        self.content
    }

    /// Container metrics, if measured.
    pub fn container(&self) -> Option<ContainerMetrics> {
        self.container
    }

    /// Whether both metrics are known.
    pub fn is_ready(&self) -> bool {
        self.metrics().is_some()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    fn metrics(&self) -> Option<(ContentMetrics, ContainerMetrics)> {
        Some((self.content?, self.container?))
    }

    /// Cover-fit scale, the lower zoom bound.
    pub fn min_scale(&self) -> Option<f64> {
        self.metrics()
            .map(|(content, container)| fit_scale(content, container))
    }

    /// Upper zoom bound. Raised to the fit scale when the content is so small
    /// that covering the container already needs more than the configured max.
    pub fn max_scale(&self) -> f64 {
        match self.min_scale() {
            Some(min) => self.config.max_scale.max(min),
            None => self.config.max_scale,
        }
    }

    /// Set (or clear, while a new asset loads) the content metrics.
    pub fn set_content(&mut self, content: Option<ContentMetrics>) {
        let content = content.filter(|size| {
            let usable = is_usable(*size);
            if !usable {
                warn!("Ignoring unusable content size {:?}", size);
            }
            usable
        });
        if self.content == content {
            return;
        }
        self.content = content;
        self.reset_to_fit();
    }

    /// Set the container metrics after a resize.
    pub fn set_container(&mut self, container: ContainerMetrics) {
        if !is_usable(container) {
            warn!("Ignoring unusable container size {:?}", container);
            return;
        }
        if self.container == Some(container) {
            return;
        }
        self.container = Some(container);
        self.reset_to_fit();
    }

    fn reset_to_fit(&mut self) {
        self.drag_anchor = None;
        self.state = match self.metrics() {
            Some((content, container)) => ViewportState::fit(content, container),
            None => ViewportState::default(),
        };
        debug!(
            "Viewport reset: scale={:.4} offset=({:.1}, {:.1})",
            self.state.scale, self.state.offset.x, self.state.offset.y
        );
    }

    /// Start a drag at `pointer`.
    pub fn drag_start(&mut self, pointer: Point) {
        if !self.is_ready() {
            return;
        }
        self.drag_anchor = Some(pointer.to_vec2() - self.state.offset);
    }

    /// Move an active drag to `pointer`.
    pub fn drag_move(&mut self, pointer: Point) -> ViewportState {
        let (Some(anchor), Some((content, container))) = (self.drag_anchor, self.metrics()) else {
            return self.state;
        };
        let offset = pointer.to_vec2() - anchor;
        self.state.offset = clamp_offset(offset, self.state.scale, content, container);
        self.state
    }

    /// End the current drag.
    pub fn drag_end(&mut self) {
        self.drag_anchor = None;
    }

    /// Wheel zoom anchored at the pointer. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, pointer: Point, delta_y: f64) -> ViewportState {
        if !delta_y.is_finite() {
            return self.state;
        }
        let Some(min) = self.min_scale() else {
            return self.state;
        };
        let new_scale =
            (self.state.scale - delta_y * self.config.wheel_sensitivity).clamp(min, self.max_scale());
        self.zoom_about(pointer, new_scale)
    }

    /// Zoom-in button, anchored at the container center.
    pub fn zoom_in(&mut self) -> ViewportState {
        let Some(center) = self.container_center() else {
            return self.state;
        };
        let new_scale = (self.state.scale * self.config.zoom_step).min(self.max_scale());
        self.zoom_about(center, new_scale)
    }

    /// Zoom-out button, anchored at the container center.
    pub fn zoom_out(&mut self) -> ViewportState {
        let (Some(center), Some(min)) = (self.container_center(), self.min_scale()) else {
            return self.state;
        };
        let new_scale = (self.state.scale / self.config.zoom_step).max(min);
        self.zoom_about(center, new_scale)
    }

    fn container_center(&self) -> Option<Point> {
        self.metrics()
            .map(|(_, container)| Point::new(container.width / 2.0, container.height / 2.0))
    }

    /// Rescale keeping the content point under `anchor` fixed, then clamp.
    fn zoom_about(&mut self, anchor: Point, new_scale: f64) -> ViewportState {
        let Some((content, container)) = self.metrics() else {
            return self.state;
        };
        let ViewportState { scale, offset } = self.state;
        let new_offset = offset + (anchor.to_vec2() - offset) * (1.0 - new_scale / scale);
        self.state = ViewportState {
            scale: new_scale,
            offset: clamp_offset(new_offset, new_scale, content, container),
        };
        debug!(
            "Zoom {:.4} -> {:.4} about ({:.1}, {:.1})",
            scale, new_scale, anchor.x, anchor.y
        );
        self.state
    }

    /// Pan button.
    pub fn pan(&mut self, direction: PanDirection) -> ViewportState {
        let Some((content, container)) = self.metrics() else {
            return self.state;
        };
        let offset = self.state.offset + direction.delta(self.config.pan_step);
        self.state.offset = clamp_offset(offset, self.state.scale, content, container);
        self.state
    }

    /// Enabled state of the pan/zoom buttons. All disabled while not ready.
    pub fn affordances(&self) -> ControlAffordances {
        let (Some((content, container)), Some(min)) = (self.metrics(), self.min_scale()) else {
            return ControlAffordances::default();
        };
        let ViewportState { scale, offset } = self.state;
        let floor = offset_floor(scale, content, container);
        ControlAffordances {
            can_zoom_in: scale < self.max_scale(),
            can_zoom_out: scale > min,
            can_pan_up: offset.y < 0.0,
            can_pan_down: offset.y > floor.y,
            can_pan_left: offset.x < 0.0,
            can_pan_right: offset.x > floor.x,
        }
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, input: ViewportInput) -> ViewportState {
        match input {
            ViewportInput::PointerDown(p) => {
                self.drag_start(p);
                self.state
            }
            ViewportInput::PointerMove(p) => self.drag_move(p),
            ViewportInput::PointerUp | ViewportInput::PointerLeave => {
                self.drag_end();
                self.state
            }
            ViewportInput::Wheel { pointer, delta_y } => self.wheel(pointer, delta_y),
            ViewportInput::ZoomIn => self.zoom_in(),
            ViewportInput::ZoomOut => self.zoom_out(),
            ViewportInput::Pan(direction) => self.pan(direction),
            ViewportInput::Resize(size) => {
                self.set_container(size);
                self.state
            }
        }
    }
}

/// Convenience for hosts that measure sizes as `(width, height)` pairs.
pub fn metrics(width: f64, height: f64) -> Size {
    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;
    use crate::viewport::clamp::covers;

    fn ready(content: (f64, f64), container: (f64, f64)) -> TransformController {
        let mut ctl = TransformController::default();
        ctl.set_container(metrics(container.0, container.1));
        ctl.set_content(Some(metrics(content.0, content.1)));
        ctl
    }

    fn assert_covers(ctl: &TransformController) {
        let state = ctl.state();
        let (content, container) = (ctl.content().unwrap(), ctl.container().unwrap());
        assert!(
            covers(state.offset, state.scale, content, container),
            "cover invariant broken: {state:?}"
        );
    }

    // ==================== Readiness ====================

    #[test]
    fn test_noop_before_content() {
        let mut ctl = TransformController::default();
        ctl.set_container(metrics(800.0, 600.0));
        let before = ctl.state();

        assert_eq!(ctl.zoom_in(), before);
        assert_eq!(ctl.wheel(Point::new(10.0, 10.0), -100.0), before);
        assert_eq!(ctl.pan(PanDirection::Left), before);
        ctl.drag_start(Point::new(1.0, 1.0));
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.affordances(), ControlAffordances::default());
    }

    #[test]
    fn test_unusable_metrics_ignored() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        ctl.set_container(metrics(0.0, 600.0));
        assert_eq!(ctl.container(), Some(metrics(800.0, 600.0)));

        ctl.set_content(Some(metrics(-1.0, 5.0)));
        assert!(!ctl.is_ready());
    }

    // ==================== Fit & reset ====================

    #[test]
    fn test_initial_fit() {
        let ctl = ready((1000.0, 500.0), (800.0, 600.0));
        let state = ctl.state();
        assert!(approx_eq(state.scale, 1.2));
        assert!(approx_eq(state.offset.x, -200.0));
        assert!(approx_eq(state.offset.y, 0.0));
    }

    #[test]
    fn test_resize_resets_zoom() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        ctl.zoom_in();
        ctl.pan(PanDirection::Right);
        ctl.handle(ViewportInput::Resize(metrics(400.0, 300.0)));
        let state = ctl.state();
        assert!(approx_eq(state.scale, 0.6));
        assert!(approx_eq(state.offset.x, -100.0));
        assert!(approx_eq(state.offset.y, 0.0));
    }

    #[test]
    fn test_same_size_does_not_reset() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        let zoomed = ctl.zoom_in();
        ctl.set_container(metrics(800.0, 600.0));
        ctl.set_content(Some(metrics(1000.0, 500.0)));
        assert_eq!(ctl.state(), zoomed);
    }

    // ==================== Drag ====================

    #[test]
    fn test_drag_moves_offset() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        ctl.zoom_in();
        let start = ctl.state().offset;

        ctl.handle(ViewportInput::PointerDown(Point::new(300.0, 300.0)));
        let state = ctl.handle(ViewportInput::PointerMove(Point::new(290.0, 295.0)));
        assert!(approx_eq(state.offset.x, start.x - 10.0));
        assert!(approx_eq(state.offset.y, start.y - 5.0));

        ctl.handle(ViewportInput::PointerLeave);
        assert!(!ctl.is_dragging());
        let after = ctl.handle(ViewportInput::PointerMove(Point::new(0.0, 0.0)));
        assert_eq!(after, state);
    }

    #[test]
    fn test_drag_is_clamped() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        ctl.drag_start(Point::new(100.0, 100.0));
        let state = ctl.drag_move(Point::new(5000.0, 5000.0));
        assert_eq!(state.offset, Vec2::ZERO);
        assert_covers(&ctl);
    }

    // ==================== Zoom ====================

    #[test]
    fn test_wheel_anchor_preserved() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        let pointer = Point::new(400.0, 300.0);
        let before = ctl.state().view_to_content(pointer);

        let state = ctl.wheel(pointer, -500.0);
        assert!(approx_eq(state.scale, 1.7));
        // No clamping in effect for this pointer: offset stays inside bounds.
        assert!(approx_eq(state.offset.x, -450.0));
        assert!(approx_eq(state.offset.y, -125.0));

        let after = state.view_to_content(pointer);
        assert!(approx_eq(before.x, after.x));
        assert!(approx_eq(before.y, after.y));
    }

    #[test]
    fn test_wheel_bounds() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        let p = Point::new(10.0, 20.0);
        assert!(approx_eq(ctl.wheel(p, -1e6).scale, 3.0));
        assert!(approx_eq(ctl.wheel(p, 1e6).scale, 1.2));
        assert_covers(&ctl);

        let before = ctl.state();
        assert_eq!(ctl.wheel(p, f64::NAN), before);
    }

    #[test]
    fn test_zoom_in_never_exceeds_max() {
        let mut ctl = ready((400.0, 300.0), (400.0, 300.0));
        assert!(approx_eq(ctl.state().scale, 1.0));
        for _ in 0..50 {
            let state = ctl.zoom_in();
            assert!(state.scale <= 3.0);
            assert_covers(&ctl);
        }
        assert!(approx_eq(ctl.state().scale, 3.0));
        assert!(!ctl.affordances().can_zoom_in);
    }

    #[test]
    fn test_zoom_out_never_below_fit() {
        let mut ctl = ready((1000.0, 500.0), (800.0, 600.0));
        for _ in 0..5 {
            ctl.zoom_in();
        }
        for _ in 0..50 {
            let state = ctl.zoom_out();
            assert!(state.scale >= 1.2 - 1e-9);
            assert_covers(&ctl);
        }
        assert!(!ctl.affordances().can_zoom_out);
    }

    #[test]
    fn test_button_zoom_keeps_center() {
        let mut ctl = ready((1000.0, 1000.0), (800.0, 600.0));
        // fit 0.8, offset (0, -100); zoom about (400, 300)
        let center = Point::new(400.0, 300.0);
        let before = ctl.state().view_to_content(center);
        let after = ctl.zoom_in().view_to_content(center);
        assert!(approx_eq(before.x, after.x));
        assert!(approx_eq(before.y, after.y));
    }

    #[test]
    fn test_tiny_content_max_raised_to_fit() {
        // Covering needs scale 10, above the configured 3.
        let mut ctl = ready((80.0, 60.0), (800.0, 600.0));
        assert!(approx_eq(ctl.state().scale, 10.0));
        assert!(approx_eq(ctl.zoom_in().scale, 10.0));
        assert!(approx_eq(ctl.zoom_out().scale, 10.0));
        assert!(approx_eq(ctl.wheel(Point::ZERO, -100.0).scale, 10.0));
        let aff = ctl.affordances();
        assert!(!aff.can_zoom_in);
        assert!(!aff.can_zoom_out);
        assert_covers(&ctl);
    }

    // ==================== Pan ====================

    #[test]
    fn test_pan_directions() {
        let mut ctl = ready((1000.0, 1000.0), (800.0, 600.0));
        // scale 0.8: offset (0, -100), floor (0, -200)
        let up = ctl.pan(PanDirection::Up);
        assert!(approx_eq(up.offset.y, -80.0));
        let down = ctl.pan(PanDirection::Down);
        assert!(approx_eq(down.offset.y, -100.0));
        // x is pinned at both bounds.
        assert!(approx_eq(ctl.pan(PanDirection::Left).offset.x, 0.0));
        assert!(approx_eq(ctl.pan(PanDirection::Right).offset.x, 0.0));
    }

    #[test]
    fn test_affordances_follow_offset() {
        let mut ctl = ready((1000.0, 1000.0), (800.0, 600.0));
        let aff = ctl.affordances();
        assert!(aff.can_pan_up);
        assert!(aff.can_pan_down);
        assert!(!aff.can_pan_left);
        assert!(!aff.can_pan_right);
        assert!(aff.can_zoom_in);
        assert!(!aff.can_zoom_out);

        for _ in 0..10 {
            ctl.pan(PanDirection::Up);
        }
        let aff = ctl.affordances();
        assert!(!aff.can_pan_up);
        assert!(aff.can_pan_down);
    }
}
