//! Bounds clamping that keeps the content covering the container.

use kurbo::Vec2;

use super::state::{ContainerMetrics, ContentMetrics};

/// Lowest allowed offset at `scale`: the content's right/bottom edge sits on
/// the container's right/bottom edge.
pub fn offset_floor(scale: f64, content: ContentMetrics, container: ContainerMetrics) -> Vec2 {
    Vec2::new(
        container.width - content.width * scale,
        container.height - content.height * scale,
    )
}

/// Clamp `offset` into `[floor, 0]` on both axes.
///
/// For any `scale >= fit_scale(content, container)` the result leaves no gap
/// between the content and the container edges. Below the fit scale the floor
/// becomes positive and the range inverts, so callers must never pass such a
/// scale.
pub fn clamp_offset(
    offset: Vec2,
    scale: f64,
    content: ContentMetrics,
    container: ContainerMetrics,
) -> Vec2 {
    let floor = offset_floor(scale, content, container);
    Vec2::new(offset.x.max(floor.x).min(0.0), offset.y.max(floor.y).min(0.0))
}

/// Check whether `offset` keeps the whole container inside the content.
pub fn covers(
    offset: Vec2,
    scale: f64,
    content: ContentMetrics,
    container: ContainerMetrics,
) -> bool {
    use crate::config::float_cmp::in_range;

    let floor = offset_floor(scale, content, container);
    in_range(offset.x, floor.x, 0.0) && in_range(offset.y, floor.y, 0.0)
}
