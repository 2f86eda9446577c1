//! Pan/zoom viewport over a lot map.

mod clamp;
mod controller;
mod state;

pub use clamp::{clamp_offset, covers, offset_floor};
pub use controller::{metrics, ControlAffordances, PanDirection, TransformController, ViewportInput};
pub use state::{fit_scale, initial_offset, ContainerMetrics, ContentMetrics, ViewportState};
