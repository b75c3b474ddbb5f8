//! Map surface state: annotations, viewport, camera and route overlay.

mod region;
mod surface;

pub use region::Region;
pub use surface::{Camera, MapSurface, OverlayLevel, RouteOverlay, StrokeStyle};
