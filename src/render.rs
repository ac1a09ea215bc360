//! CPU raster rendering of skeleton frames.

/// Frame compositor (circles, connections, wrist connectors).
pub mod compositor;
/// Rendered raster frame type.
pub mod frame;
/// Colors and stroke sizes.
pub mod style;

pub use compositor::{compose_frame, draw_connections, draw_points};
pub use frame::RenderedFrame;
pub use style::SkeletonStyle;
