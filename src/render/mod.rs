mod bitmap;
mod cache;
mod frame;
pub mod palette;
mod primitives;
pub mod rasterizer;
pub mod scene;

pub use bitmap::{BYTES_PER_PIXEL, MAX_BUFFER_BYTES, PixelBuffer, ValidityMask};
pub use cache::{
    CacheDecision, CacheState, CacheStats, ContainmentPolicy, InvalidationReason, RenderCache,
    RenderCacheEntry,
};
pub use frame::RenderFrame;
pub use palette::{ColorScheme, Palette};
pub use primitives::{Color, GlyphLabelPrimitive, LinePrimitive, PolygonPrimitive};
pub use rasterizer::{NullRasterizer, SoftwareRasterizer};
pub use scene::{SceneStyle, build_frame, build_validity_mask};

use crate::error::ChartResult;

/// Contract implemented by any rasterizing backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from chart domain logic and cache policy.
pub trait Rasterizer {
    fn rasterize(&mut self, frame: &RenderFrame, target: &mut PixelBuffer) -> ChartResult<()>;
}
