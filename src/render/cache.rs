use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GeoExtent, ViewportState};
use crate::error::{ChartError, ChartResult};
use crate::render::{PixelBuffer, ValidityMask};

/// Why a cached raster stopped being reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidationReason {
    Empty,
    ScaleChanged,
    RotationChanged,
    SkewChanged,
    PixelSizeChanged,
    CenterLeftExtent,
    SchemeChanged,
}

/// Cache lifecycle: `Stale` holds no usable raster, `Valid` holds the most
/// recently rendered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheState {
    Stale,
    Valid,
}

/// Verdict for one incoming viewport against the cached raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    Reuse,
    Render(InvalidationReason),
}

/// Margin applied to the rendered extent before the cache-hit center test.
///
/// The reference behavior leaves "contains" semantics open; this models it
/// as a ratio in [0, 0.5) of the extent span trimmed from every side. Zero
/// is strict containment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainmentPolicy {
    margin_ratio: f64,
}

impl Default for ContainmentPolicy {
    fn default() -> Self {
        Self { margin_ratio: 0.0 }
    }
}

impl ContainmentPolicy {
    pub fn new(margin_ratio: f64) -> ChartResult<Self> {
        if !margin_ratio.is_finite() || !(0.0..0.5).contains(&margin_ratio) {
            return Err(ChartError::InvalidData(
                "containment margin ratio must be finite and in [0, 0.5)".to_owned(),
            ));
        }
        Ok(Self { margin_ratio })
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self { margin_ratio: 0.0 }
    }

    #[must_use]
    pub const fn margin_ratio(self) -> f64 {
        self.margin_ratio
    }
}

/// Counters for cache behavior, exposed to hosts and asserted by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub renders: u64,
    pub cache_hits: u64,
    pub allocations: u64,
    pub invalidations: u64,
}

/// One rendered raster and the request it answered.
///
/// Replaced wholesale on every successful render; no field is ever mutated
/// in place, so a reader can never observe a half-written entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCacheEntry {
    bitmap: PixelBuffer,
    mask: ValidityMask,
    viewport: ViewportState,
    rendered_extent: GeoExtent,
}

impl RenderCacheEntry {
    #[must_use]
    pub fn new(
        bitmap: PixelBuffer,
        mask: ValidityMask,
        viewport: ViewportState,
        rendered_extent: GeoExtent,
    ) -> Self {
        Self {
            bitmap,
            mask,
            viewport,
            rendered_extent,
        }
    }

    #[must_use]
    pub fn bitmap(&self) -> &PixelBuffer {
        &self.bitmap
    }

    #[must_use]
    pub fn mask(&self) -> &ValidityMask {
        &self.mask
    }

    #[must_use]
    pub const fn viewport(&self) -> ViewportState {
        self.viewport
    }

    #[must_use]
    pub const fn rendered_extent(&self) -> GeoExtent {
        self.rendered_extent
    }
}

/// Most-recent-render cache for one chart instance.
///
/// Exclusively owned by its chart; never shared across instances. The host
/// guarantees single-threaded access, so no locking exists here.
#[derive(Debug)]
pub struct RenderCache {
    entry: Option<RenderCacheEntry>,
    containment: ContainmentPolicy,
    stats: CacheStats,
}

impl RenderCache {
    #[must_use]
    pub fn new(containment: ContainmentPolicy) -> Self {
        Self {
            entry: None,
            containment,
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> CacheState {
        if self.entry.is_some() {
            CacheState::Valid
        } else {
            CacheState::Stale
        }
    }

    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    #[must_use]
    pub fn entry(&self) -> Option<&RenderCacheEntry> {
        self.entry.as_ref()
    }

    /// Decides whether the cached raster answers `viewport` unchanged.
    ///
    /// A hit requires identical raster geometry (scale, rotation, skew,
    /// pixel size) and the new center inside the previously rendered extent
    /// shrunk by the containment margin.
    #[must_use]
    pub fn classify(&self, viewport: ViewportState) -> CacheDecision {
        const EPS: f64 = 1e-9;

        let Some(entry) = &self.entry else {
            return CacheDecision::Render(InvalidationReason::Empty);
        };
        let cached = entry.viewport;

        if (viewport.scale_ppm() - cached.scale_ppm()).abs() > EPS {
            return CacheDecision::Render(InvalidationReason::ScaleChanged);
        }
        if (viewport.rotation_deg() - cached.rotation_deg()).abs() > EPS {
            return CacheDecision::Render(InvalidationReason::RotationChanged);
        }
        if (viewport.skew_deg() - cached.skew_deg()).abs() > EPS {
            return CacheDecision::Render(InvalidationReason::SkewChanged);
        }
        if viewport.pixel_width() != cached.pixel_width()
            || viewport.pixel_height() != cached.pixel_height()
        {
            return CacheDecision::Render(InvalidationReason::PixelSizeChanged);
        }

        let usable = entry
            .rendered_extent
            .shrunk_by_ratio(self.containment.margin_ratio());
        if !usable.contains(viewport.center()) {
            return CacheDecision::Render(InvalidationReason::CenterLeftExtent);
        }

        CacheDecision::Reuse
    }

    /// Stores a freshly rendered entry, replacing any previous one whole.
    pub fn store(&mut self, entry: RenderCacheEntry) {
        debug!(
            width = entry.bitmap().width(),
            height = entry.bitmap().height(),
            "render cache transition to valid"
        );
        self.entry = Some(entry);
        self.stats.renders += 1;
    }

    /// Drops the cached raster. Safe to call while already stale.
    pub fn invalidate(&mut self, reason: InvalidationReason) {
        if self.entry.take().is_some() {
            debug!(?reason, "render cache transition to stale");
            self.stats.invalidations += 1;
        }
    }

    pub fn record_hit(&mut self) {
        self.stats.cache_hits += 1;
    }

    pub fn record_allocation(&mut self) {
        self.stats.allocations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CacheDecision, CacheState, ContainmentPolicy, InvalidationReason, RenderCache,
        RenderCacheEntry,
    };
    use crate::core::{GeoExtent, GeoPoint, ViewportState};
    use crate::render::{PixelBuffer, ValidityMask};

    fn viewport(center: GeoPoint, scale_ppm: f64, rotation_deg: f64) -> ViewportState {
        ViewportState::new(center, scale_ppm, rotation_deg, 16, 16).expect("valid viewport")
    }

    fn entry_for(viewport: ViewportState) -> RenderCacheEntry {
        let bitmap = PixelBuffer::allocate(16, 16).expect("buffer");
        let mask = ValidityMask::new(16, 16, true);
        let extent = GeoExtent::new(48.0, 47.0, -122.0, -123.0).expect("extent");
        RenderCacheEntry::new(bitmap, mask, viewport, extent)
    }

    #[test]
    fn empty_cache_classifies_as_render() {
        let cache = RenderCache::new(ContainmentPolicy::strict());
        assert_eq!(cache.state(), CacheState::Stale);
        let decision = cache.classify(viewport(GeoPoint::new(47.5, -122.5), 100.0, 0.0));
        assert_eq!(decision, CacheDecision::Render(InvalidationReason::Empty));
    }

    #[test]
    fn identical_geometry_with_contained_center_reuses() {
        let mut cache = RenderCache::new(ContainmentPolicy::strict());
        let first = viewport(GeoPoint::new(47.5, -122.5), 100.0, 0.0);
        cache.store(entry_for(first));

        let nearby = viewport(GeoPoint::new(47.6, -122.4), 100.0, 0.0);
        assert_eq!(cache.classify(nearby), CacheDecision::Reuse);
    }

    #[test]
    fn rotation_change_forces_render() {
        let mut cache = RenderCache::new(ContainmentPolicy::strict());
        let first = viewport(GeoPoint::new(47.5, -122.5), 100.0, 0.0);
        cache.store(entry_for(first));

        let rotated = viewport(GeoPoint::new(47.5, -122.5), 100.0, 30.0);
        assert_eq!(
            cache.classify(rotated),
            CacheDecision::Render(InvalidationReason::RotationChanged)
        );
    }

    #[test]
    fn center_outside_extent_forces_render() {
        let mut cache = RenderCache::new(ContainmentPolicy::strict());
        let first = viewport(GeoPoint::new(47.5, -122.5), 100.0, 0.0);
        cache.store(entry_for(first));

        let far_away = viewport(GeoPoint::new(45.0, -122.5), 100.0, 0.0);
        assert_eq!(
            cache.classify(far_away),
            CacheDecision::Render(InvalidationReason::CenterLeftExtent)
        );
    }

    #[test]
    fn containment_margin_tightens_the_hit_region() {
        let mut cache =
            RenderCache::new(ContainmentPolicy::new(0.4).expect("valid policy"));
        let first = viewport(GeoPoint::new(47.5, -122.5), 100.0, 0.0);
        cache.store(entry_for(first));

        // Inside the raw extent but outside the shrunk core.
        let near_edge = viewport(GeoPoint::new(47.05, -122.5), 100.0, 0.0);
        assert_eq!(
            cache.classify(near_edge),
            CacheDecision::Render(InvalidationReason::CenterLeftExtent)
        );
    }

    #[test]
    fn invalidate_while_stale_is_a_no_op() {
        let mut cache = RenderCache::new(ContainmentPolicy::strict());
        cache.invalidate(InvalidationReason::SchemeChanged);
        assert_eq!(cache.stats().invalidations, 0);
    }
}
