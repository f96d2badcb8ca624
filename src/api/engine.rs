use indexmap::IndexMap;
use tracing::debug;

use crate::core::{
    Capability, ChartFeatures, ChartKind, CoverageSet, GeoExtent, GeoPoint, MercatorProjection,
    PixelPoint, ScalePolicy, ViewTransform, ViewportState,
};
use crate::error::{ChartError, ChartResult};
use crate::render::palette::token;
use crate::render::{
    CacheDecision, CacheState, CacheStats, ColorScheme, InvalidationReason, Palette, PixelBuffer,
    Rasterizer, RenderCache, RenderCacheEntry, SceneStyle, ValidityMask, scene,
};

use super::ChartEngineConfig;

/// Borrowed view of one answered render request.
#[derive(Debug)]
pub struct RenderView<'a> {
    pub bitmap: &'a PixelBuffer,
    pub mask: &'a ValidityMask,
    /// Viewport the raster was computed for; on a cache hit this is the
    /// earlier request the raster still answers.
    pub viewport: ViewportState,
    /// True when the cached raster answered the request unchanged.
    pub reused_cache: bool,
    /// Why a fresh render ran; `None` on a cache hit.
    pub rendered_because: Option<InvalidationReason>,
}

/// Main orchestration facade for one chart instance.
///
/// Owns the projection, coverage, features, scale policy, palette selection
/// and the render cache. Synchronous request/response: the host calls
/// `render` on its own drawing thread and blocks for the result; nothing
/// here is shared across chart instances.
pub struct ChartEngine<R: Rasterizer> {
    rasterizer: R,
    kind: ChartKind,
    extent: GeoExtent,
    projection: MercatorProjection,
    coverage: CoverageSet,
    features: ChartFeatures,
    scale_policy: ScalePolicy,
    scene_style: SceneStyle,
    palette: Palette,
    metadata: IndexMap<String, String>,
    cache: RenderCache,
}

impl<R: Rasterizer> ChartEngine<R> {
    pub fn new(rasterizer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        let scale_policy = ScalePolicy::new_tuned(
            config.native_scale,
            &config.preferred_scales,
            config.scale_tuning,
        )?;
        let scene_style = config.scene_style.validate()?;

        Ok(Self {
            rasterizer,
            kind: config.kind,
            extent: config.extent,
            projection: MercatorProjection::new(config.projection),
            coverage: config.coverage,
            features: config.features,
            scale_policy,
            scene_style,
            palette: Palette::for_scheme(config.color_scheme),
            metadata: config.metadata,
            cache: RenderCache::new(config.containment),
        })
    }

    /// Answers a viewport request from the cache when possible, otherwise
    /// runs a full draw pass and stores the result.
    ///
    /// A failed pass (allocation refusal, invalid geometry) leaves the prior
    /// cache entry untouched; at most one successful render per attempt.
    pub fn render(&mut self, viewport: ViewportState) -> ChartResult<RenderView<'_>> {
        let decision = self.cache.classify(viewport);
        match decision {
            CacheDecision::Reuse => {
                self.cache.record_hit();
            }
            CacheDecision::Render(reason) => {
                debug!(?reason, "running chart draw pass");
                self.render_pass(viewport)?;
            }
        }

        let Some(entry) = self.cache.entry() else {
            return Err(ChartError::InvalidData(
                "render cache empty after successful pass".to_owned(),
            ));
        };
        let rendered_because = match decision {
            CacheDecision::Reuse => None,
            CacheDecision::Render(reason) => Some(reason),
        };
        Ok(RenderView {
            bitmap: entry.bitmap(),
            mask: entry.mask(),
            viewport: entry.viewport(),
            reused_cache: rendered_because.is_none(),
            rendered_because,
        })
    }

    fn render_pass(&mut self, viewport: ViewportState) -> ChartResult<()> {
        let mut bitmap =
            PixelBuffer::allocate(viewport.pixel_width(), viewport.pixel_height())?;
        self.cache.record_allocation();

        bitmap.fill(self.palette.color(token::BACKGROUND));
        let frame = scene::build_frame(
            viewport,
            &self.coverage,
            &self.features,
            &self.palette,
            self.scene_style,
        )?;
        self.rasterizer.rasterize(&frame, &mut bitmap)?;

        let mask = scene::build_validity_mask(viewport, &self.coverage)?;
        let rendered_extent = ViewTransform::new(viewport)?.rendered_extent()?;
        self.cache
            .store(RenderCacheEntry::new(bitmap, mask, viewport, rendered_extent));
        Ok(())
    }

    /// Switches the palette. `immediate` drops the cached raster even when
    /// the next viewport would otherwise hit; the palette never participates
    /// in cache-key comparison on its own.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme, immediate: bool) {
        if self.palette.scheme() == scheme {
            return;
        }
        debug!(scheme = scheme.name(), immediate, "color scheme change");
        self.palette = Palette::for_scheme(scheme);
        if immediate {
            self.cache.invalidate(InvalidationReason::SchemeChanged);
        }
    }

    #[must_use]
    pub fn color_scheme(&self) -> ColorScheme {
        self.palette.scheme()
    }

    /// Independently computed preview raster at caller-specified dimensions,
    /// chart extent centered and scaled to fit. Never touches the render
    /// cache or its counters.
    pub fn thumbnail(&mut self, width: u32, height: u32) -> ChartResult<PixelBuffer> {
        self.kind.require(Capability::Thumbnails)?;

        let center = self.extent.center();
        let meters = MercatorProjection::meters_probe(center)?;
        let north_west = meters.to_pixel(GeoPoint::new(self.extent.north(), self.extent.west()))?;
        let south_east = meters.to_pixel(GeoPoint::new(self.extent.south(), self.extent.east()))?;
        let width_m = (south_east.x - north_west.x).abs();
        let height_m = (south_east.y - north_west.y).abs();
        if width_m <= 0.0 || height_m <= 0.0 {
            return Err(ChartError::InvalidData(
                "chart extent has no area to thumbnail".to_owned(),
            ));
        }

        let scale_ppm = (f64::from(width) / width_m).min(f64::from(height) / height_m);
        let viewport = ViewportState::new(center, scale_ppm, 0.0, width, height)?;

        let mut bitmap = PixelBuffer::allocate(width, height)?;
        bitmap.fill(self.palette.color(token::BACKGROUND));
        let frame = scene::build_frame(
            viewport,
            &self.coverage,
            &self.features,
            &self.palette,
            self.scene_style,
        )?;
        self.rasterizer.rasterize(&frame, &mut bitmap)?;
        Ok(bitmap)
    }

    /// Deepest usable zoom scale; `allow_overzoom` requires the chart kind
    /// to declare the overzoom capability.
    pub fn min_scale(&self, canvas_scale_factor: f64, allow_overzoom: bool) -> ChartResult<f64> {
        if allow_overzoom {
            self.kind.require(Capability::Overzoom)?;
        }
        Ok(self.scale_policy.min_scale(canvas_scale_factor, allow_overzoom))
    }

    #[must_use]
    pub fn max_scale(&self, canvas_scale_factor: f64, canvas_width_px: u32) -> f64 {
        self.scale_policy.max_scale(canvas_scale_factor, canvas_width_px)
    }

    #[must_use]
    pub fn nearest_preferred_scale(&self, target: f64) -> f64 {
        self.scale_policy.nearest_preferred_scale(target)
    }

    /// Chart-native georeferencing: geographic position to chart pixels.
    pub fn geo_to_chart_pixel(&self, point: GeoPoint) -> ChartResult<PixelPoint> {
        self.projection.to_pixel(point)
    }

    /// Chart-native georeferencing: chart pixels to geographic position.
    pub fn chart_pixel_to_geo(&self, pixel: PixelPoint) -> ChartResult<GeoPoint> {
        self.projection.to_geo(pixel)
    }

    #[must_use]
    pub const fn chart_kind(&self) -> ChartKind {
        self.kind
    }

    #[must_use]
    pub const fn extent(&self) -> GeoExtent {
        self.extent
    }

    #[must_use]
    pub fn coverage(&self) -> &CoverageSet {
        &self.coverage
    }

    #[must_use]
    pub fn features(&self) -> &ChartFeatures {
        &self.features
    }

    #[must_use]
    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn metadata(&self) -> &IndexMap<String, String> {
        &self.metadata
    }

    #[must_use]
    pub fn into_rasterizer(self) -> R {
        self.rasterizer
    }
}
