use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Latitude bound of the usable spherical Mercator domain, in degrees.
///
/// Coordinates at or beyond this latitude are rejected with
/// [`ChartError::OutOfDomain`] instead of being clamped.
pub const MERCATOR_LATITUDE_LIMIT_DEG: f64 = 89.9;

/// Normalizes a longitude in degrees into `[-180, 180)`.
#[must_use]
pub fn normalize_longitude_deg(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == 180.0 { -180.0 } else { wrapped }
}

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.lat.is_finite() || !self.lon.is_finite() || self.lat.abs() > 90.0 {
            return Err(ChartError::InvalidData(format!(
                "geographic point must be finite with |lat| <= 90, got ({}, {})",
                self.lat, self.lon
            )));
        }
        Ok(())
    }

    /// True when the point lies inside the usable Mercator latitude band.
    #[must_use]
    pub fn in_mercator_domain(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() < MERCATOR_LATITUDE_LIMIT_DEG
    }
}

/// Position in pixel space. Y grows downward, matching image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geographic bounds of a chart or a rendered region.
///
/// `east < west` describes an extent crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl GeoExtent {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> ChartResult<Self> {
        for (name, value) in [
            ("north", north),
            ("south", south),
            ("east", east),
            ("west", west),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "extent bound `{name}` must be finite"
                )));
            }
        }
        if north < south {
            return Err(ChartError::InvalidData(format!(
                "extent north ({north}) must be >= south ({south})"
            )));
        }
        if north.abs() > 90.0 || south.abs() > 90.0 {
            return Err(ChartError::InvalidData(
                "extent latitudes must lie within [-90, 90]".to_owned(),
            ));
        }

        Ok(Self {
            north,
            south,
            east: normalize_longitude_deg(east),
            west: normalize_longitude_deg(west),
        })
    }

    #[must_use]
    pub const fn north(self) -> f64 {
        self.north
    }

    #[must_use]
    pub const fn south(self) -> f64 {
        self.south
    }

    #[must_use]
    pub const fn east(self) -> f64 {
        self.east
    }

    #[must_use]
    pub const fn west(self) -> f64 {
        self.west
    }

    #[must_use]
    pub fn lat_span(self) -> f64 {
        self.north - self.south
    }

    /// Longitudinal span in degrees, wrap-aware.
    #[must_use]
    pub fn lon_span(self) -> f64 {
        let span = self.east - self.west;
        if span < 0.0 { span + 360.0 } else { span }
    }

    #[must_use]
    pub fn center(self) -> GeoPoint {
        let lat = (self.north + self.south) / 2.0;
        let lon = normalize_longitude_deg(self.west + self.lon_span() / 2.0);
        GeoPoint::new(lat, lon)
    }

    #[must_use]
    pub fn contains(self, point: GeoPoint) -> bool {
        if point.lat < self.south || point.lat > self.north {
            return false;
        }
        let lon = normalize_longitude_deg(point.lon);
        if self.west <= self.east {
            lon >= self.west && lon <= self.east
        } else {
            // Seam-crossing extent.
            lon >= self.west || lon <= self.east
        }
    }

    /// Returns the extent shrunk by `margin_ratio` of its span on every side.
    ///
    /// Degenerate results collapse to the center point rather than inverting.
    #[must_use]
    pub fn shrunk_by_ratio(self, margin_ratio: f64) -> Self {
        let ratio = margin_ratio.clamp(0.0, 0.5);
        let lat_margin = self.lat_span() * ratio;
        let lon_margin = self.lon_span() * ratio;
        Self {
            north: self.north - lat_margin,
            south: self.south + lat_margin,
            east: normalize_longitude_deg(self.east - lon_margin),
            west: normalize_longitude_deg(self.west + lon_margin),
        }
    }
}

/// Immutable snapshot of a requested view: where to look and at what size.
///
/// A new viewport is always a new value; nothing mutates one in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    center: GeoPoint,
    scale_ppm: f64,
    rotation_deg: f64,
    skew_deg: f64,
    pixel_width: u32,
    pixel_height: u32,
}

impl ViewportState {
    pub fn new(
        center: GeoPoint,
        scale_ppm: f64,
        rotation_deg: f64,
        pixel_width: u32,
        pixel_height: u32,
    ) -> ChartResult<Self> {
        Self::new_with_skew(center, scale_ppm, rotation_deg, 0.0, pixel_width, pixel_height)
    }

    pub fn new_with_skew(
        center: GeoPoint,
        scale_ppm: f64,
        rotation_deg: f64,
        skew_deg: f64,
        pixel_width: u32,
        pixel_height: u32,
    ) -> ChartResult<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(ChartError::InvalidViewport {
                width: pixel_width,
                height: pixel_height,
            });
        }
        if !scale_ppm.is_finite() || scale_ppm <= 0.0 {
            return Err(ChartError::InvalidData(
                "viewport scale must be finite and > 0 pixels per meter".to_owned(),
            ));
        }
        if !rotation_deg.is_finite() || !skew_deg.is_finite() {
            return Err(ChartError::InvalidData(
                "viewport rotation and skew must be finite".to_owned(),
            ));
        }
        center.validate()?;
        if !center.in_mercator_domain() {
            return Err(ChartError::OutOfDomain {
                lat: center.lat,
                lon: center.lon,
            });
        }

        Ok(Self {
            center: GeoPoint::new(center.lat, normalize_longitude_deg(center.lon)),
            scale_ppm,
            rotation_deg,
            skew_deg,
            pixel_width,
            pixel_height,
        })
    }

    #[must_use]
    pub const fn center(self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub const fn scale_ppm(self) -> f64 {
        self.scale_ppm
    }

    #[must_use]
    pub const fn rotation_deg(self) -> f64 {
        self.rotation_deg
    }

    #[must_use]
    pub const fn skew_deg(self) -> f64 {
        self.skew_deg
    }

    #[must_use]
    pub const fn pixel_width(self) -> u32 {
        self.pixel_width
    }

    #[must_use]
    pub const fn pixel_height(self) -> u32 {
        self.pixel_height
    }

    #[must_use]
    pub fn meters_per_pixel(self) -> f64 {
        1.0 / self.scale_ppm
    }

    /// True when two viewports can reuse the same raster: identical scale,
    /// rotation, skew and pixel dimensions. Center is compared separately
    /// against the rendered extent.
    #[must_use]
    pub fn same_raster_geometry(self, other: Self) -> bool {
        const EPS: f64 = 1e-9;
        (self.scale_ppm - other.scale_ppm).abs() <= EPS
            && (self.rotation_deg - other.rotation_deg).abs() <= EPS
            && (self.skew_deg - other.skew_deg).abs() <= EPS
            && self.pixel_width == other.pixel_width
            && self.pixel_height == other.pixel_height
    }
}
