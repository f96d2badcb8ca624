use serde::{Deserialize, Serialize};

use crate::core::types::{
    GeoExtent, GeoPoint, PixelPoint, ViewportState, normalize_longitude_deg,
};
use crate::error::{ChartError, ChartResult};

/// WGS84 equatorial radius in meters, shared by every projection instance.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Projection factors derived once from chart metadata, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    reference: GeoPoint,
    pixels_per_degree_lon: f64,
    pixels_per_mercator_unit: f64,
}

impl ProjectionParams {
    pub fn new(
        reference: GeoPoint,
        pixels_per_degree_lon: f64,
        pixels_per_mercator_unit: f64,
    ) -> ChartResult<Self> {
        reference.validate()?;
        if !reference.in_mercator_domain() {
            return Err(ChartError::OutOfDomain {
                lat: reference.lat,
                lon: reference.lon,
            });
        }
        for (name, value) in [
            ("pixels_per_degree_lon", pixels_per_degree_lon),
            ("pixels_per_mercator_unit", pixels_per_mercator_unit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "projection factor `{name}` must be finite and > 0"
                )));
            }
        }

        Ok(Self {
            reference: GeoPoint::new(reference.lat, normalize_longitude_deg(reference.lon)),
            pixels_per_degree_lon,
            pixels_per_mercator_unit,
        })
    }

    /// Derives factors from a ground scale in pixels per meter.
    pub fn from_scale_ppm(reference: GeoPoint, scale_ppm: f64) -> ChartResult<Self> {
        if !scale_ppm.is_finite() || scale_ppm <= 0.0 {
            return Err(ChartError::InvalidData(
                "projection scale must be finite and > 0 pixels per meter".to_owned(),
            ));
        }
        Self::new(
            reference,
            scale_ppm * EARTH_RADIUS_M * std::f64::consts::PI / 180.0,
            scale_ppm * EARTH_RADIUS_M,
        )
    }

    #[must_use]
    pub const fn reference(self) -> GeoPoint {
        self.reference
    }
}

/// Spherical Mercator transform between geographic and chart-local pixels.
///
/// `to_pixel` and `to_geo` are mutual inverses within 1e-6 degrees for all
/// latitudes inside the usable Mercator band. Coordinates at or beyond the
/// band fail with [`ChartError::OutOfDomain`]; nothing here emits NaN or
/// infinity. Longitude deltas wrap across the antimeridian, so a chart
/// referenced near 180 degrees projects both sides of the seam to nearby
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    params: ProjectionParams,
}

impl MercatorProjection {
    #[must_use]
    pub const fn new(params: ProjectionParams) -> Self {
        Self { params }
    }

    /// Projection centered on a viewport, scaled to its pixels-per-meter.
    pub fn for_viewport(viewport: ViewportState) -> ChartResult<Self> {
        let params = ProjectionParams::from_scale_ppm(viewport.center(), viewport.scale_ppm())?;
        Ok(Self { params })
    }

    /// Projection whose pixel unit is one meter, used to measure ground
    /// distances of an extent before a scale is chosen.
    pub fn meters_probe(reference: GeoPoint) -> ChartResult<Self> {
        let params = ProjectionParams::from_scale_ppm(reference, 1.0)?;
        Ok(Self { params })
    }

    #[must_use]
    pub const fn params(self) -> ProjectionParams {
        self.params
    }

    fn mercator_units(lat_deg: f64) -> f64 {
        // ln(tan(lat) + sec(lat)), the inverse Gudermannian.
        (lat_deg.to_radians().tan()).asinh()
    }

    fn latitude_deg(mercator_units: f64) -> f64 {
        mercator_units.sinh().atan().to_degrees()
    }

    /// Maps a geographic position to chart-local pixels, X east, Y down.
    pub fn to_pixel(self, point: GeoPoint) -> ChartResult<PixelPoint> {
        if !point.in_mercator_domain() {
            return Err(ChartError::OutOfDomain {
                lat: point.lat,
                lon: point.lon,
            });
        }

        let reference = self.params.reference;
        let delta_lon = normalize_longitude_deg(point.lon - reference.lon);
        let x = delta_lon * self.params.pixels_per_degree_lon;
        let y = (Self::mercator_units(reference.lat) - Self::mercator_units(point.lat))
            * self.params.pixels_per_mercator_unit;
        Ok(PixelPoint::new(x, y))
    }

    /// Maps chart-local pixels back to a geographic position.
    pub fn to_geo(self, pixel: PixelPoint) -> ChartResult<GeoPoint> {
        if !pixel.x.is_finite() || !pixel.y.is_finite() {
            return Err(ChartError::InvalidData(
                "pixel coordinates must be finite".to_owned(),
            ));
        }

        let reference = self.params.reference;
        let lon =
            normalize_longitude_deg(reference.lon + pixel.x / self.params.pixels_per_degree_lon);
        let units =
            Self::mercator_units(reference.lat) - pixel.y / self.params.pixels_per_mercator_unit;
        let lat = Self::latitude_deg(units);
        Ok(GeoPoint::new(lat, lon))
    }
}

/// Maps geographic positions into one viewport's screen space, rotation
/// about the viewport center included.
///
/// Skew is carried on the viewport for cache comparison only; the draw pass
/// renders north-up charts with viewport rotation alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    projection: MercatorProjection,
    rotation_rad: f64,
    half_width: f64,
    half_height: f64,
}

impl ViewTransform {
    pub fn new(viewport: ViewportState) -> ChartResult<Self> {
        Ok(Self {
            projection: MercatorProjection::for_viewport(viewport)?,
            rotation_rad: viewport.rotation_deg().to_radians(),
            half_width: f64::from(viewport.pixel_width()) / 2.0,
            half_height: f64::from(viewport.pixel_height()) / 2.0,
        })
    }

    /// Geographic position to screen pixels, origin at the top-left corner.
    pub fn to_screen(&self, point: GeoPoint) -> ChartResult<PixelPoint> {
        let local = self.projection.to_pixel(point)?;
        let (sin, cos) = (-self.rotation_rad).sin_cos();
        let x = local.x * cos - local.y * sin;
        let y = local.x * sin + local.y * cos;
        Ok(PixelPoint::new(self.half_width + x, self.half_height + y))
    }

    /// Screen pixels back to a geographic position.
    pub fn to_geo(&self, screen: PixelPoint) -> ChartResult<GeoPoint> {
        if !screen.x.is_finite() || !screen.y.is_finite() {
            return Err(ChartError::InvalidData(
                "screen coordinates must be finite".to_owned(),
            ));
        }
        let dx = screen.x - self.half_width;
        let dy = screen.y - self.half_height;
        let (sin, cos) = self.rotation_rad.sin_cos();
        let local = PixelPoint::new(dx * cos - dy * sin, dx * sin + dy * cos);
        self.projection.to_geo(local)
    }

    /// Geographic bounds covered by the viewport's pixel rectangle.
    pub fn rendered_extent(&self) -> ChartResult<GeoExtent> {
        let corners = [
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(self.half_width * 2.0, 0.0),
            PixelPoint::new(0.0, self.half_height * 2.0),
            PixelPoint::new(self.half_width * 2.0, self.half_height * 2.0),
        ];

        let center_lon = self.projection.params().reference().lon;
        let mut north = f64::NEG_INFINITY;
        let mut south = f64::INFINITY;
        let mut min_delta = f64::INFINITY;
        let mut max_delta = f64::NEG_INFINITY;
        for corner in corners {
            let geo = self.to_geo(corner)?;
            north = north.max(geo.lat);
            south = south.min(geo.lat);
            let delta = normalize_longitude_deg(geo.lon - center_lon);
            min_delta = min_delta.min(delta);
            max_delta = max_delta.max(delta);
        }

        GeoExtent::new(
            north,
            south,
            center_lon + max_delta,
            center_lon + min_delta,
        )
    }
}
