use serde::{Deserialize, Serialize};

use crate::core::types::{GeoExtent, GeoPoint, normalize_longitude_deg};
use crate::error::{ChartError, ChartResult};

/// One closed polygon bounding a region of valid chart data.
///
/// Vertices are parsed once at chart load and read-only afterward. The
/// closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageArea {
    vertices: Vec<GeoPoint>,
}

impl CoverageArea {
    pub fn new(vertices: Vec<GeoPoint>) -> ChartResult<Self> {
        if vertices.len() < 3 {
            return Err(ChartError::InvalidData(format!(
                "coverage polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        for vertex in &vertices {
            vertex.validate()?;
        }
        Ok(Self { vertices })
    }

    #[must_use]
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Even-odd ray cast against the implicit closed boundary.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        let lon = normalize_longitude_deg(point.lon);
        let mut inside = false;
        let mut previous = self.vertices[self.vertices.len() - 1];
        for &vertex in &self.vertices {
            let (lat_a, lon_a) = (previous.lat, normalize_longitude_deg(previous.lon));
            let (lat_b, lon_b) = (vertex.lat, normalize_longitude_deg(vertex.lon));
            if (lat_a > point.lat) != (lat_b > point.lat) {
                let crossing = (lon_b - lon_a) * (point.lat - lat_a) / (lat_b - lat_a) + lon_a;
                if lon < crossing {
                    inside = !inside;
                }
            }
            previous = vertex;
        }
        inside
    }

    #[must_use]
    pub fn extent(&self) -> Option<GeoExtent> {
        let mut north = f64::NEG_INFINITY;
        let mut south = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        let mut west = f64::INFINITY;
        for vertex in &self.vertices {
            north = north.max(vertex.lat);
            south = south.min(vertex.lat);
            east = east.max(normalize_longitude_deg(vertex.lon));
            west = west.min(normalize_longitude_deg(vertex.lon));
        }
        GeoExtent::new(north, south, east, west).ok()
    }
}

/// All coverage polygons owned by one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSet {
    areas: Vec<CoverageArea>,
}

impl CoverageSet {
    #[must_use]
    pub fn new(areas: Vec<CoverageArea>) -> Self {
        Self { areas }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.areas.len()
    }

    /// Vertices of polygon `index`. An out-of-range index yields an empty
    /// slice, never an error; callers are expected to bounds-check but the
    /// contract stays defensive.
    #[must_use]
    pub fn points_of(&self, index: usize) -> &[GeoPoint] {
        match self.areas.get(index) {
            Some(area) => area.vertices(),
            None => &[],
        }
    }

    #[must_use]
    pub fn areas(&self) -> &[CoverageArea] {
        &self.areas
    }

    /// True when any polygon covers the point. An empty set covers nothing.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.areas.iter().any(|area| area.contains(point))
    }

    /// Union bounds of every polygon.
    #[must_use]
    pub fn extent(&self) -> Option<GeoExtent> {
        let mut combined: Option<GeoExtent> = None;
        for area in &self.areas {
            let extent = area.extent()?;
            combined = Some(match combined {
                None => extent,
                Some(acc) => GeoExtent::new(
                    acc.north().max(extent.north()),
                    acc.south().min(extent.south()),
                    acc.east().max(extent.east()),
                    acc.west().min(extent.west()),
                )
                .ok()?,
            });
        }
        combined
    }
}
