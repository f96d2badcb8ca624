use serde::{Deserialize, Serialize};

use crate::core::types::GeoPoint;
use crate::error::{ChartError, ChartResult};

/// Iso-depth polyline drawn by the render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthContour {
    depth_m: f64,
    vertices: Vec<GeoPoint>,
}

impl DepthContour {
    pub fn new(depth_m: f64, vertices: Vec<GeoPoint>) -> ChartResult<Self> {
        if !depth_m.is_finite() || depth_m < 0.0 {
            return Err(ChartError::InvalidData(
                "contour depth must be finite and >= 0 meters".to_owned(),
            ));
        }
        if vertices.len() < 2 {
            return Err(ChartError::InvalidData(format!(
                "depth contour needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        for vertex in &vertices {
            vertex.validate()?;
        }
        Ok(Self { depth_m, vertices })
    }

    #[must_use]
    pub const fn depth_m(&self) -> f64 {
        self.depth_m
    }

    #[must_use]
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }
}

/// Spot depth measurement labeled on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sounding {
    position: GeoPoint,
    depth_m: f64,
}

impl Sounding {
    pub fn new(position: GeoPoint, depth_m: f64) -> ChartResult<Self> {
        position.validate()?;
        if !depth_m.is_finite() || depth_m < 0.0 {
            return Err(ChartError::InvalidData(
                "sounding depth must be finite and >= 0 meters".to_owned(),
            ));
        }
        Ok(Self { position, depth_m })
    }

    #[must_use]
    pub const fn position(self) -> GeoPoint {
        self.position
    }

    #[must_use]
    pub const fn depth_m(self) -> f64 {
        self.depth_m
    }

    /// Label text as drawn: one decimal below 30 m, whole meters above.
    #[must_use]
    pub fn label(self) -> String {
        if self.depth_m < 30.0 {
            format!("{:.1}", self.depth_m)
        } else {
            format!("{:.0}", self.depth_m)
        }
    }
}

/// Drawable content of one chart, finalized before the first render call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartFeatures {
    pub contours: Vec<DepthContour>,
    pub soundings: Vec<Sounding>,
}

impl ChartFeatures {
    #[must_use]
    pub fn new(contours: Vec<DepthContour>, soundings: Vec<Sounding>) -> Self {
        Self {
            contours,
            soundings,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() && self.soundings.is_empty()
    }
}
