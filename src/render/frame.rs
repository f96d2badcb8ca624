use crate::core::ViewportState;
use crate::error::ChartResult;
use crate::render::{GlyphLabelPrimitive, LinePrimitive, PolygonPrimitive};

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: ViewportState,
    pub polygons: Vec<PolygonPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub labels: Vec<GlyphLabelPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: ViewportState) -> Self {
        Self {
            viewport,
            polygons: Vec::new(),
            lines: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_polygon(mut self, polygon: PolygonPrimitive) -> Self {
        self.polygons.push(polygon);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: GlyphLabelPrimitive) -> Self {
        self.labels.push(label);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for polygon in &self.polygons {
            polygon.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for label in &self.labels {
            label.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.lines.is_empty() && self.labels.is_empty()
    }
}
