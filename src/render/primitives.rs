use crate::core::PixelPoint;
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Channel values quantized to RGB888 for the output buffer.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.red), quantize(self.green), quantize(self.blue)]
    }

    /// Uniformly dims the color toward black, alpha untouched.
    #[must_use]
    pub fn dimmed(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self::rgba(
            self.red * factor,
            self.green * factor,
            self.blue * factor,
            self.alpha,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one closed polygon in pixel space.
///
/// At least one of fill and outline must be present.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub points: Vec<PixelPoint>,
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub outline_width: f64,
}

impl PolygonPrimitive {
    #[must_use]
    pub fn filled(points: Vec<PixelPoint>, fill: Color) -> Self {
        Self {
            points,
            fill: Some(fill),
            outline: None,
            outline_width: 1.0,
        }
    }

    #[must_use]
    pub fn outlined(points: Vec<PixelPoint>, outline: Color, outline_width: f64) -> Self {
        Self {
            points,
            fill: None,
            outline: Some(outline),
            outline_width,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 3 {
            return Err(ChartError::InvalidData(format!(
                "polygon needs at least 3 points, got {}",
                self.points.len()
            )));
        }
        for point in &self.points {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(ChartError::InvalidData(
                    "polygon coordinates must be finite".to_owned(),
                ));
            }
        }
        if self.fill.is_none() && self.outline.is_none() {
            return Err(ChartError::InvalidData(
                "polygon must have a fill or an outline".to_owned(),
            ));
        }
        if !self.outline_width.is_finite() || self.outline_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "polygon outline width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(outline) = self.outline {
            outline.validate()?;
        }
        Ok(())
    }
}

/// Draw command for one numeric label rendered from the built-in glyph set.
///
/// Only digits and a decimal point exist as glyphs; anything else fails
/// validation before rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphLabelPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub glyph_scale: u32,
    pub color: Color,
}

impl GlyphLabelPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, glyph_scale: u32, color: Color) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            glyph_scale,
            color,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "glyph label must not be empty".to_owned(),
            ));
        }
        if let Some(bad) = self.text.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
            return Err(ChartError::InvalidData(format!(
                "glyph label may only contain digits and `.`, got `{bad}`"
            )));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "glyph label coordinates must be finite".to_owned(),
            ));
        }
        if self.glyph_scale == 0 {
            return Err(ChartError::InvalidData(
                "glyph scale must be >= 1".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, GlyphLabelPrimitive, PolygonPrimitive};
    use crate::core::PixelPoint;

    #[test]
    fn color_quantizes_to_rgb8() {
        assert_eq!(Color::rgb(0.0, 0.5, 1.0).to_rgb8(), [0, 128, 255]);
    }

    #[test]
    fn polygon_without_paint_is_invalid() {
        let polygon = PolygonPrimitive {
            points: vec![
                PixelPoint::new(0.0, 0.0),
                PixelPoint::new(10.0, 0.0),
                PixelPoint::new(10.0, 10.0),
            ],
            fill: None,
            outline: None,
            outline_width: 1.0,
        };
        assert!(polygon.validate().is_err());
    }

    #[test]
    fn glyph_label_rejects_non_numeric_text() {
        let label = GlyphLabelPrimitive::new("12m", 0.0, 0.0, 1, Color::rgb(0.0, 0.0, 0.0));
        assert!(label.validate().is_err());

        let ok = GlyphLabelPrimitive::new("12.5", 0.0, 0.0, 1, Color::rgb(0.0, 0.0, 0.0));
        assert!(ok.validate().is_ok());
    }
}
