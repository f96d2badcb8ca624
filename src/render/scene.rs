use serde::{Deserialize, Serialize};

use crate::core::{
    ChartFeatures, CoverageSet, GeoPoint, PixelPoint, ViewTransform, ViewportState,
};
use crate::error::{ChartError, ChartResult};
use crate::render::palette::{Palette, token};
use crate::render::rasterizer::{fill_mask, label_height_px, label_width_px};
use crate::render::{
    Color, GlyphLabelPrimitive, LinePrimitive, PolygonPrimitive, RenderFrame, ValidityMask,
};

/// Styling knobs for one draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneStyle {
    /// Contours at or below this depth use the shallow color.
    pub shallow_depth_m: f64,
    /// Contours between shallow and this depth use the safe color.
    pub safety_depth_m: f64,
    pub contour_width_px: f64,
    pub coverage_outline_width_px: f64,
    pub glyph_scale: u32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            shallow_depth_m: 5.0,
            safety_depth_m: 10.0,
            contour_width_px: 1.0,
            coverage_outline_width_px: 2.0,
            glyph_scale: 1,
        }
    }
}

impl SceneStyle {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.shallow_depth_m.is_finite()
            || !self.safety_depth_m.is_finite()
            || self.shallow_depth_m < 0.0
            || self.safety_depth_m < self.shallow_depth_m
        {
            return Err(ChartError::InvalidData(
                "scene depths must be finite with 0 <= shallow <= safety".to_owned(),
            ));
        }
        if !self.contour_width_px.is_finite()
            || self.contour_width_px <= 0.0
            || !self.coverage_outline_width_px.is_finite()
            || self.coverage_outline_width_px <= 0.0
        {
            return Err(ChartError::InvalidData(
                "scene stroke widths must be finite and > 0".to_owned(),
            ));
        }
        if self.glyph_scale == 0 {
            return Err(ChartError::InvalidData(
                "scene glyph scale must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }

    fn contour_token(self, depth_m: f64) -> &'static str {
        if depth_m <= self.shallow_depth_m {
            token::CONTOUR_SHALLOW
        } else if depth_m <= self.safety_depth_m {
            token::CONTOUR_SAFE
        } else {
            token::CONTOUR_DEEP
        }
    }
}

#[cfg(feature = "parallel-projection")]
fn project_ring(transform: &ViewTransform, points: &[GeoPoint]) -> ChartResult<Vec<PixelPoint>> {
    use rayon::prelude::*;
    points
        .par_iter()
        .map(|&point| transform.to_screen(point))
        .collect()
}

#[cfg(not(feature = "parallel-projection"))]
fn project_ring(transform: &ViewTransform, points: &[GeoPoint]) -> ChartResult<Vec<PixelPoint>> {
    points
        .iter()
        .map(|&point| transform.to_screen(point))
        .collect()
}

fn push_polyline(frame: &mut RenderFrame, projected: &[PixelPoint], width: f64, color: Color) {
    for pair in projected.windows(2) {
        frame.lines.push(LinePrimitive::new(
            pair[0].x,
            pair[0].y,
            pair[1].x,
            pair[1].y,
            width,
            color,
        ));
    }
}

/// Builds the draw list for one viewport: coverage water fills and
/// outlines, depth contours styled against the safety depth, and sounding
/// labels centered on their position.
pub fn build_frame(
    viewport: ViewportState,
    coverage: &CoverageSet,
    features: &ChartFeatures,
    palette: &Palette,
    style: SceneStyle,
) -> ChartResult<RenderFrame> {
    let style = style.validate()?;
    let transform = ViewTransform::new(viewport)?;
    let mut frame = RenderFrame::new(viewport);

    for area in coverage.areas() {
        let projected = project_ring(&transform, area.vertices())?;
        frame.polygons.push(PolygonPrimitive {
            points: projected,
            fill: Some(palette.color(token::WATER)),
            outline: Some(palette.color(token::COVERAGE_OUTLINE)),
            outline_width: style.coverage_outline_width_px,
        });
    }

    for contour in &features.contours {
        let projected = project_ring(&transform, contour.vertices())?;
        let color = palette.color(style.contour_token(contour.depth_m()));
        push_polyline(&mut frame, &projected, style.contour_width_px, color);
    }

    let label_color = palette.color(token::SOUNDING_LABEL);
    for sounding in &features.soundings {
        let anchor = transform.to_screen(sounding.position())?;
        let text = sounding.label();
        let x = anchor.x - label_width_px(&text, style.glyph_scale) / 2.0;
        let y = anchor.y - label_height_px(style.glyph_scale) / 2.0;
        frame.labels.push(GlyphLabelPrimitive::new(
            text,
            x,
            y,
            style.glyph_scale,
            label_color,
        ));
    }

    Ok(frame)
}

/// Marks pixels covered by any coverage polygon as valid.
///
/// A chart that declares no coverage polygons is valid everywhere.
pub fn build_validity_mask(
    viewport: ViewportState,
    coverage: &CoverageSet,
) -> ChartResult<ValidityMask> {
    let mut mask = ValidityMask::new(
        viewport.pixel_width(),
        viewport.pixel_height(),
        coverage.count() == 0,
    );
    if coverage.count() == 0 {
        return Ok(mask);
    }

    let transform = ViewTransform::new(viewport)?;
    for area in coverage.areas() {
        let projected = project_ring(&transform, area.vertices())?;
        fill_mask(&mut mask, &projected);
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::{SceneStyle, build_frame, build_validity_mask};
    use crate::core::{
        ChartFeatures, CoverageArea, CoverageSet, DepthContour, GeoPoint, Sounding, ViewportState,
    };
    use crate::render::palette::{ColorScheme, Palette};

    fn viewport() -> ViewportState {
        ViewportState::new(GeoPoint::new(47.5, -122.5), 0.001, 0.0, 64, 64)
            .expect("valid viewport")
    }

    fn coverage() -> CoverageSet {
        CoverageSet::new(vec![
            CoverageArea::new(vec![
                GeoPoint::new(47.0, -123.0),
                GeoPoint::new(47.0, -122.0),
                GeoPoint::new(48.0, -122.0),
                GeoPoint::new(48.0, -123.0),
            ])
            .expect("valid polygon"),
        ])
    }

    #[test]
    fn frame_contains_coverage_contours_and_labels() {
        let features = ChartFeatures::new(
            vec![
                DepthContour::new(
                    8.0,
                    vec![GeoPoint::new(47.4, -122.6), GeoPoint::new(47.6, -122.4)],
                )
                .expect("valid contour"),
            ],
            vec![Sounding::new(GeoPoint::new(47.5, -122.5), 12.5).expect("valid sounding")],
        );
        let palette = Palette::for_scheme(ColorScheme::Day);

        let frame = build_frame(
            viewport(),
            &coverage(),
            &features,
            &palette,
            SceneStyle::default(),
        )
        .expect("frame");

        assert_eq!(frame.polygons.len(), 1);
        assert_eq!(frame.lines.len(), 1);
        assert_eq!(frame.labels.len(), 1);
        frame.validate().expect("valid frame");
    }

    #[test]
    fn mask_without_coverage_is_fully_valid() {
        let mask =
            build_validity_mask(viewport(), &CoverageSet::default()).expect("mask");
        assert_eq!(mask.valid_count(), 64 * 64);
    }

    #[test]
    fn mask_with_coverage_is_partial() {
        // Zoomed far enough out that the chart covers only part of the canvas.
        let wide = ViewportState::new(GeoPoint::new(47.5, -122.5), 0.0001, 0.0, 64, 64)
            .expect("valid viewport");
        let mask = build_validity_mask(wide, &coverage()).expect("mask");
        let valid = mask.valid_count();
        assert!(valid > 0);
        assert!(valid < 64 * 64);
    }

    #[test]
    fn degenerate_style_is_rejected() {
        let style = SceneStyle {
            safety_depth_m: 1.0,
            shallow_depth_m: 5.0,
            ..SceneStyle::default()
        };
        let palette = Palette::for_scheme(ColorScheme::Day);
        let result = build_frame(
            viewport(),
            &CoverageSet::default(),
            &ChartFeatures::default(),
            &palette,
            style,
        );
        assert!(result.is_err());
    }
}
