use crate::core::PixelPoint;
use crate::error::ChartResult;
use crate::render::{
    GlyphLabelPrimitive, LinePrimitive, PixelBuffer, PolygonPrimitive, Rasterizer, RenderFrame,
    ValidityMask,
};

const GLYPH_WIDTH: i64 = 5;
const GLYPH_HEIGHT: i64 = 7;
const GLYPH_ADVANCE: i64 = 6;

/// 5x7 bitmap rows, low 5 bits used, for '0'..'9' then '.'.
const GLYPHS: [[u8; 7]; 11] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
];

fn glyph_rows(c: char) -> [u8; 7] {
    match c {
        '0'..='9' => GLYPHS[c as usize - '0' as usize],
        _ => GLYPHS[10],
    }
}

/// Calls `span` once per scanline run inside the closed polygon.
///
/// Even-odd scanline rule sampled at pixel-row centers; horizontal edges
/// fall out naturally because they never cross a row center. Spans are
/// clamped to the raster so deeply zoomed geometry costs only visible
/// pixels.
fn for_each_polygon_span(
    points: &[PixelPoint],
    width: u32,
    height: u32,
    mut span: impl FnMut(i64, i64, i64),
) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in points {
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }
    let first_row = (min_y.floor().max(0.0)) as i64;
    let last_row = (max_y.ceil().min(f64::from(height))) as i64;

    let mut crossings: Vec<f64> = Vec::new();
    for row in first_row..last_row {
        let sample_y = row as f64 + 0.5;
        crossings.clear();
        let mut previous = points[points.len() - 1];
        for &point in points {
            let (y_a, y_b) = (previous.y, point.y);
            if (y_a > sample_y) != (y_b > sample_y) {
                let t = (sample_y - y_a) / (y_b - y_a);
                crossings.push(previous.x + t * (point.x - previous.x));
            }
            previous = point;
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let x_start = pair[0].max(0.0).round() as i64;
            let x_end = pair[1].min(f64::from(width) - 1.0).round() as i64;
            if x_start <= x_end {
                span(row, x_start, x_end);
            }
        }
    }
}

/// Liang-Barsky clip of a segment against the raster padded by `pad`.
fn clip_segment(
    (mut x1, mut y1): (f64, f64),
    (mut x2, mut y2): (f64, f64),
    width: u32,
    height: u32,
    pad: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let (x_min, y_min) = (-pad, -pad);
    let (x_max, y_max) = (f64::from(width) + pad, f64::from(height) + pad);
    let (dx, dy) = (x2 - x1, y2 - y1);
    let mut t_enter = 0.0f64;
    let mut t_exit = 1.0f64;

    for (p, q) in [
        (-dx, x1 - x_min),
        (dx, x_max - x1),
        (-dy, y1 - y_min),
        (dy, y_max - y1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }

    let (sx, sy) = (x1 + t_enter * dx, y1 + t_enter * dy);
    (x2, y2) = (x1 + t_exit * dx, y1 + t_exit * dy);
    (x1, y1) = (sx, sy);
    Some(((x1, y1), (x2, y2)))
}

fn stamp(target: &mut PixelBuffer, x: i64, y: i64, half_width: i64, rgb: [u8; 3]) {
    for dy in -half_width..=half_width {
        for dx in -half_width..=half_width {
            target.put_pixel(x + dx, y + dy, rgb);
        }
    }
}

fn draw_line(target: &mut PixelBuffer, line: LinePrimitive) {
    let rgb = line.color.to_rgb8();
    let half_width = ((line.stroke_width / 2.0).floor()).max(0.0) as i64;
    let pad = line.stroke_width + 1.0;
    let Some(((x1, y1), (x2, y2))) = clip_segment(
        (line.x1, line.y1),
        (line.x2, line.y2),
        target.width(),
        target.height(),
        pad,
    ) else {
        return;
    };

    let dx = x2 - x1;
    let dy = y2 - y1;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
    let (step_x, step_y) = (dx / steps, dy / steps);

    let mut x = x1;
    let mut y = y1;
    for _ in 0..=(steps as u64) {
        stamp(target, x.round() as i64, y.round() as i64, half_width, rgb);
        x += step_x;
        y += step_y;
    }
}

fn draw_polygon(target: &mut PixelBuffer, polygon: &PolygonPrimitive) {
    if let Some(fill) = polygon.fill {
        let rgb = fill.to_rgb8();
        let (width, height) = (target.width(), target.height());
        for_each_polygon_span(&polygon.points, width, height, |row, x_start, x_end| {
            for x in x_start..=x_end {
                target.put_pixel(x, row, rgb);
            }
        });
    }
    if let Some(outline) = polygon.outline {
        let mut previous = polygon.points[polygon.points.len() - 1];
        for &point in &polygon.points {
            draw_line(
                target,
                LinePrimitive::new(
                    previous.x,
                    previous.y,
                    point.x,
                    point.y,
                    polygon.outline_width,
                    outline,
                ),
            );
            previous = point;
        }
    }
}

fn draw_label(target: &mut PixelBuffer, label: &GlyphLabelPrimitive) {
    let rgb = label.color.to_rgb8();
    let scale = i64::from(label.glyph_scale);
    let mut pen_x = label.x.round() as i64;
    let pen_y = label.y.round() as i64;
    for c in label.text.chars() {
        let rows = glyph_rows(c);
        for (row_index, row_bits) in rows.iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if row_bits & (1 << (GLYPH_WIDTH - 1 - column)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        target.put_pixel(
                            pen_x + column * scale + sx,
                            pen_y + row_index as i64 * scale + sy,
                            rgb,
                        );
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE * scale;
    }
}

/// Pixel width of a glyph label as drawn, used to center soundings.
#[must_use]
pub fn label_width_px(text: &str, glyph_scale: u32) -> f64 {
    let glyphs = text.chars().count() as i64;
    if glyphs == 0 {
        return 0.0;
    }
    ((glyphs - 1) * GLYPH_ADVANCE + GLYPH_WIDTH) as f64 * f64::from(glyph_scale)
}

#[must_use]
pub fn label_height_px(glyph_scale: u32) -> f64 {
    (GLYPH_HEIGHT * i64::from(glyph_scale)) as f64
}

/// Marks polygon-interior pixels as valid in the mask.
pub(crate) fn fill_mask(mask: &mut ValidityMask, points: &[PixelPoint]) {
    let (width, height) = (mask.width(), mask.height());
    for_each_polygon_span(points, width, height, |row, x_start, x_end| {
        for x in x_start..=x_end {
            mask.set(x, row, true);
        }
    });
}

/// Pure-software backend drawing validated frames into an RGB buffer.
///
/// Stands in for a hardware backend in headless hosts and tests; draw order
/// is polygons, then lines, then labels.
#[derive(Debug, Default)]
pub struct SoftwareRasterizer {
    pub last_polygon_count: usize,
    pub last_line_count: usize,
    pub last_label_count: usize,
}

impl SoftwareRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&mut self, frame: &RenderFrame, target: &mut PixelBuffer) -> ChartResult<()> {
        frame.validate()?;

        for polygon in &frame.polygons {
            draw_polygon(target, polygon);
        }
        for &line in &frame.lines {
            draw_line(target, line);
        }
        for label in &frame.labels {
            draw_label(target, label);
        }

        self.last_polygon_count = frame.polygons.len();
        self.last_line_count = frame.lines.len();
        self.last_label_count = frame.labels.len();
        Ok(())
    }
}

/// No-op backend used by tests; it still validates frame content so invalid
/// geometry is caught before a real backend is involved.
#[derive(Debug, Default)]
pub struct NullRasterizer {
    pub last_polygon_count: usize,
    pub last_line_count: usize,
    pub last_label_count: usize,
}

impl Rasterizer for NullRasterizer {
    fn rasterize(&mut self, frame: &RenderFrame, _target: &mut PixelBuffer) -> ChartResult<()> {
        frame.validate()?;
        self.last_polygon_count = frame.polygons.len();
        self.last_line_count = frame.lines.len();
        self.last_label_count = frame.labels.len();
        Ok(())
    }
}
