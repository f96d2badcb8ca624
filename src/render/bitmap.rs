use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Hard ceiling on one render target, standing in for platform limits.
pub const MAX_BUFFER_BYTES: u64 = 1 << 28;

/// Output pixel format is packed RGB, 3 bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Owned RGB888 raster sized exactly to one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer, refusing sizes beyond [`MAX_BUFFER_BYTES`].
    ///
    /// Refusal leaves nothing allocated, so a failed render attempt cannot
    /// disturb an existing cache entry.
    pub fn allocate(width: u32, height: u32) -> ChartResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        let requested_bytes = u64::from(width) * u64::from(height) * BYTES_PER_PIXEL as u64;
        if requested_bytes > MAX_BUFFER_BYTES {
            return Err(ChartError::RenderAllocationFailed {
                width,
                height,
                requested_bytes,
                limit_bytes: MAX_BUFFER_BYTES,
            });
        }

        Ok(Self {
            width,
            height,
            data: vec![0; requested_bytes as usize],
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn fill(&mut self, color: Color) {
        let rgb = color.to_rgb8();
        for pixel in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgb);
        }
    }

    /// Writes one pixel; coordinates outside the raster are ignored so
    /// clipped geometry needs no pre-trimming.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgb);
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }
}

/// Per-pixel flag telling the host which pixels carry real chart data.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityMask {
    width: u32,
    height: u32,
    valid: Vec<bool>,
}

impl ValidityMask {
    #[must_use]
    pub fn new(width: u32, height: u32, initially_valid: bool) -> Self {
        Self {
            width,
            height,
            valid: vec![initially_valid; width as usize * height as usize],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn set(&mut self, x: i64, y: i64, is_valid: bool) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        self.valid[y as usize * self.width as usize + x as usize] = is_valid;
    }

    /// Out-of-range coordinates are never valid.
    #[must_use]
    pub fn is_valid(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.valid[y as usize * self.width as usize + x as usize]
    }

    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
}
