//! The erasable mask raster.
//!
//! A [`MaskSurface`] is a plain RGBA buffer. It is painted opaque on
//! initialization, lettered with a few decorative words, and then switched
//! into erase mode so that drawing punches fully transparent holes. The
//! surface knows nothing about game state.

use serde::{Deserialize, Serialize};

use crate::decor::{self, Decoration, GLYPH_SCALE};
use crate::glyph::{self, GLYPH_HEIGHT};
use crate::{ScratchError, ScratchResult};

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Opaque base fill of a fresh mask.
pub const BASE_COLOR: [u8; 4] = [0x4a, 0x7c, 0x59, 0xff];

/// Lettering color for decorations.
pub const INK_COLOR: [u8; 4] = [0x1a, 0x1a, 0x1a, 0xff];

/// What drawing a disc does to the pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Write the paint color.
    Paint,
    /// Zero every channel, leaving the pixel fully transparent.
    Erase,
}

/// Borrowed view of a surface's pixels, ready to hand to a display.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA bytes, row-major.
    pub pixels: &'a [u8],
}

/// Read-only view of the alpha channel of an RGBA buffer.
///
/// Indexing is per pixel; no copy of the buffer is made.
#[derive(Debug, Clone, Copy)]
pub struct AlphaChannel<'a> {
    rgba: &'a [u8],
}

impl<'a> AlphaChannel<'a> {
    /// Wrap a row-major RGBA buffer. Trailing bytes that do not form a
    /// whole pixel are ignored.
    #[must_use]
    pub fn from_rgba(rgba: &'a [u8]) -> Self {
        Self { rgba }
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rgba.len() / BYTES_PER_PIXEL
    }

    /// Whether the buffer holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alpha of the pixel at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.len() {
            return None;
        }
        self.rgba.get(index * BYTES_PER_PIXEL + 3).copied()
    }

    /// Alpha of every `stride`-th pixel, starting with the first.
    ///
    /// A stride of zero is treated as one.
    pub fn strided(&self, stride: usize) -> impl Iterator<Item = u8> + 'a {
        let rgba: &'a [u8] = self.rgba;
        rgba.get(3..)
            .unwrap_or_default()
            .iter()
            .step_by(stride.max(1) * BYTES_PER_PIXEL)
            .copied()
    }
}

/// An addressable RGBA mask with a destructive circular brush.
#[derive(Debug, Clone)]
pub struct MaskSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    mode: DrawMode,
    paint_color: [u8; 4],
}

impl MaskSurface {
    /// A zero-area surface, as before the container has been laid out.
    /// Every drawing operation on it is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            mode: DrawMode::Paint,
            paint_color: BASE_COLOR,
        }
    }

    /// Create and initialize a surface.
    #[must_use]
    pub fn new(width: u32, height: u32, decoration_seed: u64) -> Self {
        let mut surface = Self::empty();
        surface.initialize(width, height, decoration_seed);
        surface
    }

    /// Reallocate the buffer, paint it opaque, letter the decorations, and
    /// switch into erase mode.
    ///
    /// Any previous content is discarded.
    pub fn initialize(&mut self, width: u32, height: u32, decoration_seed: u64) {
        let len = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        self.width = width;
        self.height = height;
        self.pixels = vec![0; len];
        self.mode = DrawMode::Paint;

        if self.has_area() {
            self.fill(BASE_COLOR);
            for decoration in decor::layout(width, height, decoration_seed) {
                self.stamp(&decoration, INK_COLOR);
            }
        }

        self.mode = DrawMode::Erase;
        tracing::debug!(
            "Mask initialized: {}x{} seed={decoration_seed}",
            width,
            height
        );
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the surface has any pixels at all.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Current drawing mode.
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Switch the drawing mode used by [`MaskSurface::draw_disc`].
    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    /// Set the color written in [`DrawMode::Paint`].
    pub fn set_paint_color(&mut self, color: [u8; 4]) {
        self.paint_color = color;
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of a single pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        let px = self.pixels.get(start..start + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Read-only alpha view reflecting every erase applied so far.
    #[must_use]
    pub fn alpha_channel(&self) -> AlphaChannel<'_> {
        AlphaChannel::from_rgba(&self.pixels)
    }

    /// Borrow the buffer for display.
    ///
    /// # Errors
    ///
    /// Returns [`ScratchError::Render`] if the surface has no area yet.
    pub fn frame(&self) -> ScratchResult<Frame<'_>> {
        if !self.has_area() {
            return Err(ScratchError::Render(
                "mask surface has not been laid out".to_string(),
            ));
        }
        Ok(Frame {
            width: self.width,
            height: self.height,
            pixels: &self.pixels,
        })
    }

    /// Make every pixel whose center lies within `radius` of (`x`, `y`)
    /// fully transparent. Parts of the disc outside the surface are ignored.
    ///
    /// Returns whether any pixel was inside the clipped disc.
    pub fn erase(&mut self, x: f32, y: f32, radius: f32) -> bool {
        self.apply_disc(x, y, radius, DrawMode::Erase)
    }

    /// Draw a disc using the current [`DrawMode`]. Returns whether any pixel
    /// was written.
    pub fn draw_disc(&mut self, x: f32, y: f32, radius: f32) -> bool {
        self.apply_disc(x, y, radius, self.mode)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_PIXEL
    }

    fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&color);
        }
    }

    /// Fill one disc as horizontal spans, clipped to the surface.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn apply_disc(&mut self, x: f32, y: f32, radius: f32, mode: DrawMode) -> bool {
        if !self.has_area() || !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            return false;
        }
        if radius <= 0.0 {
            return false;
        }

        let (cx, cy, r) = (f64::from(x), f64::from(y), f64::from(radius));
        let max_x = i64::from(self.width) - 1;
        let max_y = i64::from(self.height) - 1;

        // Rows whose pixel centers can fall inside the disc
        let row_start = ((cy - r - 0.5).ceil() as i64).max(0);
        let row_end = ((cy + r - 0.5).floor() as i64).min(max_y);

        let mut touched = false;
        for row in row_start..=row_end {
            let dy = row as f64 + 0.5 - cy;
            let half = (r * r - dy * dy).max(0.0).sqrt();
            let col_start = ((cx - half - 0.5).ceil() as i64).max(0);
            let col_end = ((cx + half - 0.5).floor() as i64).min(max_x);
            if col_start > col_end {
                continue;
            }
            self.write_span(row, col_start, col_end, mode);
            touched = true;
        }
        touched
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn write_span(&mut self, row: i64, col_start: i64, col_end: i64, mode: DrawMode) {
        let start = self.offset(col_start as u32, row as u32);
        let end = self.offset(col_end as u32, row as u32) + BYTES_PER_PIXEL;
        let span = &mut self.pixels[start..end];
        match mode {
            DrawMode::Erase => span.fill(0),
            DrawMode::Paint => {
                for px in span.chunks_exact_mut(BYTES_PER_PIXEL) {
                    px.copy_from_slice(&self.paint_color);
                }
            }
        }
    }

    /// Letter a rotated word by inverse-mapping every pixel in its bounding
    /// circle back into font space.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn stamp(&mut self, decoration: &Decoration, color: [u8; 4]) {
        let scale = GLYPH_SCALE as f32;
        let half_w = glyph::text_width(decoration.text) as f32 * scale / 2.0;
        let half_h = GLYPH_HEIGHT as f32 * scale / 2.0;
        let reach = half_w.hypot(half_h).ceil();
        let (sin, cos) = decoration.angle.sin_cos();

        let x0 = ((decoration.center_x - reach).floor().max(0.0)) as u32;
        let y0 = ((decoration.center_y - reach).floor().max(0.0)) as u32;
        let x1 = ((decoration.center_x + reach).ceil() as u32).min(self.width);
        let y1 = ((decoration.center_y + reach).ceil() as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - decoration.center_x;
                let dy = py as f32 + 0.5 - decoration.center_y;
                let u = dx * cos + dy * sin + half_w;
                let v = -dx * sin + dy * cos + half_h;
                if u < 0.0 || v < 0.0 {
                    continue;
                }
                let (col, row) = ((u / scale) as u32, (v / scale) as u32);
                if glyph::is_inked(decoration.text, col, row) {
                    let start = self.offset(px, py);
                    self.pixels[start..start + BYTES_PER_PIXEL].copy_from_slice(&color);
                }
            }
        }
    }
}

impl Default for MaskSurface {
    fn default() -> Self {
        Self::empty()
    }
}
