//! CPU-side RGBA surfaces.
//!
//! Tiles draw into their own particle-sized surface; the compositor copies
//! tile surfaces onto a viewport-sized one. All copies are clipped against
//! both images, so out-of-range rectangles and negative destinations are
//! safe.

use image::{Rgba, RgbaImage};
use parallax_common::{PixelRect, PixelSize};

/// Bytes per RGBA8 pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Creates a transparent surface.
    #[must_use]
    pub fn new(size: PixelSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    /// Wraps an already decoded image.
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Surface size in pixels.
    #[must_use]
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.image.width(), self.image.height())
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        self.fill(TRANSPARENT);
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Reads one pixel, `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Copies `src_rect` of `src` so its top-left lands at `(dest_x, dest_y)`.
    ///
    /// Returns the number of pixels written after clipping.
    pub fn blit(&mut self, src: &RgbaImage, src_rect: PixelRect, dest_x: i64, dest_y: i64) -> u64 {
        let (src_w, src_h) = (i64::from(src.width()), i64::from(src.height()));
        let (dst_w, dst_h) = (i64::from(self.image.width()), i64::from(self.image.height()));

        let mut sx = i64::from(src_rect.x);
        let mut sy = i64::from(src_rect.y);
        let mut w = i64::from(src_rect.width).min(src_w - sx);
        let mut h = i64::from(src_rect.height).min(src_h - sy);
        let (mut dx, mut dy) = (dest_x, dest_y);

        if dx < 0 {
            sx -= dx;
            w += dx;
            dx = 0;
        }
        if dy < 0 {
            sy -= dy;
            h += dy;
            dy = 0;
        }
        w = w.min(dst_w - dx);
        h = h.min(dst_h - dy);
        if w <= 0 || h <= 0 {
            return 0;
        }

        let row_bytes = w as usize * BYTES_PER_PIXEL;
        let src_stride = src_w as usize * BYTES_PER_PIXEL;
        let dst_stride = dst_w as usize * BYTES_PER_PIXEL;
        let src_raw = src.as_raw();
        let dst_raw: &mut [u8] = &mut self.image;

        for row in 0..h as usize {
            let src_start = (sy as usize + row) * src_stride + sx as usize * BYTES_PER_PIXEL;
            let dst_start = (dy as usize + row) * dst_stride + dx as usize * BYTES_PER_PIXEL;
            dst_raw[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src_raw[src_start..src_start + row_bytes]);
        }

        (w * h) as u64
    }

    /// Copies a whole surface onto this one at a (possibly negative) offset.
    pub fn draw_surface(&mut self, other: &Surface, dest_x: i64, dest_y: i64) -> u64 {
        let size = other.size();
        self.blit(
            &other.image,
            PixelRect::new(0, 0, size.width, size.height),
            dest_x,
            dest_y,
        )
    }

    /// Underlying image.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes the surface, returning the image.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
