//! Scroll state shared by every tile of the backdrop grid.
//!
//! Holds the camera offset in map-tile units together with the pixel
//! geometry fixed at map setup: base tile size, particle (grid slot) size,
//! grid dimensions and the size of one period of the world image.

use glam::DVec2;
use parallax_common::{Axis, GridDims, PixelSize};

/// Default requested particle width and height in pixels.
pub const DEFAULT_PARTICLE_SIZE: i64 = 48;

/// Pixel offsets are snapped to this many steps per pixel.
const SUBPIXEL_STEPS: f64 = 1_000_000.0;

/// Camera offset plus the grid geometry derived from it at setup.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    /// Camera position in map-tile units (fractional).
    display_offset: DVec2,
    /// Base tile size of the underlying map.
    tile_size: PixelSize,
    /// Size of one grid slot.
    particle_size: PixelSize,
    /// Number of slots along each axis.
    grid_dims: GridDims,
    /// One period of the world image.
    world_size: PixelSize,
}

impl ScrollState {
    /// Computes particle size and grid dimensions for a map.
    ///
    /// The requested particle size is clamped to `[tile_size, viewport]`
    /// per axis (the tile size wins if it exceeds the viewport), so any
    /// value, including zero or negative, is accepted. The grid gets one
    /// slot of margin per axis so sub-particle offsets never leave a gap.
    #[must_use]
    pub fn configure(
        tile_size: PixelSize,
        viewport: PixelSize,
        requested_width: i64,
        requested_height: i64,
        world_size: PixelSize,
    ) -> Self {
        let particle_size = PixelSize::new(
            clamp_particle(requested_width, tile_size.width, viewport.width),
            clamp_particle(requested_height, tile_size.height, viewport.height),
        );
        let grid_dims = GridDims::new(
            viewport.width.div_ceil(particle_size.width) + 1,
            viewport.height.div_ceil(particle_size.height) + 1,
        );

        Self {
            display_offset: DVec2::ZERO,
            tile_size,
            particle_size,
            grid_dims,
            world_size,
        }
    }

    /// Sets the camera offset absolutely.
    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.display_offset = DVec2::new(x, y);
    }

    /// Moves the camera offset along one axis.
    ///
    /// Callers propagate only movement that actually changed the host
    /// camera; a zero delta is ignored here as well.
    pub fn scroll(&mut self, axis: Axis, delta: f64) {
        if delta == 0.0 {
            return;
        }
        match axis {
            Axis::Horizontal => self.display_offset.x += delta,
            Axis::Vertical => self.display_offset.y += delta,
        }
    }

    /// Camera offset in map-tile units.
    #[must_use]
    pub const fn display_offset(&self) -> DVec2 {
        self.display_offset
    }

    /// Camera offset in pixels.
    ///
    /// Snapped to a millionth of a pixel, so offsets reached through
    /// different sequences of scrolls agree once they are equal to within
    /// rounding error.
    #[must_use]
    pub fn scroll_pixels(&self) -> DVec2 {
        DVec2::new(
            snap_pixels(self.display_offset.x * f64::from(self.tile_size.width)),
            snap_pixels(self.display_offset.y * f64::from(self.tile_size.height)),
        )
    }

    /// Camera offset in pixels along one axis.
    #[must_use]
    pub fn scroll_pixels_along(&self, axis: Axis) -> f64 {
        let pixels = self.scroll_pixels();
        match axis {
            Axis::Horizontal => pixels.x,
            Axis::Vertical => pixels.y,
        }
    }

    /// Index of the particle cell containing the camera's top-left corner.
    ///
    /// Floored, so `-1px` with 48px particles is cell `-1`, not `0`.
    #[must_use]
    pub fn scroll_particle_index(&self) -> (i64, i64) {
        (
            self.particle_index_along(Axis::Horizontal),
            self.particle_index_along(Axis::Vertical),
        )
    }

    /// Floored particle index along one axis.
    #[must_use]
    pub fn particle_index_along(&self, axis: Axis) -> i64 {
        let particle = f64::from(self.particle_size.along(axis));
        (self.scroll_pixels_along(axis) / particle).floor() as i64
    }

    /// Base tile size of the map.
    #[must_use]
    pub const fn tile_size(&self) -> PixelSize {
        self.tile_size
    }

    /// Size of one grid slot.
    #[must_use]
    pub const fn particle_size(&self) -> PixelSize {
        self.particle_size
    }

    /// Slots per axis.
    #[must_use]
    pub const fn grid_dims(&self) -> GridDims {
        self.grid_dims
    }

    /// Size of one period of the world image.
    #[must_use]
    pub const fn world_size(&self) -> PixelSize {
        self.world_size
    }
}

fn snap_pixels(pixels: f64) -> f64 {
    (pixels * SUBPIXEL_STEPS).round() / SUBPIXEL_STEPS
}

/// `max(tile, min(requested, viewport))`, never below one pixel.
fn clamp_particle(requested: i64, tile: u32, viewport: u32) -> u32 {
    let upper = i64::from(viewport);
    let clamped = requested.min(upper).max(i64::from(tile));
    clamped.max(1) as u32
}
