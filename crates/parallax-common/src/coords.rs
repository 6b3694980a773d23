//! Coordinate and size types for the tiled backdrop.
//!
//! Three coordinate spaces meet here:
//! - slot space: the fixed `(x, y)` of a reusable tile in the on-screen grid
//! - world-tile space: unbounded particle-sized cells of the infinite plane
//! - source space: pixel positions inside one period of the source image

use serde::{Deserialize, Serialize};

/// Width and height in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelSize {
    /// Creates a new pixel size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the extent along one axis.
    #[must_use]
    pub const fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Number of pixels covered.
    #[must_use]
    pub const fn area(self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    /// True if either side is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Screen axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis, grows to the right
    Horizontal,
    /// Y axis, grows downward
    Vertical,
}

/// Number of tile slots along each axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridDims {
    /// Slots per row
    pub nx: u32,
    /// Slots per column
    pub ny: u32,
}

impl GridDims {
    /// Creates new grid dimensions.
    #[must_use]
    pub const fn new(nx: u32, ny: u32) -> Self {
        Self { nx, ny }
    }

    /// Slot count along one axis.
    #[must_use]
    pub const fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.nx,
            Axis::Vertical => self.ny,
        }
    }

    /// Total number of slots.
    #[must_use]
    pub const fn count(self) -> usize {
        (self.nx as usize) * (self.ny as usize)
    }

    /// Iterates every slot in row-major order.
    pub fn slots(self) -> impl Iterator<Item = SlotIndex> {
        (0..self.ny).flat_map(move |y| (0..self.nx).map(move |x| SlotIndex::new(x, y)))
    }
}

/// Immutable grid coordinate of a reusable tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotIndex {
    /// Column in `[0, nx)`
    pub x: u32,
    /// Row in `[0, ny)`
    pub y: u32,
}

impl SlotIndex {
    /// Creates a new slot index.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Index along one axis.
    #[must_use]
    pub const fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// Which particle-sized cell of the infinite plane a slot shows this frame.
///
/// Unbounded in both directions; the camera may scroll arbitrarily far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldTileAddress {
    /// Column of the world cell
    pub x: i64,
    /// Row of the world cell
    pub y: i64,
}

impl WorldTileAddress {
    /// Creates a new world tile address.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Top-left corner of the cell in world pixels.
    #[must_use]
    pub const fn to_world_pixels(self, particle: PixelSize) -> (i64, i64) {
        (
            self.x * particle.width as i64,
            self.y * particle.height as i64,
        )
    }
}

/// Wrapped pixel position inside one period of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleAnchor {
    /// Source x in `[0, width)`
    pub x: u32,
    /// Source y in `[0, height)`
    pub y: u32,
}

impl SampleAnchor {
    /// Creates a new sample anchor.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[must_use]
    pub const fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
}

/// Integer division rounded toward positive infinity.
#[must_use]
pub const fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}
