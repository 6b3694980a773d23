//! Toroidal sampling of the source image.
//!
//! The source image is treated as one period of an infinitely repeating
//! plane. A particle-sized tile anchored anywhere on that plane is filled by
//! at most four copies from the source: the part up to the right/bottom
//! edge, and the parts that wrap back to column 0 and/or row 0.
//!
//! ```text
//!  dest (pw x ph)
//!  +---------+----+
//!  |    A    | B  |   A: (sx, sy)  B: (0, sy)
//!  +---------+----+
//!  |    C    | D  |   C: (sx, 0)   D: (0, 0)
//!  +---------+----+
//! ```
//!
//! Tiles larger than the image (`pw > W` or `ph > H`) would need more than
//! one wrap and are a configuration precondition violation; the plan is
//! still produced and the copies are clipped by the surface.

use parallax_common::{PixelRect, PixelSize, SampleAnchor, WorldTileAddress};

/// Maximum number of copies needed to fill one tile.
pub const MAX_BLITS: usize = 4;

/// One rectangular copy from the source image into a tile surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blit {
    /// Region of the source image.
    pub source: PixelRect,
    /// Top-left destination inside the tile.
    pub dest: (u32, u32),
}

/// Ordered list of copies that fills one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplePlan {
    blits: [Blit; MAX_BLITS],
    len: usize,
}

impl SamplePlan {
    fn push(&mut self, blit: Blit) {
        if blit.source.is_empty() {
            return;
        }
        self.blits[self.len] = blit;
        self.len += 1;
    }

    /// Non-empty copies in A, B, C, D order.
    #[must_use]
    pub fn as_slice(&self) -> &[Blit] {
        &self.blits[..self.len]
    }

    /// Number of copies.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if nothing needs copying.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the copies.
    pub fn iter(&self) -> std::slice::Iter<'_, Blit> {
        self.as_slice().iter()
    }

    /// Total destination pixels written by the plan.
    #[must_use]
    pub fn covered_area(&self) -> u64 {
        self.iter().map(|blit| blit.source.area()).sum()
    }
}

impl<'a> IntoIterator for &'a SamplePlan {
    type Item = &'a Blit;
    type IntoIter = std::slice::Iter<'a, Blit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Wraps a world pixel into `[0, period)`, non-negative for negative input.
#[must_use]
pub fn wrap_coord(world: i64, period: u32) -> u32 {
    if period == 0 {
        return 0;
    }
    world.rem_euclid(i64::from(period)) as u32
}

/// Wraps a world-pixel anchor into one period of the image.
#[must_use]
pub fn wrap_anchor(world_x: i64, world_y: i64, world_size: PixelSize) -> SampleAnchor {
    SampleAnchor::new(
        wrap_coord(world_x, world_size.width),
        wrap_coord(world_y, world_size.height),
    )
}

/// Anchor for the top-left corner of a world cell.
#[must_use]
pub fn anchor_for(
    address: WorldTileAddress,
    particle: PixelSize,
    world_size: PixelSize,
) -> SampleAnchor {
    let (world_x, world_y) = address.to_world_pixels(particle);
    wrap_anchor(world_x, world_y, world_size)
}

/// Copies needed to fill a `tile`-sized surface starting at `anchor`.
///
/// Zero-sized quadrants are dropped, so the plan has one entry when the
/// tile fits inside the image, two when it straddles one edge and four at
/// the corner.
#[must_use]
pub fn plan(anchor: SampleAnchor, world_size: PixelSize, tile: PixelSize) -> SamplePlan {
    let mut plan = SamplePlan::default();
    if world_size.is_empty() || tile.is_empty() {
        return plan;
    }

    let (sx, sy) = (anchor.x, anchor.y);
    let first_w = tile.width.min(world_size.width.saturating_sub(sx));
    let first_h = tile.height.min(world_size.height.saturating_sub(sy));
    let wrap_w = tile.width - first_w;
    let wrap_h = tile.height - first_h;

    plan.push(Blit {
        source: PixelRect::new(sx, sy, first_w, first_h),
        dest: (0, 0),
    });
    plan.push(Blit {
        source: PixelRect::new(0, sy, wrap_w, first_h),
        dest: (first_w, 0),
    });
    plan.push(Blit {
        source: PixelRect::new(sx, 0, first_w, wrap_h),
        dest: (0, first_h),
    });
    plan.push(Blit {
        source: PixelRect::new(0, 0, wrap_w, wrap_h),
        dest: (first_w, first_h),
    });
    plan
}
