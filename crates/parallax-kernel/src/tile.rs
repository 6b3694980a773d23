//! A single reusable tile of the backdrop grid.

use glam::DVec2;
use parallax_common::{ImageHandle, PixelSize, SampleAnchor, SlotIndex, WorldTileAddress};
use tracing::trace;

use crate::indexer::{screen_position, world_tile_address};
use crate::provider::ImageProvider;
use crate::sampler::{anchor_for, plan, Blit, SamplePlan};
use crate::scroll::ScrollState;
use crate::surface::Surface;

/// What a tile did during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileUpdate {
    /// Source image not loaded yet; only the position moved.
    NotReady,
    /// Same anchor as last frame; only the position moved.
    Repositioned,
    /// Anchor changed and the surface was redrawn.
    Redrawn {
        /// Region copies issued.
        copies: usize,
    },
}

/// A fixed grid slot with its own particle-sized surface.
///
/// The slot never changes; the world cell it shows, and therefore its
/// pixels, change as the camera moves.
#[derive(Debug, Clone)]
pub struct Tile {
    slot: SlotIndex,
    surface: Surface,
    address: WorldTileAddress,
    position: DVec2,
    last_anchor: Option<SampleAnchor>,
    plan: SamplePlan,
}

impl Tile {
    /// Creates a blank tile for `slot`.
    #[must_use]
    pub fn new(slot: SlotIndex, particle: PixelSize) -> Self {
        Self {
            slot,
            surface: Surface::new(particle),
            address: WorldTileAddress::new(i64::from(slot.x), i64::from(slot.y)),
            position: DVec2::ZERO,
            last_anchor: None,
            plan: SamplePlan::default(),
        }
    }

    /// Runs one frame for this tile.
    ///
    /// The screen position is refreshed every frame. The surface is
    /// redrawn only when the wrapped anchor differs from the one drawn last,
    /// which happens when the camera crosses a particle boundary and this
    /// slot is handed a new world cell.
    pub fn update<P>(&mut self, state: &ScrollState, images: &P, image: ImageHandle) -> TileUpdate
    where
        P: ImageProvider + ?Sized,
    {
        self.address = world_tile_address(self.slot, state);
        self.position = screen_position(self.address, state);

        if !images.is_ready(image) {
            return TileUpdate::NotReady;
        }

        let anchor = anchor_for(self.address, state.particle_size(), state.world_size());
        if self.last_anchor == Some(anchor) {
            return TileUpdate::Repositioned;
        }

        self.plan = plan(anchor, state.world_size(), self.surface.size());
        self.surface.clear();
        for blit in &self.plan {
            images.copy_region(image, blit.source, &mut self.surface, blit.dest);
        }
        self.last_anchor = Some(anchor);

        trace!(
            slot = ?self.slot,
            anchor = ?anchor,
            copies = self.plan.len(),
            "Tile redrawn"
        );
        TileUpdate::Redrawn {
            copies: self.plan.len(),
        }
    }

    /// Copies that produced the current surface contents.
    #[must_use]
    pub fn current_source_rects(&self) -> &[Blit] {
        self.plan.as_slice()
    }

    /// Top-left corner on screen, in pixels.
    #[must_use]
    pub const fn screen_position(&self) -> DVec2 {
        self.position
    }

    /// Fixed grid coordinate.
    #[must_use]
    pub const fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// World cell shown since the last update.
    #[must_use]
    pub const fn world_address(&self) -> WorldTileAddress {
        self.address
    }

    /// Anchor of the current surface contents, `None` until first drawn.
    #[must_use]
    pub const fn last_anchor(&self) -> Option<SampleAnchor> {
        self.last_anchor
    }

    /// Rendered pixels.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }
}
