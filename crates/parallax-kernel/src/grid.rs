//! The fixed grid of reusable tiles covering the viewport.
//!
//! The grid is sized once at map setup to `nx * ny` tiles (viewport plus
//! one tile of margin per axis) and never grows or shrinks. Every frame
//! each tile is repositioned and, if its world cell changed, redrawn.

use parallax_common::{GridDims, ImageError, ImageHandle, PixelSize, SlotIndex};
use tracing::{debug, info, warn};

use crate::provider::ImageProvider;
use crate::scroll::ScrollState;
use crate::surface::Surface;
use crate::tile::{Tile, TileUpdate};

/// Per-frame counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Tiles updated.
    pub tiles: usize,
    /// Tiles whose surface was redrawn.
    pub redrawn: usize,
    /// Region copies issued across all redraws.
    pub copies: usize,
    /// Tiles skipped because the image was not ready.
    pub not_ready: usize,
}

/// Owns every tile of the backdrop for one map.
#[derive(Debug)]
pub struct TileGrid {
    dims: GridDims,
    particle: PixelSize,
    world_size: PixelSize,
    image: ImageHandle,
    tiles: Vec<Tile>,
    image_checked: bool,
}

impl TileGrid {
    /// Allocates one tile per slot of `state`'s grid.
    ///
    /// `image` is a handle into whichever provider is passed to
    /// [`TileGrid::update`]; it need not be ready yet.
    #[must_use]
    pub fn create(state: &ScrollState, image: ImageHandle) -> Self {
        let dims = state.grid_dims();
        let particle = state.particle_size();
        let tiles: Vec<Tile> = dims.slots().map(|slot| Tile::new(slot, particle)).collect();

        info!(
            "Created tile grid {}x{} ({} tiles of {}x{}px) for {}",
            dims.nx,
            dims.ny,
            tiles.len(),
            particle.width,
            particle.height,
            image
        );

        Self {
            dims,
            particle,
            world_size: state.world_size(),
            image,
            tiles,
            image_checked: false,
        }
    }

    /// Updates every tile for the current camera offset.
    ///
    /// `state` must come from the same map setup the grid was created with.
    pub fn update<P>(&mut self, state: &ScrollState, images: &P) -> FrameStats
    where
        P: ImageProvider + ?Sized,
    {
        debug_assert_eq!(state.grid_dims(), self.dims);
        self.check_image_size(images);

        let mut stats = FrameStats {
            tiles: self.tiles.len(),
            ..FrameStats::default()
        };
        for tile in &mut self.tiles {
            match tile.update(state, images, self.image) {
                TileUpdate::NotReady => stats.not_ready += 1,
                TileUpdate::Repositioned => {},
                TileUpdate::Redrawn { copies } => {
                    stats.redrawn += 1;
                    stats.copies += copies;
                },
            }
        }

        if stats.redrawn > 0 {
            debug!(
                "Redrew {} of {} tiles ({} copies)",
                stats.redrawn, stats.tiles, stats.copies
            );
        }
        stats
    }

    /// Draws every tile onto `target` at its screen position.
    pub fn composite(&self, target: &mut Surface) {
        for tile in &self.tiles {
            let pos = tile.screen_position().floor();
            target.draw_surface(tile.surface(), pos.x as i64, pos.y as i64);
        }
    }

    /// Warns once if the loaded image does not match the map size.
    fn check_image_size<P>(&mut self, images: &P)
    where
        P: ImageProvider + ?Sized,
    {
        if self.image_checked || !images.is_ready(self.image) {
            return;
        }
        self.image_checked = true;
        if let Some(actual) = images.dimensions(self.image) {
            if actual != self.world_size {
                let mismatch = ImageError::DimensionMismatch {
                    expected: self.world_size,
                    actual,
                };
                warn!("{mismatch}; the seam will not line up");
            }
        }
    }

    /// Slots per axis.
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Size of each tile.
    #[must_use]
    pub const fn particle_size(&self) -> PixelSize {
        self.particle
    }

    /// Handle of the sampled image.
    #[must_use]
    pub const fn image(&self) -> ImageHandle {
        self.image
    }

    /// All tiles in row-major slot order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at `slot`, if inside the grid.
    #[must_use]
    pub fn tile(&self, slot: SlotIndex) -> Option<&Tile> {
        if slot.x >= self.dims.nx || slot.y >= self.dims.ny {
            return None;
        }
        self.tiles
            .get(slot.y as usize * self.dims.nx as usize + slot.x as usize)
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True for a grid without tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryImages;
    use crate::surface::TRANSPARENT;
    use image::{Rgba, RgbaImage};
    use parallax_common::{Axis, SampleAnchor};
    use proptest::prelude::*;

    const VIEWPORT: PixelSize = PixelSize::new(200, 150);

    fn world_image(size: PixelSize) -> RgbaImage {
        RgbaImage::from_fn(size.width, size.height, |x, y| {
            Rgba([(x % 251) as u8, (y % 241) as u8, 7, 255])
        })
    }

    fn setup(particle: i64, world: PixelSize) -> (ScrollState, MemoryImages, TileGrid) {
        let state = ScrollState::configure(PixelSize::new(16, 16), VIEWPORT, particle, particle, world);
        let mut images = MemoryImages::new();
        let handle = images.insert("World", world_image(world));
        let grid = TileGrid::create(&state, handle);
        (state, images, grid)
    }

    /// Anchor and rounded position of every tile.
    fn snapshot(grid: &TileGrid) -> Vec<(Option<SampleAnchor>, (i64, i64))> {
        grid.tiles()
            .iter()
            .map(|t| {
                let p = t.screen_position();
                (t.last_anchor(), (p.x as i64, p.y as i64))
            })
            .collect()
    }

    #[test]
    fn test_grid_cardinality() {
        let (state, _, grid) = setup(48, PixelSize::new(480, 480));
        // ceil(200/48)+1 = 6, ceil(150/48)+1 = 5
        assert_eq!(grid.dims(), GridDims::new(6, 5));
        assert_eq!(grid.len(), 30);
        assert_eq!(grid.dims(), state.grid_dims());
        assert_eq!(grid.tile(SlotIndex::new(5, 4)).map(Tile::slot), Some(SlotIndex::new(5, 4)));
        assert!(grid.tile(SlotIndex::new(6, 0)).is_none());
    }

    #[test]
    fn test_first_frame_draws_all_then_idempotent() {
        let (state, images, mut grid) = setup(48, PixelSize::new(480, 480));

        let first = grid.update(&state, &images);
        assert_eq!(first.redrawn, grid.len());
        assert_eq!(first.not_ready, 0);

        let before = snapshot(&grid);
        images.reset_copy_count();
        let second = grid.update(&state, &images);
        assert_eq!(second.redrawn, 0);
        assert_eq!(second.copies, 0);
        assert_eq!(images.copy_count(), 0);
        assert_eq!(snapshot(&grid), before);
    }

    #[test]
    fn test_sub_particle_scroll_never_redraws() {
        let (mut state, images, mut grid) = setup(48, PixelSize::new(480, 480));
        grid.update(&state, &images);
        images.reset_copy_count();

        // 47px in 1px steps stays inside particle 0.
        for _ in 0..47 {
            state.scroll(Axis::Horizontal, 1.0 / 16.0);
            let stats = grid.update(&state, &images);
            assert_eq!(stats.redrawn, 0);
        }
        assert_eq!(images.copy_count(), 0);

        // The 48th pixel crosses into particle 1: one column hands off.
        state.scroll(Axis::Horizontal, 1.0 / 16.0);
        let stats = grid.update(&state, &images);
        assert_eq!(stats.redrawn, grid.dims().ny as usize);
        assert!(images.copy_count() > 0);
    }

    #[test]
    fn test_waits_for_image_then_draws() {
        let (state, mut images, mut grid) = setup(48, PixelSize::new(480, 480));
        images.hold(grid.image());

        let stats = grid.update(&state, &images);
        assert_eq!(stats.not_ready, grid.len());
        assert_eq!(stats.redrawn, 0);
        assert_eq!(images.copy_count(), 0);

        images.release(grid.image());
        let stats = grid.update(&state, &images);
        assert_eq!(stats.not_ready, 0);
        assert_eq!(stats.redrawn, grid.len());
    }

    #[test]
    fn test_boundary_scenario_splits_seam_tile() {
        // 500px world with 48px particles: column 10 straddles the seam.
        let (mut state, images, mut grid) = setup(48, PixelSize::new(500, 480));
        state.set_offset(479.0 / 16.0, 0.0);
        grid.update(&state, &images);

        let seam: Vec<&Tile> = grid
            .tiles()
            .iter()
            .filter(|t| t.world_address().x == 10)
            .collect();
        assert_eq!(seam.len(), grid.dims().ny as usize);
        for tile in seam {
            let widths: Vec<u32> = tile
                .current_source_rects()
                .iter()
                .filter(|b| b.dest.1 == 0)
                .map(|b| b.source.width)
                .collect();
            assert_eq!(widths, vec![20, 28]);
        }
    }

    #[test]
    fn test_negative_scroll_samples_wrapped_image() {
        let world = PixelSize::new(480, 480);
        let (mut state, images, mut grid) = setup(48, world);
        state.set_offset(-1.0 / 16.0, -1.0 / 16.0);
        grid.update(&state, &images);

        let mut target = Surface::new(VIEWPORT);
        grid.composite(&mut target);
        // Screen (0, 0) is world pixel (-1, -1), i.e. source (479, 479).
        let source = world_image(world);
        assert_eq!(target.pixel(0, 0), Some(*source.get_pixel(479, 479)));
        assert_eq!(target.pixel(1, 1), Some(*source.get_pixel(0, 0)));
    }

    #[test]
    fn test_composite_matches_toroidal_image() {
        let world = PixelSize::new(300, 260);
        let (mut state, images, mut grid) = setup(64, world);
        state.set_offset(-123.0, 57.0);
        grid.update(&state, &images);

        let mut target = Surface::new(VIEWPORT);
        grid.composite(&mut target);

        let source = world_image(world);
        let scroll = state.scroll_pixels();
        for y in 0..VIEWPORT.height {
            for x in 0..VIEWPORT.width {
                let wx = (scroll.x as i64 + i64::from(x)).rem_euclid(300) as u32;
                let wy = (scroll.y as i64 + i64::from(y)).rem_euclid(260) as u32;
                assert_eq!(target.pixel(x, y), Some(*source.get_pixel(wx, wy)));
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_tiles_cover_viewport(
            ox in -4000i64..4000,
            oy in -4000i64..4000,
            particle in 16i64..200,
        ) {
            let (mut state, images, mut grid) = setup(particle, PixelSize::new(480, 480));
            state.set_offset(ox as f64 / 16.0, oy as f64 / 16.0);
            grid.update(&state, &images);

            let mut target = Surface::new(VIEWPORT);
            grid.composite(&mut target);
            for y in 0..VIEWPORT.height {
                for x in 0..VIEWPORT.width {
                    prop_assert_ne!(target.pixel(x, y), Some(TRANSPARENT));
                }
            }
        }

        #[test]
        fn prop_result_independent_of_scroll_history(
            steps in proptest::collection::vec((-64i64..64, -64i64..64), 1..24),
            divisor in prop::sample::select(vec![16.0, 10.0, 3.0]),
        ) {
            let world = PixelSize::new(500, 420);
            let (mut stepped, images, mut stepped_grid) = setup(48, world);
            stepped_grid.update(&stepped, &images);
            for (dx, dy) in &steps {
                stepped.scroll(Axis::Horizontal, *dx as f64 / divisor);
                stepped.scroll(Axis::Vertical, *dy as f64 / divisor);
                stepped_grid.update(&stepped, &images);
            }

            let (tx, ty) = steps
                .iter()
                .fold((0i64, 0i64), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
            let (mut direct, images, mut direct_grid) = setup(48, world);
            direct_grid.update(&direct, &images);
            direct.scroll(Axis::Horizontal, tx as f64 / divisor);
            direct.scroll(Axis::Vertical, ty as f64 / divisor);
            direct_grid.update(&direct, &images);

            prop_assert_eq!(snapshot(&stepped_grid), snapshot(&direct_grid));
            for (a, b) in stepped_grid.tiles().iter().zip(direct_grid.tiles()) {
                prop_assert_eq!(a.surface(), b.surface());
            }
        }
    }
}
