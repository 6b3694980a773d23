//! Per-map backdrop context.
//!
//! [`ParallaxMap`] is owned by the host for the lifetime of one map. It
//! holds the host camera, the backdrop scroll state and, when the map's
//! note enables it, the tile grid. Camera calls go through it so the
//! backdrop only ever sees movement the camera actually made.

use glam::DVec2;
use tracing::{debug, info, warn};

use parallax_common::{Axis, ImageHandle};
use parallax_kernel::{FrameStats, ImageProvider, ScrollState, Surface, TileGrid};

use crate::camera::{MapCamera, MapInfo};
use crate::config::ParallaxConfig;
use crate::map_meta::{MapMetadata, ParallaxSettings};

/// Backdrop state for the current map.
#[derive(Debug)]
pub struct ParallaxMap {
    camera: MapCamera,
    scroll: ScrollState,
    settings: Option<ParallaxSettings>,
    grid: Option<TileGrid>,
}

impl ParallaxMap {
    /// Prepares the backdrop for `map`.
    ///
    /// Reads the map note, sizes particles and the grid, requests the image
    /// from `images` and allocates the tiles. A map without a usable
    /// backdrop tag gets a context that only tracks the camera.
    pub fn setup<P>(map: &MapInfo, config: &ParallaxConfig, images: &mut P) -> Self
    where
        P: ImageProvider + ?Sized,
    {
        let viewport = config.viewport();
        let scroll = ScrollState::configure(
            map.tile_size,
            viewport,
            config.particle_width,
            config.particle_height,
            map.pixel_size(),
        );
        let camera = MapCamera::new(map, viewport);

        let meta = MapMetadata::parse(&map.note);
        let settings = ParallaxSettings::from_metadata(&meta).unwrap_or_else(|e| {
            warn!("Ignoring backdrop tag: {e}");
            None
        });

        let grid = settings.as_ref().map(|settings| {
            let handle = images.request_image(&settings.image_name);
            info!(
                "Backdrop '{}' on {}x{} map, particle {}x{}",
                settings.image_name,
                map.width,
                map.height,
                scroll.particle_size().width,
                scroll.particle_size().height
            );
            TileGrid::create(&scroll, handle)
        });
        if grid.is_none() {
            debug!("Map has no backdrop");
        }

        Self {
            camera,
            scroll,
            settings,
            grid,
        }
    }

    /// True if this map shows a backdrop.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.grid.is_some()
    }

    /// Places the camera and snaps the backdrop to it.
    pub fn set_display_pos(&mut self, x: f64, y: f64) {
        let pos = self.camera.set_display_pos(x, y);
        self.scroll.set_offset(pos.x, pos.y);
    }

    /// Scrolls right by `distance` tiles. Returns true if the camera moved.
    pub fn scroll_right(&mut self, distance: f64) -> bool {
        self.scroll_along(Axis::Horizontal, distance)
    }

    /// Scrolls left by `distance` tiles. Returns true if the camera moved.
    pub fn scroll_left(&mut self, distance: f64) -> bool {
        self.scroll_along(Axis::Horizontal, -distance)
    }

    /// Scrolls down by `distance` tiles. Returns true if the camera moved.
    pub fn scroll_down(&mut self, distance: f64) -> bool {
        self.scroll_along(Axis::Vertical, distance)
    }

    /// Scrolls up by `distance` tiles. Returns true if the camera moved.
    pub fn scroll_up(&mut self, distance: f64) -> bool {
        self.scroll_along(Axis::Vertical, -distance)
    }

    /// Bounded axes pass on only the movement left after clamping, so the
    /// backdrop stays locked to the map when the camera hits an edge.
    fn scroll_along(&mut self, axis: Axis, delta: f64) -> bool {
        let Some(applied) = self.camera.scroll(axis, delta) else {
            return false;
        };
        self.scroll.scroll(axis, applied);
        debug!("Scrolled {axis:?} by {applied}");
        true
    }

    /// Runs one frame of the backdrop.
    pub fn update<P>(&mut self, images: &P) -> FrameStats
    where
        P: ImageProvider + ?Sized,
    {
        match &mut self.grid {
            Some(grid) => grid.update(&self.scroll, images),
            None => FrameStats::default(),
        }
    }

    /// Draws the backdrop into a viewport-sized `target`.
    pub fn composite(&self, target: &mut Surface) {
        if let Some(grid) = &self.grid {
            grid.composite(target);
        }
    }

    /// Host camera position in tiles.
    #[must_use]
    pub const fn display_pos(&self) -> DVec2 {
        self.camera.display_pos()
    }

    /// Host camera.
    #[must_use]
    pub const fn camera(&self) -> &MapCamera {
        &self.camera
    }

    /// Backdrop scroll state.
    #[must_use]
    pub const fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    /// Settings read from the map note.
    #[must_use]
    pub const fn settings(&self) -> Option<&ParallaxSettings> {
        self.settings.as_ref()
    }

    /// Tile grid, if active.
    #[must_use]
    pub const fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }

    /// Handle of the backdrop image, if active.
    #[must_use]
    pub fn image(&self) -> Option<ImageHandle> {
        self.grid.as_ref().map(TileGrid::image)
    }
}
