//! Host map and camera model.
//!
//! The map camera is the host's own notion of where the screen is, in map
//! tiles. It clamps at the edges of bounded maps and wraps on looping axes.
//! The backdrop follows it, but only by movement that actually happened:
//! a scroll absorbed by an edge is reported as `None`.

use glam::DVec2;
use parallax_common::{Axis, PixelSize};

/// Host map descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapInfo {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile size in pixels.
    pub tile_size: PixelSize,
    /// Map wraps horizontally.
    pub loop_horizontal: bool,
    /// Map wraps vertically.
    pub loop_vertical: bool,
    /// Free-form note carrying metadata tags.
    pub note: String,
}

impl MapInfo {
    /// Creates a bounded map with an empty note.
    #[must_use]
    pub fn new(width: u32, height: u32, tile_size: PixelSize) -> Self {
        Self {
            width,
            height,
            tile_size,
            loop_horizontal: false,
            loop_vertical: false,
            note: String::new(),
        }
    }

    /// Sets the looping axes.
    #[must_use]
    pub fn with_loop(mut self, horizontal: bool, vertical: bool) -> Self {
        self.loop_horizontal = horizontal;
        self.loop_vertical = vertical;
        self
    }

    /// Sets the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Full map size in pixels, saturating at `u32::MAX`.
    #[must_use]
    pub const fn pixel_size(&self) -> PixelSize {
        PixelSize::new(
            self.width.saturating_mul(self.tile_size.width),
            self.height.saturating_mul(self.tile_size.height),
        )
    }
}

/// Display position of the host map, in tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCamera {
    /// Top-left of the screen in map tiles.
    display: DVec2,
    /// Map size in tiles.
    map_tiles: DVec2,
    /// Screen size in tiles.
    screen_tiles: DVec2,
    loop_horizontal: bool,
    loop_vertical: bool,
}

impl MapCamera {
    /// Creates a camera at the map origin.
    #[must_use]
    pub fn new(map: &MapInfo, viewport: PixelSize) -> Self {
        let tile_w = f64::from(map.tile_size.width.max(1));
        let tile_h = f64::from(map.tile_size.height.max(1));
        Self {
            display: DVec2::ZERO,
            map_tiles: DVec2::new(f64::from(map.width), f64::from(map.height)),
            screen_tiles: DVec2::new(
                f64::from(viewport.width) / tile_w,
                f64::from(viewport.height) / tile_h,
            ),
            loop_horizontal: map.loop_horizontal,
            loop_vertical: map.loop_vertical,
        }
    }

    /// Current display position in tiles.
    #[must_use]
    pub const fn display_pos(&self) -> DVec2 {
        self.display
    }

    /// Places the screen, wrapping looping axes and clamping bounded ones.
    ///
    /// A bounded axis narrower than the screen is centered. Returns the
    /// resulting display position.
    pub fn set_display_pos(&mut self, x: f64, y: f64) -> DVec2 {
        self.display = DVec2::new(
            self.place(Axis::Horizontal, x),
            self.place(Axis::Vertical, y),
        );
        self.display
    }

    /// Scrolls right by `distance` tiles.
    pub fn scroll_right(&mut self, distance: f64) -> Option<f64> {
        self.scroll(Axis::Horizontal, distance)
    }

    /// Scrolls left by `distance` tiles.
    pub fn scroll_left(&mut self, distance: f64) -> Option<f64> {
        self.scroll(Axis::Horizontal, -distance)
    }

    /// Scrolls down by `distance` tiles.
    pub fn scroll_down(&mut self, distance: f64) -> Option<f64> {
        self.scroll(Axis::Vertical, distance)
    }

    /// Scrolls up by `distance` tiles.
    pub fn scroll_up(&mut self, distance: f64) -> Option<f64> {
        self.scroll(Axis::Vertical, -distance)
    }

    /// Moves along `axis` by `delta` tiles (positive is right/down).
    ///
    /// Returns the movement to propagate to anything following the camera,
    /// or `None` if the display position did not change. On looping axes
    /// that is the full `delta`, unwrapped; on bounded axes it is what was
    /// left after clamping.
    pub fn scroll(&mut self, axis: Axis, delta: f64) -> Option<f64> {
        let extent = self.along(self.map_tiles, axis);
        let screen = self.along(self.screen_tiles, axis);
        let last = self.along(self.display, axis);

        let next = if self.loops(axis) {
            (last + delta).rem_euclid(extent.max(1.0))
        } else if extent >= screen {
            (last + delta).clamp(0.0, extent - screen)
        } else {
            last
        };

        if next == last {
            return None;
        }
        match axis {
            Axis::Horizontal => self.display.x = next,
            Axis::Vertical => self.display.y = next,
        }

        if self.loops(axis) {
            Some(delta)
        } else {
            Some(next - last)
        }
    }

    /// True if `axis` wraps.
    #[must_use]
    pub const fn loops(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.loop_horizontal,
            Axis::Vertical => self.loop_vertical,
        }
    }

    fn place(&self, axis: Axis, value: f64) -> f64 {
        let extent = self.along(self.map_tiles, axis);
        if self.loops(axis) {
            return value.rem_euclid(extent.max(1.0));
        }
        let end = extent - self.along(self.screen_tiles, axis);
        if end < 0.0 {
            end / 2.0
        } else {
            value.clamp(0.0, end)
        }
    }

    const fn along(&self, v: DVec2, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }
}
