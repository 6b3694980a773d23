//! End-to-end tests for the map backdrop.
//!
//! These drive a [`ParallaxMap`] the way a host does each frame: move the
//! camera, poll assets, update, composite. The composited viewport is then
//! checked pixel by pixel against the source image wrapped at the camera
//! offset.

#![cfg(test)]

use image::{Rgba, RgbaImage};
use parallax_common::PixelSize;
use parallax_kernel::{FrameStats, ImageProvider, MemoryImages, Surface, TRANSPARENT};

use crate::camera::MapInfo;
use crate::config::ParallaxConfig;
use crate::parallax::ParallaxMap;

const TILE: u32 = 48;
const NOTE: &str = "<SAN_ParallaxMap:{\"imageName\":\"BlueSky\"}>";

/// Every pixel distinct, so a misplaced copy cannot go unnoticed.
fn pattern(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x & 0xff) as u8,
            (y & 0xff) as u8,
            ((x >> 8) | ((y >> 8) << 4)) as u8,
            255,
        ])
    })
}

fn small_screen() -> ParallaxConfig {
    ParallaxConfig {
        viewport_width: 192,
        viewport_height: 144,
        ..ParallaxConfig::default()
    }
}

fn sky_map(width: u32, height: u32, looping: bool) -> MapInfo {
    MapInfo::new(width, height, PixelSize::new(TILE, TILE))
        .with_loop(looping, looping)
        .with_note(NOTE)
}

fn render(map: &ParallaxMap, config: &ParallaxConfig) -> Surface {
    let mut target = Surface::new(config.viewport());
    map.composite(&mut target);
    target
}

fn assert_matches_wrapped(map: &ParallaxMap, target: &Surface, image: &RgbaImage) {
    let scroll = map.scroll_state().scroll_pixels();
    let (sx, sy) = (scroll.x as i64, scroll.y as i64);
    let (w, h) = (i64::from(image.width()), i64::from(image.height()));

    for (x, y, pixel) in target.as_image().enumerate_pixels() {
        let ix = (i64::from(x) + sx).rem_euclid(w) as u32;
        let iy = (i64::from(y) + sy).rem_euclid(h) as u32;
        assert_eq!(
            pixel,
            image.get_pixel(ix, iy),
            "viewport ({x},{y}) at scroll ({sx},{sy})"
        );
    }
}

mod looping_tests {
    use super::*;

    #[test]
    fn e2e_looping_scroll_matches_wrapped_image() {
        let config = small_screen();
        let info = sky_map(10, 8, true);
        let image = pattern(480, 384);

        let mut images = MemoryImages::new();
        images.insert("BlueSky", image.clone());
        let mut map = ParallaxMap::setup(&info, &config, &mut images);

        for frame in 0..60 {
            if frame < 30 {
                map.scroll_right(0.25);
                map.scroll_up(0.125);
            } else {
                map.scroll_left(0.5);
                map.scroll_down(0.375);
            }
            map.update(&images);
            assert_matches_wrapped(&map, &render(&map, &config), &image);
        }
    }

    #[test]
    fn e2e_looping_across_many_periods() {
        let config = small_screen();
        let info = sky_map(10, 8, true);
        let image = pattern(480, 384);

        let mut images = MemoryImages::new();
        images.insert("BlueSky", image.clone());
        let mut map = ParallaxMap::setup(&info, &config, &mut images);

        map.set_display_pos(3.0, 2.0);
        for _ in 0..5 {
            // Ten tiles is one full period; offset wraps, backdrop follows
            map.scroll_right(9.75);
            map.scroll_down(7.5);
        }
        map.update(&images);
        assert_matches_wrapped(&map, &render(&map, &config), &image);
    }

    #[test]
    fn e2e_redraws_only_on_particle_crossings() {
        let config = small_screen();
        let info = sky_map(10, 8, true);

        let mut images = MemoryImages::new();
        images.insert("BlueSky", pattern(480, 384));
        let mut map = ParallaxMap::setup(&info, &config, &mut images);

        let first = map.update(&images);
        let grid = map.grid().expect("active grid").dims();
        assert_eq!(first.redrawn, first.tiles);

        // 12px per frame; a particle boundary every fourth frame
        let mut redrawn = 0;
        for frame in 1..=16 {
            map.scroll_right(0.25);
            let stats = map.update(&images);
            let expected = if frame % 4 == 0 { grid.ny as usize } else { 0 };
            assert_eq!(stats.redrawn, expected, "frame {frame}");
            redrawn += stats.redrawn;
        }
        assert_eq!(redrawn, 4 * grid.ny as usize);
    }
}

mod bounded_tests {
    use super::*;

    #[test]
    fn e2e_bounded_map_stops_backdrop_at_edge() {
        let config = small_screen();
        // 480px wide map, 192px screen: camera stops at 288px
        let info = sky_map(10, 8, false);
        let image = pattern(480, 384);

        let mut images = MemoryImages::new();
        images.insert("BlueSky", image.clone());
        let mut map = ParallaxMap::setup(&info, &config, &mut images);

        for _ in 0..40 {
            map.scroll_right(0.5);
            map.update(&images);
        }
        assert_eq!(map.scroll_state().scroll_pixels().x, 288.0);

        let stats = map.update(&images);
        assert_eq!(stats.redrawn, 0);
        assert_matches_wrapped(&map, &render(&map, &config), &image);
    }

    #[test]
    fn e2e_map_without_tag_draws_nothing() {
        let config = small_screen();
        let info = sky_map(10, 8, false).with_note("");

        let mut images = MemoryImages::new();
        images.insert("BlueSky", pattern(480, 384));
        let mut map = ParallaxMap::setup(&info, &config, &mut images);

        assert_eq!(map.update(&images), FrameStats::default());
        let target = render(&map, &config);
        assert!(target.as_image().pixels().all(|p| *p == TRANSPARENT));
    }
}

mod loading_tests {
    use super::*;
    use crate::asset_manager::{AssetLoadStatus, AssetManager};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn e2e_tiles_fill_in_when_image_arrives() {
        let config = small_screen();
        let info = sky_map(10, 8, true);
        let image = pattern(480, 384);

        let mut images = MemoryImages::new();
        let handle = images.insert("BlueSky", image.clone());
        images.hold(handle);
        let mut map = ParallaxMap::setup(&info, &config, &mut images);

        // Camera keeps moving while the image is pending
        for _ in 0..3 {
            map.scroll_right(0.25);
            let stats = map.update(&images);
            assert_eq!(stats.not_ready, stats.tiles);
            assert_eq!(stats.redrawn, 0);
        }
        assert_eq!(images.copy_count(), 0);

        images.release(handle);
        let stats = map.update(&images);
        assert_eq!(stats.redrawn, stats.tiles);
        assert_matches_wrapped(&map, &render(&map, &config), &image);
    }

    #[test]
    fn e2e_asset_manager_pipeline() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let image = pattern(480, 384);
        image
            .save(temp_dir.path().join("BlueSky.png"))
            .expect("Failed to write png");

        let config = ParallaxConfig {
            image_dir: temp_dir.path().to_path_buf(),
            ..small_screen()
        };
        let mut assets = AssetManager::new(&config.image_dir);
        let mut map = ParallaxMap::setup(&sky_map(10, 8, true), &config, &mut assets);
        let handle = map.image().expect("active map");

        assert_eq!(
            assets.wait_for(handle, Duration::from_secs(10)),
            AssetLoadStatus::Loaded
        );
        assert!(assets.is_ready(handle));

        map.scroll_left(1.5);
        map.scroll_up(0.75);
        assets.poll();
        map.update(&assets);
        assert_matches_wrapped(&map, &render(&map, &config), &image);
    }

    #[test]
    fn e2e_missing_image_leaves_backdrop_blank() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = ParallaxConfig {
            image_dir: temp_dir.path().to_path_buf(),
            ..small_screen()
        };
        let mut assets = AssetManager::new(&config.image_dir);
        let mut map = ParallaxMap::setup(&sky_map(10, 8, true), &config, &mut assets);
        let handle = map.image().expect("active map");

        assert_eq!(
            assets.wait_for(handle, Duration::from_secs(10)),
            AssetLoadStatus::Failed
        );
        let stats = map.update(&assets);
        assert_eq!(stats.not_ready, stats.tiles);
        let target = render(&map, &config);
        assert!(target.as_image().pixels().all(|p| *p == TRANSPARENT));
    }
}
