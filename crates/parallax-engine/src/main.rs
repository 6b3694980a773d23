//! # Parallax
//!
//! Headless driver for the map backdrop. Sets up a map, scrolls the camera
//! for a number of frames, logs what each frame redrew and optionally
//! writes the final viewport to a PNG.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgba, RgbaImage};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use parallax_common::PixelSize;
use parallax_engine::{AssetLoadStatus, AssetManager, MapInfo, ParallaxConfig, ParallaxMap};
use parallax_kernel::{FrameStats, Surface};

/// Name given to the generated image when no `--image` is passed.
const CHECKER_NAME: &str = "Checker";

/// Largest map side accepted on the command line, in tiles.
const MAX_MAP_TILES: i64 = 1024;

/// Largest tile size accepted on the command line, in pixels.
const MAX_TILE_SIZE: i64 = 256;

/// How long to wait for the image before writing `--out`.
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backdrop PNG; a checker pattern of map size is generated if omitted.
    #[arg(long, value_name = "PNG")]
    image: Option<PathBuf>,
    /// Map width in tiles.
    #[arg(long, value_name = "TILES", default_value_t = 17, value_parser = clap::value_parser!(u32).range(1..=MAX_MAP_TILES))]
    map_width: u32,
    /// Map height in tiles.
    #[arg(long, value_name = "TILES", default_value_t = 13, value_parser = clap::value_parser!(u32).range(1..=MAX_MAP_TILES))]
    map_height: u32,
    /// Tile size in pixels.
    #[arg(long, value_name = "PIXELS", default_value_t = 48, value_parser = clap::value_parser!(u32).range(1..=MAX_TILE_SIZE))]
    tile_size: u32,
    /// Wrap the map horizontally.
    #[arg(long)]
    loop_x: bool,
    /// Wrap the map vertically.
    #[arg(long)]
    loop_y: bool,
    /// Number of frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u32,
    /// Horizontal scroll per frame, in tiles.
    #[arg(long, default_value_t = 0.125, allow_negative_numbers = true)]
    dx: f64,
    /// Vertical scroll per frame, in tiles.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    dy: f64,
    /// Write the final composited viewport here.
    #[arg(long, value_name = "PNG")]
    out: Option<PathBuf>,
    /// Configuration file; the user config directory is used if omitted.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("parallax=info".parse()?))
        .init();

    let args = Args::parse();
    info!("Parallax {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => ParallaxConfig::load_from(path),
        None => ParallaxConfig::load(),
    };

    let tile = PixelSize::new(args.tile_size, args.tile_size);
    let mut info = MapInfo::new(args.map_width, args.map_height, tile)
        .with_loop(args.loop_x, args.loop_y);

    let (mut assets, image_name) = match &args.image {
        Some(path) => {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .context("image path has no usable file name")?
                .to_owned();
            let dir = path
                .parent()
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            (AssetManager::new(dir), name)
        },
        None => {
            let mut assets = AssetManager::new(&config.image_dir);
            assets.insert_image(CHECKER_NAME, checker(info.pixel_size(), tile));
            (assets, CHECKER_NAME.to_owned())
        },
    };
    info.note = format!("<SAN_ParallaxMap:{{\"imageName\":\"{image_name}\"}}>");

    let mut map = ParallaxMap::setup(&info, &config, &mut assets);
    let mut total = FrameStats::default();

    for frame in 0..args.frames {
        assets.poll();
        scroll(&mut map, args.dx, args.dy);

        let stats = map.update(&assets);
        debug!(
            "Frame {frame}: redrew {}/{} tiles, {} copies, {} waiting",
            stats.redrawn, stats.tiles, stats.copies, stats.not_ready
        );
        total.redrawn += stats.redrawn;
        total.copies += stats.copies;
        total.not_ready += stats.not_ready;
    }

    info!(
        "Ran {} frames: {} tile redraws, {} copies, {} tile-frames waiting on the image",
        args.frames, total.redrawn, total.copies, total.not_ready
    );

    if let Some(out) = &args.out {
        if let Some(handle) = map.image() {
            if assets.wait_for(handle, LOAD_TIMEOUT) != AssetLoadStatus::Loaded {
                warn!("Backdrop image is not available; output will be blank");
            }
            map.update(&assets);
        }

        let mut target = Surface::new(config.viewport());
        map.composite(&mut target);
        target
            .into_image()
            .save(out)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!("Wrote viewport to {}", out.display());
    }

    Ok(())
}

/// Applies one frame of camera movement.
fn scroll(map: &mut ParallaxMap, dx: f64, dy: f64) {
    if dx > 0.0 {
        map.scroll_right(dx);
    } else if dx < 0.0 {
        map.scroll_left(-dx);
    }
    if dy > 0.0 {
        map.scroll_down(dy);
    } else if dy < 0.0 {
        map.scroll_up(-dy);
    }
}

/// Checker pattern, one square per map tile, shaded by position so that
/// scrolling is visible.
fn checker(size: PixelSize, tile: PixelSize) -> RgbaImage {
    let width = size.width.max(1);
    let height = size.height.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let shade = ((x / tile.width + y / tile.height) % 2) as u8;
        let r = (u64::from(x) * 255 / u64::from(width)) as u8;
        let g = (u64::from(y) * 255 / u64::from(height)) as u8;
        if shade == 0 {
            Rgba([r, g, 160, 255])
        } else {
            Rgba([r / 2, g / 2, 80, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_reject_oversized_map() {
        let parsed = Args::try_parse_from(["parallax", "--map-width", "100000"]);
        assert!(parsed.is_err());
        let parsed = Args::try_parse_from(["parallax", "--tile-size", "100000"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["parallax"]).expect("defaults parse");
        assert_eq!((args.map_width, args.map_height, args.tile_size), (17, 13, 48));
        assert!(!args.loop_x && !args.loop_y);
    }
}
