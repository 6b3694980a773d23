//! Parallax Engine - host integration for the map backdrop.
//!
//! This crate connects the scrolling kernel to a host map: per-map
//! metadata, the host camera, configuration, and background image loading.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod asset_manager;
pub mod camera;
pub mod config;
pub mod map_meta;
pub mod parallax;

mod e2e_tests;

pub use asset_manager::{AssetLoadStatus, AssetManager};
pub use camera::{MapCamera, MapInfo};
pub use config::ParallaxConfig;
pub use map_meta::{MapMetadata, MetaValue, ParallaxSettings, PARALLAX_META_KEY};
pub use parallax::ParallaxMap;
