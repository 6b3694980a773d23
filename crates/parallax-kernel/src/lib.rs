//! # Parallax Kernel
//!
//! Scrolling core for a seamlessly tiled map backdrop.
//!
//! A single source image is shown as an infinite, wrapping plane behind the
//! map using a constant number of reusable on-screen tiles:
//! - [`ScrollState`]: camera offset plus particle size and grid dimensions
//! - [`indexer`]: which world cell each fixed slot shows this frame
//! - [`sampler`]: toroidal sampling, up to four copies per tile
//! - [`Tile`]: one slot with its own surface, redrawn only on anchor change
//! - [`TileGrid`]: the fixed `nx * ny` tiles covering the viewport
//!
//! ## Frame model
//!
//! Single-threaded and frame driven. The host moves the camera first
//! (`ScrollState::set_offset` / `ScrollState::scroll`), then calls
//! `TileGrid::update` once. Image loading is the provider's business; tiles
//! poll readiness and stay blank until the image arrives.
//!
//! ## Redraw cost
//!
//! Repositioning is O(1) per tile per frame. A tile's pixels are copied
//! only when the camera crosses a particle boundary and that slot is handed
//! a new world cell, so redraws scale with distance / particle size rather
//! than with pixels scrolled.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod grid;
pub mod indexer;
pub mod provider;
pub mod sampler;
pub mod scroll;
pub mod surface;
pub mod tile;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::grid::*;
    pub use crate::provider::*;
    pub use crate::sampler::{Blit, SamplePlan};
    pub use crate::scroll::*;
    pub use crate::surface::*;
    pub use crate::tile::*;
}

pub use prelude::*;
