//! # Parallax Common
//!
//! Common types and shared abstractions for the parallax map backdrop.
//!
//! This crate provides the foundational types used by the kernel and the
//! engine integration:
//! - Pixel sizes, slot and world-tile coordinates, sample anchors and rects
//! - Ceiling integer division for signed scroll arithmetic
//! - Image handle IDs handed out by image providers
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
