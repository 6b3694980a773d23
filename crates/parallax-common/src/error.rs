//! Error types for the parallax backdrop.
//!
//! The scrolling core never fails; these cover the host boundary where
//! files are read, images decoded and map notes parsed.

use thiserror::Error;

use crate::coords::PixelSize;

/// Top-level error type for parallax operations.
#[derive(Debug, Error)]
pub enum ParallaxError {
    /// Image loading errors
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Configuration and metadata errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source image errors.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Image file does not exist
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Decoded image does not match the map's pixel size
    #[error("Image is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        /// Map size in pixels
        expected: PixelSize,
        /// Size of the decoded image
        actual: PixelSize,
    },
}

/// Configuration and map metadata errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A map metadata tag was present but unusable
    #[error("Invalid metadata <{key}>: {reason}")]
    InvalidMetadata {
        /// Tag name
        key: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type alias for parallax operations.
pub type ParallaxResult<T> = Result<T, ParallaxError>;
