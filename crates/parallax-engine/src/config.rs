//! Plugin configuration.
//!
//! Global settings for the backdrop: the requested particle size, the
//! host's viewport size and where backdrop images live. Loaded from and
//! saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use parallax_common::{ConfigError, PixelSize};
use parallax_kernel::DEFAULT_PARTICLE_SIZE;

/// Configuration file name.
const CONFIG_FILE: &str = "parallax.toml";

/// Backdrop configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    // === Particles ===
    /// Requested particle width; clamped to `[tile, viewport]` at map setup
    pub particle_width: i64,
    /// Requested particle height; clamped to `[tile, viewport]` at map setup
    pub particle_height: i64,

    // === Screen ===
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,

    // === Assets ===
    /// Directory holding `<imageName>.png` backdrop images
    pub image_dir: PathBuf,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            particle_width: DEFAULT_PARTICLE_SIZE,
            particle_height: DEFAULT_PARTICLE_SIZE,

            viewport_width: 816,
            viewport_height: 624,

            image_dir: PathBuf::from("img/parallaxes"),
        }
    }
}

impl ParallaxConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let mut contents = String::new();
        if let Err(e) = fs::File::open(path).and_then(|mut file| file.read_to_string(&mut contents)) {
            warn!("Failed to read config file: {e}");
            return Self::default();
        }

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{}", ConfigError::Parse(e.to_string()));
                Self::default()
            },
        }
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    fn config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("parallax").join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }

    /// Clamp values that would make the screen degenerate.
    ///
    /// Particle sizes are left alone; they are clamped against the map's
    /// tile size at setup, which is not known here.
    pub fn validate(&mut self) {
        self.viewport_width = self.viewport_width.max(1);
        self.viewport_height = self.viewport_height.max(1);
    }

    /// Viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> PixelSize {
        PixelSize::new(self.viewport_width, self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ParallaxConfig::default();
        assert_eq!(config.particle_width, 48);
        assert_eq!(config.particle_height, 48);
        assert_eq!(config.viewport(), PixelSize::new(816, 624));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ParallaxConfig {
            viewport_width: 0,
            particle_width: -10,
            ..ParallaxConfig::default()
        };
        config.validate();

        assert_eq!(config.viewport_width, 1);
        // Left for the setup-time clamp
        assert_eq!(config.particle_width, -10);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("parallax.toml");

        let config = ParallaxConfig {
            particle_width: 96,
            viewport_width: 1280,
            image_dir: PathBuf::from("assets/backdrops"),
            ..ParallaxConfig::default()
        };
        config.save_to(&config_path).expect("Failed to save config");

        let loaded = ParallaxConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = ParallaxConfig::load_from("/nonexistent/path/parallax.toml");
        assert_eq!(config, ParallaxConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("parallax.toml");
        fs::write(&path, "particle_width = \"wide\"").expect("Failed to write");

        assert_eq!(ParallaxConfig::load_from(&path), ParallaxConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("parallax.toml");
        fs::write(&path, "particle_height = 64\n").expect("Failed to write");

        let config = ParallaxConfig::load_from(&path);
        assert_eq!(config.particle_height, 64);
        assert_eq!(config.particle_width, 48);
        assert_eq!(config.viewport_height, 624);
    }
}
