//! Per-map metadata.
//!
//! Maps carry a free-form note. Tags inside it of the form `<Key:Value>`
//! or `<Key>` are extracted into [`MapMetadata`]. The backdrop is enabled
//! for a map by a tag whose value is a JSON object:
//!
//! ```text
//! <SAN_ParallaxMap:{
//!   "imageName":"BlueSky"
//! }>
//! ```

use ahash::AHashMap;
use parallax_common::{ConfigError, ParallaxResult};
use serde::{Deserialize, Serialize};

/// Tag that enables the backdrop for a map.
pub const PARALLAX_META_KEY: &str = "SAN_ParallaxMap";

/// Value of a note tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// `<Key>` with no value
    Flag,
    /// `<Key:Value>`
    Text(String),
}

/// Tags extracted from a map note.
#[derive(Debug, Clone, Default)]
pub struct MapMetadata {
    tags: AHashMap<String, MetaValue>,
}

impl MapMetadata {
    /// Extracts every tag from `note`. Later tags win on duplicate keys.
    #[must_use]
    pub fn parse(note: &str) -> Self {
        let mut tags = AHashMap::new();
        let mut rest = note;

        while let Some(open) = rest.find('<') {
            rest = &rest[open + 1..];
            let Some(stop) = rest.find(['<', '>', ':']) else {
                break;
            };
            let key = &rest[..stop];
            let delim = rest.as_bytes()[stop];

            if key.is_empty() || delim == b'<' {
                rest = &rest[stop..];
                continue;
            }
            if delim == b'>' {
                tags.insert(key.to_owned(), MetaValue::Flag);
                rest = &rest[stop + 1..];
                continue;
            }

            let value = &rest[stop + 1..];
            let Some(close) = value.find('>') else {
                break;
            };
            tags.insert(key.to_owned(), MetaValue::Text(value[..close].to_owned()));
            rest = &value[close + 1..];
        }

        Self { tags }
    }

    /// Raw tag value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.tags.get(key)
    }

    /// Text of a `<Key:Value>` tag.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.tags.get(key) {
            Some(MetaValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// True if the tag is present in either form.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True if the note had no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Backdrop settings for one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallaxSettings {
    /// Image asset name, without extension
    #[serde(rename = "imageName")]
    pub image_name: String,
}

impl ParallaxSettings {
    /// Reads the backdrop tag from map metadata.
    ///
    /// `Ok(None)` when the tag is absent or names no image; an error when
    /// the tag is present but unusable.
    pub fn from_metadata(meta: &MapMetadata) -> ParallaxResult<Option<Self>> {
        let raw = match meta.get(PARALLAX_META_KEY) {
            None => return Ok(None),
            Some(MetaValue::Flag) => {
                return Err(invalid("tag has no JSON value").into());
            },
            Some(MetaValue::Text(raw)) => raw,
        };

        let settings: Self = serde_json::from_str(raw).map_err(|e| invalid(&e.to_string()))?;
        if settings.image_name.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(settings))
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::InvalidMetadata {
        key: PARALLAX_META_KEY.to_owned(),
        reason: reason.to_owned(),
    }
}
