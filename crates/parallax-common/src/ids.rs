//! Handles for images held by an image provider.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to an image owned by an image provider.
///
/// Handed out immediately by a load request; the pixels behind it may
/// arrive later. Every call to [`ImageHandle::new`] yields a distinct value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(u64);

impl ImageHandle {
    /// Allocates a handle no other image uses.
    #[allow(clippy::new_without_default)]
    #[must_use]
    pub fn new() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "image#{}", self.0)
    }
}
