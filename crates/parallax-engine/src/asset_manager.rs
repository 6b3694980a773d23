//! Backdrop image loading.
//!
//! Images are named by asset name and live as `<image_dir>/<name>.png`.
//! Each request decodes on its own background thread; finished loads are
//! picked up by [`AssetManager::poll`], which the host calls once per frame
//! before updating the backdrop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use image::RgbaImage;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use parallax_common::{ImageError, ImageHandle, ParallaxResult, PixelRect, PixelSize};
use parallax_kernel::{ImageProvider, Surface};

/// Extension appended to asset names.
const IMAGE_EXTENSION: &str = "png";

/// Asset loading status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetLoadStatus {
    /// Never requested
    NotLoaded,
    /// Decoding in the background
    Loading,
    /// Pixels available
    Loaded,
    /// Failed to load; stays failed
    Failed,
}

/// Outcome of one background load.
struct LoadResult {
    handle: ImageHandle,
    name: String,
    result: ParallaxResult<RgbaImage>,
}

/// Loads backdrop images and serves them to the tile grid.
pub struct AssetManager {
    /// Directory searched for `<name>.png`
    image_dir: PathBuf,
    /// Name -> handle, one handle per name
    handles: AHashMap<String, ImageHandle>,
    /// Per-handle status
    status: AHashMap<ImageHandle, AssetLoadStatus>,
    /// Decoded pixels
    images: Arc<RwLock<AHashMap<ImageHandle, RgbaImage>>>,
    results_tx: Sender<LoadResult>,
    results_rx: Receiver<LoadResult>,
}

impl AssetManager {
    /// Creates a manager reading from `image_dir`.
    #[must_use]
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self {
            image_dir: image_dir.into(),
            handles: AHashMap::new(),
            status: AHashMap::new(),
            images: Arc::new(RwLock::new(AHashMap::new())),
            results_tx,
            results_rx,
        }
    }

    /// Directory images are read from.
    #[must_use]
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// File an asset name resolves to.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.image_dir.join(format!("{name}.{IMAGE_EXTENSION}"))
    }

    /// Registers an already decoded image. Ready immediately.
    pub fn insert_image(&mut self, name: &str, image: RgbaImage) -> ImageHandle {
        let handle = self.handle_for(name);
        debug!(
            "Inserted image '{name}' ({}x{}) as {handle}",
            image.width(),
            image.height()
        );
        self.images.write().insert(handle, image);
        self.status.insert(handle, AssetLoadStatus::Loaded);
        handle
    }

    /// Loading status of `handle`.
    #[must_use]
    pub fn status(&self, handle: ImageHandle) -> AssetLoadStatus {
        self.status
            .get(&handle)
            .copied()
            .unwrap_or(AssetLoadStatus::NotLoaded)
    }

    /// Applies finished background loads. Returns how many completed.
    pub fn poll(&mut self) -> usize {
        let mut completed = 0;
        while let Ok(result) = self.results_rx.try_recv() {
            self.apply(result);
            completed += 1;
        }
        completed
    }

    /// Blocks until `handle` leaves [`AssetLoadStatus::Loading`] or
    /// `timeout` elapses, applying any loads that finish meanwhile.
    pub fn wait_for(&mut self, handle: ImageHandle, timeout: Duration) -> AssetLoadStatus {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.status(handle) == AssetLoadStatus::Loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results_rx.recv_timeout(remaining) {
                Ok(result) => self.apply(result),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        self.status(handle)
    }

    /// Number of images with pixels available.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.images.read().len()
    }

    fn apply(&mut self, load: LoadResult) {
        match load.result {
            Ok(image) => {
                info!(
                    "Loaded image '{}' ({}x{})",
                    load.name,
                    image.width(),
                    image.height()
                );
                self.images.write().insert(load.handle, image);
                self.status.insert(load.handle, AssetLoadStatus::Loaded);
            },
            Err(e) => {
                warn!("Failed to load image '{}': {e}", load.name);
                self.status.insert(load.handle, AssetLoadStatus::Failed);
            },
        }
    }

    fn handle_for(&mut self, name: &str) -> ImageHandle {
        *self
            .handles
            .entry(name.to_owned())
            .or_insert_with(ImageHandle::new)
    }

    fn spawn_load(&mut self, handle: ImageHandle, name: &str) {
        let path = self.path_for(name);
        let job = LoadJob {
            handle,
            name: name.to_owned(),
            path,
        };
        let tx = self.results_tx.clone();

        let spawned = thread::Builder::new()
            .name("parallax-loader".to_owned())
            .spawn({
                let job = job.clone();
                move || {
                    let result = job.run();
                    // Receiver gone means the manager was dropped
                    let _ = tx.send(result);
                }
            });

        if let Err(e) = spawned {
            warn!("Failed to spawn loader thread, loading inline: {e}");
            let result = job.run();
            self.apply(result);
        }
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new(PathBuf::from("img/parallaxes"))
    }
}

impl std::fmt::Debug for AssetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetManager")
            .field("image_dir", &self.image_dir)
            .field("requested", &self.handles.len())
            .field("loaded", &self.loaded_count())
            .finish()
    }
}

impl ImageProvider for AssetManager {
    fn request_image(&mut self, name: &str) -> ImageHandle {
        if let Some(&handle) = self.handles.get(name) {
            return handle;
        }
        let handle = self.handle_for(name);
        self.status.insert(handle, AssetLoadStatus::Loading);
        info!("Loading image '{name}' from {}", self.path_for(name).display());
        self.spawn_load(handle, name);
        handle
    }

    fn is_ready(&self, handle: ImageHandle) -> bool {
        self.status(handle) == AssetLoadStatus::Loaded
    }

    fn dimensions(&self, handle: ImageHandle) -> Option<PixelSize> {
        self.images
            .read()
            .get(&handle)
            .map(|image| PixelSize::new(image.width(), image.height()))
    }

    fn copy_region(
        &self,
        handle: ImageHandle,
        src: PixelRect,
        dest: &mut Surface,
        dest_offset: (u32, u32),
    ) {
        let images = self.images.read();
        let Some(image) = images.get(&handle) else {
            warn!("Copy requested from {handle}, which has no pixels");
            return;
        };
        dest.blit(
            image,
            src,
            i64::from(dest_offset.0),
            i64::from(dest_offset.1),
        );
    }
}

/// One image to decode.
#[derive(Debug, Clone)]
struct LoadJob {
    handle: ImageHandle,
    name: String,
    path: PathBuf,
}

impl LoadJob {
    fn run(self) -> LoadResult {
        let result = decode_file(&self.path);
        LoadResult {
            handle: self.handle,
            name: self.name,
            result,
        }
    }
}

/// Reads and decodes an image file into RGBA8.
pub fn decode_file(path: &Path) -> ParallaxResult<RgbaImage> {
    if !path.exists() {
        return Err(ImageError::NotFound(path.display().to_string()).into());
    }
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| ImageError::Decode(format!("{}: {e}", path.display())))?;
    Ok(image.to_rgba8())
}
