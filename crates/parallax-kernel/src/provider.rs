//! Image provider interface consumed by the tile grid.
//!
//! The grid never loads or owns the source image. It holds an
//! [`ImageHandle`] and asks a provider, once per frame, whether the pixels
//! are ready and to copy regions out of them.

use std::cell::Cell;
use std::collections::HashMap;

use image::RgbaImage;
use parallax_common::{ImageHandle, PixelRect, PixelSize};

use crate::surface::Surface;

/// Source of images for the backdrop.
pub trait ImageProvider {
    /// Starts loading `name` and returns a handle immediately.
    fn request_image(&mut self, name: &str) -> ImageHandle;

    /// True once the pixels behind `handle` can be sampled.
    fn is_ready(&self, handle: ImageHandle) -> bool;

    /// Size of a ready image.
    fn dimensions(&self, handle: ImageHandle) -> Option<PixelSize>;

    /// Copies `src` out of the image into `dest` at `dest_offset`.
    fn copy_region(
        &self,
        handle: ImageHandle,
        src: PixelRect,
        dest: &mut Surface,
        dest_offset: (u32, u32),
    );
}

/// Provider over images that are already decoded in memory.
///
/// Images can be held back to model a load that has not finished. Every
/// call to [`ImageProvider::copy_region`] is counted.
#[derive(Debug, Default)]
pub struct MemoryImages {
    handles: HashMap<String, ImageHandle>,
    images: HashMap<ImageHandle, RgbaImage>,
    held: Vec<ImageHandle>,
    copies: Cell<usize>,
}

impl MemoryImages {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `name`, replacing any previous pixels.
    pub fn insert(&mut self, name: &str, image: RgbaImage) -> ImageHandle {
        let handle = self.handle_for(name);
        self.images.insert(handle, image);
        handle
    }

    /// Marks an image as still loading.
    pub fn hold(&mut self, handle: ImageHandle) {
        if !self.held.contains(&handle) {
            self.held.push(handle);
        }
    }

    /// Marks a held image as loaded.
    pub fn release(&mut self, handle: ImageHandle) {
        self.held.retain(|h| *h != handle);
    }

    /// Number of region copies served so far.
    #[must_use]
    pub fn copy_count(&self) -> usize {
        self.copies.get()
    }

    /// Resets the copy counter.
    pub fn reset_copy_count(&self) {
        self.copies.set(0);
    }

    fn handle_for(&mut self, name: &str) -> ImageHandle {
        *self
            .handles
            .entry(name.to_owned())
            .or_insert_with(ImageHandle::new)
    }
}

impl ImageProvider for MemoryImages {
    fn request_image(&mut self, name: &str) -> ImageHandle {
        self.handle_for(name)
    }

    fn is_ready(&self, handle: ImageHandle) -> bool {
        self.images.contains_key(&handle) && !self.held.contains(&handle)
    }

    fn dimensions(&self, handle: ImageHandle) -> Option<PixelSize> {
        self.images
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
        if let Some(image) = self.images.get(&handle) {
            self.copies.set(self.copies.get() + 1);
            dest.blit(
                image,
                src,
                i64::from(dest_offset.0),
                i64::from(dest_offset.1),
            );
        }
    }
}
