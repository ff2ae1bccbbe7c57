//! Shared image lifetime
//!
//! An image is created by its owner (for example an EGL image object) and
//! connected to by every texture or render target that uses it. The owner
//! may terminate the image at any time; the backing surface is released only
//! once the last connection has gone away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::surface::Surface;

/// Layout of the pixels stored in an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub pixel_format: u32,
    /// Row pitch in pixels
    pub stride: u32,
    pub height: u32,
    /// Red and blue channels need swapping when sampled
    pub swap_needed: bool,
    pub is_argb: bool,
}

struct ImageShared {
    info: ImageInfo,
    surface: Arc<dyn Surface>,
    terminated: AtomicBool,
}

impl Drop for ImageShared {
    fn drop(&mut self) {
        tracing::debug!(
            "Releasing image {}x{} @ 0x{:08x}",
            self.info.stride,
            self.info.height,
            self.surface.device_address()
        );
    }
}

/// Owning handle of an image
pub struct Image {
    shared: Arc<ImageShared>,
}

/// A connection to an image held by one of its users
#[derive(Clone)]
pub struct ImageRef {
    shared: Arc<ImageShared>,
}

impl Image {
    pub fn new(info: ImageInfo, surface: Arc<dyn Surface>) -> Self {
        Self {
            shared: Arc::new(ImageShared {
                info,
                surface,
                terminated: AtomicBool::new(false),
            }),
        }
    }

    /// Connect a new user to the image
    pub fn connect(&self) -> ImageRef {
        ImageRef {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.shared.surface.is_valid()
    }

    pub fn info(&self) -> ImageInfo {
        self.shared.info
    }

    /// Number of users currently connected
    pub fn connections(&self) -> usize {
        Arc::strong_count(&self.shared) - 1
    }

    /// Terminate the image. Connected users keep it alive until they
    /// disconnect; with no users it is released immediately.
    pub fn terminate(self) {
        self.shared.terminated.store(true, Ordering::Release);
    }
}

impl ImageRef {
    pub fn info(&self) -> ImageInfo {
        self.shared.info
    }

    pub fn surface(&self) -> &Arc<dyn Surface> {
        &self.shared.surface
    }

    /// Whether the owner has terminated the image
    pub fn is_terminated(&self) -> bool {
        self.shared.terminated.load(Ordering::Acquire)
    }

    /// Valid while the backing surface is valid and the owner has not
    /// terminated the image
    pub fn is_valid(&self) -> bool {
        !self.is_terminated() && self.shared.surface.is_valid()
    }

    /// Drop this connection
    pub fn disconnect(self) {}
}
