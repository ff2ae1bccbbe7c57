//! Backing surfaces and images for render targets and textures
//!
//! The allocation and windowing layers own these objects; the driver only
//! needs the narrow capability interface in [`Surface`] and the shared
//! lifetime rules of [`Image`].

pub mod image;
pub mod surface;

pub use image::{Image, ImageInfo, ImageRef};
pub use surface::{ExternalSurface, LocalSurface, LockUsage, Surface};
