//! FIMG-3DSE pipeline state encoders
//!
//! Each pipeline stage keeps a software mirror of its registers. Encoders
//! update the mirror and issue the corresponding register writes; the
//! `restore` functions replay the mirror after the device lost its state.

mod bits;

pub mod context;
pub mod fragment;
pub mod global;
pub mod primitive;
pub mod raster;
pub mod regs;
pub mod texture;

pub use context::FimgContext;
pub use fimg_mmio::RegisterIo;
pub use fragment::FragmentState;
pub use primitive::{PrimitiveState, PrimitiveType};
pub use raster::{CullFace, RasterState};
pub use texture::{TexControl, TexUnitParams, TextureState};
