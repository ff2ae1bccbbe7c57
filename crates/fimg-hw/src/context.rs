//! Per-context hardware state

use fimg_mmio::RegisterIo;

use crate::fragment::FragmentState;
use crate::primitive::PrimitiveState;
use crate::raster::RasterState;
use crate::texture::TextureState;

/// Software copy of every programmable register group.
///
/// Each rendering context owns one. Encoders are reached through the
/// per-stage fields and keep them equal to what the device last saw, so
/// [`FimgContext::restore`] can bring a reset device back without any
/// recomputation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FimgContext {
    pub primitive: PrimitiveState,
    pub rasterizer: RasterState,
    pub texture: TextureState,
    pub fragment: FragmentState,
}

impl FimgContext {
    /// Create a context with the power-on defaults of every stage
    pub fn new() -> Self {
        tracing::debug!("Creating FIMG context");
        Self {
            primitive: PrimitiveState::new(),
            rasterizer: RasterState::new(),
            texture: TextureState::new(),
            fragment: FragmentState::new(),
        }
    }

    /// Replay the whole context. The caller must hold exclusive access to
    /// the device and know that it lost its state.
    pub fn restore<R: RegisterIo + ?Sized>(&self, io: &mut R) {
        tracing::debug!("Restoring FIMG context");
        self.primitive.restore(io);
        self.rasterizer.restore(io);
        self.texture.restore(io);
        self.fragment.restore(io);
    }

    /// Vertex attribute count (position included) last passed to
    /// [`PrimitiveState::set_vertex_context`]
    pub fn num_attribs(&self) -> u32 {
        self.primitive.num_attribs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveType;
    use crate::regs::{FGPE_VERTEX_CONTEXT, FGPF_FBW};
    use fimg_mmio::RecordingDevice;

    #[test]
    fn test_new_context_defaults() {
        let ctx = FimgContext::new();
        assert_eq!(ctx.primitive.center, 0.5);
        assert_eq!(ctx.rasterizer.point_width_max, 2048.0);
        assert_eq!(ctx.num_attribs(), 0);
        assert_eq!(ctx, FimgContext::default());
    }

    #[test]
    fn test_restore_runs_stages_in_order() {
        let mut dev = RecordingDevice::new();
        let mut ctx = FimgContext::new();
        ctx.primitive
            .set_vertex_context(&mut dev, PrimitiveType::Triangles, 4);
        assert_eq!(ctx.num_attribs(), 4);
        dev.clear();

        ctx.restore(&mut dev);
        let writes = dev.writes();
        assert_eq!(writes.first().map(|w| w.offset), Some(FGPE_VERTEX_CONTEXT));
        assert_eq!(writes.last().map(|w| w.offset), Some(FGPF_FBW));
        assert_eq!(writes.len(), 7 + 13 + (8 * 18 + 4 + 8) + 15);
    }
}
