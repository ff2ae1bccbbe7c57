//! Primitive engine: vertex context, viewport and depth range

use fimg_mmio::RegisterIo;

use crate::bits::{bitfield, register_word};
use crate::regs::*;

/// Primitive selector, one-hot as the hardware expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PrimitiveType {
    PointSprite = 1 << 0,
    Points = 1 << 1,
    LineStrip = 1 << 2,
    LineLoop = 1 << 3,
    Lines = 1 << 4,
    TriangleStrip = 1 << 5,
    TriangleFan = 1 << 6,
    Triangles = 1 << 7,
}

register_word! {
    /// `FGPE_VERTEX_CONTEXT`
    VertexContext
}

impl VertexContext {
    bitfield!(
        /// One-hot [`PrimitiveType`] selector
        prim_type, set_prim_type: 19, 8
    );
    bitfield!(
        /// Output attribute count, position excluded
        vs_out, set_vs_out: 0, 4
    );
}

/// Primitive engine part of the context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveState {
    pub vctx: VertexContext,
    /// Attribute count including position, for the vertex fetch stage
    pub num_attribs: u32,

    // Viewport
    pub ox: f32,
    pub oy: f32,
    pub half_px: f32,
    pub half_py: f32,

    // Depth range
    pub half_distance: f32,
    pub center: f32,
}

impl Default for PrimitiveState {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveState {
    /// Context creation defaults; touches no register
    pub fn new() -> Self {
        Self {
            vctx: VertexContext::default(),
            num_attribs: 0,
            ox: 0.0,
            oy: 0.0,
            half_px: 0.0,
            half_py: 0.0,
            half_distance: 0.5,
            center: 0.5,
        }
    }

    /// Select the primitive type and the number of vertex attributes
    /// (position included)
    pub fn set_vertex_context<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        prim: PrimitiveType,
        count: u32,
    ) {
        self.vctx.set_prim_type(prim as u32);
        self.vctx.set_vs_out(count.wrapping_sub(1));
        self.num_attribs = count;

        tracing::trace!("Vertex context: {:?}, {} attributes", prim, count);
        io.write(FGPE_VERTEX_CONTEXT, self.vctx.bits());
    }

    pub fn set_viewport_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        x0: f32,
        y0: f32,
        px: f32,
        py: f32,
    ) {
        let half_px = px * 0.5;
        let half_py = py * 0.5;

        self.ox = x0 + half_px;
        self.oy = y0 + half_py;
        self.half_px = half_px;
        self.half_py = half_py;

        tracing::trace!("Viewport: origin ({}, {}), size {}x{}", x0, y0, px, py);
        io.write_f32(FGPE_VIEWPORT_OX, self.ox);
        io.write_f32(FGPE_VIEWPORT_OY, self.oy);
        io.write_f32(FGPE_VIEWPORT_HALF_PX, self.half_px);
        io.write_f32(FGPE_VIEWPORT_HALF_PY, self.half_py);
    }

    /// `n` and `f` are expected in [0, 1]; not checked here
    pub fn set_depth_range<R: RegisterIo + ?Sized>(&mut self, io: &mut R, n: f32, f: f32) {
        self.half_distance = (f - n) * 0.5;
        self.center = (f + n) * 0.5;

        tracing::trace!("Depth range: [{}, {}]", n, f);
        io.write_f32(FGPE_DEPTHRANGE_HALF_F_SUB_N, self.half_distance);
        io.write_f32(FGPE_DEPTHRANGE_HALF_F_ADD_N, self.center);
    }

    pub fn restore<R: RegisterIo + ?Sized>(&self, io: &mut R) {
        tracing::debug!("Restoring primitive engine state");
        io.write(FGPE_VERTEX_CONTEXT, self.vctx.bits());
        io.write_f32(FGPE_VIEWPORT_OX, self.ox);
        io.write_f32(FGPE_VIEWPORT_OY, self.oy);
        io.write_f32(FGPE_VIEWPORT_HALF_PX, self.half_px);
        io.write_f32(FGPE_VIEWPORT_HALF_PY, self.half_py);
        io.write_f32(FGPE_DEPTHRANGE_HALF_F_SUB_N, self.half_distance);
        io.write_f32(FGPE_DEPTHRANGE_HALF_F_ADD_N, self.center);
    }
}
