//! Per-fragment unit: scissor, alpha, stencil and depth tests, blending,
//! logic ops, write masks and frame buffer setup

use fimg_mmio::RegisterIo;
use fimg_surface::Surface;

use crate::bits::{bitfield, register_word};
use crate::regs::*;

/// Comparison used by the alpha and depth tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TestMode {
    Never = 0,
    Always,
    Less,
    LEqual,
    Equal,
    Greater,
    GEqual,
    NotEqual,
}

/// Stencil comparison. The hardware orders these differently from
/// [`TestMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StencilMode {
    Never = 0,
    Always,
    Greater,
    GEqual,
    Equal,
    Less,
    LEqual,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StencilAction {
    Keep = 0,
    Zero,
    Replace,
    Incr,
    Decr,
    Invert,
    IncrWrap,
    DecrWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BlendEquation {
    Add = 0,
    Sub,
    RevSub,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BlendFunc {
    Zero = 0,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstColor,
    OneMinusConstColor,
    ConstAlpha,
    OneMinusConstAlpha,
    SrcAlphaSaturate,
}

impl BlendFunc {
    /// Equivalent factor for a target without an alpha channel, where
    /// destination alpha always reads as one
    pub fn without_dst_alpha(self) -> Self {
        match self {
            BlendFunc::DstAlpha => BlendFunc::One,
            BlendFunc::OneMinusDstAlpha | BlendFunc::SrcAlphaSaturate => BlendFunc::Zero,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LogicOp {
    Clear = 0,
    And,
    AndReverse,
    Copy,
    AndInverted,
    Noop,
    Xor,
    Or,
    Nor,
    Equiv,
    Invert,
    OrReverse,
    CopyInverted,
    OrInverted,
    Nand,
    Set,
}

/// Frame buffer pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ColorMode {
    Rgb555 = 0,
    Rgb565,
    Argb4444,
    Argb1555,
    Xrgb0888,
    Argb8888,
}

register_word! {
    /// `FGPF_SCISSOR_X` / `FGPF_SCISSOR_Y`; only the X word has an enable
    ScissorRange
}

impl ScissorRange {
    bitfield!(enable, set_enable: 31, 1);
    bitfield!(max, set_max: 16, 12);
    bitfield!(min, set_min: 0, 12);
}

register_word! {
    /// `FGPF_ALPHAT`
    AlphaTest
}

impl AlphaTest {
    bitfield!(value, set_value: 4, 8);
    bitfield!(mode, set_mode: 1, 3);
    bitfield!(enable, set_enable: 0, 1);
}

register_word! {
    /// `FGPF_FRONTST` / `FGPF_BACKST`; only the front word has an enable
    StencilTest
}

impl StencilTest {
    bitfield!(dppass, set_dppass: 29, 3);
    bitfield!(dpfail, set_dpfail: 26, 3);
    bitfield!(sfail, set_sfail: 23, 3);
    bitfield!(mask, set_mask: 12, 8);
    bitfield!(reference, set_reference: 4, 8);
    bitfield!(mode, set_mode: 1, 3);
    bitfield!(enable, set_enable: 0, 1);

    fn set_func(&mut self, mode: StencilMode, reference: u8, mask: u8) {
        self.set_mode(mode as u32);
        self.set_reference(reference as u32);
        self.set_mask(mask as u32);
    }

    fn set_op(&mut self, sfail: StencilAction, dpfail: StencilAction, dppass: StencilAction) {
        self.set_sfail(sfail as u32);
        self.set_dpfail(dpfail as u32);
        self.set_dppass(dppass as u32);
    }
}

register_word! {
    /// `FGPF_DEPTHT`
    DepthTest
}

impl DepthTest {
    bitfield!(mode, set_mode: 1, 3);
    bitfield!(enable, set_enable: 0, 1);
}

register_word! {
    /// `FGPF_BLEND`
    Blend
}

impl Blend {
    bitfield!(alpha_equation, set_alpha_equation: 20, 3);
    bitfield!(color_equation, set_color_equation: 17, 3);
    bitfield!(alpha_dst, set_alpha_dst: 13, 4);
    bitfield!(color_dst, set_color_dst: 9, 4);
    bitfield!(alpha_src, set_alpha_src: 5, 4);
    bitfield!(color_src, set_color_src: 1, 4);
    bitfield!(enable, set_enable: 0, 1);
}

register_word! {
    /// `FGPF_LOGOP`
    LogicOpControl
}

impl LogicOpControl {
    bitfield!(alpha, set_alpha: 5, 4);
    bitfield!(color, set_color: 1, 4);
    bitfield!(enable, set_enable: 0, 1);
}

register_word! {
    /// `FGPF_CBMSK`: a set bit masks the channel out
    ColorMask
}

impl ColorMask {
    bitfield!(r, set_r: 3, 1);
    bitfield!(g, set_g: 2, 1);
    bitfield!(b, set_b: 1, 1);
    bitfield!(a, set_a: 0, 1);
}

register_word! {
    /// `FGPF_DBMSK`
    DepthStencilMask
}

impl DepthStencilMask {
    bitfield!(back_stencil, set_back_stencil: 24, 8);
    bitfield!(front_stencil, set_front_stencil: 16, 8);
    // Set to mask depth writes out
    bitfield!(depth, set_depth: 0, 1);
}

register_word! {
    /// `FGPF_FBCTL`
    FrameBufferControl
}

impl FrameBufferControl {
    bitfield!(opaque_alpha, set_opaque_alpha: 20, 1);
    bitfield!(alpha_threshold, set_alpha_threshold: 12, 8);
    bitfield!(const_alpha, set_const_alpha: 4, 8);
    bitfield!(dither, set_dither: 3, 1);
    bitfield!(color_mode, set_color_mode: 0, 3);
}

/// Per-fragment unit part of the context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentState {
    pub scissor_x: ScissorRange,
    pub scissor_y: ScissorRange,
    pub alpha: AlphaTest,
    pub front_stencil: StencilTest,
    pub back_stencil: StencilTest,
    pub depth: DepthTest,
    /// RGBA8888 constant colour
    pub blend_color: u32,
    pub blend: Blend,
    pub logic_op: LogicOpControl,
    pub color_mask: ColorMask,
    pub depth_stencil_mask: DepthStencilMask,
    pub fbctl: FrameBufferControl,

    // Render targets
    pub depth_addr: u32,
    pub color_addr: u32,
    pub fb_width: u32,
}

impl FragmentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scissor_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        x_max: u32,
        x_min: u32,
        y_max: u32,
        y_min: u32,
    ) {
        self.scissor_x.set_max(x_max);
        self.scissor_x.set_min(x_min);
        self.scissor_y.set_max(y_max);
        self.scissor_y.set_min(y_min);

        tracing::trace!("Scissor: x {}..{}, y {}..{}", x_min, x_max, y_min, y_max);
        io.write(FGPF_SCISSOR_X, self.scissor_x.bits());
        io.write(FGPF_SCISSOR_Y, self.scissor_y.bits());
    }

    pub fn set_scissor_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.scissor_x.set_enable(enable as u32);
        io.write(FGPF_SCISSOR_X, self.scissor_x.bits());
    }

    pub fn set_alpha_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        ref_alpha: u8,
        mode: TestMode,
    ) {
        self.alpha.set_value(ref_alpha as u32);
        self.alpha.set_mode(mode as u32);
        io.write(FGPF_ALPHAT, self.alpha.bits());
    }

    pub fn set_alpha_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.alpha.set_enable(enable as u32);
        io.write(FGPF_ALPHAT, self.alpha.bits());
    }

    pub fn set_front_stencil_func<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        mode: StencilMode,
        reference: u8,
        mask: u8,
    ) {
        self.front_stencil.set_func(mode, reference, mask);
        io.write(FGPF_FRONTST, self.front_stencil.bits());
    }

    pub fn set_front_stencil_op<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        sfail: StencilAction,
        dpfail: StencilAction,
        dppass: StencilAction,
    ) {
        self.front_stencil.set_op(sfail, dpfail, dppass);
        io.write(FGPF_FRONTST, self.front_stencil.bits());
    }

    pub fn set_back_stencil_func<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        mode: StencilMode,
        reference: u8,
        mask: u8,
    ) {
        self.back_stencil.set_func(mode, reference, mask);
        io.write(FGPF_BACKST, self.back_stencil.bits());
    }

    pub fn set_back_stencil_op<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        sfail: StencilAction,
        dpfail: StencilAction,
        dppass: StencilAction,
    ) {
        self.back_stencil.set_op(sfail, dpfail, dppass);
        io.write(FGPF_BACKST, self.back_stencil.bits());
    }

    /// Enables the stencil test for both faces
    pub fn set_stencil_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.front_stencil.set_enable(enable as u32);
        io.write(FGPF_FRONTST, self.front_stencil.bits());
    }

    pub fn set_depth_params<R: RegisterIo + ?Sized>(&mut self, io: &mut R, mode: TestMode) {
        self.depth.set_mode(mode as u32);
        io.write(FGPF_DEPTHT, self.depth.bits());
    }

    pub fn set_depth_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.depth.set_enable(enable as u32);
        io.write(FGPF_DEPTHT, self.depth.bits());
    }

    pub fn set_blend_equation<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        alpha: BlendEquation,
        color: BlendEquation,
    ) {
        self.blend.set_alpha_equation(alpha as u32);
        self.blend.set_color_equation(color as u32);
        io.write(FGPF_BLEND, self.blend.bits());
    }

    pub fn set_blend_func<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        src_alpha: BlendFunc,
        src_color: BlendFunc,
        dst_alpha: BlendFunc,
        dst_color: BlendFunc,
    ) {
        self.blend.set_alpha_src(src_alpha as u32);
        self.blend.set_color_src(src_color as u32);
        self.blend.set_alpha_dst(dst_alpha as u32);
        self.blend.set_color_dst(dst_color as u32);

        tracing::trace!(
            "Blend func: src {:?}/{:?}, dst {:?}/{:?}",
            src_color,
            src_alpha,
            dst_color,
            dst_alpha
        );
        io.write(FGPF_BLEND, self.blend.bits());
    }

    /// Blend factors for an RGB565 target, which has no alpha channel
    pub fn set_blend_func_rgb565<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        src_alpha: BlendFunc,
        src_color: BlendFunc,
        dst_alpha: BlendFunc,
        dst_color: BlendFunc,
    ) {
        self.set_blend_func(
            io,
            src_alpha.without_dst_alpha(),
            src_color.without_dst_alpha(),
            dst_alpha.without_dst_alpha(),
            dst_color.without_dst_alpha(),
        );
    }

    pub fn set_blend_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.blend.set_enable(enable as u32);
        io.write(FGPF_BLEND, self.blend.bits());
    }

    pub fn set_blend_color<R: RegisterIo + ?Sized>(&mut self, io: &mut R, rgba: u32) {
        self.blend_color = rgba;
        io.write(FGPF_CCLR, rgba);
    }

    pub fn set_dither_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.fbctl.set_dither(enable as u32);
        io.write(FGPF_FBCTL, self.fbctl.bits());
    }

    pub fn set_logical_op_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        alpha: LogicOp,
        color: LogicOp,
    ) {
        self.logic_op.set_alpha(alpha as u32);
        self.logic_op.set_color(color as u32);
        io.write(FGPF_LOGOP, self.logic_op.bits());
    }

    pub fn set_logical_op_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.logic_op.set_enable(enable as u32);
        io.write(FGPF_LOGOP, self.logic_op.bits());
    }

    /// `true` lets the channel be written
    pub fn set_color_buf_write_mask<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        r: bool,
        g: bool,
        b: bool,
        a: bool,
    ) {
        self.color_mask.set_r(!r as u32);
        self.color_mask.set_g(!g as u32);
        self.color_mask.set_b(!b as u32);
        self.color_mask.set_a(!a as u32);
        io.write(FGPF_CBMSK, self.color_mask.bits());
    }

    pub fn set_stencil_buf_write_mask<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        back: bool,
        mask: u8,
    ) {
        if back {
            self.depth_stencil_mask.set_back_stencil(mask as u32);
        } else {
            self.depth_stencil_mask.set_front_stencil(mask as u32);
        }
        io.write(FGPF_DBMSK, self.depth_stencil_mask.bits());
    }

    /// `true` lets depth values be written
    pub fn set_z_buf_write_mask<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.depth_stencil_mask.set_depth(!enable as u32);
        io.write(FGPF_DBMSK, self.depth_stencil_mask.bits());
    }

    /// The dither bit keeps its current value
    pub fn set_frame_buf_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        opaque_alpha: bool,
        threshold_alpha: u8,
        const_alpha: u8,
        format: ColorMode,
    ) {
        self.fbctl.set_opaque_alpha(opaque_alpha as u32);
        self.fbctl.set_alpha_threshold(threshold_alpha as u32);
        self.fbctl.set_const_alpha(const_alpha as u32);
        self.fbctl.set_color_mode(format as u32);

        tracing::trace!("Frame buffer format {:?}", format);
        io.write(FGPF_FBCTL, self.fbctl.bits());
    }

    pub fn set_z_buf_base_addr<R: RegisterIo + ?Sized>(&mut self, io: &mut R, addr: u32) {
        self.depth_addr = addr;
        io.write(FGPF_DBADDR, addr);
    }

    pub fn set_color_buf_base_addr<R: RegisterIo + ?Sized>(&mut self, io: &mut R, addr: u32) {
        self.color_addr = addr;
        io.write(FGPF_CBADDR, addr);
    }

    /// Width of the frame buffer in pixels
    pub fn set_frame_buf_width<R: RegisterIo + ?Sized>(&mut self, io: &mut R, width: u32) {
        self.fb_width = width;
        io.write(FGPF_FBW, width);
    }

    /// Render into `surface`
    pub fn bind_color_surface<R: RegisterIo + ?Sized>(&mut self, io: &mut R, surface: &dyn Surface) {
        tracing::debug!(
            "Binding colour buffer: {} bytes @ 0x{:08x}",
            surface.size(),
            surface.device_address()
        );
        self.set_color_buf_base_addr(io, surface.device_address());
    }

    /// Use `surface` as the depth/stencil buffer
    pub fn bind_depth_surface<R: RegisterIo + ?Sized>(&mut self, io: &mut R, surface: &dyn Surface) {
        tracing::debug!(
            "Binding depth buffer: {} bytes @ 0x{:08x}",
            surface.size(),
            surface.device_address()
        );
        self.set_z_buf_base_addr(io, surface.device_address());
    }

    pub fn restore<R: RegisterIo + ?Sized>(&self, io: &mut R) {
        tracing::debug!("Restoring per-fragment state");
        io.write(FGPF_SCISSOR_X, self.scissor_x.bits());
        io.write(FGPF_SCISSOR_Y, self.scissor_y.bits());
        io.write(FGPF_ALPHAT, self.alpha.bits());
        io.write(FGPF_FRONTST, self.front_stencil.bits());
        io.write(FGPF_BACKST, self.back_stencil.bits());
        io.write(FGPF_DEPTHT, self.depth.bits());
        io.write(FGPF_CCLR, self.blend_color);
        io.write(FGPF_BLEND, self.blend.bits());
        io.write(FGPF_LOGOP, self.logic_op.bits());
        io.write(FGPF_CBMSK, self.color_mask.bits());
        io.write(FGPF_DBMSK, self.depth_stencil_mask.bits());
        io.write(FGPF_FBCTL, self.fbctl.bits());
        io.write(FGPF_DBADDR, self.depth_addr);
        io.write(FGPF_CBADDR, self.color_addr);
        io.write(FGPF_FBW, self.fb_width);
    }
}
