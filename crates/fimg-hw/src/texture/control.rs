//! Texture unit control words

use crate::bits::{bitfield, register_word};

/// `FGTU_TSTA` texture type
pub mod tex_type {
    pub const TYPE_2D: u32 = 1;
    pub const CUBE: u32 = 2;
    pub const TYPE_3D: u32 = 3;
}

/// MSB expansion of texels narrower than 8 bits per channel
pub mod tex_exp {
    pub const DUP: u32 = 0;
    pub const ZERO: u32 = 1;
}

pub mod alpha_fmt {
    pub const ARGB: u32 = 0;
    pub const RGBA: u32 = 1;
}

pub mod palette_fmt {
    pub const P1555: u32 = 0;
    pub const P565: u32 = 1;
    pub const P4444: u32 = 2;
    pub const P8888: u32 = 3;
}

/// `FGTU_TSTA` texture format
pub mod texture_fmt {
    pub const T1555: u32 = 0;
    pub const T565: u32 = 1;
    pub const T4444: u32 = 2;
    pub const DEPTHCOMP16: u32 = 3;
    pub const T88: u32 = 4;
    pub const T8: u32 = 5;
    pub const T8888: u32 = 6;
    pub const BPP1: u32 = 7;
    pub const BPP2: u32 = 8;
    pub const BPP4: u32 = 9;
    pub const BPP8: u32 = 10;
    pub const S3TC: u32 = 11;
    pub const Y1VY0U: u32 = 12;
    pub const VY1UY0: u32 = 13;
    pub const Y1UY0V: u32 = 14;
    pub const UY1VY0: u32 = 15;
}

/// U/V/P addressing modes, also used by vertex texture units
pub mod addr_mode {
    pub const REPEAT: u32 = 0;
    pub const FLIP: u32 = 1;
    pub const CLAMP: u32 = 2;
}

pub mod tex_coord {
    pub const PARAM: u32 = 0;
    pub const NON_PARAM: u32 = 1;
}

pub mod mipmap {
    pub const DISABLED: u32 = 0;
    pub const NEAREST: u32 = 1;
    pub const LINEAR: u32 = 2;
}

register_word! {
    /// `FGTU_TSTA`: per-unit texture status
    TexControl
}

impl TexControl {
    bitfield!(tex_type, set_tex_type: 27, 2);
    bitfield!(clr_key_sel, set_clr_key_sel: 22, 1);
    bitfield!(clr_key_en, set_clr_key_en: 21, 1);
    bitfield!(tex_exp, set_tex_exp: 20, 1);
    bitfield!(alpha_fmt, set_alpha_fmt: 19, 1);
    bitfield!(palette_fmt, set_palette_fmt: 17, 2);
    bitfield!(texture_fmt, set_texture_fmt: 12, 5);
    bitfield!(u_addr_mode, set_u_addr_mode: 10, 2);
    bitfield!(v_addr_mode, set_v_addr_mode: 8, 2);
    bitfield!(p_addr_mode, set_p_addr_mode: 6, 2);
    bitfield!(tex_coord_sys, set_tex_coord_sys: 4, 1);
    bitfield!(mag_filter, set_mag_filter: 3, 1);
    bitfield!(min_filter, set_min_filter: 2, 1);
    bitfield!(use_mipmap, set_use_mipmap: 0, 2);
}

register_word! {
    /// `FGTU_VTSTA`: vertex texture unit status
    VtxTexControl
}

impl VtxTexControl {
    bitfield!(u_mod, set_u_mod: 10, 2);
    bitfield!(v_mod, set_v_mod: 8, 2);
    // log2 of the size
    bitfield!(u_size, set_u_size: 4, 4);
    bitfield!(v_size, set_v_size: 0, 4);
}

register_word! {
    /// `FGTU_CKEY`
    ColorKey
}

impl ColorKey {
    bitfield!(r, set_r: 16, 8);
    bitfield!(g, set_g: 8, 8);
    bitfield!(b, set_b: 0, 8);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        let mut key = Self::default();
        key.set_r(r as u32);
        key.set_g(g as u32);
        key.set_b(b as u32);
        key
    }
}

register_word! {
    /// `FGTU_CKYUV`
    ColorKeyYuv
}

impl ColorKeyYuv {
    bitfield!(u, set_u: 8, 8);
    bitfield!(v, set_v: 0, 8);

    pub fn new(u: u8, v: u8) -> Self {
        let mut key = Self::default();
        key.set_u(u as u32);
        key.set_v(v as u32);
        key
    }
}
