//! FIMG-3DSE register map
//!
//! Byte offsets into the 0x80000 byte register window.

// Global block
pub const FGGB_PIPESTATE: u32 = 0x00000;
pub const FGGB_CACHECTL: u32 = 0x00004;
pub const FGGB_RST: u32 = 0x00008;
pub const FGGB_VERSION: u32 = 0x00010;
pub const FGGB_INTPENDING: u32 = 0x00040;
pub const FGGB_INTMASK: u32 = 0x00044;
pub const FGGB_PIPEMASK: u32 = 0x00048;
pub const FGGB_PIPETGTSTATE: u32 = 0x0004c;

// Primitive engine
pub const FGPE_VERTEX_CONTEXT: u32 = 0x30000;
pub const FGPE_VIEWPORT_OX: u32 = 0x30004;
pub const FGPE_VIEWPORT_OY: u32 = 0x30008;
pub const FGPE_VIEWPORT_HALF_PX: u32 = 0x3000c;
pub const FGPE_VIEWPORT_HALF_PY: u32 = 0x30010;
pub const FGPE_DEPTHRANGE_HALF_F_SUB_N: u32 = 0x30014;
pub const FGPE_DEPTHRANGE_HALF_F_ADD_N: u32 = 0x30018;

// Raster engine
pub const FGRA_PIX_SAMP: u32 = 0x38000;
pub const FGRA_D_OFF_EN: u32 = 0x38004;
pub const FGRA_D_OFF_FACTOR: u32 = 0x38008;
pub const FGRA_D_OFF_UNITS: u32 = 0x3800c;
pub const FGRA_BFCULL: u32 = 0x38014;
pub const FGRA_YCLIP: u32 = 0x38018;
pub const FGRA_PWIDTH: u32 = 0x3801c;
pub const FGRA_PSIZE_MIN: u32 = 0x38020;
pub const FGRA_PSIZE_MAX: u32 = 0x38024;
pub const FGRA_COORDREPLACE: u32 = 0x38028;
pub const FGRA_LWIDTH: u32 = 0x3802c;
pub const FGRA_LODCTL: u32 = 0x3c000;
pub const FGRA_XCLIP: u32 = 0x3c004;

// Texture engine
const FGTU_UNIT_BASE: u32 = 0x60000;
const FGTU_UNIT_STRIDE: u32 = 0x50;

pub const fn fgtu_tsta(unit: usize) -> u32 {
    FGTU_UNIT_BASE + FGTU_UNIT_STRIDE * unit as u32
}

pub const fn fgtu_usize(unit: usize) -> u32 {
    fgtu_tsta(unit) + 0x04
}

pub const fn fgtu_vsize(unit: usize) -> u32 {
    fgtu_tsta(unit) + 0x08
}

pub const fn fgtu_psize(unit: usize) -> u32 {
    fgtu_tsta(unit) + 0x0c
}

/// Offset register of mipmap `level` (1..=11)
pub const fn fgtu_toffs(unit: usize, level: usize) -> u32 {
    fgtu_tsta(unit) + 0x10 + 4 * (level as u32 - 1)
}

pub const fn fgtu_t_min_l(unit: usize) -> u32 {
    fgtu_tsta(unit) + 0x3c
}

pub const fn fgtu_t_max_l(unit: usize) -> u32 {
    fgtu_tsta(unit) + 0x40
}

pub const fn fgtu_tbadd(unit: usize) -> u32 {
    fgtu_tsta(unit) + 0x44
}

pub const fn fgtu_ckey(slot: usize) -> u32 {
    0x60280 + 4 * slot as u32
}

pub const FGTU_CKYUV: u32 = 0x60288;
pub const FGTU_CKMASK: u32 = 0x6028c;
pub const FGTU_PALETTE_ADDR: u32 = 0x60290;
pub const FGTU_PALETTE_IN: u32 = 0x60294;

pub const fn fgtu_vtsta(unit: usize) -> u32 {
    0x602c0 + 8 * unit as u32
}

pub const fn fgtu_vtbaddr(unit: usize) -> u32 {
    0x602c4 + 8 * unit as u32
}

// Per-fragment unit
pub const FGPF_SCISSOR_X: u32 = 0x70000;
pub const FGPF_SCISSOR_Y: u32 = 0x70004;
pub const FGPF_ALPHAT: u32 = 0x70008;
pub const FGPF_FRONTST: u32 = 0x7000c;
pub const FGPF_BACKST: u32 = 0x70010;
pub const FGPF_DEPTHT: u32 = 0x70014;
pub const FGPF_CCLR: u32 = 0x70018;
pub const FGPF_BLEND: u32 = 0x7001c;
pub const FGPF_LOGOP: u32 = 0x70020;
pub const FGPF_CBMSK: u32 = 0x70024;
pub const FGPF_DBMSK: u32 = 0x70028;
pub const FGPF_FBCTL: u32 = 0x7002c;
pub const FGPF_DBADDR: u32 = 0x70030;
pub const FGPF_CBADDR: u32 = 0x70034;
pub const FGPF_FBW: u32 = 0x70038;
