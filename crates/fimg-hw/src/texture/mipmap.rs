//! Mipmap chain offsets
//!
//! Levels are stored back to back after the base image. Offsets are in
//! texels. Block based formats pad every level to a whole block.

use fimg_mmio::RegisterIo;

use super::control::texture_fmt;
use crate::regs::{fgtu_t_max_l, fgtu_t_min_l, fgtu_toffs};

/// Highest mipmap level the texture unit can address
pub const FGTU_MAX_MIPMAP_LEVEL: u32 = 11;

/// Storage granularity of a texture format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipmapLayout {
    /// Texel granular
    Generic,
    /// Packed YUV, two texel blocks
    Yuv,
    /// S3TC, sixteen texel blocks
    S3tc,
}

impl MipmapLayout {
    pub fn for_format(texture_fmt: u32) -> Self {
        match texture_fmt {
            texture_fmt::S3TC => MipmapLayout::S3tc,
            texture_fmt::Y1VY0U
            | texture_fmt::VY1UY0
            | texture_fmt::Y1UY0V
            | texture_fmt::UY1VY0 => MipmapLayout::Yuv,
            _ => MipmapLayout::Generic,
        }
    }

    /// Texels needed to round a level of `size` texels up to a whole block
    #[inline]
    pub fn padding(self, size: u32) -> u32 {
        match self {
            MipmapLayout::Generic => 0,
            MipmapLayout::Yuv => size % 2,
            MipmapLayout::S3tc => (16 - size % 16) % 16,
        }
    }
}

/// Result of a mipmap chain computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipmapChain {
    /// Offsets of levels 1.. in write order
    pub offsets: Vec<u32>,
    /// Number of levels achieved
    pub levels: u32,
}

/// Walk the chain for a `u_size` x `v_size` base image.
///
/// The loop is bounded by a check size starting at half the larger edge,
/// so a level is emitted for every halving of that edge until it reaches
/// zero or `max_level` levels exist. A level is always emitted before the
/// level count is compared. A `max_level` of zero requests the full chain,
/// which never exceeds `FGTU_MAX_MIPMAP_LEVEL` offset registers.
pub fn compute_chain(layout: MipmapLayout, u_size: u32, v_size: u32, max_level: u32) -> MipmapChain {
    let max_level = max_level.min(FGTU_MAX_MIPMAP_LEVEL);

    let mut u = u_size;
    let mut v = v_size;
    let mut size = u.wrapping_mul(v);
    let mut offset = size;
    let mut check = u.max(v) / 2;
    let mut levels = 0;
    let mut offsets = Vec::new();

    while check > 0 {
        offsets.push(offset);

        levels += 1;
        if levels == max_level || levels == FGTU_MAX_MIPMAP_LEVEL {
            break;
        }

        if u >= 2 {
            size /= 2;
            u /= 2;
        }

        if v >= 2 {
            size /= 2;
            v /= 2;
        }

        check /= 2;
        offset = offset.wrapping_add(size);
        offset = offset.wrapping_add(layout.padding(size));
    }

    MipmapChain { offsets, levels }
}

/// Program the mipmap chain of `unit` and return the achieved level count.
///
/// Writes each level offset starting at `FGTU_TOFFS_L1`, then zero to the
/// base level register and the level count to the max level register.
pub fn program_chain<R: RegisterIo + ?Sized>(
    io: &mut R,
    unit: usize,
    layout: MipmapLayout,
    u_size: u32,
    v_size: u32,
    max_level: u32,
) -> MipmapChain {
    if max_level > FGTU_MAX_MIPMAP_LEVEL {
        tracing::warn!(
            "Mipmap level {} clamped to {} on unit {}",
            max_level,
            FGTU_MAX_MIPMAP_LEVEL,
            unit
        );
    }

    let chain = compute_chain(layout, u_size, v_size, max_level);
    tracing::trace!(
        "Unit {} {:?} mipmap chain {}x{}: {} levels",
        unit,
        layout,
        u_size,
        v_size,
        chain.levels
    );

    for (i, &offset) in chain.offsets.iter().enumerate() {
        io.write(fgtu_toffs(unit, i + 1), offset);
    }
    io.write(fgtu_t_min_l(unit), 0);
    io.write(fgtu_t_max_l(unit), chain.levels);

    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_dispatch() {
        assert_eq!(MipmapLayout::for_format(texture_fmt::S3TC), MipmapLayout::S3tc);
        assert_eq!(MipmapLayout::for_format(texture_fmt::UY1VY0), MipmapLayout::Yuv);
        assert_eq!(MipmapLayout::for_format(texture_fmt::Y1VY0U), MipmapLayout::Yuv);
        assert_eq!(MipmapLayout::for_format(texture_fmt::T8888), MipmapLayout::Generic);
        assert_eq!(MipmapLayout::for_format(texture_fmt::BPP8), MipmapLayout::Generic);
    }

    #[test]
    fn test_padding() {
        assert_eq!(MipmapLayout::Generic.padding(7), 0);
        assert_eq!(MipmapLayout::Yuv.padding(7), 1);
        assert_eq!(MipmapLayout::Yuv.padding(6), 0);
        assert_eq!(MipmapLayout::S3tc.padding(16), 0);
        assert_eq!(MipmapLayout::S3tc.padding(1), 15);
        assert_eq!(MipmapLayout::S3tc.padding(0), 0);
    }

    #[test]
    fn test_generic_square_chain() {
        let chain = compute_chain(MipmapLayout::Generic, 8, 8, 11);
        assert_eq!(chain.offsets, vec![64, 80, 84]);
        assert_eq!(chain.levels, 3);
    }

    #[test]
    fn test_level_count_limits_chain() {
        let chain = compute_chain(MipmapLayout::Generic, 256, 256, 1);
        assert_eq!(chain.offsets, vec![65536]);
        assert_eq!(chain.levels, 1);
    }

    #[test]
    fn test_excess_level_is_clamped() {
        let chain = compute_chain(MipmapLayout::Generic, 4096, 4096, 40);
        assert_eq!(chain.levels, FGTU_MAX_MIPMAP_LEVEL);
        assert_eq!(chain.offsets.len(), 11);
    }

    #[test]
    fn test_yuv_odd_area_rounds_up() {
        let chain = compute_chain(MipmapLayout::Yuv, 6, 4, 3);
        // 6x4 -> 3x2 (6) -> 1x1 (1, odd)
        assert_eq!(chain.offsets, vec![24, 30]);
        assert_eq!(chain.levels, 2);

        let chain = compute_chain(MipmapLayout::Yuv, 6, 6, 3);
        // 6x6 -> 3x3 (9, odd, +1)
        assert_eq!(chain.offsets, vec![36, 46]);
    }

    #[test]
    fn test_s3tc_rounds_to_block() {
        let chain = compute_chain(MipmapLayout::S3tc, 64, 64, 2);
        assert_eq!(chain.offsets, vec![4096, 5120]);
        assert_eq!(chain.levels, 2);

        let chain = compute_chain(MipmapLayout::S3tc, 8, 2, 4);
        assert_eq!(chain.offsets, vec![16, 32, 48]);
        assert_eq!(chain.levels, 3);
    }

    #[test]
    fn test_unbounded_request_stops_at_register_count() {
        let chain = compute_chain(MipmapLayout::Generic, 4096, 1, 0);
        assert_eq!(chain.levels, FGTU_MAX_MIPMAP_LEVEL);
        assert_eq!(chain.offsets.len(), FGTU_MAX_MIPMAP_LEVEL as usize);

        let chain = compute_chain(MipmapLayout::S3tc, 65536, 65536, 0);
        assert_eq!(chain.offsets.len(), FGTU_MAX_MIPMAP_LEVEL as usize);
    }

    #[test]
    fn test_single_texel_has_no_levels() {
        let chain = compute_chain(MipmapLayout::Generic, 1, 1, 4);
        assert!(chain.offsets.is_empty());
        assert_eq!(chain.levels, 0);
    }
}
