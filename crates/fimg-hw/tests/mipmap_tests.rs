//! Mipmap chain programming through the texture encoder

use fimg_hw::regs::{fgtu_t_max_l, fgtu_t_min_l, fgtu_toffs};
use fimg_hw::texture::control::{mipmap, tex_type, texture_fmt};
use fimg_hw::texture::{MipmapLayout, TextureState, FGTU_MAX_MIPMAP_LEVEL};
use fimg_hw::{TexControl, TexUnitParams};
use fimg_mmio::RecordingDevice;

fn offsets_written(dev: &RecordingDevice, unit: usize) -> Vec<u32> {
    let l1 = fgtu_toffs(unit, 1);
    let l11 = fgtu_toffs(unit, 11);
    dev.writes()
        .iter()
        .filter(|w| (l1..=l11).contains(&w.offset))
        .map(|w| w.value)
        .collect()
}

fn mipmapped(fmt: u32, levels: u32, u: u32, v: u32) -> TexUnitParams {
    let mut ctrl = TexControl::default();
    ctrl.set_tex_type(tex_type::TYPE_2D);
    ctrl.set_texture_fmt(fmt);
    ctrl.set_use_mipmap(mipmap::NEAREST);
    TexUnitParams {
        ctrl,
        mipmap_level: levels,
        u_size: u,
        v_size: v,
        p_size: 0,
    }
}

#[test]
fn test_yuv_formats_pad_odd_levels() {
    for fmt in [
        texture_fmt::Y1VY0U,
        texture_fmt::VY1UY0,
        texture_fmt::Y1UY0V,
        texture_fmt::UY1VY0,
    ] {
        let mut dev = RecordingDevice::new();
        let mut tex = TextureState::new();
        let mut p = mipmapped(fmt, 3, 6, 6);

        let levels = tex.set_tex_unit_params(&mut dev, 2, &mut p).unwrap();
        assert_eq!(levels, 2);
        assert_eq!(offsets_written(&dev, 2), vec![36, 46]);
    }
}

#[test]
fn test_yuv_six_by_four() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();

    let levels = tex
        .calculate_mipmap_offset(&mut dev, 0, MipmapLayout::Yuv, 6, 4, 3)
        .unwrap();
    assert_eq!(levels, 2);
    assert_eq!(offsets_written(&dev, 0), vec![24, 30]);
    assert_eq!(dev.last_write_to(fgtu_t_min_l(0)), Some(0));
    assert_eq!(dev.last_write_to(fgtu_t_max_l(0)), Some(2));
}

#[test]
fn test_s3tc_offsets_are_block_aligned() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();
    let mut p = mipmapped(texture_fmt::S3TC, 11, 32, 8);

    tex.set_tex_unit_params(&mut dev, 5, &mut p).unwrap();
    let offsets = offsets_written(&dev, 5);
    assert!(!offsets.is_empty());
    assert_eq!(offsets[0], 256);
    for offset in offsets {
        assert_eq!(offset % 16, 0, "offset {} not on a block boundary", offset);
    }
}

#[test]
fn test_s3tc_sixty_four_square() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();
    let mut p = mipmapped(texture_fmt::S3TC, 2, 64, 64);

    assert_eq!(tex.set_tex_unit_params(&mut dev, 0, &mut p), Ok(2));
    assert_eq!(offsets_written(&dev, 0), vec![4096, 5120]);
}

#[test]
fn test_single_level_request_writes_one_offset() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();
    let mut p = mipmapped(texture_fmt::T565, 1, 512, 512);

    assert_eq!(tex.set_tex_unit_params(&mut dev, 1, &mut p), Ok(1));
    assert_eq!(offsets_written(&dev, 1), vec![512 * 512]);
    assert_eq!(p.mipmap_level, 1);
}

#[test]
fn test_level_request_clamped_to_hardware_maximum() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();
    let mut p = mipmapped(texture_fmt::T8888, 20, 2048, 2048);

    let levels = tex.set_tex_unit_params(&mut dev, 0, &mut p).unwrap();
    assert_eq!(levels, FGTU_MAX_MIPMAP_LEVEL);
    assert_eq!(offsets_written(&dev, 0).len(), 11);
    assert_eq!(dev.last_write_to(fgtu_t_max_l(0)), Some(11));
}

#[test]
fn test_non_square_chain_stops_on_longer_edge() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();
    let mut p = mipmapped(texture_fmt::T8888, 11, 16, 2);

    // 16x2 -> 8x1 -> 4x1 -> 2x1 -> 1x1
    let levels = tex.set_tex_unit_params(&mut dev, 0, &mut p).unwrap();
    assert_eq!(levels, 4);
    assert_eq!(offsets_written(&dev, 0), vec![32, 40, 44, 46]);
}

#[test]
fn test_single_texel_texture_has_empty_chain() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();
    let mut p = mipmapped(texture_fmt::T8888, 4, 1, 1);

    let levels = tex.set_tex_unit_params(&mut dev, 0, &mut p).unwrap();
    assert_eq!(levels, 0);
    assert!(offsets_written(&dev, 0).is_empty());
    assert_eq!(dev.last_write_to(fgtu_t_max_l(0)), Some(0));
    // Mipmapping stays requested in the status word
    assert_eq!(p.ctrl.use_mipmap(), mipmap::NEAREST);
}

#[test]
fn test_unbounded_level_request_stays_in_offset_registers() {
    let mut dev = RecordingDevice::new();
    let mut tex = TextureState::new();

    let levels = tex
        .calculate_mipmap_offset(&mut dev, 0, MipmapLayout::Generic, 4096, 4096, 0)
        .unwrap();
    assert_eq!(levels, FGTU_MAX_MIPMAP_LEVEL);
    assert_eq!(offsets_written(&dev, 0).len(), 11);

    // Only the level range registers follow the offsets
    let past_offsets: Vec<_> = dev
        .writes()
        .iter()
        .filter(|w| w.offset >= fgtu_t_min_l(0))
        .map(|w| (w.offset, w.value))
        .collect();
    assert_eq!(
        past_offsets,
        vec![(fgtu_t_min_l(0), 0), (fgtu_t_max_l(0), 11)]
    );
}
