//! Raster engine

use fimg_mmio::RegisterIo;

use crate::bits::{bitfield, register_word};
use crate::regs::*;

/// Number of mipmap levels covered by `FGRA_LODCTL`
pub const LOD_CONTROL_LEVELS: usize = 8;

/// Faces discarded when culling is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CullFace {
    Back = 0,
    Front = 1,
    Both = 3,
}

register_word! {
    /// `FGRA_BFCULL`
    CullControl
}

impl CullControl {
    bitfield!(enable, set_enable: 3, 1);
    bitfield!(clockwise, set_clockwise: 2, 1);
    bitfield!(face, set_face: 0, 2);
}

register_word! {
    /// `FGRA_XCLIP` / `FGRA_YCLIP`
    ClipRange
}

impl ClipRange {
    bitfield!(max, set_max: 16, 12);
    bitfield!(min, set_min: 0, 12);

    pub fn new(min: u32, max: u32) -> Self {
        let mut clip = Self::default();
        clip.set_min(min);
        clip.set_max(max);
        clip
    }
}

register_word! {
    /// `FGRA_LODCTL`: three enable bits per mipmap level
    LodControl
}

impl LodControl {
    /// Bit position of the `lod` flag of `level`; `None` past the last level
    const fn shift(level: usize) -> Option<u32> {
        if level < LOD_CONTROL_LEVELS {
            Some(21 - 3 * level as u32)
        } else {
            None
        }
    }

    const fn flag(self, level: usize, bit: u32) -> bool {
        match Self::shift(level) {
            Some(shift) => (self.0 >> (shift + bit)) & 1 != 0,
            None => false,
        }
    }

    pub const fn ddy(self, level: usize) -> bool {
        self.flag(level, 2)
    }

    pub const fn ddx(self, level: usize) -> bool {
        self.flag(level, 1)
    }

    pub const fn lod(self, level: usize) -> bool {
        self.flag(level, 0)
    }

    /// Set the three coefficients of `level` (0..8); other levels are ignored
    pub fn set_level(&mut self, level: usize, ddy: bool, ddx: bool, lod: bool) {
        let Some(shift) = Self::shift(level) else {
            tracing::warn!("Ignoring LOD control for level {}", level);
            return;
        };
        let bits = (ddy as u32) << 2 | (ddx as u32) << 1 | lod as u32;
        self.0 = crate::bits::with_field(self.0, shift, 3, bits);
    }
}

/// Raster engine part of the context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterState {
    pub sample_pos: u32,
    pub depth_offset_enable: u32,
    pub depth_offset_factor: f32,
    pub depth_offset_units: f32,
    pub cull: CullControl,
    pub y_clip: ClipRange,
    pub x_clip: ClipRange,
    pub lod_control: LodControl,

    // Points and lines
    pub point_width: f32,
    pub point_width_min: f32,
    pub point_width_max: f32,
    pub line_width: f32,
    /// One-hot attribute mask for point sprite coordinates
    pub coord_replace: u32,
}

impl Default for RasterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterState {
    pub fn new() -> Self {
        Self {
            sample_pos: 0,
            depth_offset_enable: 0,
            depth_offset_factor: 0.0,
            depth_offset_units: 0.0,
            cull: CullControl::default(),
            y_clip: ClipRange::default(),
            x_clip: ClipRange::default(),
            lod_control: LodControl::default(),
            point_width: 1.0,
            point_width_min: 1.0,
            point_width_max: 2048.0,
            line_width: 1.0,
            coord_replace: 0,
        }
    }

    /// Sample at the pixel corner instead of its centre
    pub fn set_pixel_sample_pos<R: RegisterIo + ?Sized>(&mut self, io: &mut R, corner: bool) {
        self.sample_pos = corner as u32;
        io.write(FGRA_PIX_SAMP, self.sample_pos);
    }

    pub fn enable_depth_offset<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.depth_offset_enable = enable as u32;
        io.write(FGRA_D_OFF_EN, self.depth_offset_enable);
    }

    pub fn set_depth_offset_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        factor: f32,
        units: f32,
    ) {
        self.depth_offset_factor = factor;
        self.depth_offset_units = units;

        tracing::trace!("Depth offset: factor {}, units {}", factor, units);
        io.write_f32(FGRA_D_OFF_FACTOR, factor);
        io.write_f32(FGRA_D_OFF_UNITS, units);
    }

    pub fn set_face_cull_enable<R: RegisterIo + ?Sized>(&mut self, io: &mut R, enable: bool) {
        self.cull.set_enable(enable as u32);
        io.write(FGRA_BFCULL, self.cull.bits());
    }

    pub fn set_face_cull_control<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        clockwise: bool,
        face: CullFace,
    ) {
        self.cull.set_clockwise(clockwise as u32);
        self.cull.set_face(face as u32);

        tracing::trace!("Face culling: {:?}, clockwise {}", face, clockwise);
        io.write(FGRA_BFCULL, self.cull.bits());
    }

    pub fn set_y_clip<R: RegisterIo + ?Sized>(&mut self, io: &mut R, min: u32, max: u32) {
        self.y_clip = ClipRange::new(min, max);
        io.write(FGRA_YCLIP, self.y_clip.bits());
    }

    pub fn set_x_clip<R: RegisterIo + ?Sized>(&mut self, io: &mut R, min: u32, max: u32) {
        self.x_clip = ClipRange::new(min, max);
        io.write(FGRA_XCLIP, self.x_clip.bits());
    }

    pub fn set_lod_control<R: RegisterIo + ?Sized>(&mut self, io: &mut R, ctl: LodControl) {
        self.lod_control = ctl;
        tracing::trace!("LOD control: 0x{:08x}", ctl.bits());
        io.write(FGRA_LODCTL, ctl.bits());
    }

    pub fn set_point_width<R: RegisterIo + ?Sized>(&mut self, io: &mut R, width: f32) {
        self.point_width = width;
        io.write_f32(FGRA_PWIDTH, width);
    }

    pub fn set_min_point_width<R: RegisterIo + ?Sized>(&mut self, io: &mut R, width: f32) {
        self.point_width_min = width;
        io.write_f32(FGRA_PSIZE_MIN, width);
    }

    pub fn set_max_point_width<R: RegisterIo + ?Sized>(&mut self, io: &mut R, width: f32) {
        self.point_width_max = width;
        io.write_f32(FGRA_PSIZE_MAX, width);
    }

    /// Replace texture coordinates of attribute `index` with point sprite
    /// coordinates
    pub fn set_coord_replace<R: RegisterIo + ?Sized>(&mut self, io: &mut R, index: u32) {
        self.coord_replace = 1u32.wrapping_shl(index);
        tracing::trace!("Coordinate replace: attribute {}", index);
        io.write(FGRA_COORDREPLACE, self.coord_replace);
    }

    pub fn set_line_width<R: RegisterIo + ?Sized>(&mut self, io: &mut R, width: f32) {
        self.line_width = width;
        io.write_f32(FGRA_LWIDTH, width);
    }

    /// Replay every raster register; `FGRA_LODCTL` follows the line width
    /// as a thirteenth write.
    pub fn restore<R: RegisterIo + ?Sized>(&self, io: &mut R) {
        tracing::debug!("Restoring raster engine state");
        io.write(FGRA_PIX_SAMP, self.sample_pos);
        io.write(FGRA_D_OFF_EN, self.depth_offset_enable);
        io.write_f32(FGRA_D_OFF_FACTOR, self.depth_offset_factor);
        io.write_f32(FGRA_D_OFF_UNITS, self.depth_offset_units);
        io.write(FGRA_BFCULL, self.cull.bits());
        io.write(FGRA_YCLIP, self.y_clip.bits());
        io.write(FGRA_XCLIP, self.x_clip.bits());
        io.write_f32(FGRA_PWIDTH, self.point_width);
        io.write_f32(FGRA_PSIZE_MIN, self.point_width_min);
        io.write_f32(FGRA_PSIZE_MAX, self.point_width_max);
        io.write(FGRA_COORDREPLACE, self.coord_replace);
        io.write_f32(FGRA_LWIDTH, self.line_width);
        io.write(FGRA_LODCTL, self.lod_control.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fimg_mmio::RecordingDevice;

    #[test]
    fn test_defaults() {
        let state = RasterState::new();
        assert_eq!(state.point_width, 1.0);
        assert_eq!(state.point_width_min, 1.0);
        assert_eq!(state.point_width_max, 2048.0);
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.cull.bits(), 0);
        assert_eq!(state.coord_replace, 0);
    }

    #[test]
    fn test_booleans_are_single_bit() {
        let mut dev = RecordingDevice::new();
        let mut state = RasterState::new();

        state.set_pixel_sample_pos(&mut dev, true);
        state.enable_depth_offset(&mut dev, true);
        assert_eq!(dev.last_write_to(FGRA_PIX_SAMP), Some(1));
        assert_eq!(dev.last_write_to(FGRA_D_OFF_EN), Some(1));

        state.enable_depth_offset(&mut dev, false);
        assert_eq!(dev.last_write_to(FGRA_D_OFF_EN), Some(0));
    }

    #[test]
    fn test_cull_enable_then_control_keeps_enable() {
        let mut dev = RecordingDevice::new();
        let mut state = RasterState::new();

        state.set_face_cull_enable(&mut dev, true);
        state.set_face_cull_control(&mut dev, true, CullFace::Front);

        let word = dev.last_write_to(FGRA_BFCULL).unwrap();
        assert_eq!(word, 0b1101);
        assert_eq!(state.cull.enable(), 1);
    }

    #[test]
    fn test_cull_control_then_enable_keeps_control() {
        let mut dev = RecordingDevice::new();
        let mut state = RasterState::new();

        state.set_face_cull_control(&mut dev, false, CullFace::Both);
        state.set_face_cull_enable(&mut dev, true);
        assert_eq!(dev.last_write_to(FGRA_BFCULL), Some(0b1011));

        state.set_face_cull_enable(&mut dev, false);
        assert_eq!(dev.last_write_to(FGRA_BFCULL), Some(0b0011));
    }

    #[test]
    fn test_clip_packing() {
        let mut dev = RecordingDevice::new();
        let mut state = RasterState::new();

        state.set_y_clip(&mut dev, 0, 479);
        state.set_x_clip(&mut dev, 16, 799);
        assert_eq!(dev.last_write_to(FGRA_YCLIP), Some(479 << 16));
        assert_eq!(dev.last_write_to(FGRA_XCLIP), Some((799 << 16) | 16));
        assert_eq!(state.x_clip.min(), 16);
        assert_eq!(state.x_clip.max(), 799);
    }

    #[test]
    fn test_lod_control_levels() {
        let mut ctl = LodControl::default();
        ctl.set_level(0, true, false, true);
        ctl.set_level(7, false, true, false);

        assert_eq!(ctl.bits(), (1 << 23) | (1 << 21) | (1 << 1));
        assert!(ctl.ddy(0));
        assert!(!ctl.ddx(0));
        assert!(ctl.lod(0));
        assert!(ctl.ddx(7));
    }

    #[test]
    fn test_lod_control_ignores_levels_past_last() {
        let mut ctl = LodControl::default();
        ctl.set_level(0, true, true, true);
        let before = ctl.bits();

        ctl.set_level(LOD_CONTROL_LEVELS, true, true, true);
        ctl.set_level(usize::MAX, true, true, true);
        assert_eq!(ctl.bits(), before);

        assert!(!ctl.ddy(LOD_CONTROL_LEVELS));
        assert!(!ctl.ddx(LOD_CONTROL_LEVELS));
        assert!(!ctl.lod(usize::MAX));
    }

    #[test]
    fn test_coord_replace_is_one_hot() {
        let mut dev = RecordingDevice::new();
        let mut state = RasterState::new();

        state.set_coord_replace(&mut dev, 3);
        assert_eq!(dev.last_write_to(FGRA_COORDREPLACE), Some(8));
        assert_eq!(state.coord_replace, 0b1000);
    }

    #[test]
    fn test_restore_replays_lod_control_last() {
        let mut dev = RecordingDevice::new();
        let mut state = RasterState::new();
        let mut ctl = LodControl::default();
        ctl.set_level(2, true, true, true);
        state.set_lod_control(&mut dev, ctl);
        dev.clear();

        state.restore(&mut dev);
        let writes = dev.writes();
        assert_eq!(writes.len(), 13);
        assert_eq!(writes[12].offset, FGRA_LODCTL);
        assert_eq!(writes[12].value, ctl.bits());
        assert_eq!(writes[9].as_f32(), 2048.0);
    }
}
