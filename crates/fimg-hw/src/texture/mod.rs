//! Texture engine

pub mod control;
pub mod mipmap;

use fimg_core::HwError;
use fimg_mmio::RegisterIo;

use crate::regs::*;

pub use control::{ColorKey, ColorKeyYuv, TexControl, VtxTexControl};
pub use mipmap::{MipmapLayout, FGTU_MAX_MIPMAP_LEVEL};

/// Number of fragment texture units
pub const FGTU_MAX_UNITS: usize = 8;

/// Number of vertex texture units
pub const FGTU_MAX_VTX_UNITS: usize = 4;

/// Hardware colour key slots
pub const FGTU_COLOR_KEYS: usize = 2;

/// Parameters of one texture unit as set up by the texture object layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexUnitParams {
    pub ctrl: TexControl,
    /// Requested mipmap level count on input, achieved count on output
    pub mipmap_level: u32,
    pub u_size: u32,
    pub v_size: u32,
    pub p_size: u32,
}

/// Mirror of one texture unit's registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexUnitState {
    pub ctrl: TexControl,
    pub u_size: u32,
    pub v_size: u32,
    pub p_size: u32,
    /// `FGTU_TOFFS_L1` .. `FGTU_TOFFS_L11`
    pub offsets: [u32; FGTU_MAX_MIPMAP_LEVEL as usize],
    pub min_level: u32,
    pub max_level: u32,
    pub base_addr: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VtxTexUnitState {
    pub ctrl: VtxTexControl,
    pub base_addr: u32,
}

/// Texture engine part of the context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureState {
    pub units: [TexUnitState; FGTU_MAX_UNITS],
    pub color_keys: [ColorKey; FGTU_COLOR_KEYS],
    pub color_key_yuv: ColorKeyYuv,
    pub color_key_mask: u32,
    pub vtx_units: [VtxTexUnitState; FGTU_MAX_VTX_UNITS],
}

fn check_unit(unit: usize) -> Result<(), HwError> {
    if unit >= FGTU_MAX_UNITS {
        tracing::warn!("Texture unit {} out of range", unit);
        return Err(HwError::InvalidTextureUnit(unit));
    }
    Ok(())
}

fn check_vtx_unit(unit: usize) -> Result<(), HwError> {
    if unit >= FGTU_MAX_VTX_UNITS {
        tracing::warn!("Vertex texture unit {} out of range", unit);
        return Err(HwError::InvalidVertexTextureUnit(unit));
    }
    Ok(())
}

impl TextureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program a whole texture unit.
    ///
    /// Mipmapping is switched off in `params.ctrl` when no levels were
    /// requested. The status and size registers are written as one burst,
    /// followed by the mipmap chain of the unit's format. The achieved
    /// level count is stored back into `params` and returned.
    pub fn set_tex_unit_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        params: &mut TexUnitParams,
    ) -> Result<u32, HwError> {
        check_unit(unit)?;

        if params.mipmap_level == 0 && params.ctrl.use_mipmap() != 0 {
            params.ctrl.set_use_mipmap(control::mipmap::DISABLED);
        }

        tracing::trace!(
            "Texture unit {}: ctrl 0x{:08x}, {}x{}",
            unit,
            params.ctrl.bits(),
            params.u_size,
            params.v_size
        );

        let state = &mut self.units[unit];
        state.ctrl = params.ctrl;
        state.u_size = params.u_size;
        state.v_size = params.v_size;
        state.p_size = params.p_size;

        let burst = [
            params.ctrl.bits(),
            params.u_size,
            params.v_size,
            params.p_size,
        ];
        let mut addr = fgtu_tsta(unit);
        for word in burst {
            io.write(addr, word);
            addr += 4;
        }

        if params.ctrl.use_mipmap() != 0 {
            let layout = MipmapLayout::for_format(params.ctrl.texture_fmt());
            let chain = mipmap::program_chain(
                io,
                unit,
                layout,
                params.u_size,
                params.v_size,
                params.mipmap_level,
            );

            state.offsets[..chain.offsets.len()].copy_from_slice(&chain.offsets);
            state.min_level = 0;
            state.max_level = chain.levels;
            params.mipmap_level = chain.levels;
        }

        Ok(params.mipmap_level)
    }

    pub fn set_tex_status_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        ctrl: TexControl,
    ) -> Result<(), HwError> {
        check_unit(unit)?;
        self.units[unit].ctrl = ctrl;
        io.write(fgtu_tsta(unit), ctrl.bits());
        Ok(())
    }

    pub fn set_tex_u_size<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        size: u32,
    ) -> Result<(), HwError> {
        check_unit(unit)?;
        self.units[unit].u_size = size;
        io.write(fgtu_usize(unit), size);
        Ok(())
    }

    pub fn set_tex_v_size<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        size: u32,
    ) -> Result<(), HwError> {
        check_unit(unit)?;
        self.units[unit].v_size = size;
        io.write(fgtu_vsize(unit), size);
        Ok(())
    }

    pub fn set_tex_p_size<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        size: u32,
    ) -> Result<(), HwError> {
        check_unit(unit)?;
        self.units[unit].p_size = size;
        io.write(fgtu_psize(unit), size);
        Ok(())
    }

    /// Compute and program the mipmap chain of `unit` for the given layout
    pub fn calculate_mipmap_offset<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        layout: MipmapLayout,
        u_size: u32,
        v_size: u32,
        max_level: u32,
    ) -> Result<u32, HwError> {
        check_unit(unit)?;

        let chain = mipmap::program_chain(io, unit, layout, u_size, v_size, max_level);
        let state = &mut self.units[unit];
        state.offsets[..chain.offsets.len()].copy_from_slice(&chain.offsets);
        state.min_level = 0;
        state.max_level = chain.levels;

        Ok(chain.levels)
    }

    /// Set the base and/or max mipmap level; a negative value leaves the
    /// register untouched
    pub fn set_tex_mipmap_level<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        min: i32,
        max: i32,
    ) -> Result<(), HwError> {
        check_unit(unit)?;
        let state = &mut self.units[unit];

        if let Ok(min) = u32::try_from(min) {
            state.min_level = min;
            io.write(fgtu_t_min_l(unit), min);
        }
        if let Ok(max) = u32::try_from(max) {
            state.max_level = max;
            io.write(fgtu_t_max_l(unit), max);
        }
        Ok(())
    }

    pub fn set_tex_base_addr<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        addr: u32,
    ) -> Result<(), HwError> {
        check_unit(unit)?;
        self.units[unit].base_addr = addr;
        tracing::trace!("Texture unit {} base 0x{:08x}", unit, addr);
        io.write(fgtu_tbadd(unit), addr);
        Ok(())
    }

    /// Only two key registers exist; unit 0 selects the first, any other
    /// unit the second
    pub fn set_tex_color_key<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        r: u8,
        g: u8,
        b: u8,
    ) {
        let slot = (unit != 0) as usize;
        let key = ColorKey::new(r, g, b);
        self.color_keys[slot] = key;
        io.write(fgtu_ckey(slot), key.bits());
    }

    pub fn set_tex_color_key_yuv<R: RegisterIo + ?Sized>(&mut self, io: &mut R, u: u8, v: u8) {
        self.color_key_yuv = ColorKeyYuv::new(u, v);
        io.write(FGTU_CKYUV, self.color_key_yuv.bits());
    }

    pub fn set_tex_color_key_mask<R: RegisterIo + ?Sized>(&mut self, io: &mut R, bits_to_mask: u8) {
        self.color_key_mask = bits_to_mask as u32;
        io.write(FGTU_CKMASK, self.color_key_mask);
    }

    /// Select the palette entry written by the next
    /// [`TextureState::set_tex_palette_entry`]
    pub fn set_tex_palette_addr<R: RegisterIo + ?Sized>(&self, io: &mut R, addr: u8) {
        io.write(FGTU_PALETTE_ADDR, addr as u32);
    }

    pub fn set_tex_palette_entry<R: RegisterIo + ?Sized>(&self, io: &mut R, entry: u32) {
        io.write(FGTU_PALETTE_IN, entry);
    }

    pub fn set_vtx_tex_unit_params<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        ctrl: VtxTexControl,
    ) -> Result<(), HwError> {
        check_vtx_unit(unit)?;
        self.vtx_units[unit].ctrl = ctrl;
        io.write(fgtu_vtsta(unit), ctrl.bits());
        Ok(())
    }

    pub fn set_vtx_tex_base_addr<R: RegisterIo + ?Sized>(
        &mut self,
        io: &mut R,
        unit: usize,
        addr: u32,
    ) -> Result<(), HwError> {
        check_vtx_unit(unit)?;
        self.vtx_units[unit].base_addr = addr;
        io.write(fgtu_vtbaddr(unit), addr);
        Ok(())
    }

    /// Replay every mirrored texture register. Palette memory is not
    /// mirrored and has to be reloaded by its owner.
    pub fn restore<R: RegisterIo + ?Sized>(&self, io: &mut R) {
        tracing::debug!("Restoring texture engine state");

        for (unit, state) in self.units.iter().enumerate() {
            io.write(fgtu_tsta(unit), state.ctrl.bits());
            io.write(fgtu_usize(unit), state.u_size);
            io.write(fgtu_vsize(unit), state.v_size);
            io.write(fgtu_psize(unit), state.p_size);
            for (i, &offset) in state.offsets.iter().enumerate() {
                io.write(fgtu_toffs(unit, i + 1), offset);
            }
            io.write(fgtu_t_min_l(unit), state.min_level);
            io.write(fgtu_t_max_l(unit), state.max_level);
            io.write(fgtu_tbadd(unit), state.base_addr);
        }

        for (slot, key) in self.color_keys.iter().enumerate() {
            io.write(fgtu_ckey(slot), key.bits());
        }
        io.write(FGTU_CKYUV, self.color_key_yuv.bits());
        io.write(FGTU_CKMASK, self.color_key_mask);

        for (unit, state) in self.vtx_units.iter().enumerate() {
            io.write(fgtu_vtsta(unit), state.ctrl.bits());
            io.write(fgtu_vtbaddr(unit), state.base_addr);
        }
    }
}
