//! Global block: pipeline status, caches, reset, version and interrupts

use bitflags::bitflags;
use fimg_core::HwError;
use fimg_mmio::RegisterIo;

use crate::bits::field;
use crate::regs::*;

bitflags! {
    /// Busy bits of `FGGB_PIPESTATE`, also used for the interrupt pipe
    /// mask and target state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStatus: u32 {
        const HOST_FIFO        = 1 << 0;
        const HOST_INTERFACE   = 1 << 1;
        const HVF              = 1 << 2;
        const VERTEX_CACHE     = 1 << 3;
        const VERTEX_SHADER    = 1 << 4;
        const PRIMITIVE_ENGINE = 1 << 8;
        const TRIANGLE_SETUP   = 1 << 9;
        const RASTER           = 1 << 10;
        const PIXEL_SHADER     = 1 << 12;
        const PER_FRAGMENT     = 1 << 16;
        const COLOR_CACHE      = 1 << 18;
    }
}

bitflags! {
    /// Requests of `FGGB_CACHECTL`; each bit stays set until the hardware
    /// has finished the operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CacheControl: u32 {
        const FLUSH_COLOR_CACHE       = 1 << 0;
        const FLUSH_DEPTH_CACHE       = 1 << 1;
        const CLEAR_TEXTURE_CACHE     = 1 << 8;
        const CLEAR_VTX_TEXTURE_CACHE = 1 << 12;
    }
}

/// Hardware revision from `FGGB_VERSION`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl Version {
    pub fn from_bits(word: u32) -> Self {
        Self {
            major: field(word, 24, 8) as u8,
            minor: field(word, 16, 8) as u8,
            revision: field(word, 8, 8) as u8,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

pub fn pipeline_status<R: RegisterIo + ?Sized>(io: &mut R) -> PipelineStatus {
    PipelineStatus::from_bits_retain(io.read(FGGB_PIPESTATE))
}

pub fn version<R: RegisterIo + ?Sized>(io: &mut R) -> Version {
    Version::from_bits(io.read(FGGB_VERSION))
}

/// Reset the whole pipeline. Every register loses its value; replay the
/// context afterwards.
pub fn soft_reset<R: RegisterIo + ?Sized>(io: &mut R) {
    tracing::info!("FIMG soft reset");
    io.write(FGGB_RST, 1);
    io.write(FGGB_RST, 0);
}

/// Wait until none of the stages in `mask` is busy
pub fn flush<R: RegisterIo + ?Sized>(
    io: &mut R,
    mask: PipelineStatus,
    spins: u32,
) -> Result<(), HwError> {
    let mut status = pipeline_status(io);
    for _ in 0..spins {
        if !status.intersects(mask) {
            return Ok(());
        }
        std::hint::spin_loop();
        status = pipeline_status(io);
    }

    if !status.intersects(mask) {
        return Ok(());
    }

    tracing::error!("Pipeline flush timed out, status {:?}", status);
    Err(HwError::FlushTimeout {
        spins,
        status: status.bits(),
    })
}

/// Issue cache clear/flush requests and wait for their completion
pub fn invalidate_flush_cache<R: RegisterIo + ?Sized>(
    io: &mut R,
    request: CacheControl,
    spins: u32,
) -> Result<(), HwError> {
    if request.is_empty() {
        return Ok(());
    }

    io.write(FGGB_CACHECTL, request.bits());
    for _ in 0..spins {
        if io.read(FGGB_CACHECTL) & request.bits() == 0 {
            return Ok(());
        }
        std::hint::spin_loop();
    }

    tracing::error!("Cache request {:?} timed out", request);
    Err(HwError::CacheTimeout {
        spins,
        request: request.bits(),
    })
}

/// Whether the pipeline interrupt is pending
pub fn interrupt_pending<R: RegisterIo + ?Sized>(io: &mut R) -> bool {
    io.read(FGGB_INTPENDING) & 1 != 0
}

pub fn clear_interrupt<R: RegisterIo + ?Sized>(io: &mut R) {
    io.write(FGGB_INTPENDING, 1);
}

pub fn enable_interrupt<R: RegisterIo + ?Sized>(io: &mut R) {
    io.write(FGGB_INTMASK, 1);
}

pub fn disable_interrupt<R: RegisterIo + ?Sized>(io: &mut R) {
    io.write(FGGB_INTMASK, 0);
}

/// Select the stages whose state raises the interrupt
pub fn set_interrupt_block<R: RegisterIo + ?Sized>(io: &mut R, mask: PipelineStatus) {
    io.write(FGGB_PIPEMASK, mask.bits());
}

/// Stage state that raises the interrupt
pub fn set_interrupt_state<R: RegisterIo + ?Sized>(io: &mut R, target: PipelineStatus) {
    io.write(FGGB_PIPETGTSTATE, target.bits());
}

pub fn interrupt_state<R: RegisterIo + ?Sized>(io: &mut R) -> PipelineStatus {
    PipelineStatus::from_bits_retain(io.read(FGGB_PIPETGTSTATE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fimg_mmio::RecordingDevice;

    #[test]
    fn test_version_decode() {
        let mut dev = RecordingDevice::new();
        dev.set_register(FGGB_VERSION, 0x0102_0300);

        let v = version(&mut dev);
        assert_eq!(v, Version { major: 1, minor: 2, revision: 3 });
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_soft_reset_pulses() {
        let mut dev = RecordingDevice::new();
        soft_reset(&mut dev);
        assert_eq!(dev.writes_to(FGGB_RST), vec![1, 0]);
    }

    #[test]
    fn test_flush_waits_for_idle() {
        let mut dev = RecordingDevice::new();
        let busy = (PipelineStatus::RASTER | PipelineStatus::PER_FRAGMENT).bits();
        dev.script_reads(FGGB_PIPESTATE, &[busy, busy, PipelineStatus::RASTER.bits(), 0]);

        assert_eq!(flush(&mut dev, PipelineStatus::all(), 10), Ok(()));
    }

    #[test]
    fn test_flush_ignores_unmasked_stages() {
        let mut dev = RecordingDevice::new();
        dev.set_register(FGGB_PIPESTATE, PipelineStatus::HOST_FIFO.bits());

        assert_eq!(flush(&mut dev, PipelineStatus::COLOR_CACHE, 0), Ok(()));
    }

    #[test]
    fn test_flush_timeout() {
        let mut dev = RecordingDevice::new();
        dev.set_register(FGGB_PIPESTATE, PipelineStatus::VERTEX_SHADER.bits());

        assert_eq!(
            flush(&mut dev, PipelineStatus::all(), 5),
            Err(HwError::FlushTimeout {
                spins: 5,
                status: PipelineStatus::VERTEX_SHADER.bits()
            })
        );
    }

    #[test]
    fn test_cache_request_completes() {
        let mut dev = RecordingDevice::new();
        let request = CacheControl::FLUSH_COLOR_CACHE | CacheControl::CLEAR_TEXTURE_CACHE;
        dev.script_reads(FGGB_CACHECTL, &[request.bits(), 0]);

        assert_eq!(invalidate_flush_cache(&mut dev, request, 4), Ok(()));
        assert_eq!(dev.writes_to(FGGB_CACHECTL), vec![0x101]);
    }

    #[test]
    fn test_cache_request_timeout() {
        let mut dev = RecordingDevice::new();
        // Reads fall back to the written request, which never clears
        let result = invalidate_flush_cache(&mut dev, CacheControl::FLUSH_DEPTH_CACHE, 3);
        assert_eq!(
            result,
            Err(HwError::CacheTimeout {
                spins: 3,
                request: 2
            })
        );
    }

    #[test]
    fn test_interrupt_control() {
        let mut dev = RecordingDevice::new();
        enable_interrupt(&mut dev);
        set_interrupt_block(&mut dev, PipelineStatus::PER_FRAGMENT);
        set_interrupt_state(&mut dev, PipelineStatus::empty());
        disable_interrupt(&mut dev);

        assert_eq!(dev.writes_to(FGGB_INTMASK), vec![1, 0]);
        assert_eq!(dev.last_write_to(FGGB_PIPEMASK), Some(1 << 16));
        assert_eq!(interrupt_state(&mut dev), PipelineStatus::empty());

        dev.set_register(FGGB_INTPENDING, 1);
        assert!(interrupt_pending(&mut dev));
        clear_interrupt(&mut dev);
        assert_eq!(dev.last_write_to(FGGB_INTPENDING), Some(1));
    }
}
