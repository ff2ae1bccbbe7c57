//! Memory-mapped register window
//!
//! Maps the FIMG-3DSE register block from a device node (typically
//! `/dev/mem` at the accelerator's physical base) and performs volatile
//! 32-bit accesses into it.

use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use fimg_core::error::MmioError;

use crate::RegisterIo;

/// A mapped register window
pub struct MmioDevice {
    /// Base of the mapping
    base: *mut u8,
    /// Length of the mapping in bytes
    len: usize,
    /// Whether `base` came from our own `mmap` and must be unmapped
    owned: bool,
}

// Safety: the mapping is plain device memory; exclusive access is
// serialised by the owner of the device (`&mut self` on every access).
unsafe impl Send for MmioDevice {}

impl MmioDevice {
    /// Open `path` and map `size` bytes starting at `phys_base`
    pub fn open(path: &Path, phys_base: u64, size: usize) -> Result<Self, MmioError> {
        if size == 0 {
            return Err(MmioError::EmptyWindow);
        }

        let offset = libc::off_t::try_from(phys_base).map_err(|_| MmioError::Map {
            base: phys_base,
            size,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "physical base does not fit in off_t",
            ),
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)
            .map_err(|source| MmioError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(MmioError::Map {
                base: phys_base,
                size,
                source: std::io::Error::last_os_error(),
            });
        }

        tracing::info!(
            "Mapped FIMG-3DSE registers: {} @ 0x{:08x}, 0x{:x} bytes",
            path.display(),
            phys_base,
            size
        );

        Ok(Self {
            base: ptr as *mut u8,
            len: size,
            owned: true,
        })
    }

    /// Wrap an existing mapping without taking ownership of it
    ///
    /// # Safety
    /// `base` must be valid for volatile reads and writes of `len` bytes,
    /// 4-byte aligned, and outlive the returned device.
    pub unsafe fn from_raw(base: *mut u8, len: usize) -> Self {
        Self {
            base,
            len,
            owned: false,
        }
    }

    /// Length of the mapped window in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Validate an access and return a pointer to the register
    fn register(&self, offset: u32) -> Result<*mut u32, MmioError> {
        if offset % 4 != 0 {
            return Err(MmioError::Unaligned(offset));
        }
        let end = offset as usize + 4;
        if end > self.len {
            return Err(MmioError::OutOfWindow {
                offset,
                size: self.len,
            });
        }
        Ok(unsafe { self.base.add(offset as usize) as *mut u32 })
    }
}

impl RegisterIo for MmioDevice {
    fn write(&mut self, offset: u32, value: u32) {
        match self.register(offset) {
            Ok(reg) => unsafe { reg.write_volatile(value) },
            Err(e) => tracing::error!("Dropped register write 0x{:08x}: {}", value, e),
        }
    }

    fn read(&mut self, offset: u32) -> u32 {
        match self.register(offset) {
            Ok(reg) => unsafe { reg.read_volatile() },
            Err(e) => {
                tracing::error!("Register read failed: {}", e);
                0
            }
        }
    }
}

impl Drop for MmioDevice {
    fn drop(&mut self) {
        if self.owned {
            unsafe {
                libc::munmap(self.base as *mut libc::c_void, self.len);
            }
        }
    }
}
