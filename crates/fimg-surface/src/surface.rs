//! Surface capability interface and its two variants

use std::sync::atomic::{fence, Ordering};

use bitflags::bitflags;
use fimg_core::error::SurfaceError;
use parking_lot::Mutex;

bitflags! {
    /// Intended use of a surface while it is locked
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LockUsage: u32 {
        const CPU_READ  = 0b0001;
        const CPU_WRITE = 0b0010;
        const GPU_READ  = 0b0100;
        const GPU_WRITE = 0b1000;
    }
}

/// A 2D buffer the accelerator can render into or sample from
pub trait Surface: Send + Sync {
    /// Whether the surface is backed by real memory
    fn is_valid(&self) -> bool;

    /// Make all outstanding writes visible in memory
    fn flush(&self) -> Result<(), SurfaceError>;

    /// Lock the surface for exclusive use
    fn lock(&self, usage: LockUsage) -> Result<(), SurfaceError>;

    /// Release a previous [`Surface::lock`]
    fn unlock(&self) -> Result<(), SurfaceError>;

    /// Size in bytes
    fn size(&self) -> usize;

    /// Address of the buffer as seen by the accelerator
    fn device_address(&self) -> u32;
}

/// Lock bookkeeping shared by both surface variants
#[derive(Debug, Default)]
struct LockState {
    usage: Option<LockUsage>,
}

impl LockState {
    fn lock(&mut self, usage: LockUsage) -> Result<(), SurfaceError> {
        if self.usage.is_some() {
            return Err(SurfaceError::AlreadyLocked);
        }
        self.usage = Some(usage);
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), SurfaceError> {
        self.usage.take().map(|_| ()).ok_or(SurfaceError::NotLocked)
    }
}

/// Surface backed by memory the driver allocated itself
pub struct LocalSurface {
    vaddr: *mut u8,
    size: usize,
    device_address: u32,
    lock: Mutex<LockState>,
}

// Safety: the mapping is owned exclusively by this surface and CPU access is
// gated by the lock state.
unsafe impl Send for LocalSurface {}
unsafe impl Sync for LocalSurface {}

impl LocalSurface {
    /// Allocate `size` bytes; `device_address` is where the memory allocator
    /// placed the buffer in the accelerator's address space
    pub fn allocate(size: usize, device_address: u32) -> Result<Self, SurfaceError> {
        if size == 0 {
            return Err(SurfaceError::AllocationFailed(size));
        }

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(SurfaceError::AllocationFailed(size));
        }

        tracing::debug!(
            "Allocated local surface: {} bytes @ device 0x{:08x}",
            size,
            device_address
        );

        Ok(Self {
            vaddr: ptr as *mut u8,
            size,
            device_address,
            lock: Mutex::new(LockState::default()),
        })
    }

    /// Copy `data` into the surface at `offset`; the surface must be locked
    /// for CPU writes
    pub fn write_bytes(&self, offset: usize, data: &[u8]) -> Result<(), SurfaceError> {
        let state = self.lock.lock();
        match state.usage {
            Some(usage) if usage.contains(LockUsage::CPU_WRITE) => {}
            _ => return Err(SurfaceError::NotLocked),
        }
        if offset.checked_add(data.len()).map_or(true, |end| end > self.size) {
            return Err(SurfaceError::Invalid);
        }
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), self.vaddr.add(offset), data.len());
        }
        Ok(())
    }

    /// Read one byte back; used by callers that verify uploads
    pub fn read_byte(&self, offset: usize) -> Option<u8> {
        if offset >= self.size {
            return None;
        }
        Some(unsafe { self.vaddr.add(offset).read() })
    }
}

impl Surface for LocalSurface {
    fn is_valid(&self) -> bool {
        !self.vaddr.is_null()
    }

    fn flush(&self) -> Result<(), SurfaceError> {
        fence(Ordering::SeqCst);
        Ok(())
    }

    fn lock(&self, usage: LockUsage) -> Result<(), SurfaceError> {
        self.lock.lock().lock(usage)
    }

    fn unlock(&self) -> Result<(), SurfaceError> {
        self.lock.lock().unlock()
    }

    fn size(&self) -> usize {
        self.size
    }

    fn device_address(&self) -> u32 {
        self.device_address
    }
}

impl Drop for LocalSurface {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.vaddr as *mut libc::c_void, self.size);
        }
    }
}

/// Surface backed by a buffer owned by the native window system
#[derive(Debug)]
pub struct ExternalSurface {
    /// Buffer-object handle; zero means no buffer
    handle: u32,
    /// Offset of the surface inside the buffer object
    offset: u32,
    size: usize,
    device_address: u32,
    lock: Mutex<LockState>,
}

impl ExternalSurface {
    pub fn new(handle: u32, offset: u32, size: usize, device_address: u32) -> Self {
        Self {
            handle,
            offset,
            size,
            device_address,
            lock: Mutex::new(LockState::default()),
        }
    }

    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Surface for ExternalSurface {
    fn is_valid(&self) -> bool {
        self.handle != 0
    }

    fn flush(&self) -> Result<(), SurfaceError> {
        if !self.is_valid() {
            return Err(SurfaceError::Invalid);
        }
        fence(Ordering::SeqCst);
        Ok(())
    }

    fn lock(&self, usage: LockUsage) -> Result<(), SurfaceError> {
        if !self.is_valid() {
            return Err(SurfaceError::Invalid);
        }
        self.lock.lock().lock(usage)
    }

    fn unlock(&self) -> Result<(), SurfaceError> {
        self.lock.lock().unlock()
    }

    fn size(&self) -> usize {
        self.size
    }

    fn device_address(&self) -> u32 {
        self.device_address.wrapping_add(self.offset)
    }
}
