//! Register access primitive for the FIMG-3DSE
//!
//! Every pipeline encoder talks to the device through [`RegisterIo`]: a
//! synchronous 32-bit store (or float reinterpretation) at a byte offset into
//! the register window. Writes are infallible from the caller's point of
//! view; transport failures are a device-level concern handled by the
//! back-end.

#[cfg(unix)]
pub mod mmio;
pub mod recording;
pub mod traced;

use serde::{Deserialize, Serialize};

#[cfg(unix)]
pub use mmio::MmioDevice;
pub use recording::RecordingDevice;
pub use traced::TracingDevice;

/// Size of the FIMG-3DSE register window in bytes
pub const REGISTER_WINDOW_SIZE: usize = 0x8_0000;

/// One captured register store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterWrite {
    /// Byte offset into the register window
    pub offset: u32,
    /// Raw 32-bit value
    pub value: u32,
}

impl RegisterWrite {
    pub fn new(offset: u32, value: u32) -> Self {
        Self { offset, value }
    }

    /// Value reinterpreted as an IEEE-754 single
    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.value)
    }
}

/// Access to the device register window
pub trait RegisterIo {
    /// Write a 32-bit word at `offset`
    fn write(&mut self, offset: u32, value: u32);

    /// Read a 32-bit word at `offset`
    fn read(&mut self, offset: u32) -> u32;

    /// Write the bit pattern of a float at `offset`
    fn write_f32(&mut self, offset: u32, value: f32) {
        self.write(offset, value.to_bits());
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &mut T {
    fn write(&mut self, offset: u32, value: u32) {
        (**self).write(offset, value);
    }

    fn read(&mut self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write_f32(&mut self, offset: u32, value: f32) {
        (**self).write_f32(offset, value);
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for Box<T> {
    fn write(&mut self, offset: u32, value: u32) {
        (**self).write(offset, value);
    }

    fn read(&mut self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write_f32(&mut self, offset: u32, value: f32) {
        (**self).write_f32(offset, value);
    }
}
