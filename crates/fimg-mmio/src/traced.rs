//! Register access tracing

use crate::RegisterIo;

/// Logs every register access at `trace` level before forwarding it
pub struct TracingDevice<D> {
    inner: D,
}

impl<D: RegisterIo> TracingDevice<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: RegisterIo> RegisterIo for TracingDevice<D> {
    fn write(&mut self, offset: u32, value: u32) {
        tracing::trace!("FIMG write [0x{:05x}] <- 0x{:08x}", offset, value);
        self.inner.write(offset, value);
    }

    fn read(&mut self, offset: u32) -> u32 {
        let value = self.inner.read(offset);
        tracing::trace!("FIMG read  [0x{:05x}] -> 0x{:08x}", offset, value);
        value
    }

    fn write_f32(&mut self, offset: u32, value: f32) {
        tracing::trace!("FIMG write [0x{:05x}] <- {}", offset, value);
        self.inner.write(offset, value.to_bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingDevice, RegisterWrite};

    #[test]
    fn test_forwards_unchanged() {
        let recorder = RecordingDevice::new();
        let mut dev = TracingDevice::new(recorder.clone());

        dev.write(0x38000, 1);
        dev.write_f32(0x3801c, 4.0);
        recorder.set_register(0x10, 0x0100_0000);
        assert_eq!(dev.read(0x10), 0x0100_0000);

        assert_eq!(
            recorder.writes(),
            vec![
                RegisterWrite::new(0x38000, 1),
                RegisterWrite::new(0x3801c, 4.0f32.to_bits()),
            ]
        );
    }
}
