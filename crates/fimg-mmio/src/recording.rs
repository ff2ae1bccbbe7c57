//! In-memory device that records register traffic
//!
//! Used by the test suites and by the `Recording` back-end of the launcher.
//! Clones share the same log, so a test can hand one clone to the code under
//! test and inspect the other.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{RegisterIo, RegisterWrite};

#[derive(Debug, Default)]
struct Recording {
    /// Every write in issue order
    writes: Vec<RegisterWrite>,
    /// Last value seen at each offset (written or preset)
    registers: HashMap<u32, u32>,
    /// Scripted read results, consumed before falling back to `registers`
    scripted: HashMap<u32, VecDeque<u32>>,
}

/// Register device backed by memory
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured writes, in order
    pub fn writes(&self) -> Vec<RegisterWrite> {
        self.inner.lock().writes.clone()
    }

    /// Drain the captured writes
    pub fn take_writes(&self) -> Vec<RegisterWrite> {
        std::mem::take(&mut self.inner.lock().writes)
    }

    /// Forget captured writes but keep register contents
    pub fn clear(&self) {
        self.inner.lock().writes.clear();
    }

    /// Last value written to `offset`
    pub fn last_write_to(&self, offset: u32) -> Option<u32> {
        self.inner
            .lock()
            .writes
            .iter()
            .rev()
            .find(|w| w.offset == offset)
            .map(|w| w.value)
    }

    /// Every value written to `offset`, oldest first
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.inner
            .lock()
            .writes
            .iter()
            .filter(|w| w.offset == offset)
            .map(|w| w.value)
            .collect()
    }

    /// Preset the value a read of `offset` returns
    pub fn set_register(&self, offset: u32, value: u32) {
        self.inner.lock().registers.insert(offset, value);
    }

    /// Queue values returned by successive reads of `offset`
    pub fn script_reads(&self, offset: u32, values: &[u32]) {
        self.inner
            .lock()
            .scripted
            .entry(offset)
            .or_default()
            .extend(values.iter().copied());
    }
}

impl RegisterIo for RecordingDevice {
    fn write(&mut self, offset: u32, value: u32) {
        let mut rec = self.inner.lock();
        rec.writes.push(RegisterWrite::new(offset, value));
        rec.registers.insert(offset, value);
    }

    fn read(&mut self, offset: u32) -> u32 {
        let mut rec = self.inner.lock();
        if let Some(value) = rec.scripted.get_mut(&offset).and_then(|q| q.pop_front()) {
            return value;
        }
        rec.registers.get(&offset).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let recorder = RecordingDevice::new();
        let mut dev = recorder.clone();

        dev.write(0x60000, 7);
        dev.write(0x60004, 8);
        dev.write(0x60000, 9);

        assert_eq!(recorder.writes().len(), 3);
        assert_eq!(recorder.last_write_to(0x60000), Some(9));
        assert_eq!(recorder.writes_to(0x60000), vec![7, 9]);
        assert_eq!(recorder.last_write_to(0x60008), None);
    }

    #[test]
    fn test_reads_follow_writes_and_presets() {
        let mut dev = RecordingDevice::new();
        assert_eq!(dev.read(0x10), 0);

        dev.set_register(0x10, 0x0102_0300);
        assert_eq!(dev.read(0x10), 0x0102_0300);

        dev.write(0x44, 1);
        assert_eq!(dev.read(0x44), 1);
    }

    #[test]
    fn test_scripted_reads_run_out() {
        let mut dev = RecordingDevice::new();
        dev.set_register(0x0, 0);
        dev.script_reads(0x0, &[3, 1]);

        assert_eq!(dev.read(0x0), 3);
        assert_eq!(dev.read(0x0), 1);
        assert_eq!(dev.read(0x0), 0);
    }

    #[test]
    fn test_take_writes_drains() {
        let mut dev = RecordingDevice::new();
        dev.write(0x8, 1);
        dev.write(0x8, 0);

        let taken = dev.take_writes();
        assert_eq!(taken.len(), 2);
        assert!(dev.writes().is_empty());
        assert_eq!(dev.read(0x8), 0);
    }
}
