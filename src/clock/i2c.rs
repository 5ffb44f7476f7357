//! # I2C bus boundary.
//!
//! [`I2cBus`] is the only thing the display knows about the hardware. Real
//! targets implement it over their HAL; [`RecordingBus`] keeps every frame in
//! memory and is what the demo and tests use.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::core::I2cConfig;
use crate::error::BusError;

/// Master-side access to a single I2C device.
pub trait I2cBus: Send + 'static {
    /// Writes one frame to the device.
    fn write(&mut self, data: &[u8]) -> Result<(), BusError>;

    /// Reads `len` bytes from the device.
    fn read(&mut self, len: usize) -> Result<Vec<u8>, BusError>;
}

/// In-memory bus that records written frames.
///
/// Cloning shares the same record, so a test can keep one handle while the
/// display owns the other.
#[derive(Clone, Debug)]
pub struct RecordingBus {
    address: u8,
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_writes: Arc<Mutex<u32>>,
}

impl RecordingBus {
    /// Creates a bus for the configured device address.
    pub fn new(cfg: &I2cConfig) -> Self {
        Self {
            address: cfg.address,
            frames: Arc::new(Mutex::new(Vec::new())),
            fail_writes: Arc::new(Mutex::new(0)),
        }
    }

    /// Snapshot of every frame written so far.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().clone()
    }

    /// Forgets recorded frames.
    pub fn clear(&self) {
        self.frames.lock().clear();
    }

    /// Makes the next `n` writes fail with [`BusError::Nack`].
    pub fn fail_next_writes(&self, n: u32) {
        *self.fail_writes.lock() = n;
    }
}

impl I2cBus for RecordingBus {
    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        if data.is_empty() {
            return Err(BusError::EmptyWrite);
        }
        {
            let mut remaining = self.fail_writes.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(BusError::Nack {
                    address: self.address,
                });
            }
        }
        debug!(address = self.address, frame = ?data, "i2c write");
        self.frames.lock().push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, len: usize) -> Result<Vec<u8>, BusError> {
        Ok(vec![0; len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_write_is_rejected() {
        let mut bus = RecordingBus::new(&I2cConfig::default());
        assert_eq!(bus.write(&[]), Err(BusError::EmptyWrite));
        assert!(bus.frames().is_empty());
    }

    #[test]
    fn test_injected_failures_are_consumed() {
        let mut bus = RecordingBus::new(&I2cConfig::default());
        bus.fail_next_writes(1);
        assert_eq!(bus.write(&[1]), Err(BusError::Nack { address: 0x70 }));
        assert_eq!(bus.write(&[2]), Ok(()));
        assert_eq!(bus.frames(), vec![vec![2]]);
    }
}
