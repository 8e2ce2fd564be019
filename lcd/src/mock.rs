//! Mock I2C bus for tests and hardware-free development.

use crate::{I2cBus, LcdError, LcdResult};
use embedded_hal::i2c::ErrorKind;
use std::sync::{Arc, Mutex, MutexGuard};

/// State shared between a [MockI2cBus] and its clones.
#[derive(Debug, Default)]
pub struct MockBusState {
    /// Every `(address, byte)` write, in order.
    pub writes: Vec<(u8, u8)>,
    /// When set, the write at this index and every later one fail.
    pub fail_from: Option<usize>,
}

/// [I2cBus] implementation that records writes instead of touching
/// hardware.
///
/// Clones share their state, so a test can hand one handle to a driver and
/// keep another for inspection.
#[derive(Debug, Default, Clone)]
pub struct MockI2cBus {
    state: Arc<Mutex<MockBusState>>,
}

impl MockI2cBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state shared with every clone of this bus.
    pub fn state(&self) -> Arc<Mutex<MockBusState>> {
        Arc::clone(&self.state)
    }

    /// Makes the write at `index` and every later one fail with a bus
    /// error.
    pub fn fail_from(&self, index: usize) {
        self.lock().fail_from = Some(index);
    }

    /// Copy of all recorded writes.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.lock().writes.clone()
    }

    /// Forgets all recorded writes.
    pub fn clear(&self) {
        self.lock().writes.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockBusState> {
        self.state.lock().expect("mock bus state lock poisoned")
    }
}

impl I2cBus for MockI2cBus {
    fn write_byte(&mut self, address: u8, value: u8) -> LcdResult<()> {
        let mut state = self.lock();
        if let Some(fail_from) = state.fail_from {
            if state.writes.len() >= fail_from {
                return Err(LcdError::Bus(ErrorKind::Other));
            }
        }
        state.writes.push((address, value));
        Ok(())
    }
}
