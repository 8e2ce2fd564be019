//! I2C bus backed by a Linux `/dev/i2c-*` character device.

use crate::{I2cBus, LcdError, LcdResult};
use embedded_hal::i2c::{Error as _, I2c};
use linux_embedded_hal::I2cdev;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

pub struct I2cdevBus {
    dev: I2cdev,
    path: PathBuf,
}

impl I2cdevBus {
    /// Opens the I2C character device at `path`, e.g. `/dev/i2c-1`.
    pub fn open(path: impl AsRef<Path>) -> LcdResult<Self> {
        let path = path.as_ref();
        let dev = I2cdev::new(path).map_err(|e| LcdError::Other(e.to_string()))?;
        Ok(I2cdevBus {
            dev,
            path: path.to_path_buf(),
        })
    }
}

impl Debug for I2cdevBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "I2cdevBus({})", self.path.display())
    }
}

impl I2cBus for I2cdevBus {
    fn write_byte(&mut self, address: u8, value: u8) -> LcdResult<()> {
        self.dev
            .write(address, &[value])
            .map_err(|e| LcdError::Bus(e.kind()))
    }
}
