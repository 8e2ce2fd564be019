pub mod hd44780;
pub mod i2cdev;
pub mod mock;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("I2C bus error: {0}")]
    Bus(embedded_hal::i2c::ErrorKind),
    #[error("position out of range")]
    OutOfRange,
    #[error("display not initialized")]
    NotInitialized,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("error: {0}")]
    Other(String),
}

pub type LcdResult<T> = Result<T, LcdError>;

/// A blocking single-byte write primitive for an I2C bus.
///
/// This is the only seam through which the display drivers touch hardware.
/// [i2cdev::I2cdevBus] implements it over the Linux i2c-dev interface, and
/// [mock::MockI2cBus] implements it for tests and development without a
/// display attached.
pub trait I2cBus: Debug {
    /// Writes a single byte to the device at the given 7-bit address.
    fn write_byte(&mut self, address: u8, value: u8) -> LcdResult<()>;
}
