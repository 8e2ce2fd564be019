use crate::hd44780::driver::{CursorDirection, HD44780Driver};
use crate::{I2cBus, LcdResult};
use log::trace;
use std::fmt::{Debug, Formatter};
use std::thread::sleep;
use std::time::Duration;

/// Default 7-bit address of a PCF8574 backpack with A0..A2 left open.
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Execution time of the clear and return-home instructions, which run far
/// longer than the rest of the instruction set. Callers sending either one
/// through [HD44780Driver::send_command] must wait this long afterwards.
pub const CLEAR_HOME_DELAY: Duration = Duration::from_millis(2);

// Expander pin assignment of the common HD44780 backpack boards:
//
// | 7  | 6  | 5  | 4  | 3  | 2 | 1  | 0  |
// |----|----|----|----|----|---|----|----|
// | D7 | D6 | D5 | D4 | BL | E | RW | RS |
//
// RW is strapped to write and never raised.
const PIN_RS: u8 = 0b00000001;
const PIN_E: u8 = 0b00000100;
const PIN_BACKLIGHT: u8 = 0b00001000;

// The controller latches data on the falling edge of E. The datasheet wants
// the pulse held high for at least 450 ns and most instructions finish
// within 37-50 us of the latch.
const E_PULSE_WIDTH: Duration = Duration::from_micros(1);
const EXECUTION_DELAY: Duration = Duration::from_micros(50);

// Delays between the forced 8-bit writes of the power-on resync.
const RESYNC_DELAY: Duration = Duration::from_micros(4500);
const RESYNC_SETTLE: Duration = Duration::from_micros(150);

/// [HD44780Driver] implementation driving the controller in 4-bit mode
/// through a PCF8574 I2C GPIO expander.
///
/// The expander has no registers; every byte written to it appears directly
/// on its pins. One nibble transfer is therefore two bus writes: the
/// composed byte with E high, then the same byte with E low to latch it.
/// The backlight pin state is carried in both, since dropping it on any
/// write would visibly blink the display.
pub struct Pcf8574Driver<'a> {
    bus: &'a mut dyn I2cBus,
    address: u8,
    backlight: bool,
}

impl<'a> Pcf8574Driver<'a> {
    /// Creates a driver for the expander at `address`. The backlight starts
    /// enabled.
    pub fn new(bus: &'a mut dyn I2cBus, address: u8) -> Self {
        Pcf8574Driver {
            bus,
            address,
            backlight: true,
        }
    }

    fn expander_bits(&self, nibble: u8, rs: bool) -> u8 {
        let mut byte = nibble << 4;
        if rs {
            byte |= PIN_RS;
        }
        if self.backlight {
            byte |= PIN_BACKLIGHT;
        }
        byte
    }

    /// Latches one nibble onto the data lines, leaving E low, and waits out
    /// the instruction execution time.
    fn write_nibble(&mut self, nibble: u8, rs: bool) -> LcdResult<()> {
        trace!("Writing nibble: {:04b}, RS: {}", nibble, rs);
        let byte = self.expander_bits(nibble, rs);
        self.bus.write_byte(self.address, byte | PIN_E)?;
        sleep(E_PULSE_WIDTH);
        self.bus.write_byte(self.address, byte)?;
        sleep(EXECUTION_DELAY);
        Ok(())
    }

    fn send(&mut self, data: u8, rs: bool) -> LcdResult<()> {
        trace!("Sending data: {:08b}, RS: {}", data, rs);
        self.write_nibble((data >> 4) & 0x0F, rs)?;
        self.write_nibble(data & 0x0F, rs)
    }
}

impl Debug for Pcf8574Driver<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pcf8574Driver(0x{:02x} on {:?})", self.address, self.bus)
    }
}

impl HD44780Driver for Pcf8574Driver<'_> {
    fn init(&mut self, multiline: bool, alt_font: bool) -> LcdResult<()> {
        // Synchronize. The controller powers up in 8-bit mode but may also
        // be in 4-bit mode or halfway through a nibble pair after a warm
        // restart; three 0b0011 writes settle every case before the switch
        // to 4-bit mode.
        self.write_nibble(0b0011, false)?;
        sleep(RESYNC_DELAY);
        self.write_nibble(0b0011, false)?;
        sleep(RESYNC_DELAY);
        self.write_nibble(0b0011, false)?;
        sleep(RESYNC_SETTLE);
        self.write_nibble(0b0010, false)?;

        self.function_set(false, multiline, alt_font)?;
        self.set_display_control(false, false, false)?;
        self.clear_display()?;
        sleep(CLEAR_HOME_DELAY);
        self.set_entry_mode(CursorDirection::Right, false)?;
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        self.send(command, false)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        self.send(data, true)
    }

    fn set_backlight(&mut self, on: bool) -> LcdResult<()> {
        trace!("Setting backlight: {}", on);
        self.backlight = on;
        // One raw expander write with E low, so the change shows without
        // waiting for the next instruction.
        let byte = if on { PIN_BACKLIGHT } else { 0 };
        self.bus.write_byte(self.address, byte)
    }
}
