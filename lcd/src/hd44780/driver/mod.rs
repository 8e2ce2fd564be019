//! HD44780 driver module.
//!
//! See the [HD44780Driver] trait for the driver interface and [Pcf8574Driver]
//! for the implementation speaking to the controller through a PCF8574 I2C
//! backpack. Other backpack chips can implement the same trait without any
//! change to the layers above.

mod pcf8574;

use crate::{LcdError, LcdResult};
pub use pcf8574::*;
use std::fmt::Debug;

/// Low-level interface to an HD44780-family controller.
///
/// The default methods encode the HD44780 instruction set and hand the
/// finished bytes to [HD44780Driver::send_command]. The required methods are
/// the pieces only a concrete wiring can provide: the byte transfer itself,
/// the power-on bus synchronization, and the backlight switch of the
/// backpack board.
///
/// This interface is write-only. The common backpack wiring straps R/W low,
/// so the busy flag cannot be polled and implementations substitute fixed
/// worst-case delays after every transfer.
pub trait HD44780Driver: Debug {
    /// Initializes the controller: bus-width synchronization, then function
    /// set, display off, clear, and entry mode, in the order given by the
    /// power-on sequence of the HD44780 datasheet. The display is left off;
    /// callers follow up with [HD44780Driver::set_display_control].
    fn init(&mut self, multiline: bool, alt_font: bool) -> LcdResult<()>;

    /// Clears the display and resets the address counter to zero.
    ///
    /// Command: `00000001`. Executes for up to 1.52 ms; callers must wait
    /// [CLEAR_HOME_DELAY] before the next transfer.
    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(0b00000001)
    }

    /// Sets the cursor to the home position and undoes any display shift.
    ///
    /// Command: `0000001?`. Executes for up to 1.52 ms, like
    /// [HD44780Driver::clear_display].
    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(0b00000010)
    }

    /// Sets the display to the specified entry mode.
    ///
    /// Command: `000001IS`.
    /// `I` is `1` for right cursor direction, `0` for left cursor direction.
    /// `S` is `1` for shifting the display on every write, `0` for no shift.
    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> LcdResult<()> {
        let mut command = 0b00000100;
        if cursor_direction == CursorDirection::Right {
            command |= 0b00000010;
        }
        if shift {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    ///
    /// Command: `00001DCB`. All three bits travel in one instruction, so
    /// changing one requires resending the full state.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> LcdResult<()> {
        let mut command = 0b00001000;
        if display_on {
            command |= 0b00000100;
        }
        if cursor_on {
            command |= 0b00000010;
        }
        if blink_on {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the display window by one position.
    ///
    /// Command: `0001DR??`.
    /// `D` is `1` for display shift, `0` for cursor move.
    /// `R` is `1` for right, `0` for left.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> LcdResult<()> {
        let mut command = 0b00010000;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the function set.
    ///
    /// Command: `001LNF??`.
    /// `L` is `1` for an 8-bit data bus, `0` for 4-bit.
    /// `N` is `1` for two display lines, `0` for one.
    /// `F` is `1` for the 5x10 font, `0` for 5x8.
    fn function_set(&mut self, data_length: bool, two_lines: bool, font: bool) -> LcdResult<()> {
        let mut command = 0b00100000;
        if data_length {
            command |= 0b00010000;
        }
        if two_lines {
            command |= 0b00001000;
        }
        if font {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the CGRAM address.
    fn set_cgram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b00111111 {
            return Err(LcdError::InvalidArgument);
        }
        let command = 0b01000000 | address;
        self.send_command(command)
    }

    /// Sets the DDRAM address.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b01111111 {
            return Err(LcdError::InvalidArgument);
        }
        let command = 0b10000000 | address;
        self.send_command(command)
    }

    // Low-level commands
    // These raw commands are used by the high-level functions above.
    // They are not meant to be used directly, but implemented by the driver implementation.

    /// Sends a command to the HD44780 controller.
    /// Sets the RS pin to 0 (command).
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS pin to 1 (data).
    fn send_data(&mut self, data: u8) -> LcdResult<()>;

    /// Switches the backlight of the display board.
    ///
    /// The state is carried on every subsequent transfer and the switch
    /// itself takes effect immediately.
    fn set_backlight(&mut self, on: bool) -> LcdResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing data.
    Left,
    /// Moves the cursor to the right after writing data.
    Right,
}
