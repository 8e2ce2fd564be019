//! HD44780 character LCD controller.
//!
//! [CharDisplay] keeps the display state (cursor position, display control
//! bits, entry mode) in software and talks to the controller through a
//! [HD44780Driver] implementation such as [driver::Pcf8574Driver].

pub mod driver;

use crate::{LcdError, LcdResult};
use driver::{CursorDirection, HD44780Driver};
use log::{debug, warn};
use std::fmt::{Debug, Formatter};
use std::thread::sleep;

/// Cursor appearance at the current write position.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone)]
pub enum CursorMode {
    /// No visible cursor.
    #[default]
    Hide,
    /// Steady underline.
    Line,
    /// Blinking block.
    Blink,
}

impl CursorMode {
    /// Cursor and blink bits of the display control instruction.
    fn control_bits(self) -> (bool, bool) {
        match self {
            CursorMode::Hide => (false, false),
            CursorMode::Line => (true, false),
            CursorMode::Blink => (false, true),
        }
    }
}

/// Direction the cursor moves after each written character.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone)]
pub enum EntryDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// DDRAM address of the first cell of each row.
///
/// The address layout is fixed by the controller wiring, not by the panel
/// size: two-row panels interleave at `0x40` and four-row panels map rows
/// two and three behind rows zero and one. Only 1, 2 and 4 row panels
/// exist for this controller.
fn row_offsets(num_rows: usize, num_cols: usize) -> LcdResult<[u8; 4]> {
    let max_cols = match num_rows {
        1 => 80,
        2 => 40,
        4 => 20,
        _ => return Err(LcdError::InvalidArgument),
    };
    if num_cols == 0 || num_cols > max_cols {
        return Err(LcdError::InvalidArgument);
    }
    let cols = num_cols as u8;
    Ok(match num_rows {
        1 => [0x00, 0x00, 0x00, 0x00],
        2 => [0x00, 0x40, 0x00, 0x00],
        _ => [0x00, 0x40, cols, 0x40 + cols],
    })
}

/// A character LCD of a known geometry.
///
/// Every operation except [CharDisplay::set_auto_wrap] requires a prior
/// successful [CharDisplay::initialize] and fails with
/// [LcdError::NotInitialized] otherwise. [CharDisplay::initialize] may be
/// called again at any time to recover a display that lost power or got
/// reset behind our back.
pub struct CharDisplay<'a> {
    driver: &'a mut dyn HD44780Driver,
    num_rows: usize,
    num_cols: usize,
    row_offsets: [u8; 4],
    ready: bool,
    row: usize,
    col: usize,
    display_on: bool,
    cursor_mode: CursorMode,
    entry_direction: EntryDirection,
    auto_wrap: bool,
}

impl<'a> CharDisplay<'a> {
    /// Creates a display of the given geometry without touching the bus.
    ///
    /// Fails with [LcdError::InvalidArgument] for geometries the controller
    /// cannot address; see [row_offsets].
    pub fn new(
        driver: &'a mut dyn HD44780Driver,
        num_rows: usize,
        num_cols: usize,
    ) -> LcdResult<Self> {
        let row_offsets = row_offsets(num_rows, num_cols)?;
        Ok(CharDisplay {
            driver,
            num_rows,
            num_cols,
            row_offsets,
            ready: false,
            row: 0,
            col: 0,
            display_on: true,
            cursor_mode: CursorMode::default(),
            entry_direction: EntryDirection::default(),
            auto_wrap: true,
        })
    }

    /// Creates a display with the common 20x4 geometry.
    pub fn new_20x4(driver: &'a mut dyn HD44780Driver) -> LcdResult<Self> {
        Self::new(driver, 4, 20)
    }

    fn ensure_ready(&self) -> LcdResult<()> {
        if self.ready {
            Ok(())
        } else {
            Err(LcdError::NotInitialized)
        }
    }

    /// Runs the power-on sequence and applies the configured display state.
    pub fn initialize(&mut self) -> LcdResult<()> {
        debug!(
            "Initializing {}x{} display...",
            self.num_cols, self.num_rows
        );
        self.ready = false;
        self.driver.init(self.num_rows >= 2, false)?;
        self.apply_display_control()?;
        self.apply_entry_mode()?;
        self.row = 0;
        self.col = 0;
        self.ready = true;
        debug!("{:?} initialized.", self);
        Ok(())
    }

    fn apply_display_control(&mut self) -> LcdResult<()> {
        let (cursor_on, blink_on) = self.cursor_mode.control_bits();
        self.driver
            .set_display_control(self.display_on, cursor_on, blink_on)
    }

    fn apply_entry_mode(&mut self) -> LcdResult<()> {
        let direction = match self.entry_direction {
            EntryDirection::LeftToRight => CursorDirection::Right,
            EntryDirection::RightToLeft => CursorDirection::Left,
        };
        // The shift bit would scroll the whole display on every write;
        // wrapping is handled in software instead.
        self.driver.set_entry_mode(direction, false)
    }

    /// Clears the display and returns the cursor to the origin.
    pub fn clear(&mut self) -> LcdResult<()> {
        self.ensure_ready()?;
        self.driver.clear_display()?;
        sleep(driver::CLEAR_HOME_DELAY);
        self.row = 0;
        self.col = 0;
        Ok(())
    }

    /// Returns the cursor to the origin and undoes any display shift.
    pub fn home(&mut self) -> LcdResult<()> {
        self.ensure_ready()?;
        self.driver.return_home()?;
        sleep(driver::CLEAR_HOME_DELAY);
        self.row = 0;
        self.col = 0;
        Ok(())
    }

    /// Moves the cursor to the given zero-based row and column.
    pub fn set_cursor_pos(&mut self, row: usize, col: usize) -> LcdResult<()> {
        self.ensure_ready()?;
        if row >= self.num_rows || col >= self.num_cols {
            return Err(LcdError::OutOfRange);
        }
        self.driver
            .set_ddram_address(self.row_offsets[row] + col as u8)?;
        self.row = row;
        self.col = col;
        Ok(())
    }

    /// Writes text at the cursor position.
    ///
    /// Characters are sent as their Latin-1 byte, which matches the A00
    /// character ROM for the ASCII range. Anything above U+00FF cannot be
    /// represented and is replaced with `?`.
    pub fn print(&mut self, text: &str) -> LcdResult<()> {
        self.ensure_ready()?;
        for c in text.chars() {
            let code = u32::from(c);
            if code <= 0xFF {
                self.write_raw(code as u8)?;
            } else {
                warn!("Character {:?} is not representable on the character ROM", c);
                self.write_raw(b'?')?;
            }
        }
        Ok(())
    }

    /// Writes one raw character code at the cursor position.
    ///
    /// Codes `0x00..=0x07` address the glyphs defined with
    /// [CharDisplay::create_char].
    pub fn write_raw(&mut self, byte: u8) -> LcdResult<()> {
        self.ensure_ready()?;
        self.driver.send_data(byte)?;
        self.advance_cursor()
    }

    /// Tracks the controller's automatic address increment or decrement,
    /// repositioning when a row boundary is crossed with wrapping on.
    fn advance_cursor(&mut self) -> LcdResult<()> {
        match self.entry_direction {
            EntryDirection::LeftToRight => {
                self.col += 1;
                if self.auto_wrap && self.col >= self.num_cols {
                    let row = (self.row + 1) % self.num_rows;
                    self.set_cursor_pos(row, 0)?;
                }
            }
            EntryDirection::RightToLeft => {
                if self.col == 0 {
                    if self.auto_wrap {
                        let row = (self.row + 1) % self.num_rows;
                        self.set_cursor_pos(row, self.num_cols - 1)?;
                    }
                } else {
                    self.col -= 1;
                }
            }
        }
        Ok(())
    }

    /// Sets the cursor appearance.
    pub fn set_cursor_mode(&mut self, mode: CursorMode) -> LcdResult<()> {
        self.ensure_ready()?;
        self.cursor_mode = mode;
        self.apply_display_control()
    }

    /// Turns the display output on or off. Display contents and the cursor
    /// position are kept while off.
    pub fn set_display_on(&mut self, on: bool) -> LcdResult<()> {
        self.ensure_ready()?;
        self.display_on = on;
        self.apply_display_control()
    }

    /// Turns the backlight on or off. Takes effect immediately.
    pub fn set_backlight(&mut self, on: bool) -> LcdResult<()> {
        self.ensure_ready()?;
        self.driver.set_backlight(on)
    }

    /// Sets the direction the cursor moves after each written character.
    pub fn set_entry_direction(&mut self, direction: EntryDirection) -> LcdResult<()> {
        self.ensure_ready()?;
        self.entry_direction = direction;
        self.apply_entry_mode()
    }

    /// Enables or disables wrapping to the next row at the end of a row.
    ///
    /// With wrapping off the cursor position keeps counting past the edge
    /// and writes land wherever the controller's address counter points.
    pub fn set_auto_wrap(&mut self, wrap: bool) {
        self.auto_wrap = wrap;
    }

    /// Current zero-based cursor position as `(row, col)`.
    pub fn cursor_pos(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Defines one of the eight custom glyphs from a 5x8 pixel pattern,
    /// one row per byte, top to bottom.
    ///
    /// The glyph is then printed with [CharDisplay::write_raw] and the
    /// matching `location` code.
    pub fn create_char(&mut self, location: u8, pattern: [u8; 8]) -> LcdResult<()> {
        self.ensure_ready()?;
        if location > 7 {
            return Err(LcdError::InvalidArgument);
        }
        self.driver.set_cgram_address(location << 3)?;
        for line in pattern {
            self.driver.send_data(line)?;
        }
        // Writing CGRAM moved the address counter; point it back at DDRAM.
        self.set_cursor_pos(self.row, self.col)
    }

    /// Shifts the visible window `amount` cells, positive to the right.
    /// The cursor position within DDRAM does not change.
    pub fn shift_display(&mut self, amount: i32) -> LcdResult<()> {
        self.ensure_ready()?;
        let direction = if amount >= 0 {
            CursorDirection::Right
        } else {
            CursorDirection::Left
        };
        for _ in 0..amount.unsigned_abs() {
            self.driver.cursor_shift(true, direction)?;
        }
        Ok(())
    }
}

impl Debug for CharDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CharDisplay({}x{}, {:?})",
            self.num_cols, self.num_rows, self.driver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::driver::{DEFAULT_ADDRESS, Pcf8574Driver};
    use super::*;
    use crate::mock::MockI2cBus;

    /// Reconstructs `(rs, byte)` transfers from raw expander writes by
    /// pairing up the E-high latches of consecutive nibbles.
    fn decode_transfers(writes: &[(u8, u8)]) -> Vec<(bool, u8)> {
        writes
            .iter()
            .map(|&(_, b)| b)
            .filter(|b| b & 0b0100 != 0)
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| {
                let rs = pair[0] & 0b0001 != 0;
                let byte = (pair[0] & 0xF0) | (pair[1] >> 4);
                (rs, byte)
            })
            .collect()
    }

    fn decoded(handle: &MockI2cBus) -> Vec<(bool, u8)> {
        decode_transfers(&handle.writes())
    }

    const HEART: [u8; 8] = [
        0b00000, 0b01010, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
    ];

    #[test]
    fn initialize_sends_the_classic_sequence() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new_20x4(&mut driver).unwrap();

        lcd.initialize().unwrap();

        // Resync, 4-bit switch, function set, display off, clear, entry
        // mode, then the configured display control and entry mode.
        assert_eq!(
            decoded(&handle),
            vec![
                (false, 0x33),
                (false, 0x32),
                (false, 0x28),
                (false, 0x08),
                (false, 0x01),
                (false, 0x06),
                (false, 0x0C),
                (false, 0x06),
            ],
        );
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn single_row_display_configures_one_line() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 1, 16).unwrap();

        lcd.initialize().unwrap();

        assert_eq!(decoded(&handle)[2], (false, 0x20));
    }

    #[test]
    fn operations_fail_before_initialize() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();

        assert_eq!(lcd.clear(), Err(LcdError::NotInitialized));
        assert_eq!(lcd.home(), Err(LcdError::NotInitialized));
        assert_eq!(lcd.set_cursor_pos(0, 0), Err(LcdError::NotInitialized));
        assert_eq!(lcd.print("hi"), Err(LcdError::NotInitialized));
        assert_eq!(
            lcd.set_cursor_mode(CursorMode::Blink),
            Err(LcdError::NotInitialized)
        );
        assert_eq!(lcd.set_backlight(false), Err(LcdError::NotInitialized));
        assert_eq!(lcd.set_display_on(false), Err(LcdError::NotInitialized));
        assert_eq!(lcd.create_char(0, HEART), Err(LcdError::NotInitialized));
        assert_eq!(lcd.shift_display(1), Err(LcdError::NotInitialized));
        assert!(handle.writes().is_empty());

        lcd.initialize().unwrap();
        assert_eq!(lcd.clear(), Ok(()));
    }

    #[test]
    fn initialize_failure_leaves_display_not_ready() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        handle.fail_from(0);
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();

        assert!(matches!(lcd.initialize(), Err(LcdError::Bus(_))));
        assert_eq!(lcd.clear(), Err(LcdError::NotInitialized));
    }

    #[test]
    fn cursor_addressing_uses_the_four_row_table() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new_20x4(&mut driver).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.set_cursor_pos(1, 3).unwrap();
        lcd.set_cursor_pos(2, 0).unwrap();
        lcd.set_cursor_pos(3, 7).unwrap();

        assert_eq!(
            decoded(&handle),
            vec![(false, 0xC3), (false, 0x94), (false, 0xDB)],
        );
        assert_eq!(lcd.cursor_pos(), (3, 7));
    }

    #[test]
    fn cursor_addressing_uses_the_two_row_table() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.set_cursor_pos(1, 0).unwrap();

        assert_eq!(decoded(&handle), vec![(false, 0xC0)]);
    }

    #[test]
    fn four_row_offsets_follow_the_column_count() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 4, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        // On a 16-column panel the lower rows start at 0x10 and 0x50.
        lcd.set_cursor_pos(2, 0).unwrap();
        lcd.set_cursor_pos(3, 0).unwrap();

        assert_eq!(decoded(&handle), vec![(false, 0x90), (false, 0xD0)]);
    }

    #[test]
    fn out_of_range_positions_send_nothing() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        assert_eq!(lcd.set_cursor_pos(2, 0), Err(LcdError::OutOfRange));
        assert_eq!(lcd.set_cursor_pos(0, 16), Err(LcdError::OutOfRange));
        assert!(handle.writes().is_empty());
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn invalid_geometries_are_rejected() {
        let mut bus = MockI2cBus::new();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);

        for (rows, cols) in [(3, 16), (0, 16), (2, 0), (4, 21), (2, 41), (1, 81)] {
            assert!(matches!(
                CharDisplay::new(&mut driver, rows, cols),
                Err(LcdError::InvalidArgument)
            ));
        }
        assert!(CharDisplay::new(&mut driver, 1, 80).is_ok());
        assert!(CharDisplay::new(&mut driver, 2, 40).is_ok());
        assert!(CharDisplay::new_20x4(&mut driver).is_ok());
    }

    #[test]
    fn print_writes_data_and_tracks_the_cursor() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.print("Hi").unwrap();

        assert_eq!(decoded(&handle), vec![(true, 0x48), (true, 0x69)]);
        assert_eq!(lcd.cursor_pos(), (0, 2));
    }

    #[test]
    fn print_wraps_to_the_next_row() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_cursor_pos(0, 15).unwrap();
        handle.clear();

        lcd.print("AB").unwrap();

        // The wrap repositions the address counter at the next row start.
        assert_eq!(
            decoded(&handle),
            vec![(true, 0x41), (false, 0xC0), (true, 0x42)],
        );
        assert_eq!(lcd.cursor_pos(), (1, 1));
    }

    #[test]
    fn twenty_one_characters_put_one_on_the_next_row() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new_20x4(&mut driver).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.print(&"x".repeat(21)).unwrap();

        let transfers = decoded(&handle);
        // Twenty data writes fill row zero, then the wrap reposition and
        // the final character.
        assert_eq!(transfers.len(), 22);
        assert!(transfers[..20].iter().all(|&t| t == (true, 0x78)));
        assert_eq!(transfers[20], (false, 0xC0));
        assert_eq!(transfers[21], (true, 0x78));
        assert_eq!(lcd.cursor_pos(), (1, 1));
    }

    #[test]
    fn wrap_from_the_last_row_returns_to_the_origin() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_cursor_pos(1, 15).unwrap();
        handle.clear();

        lcd.print("Z").unwrap();

        assert_eq!(decoded(&handle), vec![(true, 0x5A), (false, 0x80)]);
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn auto_wrap_off_keeps_counting_past_the_edge() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_auto_wrap(false);
        lcd.set_cursor_pos(0, 15).unwrap();
        handle.clear();

        lcd.print("AB").unwrap();

        assert_eq!(decoded(&handle), vec![(true, 0x41), (true, 0x42)]);
        assert_eq!(lcd.cursor_pos(), (0, 17));
    }

    #[test]
    fn clear_resets_the_cursor() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.print("abc").unwrap();
        handle.clear();

        lcd.clear().unwrap();

        assert_eq!(decoded(&handle), vec![(false, 0x01)]);
        assert_eq!(lcd.cursor_pos(), (0, 0));

        // The next write starts at the origin without repositioning.
        handle.clear();
        lcd.print("x").unwrap();
        assert_eq!(decoded(&handle), vec![(true, 0x78)]);
    }

    #[test]
    fn home_resets_the_cursor() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_cursor_pos(1, 5).unwrap();
        handle.clear();

        lcd.home().unwrap();

        assert_eq!(decoded(&handle), vec![(false, 0x02)]);
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn cursor_modes_map_to_display_control() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.set_cursor_mode(CursorMode::Line).unwrap();
        lcd.set_cursor_mode(CursorMode::Blink).unwrap();
        lcd.set_cursor_mode(CursorMode::Hide).unwrap();

        assert_eq!(
            decoded(&handle),
            vec![(false, 0x0E), (false, 0x0D), (false, 0x0C)],
        );
    }

    #[test]
    fn display_off_keeps_the_cursor_mode() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_cursor_mode(CursorMode::Line).unwrap();
        handle.clear();

        lcd.set_display_on(false).unwrap();
        lcd.set_display_on(true).unwrap();

        assert_eq!(decoded(&handle), vec![(false, 0x0A), (false, 0x0E)]);
    }

    #[test]
    fn unmappable_characters_become_question_marks() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.print("°€").unwrap();

        // U+00B0 fits in a byte and goes out raw; U+20AC does not.
        assert_eq!(decoded(&handle), vec![(true, 0xB0), (true, 0x3F)]);
    }

    #[test]
    fn create_char_writes_cgram_and_restores_the_cursor() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_cursor_pos(1, 2).unwrap();
        handle.clear();

        lcd.create_char(2, HEART).unwrap();

        let mut expected = vec![(false, 0x50)];
        expected.extend(HEART.iter().map(|&line| (true, line)));
        expected.push((false, 0xC2));
        assert_eq!(decoded(&handle), expected);
        assert_eq!(lcd.cursor_pos(), (1, 2));
    }

    #[test]
    fn create_char_rejects_locations_past_seven() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        assert_eq!(lcd.create_char(8, HEART), Err(LcdError::InvalidArgument));
        assert!(handle.writes().is_empty());
    }

    #[test]
    fn right_to_left_entry_decrements_and_wraps() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new_20x4(&mut driver).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.set_entry_direction(EntryDirection::RightToLeft).unwrap();
        assert_eq!(decoded(&handle), vec![(false, 0x04)]);

        lcd.set_cursor_pos(1, 1).unwrap();
        handle.clear();
        lcd.print("ab").unwrap();

        // `b` lands at column zero, so the wrap jumps to the right edge of
        // the next row.
        assert_eq!(
            decoded(&handle),
            vec![(true, 0x61), (true, 0x62), (false, 0xA7)],
        );
        assert_eq!(lcd.cursor_pos(), (2, 19));
    }

    #[test]
    fn right_to_left_without_wrap_stays_at_column_zero() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        lcd.set_entry_direction(EntryDirection::RightToLeft).unwrap();
        lcd.set_auto_wrap(false);
        handle.clear();

        lcd.print("xy").unwrap();

        assert_eq!(decoded(&handle), vec![(true, 0x78), (true, 0x79)]);
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn shift_display_repeats_the_shift_instruction() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.shift_display(2).unwrap();
        lcd.shift_display(-1).unwrap();
        lcd.shift_display(0).unwrap();

        assert_eq!(
            decoded(&handle),
            vec![(false, 0x1C), (false, 0x1C), (false, 0x18)],
        );
    }

    #[test]
    fn backlight_passes_through_to_the_driver() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.clear();

        lcd.set_backlight(false).unwrap();

        assert_eq!(handle.writes(), vec![(DEFAULT_ADDRESS, 0x00)]);
    }

    #[test]
    fn bus_failure_during_print_propagates() {
        let mut bus = MockI2cBus::new();
        let handle = bus.clone();
        let mut driver = Pcf8574Driver::new(&mut bus, DEFAULT_ADDRESS);
        let mut lcd = CharDisplay::new(&mut driver, 2, 16).unwrap();
        lcd.initialize().unwrap();
        handle.fail_from(handle.writes().len());

        assert!(matches!(lcd.print("A"), Err(LcdError::Bus(_))));
    }
}
