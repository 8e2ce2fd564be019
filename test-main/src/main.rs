use dotenv::dotenv;
use log::{debug, info};
use pipanel_lcd::hd44780::driver::{DEFAULT_ADDRESS, Pcf8574Driver};
use pipanel_lcd::hd44780::{CharDisplay, CursorMode, EntryDirection};
use pipanel_lcd::i2cdev::I2cdevBus;
use std::env::var;
use std::thread::sleep;
use std::time::Duration;
use sysinfo::System;

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "Hello, {}!",
        System::name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!(
        "System ver {} kernel ver {}",
        System::long_os_version().as_deref().unwrap_or(UNKNOWN_STR),
        System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR),
    );
    info!(
        "Hostname {}",
        System::host_name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!("Architecture {}", System::cpu_arch());

    let bus_path = var("PIPANEL_I2C_BUS").unwrap_or_else(|_| "/dev/i2c-1".to_string());
    let address = match var("PIPANEL_LCD_ADDR") {
        Ok(s) => u8::from_str_radix(s.trim().trim_start_matches("0x"), 16)?,
        Err(_) => DEFAULT_ADDRESS,
    };

    let mut bus = I2cdevBus::open(&bus_path)?;
    let mut driver = Pcf8574Driver::new(&mut bus, address);
    let mut lcd = CharDisplay::new_20x4(&mut driver)?;

    debug!("Initializing {:?}...", lcd);
    lcd.initialize()?;

    // Wrapping across all four rows
    lcd.print("The quick brown fox jumps over the lazy dog, again and again and again!")?;
    sleep(Duration::from_secs(2));

    lcd.clear()?;
    lcd.print("Cursor:")?;
    for mode in [CursorMode::Line, CursorMode::Blink, CursorMode::Hide] {
        info!("Cursor mode {:?}", mode);
        lcd.set_cursor_mode(mode)?;
        sleep(Duration::from_secs(1));
    }

    info!("Blinking backlight");
    for _ in 0..3 {
        lcd.set_backlight(false)?;
        sleep(Duration::from_millis(250));
        lcd.set_backlight(true)?;
        sleep(Duration::from_millis(250));
    }

    const HEART: [u8; 8] = [
        0b00000, 0b01010, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
    ];

    lcd.create_char(0, HEART)?;
    lcd.clear()?;
    lcd.print("Glyph: ")?;
    lcd.write_raw(0)?;
    sleep(Duration::from_secs(2));

    info!("Shifting display");
    lcd.shift_display(4)?;
    sleep(Duration::from_secs(1));
    lcd.shift_display(-4)?;
    sleep(Duration::from_secs(1));
    // home also undoes any leftover shift
    lcd.home()?;

    info!("Right-to-left entry");
    lcd.clear()?;
    lcd.set_entry_direction(EntryDirection::RightToLeft)?;
    lcd.set_cursor_pos(0, 19)?;
    lcd.print("desrever")?;
    lcd.set_entry_direction(EntryDirection::LeftToRight)?;
    sleep(Duration::from_secs(2));

    info!("Display off and on");
    lcd.set_display_on(false)?;
    sleep(Duration::from_secs(1));
    lcd.set_display_on(true)?;
    sleep(Duration::from_secs(1));

    lcd.clear()?;
    lcd.print("Done!")?;
    lcd.write_raw(0)?;

    info!("Done.");

    Ok(())
}
