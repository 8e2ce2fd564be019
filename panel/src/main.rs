mod config;
mod utils;
mod app;

use crate::app::App;
use crate::config::Config;
use crate::utils::StrExt;
use dotenv::dotenv;
use log::{debug, info};
use pipanel_lcd::hd44780::CharDisplay;
use pipanel_lcd::hd44780::driver::{DEFAULT_ADDRESS, Pcf8574Driver};
use pipanel_lcd::i2cdev::I2cdevBus;
use std::env::var;
use std::thread;
use std::time::Duration;

fn parse_address(addr_str: &str) -> eyre::Result<u8> {
    let addr_str = addr_str.trim();
    let address = match addr_str.strip_prefix("0x").or_else(|| addr_str.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16)?,
        None => addr_str.parse()?,
    };
    Ok(address)
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("PiPanel starting...");

    // Get the bus and display parameters from env
    let bus_path = var("PIPANEL_I2C_BUS").unwrap_or_else(|_| "/dev/i2c-1".to_string());
    let address = match var("PIPANEL_LCD_ADDR") {
        Ok(s) => parse_address(&s)?,
        Err(_) => DEFAULT_ADDRESS,
    };
    let rows: usize = match var("PIPANEL_LCD_ROWS") {
        Ok(s) => s.parse()?,
        Err(_) => 4,
    };
    let cols: usize = match var("PIPANEL_LCD_COLS") {
        Ok(s) => s.parse()?,
        Err(_) => 20,
    };

    info!(
        "LCD @ {} address 0x{:02x}, {}x{}",
        bus_path, address, cols, rows
    );

    debug!("Initializing I2C bus...");
    let mut bus = I2cdevBus::open(&bus_path)?;
    debug!("{:?} initialized.", bus);

    debug!("Initializing LCD...");
    let mut driver = Pcf8574Driver::new(&mut bus, address);
    let mut lcd = CharDisplay::new(&mut driver, rows, cols)?;
    lcd.initialize()?;

    lcd.print("Initializing")?;

    if lcd.num_rows() >= 3 {
        lcd.set_cursor_pos(1, 0)?;
        lcd.print(&"PiPanel".center(lcd.num_cols()))?;

        const LAST_LINE: &'static str = concat!("v.", env!("CARGO_PKG_VERSION"), "...");

        if LAST_LINE.len() <= lcd.num_cols() {
            lcd.set_cursor_pos(2, lcd.num_cols() - LAST_LINE.len())?;
            lcd.print(LAST_LINE)?;
        }
    }

    debug!("{:?} initialized.", lcd);

    debug!("Trying to load config...");
    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };

    lcd.set_backlight(config.backlight)?;

    debug!("Pages rotate every {}s.", config.page_seconds);

    info!("PiPanel initialized.");

    thread::sleep(Duration::from_secs(1));

    info!("Starting main loop...");

    let mut app = App::new(config, &mut lcd);

    loop {
        app.update()?;

        // Sleep for 1/4th of a second
        thread::sleep(Duration::from_millis(250));
    }
}
