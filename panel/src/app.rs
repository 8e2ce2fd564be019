//! The module for the main panel state and logic.

use crate::config::Config;
use crate::utils::StrExt;
use log::{debug, info};
use pipanel_lcd::LcdResult;
use pipanel_lcd::hd44780::CharDisplay;
use std::time::{Duration, Instant};
use sysinfo::System;
use time::OffsetDateTime;

/// 5x8 patterns for partially filled gauge cells, one to four columns of
/// pixels wide. Full cells use the character ROM's solid block at `0xFF`.
const BAR_GLYPHS: [[u8; 8]; 4] = [
    [0b10000; 8],
    [0b11000; 8],
    [0b11100; 8],
    [0b11110; 8],
];

/// Renders a gauge bar `cells` wide, filled to `fraction` of its width.
///
/// Partial cells use the glyph codes defined from [BAR_GLYPHS], full cells
/// the solid block.
fn bar(fraction: f64, cells: usize) -> String {
    let filled = fraction.clamp(0.0, 1.0) * cells as f64;
    let mut out = String::with_capacity(cells);
    for i in 0..cells {
        let cell = (filled - i as f64).clamp(0.0, 1.0);
        let level = (cell * 5.0).round() as u8;
        match level {
            0 => out.push(' '),
            5 => out.push('\u{FF}'),
            level => out.push(char::from(level - 1)),
        }
    }
    out
}

/// Enum for the pages the panel cycles through.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
enum Page {
    /// Local time and date.
    #[default]
    Clock,
    /// Host and OS identification.
    System,
    /// CPU, memory and uptime.
    Load,
}

impl Page {
    fn next(self) -> Page {
        match self {
            Page::Clock => Page::System,
            Page::System => Page::Load,
            Page::Load => Page::Clock,
        }
    }
}

/// The main panel state struct.
pub struct App<'a, 'b> {
    /// The configuration for the panel.
    config: Config,
    /// The display the pages are drawn on.
    lcd: &'a mut CharDisplay<'b>,
    /// The page currently shown.
    page: Page,
    /// When the current page was put up.
    page_since: Instant,
    /// System information sampled for the load page.
    system: System,
    /// Rows as last drawn, to skip writes for unchanged rows.
    last_rows: Vec<String>,
    /// Whether the first page has been drawn yet.
    started: bool,
}

impl <'a, 'b> App<'a, 'b> {
    /// Creates a new instance of the App.
    pub fn new(config: Config, lcd: &'a mut CharDisplay<'b>) -> App<'a, 'b> {
        App {
            config,
            lcd,
            page: Page::default(),
            page_since: Instant::now(),
            system: System::new(),
            last_rows: Vec::new(),
            started: false,
        }
    }

    /// Advances the page rotation and refreshes the display.
    pub fn update(&mut self) -> LcdResult<()> {
        if !self.started {
            debug!("Defining gauge glyphs...");
            for (i, pattern) in BAR_GLYPHS.iter().enumerate() {
                self.lcd.create_char(i as u8, *pattern)?;
            }
            self.started = true;
            self.show_page(self.page)?;
            return Ok(());
        }

        if self.page_since.elapsed() >= Duration::from_secs(self.config.page_seconds) {
            self.show_page(self.page.next())?;
            return Ok(());
        }

        self.refresh()
    }

    /// Switches to `page` and draws it from scratch.
    fn show_page(&mut self, page: Page) -> LcdResult<()> {
        info!("Showing page {:?}.", page);
        self.page = page;
        self.page_since = Instant::now();
        self.last_rows.clear();
        self.lcd.clear()?;
        self.refresh()
    }

    /// Redraws the current page, rewriting only the rows that changed.
    fn refresh(&mut self) -> LcdResult<()> {
        let rows = match self.page {
            Page::Clock => self.clock_rows(),
            Page::System => self.system_rows(),
            Page::Load => self.load_rows(),
        };

        for (i, row) in rows.iter().take(self.lcd.num_rows()).enumerate() {
            let padded = row.fit(self.lcd.num_cols());
            if self.last_rows.get(i) == Some(&padded) {
                continue;
            }
            self.lcd.set_cursor_pos(i, 0)?;
            self.lcd.print(&padded)?;
            if i < self.last_rows.len() {
                self.last_rows[i] = padded;
            } else {
                self.last_rows.push(padded);
            }
        }
        Ok(())
    }

    fn clock_rows(&self) -> Vec<String> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let width = self.lcd.num_cols();

        let mut rows = Vec::new();
        if self.lcd.num_rows() >= 4 {
            rows.push(String::new());
        }
        rows.push(
            format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second()).center(width),
        );
        rows.push(
            format!("{:02}.{:02}.{}", now.day(), u8::from(now.month()), now.year()).center(width),
        );
        rows
    }

    fn system_rows(&self) -> Vec<String> {
        const UNKNOWN_STR: &str = "???";

        vec![
            System::host_name()
                .as_deref()
                .unwrap_or(UNKNOWN_STR)
                .to_string(),
            System::name().as_deref().unwrap_or(UNKNOWN_STR).to_string(),
            System::kernel_version()
                .as_deref()
                .unwrap_or(UNKNOWN_STR)
                .to_string(),
            System::cpu_arch(),
        ]
    }

    fn load_rows(&mut self) -> Vec<String> {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu = f64::from(self.system.global_cpu_usage()) / 100.0;
        let total = self.system.total_memory();
        let mem = if total == 0 {
            0.0
        } else {
            self.system.used_memory() as f64 / total as f64
        };
        let up = System::uptime();

        vec![
            self.gauge("CPU", cpu),
            self.gauge("MEM", mem),
            format!(
                "Up {}d {:02}:{:02}",
                up / 86_400,
                (up / 3600) % 24,
                (up / 60) % 60
            ),
        ]
    }

    fn gauge(&self, label: &str, fraction: f64) -> String {
        let cells = self.lcd.num_cols().saturating_sub(label.len() + 1);
        let mut row = String::from(label);
        row.push(' ');
        row.push_str(&bar(fraction, cells));
        row
    }
}
