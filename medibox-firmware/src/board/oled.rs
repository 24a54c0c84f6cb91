//! DisplaySink over the SSD1306 panel

use defmt::warn;
use embassy_rp::i2c::{Blocking, I2c};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use medibox_core::traits::DisplaySink;

use crate::display::ssd1306::Ssd1306;

type PanelI2c = I2c<'static, Blocking>;

/// Text-line sink over the frame-buffered panel driver
///
/// Every call flushes immediately; the control loop expects what it
/// printed to be visible before it blocks.
pub struct Oled {
    panel: Ssd1306<PanelI2c>,
}

impl Oled {
    pub fn new(panel: Ssd1306<PanelI2c>) -> Self {
        Self { panel }
    }

    fn flush(&mut self) {
        if self.panel.flush().is_err() {
            warn!("display flush failed");
        }
    }
}

impl DisplaySink for Oled {
    fn clear(&mut self) {
        self.panel.clear_buffer();
        self.flush();
    }

    fn print_line(&mut self, text: &str, column: u8, row: u8, size: u8) {
        let style = if size >= 2 {
            MonoTextStyle::new(&FONT_10X20, BinaryColor::On)
        } else {
            MonoTextStyle::new(&FONT_6X10, BinaryColor::On)
        };
        let position = Point::new(column as i32, row as i32);
        // Draw target is infallible; clipping happens at the buffer edge
        let _ = Text::with_baseline(text, position, style, Baseline::Top).draw(&mut self.panel);
        self.flush();
    }
}
