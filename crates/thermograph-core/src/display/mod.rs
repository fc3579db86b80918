//! 16x2 character LCD adapter.
//!
//! Text goes straight to the controller through [`CharacterLcd`]. Graphics are
//! drawn into an [`LcdBitmap`], a 20x16 pixel region assembled from the eight
//! user-definable 5x8 characters and placed at a fixed cell position.

pub mod bitmap;
pub mod format;
pub mod glyph;

use log::{debug, error};
use thiserror_no_std::Error;

pub use bitmap::{BITMAP_COLUMNS, BITMAP_HEIGHT, BITMAP_ROWS, BITMAP_WIDTH, LcdBitmap};
pub use glyph::Glyph;

pub const LCD_COLUMNS: u8 = 16;
pub const LCD_ROWS: u8 = 2;

/// Degree sign in the HD44780 A00 character ROM.
pub const LCD_DEGREE: u8 = 0xDF;

/// Minimal text-mode LCD controller interface.
pub trait CharacterLcd {
    type Error: core::fmt::Debug;

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error>;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Program custom character `slot` (0..8). Rows are 5 bits wide, MSB left.
    fn define_char(&mut self, slot: u8, rows: [u8; 8]) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("LCD write failed")]
    Lcd,
    #[error("Text position ({col}, {row}) is off screen")]
    OutOfBounds { col: u8, row: u8 },
    #[error("Glyph slot {slot} does not exist")]
    InvalidSlot { slot: u8 },
}

/// Text plus bitmap front end used by the display modes.
pub struct Display<L> {
    lcd: L,
    bitmap: LcdBitmap,
    bitmap_column: u8,
    bitmap_row: u8,
    /// Whether the bitmap codes are currently on screen.
    placed: bool,
}

impl<L: CharacterLcd> Display<L> {
    pub fn new(lcd: L, bitmap_column: u8, bitmap_row: u8) -> Self {
        Self {
            lcd,
            bitmap: LcdBitmap::new(),
            bitmap_column,
            bitmap_row,
            placed: false,
        }
    }

    pub fn init(&mut self) -> Result<(), DisplayError> {
        debug!("display: init");
        self.clear()?;
        self.bitmap.clear();
        // CGRAM content is undefined after power-up.
        self.bitmap.invalidate();
        debug!("display: done");
        Ok(())
    }

    /// Blank all text. The bitmap is placed again on the next flush.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        lcd_result(self.lcd.clear())?;
        self.placed = false;
        Ok(())
    }

    /// Write `text` starting at `(col, row)`. `°` maps to the LCD degree sign.
    pub fn print_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        if col >= LCD_COLUMNS || row >= LCD_ROWS {
            return Err(DisplayError::OutOfBounds { col, row });
        }
        lcd_result(self.lcd.set_cursor(col, row))?;

        if text.is_ascii() {
            return lcd_result(self.lcd.write_str(text));
        }
        for c in text.chars() {
            let byte = match c {
                '°' => LCD_DEGREE,
                c if c.is_ascii() => c as u8,
                _ => b'?',
            };
            lcd_result(self.lcd.write_byte(byte))?;
        }
        Ok(())
    }

    pub fn graphics(&mut self) -> &mut LcdBitmap {
        &mut self.bitmap
    }

    /// Upload changed custom characters and make sure the bitmap is shown.
    pub fn flush_graphics(&mut self) -> Result<(), DisplayError> {
        if !self.placed {
            self.bitmap.invalidate();
        }
        let flushed = lcd_result(self.bitmap.flush(
            &mut self.lcd,
            self.bitmap_column,
            self.bitmap_row,
        ))?;
        if flushed {
            self.placed = true;
        }
        Ok(())
    }

    /// Draw one glyph into bitmap slot `0..4` without flushing.
    pub fn print_glyph(&mut self, slot: u8, glyph: Glyph) -> Result<(), DisplayError> {
        if usize::from(slot) >= glyph::GLYPH_SLOTS {
            return Err(DisplayError::InvalidSlot { slot });
        }
        glyph.draw(&mut self.bitmap, slot);
        Ok(())
    }

    /// Draw four glyphs across the bitmap and flush once.
    pub fn print_glyphs(&mut self, glyphs: [Glyph; 4]) -> Result<(), DisplayError> {
        for (slot, glyph) in (0u8..).zip(glyphs) {
            self.print_glyph(slot, glyph)?;
        }
        self.flush_graphics()
    }

    pub fn lcd(&self) -> &L {
        &self.lcd
    }
}

fn lcd_result<T, E: core::fmt::Debug>(result: Result<T, E>) -> Result<T, DisplayError> {
    result.map_err(|e| {
        error!("display: LCD error {:?}", e);
        DisplayError::Lcd
    })
}
