//! Pixel bitmap built from the LCD's custom characters.
//!
//! The eight CGRAM characters are arranged as a 4x2 block of 5x8 cells,
//! giving a 20x16 monochrome canvas. Drawing happens in RAM; [`LcdBitmap::flush`]
//! uploads only the cells whose pixels differ from what the controller holds.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use log::debug;

use super::CharacterLcd;

pub const CELL_WIDTH: usize = 5;
pub const CELL_HEIGHT: usize = 8;

/// Bitmap size in character cells.
pub const BITMAP_COLUMNS: usize = 4;
pub const BITMAP_ROWS: usize = 2;

pub const BITMAP_WIDTH: usize = BITMAP_COLUMNS * CELL_WIDTH;
pub const BITMAP_HEIGHT: usize = BITMAP_ROWS * CELL_HEIGHT;

const CELLS: usize = BITMAP_COLUMNS * BITMAP_ROWS;

/// 20x16 canvas implementing `DrawTarget<Color = BinaryColor>`.
pub struct LcdBitmap {
    cells: [[u8; CELL_HEIGHT]; CELLS],
    /// Last content written to the controller.
    uploaded: [[u8; CELL_HEIGHT]; CELLS],
    /// Cells to upload regardless of content.
    stale: u8,
}

impl Default for LcdBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl LcdBitmap {
    pub const fn new() -> Self {
        Self {
            cells: [[0; CELL_HEIGHT]; CELLS],
            uploaded: [[0; CELL_HEIGHT]; CELLS],
            stale: 0,
        }
    }

    #[inline]
    fn locate(x: usize, y: usize) -> (usize, usize, u8) {
        let slot = (y / CELL_HEIGHT) * BITMAP_COLUMNS + x / CELL_WIDTH;
        let bit = 1 << (CELL_WIDTH - 1 - x % CELL_WIDTH);
        (slot, y % CELL_HEIGHT, bit)
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let (slot, row, bit) = Self::locate(x, y);
        if on {
            self.cells[slot][row] |= bit;
        } else {
            self.cells[slot][row] &= !bit;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= BITMAP_WIDTH || y >= BITMAP_HEIGHT {
            return false;
        }
        let (slot, row, bit) = Self::locate(x, y);
        self.cells[slot][row] & bit != 0
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.cells = [[0; CELL_HEIGHT]; CELLS];
    }

    /// Draw a one pixel wide line, both end points included.
    pub fn line(&mut self, start: Point, end: Point) {
        let Ok(()) = Line::new(start, end)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self);
    }

    /// Blank a rectangular area.
    pub fn erase(&mut self, area: Rectangle) {
        let Ok(()) = self.fill_solid(&area, BinaryColor::Off);
    }

    /// Replace the canvas with one bottom-aligned bar per value.
    ///
    /// Values are bar heights in pixels; extra values past the bitmap width
    /// are ignored.
    pub fn bar_graph(&mut self, heights: &[u8]) {
        self.clear();
        for (x, &h) in heights.iter().take(BITMAP_WIDTH).enumerate() {
            let h = usize::from(h).min(BITMAP_HEIGHT);
            for y in BITMAP_HEIGHT - h..BITMAP_HEIGHT {
                self.set_pixel(x, y, true);
            }
        }
    }

    /// Force every cell to be uploaded on the next flush.
    pub fn invalidate(&mut self) {
        self.stale = u8::MAX;
    }

    fn changed(&self, slot: usize) -> bool {
        self.stale & (1 << slot) != 0 || self.cells[slot] != self.uploaded[slot]
    }

    pub fn is_dirty(&self) -> bool {
        (0..CELLS).any(|slot| self.changed(slot))
    }

    /// Pixel rows of custom character `slot`.
    pub fn cell(&self, slot: usize) -> [u8; CELL_HEIGHT] {
        self.cells[slot]
    }

    /// Upload changed cells and place the 8 character codes at `(column, row)`.
    ///
    /// Returns `false` without touching the LCD when nothing changed.
    pub fn flush<L: CharacterLcd>(
        &mut self,
        lcd: &mut L,
        column: u8,
        row: u8,
    ) -> Result<bool, L::Error> {
        let mut uploaded = 0u8;
        for slot in 0..CELLS {
            if self.changed(slot) {
                lcd.define_char(slot as u8, self.cells[slot])?;
                self.uploaded[slot] = self.cells[slot];
                uploaded += 1;
            }
        }
        self.stale = 0;

        if uploaded == 0 {
            return Ok(false);
        }
        debug!("display: uploaded {} bitmap cells", uploaded);

        // Defining characters moves the controller address into CGRAM.
        let mut code = 0u8;
        for r in 0..BITMAP_ROWS as u8 {
            lcd.set_cursor(column, row + r)?;
            for _ in 0..BITMAP_COLUMNS {
                lcd.write_byte(code)?;
                code += 1;
            }
        }
        Ok(true)
    }
}

impl OriginDimensions for LcdBitmap {
    fn size(&self) -> Size {
        Size::new(BITMAP_WIDTH as u32, BITMAP_HEIGHT as u32)
    }
}

impl DrawTarget for LcdBitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < BITMAP_WIDTH && (y as usize) < BITMAP_HEIGHT {
                self.set_pixel(x as usize, y as usize, color.is_on());
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0x1F } else { 0 };
        self.cells = [[fill; CELL_HEIGHT]; CELLS];
        Ok(())
    }
}
