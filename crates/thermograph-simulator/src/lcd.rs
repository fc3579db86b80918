//! In-memory HD44780 model rendered with `embedded-graphics`.

use core::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use thermograph_core::display::{CharacterLcd, LCD_COLUMNS, LCD_DEGREE, LCD_ROWS};

const COLS: usize = LCD_COLUMNS as usize;
const ROWS: usize = LCD_ROWS as usize;
const CUSTOM_CHARS: usize = 8;

/// Pixel pitch of one character cell: 5x8 dots plus a one dot gap.
const CELL_PITCH_X: i32 = 6;
const CELL_PITCH_Y: i32 = 9;
const MARGIN: i32 = 4;

pub const SCREEN_WIDTH_PX: u32 = (2 * MARGIN + COLS as i32 * CELL_PITCH_X - 1) as u32;
pub const SCREEN_HEIGHT_PX: u32 = (2 * MARGIN + ROWS as i32 * CELL_PITCH_Y - 1) as u32;

const BACKLIGHT: Rgb565 = Rgb565::new(2, 12, 24);
const CELL_OFF: Rgb565 = Rgb565::new(4, 18, 28);
const CELL_ON: Rgb565 = Rgb565::WHITE;

/// Degree sign as the A00 ROM draws it.
const DEGREE_ROWS: [u8; 8] = [
    0b11100, 0b10100, 0b11100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000,
];

/// Display memory, character generator RAM and cursor of a 16x2 module.
pub struct SimulatedLcd {
    ddram: [[u8; COLS]; ROWS],
    cgram: [[u8; 8]; CUSTOM_CHARS],
    col: usize,
    row: usize,
    /// Bumped on every mutation so the window only repaints on change.
    generation: u64,
}

impl Default for SimulatedLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedLcd {
    pub fn new() -> Self {
        Self {
            ddram: [[b' '; COLS]; ROWS],
            cgram: [[0; 8]; CUSTOM_CHARS],
            col: 0,
            row: 0,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Text content of one row, custom characters shown as their slot number.
    pub fn row_text(&self, row: usize) -> String {
        self.ddram[row]
            .iter()
            .map(|&b| match b {
                0..=7 => char::from(b'0' + b),
                LCD_DEGREE => '°',
                0x20..=0x7E => char::from(b),
                _ => '?',
            })
            .collect()
    }

    /// Paint the whole module, one 5x8 dot matrix per cell.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(BACKLIGHT)?;

        for (row, line) in self.ddram.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                let origin = Point::new(
                    MARGIN + col as i32 * CELL_PITCH_X,
                    MARGIN + row as i32 * CELL_PITCH_Y,
                );
                Rectangle::new(origin, Size::new(5, 8))
                    .into_styled(PrimitiveStyle::with_fill(CELL_OFF))
                    .draw(target)?;

                match code {
                    0..=7 => draw_rows(target, origin, &self.cgram[usize::from(code)])?,
                    LCD_DEGREE => draw_rows(target, origin, &DEGREE_ROWS)?,
                    0x21..=0x7E => {
                        let mut buf = [0u8; 4];
                        let text = char::from(code).encode_utf8(&mut buf);
                        Text::with_baseline(
                            text,
                            origin,
                            MonoTextStyle::new(&FONT_5X8, CELL_ON),
                            Baseline::Top,
                        )
                        .draw(target)?;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn put(&mut self, byte: u8) {
        if self.row < ROWS && self.col < COLS {
            self.ddram[self.row][self.col] = byte;
        }
        self.col += 1;
        self.generation += 1;
    }
}

fn draw_rows<D>(target: &mut D, origin: Point, rows: &[u8; 8]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let dots = rows.iter().enumerate().flat_map(|(y, bits)| {
        (0..5).filter_map(move |x| {
            (bits & (0b10000u8 >> x) != 0)
                .then(|| Pixel(origin + Point::new(x, y as i32), CELL_ON))
        })
    });
    target.draw_iter(dots)
}

impl CharacterLcd for SimulatedLcd {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.ddram = [[b' '; COLS]; ROWS];
        self.col = 0;
        self.row = 0;
        self.generation += 1;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.col = usize::from(col);
        self.row = usize::from(row);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.put(byte);
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.put(byte);
        Ok(())
    }

    fn define_char(&mut self, slot: u8, rows: [u8; 8]) -> Result<(), Self::Error> {
        // CGRAM addressing only decodes three bits.
        self.cgram[usize::from(slot & 0x07)] = rows.map(|r| r & 0x1F);
        self.generation += 1;
        Ok(())
    }
}
