//! Large 5x16 characters drawn as line strokes into the bitmap.
//!
//! Four glyphs fit side by side across the 20 pixel wide bitmap; slot `n`
//! starts at pixel column `5 * n`.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::bitmap::{BITMAP_HEIGHT, CELL_WIDTH, LcdBitmap};

/// Glyph positions across the bitmap.
pub const GLYPH_SLOTS: usize = 4;

/// Line segment `(x0, y0, x1, y1)` relative to the glyph origin.
type Stroke = (i32, i32, i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Glyph {
    #[default]
    Blank,
    Digit(u8),
    Degree,
    Celsius,
    Percent,
    Question,
}

impl Glyph {
    /// Glyph for a single decimal digit. Anything else is `Question`.
    pub fn digit(n: i32) -> Self {
        match n {
            0..=9 => Self::Digit(n as u8),
            _ => Self::Question,
        }
    }

    pub fn strokes(self) -> &'static [Stroke] {
        match self {
            Glyph::Blank => &[],
            Glyph::Digit(0) => &ZERO,
            Glyph::Digit(1) => &ONE,
            Glyph::Digit(2) => &TWO,
            Glyph::Digit(3) => &THREE,
            Glyph::Digit(4) => &FOUR,
            Glyph::Digit(5) => &FIVE,
            Glyph::Digit(6) => &SIX,
            Glyph::Digit(7) => &SEVEN,
            Glyph::Digit(8) => &EIGHT,
            Glyph::Digit(9) => &NINE,
            Glyph::Digit(_) | Glyph::Question => &QUESTION,
            Glyph::Degree => &DEGREE,
            Glyph::Celsius => &CELSIUS,
            Glyph::Percent => &PERCENT,
        }
    }

    /// Erase the slot's column band and draw the glyph into it.
    pub fn draw(self, bitmap: &mut LcdBitmap, slot: u8) {
        let offset = i32::from(slot) * CELL_WIDTH as i32;
        bitmap.erase(Rectangle::new(
            Point::new(offset, 0),
            Size::new(CELL_WIDTH as u32, BITMAP_HEIGHT as u32),
        ));
        for &(x0, y0, x1, y1) in self.strokes() {
            bitmap.line(Point::new(offset + x0, y0), Point::new(offset + x1, y1));
        }
    }
}

// ---------------------------------------------------------------------------
// Stroke tables
// ---------------------------------------------------------------------------

const ZERO: [Stroke; 6] = [
    (0, 2, 2, 0),
    (2, 0, 4, 2),
    (4, 2, 4, 13),
    (4, 13, 2, 15),
    (2, 15, 0, 13),
    (0, 13, 0, 2),
];

const ONE: [Stroke; 2] = [(4, 0, 4, 15), (2, 2, 4, 0)];

const TWO: [Stroke; 9] = [
    (0, 3, 0, 2),
    (0, 2, 2, 0),
    (2, 0, 4, 2),
    (4, 2, 4, 4),
    (3, 5, 3, 6),
    (2, 7, 2, 8),
    (1, 9, 1, 10),
    (0, 11, 0, 15),
    (0, 15, 4, 15),
];

const THREE: [Stroke; 8] = [
    (0, 0, 4, 0),
    (4, 0, 0, 5),
    (0, 5, 2, 5),
    (2, 5, 4, 7),
    (4, 7, 4, 13),
    (4, 13, 2, 15),
    (2, 15, 1, 15),
    (1, 15, 0, 14),
];

const FOUR: [Stroke; 3] = [(0, 0, 0, 9), (4, 0, 4, 15), (0, 9, 4, 9)];

const FIVE: [Stroke; 8] = [
    (0, 0, 4, 0),
    (0, 0, 0, 6),
    (0, 6, 2, 6),
    (2, 6, 4, 8),
    (4, 8, 4, 13),
    (4, 13, 2, 15),
    (2, 15, 1, 15),
    (1, 15, 0, 14),
];

const SIX: [Stroke; 8] = [
    (4, 2, 2, 0),
    (2, 0, 0, 2),
    (0, 2, 0, 13),
    (0, 13, 2, 15),
    (2, 15, 4, 13),
    (4, 13, 4, 7),
    (4, 7, 2, 5),
    (2, 5, 0, 7),
];

const SEVEN: [Stroke; 6] = [
    (0, 0, 4, 0),
    (4, 0, 4, 3),
    (3, 4, 3, 6),
    (2, 7, 2, 9),
    (1, 10, 1, 12),
    (0, 13, 0, 15),
];

const EIGHT: [Stroke; 12] = [
    (0, 2, 2, 0),
    (2, 0, 4, 2),
    (4, 2, 4, 5),
    (4, 5, 2, 7),
    (2, 7, 0, 5),
    (0, 5, 0, 2),
    (0, 13, 2, 15),
    (2, 15, 4, 13),
    (4, 13, 4, 9),
    (4, 9, 2, 7),
    (2, 7, 0, 9),
    (0, 9, 0, 13),
];

const NINE: [Stroke; 8] = [
    (0, 2, 2, 0),
    (2, 0, 4, 2),
    (4, 2, 4, 13),
    (4, 13, 2, 15),
    (2, 15, 0, 13),
    (0, 2, 0, 6),
    (0, 6, 2, 8),
    (2, 8, 4, 6),
];

const DEGREE: [Stroke; 4] = [(1, 0, 3, 0), (1, 0, 1, 3), (1, 3, 3, 3), (3, 0, 3, 3)];

const CELSIUS: [Stroke; 5] = [
    (0, 2, 2, 0),
    (2, 0, 4, 2),
    (0, 2, 0, 13),
    (0, 13, 2, 15),
    (2, 15, 4, 13),
];

const PERCENT: [Stroke; 9] = [
    (0, 0, 2, 0),
    (2, 0, 2, 2),
    (2, 2, 0, 2),
    (0, 2, 0, 0),
    (2, 13, 4, 13),
    (4, 13, 4, 15),
    (4, 15, 2, 15),
    (2, 15, 2, 13),
    (4, 3, 0, 12),
];

const QUESTION: [Stroke; 6] = [
    (0, 3, 0, 2),
    (0, 2, 2, 0),
    (2, 0, 4, 2),
    (4, 2, 4, 4),
    (3, 5, 3, 13),
    (3, 15, 3, 15),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_helper_rejects_non_digits() {
        assert_eq!(Glyph::digit(7), Glyph::Digit(7));
        assert_eq!(Glyph::digit(10), Glyph::Question);
        assert_eq!(Glyph::digit(-1), Glyph::Question);
    }

    #[test]
    fn strokes_stay_inside_their_cell() {
        let glyphs = (0..10)
            .map(Glyph::Digit)
            .chain([Glyph::Degree, Glyph::Celsius, Glyph::Percent, Glyph::Question]);
        for glyph in glyphs {
            for &(x0, y0, x1, y1) in glyph.strokes() {
                for (x, y) in [(x0, y0), (x1, y1)] {
                    assert!((0..5).contains(&x) && (0..16).contains(&y), "{:?}", glyph);
                }
            }
        }
    }

    #[test]
    fn draw_replaces_previous_glyph_in_slot() {
        let mut bitmap = LcdBitmap::new();
        Glyph::Digit(8).draw(&mut bitmap, 1);
        Glyph::Digit(1).draw(&mut bitmap, 1);

        // The left edge of the 8 is gone, the stem of the 1 remains.
        assert!(!bitmap.pixel(5, 10));
        assert!((0..16).all(|y| bitmap.pixel(9, y)));
        // Neighbouring slots untouched.
        assert!((0..5).all(|x| (0..16).all(|y| !bitmap.pixel(x, y))));
    }

    #[test]
    fn blank_clears_slot() {
        let mut bitmap = LcdBitmap::new();
        Glyph::Digit(0).draw(&mut bitmap, 3);
        Glyph::Blank.draw(&mut bitmap, 3);
        assert!(!bitmap.is_dirty());
    }
}
