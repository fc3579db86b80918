//! HD44780 character LCD on a write-only 4-bit bus.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use thermograph_core::display::CharacterLcd;

// ---------------------------------------------------------------------------
// Instruction set
// ---------------------------------------------------------------------------

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_CGRAM_ADDR: u8 = 0x40;
const CMD_SET_DDRAM_ADDR: u8 = 0x80;

const ENTRY_INCREMENT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_TWO_LINES: u8 = 0x08;

/// DDRAM address of the first cell of each row.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Most instructions finish within 37 µs.
const EXEC_US: u32 = 50;
/// Clear and home take up to 1.52 ms.
const CLEAR_US: u32 = 2_000;

pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Run the 4-bit initialisation sequence and switch the display on.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Result<Self, P::Error> {
        let mut lcd = Self {
            rs,
            en,
            data,
            delay,
        };

        lcd.delay.delay_ms(50);
        lcd.rs.set_low()?;
        lcd.en.set_low()?;

        // Reset into 8-bit mode three times, then drop to 4-bit.
        lcd.write_nibble(0x03)?;
        lcd.delay.delay_us(4_500);
        lcd.write_nibble(0x03)?;
        lcd.delay.delay_us(4_500);
        lcd.write_nibble(0x03)?;
        lcd.delay.delay_us(150);
        lcd.write_nibble(0x02)?;
        lcd.delay.delay_us(EXEC_US);

        lcd.command(CMD_FUNCTION_SET | FUNCTION_TWO_LINES)?;
        lcd.command(CMD_DISPLAY_CONTROL | DISPLAY_ON)?;
        lcd.command(CMD_ENTRY_MODE | ENTRY_INCREMENT)?;
        CharacterLcd::clear(&mut lcd)?;

        debug!("hd44780: init");
        Ok(lcd)
    }

    fn command(&mut self, byte: u8) -> Result<(), P::Error> {
        self.rs.set_low()?;
        self.write_byte_raw(byte)
    }

    fn data(&mut self, byte: u8) -> Result<(), P::Error> {
        self.rs.set_high()?;
        self.write_byte_raw(byte)
    }

    fn write_byte_raw(&mut self, byte: u8) -> Result<(), P::Error> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        self.delay.delay_us(EXEC_US);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), P::Error> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            if nibble & (1 << bit) != 0 {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        // Latched on the falling edge of a >450 ns enable pulse.
        self.en.set_high()?;
        self.delay.delay_us(1);
        self.en.set_low()?;
        self.delay.delay_us(1);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> CharacterLcd for Hd44780<P, D> {
    type Error = P::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        let offset = ROW_OFFSETS[usize::from(row) % ROW_OFFSETS.len()];
        self.command(CMD_SET_DDRAM_ADDR | (offset + col))
    }

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.data(byte)?;
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.data(byte)
    }

    fn define_char(&mut self, slot: u8, rows: [u8; 8]) -> Result<(), Self::Error> {
        self.command(CMD_SET_CGRAM_ADDR | ((slot & 0x07) << 3))?;
        for row in rows {
            self.data(row & 0x1F)?;
        }
        Ok(())
    }
}
