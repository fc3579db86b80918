//! Small text formatting helpers for the 16 column display.

use core::fmt::Write;

use heapless::String;

use crate::time::WallTime;

/// `value` right aligned in `width` columns, padded with `fill`.
pub fn padded(value: u32, width: usize, fill: char) -> String<12> {
    let mut digits = String::<12>::new();
    let _ = write!(digits, "{}", value);

    let mut out = String::new();
    for _ in digits.len()..width {
        let _ = out.push(fill);
    }
    let _ = out.push_str(&digits);
    out
}

/// One decimal place, truncated toward zero: `23.5`, `-0.4`, `105.0`.
pub fn tenths(value: f32) -> String<12> {
    let scaled = (value * 10.0) as i32;
    let sign = if value < 0.0 && scaled != 0 { "-" } else { "" };
    let abs = scaled.unsigned_abs();

    let mut out = String::new();
    let _ = write!(out, "{}{}.{}", sign, abs / 10, abs % 10);
    out
}

/// Uptime clock, hours padded to two columns: ` 1:05:09`.
pub fn clock(time: WallTime) -> String<16> {
    let mut out = String::new();
    let _ = write!(
        out,
        "{}:{}:{}",
        padded(time.hours, 2, ' '),
        padded(u32::from(time.minutes), 2, '0'),
        padded(u32::from(time.seconds), 2, '0')
    );
    out
}
