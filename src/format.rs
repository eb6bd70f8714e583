//! Textual renderings of [`Value`] used by test vectors and waveform displays.
//!
//! Every bit renders as one of [`TRUE_CHAR`], [`FALSE_CHAR`], [`UNKNOWN_CHAR`]
//! or [`ERROR_CHAR`]; the zero-width value renders as [`DONT_CARE_CHAR`].
//! Hex and octal renderings fold 4 (resp. 3) bits into one digit, most
//! significant group first. A group holding ambiguous bits renders as the
//! state of its topmost ambiguous bit, `E` or `x`.

use crate::error::{Error, Result};
use crate::value::{width_mask, Value, MAX_WIDTH};

pub const TRUE_CHAR: char = '1';
pub const FALSE_CHAR: char = '0';
pub const UNKNOWN_CHAR: char = 'x';
pub const ERROR_CHAR: char = 'E';
pub const DONT_CARE_CHAR: char = '-';

impl Value {
    fn bit_char(&self, index: usize) -> char {
        match self.get(index) {
            Value::ERROR => ERROR_CHAR,
            Value::UNKNOWN => UNKNOWN_CHAR,
            Value::TRUE => TRUE_CHAR,
            _ => FALSE_CHAR,
        }
    }

    /// Binary rendering, most significant bit first.
    pub fn to_binary_string(&self) -> String {
        if self.is_nil() {
            return DONT_CARE_CHAR.to_string();
        }
        (0..self.width()).rev().map(|i| self.bit_char(i)).collect()
    }

    /// Binary rendering with a space between nibbles.
    pub fn to_display_string(&self) -> String {
        if self.is_nil() {
            return DONT_CARE_CHAR.to_string();
        }
        let mut s = String::with_capacity(self.width() + self.width() / 4);
        for i in (0..self.width()).rev() {
            s.push(self.bit_char(i));
            if i % 4 == 0 && i != 0 {
                s.push(' ');
            }
        }
        s
    }

    /// Hexadecimal rendering.
    pub fn to_hex_string(&self) -> String {
        self.to_grouped_string(4, 16)
    }

    /// Octal rendering.
    pub fn to_octal_string(&self) -> String {
        self.to_grouped_string(3, 8)
    }

    fn to_grouped_string(&self, bits: usize, radix: u32) -> String {
        if self.width() <= 1 {
            return self.to_display_string();
        }
        let groups = (self.width() + bits - 1) / bits;
        (0..groups)
            .rev()
            .map(|k| {
                let lo = k * bits;
                let hi = (lo + bits).min(self.width());
                // The topmost ambiguous bit of the group decides its character.
                for i in (lo..hi).rev() {
                    if self.error_bits() >> i & 1 != 0 {
                        return ERROR_CHAR;
                    }
                    if self.unknown_bits() >> i & 1 != 0 {
                        return UNKNOWN_CHAR;
                    }
                }
                let mask = width_mask(hi) & !width_mask(lo);
                let digit = (self.value_bits() & mask) >> lo;
                // Digit is below radix by construction.
                std::char::from_digit(digit, radix).unwrap_or(ERROR_CHAR)
            })
            .collect()
    }

    /// Decimal rendering; requires every bit to be defined.
    ///
    /// Returns [`ERROR_CHAR`] if any bit is an error, [`UNKNOWN_CHAR`] if any bit is unknown.
    pub fn to_decimal_string(&self, signed: bool) -> String {
        if self.is_nil() {
            return DONT_CARE_CHAR.to_string();
        }
        if self.is_error_value() {
            return ERROR_CHAR.to_string();
        }
        if !self.is_fully_defined() {
            return UNKNOWN_CHAR.to_string();
        }
        let value = self.value_bits();
        if signed {
            let shift = 32 - self.width() as u32;
            let extended = ((value << shift) as i32) >> shift;
            extended.to_string()
        } else {
            value.to_string()
        }
    }

    /// Parses a test-vector literal of the given width.
    ///
    /// Accepted forms: `0x` hex and `0o` octal (both allowing `x` digits),
    /// binary when the text is exactly `width` characters long, and signed
    /// decimal otherwise.
    pub fn parse(width: usize, text: &str) -> Result<Value> {
        if width > MAX_WIDTH {
            return Err(Error::CapacityExceeded {
                requested: width,
                max: MAX_WIDTH,
            });
        }
        let (radix, digits, negative) = if let Some(rest) = text.strip_prefix("0x") {
            (16u64, rest, false)
        } else if let Some(rest) = text.strip_prefix("0o") {
            (8, rest, false)
        } else if text.len() == width {
            (2, text, false)
        } else if let Some(rest) = text.strip_prefix('-') {
            (10, rest, true)
        } else {
            (10, text, false)
        };
        if digits.is_empty() {
            return Err(Error::Parse(format!("expected digits in {:?}", text)));
        }

        let overflow = || Error::Parse(format!("too many bits in {:?}", text));
        let mut value: u64 = 0;
        let mut unknown: u64 = 0;
        for c in digits.chars() {
            let digit = if c == 'x' && radix != 10 {
                None
            } else {
                match c.to_digit(radix as u32) {
                    Some(d) => Some(d as u64),
                    None => return Err(Error::Parse(format!("unexpected character {:?} in {:?}", c, text))),
                }
            };
            value = value.checked_mul(radix).ok_or_else(overflow)?;
            unknown = unknown.checked_mul(radix).ok_or_else(overflow)?;
            match digit {
                Some(d) => value = value.checked_add(d).ok_or_else(overflow)?,
                None => unknown |= radix - 1,
            }
        }

        let limit = 1u64 << width;
        if negative {
            if value > limit / 2 {
                return Err(overflow());
            }
            value = limit.wrapping_sub(value) & (limit - 1);
        } else if value >= limit {
            return Err(overflow());
        }
        Value::create(width, 0, unknown as u32, value as u32)
    }
}
