//! Four-state bit vectors.
//!
//! A [`Value`] packs up to [`MAX_WIDTH`] bits, each of which is one of
//! `0`, `1`, `x` (unknown, e.g. an undriven wire) or `E` (error, e.g. a drive
//! conflict). The state of every bit is kept in three masks:
//!
//! - `error`: bits in the error state,
//! - `unknown`: bits in the unknown state (never overlapping `error`),
//! - `value`: bits that are `1` (never overlapping the other two).
//!
//! Bits at positions `>= width` are always clear, so two values are equal
//! exactly when their fields are equal. Values are small `Copy` types; the
//! canonical one-bit constants are plain `const` items.
//!
//! # Examples
//!
//! ```
//! use gate_synth::value::Value;
//!
//! let a = Value::create_known(4, 0b1100);
//! let b = Value::create_known(4, 0b1010);
//! assert_eq!(a & b, Value::create_known(4, 0b1000));
//! assert_eq!(Value::FALSE & Value::UNKNOWN, Value::FALSE);
//! assert_eq!(Value::TRUE & Value::UNKNOWN, Value::ERROR);
//! ```

use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::error::{Error, Result};

/// Maximum number of bits in a [`Value`].
pub const MAX_WIDTH: usize = 32;

/// Returns the mask covering the low `width` bits.
pub(crate) const fn width_mask(width: usize) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Value {
    width: u8,
    error: u32,
    unknown: u32,
    value: u32,
}

// Canonical instances
impl Value {
    /// The zero-width value, used for "nothing driven".
    pub const NIL: Value = Value::raw(0, 0, 0, 0);
    pub const FALSE: Value = Value::raw(1, 0, 0, 0);
    pub const TRUE: Value = Value::raw(1, 0, 0, 1);
    pub const UNKNOWN: Value = Value::raw(1, 0, 1, 0);
    pub const ERROR: Value = Value::raw(1, 1, 0, 0);

    const fn raw(width: u8, error: u32, unknown: u32, value: u32) -> Self {
        Self {
            width,
            error,
            unknown,
            value,
        }
    }

    /// Normalizes the masks for the given width.
    ///
    /// The caller guarantees `width <= MAX_WIDTH`.
    pub(crate) const fn normalized(width: usize, error: u32, unknown: u32, value: u32) -> Self {
        let mask = width_mask(width);
        let error = error & mask;
        let unknown = unknown & mask & !error;
        let value = value & mask & !unknown & !error;
        Self::raw(width as u8, error, unknown, value)
    }
}

// Constructors
impl Value {
    /// Creates a value from raw masks.
    ///
    /// Errors take precedence over unknowns, which take precedence over ones.
    /// Bits outside `width` are discarded.
    pub fn create(width: usize, error: u32, unknown: u32, value: u32) -> Result<Self> {
        if width > MAX_WIDTH {
            return Err(Error::CapacityExceeded {
                requested: width,
                max: MAX_WIDTH,
            });
        }
        Ok(Self::normalized(width, error, unknown, value))
    }

    /// Packs single-bit values into one vector, `bits[0]` being the least significant.
    pub fn from_bits(bits: &[Value]) -> Result<Self> {
        if bits.len() > MAX_WIDTH {
            return Err(Error::CapacityExceeded {
                requested: bits.len(),
                max: MAX_WIDTH,
            });
        }
        let mut error = 0;
        let mut unknown = 0;
        let mut value = 0;
        for (i, bit) in bits.iter().enumerate() {
            if bit.width != 1 {
                return Err(Error::WidthMismatch {
                    expected: 1,
                    actual: bit.width(),
                });
            }
            error |= bit.error << i;
            unknown |= bit.unknown << i;
            value |= bit.value << i;
        }
        Ok(Self::normalized(bits.len(), error, unknown, value))
    }

    /// Creates a value with every bit in the error state.
    ///
    /// # Panics
    ///
    /// Panics if `width > MAX_WIDTH`.
    pub fn create_error(width: usize) -> Self {
        assert!(width <= MAX_WIDTH, "Width should be in the range 0..=32");
        Self::normalized(width, u32::MAX, 0, 0)
    }

    /// Creates a value with every bit unknown.
    ///
    /// # Panics
    ///
    /// Panics if `width > MAX_WIDTH`.
    pub fn create_unknown(width: usize) -> Self {
        assert!(width <= MAX_WIDTH, "Width should be in the range 0..=32");
        Self::normalized(width, 0, u32::MAX, 0)
    }

    /// Creates a fully defined value.
    ///
    /// # Panics
    ///
    /// Panics if `width > MAX_WIDTH`.
    pub fn create_known(width: usize, value: u32) -> Self {
        assert!(width <= MAX_WIDTH, "Width should be in the range 0..=32");
        Self::normalized(width, 0, 0, value)
    }

    /// Replicates a single-bit value `width` times.
    pub fn repeat(bit: Value, width: usize) -> Result<Self> {
        if bit.width != 1 {
            return Err(Error::WidthMismatch {
                expected: 1,
                actual: bit.width(),
            });
        }
        let fill = |m: u32| if m != 0 { u32::MAX } else { 0 };
        Self::create(width, fill(bit.error), fill(bit.unknown), fill(bit.value))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }
}

// Getters
impl Value {
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    pub const fn error_bits(&self) -> u32 {
        self.error
    }

    pub const fn unknown_bits(&self) -> u32 {
        self.unknown
    }

    pub const fn value_bits(&self) -> u32 {
        self.value
    }

    /// Mask of the bits that are defined `0`, including every bit above the width.
    const fn false_bits(&self) -> u32 {
        !self.value & !self.unknown & !self.error
    }

    /// Returns the bit at `index`, or [`Value::ERROR`] when out of range.
    pub fn get(&self, index: usize) -> Value {
        if index >= self.width() {
            return Value::ERROR;
        }
        let mask = 1 << index;
        if self.error & mask != 0 {
            Value::ERROR
        } else if self.unknown & mask != 0 {
            Value::UNKNOWN
        } else if self.value & mask != 0 {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    /// Returns all bits, least significant first.
    pub fn get_all(&self) -> Vec<Value> {
        (0..self.width()).map(|i| self.get(i)).collect()
    }

    /// Returns the integer value if every bit is defined.
    pub fn to_u32(&self) -> Option<u32> {
        if self.error != 0 || self.unknown != 0 {
            None
        } else {
            Some(self.value)
        }
    }
}

// Checks
impl Value {
    pub const fn is_nil(&self) -> bool {
        self.width == 0
    }

    pub const fn is_error_value(&self) -> bool {
        self.error != 0
    }

    pub const fn is_fully_defined(&self) -> bool {
        self.width > 0 && self.error == 0 && self.unknown == 0
    }

    /// Checks whether every bit is unknown.
    pub const fn is_unknown(&self) -> bool {
        self.error == 0 && self.unknown == width_mask(self.width as usize)
    }

    /// Checks whether `self` generalizes `other`.
    ///
    /// Where `self` is defined, `other` must hold the same bit; where `self` is
    /// unknown, `other` may hold anything but an error; error bits must match.
    pub fn compatible(&self, other: &Value) -> bool {
        self.width == other.width
            && self.error == other.error
            && self.value == (other.value & !self.unknown)
            && self.unknown == (other.unknown | self.unknown)
    }
}

// Operations
impl Value {
    pub fn and(&self, other: &Value) -> Value {
        let falses = self.false_bits() | other.false_bits();
        Self::normalized(
            self.width.max(other.width) as usize,
            (self.error | other.error | self.unknown | other.unknown) & !falses,
            0,
            self.value & other.value,
        )
    }

    pub fn or(&self, other: &Value) -> Value {
        let trues = (self.value & !self.error & !self.unknown) | (other.value & !other.error & !other.unknown);
        Self::normalized(
            self.width.max(other.width) as usize,
            (self.error | other.error | self.unknown | other.unknown) & !trues,
            0,
            self.value | other.value,
        )
    }

    /// Any ambiguous bit on either side makes the result bit an error.
    pub fn xor(&self, other: &Value) -> Value {
        if self.width <= 1 && other.width <= 1 && (self.is_nil() || other.is_nil()) {
            return Value::ERROR;
        }
        Self::normalized(
            self.width.max(other.width) as usize,
            self.error | other.error | self.unknown | other.unknown,
            0,
            self.value ^ other.value,
        )
    }

    /// Flips the defined bits; ambiguous bits become errors.
    pub fn not(&self) -> Value {
        if self.is_nil() {
            return Value::ERROR;
        }
        Self::normalized(self.width(), self.error | self.unknown, 0, !self.value)
    }

    pub fn and_opt(&self, other: Option<&Value>) -> Value {
        other.map_or(*self, |other| self.and(other))
    }

    pub fn or_opt(&self, other: Option<&Value>) -> Value {
        other.map_or(*self, |other| self.or(other))
    }

    pub fn xor_opt(&self, other: Option<&Value>) -> Value {
        other.map_or(*self, |other| self.xor(other))
    }

    /// Resolves two drivers tied to the same wire.
    ///
    /// Unknown bits yield to defined ones, disagreeing defined bits become
    /// errors, and [`Value::NIL`] is absorbed by the other side.
    pub fn combine(&self, other: &Value) -> Value {
        if self.is_nil() {
            return *other;
        }
        if other.is_nil() {
            return *self;
        }
        if self.width == other.width {
            let disagree = (self.value ^ other.value) & !(self.unknown | other.unknown);
            Self::normalized(
                self.width(),
                self.error | other.error | disagree,
                self.unknown & other.unknown,
                self.value | other.value,
            )
        } else {
            let self_known = !self.unknown & width_mask(self.width());
            let other_known = !other.unknown & width_mask(other.width());
            let disagree = (self.value ^ other.value) & self_known & other_known;
            Self::normalized(
                self.width.max(other.width) as usize,
                self.error | other.error | disagree,
                !self_known & !other_known,
                self.value | other.value,
            )
        }
    }

    pub fn combine_opt(&self, other: Option<&Value>) -> Value {
        other.map_or(*self, |other| self.combine(other))
    }

    /// Tri-state buffer: `self` is the enable, `data` passes where enabled.
    pub fn controls(&self, data: &Value) -> Value {
        if self.width == 1 {
            return match *self {
                Value::FALSE => Value::create_unknown(data.width()),
                Value::TRUE | Value::UNKNOWN => *data,
                _ => Value::create_error(data.width()),
            };
        }
        if self.width != data.width {
            return Value::create_error(data.width());
        }
        let enabled = (self.value | self.unknown) & !self.error;
        let disabled = self.false_bits();
        Self::normalized(
            data.width(),
            self.error | (data.error & !disabled),
            disabled | data.unknown,
            enabled & data.value,
        )
    }

    /// Extends (or truncates) to `new_width`, filling new bits with `filler`.
    pub fn extend_width(&self, new_width: usize, filler: Value) -> Result<Value> {
        if filler.width != 1 {
            return Err(Error::WidthMismatch {
                expected: 1,
                actual: filler.width(),
            });
        }
        if new_width == self.width() {
            return Ok(*self);
        }
        let above = !width_mask(self.width());
        match filler {
            Value::ERROR => Value::create(new_width, self.error | above, self.unknown, self.value),
            Value::TRUE => Value::create(new_width, self.error, self.unknown, self.value | above),
            Value::FALSE => Value::create(new_width, self.error, self.unknown, self.value),
            _ => Value::create(new_width, self.error, self.unknown | above, self.value),
        }
    }

    /// Replaces the bit at `index` with the single-bit value `bit`.
    pub fn set(&self, index: usize, bit: Value) -> Result<Value> {
        if bit.width != 1 {
            return Err(Error::WidthMismatch {
                expected: 1,
                actual: bit.width(),
            });
        }
        if index >= self.width() {
            return Err(Error::IndexOutOfRange {
                index,
                width: self.width(),
            });
        }
        let keep = !(1u32 << index);
        Ok(Self::normalized(
            self.width(),
            (self.error & keep) | (bit.error << index),
            (self.unknown & keep) | (bit.unknown << index),
            (self.value & keep) | (bit.value << index),
        ))
    }

    /// Wherever `self` is unknown, takes the bit from `other` instead.
    pub fn pull_towards_bits(&self, other: &Value) -> Value {
        if self.is_nil() || self.unknown == 0 || other.is_nil() {
            return *self;
        }
        let error = self.error | (self.unknown & other.error);
        let value = self.value | (self.unknown & other.value);
        let unknown = self.unknown & (other.unknown | !width_mask(other.width()));
        Self::normalized(self.width(), error, unknown, value)
    }

    /// Wherever `self` is unknown, substitutes the single-bit value `bit`.
    pub fn pull_each_bit_towards(&self, bit: Value) -> Result<Value> {
        if bit.width != 1 {
            return Err(Error::WidthMismatch {
                expected: 1,
                actual: bit.width(),
            });
        }
        if self.is_nil() || self.unknown == 0 {
            return Ok(*self);
        }
        Ok(match bit {
            Value::ERROR => Self::normalized(self.width(), self.error | self.unknown, 0, self.value),
            Value::TRUE => Self::normalized(self.width(), self.error, 0, self.value | self.unknown),
            Value::FALSE => Self::normalized(self.width(), self.error, 0, self.value),
            _ => *self,
        })
    }
}

impl BitAnd for Value {
    type Output = Value;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(&rhs)
    }
}

impl BitOr for Value {
    type Output = Value;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(&rhs)
    }
}

impl BitXor for Value {
    type Output = Value;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.xor(&rhs)
    }
}

impl Not for Value {
    type Output = Value;

    fn not(self) -> Self::Output {
        Value::not(&self)
    }
}

impl Not for &Value {
    type Output = Value;

    fn not(self) -> Self::Output {
        Value::not(self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}
