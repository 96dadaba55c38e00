//! The numeral base of a value, and the conversion between digit counts and
//! bit counts.

use super::error::{Error, Result};
use core::fmt::Display;

/// The lowest supported radix.
pub const MIN_RADIX: u32 = 2;
/// The highest supported radix. Digits above 9 are the letters a-z.
pub const MAX_RADIX: u32 = 36;

/// A numeral base in the range 2..=36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Radix(u32);

impl Radix {
    pub const DECIMAL: Radix = Radix(10);

    pub fn new(radix: u32) -> Result<Self> {
        if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
            Ok(Radix(radix))
        } else {
            Err(Error::InvalidRadix(radix))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns log2 of the radix.
    fn log2(&self) -> f64 {
        (self.0 as f64).log2()
    }

    /// Returns the number of bits that are needed to hold `digits` digits
    /// of this radix.
    pub fn bits_for_digits(&self, digits: u64) -> usize {
        (digits as f64 * self.log2()).ceil() as usize
    }

    /// Returns the number of whole digits of this radix that `bits` bits can
    /// represent.
    pub fn digits_for_bits(&self, bits: usize) -> u64 {
        (bits as f64 / self.log2()).floor() as u64
    }

    /// Returns the digit value of `c`, if `c` is a digit in this radix.
    pub fn digit_value(&self, c: char) -> Option<u8> {
        c.to_digit(self.0).map(|d| d as u8)
    }

    /// Returns the lowercase character for the digit `d`.
    pub fn digit_char(&self, d: u8) -> char {
        debug_assert!((d as u32) < self.0);
        char::from_digit(d as u32, self.0).unwrap_or('?')
    }

    /// The letter 'e' marks the exponent only when it is not a digit.
    pub fn has_exponent_letter(&self) -> bool {
        self.0 <= 14
    }

    /// Returns the marker that separates the digits from the exponent when
    /// printing in this radix.
    pub fn exponent_marker(&self) -> char {
        if self.has_exponent_letter() {
            'e'
        } else {
            '@'
        }
    }
}

impl Default for Radix {
    fn default() -> Self {
        Radix::DECIMAL
    }
}

impl Display for Radix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_radix_range() {
    assert!(Radix::new(1).is_err());
    assert!(Radix::new(37).is_err());
    assert_eq!(Radix::new(36).map(|r| r.get()), Ok(36));
    assert_eq!(Radix::new(0), Err(Error::InvalidRadix(0)));
}

#[test]
fn test_digit_bits() {
    assert_eq!(Radix::DECIMAL.bits_for_digits(16), 54);
    assert_eq!(Radix::DECIMAL.bits_for_digits(18), 60);
    let hex = Radix(16);
    assert_eq!(hex.bits_for_digits(4), 16);
    assert_eq!(hex.digits_for_bits(53), 13);
    assert_eq!(Radix::DECIMAL.digits_for_bits(53), 15);
}

#[test]
fn test_digit_chars() {
    let r = Radix(36);
    assert_eq!(r.digit_value('z'), Some(35));
    assert_eq!(r.digit_value('Z'), Some(35));
    assert_eq!(r.digit_char(35), 'z');
    assert_eq!(Radix::DECIMAL.digit_value('a'), None);
    assert_eq!(Radix(14).exponent_marker(), 'e');
    assert_eq!(Radix(15).exponent_marker(), '@');
}
