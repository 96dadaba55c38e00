//! This module contains the implementation of string conversion: scanning
//! numerals in any radix, and printing the significant digits of a float.

use super::bigint::BigInt;
use super::error::ParseErrorKind;
use super::float::{Category, Float, RoundingMode, Semantics, FP64};
use super::radix::Radix;
use core::cmp::Ordering;
use core::fmt::Display;

/// The largest exponent (in powers of the radix) that a numeral may carry.
pub const MAX_EXPONENT: i64 = 1 << 28;

/// Numbers whose leading digit is at a lower radix exponent than this are
/// printed in scientific notation.
const MIN_FIXED_EXPONENT: i64 = -7;

/// A scanned numeral. The value is `digits * radix^exponent`, where
/// `digits` is read as an integer in `radix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numeral {
    pub negative: bool,
    /// The digits, without leading zeros. Empty for zero.
    pub digits: Vec<u8>,
    pub exponent: i64,
    pub radix: Radix,
}

impl Numeral {
    /// Scan `value` as a numeral in `radix`. The grammar is an optional sign,
    /// digits with at most one point, and an optional exponent. The exponent
    /// marker is '@' in any radix, and also 'e' when 'e' is not a digit.
    pub fn parse(
        value: &str,
        radix: Radix,
    ) -> core::result::Result<Numeral, ParseErrorKind> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ParseErrorKind::InputEmpty);
        }

        // Handle the plus or minus in front of the number.
        let (negative, value) = match value.as_bytes()[0] {
            b'-' => (true, &value[1..]),
            b'+' => (false, &value[1..]),
            _ => (false, value),
        };

        // Split the number to the digits and the exponent.
        let idx = value.find(|c: char| {
            c == '@' || (radix.has_exponent_letter() && (c == 'e' || c == 'E'))
        });
        let (mantissa, exp) = match idx {
            Some(idx) => (&value[..idx], Some(&value[idx + 1..])),
            None => (value, None),
        };

        let exp = match exp {
            Some(exp) => exp
                .parse::<i64>()
                .map_err(|_| ParseErrorKind::ExponentParseFailed)?,
            None => 0,
        };
        if exp.abs() > MAX_EXPONENT {
            return Err(ParseErrorKind::ExponentOutOfRange);
        }

        let (left, right) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if right.contains('.') {
            return Err(ParseErrorKind::MisplacedPoint);
        }
        if left.is_empty() && right.is_empty() {
            return Err(ParseErrorKind::InputEmpty);
        }

        let mut digits = Vec::with_capacity(left.len() + right.len());
        for c in left.chars().chain(right.chars()) {
            match radix.digit_value(c) {
                Some(d) => {
                    // Drop leading zeros.
                    if d != 0 || !digits.is_empty() {
                        digits.push(d);
                    }
                }
                None => return Err(ParseErrorKind::InvalidDigit),
            }
        }

        let exponent = exp - right.chars().count() as i64;
        if !digits.is_empty() {
            let top = exponent + digits.len() as i64;
            if top.abs() > MAX_EXPONENT {
                return Err(ParseErrorKind::ExponentOutOfRange);
            }
        }

        Ok(Numeral {
            negative,
            digits,
            exponent,
            radix,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns the number of significant digits. Trailing zeros are
    /// significant.
    pub fn significant_digits(&self) -> u64 {
        self.digits.len() as u64
    }
}

#[test]
fn test_scan_numerals() {
    let n = Numeral::parse("10.00000000000000", Radix::DECIMAL).unwrap();
    assert_eq!(n.significant_digits(), 16);
    assert_eq!(n.exponent, -14);
    assert!(!n.negative);

    let n = Numeral::parse(" -1.23400000000000000 ", Radix::DECIMAL).unwrap();
    assert_eq!(n.significant_digits(), 18);
    assert_eq!(n.exponent, -17);
    assert!(n.negative);

    let n = Numeral::parse("0.0025e3", Radix::DECIMAL).unwrap();
    assert_eq!(n.digits, vec![2, 5]);
    assert_eq!(n.exponent, -1);

    let n = Numeral::parse("-000.000", Radix::DECIMAL).unwrap();
    assert!(n.is_zero());

    let hex = Radix::new(16).unwrap();
    let n = Numeral::parse("ff.e@2", hex).unwrap();
    assert_eq!(n.digits, vec![15, 15, 14]);
    assert_eq!(n.exponent, 1);

    use ParseErrorKind::*;
    let p = |s| Numeral::parse(s, Radix::DECIMAL).map(|_| ());
    assert_eq!(p(""), Err(InputEmpty));
    assert_eq!(p("   "), Err(InputEmpty));
    assert_eq!(p("-"), Err(InputEmpty));
    assert_eq!(p("1.2.3"), Err(MisplacedPoint));
    assert_eq!(p("12a"), Err(InvalidDigit));
    assert_eq!(p("1e"), Err(ExponentParseFailed));
    assert_eq!(p("1e+x"), Err(ExponentParseFailed));
    assert_eq!(p("1e999999999999"), Err(ExponentOutOfRange));
}

impl Float {
    /// Converts the scanned numeral into a float with the semantics `sem`.
    pub fn from_numeral(sem: Semantics, numeral: &Numeral) -> Self {
        if numeral.is_zero() {
            return Self::zero(sem, numeral.negative);
        }

        // The scaling below rounds, and the error of radix^exp grows with
        // the exponent.
        let exp = numeral.exponent;
        let exp_bits = (u64::BITS - exp.unsigned_abs().leading_zeros()) as usize;
        let work = sem.grow_log(2).increase_precision(2 * exp_bits);
        let radix = numeral.radix.get();
        let integer = BigInt::from_radix_digits(&numeral.digits, radix);
        let mut num = Self::from_bigint(work, integer);

        if exp != 0 {
            let scale =
                Self::from_u64(work, radix as u64).powi(exp.unsigned_abs());
            if exp > 0 {
                num *= scale;
            } else {
                num /= scale;
            }
        }
        let mut num = num.cast(sem);
        num.set_sign(numeral.negative);
        num
    }
}

/// Returns the integer `m * 2^s * radix^k`, rounded to the nearest integer
/// with ties to even. The arithmetic is exact, and its cost grows with the
/// square of `|k|`.
fn round_scaled_integer(m: &BigInt, s: i64, radix: u32, k: i64) -> BigInt {
    let mut num = m.clone();
    let mut den = BigInt::one();
    if s >= 0 {
        num.shift_left(s as usize);
    } else {
        den.shift_left((-s) as usize);
    }

    let power = BigInt::from_u64(radix as u64).powi(k.unsigned_abs());
    if k >= 0 {
        num.inplace_mul(&power);
    } else {
        den.inplace_mul(&power);
    }

    let mut rem = num.inplace_div(&den);
    rem.shift_left(1);
    let round_up = match rem.cmp(&den) {
        Ordering::Less => false,
        Ordering::Equal => num.is_odd(),
        Ordering::Greater => true,
    };
    if round_up {
        num.inplace_add(&BigInt::one());
    }
    num
}

/// The bits that the scaled value carries beyond its `n` digits.
const SCALE_GUARD_BITS: usize = 64;

impl Float {
    /// Returns the highest number of decimal digits that are needed for
    /// representing this type accurately.
    pub fn get_decimal_accuracy(&self) -> usize {
        // N = 2 + floor(p / log2(10)), after Matula. 59/196 is a continued
        // fraction convergent of log10(2).
        2 + (self.get_mantissa_len() * 59) / 196
    }

    /// Returns the number of digits in `radix` that are needed for
    /// representing this type accurately.
    pub fn get_radix_accuracy(&self, radix: Radix) -> usize {
        if radix == Radix::DECIMAL {
            return self.get_decimal_accuracy();
        }
        2 + radix.digits_for_bits(self.get_mantissa_len()) as usize
    }

    /// Returns `|self| * radix^k` rounded to the nearest integer, with ties
    /// to even. The result is expected to have about `n` digits.
    ///
    /// The product is computed in floating point with `n` digits and guard
    /// bits, so the cost depends on `log |k|` only. The rounding error can
    /// only change the result when the scaled value is very close to a
    /// half-integer, and those cases are decided with exact integers.
    fn round_scaled(&self, radix: Radix, k: i64, n: usize) -> BigInt {
        let k_bits = (u64::BITS - k.unsigned_abs().leading_zeros()) as usize;
        let bits =
            radix.bits_for_digits(n as u64) + SCALE_GUARD_BITS + 2 * k_bits;
        // Two more exponent bits keep radix^k in range for any value of
        // the source semantics.
        let work = Semantics::new(
            self.get_exponent_len() + 2,
            bits,
            RoundingMode::NearestTiesToEven,
        );

        let mut y = self.cast(work).abs();
        if k != 0 {
            let power =
                Self::from_u64(work, radix.get() as u64).powi(k.unsigned_abs());
            y = if k > 0 { &y * &power } else { &y / &power };
        }

        let half = Self::one(work, false).scale(-1, RoundingMode::None);
        let margin = Self::one(work, false).scale(-32, RoundingMode::None);
        let fraction = &y - &y.trunc();
        if (&fraction - &half).abs() < margin {
            let s = self.get_exp() - self.get_mantissa_len() as i64;
            return round_scaled_integer(&self.get_mantissa(), s, radix.get(), k);
        }
        if y.is_zero() {
            return BigInt::zero();
        }
        y.convert_normal_to_integer(RoundingMode::NearestTiesToEven)
    }

    /// Returns the first `n` significant digits of the magnitude of this
    /// normal number in `radix`, rounded with ties to even, and the radix
    /// exponent of the leading digit. The value is `d.ddd * radix^exp`.
    pub fn to_radix_digits(&self, radix: Radix, n: usize) -> (Vec<u8>, i64) {
        debug_assert!(self.is_normal());
        debug_assert!(n > 0);
        let r = radix.get();
        // The binary exponent of the leading bit.
        let lead = self.get_exp() - self.get_mantissa_len() as i64
            + self.get_mantissa().msb_index() as i64
            - 1;

        // Estimate the exponent of the leading digit. The estimate may be off
        // by one, and the loop below fixes it.
        let log_r_2 = core::f64::consts::LN_2 / (r as f64).ln();
        let mut exp = (lead as f64 * log_r_2).floor() as i64;

        let lower = BigInt::from_u64(r as u64).powi(n as u64 - 1);
        let upper = &lower * &BigInt::from_u64(r as u64);
        loop {
            let digits = self.round_scaled(radix, n as i64 - 1 - exp, n);
            if digits >= upper {
                exp += 1;
            } else if digits < lower {
                exp -= 1;
            } else {
                return (digits.to_radix_digits(r), exp);
            }
        }
    }

    /// Formats the number with `n` significant digits in `radix`.
    pub fn format_radix(&self, radix: Radix, n: usize) -> String {
        match self.get_category() {
            Category::NaN => "NaN".to_string(),
            Category::Infinity if self.get_sign() => "-Inf".to_string(),
            Category::Infinity => "Inf".to_string(),
            Category::Zero => "0".to_string(),
            Category::Normal => {
                let (digits, exp) = self.to_radix_digits(radix, n);
                format_digits(self.get_sign(), &digits, exp, n, radix)
            }
        }
    }
}

/// Writes the number `d.ddd * radix^exp`. Trailing zeros are dropped. Fixed
/// notation is used when the point falls within the `n` significant digits
/// or close enough after a leading zero.
fn format_digits(
    negative: bool,
    digits: &[u8],
    exp: i64,
    n: usize,
    radix: Radix,
) -> String {
    let used = digits.iter().rposition(|d| *d != 0).map_or(1, |i| i + 1);
    let chars: Vec<char> =
        digits[..used].iter().map(|d| radix.digit_char(*d)).collect();

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if (MIN_FIXED_EXPONENT..n as i64).contains(&exp) {
        if exp < 0 {
            out.push_str("0.");
            for _ in 0..(-exp - 1) {
                out.push('0');
            }
            out.extend(chars.iter());
        } else {
            let int_len = exp as usize + 1;
            for i in 0..int_len {
                out.push(chars.get(i).copied().unwrap_or('0'));
            }
            if chars.len() > int_len {
                out.push('.');
                out.extend(chars[int_len..].iter());
            }
        }
    } else {
        out.push(chars[0]);
        if chars.len() > 1 {
            out.push('.');
            out.extend(chars[1..].iter());
        }
        out.push(radix.exponent_marker());
        out.push_str(&exp.to_string());
    }
    out
}

impl Display for Float {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let digits = self.get_decimal_accuracy();
        write!(f, "{}", self.format_radix(Radix::DECIMAL, digits))
    }
}

impl BigInt {
    /// Prints the bigint in the radix `radix`.
    pub fn as_radix(&self, radix: Radix) -> String {
        self.to_radix_digits(radix.get())
            .iter()
            .map(|d| radix.digit_char(*d))
            .collect()
    }
}

impl Display for BigInt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_radix(Radix::DECIMAL))
    }
}

#[test]
fn test_print_f64_values() {
    let fmt = |v: f64| Float::from_f64(v).to_string();
    assert_eq!(fmt(-0.), "0");
    assert_eq!(fmt(0.1), "0.10000000000000001");
    assert_eq!(fmt(0.3), "0.29999999999999999");
    assert_eq!(fmt((1u64 << 51) as f64), "2251799813685248");
    assert_eq!(fmt(1995.1995), "1995.1994999999999");
    assert_eq!(fmt(2f64.powi(100)), "1.2676506002282294e30");
    assert_eq!(fmt(1e-9), "1.0000000000000001e-9");
    assert_eq!(fmt(1.5e-7), "0.00000014999999999999999");
    assert_eq!(fmt(-0.5), "-0.5");
    assert_eq!(fmt(f64::NAN), "NaN");
    assert_eq!(fmt(f64::NEG_INFINITY), "-Inf");

    // Eleven significand bits print with five digits.
    let half = Semantics::new(5, 11, RoundingMode::NearestTiesToEven);
    let fmt_half = |v: f64| Float::from_f64(v).cast(half).to_string();
    assert_eq!(fmt_half(0.3), "0.30005");
    assert_eq!(fmt_half(0.1), "0.099976");
    assert_eq!(fmt_half(4.5), "4.5");
    assert_eq!(fmt_half(65534.), "Inf");
}

#[test]
fn test_digits_in_other_radices() {
    let x = Float::from_f64(255.5);
    assert_eq!(x.format_radix(Radix::new(16).unwrap(), 8), "ff.8");
    assert_eq!(x.format_radix(Radix::new(2).unwrap(), 12), "11111111.1");
    let tiny = Float::from_f64(2f64.powi(-40));
    assert_eq!(tiny.format_radix(Radix::new(16).unwrap(), 4), "1@-10");
    assert_eq!(tiny.format_radix(Radix::new(4).unwrap(), 4), "1e-20");

    // Rounding carries into a new leading digit.
    let (digits, exp) =
        Float::from_f64(9.996).to_radix_digits(Radix::DECIMAL, 3);
    assert_eq!(digits, vec![1, 0, 0]);
    assert_eq!(exp, 1);
}

#[test]
fn test_rounding_ties_when_printing() {
    let d = Radix::DECIMAL;
    // Exact ties go to the even digit.
    assert_eq!(Float::from_f64(2.5).format_radix(d, 1), "2");
    assert_eq!(Float::from_f64(3.5).format_radix(d, 1), "4");
    assert_eq!(Float::from_f64(0.125).format_radix(d, 2), "0.12");
    assert_eq!(Float::from_f64(0.375).format_radix(d, 2), "0.38");
    assert_eq!(Float::from_f64(-1234.5).format_radix(d, 4), "-1234");
    // 0.15 is slightly below the tie in binary.
    assert_eq!(Float::from_f64(0.15).format_radix(d, 1), "0.1");
    assert_eq!(Float::from_f64(0.35).format_radix(d, 1), "0.3");
}

#[test]
fn test_print_huge_exponents() {
    let sem = Semantics::new(32, 120, RoundingMode::NearestTiesToEven);
    let d = Radix::DECIMAL;
    let scan = |s: &str| Numeral::parse(s, d).unwrap();

    let x = Float::from_numeral(sem, &scan("2.5e-250000000"));
    assert_eq!(x.format_radix(d, 2), "2.5e-250000000");
    let x = Float::from_numeral(sem, &scan("-7.125e250000000"));
    assert_eq!(x.format_radix(d, 4), "-7.125e250000000");
    let x = Float::from_numeral(sem, &scan("9.9999996e-123456789"));
    assert_eq!(x.format_radix(d, 7), "1e-123456788");

    let hex = Radix::new(16).unwrap();
    let numeral = Numeral::parse("1.8@-90000000", hex).unwrap();
    let x = Float::from_numeral(sem, &numeral);
    assert_eq!(x.format_radix(hex, 3), "1.8@-90000000");
}

#[test]
fn test_from_numeral() {
    let d = Radix::DECIMAL;
    let read = |s: &str| {
        let numeral = Numeral::parse(s, d).unwrap();
        Float::from_numeral(FP64, &numeral).as_f64()
    };
    assert_eq!(read("-3.00"), -3.);
    assert_eq!(read("430.56"), 430.56);
    assert_eq!(read("5.2"), 5.2);
    assert_eq!(read("3.2e1"), 32.);
    assert_eq!(read("44.e-1"), 4.4);
    assert_eq!(read("-54.85e-1"), -5.485);
    assert_eq!(read("1e-300"), 1e-300);
    assert_eq!(read("0.000"), 0.);
    assert_eq!(read("1.7976931348623157e308"), f64::MAX);

    let hex = Radix::new(16).unwrap();
    let numeral = Numeral::parse("-a.8", hex).unwrap();
    assert_eq!(Float::from_numeral(FP64, &numeral).as_f64(), -10.5);
}

#[test]
fn test_print_and_scan_random_values() {
    use crate::utils;

    let mut rng = utils::TestRng::new(11);
    for _ in 0..500 {
        let v = utils::finite_f64(rng.next_u64());
        let printed = Float::from_f64(v).to_string();
        // 17 digits are enough to restore the exact value.
        assert_eq!(printed.parse::<f64>().ok(), Some(v));
        let numeral = Numeral::parse(&printed, Radix::DECIMAL).unwrap();
        assert_eq!(Float::from_numeral(FP64, &numeral).as_f64(), v);
    }
}

#[test]
fn test_decimal_accuracy_for_type() {
    use crate::float::FP128;
    let acc = |precision| {
        let sem = Semantics::new(8, precision, RoundingMode::NearestTiesToEven);
        Float::zero(sem, false).get_decimal_accuracy()
    };
    assert_eq!(acc(11), 5);
    assert_eq!(acc(24), 8);
    assert_eq!(Float::zero(FP64, false).get_decimal_accuracy(), 17);
    assert_eq!(Float::zero(FP128, false).get_decimal_accuracy(), 35);
    assert_eq!(acc(237), 73);
    let hex = Radix::new(16).unwrap();
    assert_eq!(Float::zero(FP64, false).get_radix_accuracy(hex), 15);
}

#[test]
fn test_bigint_to_decimal() {
    let mut num = BigInt::one();
    for i in 1..41 {
        num.inplace_mul(&BigInt::from_u64(i));
    }
    assert_eq!(
        num.to_string(),
        "815915283247897734345611269596115894272000000000"
    );
    assert_eq!(BigInt::from_u64(255).as_radix(Radix::new(16).unwrap()), "ff");
    assert_eq!(BigInt::zero().to_string(), "0");
}
