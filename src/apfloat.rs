//! This module contains `Apfloat`, a real number that carries its precision:
//! the number of significant digits, in some radix, that the value is known
//! to. Results of operations get the precision of the least precise operand.

use super::error::{Error, ParseErrorKind, Result};
use super::float::{Float, RoundingMode, Semantics};
use super::radix::Radix;
use super::string::Numeral;
use core::fmt::Display;
use log::trace;

/// The precision of exact values, such as zero and machine integers.
pub const INFINITE: u64 = u64::MAX;

/// The number of bits that values carry beyond their precision.
pub const GUARD_BITS: usize = 64;

/// The width of the exponent field of the underlying floats.
const EXPONENT_BITS: usize = 32;

const RM: RoundingMode = RoundingMode::NearestTiesToEven;

/// Returns the semantics that hold `precision` digits of `radix`, with the
/// guard bits.
fn working_semantics(precision: u64, radix: Radix) -> Semantics {
    debug_assert!(precision != INFINITE);
    let bits = radix.bits_for_digits(precision) + GUARD_BITS;
    Semantics::new(EXPONENT_BITS, bits, RM)
}

/// Returns semantics wide enough to hold `bits` bits exactly.
fn exact_semantics(bits: usize) -> Semantics {
    Semantics::new(EXPONENT_BITS, bits.max(2), RM)
}

/// Returns the number of bits between the highest and the lowest set bit
/// of the significand of `x`.
fn significant_bits(x: &Float) -> usize {
    let mantissa = x.get_mantissa();
    if mantissa.is_zero() {
        return 1;
    }
    mantissa.msb_index() - mantissa.trailing_zeros()
}

/// Returns semantics that hold the sum of the exact values `a` and `b`
/// without rounding.
fn exact_sum_semantics(a: &Float, b: &Float) -> Semantics {
    if a.is_zero() {
        return b.get_semantics();
    } else if b.is_zero() {
        return a.get_semantics();
    }
    let low = (a.get_exp() - a.get_mantissa_len() as i64)
        .min(b.get_exp() - b.get_mantissa_len() as i64);
    // One more bit for the carry.
    let high = a.get_exp().max(b.get_exp()) + 1;
    exact_semantics((high - low + 1) as usize)
}

/// An arbitrary-precision real number with a precision in radix digits.
#[derive(Debug, Clone)]
pub struct Apfloat {
    value: Float,
    precision: u64,
    radix: Radix,
}

impl Apfloat {
    /// Wraps `value`. Zero is always exact and positive.
    fn from_value(value: Float, precision: u64, radix: Radix) -> Self {
        if value.is_zero() {
            return Apfloat {
                value: Float::zero(value.get_semantics(), false),
                precision: INFINITE,
                radix,
            };
        }
        Apfloat {
            value,
            precision,
            radix,
        }
    }

    /// Wraps the result of the operation `operation`, and reports values
    /// that left the range of the underlying floats.
    fn checked(
        value: Float,
        precision: u64,
        radix: Radix,
        operation: &'static str,
    ) -> Result<Self> {
        if value.is_inf() {
            return Err(Error::Domain {
                operation,
                reason: "the result overflows",
            });
        } else if value.is_nan() {
            return Err(Error::Domain {
                operation,
                reason: "the result is undefined",
            });
        }
        Ok(Self::from_value(value, precision, radix))
    }

    /// Parses a decimal literal. The precision is the number of digits in
    /// the literal, without the leading zeros.
    pub fn parse(literal: &str) -> Result<Self> {
        Self::parse_radix(literal, Radix::DECIMAL)
    }

    /// Parses a literal in `radix`. The precision is the number of digits in
    /// the literal, without the leading zeros.
    pub fn parse_radix(literal: &str, radix: Radix) -> Result<Self> {
        let numeral = Numeral::parse(literal, radix)
            .map_err(|kind| Error::parse(literal, kind))?;
        let precision = numeral.significant_digits();
        trace!("scanned {literal:?} with {precision} digits in radix {radix}");
        Ok(Self::from_numeral(&numeral, precision))
    }

    /// Parses a literal in `radix` and gives it the precision `precision`.
    /// A precision of `INFINITE` keeps every digit of the literal and marks
    /// the value as exact.
    pub fn parse_with_precision(
        literal: &str,
        precision: u64,
        radix: Radix,
    ) -> Result<Self> {
        if precision == 0 {
            return Err(Error::parse(literal, ParseErrorKind::ZeroPrecision));
        }
        let numeral = Numeral::parse(literal, radix)
            .map_err(|kind| Error::parse(literal, kind))?;
        Ok(Self::from_numeral(&numeral, precision))
    }

    fn from_numeral(numeral: &Numeral, precision: u64) -> Self {
        let radix = numeral.radix;
        if numeral.is_zero() {
            return Self::zero(radix);
        }
        let sem = if precision == INFINITE {
            working_semantics(numeral.significant_digits(), radix)
        } else {
            working_semantics(precision, radix)
        };
        let value = Float::from_numeral(sem, numeral);
        Self::from_value(value, precision, radix)
    }

    /// Returns the exact integer `value`.
    pub fn from_i64(value: i64, radix: Radix) -> Self {
        let value = Float::from_i64(exact_semantics(64), value);
        Self::from_value(value, INFINITE, radix)
    }

    /// Returns an exact zero.
    pub fn zero(radix: Radix) -> Self {
        Self::from_i64(0, radix)
    }

    /// Returns an exact one.
    pub fn one(radix: Radix) -> Self {
        Self::from_i64(1, radix)
    }

    /// Returns pi, with `precision` digits of `radix`.
    pub fn pi(precision: u64, radix: Radix) -> Result<Self> {
        if precision == INFINITE {
            return Err(Error::InfinitePrecision { operation: "pi" });
        }
        let value = Float::pi(working_semantics(precision, radix));
        Ok(Self::from_value(value, precision, radix))
    }

    /// Returns the number of significant digits of the value, in its radix.
    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// Returns the binary float that holds the value.
    pub fn value(&self) -> &Float {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_exact(&self) -> bool {
        self.precision == INFINITE
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Returns -1, 0 or 1, according to the sign of the value.
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }

    /// Returns true if the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.is_zero() || self.value == self.value.trunc()
    }

    /// Returns a copy of this value with at most `precision` digits.
    pub fn limit_precision(&self, precision: u64) -> Self {
        debug_assert!(precision > 0);
        if precision >= self.precision {
            return self.clone();
        }
        let value = self.value.cast(working_semantics(precision, self.radix));
        Self::from_value(value, precision, self.radix)
    }

    /// Returns the value rounded to the nearest f64.
    pub fn to_f64(&self) -> f64 {
        self.value.as_f64()
    }

    fn check_radix(&self, other: &Self) -> Result<()> {
        if self.radix != other.radix {
            return Err(Error::RadixMismatch {
                left: self.radix.get(),
                right: other.radix.get(),
            });
        }
        Ok(())
    }

    /// Returns the semantics for evaluating a function of a value with the
    /// precision `precision`. Exact values have no finite working precision.
    fn function_semantics(
        &self,
        precision: u64,
        operation: &'static str,
    ) -> Result<Semantics> {
        if precision == INFINITE {
            return Err(Error::InfinitePrecision { operation });
        }
        Ok(working_semantics(precision, self.radix))
    }

    pub fn neg(&self) -> Self {
        Self::from_value(self.value.neg(), self.precision, self.radix)
    }

    pub fn abs(&self) -> Self {
        Self::from_value(self.value.abs(), self.precision, self.radix)
    }

    /// Adds `other`. Leading digits that cancel are taken off the precision
    /// of the sum, and a sum with no digit left is an exact zero.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_radix(other)?;
        let precision = self.precision.min(other.precision);
        let sem = if precision == INFINITE {
            exact_sum_semantics(&self.value, &other.value)
        } else {
            working_semantics(precision, self.radix)
        };
        let a = self.value.cast(sem);
        let b = other.value.cast(sem);
        let value = Float::add_with_rm(&a, &b, RM);
        if precision == INFINITE || self.is_zero() || other.is_zero() {
            return Self::checked(value, precision, self.radix, "addition");
        }
        // Leading digits that cancel are not known to the result.
        let top = self.value.get_exp().max(other.value.get_exp());
        let lost = self.lost_digits(top, &value);
        if lost >= precision {
            trace!("addition lost all {precision} digits");
            return Ok(Self::zero(self.radix));
        }
        Self::checked(value, precision - lost, self.radix, "addition")
    }

    /// Returns the number of whole digits between the leading bit at
    /// `top` and the leading bit of `value`.
    fn lost_digits(&self, top: i64, value: &Float) -> u64 {
        if !value.is_normal() || value.get_exp() >= top {
            return 0;
        }
        self.radix.digits_for_bits((top - value.get_exp()) as usize)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.check_radix(other)?;
        let precision = self.precision.min(other.precision);
        let sem = if precision == INFINITE {
            let bits =
                significant_bits(&self.value) + significant_bits(&other.value);
            exact_semantics(bits)
        } else {
            working_semantics(precision, self.radix)
        };
        let a = self.value.cast(sem);
        let b = other.value.cast(sem);
        let value = Float::mul_with_rm(&a, &b, RM);
        Self::checked(value, precision, self.radix, "multiplication")
    }

    /// Divides by `other`. The quotient of two exact values is generally
    /// not exact, so that case is an error.
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.check_radix(other)?;
        if other.is_zero() {
            return Err(Error::Domain {
                operation: "division",
                reason: "division by zero",
            });
        } else if self.is_zero() {
            return Ok(Self::zero(self.radix));
        }
        let precision = self.precision.min(other.precision);
        let sem = self.function_semantics(precision, "division")?;
        let a = self.value.cast(sem);
        let b = other.value.cast(sem);
        let value = Float::div_with_rm(&a, &b, RM);
        Self::checked(value, precision, self.radix, "division")
    }

    pub fn sqrt(&self) -> Result<Self> {
        if self.is_zero() {
            return Ok(self.clone());
        } else if self.is_negative() {
            return Err(Error::Domain {
                operation: "sqrt",
                reason: "square root of a negative number",
            });
        }
        let sem = self.function_semantics(self.precision, "sqrt")?;
        let value = self.value.cast(sem).sqrt();
        Self::checked(value, self.precision, self.radix, "sqrt")
    }

    /// Computes e^x.
    pub fn exp(&self) -> Result<Self> {
        if self.is_zero() {
            return Ok(Self::one(self.radix));
        }
        let sem = self.function_semantics(self.precision, "exp")?;
        let value = self.value.cast(sem).exp();
        Self::checked(value, self.precision, self.radix, "exp")
    }

    /// Computes the natural logarithm.
    pub fn ln(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::Domain {
                operation: "ln",
                reason: "logarithm of zero",
            });
        } else if self.is_negative() {
            return Err(Error::Domain {
                operation: "ln",
                reason: "logarithm of a negative number",
            });
        } else if self.value == Float::one(self.value.get_semantics(), false)
        {
            return Ok(Self::zero(self.radix));
        }
        let sem = self.function_semantics(self.precision, "ln")?;
        let value = self.value.cast(sem).log();
        Self::checked(value, self.precision, self.radix, "ln")
    }

    /// Computes the sine and the cosine of the value (in radians).
    pub fn sin_cos(&self) -> Result<(Self, Self)> {
        if self.is_zero() {
            return Ok((self.clone(), Self::one(self.radix)));
        }
        let sem = self.function_semantics(self.precision, "sin_cos")?;
        let (sin, cos) = self.value.cast(sem).sin_cos();
        // Near a root of sin or cos, the error of the argument is larger
        // than the result.
        let top = self.value.get_exp();
        let part = |value: Float, operation: &'static str| -> Result<Self> {
            if self.lost_digits(top, &value) >= self.precision {
                return Ok(Self::zero(self.radix));
            }
            Self::checked(value, self.precision, self.radix, operation)
        };
        Ok((part(sin, "sin")?, part(cos, "cos")?))
    }

    pub fn sin(&self) -> Result<Self> {
        Ok(self.sin_cos()?.0)
    }

    pub fn cos(&self) -> Result<Self> {
        Ok(self.sin_cos()?.1)
    }

    /// Computes the angle of the point (x, y), where 'self' is y. The result
    /// is in the range (-pi, pi]. The angle of the origin is zero.
    pub fn atan2(&self, x: &Self) -> Result<Self> {
        self.check_radix(x)?;
        if self.is_zero() && !x.is_negative() {
            return Ok(Self::zero(self.radix));
        }
        let precision = self.precision.min(x.precision);
        let sem = self.function_semantics(precision, "atan2")?;
        let y = self.value.cast(sem);
        let value = y.atan2(&x.value.cast(sem));
        Self::checked(value, precision, self.radix, "atan2")
    }

    /// Raises the value to the real power `exponent`. The base must not be
    /// negative.
    pub fn pow(&self, exponent: &Self) -> Result<Self> {
        self.check_radix(exponent)?;
        if exponent.is_zero() {
            return Ok(Self::one(self.radix));
        } else if self.is_zero() {
            return if exponent.is_negative() {
                Err(Error::Domain {
                    operation: "pow",
                    reason: "zero raised to a negative power",
                })
            } else {
                Ok(Self::zero(self.radix))
            };
        } else if self.is_negative() {
            return Err(Error::Domain {
                operation: "pow",
                reason: "negative base with a real exponent",
            });
        }
        let precision = self.precision.min(exponent.precision);
        let sem = self.function_semantics(precision, "pow")?;
        let value = self.value.cast(sem).pow(&exponent.value.cast(sem));
        Self::checked(value, precision, self.radix, "pow")
    }
}

impl Display for Apfloat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let digits = if self.is_exact() {
            self.value.get_radix_accuracy(self.radix)
        } else {
            self.precision.min(usize::MAX as u64) as usize
        };
        write!(f, "{}", self.value.format_radix(self.radix, digits))
    }
}

#[test]
fn test_parse_precision() {
    let a = Apfloat::parse("10.00000000000000").unwrap();
    assert_eq!(a.precision(), 16);
    assert_eq!(a.to_f64(), 10.);

    let b = Apfloat::parse("-1.23400000000000000").unwrap();
    assert_eq!(b.precision(), 18);
    assert_eq!(b.to_f64(), -1.234);

    let z = Apfloat::parse("-0.000").unwrap();
    assert!(z.is_zero());
    assert!(z.is_exact());
    assert_eq!(z.signum(), 0);

    assert_eq!(Apfloat::parse("12.5e3").unwrap().precision(), 3);
    assert_eq!(Apfloat::parse("0.00250").unwrap().precision(), 3);

    let hex = Radix::new(16).unwrap();
    let h = Apfloat::parse_radix("ff.8", hex).unwrap();
    assert_eq!(h.precision(), 3);
    assert_eq!(h.to_f64(), 255.5);
    assert_eq!(h.to_string(), "ff.8");
}

#[test]
fn test_parse_errors() {
    fn kind(s: &str) -> Option<ParseErrorKind> {
        match Apfloat::parse(s) {
            Err(Error::Parse { kind, .. }) => Some(kind),
            _ => None,
        }
    }
    assert_eq!(kind(""), Some(ParseErrorKind::InputEmpty));
    assert_eq!(kind("1.2.3"), Some(ParseErrorKind::MisplacedPoint));
    assert_eq!(kind("12x"), Some(ParseErrorKind::InvalidDigit));
    assert_eq!(kind("1e"), Some(ParseErrorKind::ExponentParseFailed));

    let e = Apfloat::parse_with_precision("1", 0, Radix::DECIMAL);
    assert!(matches!(
        e,
        Err(Error::Parse {
            kind: ParseErrorKind::ZeroPrecision,
            ..
        })
    ));

    let p = Apfloat::parse_with_precision("1.5", 40, Radix::DECIMAL).unwrap();
    assert_eq!(p.precision(), 40);
    assert_eq!(p.to_string(), "1.5");
}

#[test]
fn test_precision_propagation() {
    let a = Apfloat::parse("10.00000000000000").unwrap();
    let b = Apfloat::parse("-1.23400000000000000").unwrap();
    let two = Apfloat::from_i64(2, Radix::DECIMAL);

    assert_eq!(a.add(&b).unwrap().precision(), 16);
    assert_eq!(b.mul(&b).unwrap().precision(), 18);
    assert_eq!(b.mul(&two).unwrap().precision(), 18);
    assert_eq!(b.div(&a).unwrap().precision(), 16);
    assert_eq!(a.add(&Apfloat::zero(Radix::DECIMAL)).unwrap().precision(), 16);

    // Zero is always exact.
    let d = a.sub(&a).unwrap();
    assert!(d.is_zero());
    assert_eq!(d.precision(), INFINITE);

    assert_eq!(a.add(&b).unwrap().to_string(), "8.766");
    assert_eq!(a.limit_precision(4).precision(), 4);
    assert_eq!(a.limit_precision(40).precision(), 16);
}

#[test]
fn test_exact_arithmetic() {
    let d = Radix::DECIMAL;
    let a = Apfloat::from_i64(123456789, d);
    let b = Apfloat::from_i64(987654321, d);
    let p = a.mul(&b).unwrap();
    assert!(p.is_exact());
    assert_eq!(p.to_string(), "121932631112635269");

    let s = a.sub(&b).unwrap();
    assert!(s.is_exact());
    assert_eq!(s.to_string(), "-864197532");

    // Exact sums far apart keep every bit.
    let big = Apfloat::from_i64(1 << 62, d).mul(&b).unwrap();
    let one = Apfloat::one(d);
    let back = big.add(&one).unwrap().sub(&big).unwrap();
    assert_eq!(back.to_f64(), 1.);

    let e = Apfloat::one(d).div(&Apfloat::from_i64(3, d));
    assert_eq!(e.unwrap_err(), Error::InfinitePrecision {
        operation: "division"
    });
    assert!(matches!(
        one.div(&Apfloat::zero(d)),
        Err(Error::Domain { .. })
    ));
    assert!(Apfloat::zero(d).div(&one).unwrap().is_zero());
    assert!(matches!(
        Apfloat::from_i64(2, d).sqrt(),
        Err(Error::InfinitePrecision { .. })
    ));
}

#[test]
fn test_exact_product_width() {
    // The width of an exact product follows its significant bits, not the
    // width of the operands.
    let mut x = Apfloat::from_i64(3, Radix::DECIMAL);
    for _ in 0..6 {
        x = x.mul(&x).unwrap();
    }
    assert!(x.is_exact());
    assert!(x.value().get_semantics().get_precision() <= 128);
    assert_eq!(x.to_string(), "3433683820292512484657849089281");

    let y = Apfloat::from_i64(1 << 40, Radix::DECIMAL);
    let y = y.mul(&y).unwrap().mul(&y).unwrap();
    assert!(y.value().get_semantics().get_precision() <= 4);
    assert_eq!(y.value().get_exp(), 120);
}

#[test]
fn test_cancellation() {
    let p = |s| Apfloat::parse(s).unwrap();

    let d = p("1.000000000001").sub(&p("1.000000000000")).unwrap();
    assert_eq!(d.precision(), 1);
    assert_eq!(d.to_string(), "1e-12");

    let d = p("1000.000000000000").sub(&p("999.0000000000000")).unwrap();
    assert_eq!(d.precision(), 14);
    assert_eq!(d.to_string(), "1");

    // Nothing is left of the digits of the operands.
    let d = p("2.00000").sub(&p("2.000000000000000001")).unwrap();
    assert!(d.is_zero());
    assert!(d.is_exact());

    // cos(pi/2) is below the error of the argument.
    let half_pi = Apfloat::pi(16, Radix::DECIMAL)
        .unwrap()
        .div(&Apfloat::from_i64(2, Radix::DECIMAL))
        .unwrap();
    let (sin, cos) = half_pi.sin_cos().unwrap();
    assert_eq!(sin.to_string(), "1");
    assert!(cos.is_zero());
}

#[test]
fn test_radix_mismatch() {
    let a = Apfloat::parse("1.5").unwrap();
    let b = Apfloat::parse_radix("1.1", Radix::new(2).unwrap()).unwrap();
    assert_eq!(
        a.add(&b).unwrap_err(),
        Error::RadixMismatch { left: 10, right: 2 }
    );
    assert!(Radix::new(37).is_err());
}

#[test]
fn test_functions() {
    let p = |s| Apfloat::parse(s).unwrap();

    // mp.dps = 60; mp.sqrt(2)
    let r = p("2.000000000000000000000000000000").sqrt().unwrap();
    assert_eq!(r.precision(), 31);
    assert_eq!(r.to_string(), "1.41421356237309504880168872421");

    // mp.log(10)
    let r = p("10.00000000000000").ln().unwrap();
    assert_eq!(r.to_string(), "2.302585092994046");

    // mp.exp(1)
    let r = p("1.00000000000000000000").exp().unwrap();
    assert_eq!(r.to_string(), "2.71828182845904523536");

    // mp.sin(0.5), mp.cos(0.5)
    let (s, c) = p("0.5000000000").sin_cos().unwrap();
    assert_eq!(s.to_string(), "0.4794255386");
    assert_eq!(c.to_string(), "0.8775825619");

    // mp.atan2(1, -1)
    let r = p("1.000000000").atan2(&p("-1.000000000")).unwrap();
    assert_eq!(r.to_string(), "2.35619449");

    // mp.power(10, -1.234)
    let r = p("10.00000000000000").pow(&p("-1.23400000000000000")).unwrap();
    assert_eq!(r.precision(), 16);
    assert_eq!(r.to_string(), "0.05834451042737447");

    assert!(p("1.000").ln().unwrap().is_zero());
    assert!(Apfloat::one(Radix::DECIMAL).ln().unwrap().is_zero());
    assert!(matches!(p("0").ln(), Err(Error::Domain { .. })));
    assert!(matches!(p("-2.0").ln(), Err(Error::Domain { .. })));
    assert!(matches!(p("-2.0").sqrt(), Err(Error::Domain { .. })));
    assert!(matches!(p("0").pow(&p("-1.0")), Err(Error::Domain { .. })));
    assert!(p("0").pow(&p("1.5")).unwrap().is_zero());
    assert_eq!(p("0").exp().unwrap().to_string(), "1");
}

#[test]
fn test_display() {
    let p = |s| Apfloat::parse(s).unwrap();
    assert_eq!(p("1.5e-9").to_string(), "1.5e-9");
    assert_eq!(p("123000").to_string(), "123000");
    assert_eq!(p("1.00e30").to_string(), "1e30");
    assert_eq!(p("-0.000250").to_string(), "-0.00025");
    assert_eq!(p("0").to_string(), "0");
    assert_eq!(Apfloat::from_i64(-42, Radix::DECIMAL).to_string(), "-42");

    let b36 = Radix::new(36).unwrap();
    let z = Apfloat::parse_radix("z.z@3", b36).unwrap();
    assert_eq!(z.to_f64(), 35. * 36f64.powi(3) + 35. * 36f64.powi(2));
    assert_eq!(z.to_string(), "z.z@3");
}
