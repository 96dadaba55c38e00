//! This module contains `Apcomplex`, a complex number made of two `Apfloat`
//! parts, with the principal branch of the logarithm and the power.

use super::apfloat::Apfloat;
use super::error::{Error, ParseErrorKind, Result};
use super::radix::Radix;
use core::fmt::Display;
use log::{debug, trace};

/// Integer exponents up to this magnitude are computed by repeated
/// multiplication.
pub const MAX_INTEGER_POWER: u64 = 1 << 20;

/// An arbitrary-precision complex number.
#[derive(Debug, Clone)]
pub struct Apcomplex {
    re: Apfloat,
    im: Apfloat,
}

impl Apcomplex {
    /// Creates the number `re + im*i`. Both parts must use the same radix.
    pub fn new(re: Apfloat, im: Apfloat) -> Result<Self> {
        if re.radix() != im.radix() {
            return Err(Error::RadixMismatch {
                left: re.radix().get(),
                right: im.radix().get(),
            });
        }
        Ok(Apcomplex { re, im })
    }

    /// Creates a number with an exact zero imaginary part.
    pub fn from_real(re: Apfloat) -> Self {
        let im = Apfloat::zero(re.radix());
        Apcomplex { re, im }
    }

    pub fn zero(radix: Radix) -> Self {
        Self::from_real(Apfloat::zero(radix))
    }

    pub fn one(radix: Radix) -> Self {
        Self::from_real(Apfloat::one(radix))
    }

    /// Parses a decimal complex literal. See `parse_radix`.
    pub fn parse(literal: &str) -> Result<Self> {
        Self::parse_radix(literal, Radix::DECIMAL)
    }

    /// Parses `"(re, im)"`, `"(re)"`, or a bare real literal in `radix`.
    /// A missing imaginary part is an exact zero.
    pub fn parse_radix(literal: &str, radix: Radix) -> Result<Self> {
        let malformed =
            || Error::parse(literal, ParseErrorKind::MalformedComplex);
        let trimmed = literal.trim();
        let Some(inner) = trimmed.strip_prefix('(') else {
            return Ok(Self::from_real(Apfloat::parse_radix(trimmed, radix)?));
        };
        let inner = inner.strip_suffix(')').ok_or_else(malformed)?;

        let mut parts = inner.split(',');
        let re = parts.next().ok_or_else(malformed)?;
        let im = parts.next();
        if parts.next().is_some() {
            return Err(malformed());
        }
        trace!("scanning complex parts {re:?} and {im:?}");

        let re = Apfloat::parse_radix(re, radix)?;
        let im = match im {
            Some(im) => Apfloat::parse_radix(im, radix)?,
            None => Apfloat::zero(radix),
        };
        Ok(Apcomplex { re, im })
    }

    pub fn re(&self) -> &Apfloat {
        &self.re
    }

    pub fn im(&self) -> &Apfloat {
        &self.im
    }

    pub fn radix(&self) -> Radix {
        self.re.radix()
    }

    /// Returns the precision of the number, which is the precision of the
    /// less precise part.
    pub fn precision(&self) -> u64 {
        self.re.precision().min(self.im.precision())
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// Returns a copy of this number with at most `precision` digits in
    /// each part.
    pub fn limit_precision(&self, precision: u64) -> Self {
        Apcomplex {
            re: self.re.limit_precision(precision),
            im: self.im.limit_precision(precision),
        }
    }

    pub fn neg(&self) -> Self {
        Apcomplex {
            re: self.re.neg(),
            im: self.im.neg(),
        }
    }

    /// Returns the complex conjugate.
    pub fn conj(&self) -> Self {
        Apcomplex {
            re: self.re.clone(),
            im: self.im.neg(),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        Self::new(self.re.add(&other.re)?, self.im.add(&other.im)?)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        Self::new(self.re.sub(&other.re)?, self.im.sub(&other.im)?)
    }

    /// (a + bi)(c + di) = (ac - bd) + (ad + bc)i
    pub fn mul(&self, other: &Self) -> Result<Self> {
        let (a, b) = (&self.re, &self.im);
        let (c, d) = (&other.re, &other.im);
        let re = a.mul(c)?.sub(&b.mul(d)?)?;
        let im = a.mul(d)?.add(&b.mul(c)?)?;
        Self::new(re, im)
    }

    /// (a + bi)/(c + di) = ((ac + bd) + (bc - ad)i) / (c^2 + d^2)
    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::Domain {
                operation: "division",
                reason: "division by zero",
            });
        }
        let (a, b) = (&self.re, &self.im);
        let (c, d) = (&other.re, &other.im);
        if other.is_real() {
            return Self::new(a.div(c)?, b.div(c)?);
        }
        let den = c.mul(c)?.add(&d.mul(d)?)?;
        let re = a.mul(c)?.add(&b.mul(d)?)?;
        let im = b.mul(c)?.sub(&a.mul(d)?)?;
        Self::new(re.div(&den)?, im.div(&den)?)
    }

    /// Returns the modulus |z|.
    pub fn abs(&self) -> Result<Apfloat> {
        if self.im.is_zero() {
            return Ok(self.re.abs());
        } else if self.re.is_zero() {
            return Ok(self.im.abs());
        }
        let sum = self.re.mul(&self.re)?.add(&self.im.mul(&self.im)?)?;
        sum.sqrt()
    }

    /// Returns the principal argument, in the range (-pi, pi].
    pub fn arg(&self) -> Result<Apfloat> {
        self.im.atan2(&self.re)
    }

    /// Computes the principal natural logarithm:
    /// ln(z) = ln|z| + arg(z)i
    pub fn ln(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::Domain {
                operation: "ln",
                reason: "logarithm of zero",
            });
        }
        Self::new(self.abs()?.ln()?, self.arg()?)
    }

    /// Computes e^(a + bi) = e^a (cos(b) + sin(b)i)
    pub fn exp(&self) -> Result<Self> {
        let magnitude = self.re.exp()?;
        if self.im.is_zero() {
            return Ok(Self::from_real(magnitude));
        }
        let (sin, cos) = self.im.sin_cos()?;
        Self::new(magnitude.mul(&cos)?, magnitude.mul(&sin)?)
    }

    /// Returns the exponent as an integer, if it is an exact real integer
    /// in the range of the repeated multiplication.
    fn as_small_integer(&self) -> Option<i64> {
        if !self.is_real() || !self.re.is_exact() || !self.re.is_integer() {
            return None;
        }
        let value = self.re.value();
        if value.get_exp() > 20 {
            return None;
        }
        let n = value.to_i64(crate::RoundingMode::Zero);
        (n.unsigned_abs() <= MAX_INTEGER_POWER).then_some(n)
    }

    /// Computes z^n by squaring and multiplying.
    fn powi(&self, n: i64) -> Result<Self> {
        let mut elem = Self::one(self.radix());
        let mut val = self.clone();
        let mut bits = n.unsigned_abs();
        while bits > 0 {
            if bits & 1 == 1 {
                elem = elem.mul(&val)?;
            }
            bits >>= 1;
            if bits > 0 {
                val = val.mul(&val)?;
            }
        }
        if n < 0 {
            elem = Self::one(self.radix()).div(&elem)?;
        }
        Ok(elem)
    }

    /// Raises the number to the power `w` on the principal branch:
    /// z^w = exp(w ln(z)). The result has the precision of the less precise
    /// operand.
    pub fn pow(&self, w: &Self) -> Result<Self> {
        if self.radix() != w.radix() {
            return Err(Error::RadixMismatch {
                left: self.radix().get(),
                right: w.radix().get(),
            });
        }
        let precision = self.precision().min(w.precision());

        if self.is_zero() {
            if w.re.signum() > 0 {
                return Ok(Self::zero(self.radix()));
            }
            return Err(Error::Domain {
                operation: "pow",
                reason: "zero raised to a power with a non-positive real part",
            });
        } else if w.is_zero() {
            return Ok(Self::one(self.radix()));
        }

        let res = if let Some(n) = w.as_small_integer() {
            debug!("pow: integer power {n}");
            self.powi(n)?
        } else if self.is_real() && self.re.signum() > 0 && w.is_real() {
            debug!("pow: real power with {precision} digits");
            Self::from_real(self.re.pow(&w.re)?)
        } else {
            debug!("pow: exp(w ln(z)) with {precision} digits");
            // An exact base takes the precision of the exponent.
            let z = self.limit_precision(precision);
            w.mul(&z.ln()?)?.exp()?
        };
        Ok(res.limit_precision(precision))
    }
}

impl Display for Apcomplex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.re, self.im)
    }
}

#[test]
fn test_parse() {
    let z = Apcomplex::parse("(-1.23400000000000000, -5.67800000000000000)")
        .unwrap();
    assert_eq!(z.re().precision(), 18);
    assert_eq!(z.im().precision(), 18);
    assert_eq!(z.precision(), 18);
    assert_eq!(z.re().to_f64(), -1.234);
    assert_eq!(z.im().to_f64(), -5.678);

    let z = Apcomplex::parse("10.00000000000000").unwrap();
    assert!(z.is_real());
    assert!(z.im().is_exact());
    assert_eq!(z.precision(), 16);

    let z = Apcomplex::parse(" (2.5) ").unwrap();
    assert!(z.is_real());
    assert_eq!(z.to_string(), "(2.5, 0)");

    let z = Apcomplex::parse("(1,2)").unwrap();
    assert_eq!(z.to_string(), "(1, 2)");

    fn kind(s: &str) -> Option<ParseErrorKind> {
        match Apcomplex::parse(s) {
            Err(Error::Parse { kind, .. }) => Some(kind),
            _ => None,
        }
    }
    assert_eq!(kind("(1, 2"), Some(ParseErrorKind::MalformedComplex));
    assert_eq!(kind("(1, 2, 3)"), Some(ParseErrorKind::MalformedComplex));
    assert_eq!(kind("(1, )"), Some(ParseErrorKind::InputEmpty));
    assert_eq!(kind("(1, x)"), Some(ParseErrorKind::InvalidDigit));
    assert_eq!(kind("1, 2)"), Some(ParseErrorKind::InvalidDigit));
}

#[test]
fn test_arithmetic() {
    let p = |s| Apcomplex::parse(s).unwrap();
    let a = p("(1.0000000000, 2.0000000000)");
    let b = p("(3.0000000000, -4.0000000000)");

    assert_eq!(a.add(&b).unwrap().to_string(), "(4, -2)");
    assert_eq!(a.sub(&b).unwrap().to_string(), "(-2, 6)");
    assert_eq!(a.mul(&b).unwrap().to_string(), "(11, 2)");
    // mp.mpc(1, 2) / mp.mpc(3, -4)
    assert_eq!(a.div(&b).unwrap().to_string(), "(-0.2, 0.4)");
    assert_eq!(a.neg().to_string(), "(-1, -2)");
    assert_eq!(a.conj().to_string(), "(1, -2)");
    assert_eq!(b.abs().unwrap().to_string(), "5");
    assert!(matches!(
        a.div(&Apcomplex::zero(Radix::DECIMAL)),
        Err(Error::Domain { .. })
    ));

    let bin = Apcomplex::parse_radix("(1.1, 1)", Radix::new(2).unwrap());
    assert!(matches!(
        a.add(&bin.unwrap()),
        Err(Error::RadixMismatch { left: 10, right: 2 })
    ));
}

#[test]
fn test_ln_exp() {
    let p = |s| Apcomplex::parse(s).unwrap();

    // mp.log(-1)
    let r = p("-1.00000000000000000000").ln().unwrap();
    assert!(r.re().is_zero());
    assert_eq!(r.im().to_string(), "3.14159265358979323846");

    // mp.log(mp.mpc(3, -4))
    let r = p("(3.000000000000000000, -4.000000000000000000)").ln().unwrap();
    assert_eq!(r.re().to_string(), "1.609437912434100375");
    assert_eq!(r.im().to_string(), "-0.9272952180016122324");

    // mp.exp(mp.mpc(1, 2))
    let r = p("(1.000000000000000000, 2.000000000000000000)").exp().unwrap();
    assert_eq!(r.re().to_string(), "-1.131204383756813638");
    assert_eq!(r.im().to_string(), "2.471726672004818928");

    // The argument is in (-pi, pi].
    let r = p("(-1.0000000000, -0.0000000000)").arg().unwrap();
    assert_eq!(r.to_string(), "3.1415926536");
    let r = p("(-1.0000000000, -1.0000000000)").arg().unwrap();
    assert_eq!(r.to_string(), "-2.3561944902");

    assert!(matches!(
        Apcomplex::zero(Radix::DECIMAL).ln(),
        Err(Error::Domain { .. })
    ));
}

#[test]
fn test_pow() {
    let p = |s| Apcomplex::parse(s).unwrap();
    let d = Radix::DECIMAL;

    // mp.power(mp.mpc(10, 0), mp.mpc(1.234, 5.678))
    let r = p("10.00000000000000000000")
        .pow(&p("(1.234000000000000000000, 5.678000000000000000000)"))
        .unwrap();
    assert_eq!(r.precision(), 22);
    assert_eq!(r.re().to_string(), "14.97761026698255219793");
    assert_eq!(r.im().to_string(), "8.332836005018454790993");

    // mp.power(mp.mpc(0, 1), mp.mpc(0, 1))
    let i = p("(0, 1.000000000000000000)");
    let r = i.pow(&i).unwrap();
    assert_eq!(r.re().to_string(), "0.2078795763507619085");
    assert!(r.im().is_zero() || r.im().to_f64().abs() < 1e-30);

    // mp.power(mp.mpc(2, 3), mp.mpc(0.5, -1.5))
    let r = p("(2.000000000000000000, 3.000000000000000000)")
        .pow(&p("(0.5000000000000000000, -1.500000000000000000)"))
        .unwrap();
    assert_eq!(r.re().to_string(), "1.144775776300734479");
    assert_eq!(r.im().to_string(), "-8.2137419796407826");

    // Exact integer powers use repeated multiplication.
    let z = p("(1.000000000, 1.000000000)");
    let r = z.pow(&Apcomplex::from_real(Apfloat::from_i64(10, d))).unwrap();
    assert!(r.re().is_zero());
    assert_eq!(r.im().to_string(), "32");
    assert_eq!(r.precision(), 10);
    let r = z.pow(&Apcomplex::from_real(Apfloat::from_i64(-3, d))).unwrap();
    assert_eq!(r.to_string(), "(-0.25, -0.25)");
    let z = Apcomplex::new(
        Apfloat::from_i64(3, d),
        Apfloat::from_i64(-1, d),
    )
    .unwrap();
    let r = z.pow(&Apcomplex::from_real(Apfloat::from_i64(3, d))).unwrap();
    assert!(r.re().is_exact() && r.im().is_exact());
    assert_eq!(r.to_string(), "(18, -26)");

    // Positive real bases with real exponents stay real.
    let r = p("10.00000000000000").pow(&p("-1.23400000000000000")).unwrap();
    assert!(r.is_real());
    assert_eq!(r.re().to_string(), "0.05834451042737447");

    let zero = Apcomplex::zero(d);
    assert!(zero.pow(&p("(2.5, -1.0)")).unwrap().is_zero());
    assert!(matches!(zero.pow(&p("(-2.5, 1.0)")), Err(Error::Domain { .. })));
    assert!(matches!(zero.pow(&p("(0, 1.0)")), Err(Error::Domain { .. })));
    assert_eq!(z.pow(&zero).unwrap().to_string(), "(1, 0)");
}

#[test]
fn test_pow_branches() {
    let p = |s| Apcomplex::parse(s).unwrap();
    let base = p("10.00000000000000");

    // A real exponent with a zero imaginary part takes the real power.
    let r = base.pow(&p("(2.00000000000000000, 0)")).unwrap();
    assert!(r.is_real());
    assert_eq!(r.precision(), 16);
    assert_eq!(r.to_string(), "(100, 0)");

    // An exact base takes the precision of the exponent.
    // mp.power(10, mp.mpc(-1.234, -5.678))
    let exact = Apcomplex::from_real(Apfloat::from_i64(10, Radix::DECIMAL));
    let w = p("(-1.23400000000000000, -5.67800000000000000)");
    let r = exact.pow(&w).unwrap();
    assert_eq!(r.precision(), 18);
    assert_eq!(
        r.to_string(),
        "(0.0509850119703065512, -0.0283656561954365251)"
    );

    // Negative bases go through exp(w ln(z)) on the principal branch.
    // mp.power(-2, mp.mpc(1.5, -0.25))
    let r = p("-2.000000000000000000")
        .pow(&p("(1.500000000000000000, -0.2500000000000000000)"))
        .unwrap();
    assert_eq!(r.precision(), 19);
    assert_eq!(r.re().to_string(), "-1.069618362858568532");
    assert_eq!(r.im().to_string(), "-6.110624813025143411");

    // mp.power(-10, 0.5)
    let r = p("-10.00000000000000").pow(&p("0.5000000000000000")).unwrap();
    assert!(r.re().is_zero());
    assert_eq!(r.to_string(), "(0, 3.162277660168379)");
}

#[test]
fn test_pow_inverse() {
    // z^w * z^-w = 1, to the precision of the operands.
    let p = |s| Apcomplex::parse(s).unwrap();
    let z = p("10.00000000000000");
    let w = p("(-1.23400000000000000, -5.67800000000000000)");
    let r = z.pow(&w).unwrap().mul(&z.pow(&w.neg()).unwrap()).unwrap();
    assert!((r.re().to_f64() - 1.).abs() < 1e-14);
    assert!(r.im().to_f64().abs() < 1e-14);
}
