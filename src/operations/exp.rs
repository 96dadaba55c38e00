//! The natural logarithm and the exponential function.

use crate::bigint::BigInt;
use crate::float::Float;
use crate::RoundingMode;

impl Float {
    /// Returns ln(x) = 2 atanh(z) with z = (x - 1) / (x + 1), summing
    /// atanh(z) = z + z^3/3 + z^5/5 + ... The series is short when `x` is
    /// close to one.
    fn log_atanh_series(x: &Self) -> Self {
        use RoundingMode::None as rm;
        let sem = x.get_semantics();
        let one = Self::one(sem, false);
        let num = Float::sub_with_rm(x, &one, rm);
        let den = Float::add_with_rm(x, &one, rm);
        let z = Float::div_with_rm(&num, &den, rm);
        let z2 = Float::mul_with_rm(&z, &z, rm);

        // z^(2k + 1)
        let mut power = z;
        let mut sum = Self::zero(sem, false);
        for k in 0_u64.. {
            let odd = Self::from_u64(sem, 2 * k + 1);
            let term = Float::div_with_rm(&power, &odd, rm);
            let next = Float::add_with_rm(&sum, &term, rm);
            if next == sum {
                break;
            }
            sum = next;
            power = Float::mul_with_rm(&power, &z2, rm);
        }
        sum.scale(1, rm)
    }

    /// Computes the natural logarithm. The number is split into m * 2^e
    /// with m in [2/3, 4/3]. Then ln(m) comes from the atanh series after
    /// a few square roots, since ln(m) = 2^s ln(m^(1/2^s)), and e ln(2) is
    /// added back.
    pub fn log(&self) -> Self {
        use RoundingMode::None as rm;
        let orig_sem = self.get_semantics();

        if self.is_nan() || (self.is_negative() && !self.is_zero()) {
            return Self::nan(orig_sem, self.get_sign());
        } else if self.is_zero() {
            return Self::inf(orig_sem, true);
        } else if self.is_inf() {
            return self.clone();
        }

        let sem = orig_sem.grow_log(10).increase_exponent(10);
        let x = self.cast_with_rm(sem, rm);

        let mut e = x.get_exp();
        let mut m = Self::from_parts(sem, false, 0, x.get_mantissa());
        let four = Self::from_u64(sem, 4);
        let three = Self::from_u64(sem, 3);
        if m > Float::div_with_rm(&four, &three, rm) {
            m = m.scale(-1, rm);
            e += 1;
        }

        let roots = orig_sem.log_precision();
        for _ in 0..roots {
            m = m.sqrt();
        }
        let mut res = Self::log_atanh_series(&m).scale(roots as i64, rm);
        if e != 0 {
            let e = Self::from_i64(sem, e);
            let shift = Float::mul_with_rm(&e, &Self::ln2(sem), rm);
            res = Float::add_with_rm(&res, &shift, rm);
        }
        res.cast(orig_sem)
    }

    /// Sums exp(x) = 1 + x + x^2/2! + x^3/3! + ... for a small `x`.
    fn exp_taylor(x: &Self) -> Self {
        let sem = x.get_semantics();
        let mut power = Self::one(sem, false);
        let mut factorial = BigInt::one();
        let mut sum = Self::zero(sem, false);
        for k in 1_u64.. {
            let term = &power / &Self::from_bigint(sem, factorial.clone());
            let next = &sum + &term;
            if next == sum {
                break;
            }
            sum = next;
            factorial *= BigInt::from_u64(k);
            power = &power * x;
        }
        sum
    }

    /// Computes e^self. The argument is split into k ln(2) + r with
    /// |r| <= ln(2)/2, and e^r is the square of e^(r/2) repeated a few
    /// times, so the series only sees a tiny argument. The result is
    /// 2^k e^r.
    pub fn exp(&self) -> Self {
        use RoundingMode::None as rm;
        let orig_sem = self.get_semantics();

        if self.is_zero() {
            return Self::one(orig_sem, false);
        } else if self.is_nan() {
            return Self::nan(orig_sem, self.get_sign());
        } else if self.is_inf() {
            return if self.is_negative() {
                Self::zero(orig_sem, false)
            } else {
                self.clone()
            };
        }

        // Beyond 2^63 the result is out of any exponent range.
        if self.get_exp() > 62 {
            return if self.is_negative() {
                Self::zero(orig_sem, false)
            } else {
                Self::inf(orig_sem, false)
            };
        }

        let sem = orig_sem.grow_log(10).increase_exponent(10);
        let x = self.cast_with_rm(sem, rm);
        let k = Float::div_with_rm(&x, &Self::ln2(sem), rm)
            .to_i64(RoundingMode::NearestTiesToEven);

        // x - k ln(2) cancels the top bits of x, so the product is formed
        // with as many more bits as k has.
        let k_bits = (u64::BITS - k.unsigned_abs().leading_zeros()) as usize;
        let wide = sem.increase_precision(k_bits);
        let k_ln2 =
            Float::mul_with_rm(&Self::from_i64(wide, k), &Self::ln2(wide), rm);
        let r = Float::sub_with_rm(&x.cast(wide), &k_ln2, rm)
            .cast_with_rm(sem, rm);

        let halvings = orig_sem.log_precision();
        let mut res = Self::exp_taylor(&r.scale(-(halvings as i64), rm));
        for _ in 0..halvings {
            res = Float::mul_with_rm(&res, &res, rm);
        }
        res.scale(k, rm).cast(orig_sem)
    }
}

#[test]
fn test_log_matches_native() {
    use crate::float::FP128;
    let values = [
        0.1, 0.5, 0.999, 1.001, 2.3, 4.5, 9.8, 11.2, 15.2, 91.2, 102.2, 192.4,
        1024.2, 90210.2, 1e-300, 1e300,
    ];
    for v in values {
        let wide = Float::from_f64(v).cast(FP128).log();
        assert_eq!(wide.as_f64(), v.ln(), "ln({v})");
    }
    let x = Float::from_f64(0.1).cast(FP128).log();
    assert_eq!(x.as_f64(), -2.3025850929940455);
}

#[test]
fn test_log_special_values() {
    assert!(Float::from_f64(1.0).log().is_zero());
    assert!(Float::from_f64(-1.0).log().is_nan());
    assert!(Float::from_f64(f64::NAN).log().is_nan());
    assert_eq!(Float::from_f64(0.0).log().as_f64(), f64::NEG_INFINITY);
    assert_eq!(Float::from_f64(-0.0).log().as_f64(), f64::NEG_INFINITY);
    assert_eq!(Float::from_f64(f64::INFINITY).log().as_f64(), f64::INFINITY);
}

#[test]
fn test_log_wide() {
    use crate::float::Semantics;
    // mpmath: mp.dps = 50; mp.log(10)
    let sem = Semantics::new(32, 200, RoundingMode::NearestTiesToEven);
    let res = Float::from_u64(sem, 10).log().to_string();
    assert!(res.starts_with("2.302585092994045684017991454684364207601"));
}

#[test]
fn test_exp_matches_native() {
    let values = [
        0.000003, 0.001, 0.12, 0.13, 0.5, 1.2, 2.3, 4.5, 9.8, 5.0, 11.2, 15.2,
        25.0, 34.001, 54., 89.1, 91.2, 102.2, 150., 192.4, 212., 256., 102.3,
        -0.5, -1.2, -25.0, -150., -700.,
    ];
    for v in values {
        assert_eq!(Float::from_f64(v).exp().as_f64(), v.exp(), "exp({v})");
    }
    assert_eq!(Float::from_f64(2.51).exp().as_f64(), 12.30493006051041);
}

#[test]
fn test_exp_out_of_range() {
    assert_eq!(Float::from_f64(1000.).exp().as_f64(), f64::INFINITY);
    assert_eq!(Float::from_f64(-1000.).exp().as_f64(), 0.);
    assert_eq!(Float::from_f64(f64::NEG_INFINITY).exp().as_f64(), 0.);
    assert_eq!(Float::from_f64(1e300).exp().as_f64(), f64::INFINITY);
    assert_eq!(Float::from_f64(-1e300).exp().as_f64(), 0.);
}

#[test]
fn test_exp_log_identity() {
    use crate::float::Semantics;
    let sem = Semantics::new(32, 150, RoundingMode::NearestTiesToEven);
    for v in [0.25, 3.0, 17.5, 1234.5] {
        let x = Float::from_f64(v).cast(sem);
        let diff = (&x.log().exp() - &x).abs();
        // Only the last few bits may differ.
        assert!(diff.is_zero() || diff.get_exp() < x.get_exp() - 140);
    }
}
