//! Conversions between floats of different semantics, native f64 values and
//! integers.

use super::bigint::BigInt;
use super::bigint::LossFraction;
use super::float::{self, Category};
use super::float::{Float, RoundingMode, Semantics, FP64};
use super::utils::low_mask;

impl Float {
    /// Loads the integer `val`. Values wider than the significand are
    /// rounded with the rounding mode of `sem`.
    pub fn from_u64(sem: Semantics, val: u64) -> Self {
        Self::from_bigint(sem, BigInt::from_u64(val))
    }

    /// Loads the big integer `val`, rounding it with the rounding mode of
    /// `sem` when it does not fit.
    pub fn from_bigint(sem: Semantics, val: BigInt) -> Self {
        // The lsb of the mantissa has the weight 2^0.
        let lsb_exp = sem.get_mantissa_len() as i64;
        let mut a = Self::from_parts(sem, false, lsb_exp, val);
        a.normalize(sem.get_rounding_mode(), LossFraction::ExactlyZero);
        a
    }

    /// Loads the signed integer `val`.
    pub fn from_i64(sem: Semantics, val: i64) -> Self {
        let mut a = Self::from_u64(sem, val.unsigned_abs());
        a.set_sign(val < 0);
        a
    }

    /// Returns the integral part, rounded with `rm`. Infinities saturate
    /// and NaN is zero.
    pub fn to_i64(&self, rm: RoundingMode) -> i64 {
        match self.get_category() {
            Category::NaN | Category::Zero => 0,
            Category::Infinity if self.get_sign() => i64::MIN,
            Category::Infinity => i64::MAX,
            Category::Normal => {
                let magnitude = self.convert_normal_to_integer(rm).as_u64();
                if self.get_sign() {
                    (magnitude as i64).wrapping_neg()
                } else {
                    magnitude as i64
                }
            }
        }
    }

    /// Drops the fractional part of the number.
    pub fn trunc(&self) -> Self {
        if !self.is_normal() {
            return self.clone();
        }
        let exp = self.get_exp();
        let fraction_bits = self.get_mantissa_len() as i64 - exp;
        if fraction_bits <= 0 {
            return self.clone();
        } else if exp < 0 {
            return Self::zero(self.get_semantics(), self.get_sign());
        }

        let mut m = self.get_mantissa();
        m.shift_right(fraction_bits as usize);
        m.shift_left(fraction_bits as usize);
        Self::from_parts(self.get_semantics(), self.get_sign(), exp, m)
    }

    /// Returns the magnitude of this normal float as an integer, rounded with
    /// the rounding mode `rm`.
    pub(crate) fn convert_normal_to_integer(&self, rm: RoundingMode) -> BigInt {
        // The weight of the lowest mantissa bit.
        let lsb_exp = self.get_exp() - self.get_mantissa_len() as i64;
        if lsb_exp >= 0 {
            let mut m = self.get_mantissa();
            m.shift_left(lsb_exp as usize);
            return m;
        }

        let (mut m, loss) = float::shift_right_with_loss(
            &self.get_mantissa(),
            lsb_exp.unsigned_abs() as usize,
        );
        // Treat the integer as a mantissa and ask the rounding logic
        // whether it needs an increment.
        let integer = Self::raw(
            self.get_semantics(),
            self.get_sign(),
            0,
            m.clone(),
            Category::Normal,
        );
        if integer.need_round_away_from_zero(rm, loss) {
            m.inplace_add(&BigInt::one());
        }
        m
    }

    /// Rounds this float to an integral value, using the rounding mode `rm`.
    pub fn round_to_integral(&self, rm: RoundingMode) -> Self {
        if !self.is_normal() {
            return self.clone();
        }
        let sem = self.get_semantics();
        let mut r = Self::from_bigint(sem, self.convert_normal_to_integer(rm));
        r.set_sign(self.get_sign());
        r
    }

    /// Cast to another float using the rounding mode `rm`.
    pub fn cast_with_rm(&self, to: Semantics, rm: RoundingMode) -> Float {
        // Keep the value: re-express the exponent for the new mantissa width.
        let width_change =
            self.get_mantissa_len() as i64 - to.get_mantissa_len() as i64;
        let mut x = Float::raw(
            to,
            self.get_sign(),
            self.get_exp() - width_change,
            self.get_mantissa(),
            self.get_category(),
        );
        x.normalize(rm, LossFraction::ExactlyZero);
        x
    }

    /// Convert from one float format to another, using the rounding mode of
    /// the target semantics.
    pub fn cast(&self, to: Semantics) -> Float {
        self.cast_with_rm(to, to.get_rounding_mode())
    }

    /// Returns the value rounded to the nearest f64.
    pub fn as_f64(&self) -> f64 {
        let x = self.cast(FP64);
        let mantissa_len = FP64.get_mantissa_len();
        let all_ones = low_mask(FP64.get_exponent_len());
        let (biased_exp, fraction) = match x.get_category() {
            Category::Zero => (0, 0),
            Category::Infinity => (all_ones, 0),
            // A quiet NaN.
            Category::NaN => (all_ones, 1 << (mantissa_len - 1)),
            Category::Normal => {
                let m = x.get_mantissa().as_u64();
                let biased = (x.get_exp() + FP64.get_bias()) as u64;
                debug_assert!(biased > 0);
                // At the bottom of the range, a missing integer bit marks a
                // subnormal.
                let biased = if biased == 1 && m >> mantissa_len == 0 {
                    0
                } else {
                    biased
                };
                (biased, m & low_mask(mantissa_len))
            }
        };
        let sign = (x.get_sign() as u64) << 63;
        f64::from_bits(sign | (biased_exp << mantissa_len) | fraction)
    }

    /// Loads a native f64 into a float with FP64 semantics.
    pub fn from_f64(val: f64) -> Self {
        let bits = val.to_bits();
        let mantissa_len = FP64.get_mantissa_len();
        let all_ones = low_mask(FP64.get_exponent_len());
        let sign = bits >> 63 == 1;
        let biased_exp = (bits >> mantissa_len) & all_ones;
        let fraction = bits & low_mask(mantissa_len);

        if biased_exp == all_ones {
            return if fraction == 0 {
                Self::inf(FP64, sign)
            } else {
                Self::nan(FP64, sign)
            };
        }
        // Subnormals share the lowest exponent, without the integer bit.
        let bias = FP64.get_bias();
        let (exp, mantissa) = if biased_exp == 0 {
            (1 - bias, fraction)
        } else {
            (biased_exp as i64 - bias, fraction | 1 << mantissa_len)
        };
        Self::from_parts(FP64, sign, exp, BigInt::from_u64(mantissa))
    }
}

#[test]
fn test_to_i64_rounding() {
    use RoundingMode::{NearestTiesToEven, Zero};
    for i in 0..100 {
        assert_eq!(Float::from_f64(i as f64 + 0.75).to_i64(Zero), i);
        assert_eq!(Float::from_f64(-(i as f64) - 0.75).to_i64(Zero), -i);
    }
    for i in 1..64 {
        let big = 3i64 << (i / 2 + 30);
        assert_eq!(Float::from_i64(FP64, big).to_i64(Zero), big);
    }

    let cases = [(2.5, 2), (3.5, 4), (-2.7, -3), (0.49, 0), (-0.5, 0)];
    for (v, expected) in cases {
        assert_eq!(Float::from_f64(v).to_i64(NearestTiesToEven), expected);
    }
    assert_eq!(Float::from_f64(99.99).to_i64(Zero), 99);

    assert_eq!(Float::from_f64(f64::NAN).to_i64(Zero), 0);
    assert_eq!(Float::from_f64(f64::INFINITY).to_i64(Zero), i64::MAX);
    assert_eq!(Float::from_f64(f64::NEG_INFINITY).to_i64(Zero), i64::MIN);
}

#[test]
fn test_round_to_integral() {
    use RoundingMode::NearestTiesToEven;
    let r = Float::from_f64(-7.5).round_to_integral(NearestTiesToEven);
    assert_eq!(r.as_f64(), -8.0);
    let r = Float::from_f64(6.5).round_to_integral(NearestTiesToEven);
    assert_eq!(r.as_f64(), 6.0);
    let r = Float::from_f64(0.25).round_to_integral(NearestTiesToEven);
    assert!(r.is_zero());
}

#[test]
fn test_f64_load_store() {
    use super::utils;
    for v in utils::edge_values() {
        let back = Float::from_f64(v).as_f64();
        assert_eq!(v.is_nan(), back.is_nan());
        assert!(v.is_nan() || back.to_bits() == v.to_bits());
    }

    // Walk the exponent range, including the subnormals.
    for i in 0..(1u64 << 12) {
        let v = f64::from_bits(i << 52 | 0x8_1234_5678_9abc);
        let back = Float::from_f64(v).as_f64();
        assert!(v.is_nan() || back.to_bits() == v.to_bits());
    }
    let tiny = f64::from_bits(1);
    assert!(Float::from_f64(tiny).is_normal());
    assert_eq!(Float::from_f64(tiny).as_f64(), tiny);
}

#[test]
fn test_cast_to_narrow_semantics() {
    // Five exponent bits and eleven significand bits, like binary16.
    let half = Semantics::new(5, 11, RoundingMode::NearestTiesToEven);
    assert_eq!(Float::from_i64(half, 2049).as_f64(), 2048.);
    assert_eq!(Float::from_i64(half, 2051).as_f64(), 2052.);
    assert_eq!(Float::from_i64(half, 65519).as_f64(), 65504.);
    assert_eq!(Float::from_i64(half, 65520).as_f64(), f64::INFINITY);
    assert_eq!(Float::from_i64(half, -70000).as_f64(), f64::NEG_INFINITY);
    assert_eq!(Float::from_f64(0.1).cast(half).as_f64(), 0.0999755859375);

    let inf = Float::from_f64(f64::NEG_INFINITY).cast(half);
    assert!(inf.is_inf() && inf.is_negative());
    assert!(Float::from_f64(f64::NAN).cast(half).is_nan());
}

#[test]
fn test_cast_wide_and_back() {
    use super::utils;
    // Widening is exact, and narrowing back restores the value.
    let wide = Semantics::new(32, 300, RoundingMode::NearestTiesToEven);
    for v in utils::edge_values() {
        let res = Float::from_f64(v).cast(wide).as_f64();
        assert_eq!(v.is_nan(), res.is_nan());
        assert!(v.is_nan() || res.to_bits() == v.to_bits());
    }
    assert_eq!(Float::from_i64(wide, i64::MIN).as_f64(), i64::MIN as f64);
}

#[test]
fn test_trunc() {
    let t = |v: f64| Float::from_f64(v).trunc().as_f64();
    assert_eq!(t(0.4), 0.);
    assert_eq!(t(1.99), 1.);
    assert_eq!(t(-2.4), -2.);
    assert_eq!(t(2.0), 2.);
    assert_eq!(t(1234567.89), 1234567.);
    assert_eq!(t(4503599627370497.), 4503599627370497.);
    assert_eq!(t(-0.001), -0.);
}
