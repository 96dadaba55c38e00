//! Sine, cosine and the arc tangent.

use crate::bigint::BigInt;
use crate::float::Float;
use crate::RoundingMode;

impl Float {
    /// Sums sin(x) = x - x^3/3! + x^5/5! - ... and
    /// cos(x) = 1 - x^2/2! + x^4/4! - ... in one loop, which ends when
    /// neither sum changes.
    fn sin_cos_taylor(x: &Self) -> (Self, Self) {
        use RoundingMode::None as rm;
        let sem = x.get_semantics();
        let x2 = Float::mul_with_rm(x, x, rm);

        let mut neg = false;
        let mut top_sin = x.clone();
        let mut top_cos = Self::one(sem, false);
        let mut bottom_sin = BigInt::one();
        let mut bottom_cos = BigInt::one();
        let mut sin = Self::zero(sem, false);
        let mut cos = Self::zero(sem, false);
        for i in 1_u64.. {
            let prev_sin = sin.clone();
            let prev_cos = cos.clone();

            let elem_sin = Float::div_with_rm(
                &top_sin,
                &Self::from_bigint(sem, bottom_sin.clone()),
                rm,
            );
            let elem_cos = Float::div_with_rm(
                &top_cos,
                &Self::from_bigint(sem, bottom_cos.clone()),
                rm,
            );
            if neg {
                sin = Float::sub_with_rm(&sin, &elem_sin, rm);
                cos = Float::sub_with_rm(&cos, &elem_cos, rm);
            } else {
                sin = Float::add_with_rm(&sin, &elem_sin, rm);
                cos = Float::add_with_rm(&cos, &elem_cos, rm);
            }

            if prev_sin == sin && prev_cos == cos {
                break;
            }

            top_sin = Float::mul_with_rm(&top_sin, &x2, rm);
            top_cos = Float::mul_with_rm(&top_cos, &x2, rm);
            bottom_sin *= BigInt::from_u64((i * 2) * (i * 2 + 1));
            bottom_cos *= BigInt::from_u64((i * 2 - 1) * (i * 2));
            neg ^= true;
        }

        (sin, cos)
    }

    /// Computes sin and cos of a small 'x' by evaluating the series at
    /// x/2^steps, and then doubling the angle `steps` times:
    /// sin(2x) = 2sin(x)cos(x)
    /// cos(2x) = 1 - 2sin(x)^2
    fn sin_cos_halving_reduction(x: &Self, steps: usize) -> (Self, Self) {
        use RoundingMode::None as rm;
        let one = Self::one(x.get_semantics(), false);
        let sx = x.scale(-(steps as i64), rm);
        let (mut sin, mut cos) = Self::sin_cos_taylor(&sx);
        for _ in 0..steps {
            let sin2 = Float::mul_with_rm(&sin, &sin, rm);
            let next_cos = Float::sub_with_rm(&one, &sin2.scale(1, rm), rm);
            sin = Float::mul_with_rm(&sin, &cos, rm).scale(1, rm);
            cos = next_cos;
        }
        (sin, cos)
    }

    /// Computes the sine and the cosine of the number (in radians). The
    /// argument is reduced to x = q * pi/2 + r, with |r| <= pi/4, and the
    /// quadrant q selects the signs and the order of the results.
    pub fn sin_cos(&self) -> (Self, Self) {
        use RoundingMode::None as rm;
        let orig_sem = self.get_semantics();

        if self.is_nan() || self.is_inf() {
            let nan = Self::nan(orig_sem, self.get_sign());
            return (nan.clone(), nan);
        } else if self.is_zero() {
            return (self.clone(), Self::one(orig_sem, false));
        }

        // Subtracting q*pi/2 cancels the top bits of large arguments, so pi
        // needs extra bits to cover the integer part.
        let extra = self.get_exp().max(0) as usize;
        let sem = orig_sem
            .grow_log(12)
            .increase_exponent(4)
            .increase_precision(extra);
        let x = self.cast_with_rm(sem, rm);

        let half_pi = Self::pi(sem).scale(-1, rm);
        let q = Float::div_with_rm(&x, &half_pi, rm)
            .round_to_integral(RoundingMode::NearestTiesToEven);
        let qx = Float::mul_with_rm(&q, &half_pi, rm);
        let r = Float::sub_with_rm(&x, &qx, rm);

        // The quadrant is q mod 4.
        let quadrant = if q.is_zero() {
            0
        } else {
            let low = q
                .convert_normal_to_integer(RoundingMode::NearestTiesToEven)
                .word(0)
                & 3;
            if q.is_negative() {
                (4 - low) & 3
            } else {
                low
            }
        };

        let (sin, cos) = if r.is_zero() {
            (Self::zero(sem, false), Self::one(sem, false))
        } else {
            Self::sin_cos_halving_reduction(&r, orig_sem.log_precision())
        };

        let (sin, cos) = match quadrant {
            0 => (sin, cos),
            1 => (cos, sin.neg()),
            2 => (sin.neg(), cos.neg()),
            _ => (cos.neg(), sin),
        };
        (sin.cast(orig_sem), cos.cast(orig_sem))
    }

    /// Computes the sine of the number (in radians).
    pub fn sin(&self) -> Self {
        self.sin_cos().0
    }

    /// Computes the cosine of the number (in radians).
    pub fn cos(&self) -> Self {
        self.sin_cos().1
    }
}

/// Compares a function with its native f64 counterpart on `values`,
/// including the sign of zero results.
#[cfg(test)]
fn check_against_native(
    values: impl Iterator<Item = f64>,
    soft: fn(&Float) -> Float,
    native: fn(f64) -> f64,
) {
    for v in values {
        let expected = native(v);
        let got = soft(&Float::from_f64(v)).as_f64();
        if expected.is_nan() {
            assert!(got.is_nan(), "{v}");
        } else {
            assert_eq!(got, expected, "{v}");
            assert_eq!(got.is_sign_negative(), expected.is_sign_negative());
        }
    }
}

#[cfg(test)]
fn non_normal_values() -> impl Iterator<Item = f64> {
    crate::utils::edge_values().into_iter().filter(|v| !v.is_normal())
}

#[test]
fn test_sin_cos_match_native() {
    let integers = || (-100..100).map(|i| i as f64);
    check_against_native(integers(), Float::sin, f64::sin);
    check_against_native(integers(), Float::cos, f64::cos);
    let hundredths = |n: i32| (-n..n).map(|i| i as f64 / 100.);
    check_against_native(hundredths(300), Float::sin, f64::sin);
    check_against_native(hundredths(100), Float::cos, f64::cos);
    check_against_native(non_normal_values(), Float::sin, f64::sin);
    check_against_native(non_normal_values(), Float::cos, f64::cos);
}

#[test]
fn test_sin_cos_digits() {
    // mpmath, mp.dps = 100.
    let digits = |v: f64| {
        let (s, c) = Float::from_f64(v).sin_cos();
        (s.to_string(), c.to_string())
    };
    let cases = [
        (801. / 10000., "0.080014373740063358", "0.99679370984922722"),
        (2.3, "0.74570521217672026", "-0.6662760212798241"),
        (90210. / 10000., "0.39289528725423334", "-0.91958321714427427"),
        (95051., "-0.85591982399715028", "0.51710855232599595"),
    ];
    for (v, sin, cos) in cases {
        assert_eq!(digits(v), (sin.to_string(), cos.to_string()), "{v}");
    }

    // mp.dps = 60; mp.sin(1), mp.cos(1)
    use crate::float::Semantics;
    let sem = Semantics::new(32, 200, RoundingMode::NearestTiesToEven);
    let (s, c) = Float::from_u64(sem, 1).sin_cos();
    let sin1 = "0.84147098480789650665250232163029899962256306";
    let cos1 = "0.54030230586813971740093660744297660373231042";
    assert!(s.to_string().starts_with(sin1));
    assert!(c.to_string().starts_with(cos1));
}

#[test]
fn test_sin_cos_quadrants() {
    // Multiples of pi/2 land on the axes.
    use crate::float::Semantics;
    let sem = Semantics::new(32, 120, RoundingMode::NearestTiesToEven);
    let half_pi = Float::pi(sem).scale(-1, RoundingMode::None);
    let axes = [(1, 1., 0.), (2, 0., -1.), (3, -1., 0.), (-1, -1., 0.)];
    for (k, sin, cos) in axes {
        let x = &half_pi * &Float::from_i64(sem, k);
        let (s, c) = x.sin_cos();
        assert!((s.as_f64() - sin).abs() < 1e-30);
        assert!((c.as_f64() - cos).abs() < 1e-30);
    }
}

impl Float {
    /// Sums atan(x) = x - x^3/3 + x^5/5 - ... for a small `x`.
    fn atan_taylor(x: &Self) -> Self {
        use RoundingMode::None as rm;
        let sem = x.get_semantics();
        let x2 = Float::mul_with_rm(x, x, rm);

        // x^(2k + 1)
        let mut power = x.clone();
        let mut sum = Self::zero(sem, false);
        for k in 0_u64.. {
            let odd = Self::from_u64(sem, 2 * k + 1);
            let term = Float::div_with_rm(&power, &odd, rm);
            let next = if k % 2 == 1 {
                Float::sub_with_rm(&sum, &term, rm)
            } else {
                Float::add_with_rm(&sum, &term, rm)
            };
            if next == sum {
                break;
            }
            sum = next;
            power = Float::mul_with_rm(&power, &x2, rm);
        }
        sum
    }

    /// Computes the arc tangent of the number. The result is in the range
    /// [-pi/2, pi/2].
    pub fn atan(&self) -> Self {
        use RoundingMode::None as rm;
        let orig_sem = self.get_semantics();

        if self.is_nan() || self.is_zero() {
            return self.clone();
        } else if self.is_inf() {
            let mut half_pi = Self::pi(orig_sem).scale(-1, rm);
            half_pi.set_sign(self.get_sign());
            return half_pi;
        }

        let sem = orig_sem.grow_log(12).increase_exponent(4);
        let one = Self::one(sem, false);
        let mut x = self.cast_with_rm(sem, rm).abs();

        // atan(x) = pi/2 - atan(1/x)
        let invert = x > one;
        if invert {
            x = Float::div_with_rm(&one, &x, rm);
        }

        // atan(x) = 2 atan(x / (1 + sqrt(1 + x^2)))
        let steps = orig_sem.log_precision();
        for _ in 0..steps {
            let x2 = Float::mul_with_rm(&x, &x, rm);
            let root = Float::add_with_rm(&one, &x2, rm).sqrt();
            let down = Float::add_with_rm(&one, &root, rm);
            x = Float::div_with_rm(&x, &down, rm);
        }

        let mut res = Self::atan_taylor(&x).scale(steps as i64, rm);
        if invert {
            let half_pi = Self::pi(sem).scale(-1, rm);
            res = Float::sub_with_rm(&half_pi, &res, rm);
        }
        if self.is_negative() {
            res = res.neg();
        }
        res.cast(orig_sem)
    }

    /// Computes the angle of the point (x, y), where 'self' is y. The result
    /// is in the range (-pi, pi], and special values follow the 'atan2'
    /// function of the C library.
    pub fn atan2(&self, x: &Self) -> Self {
        use RoundingMode::None as rm;
        let y = self;
        let orig_sem = y.get_semantics();
        let sign = y.get_sign();
        let with_sign = |mut v: Self| {
            v.set_sign(sign);
            v
        };

        if y.is_nan() || x.is_nan() {
            return Self::nan(orig_sem, sign);
        }

        let pi = Self::pi(orig_sem);
        if y.is_inf() {
            let angle = if !x.is_inf() {
                pi.scale(-1, rm)
            } else if x.is_negative() {
                // 3pi/4
                let quarter = Self::pi(orig_sem.grow_log(1)).scale(-2, rm);
                let pi = Self::pi(orig_sem.grow_log(1));
                Float::sub_with_rm(&pi, &quarter, rm).cast(orig_sem)
            } else {
                pi.scale(-2, rm)
            };
            return with_sign(angle);
        }
        if x.is_inf() {
            return if x.is_negative() {
                with_sign(pi)
            } else {
                Self::zero(orig_sem, sign)
            };
        }
        if y.is_zero() {
            return if x.is_negative() {
                with_sign(pi)
            } else {
                y.clone()
            };
        }
        if x.is_zero() {
            return with_sign(pi.scale(-1, rm));
        }

        let sem = orig_sem.grow_log(12).increase_exponent(4);
        let yw = y.cast_with_rm(sem, rm);
        let xw = x.cast_with_rm(sem, rm);
        let t = Float::div_with_rm(&yw, &xw, rm).atan();
        let res = if !x.is_negative() {
            t
        } else if y.is_negative() {
            Float::sub_with_rm(&t, &Self::pi(sem), rm)
        } else {
            Float::add_with_rm(&t, &Self::pi(sem), rm)
        };
        res.cast(orig_sem)
    }
}

#[test]
fn test_atan() {
    let digits = |v: f64| Float::from_f64(v).atan().to_string();
    assert_eq!(digits(0.5), "0.46364760900080609");
    assert_eq!(digits(1.0), "0.78539816339744828");
    assert_eq!(digits(2.0), "1.1071487177940904");
    assert_eq!(digits(10.0), "1.4711276743037347");
    assert_eq!(digits(-3.0), "-1.2490457723982544");
    assert_eq!(digits(0.001), "0.00099999966666686679");

    let tenths = (-100..100).map(|i| i as f64 / 10.);
    check_against_native(tenths, Float::atan, f64::atan);
    check_against_native(non_normal_values(), Float::atan, f64::atan);

    // mp.dps = 60; mp.atan(0.5)
    use crate::float::Semantics;
    let sem = Semantics::new(32, 200, RoundingMode::NearestTiesToEven);
    let half = Float::from_u64(sem, 1).scale(-1, RoundingMode::None);
    let res = half.atan().to_string();
    assert!(res.starts_with("0.46364760900080611621425623146121440202853705"));
}

#[test]
fn test_atan2() {
    fn atan2(y: f64, x: f64) -> f64 {
        Float::from_f64(y).atan2(&Float::from_f64(x)).as_f64()
    }

    fn atan2_str(y: f64, x: f64) -> String {
        Float::from_f64(y).atan2(&Float::from_f64(x)).to_string()
    }

    // mp.atan2(y, x)
    assert_eq!(atan2_str(1., -1.), "2.3561944901923448");
    assert_eq!(atan2_str(-1., -1.), "-2.3561944901923448");
    assert_eq!(atan2_str(0.5, 2.), "0.24497866312686414");
    assert_eq!(atan2_str(3., -0.25), "1.6539375586833378");

    for y in -5..=5 {
        for x in -5..=5 {
            let (y, x) = (y as f64, x as f64);
            assert_eq!(atan2(y, x), y.atan2(x));
        }
    }

    // The IEEE special cases.
    let inf = f64::INFINITY;
    for (y, x) in [
        (inf, inf),
        (inf, -inf),
        (-inf, inf),
        (-inf, -inf),
        (inf, 1.),
        (1., inf),
        (1., -inf),
        (-1., -inf),
        (0., -1.),
        (-0., -1.),
        (0., -0.),
        (-0., 0.),
        (2., 0.),
        (-2., -0.),
    ] {
        let r0 = y.atan2(x);
        let r1 = atan2(y, x);
        assert_eq!(r0, r1);
        assert_eq!(r0.is_sign_negative(), r1.is_sign_negative());
    }
    assert!(atan2(f64::NAN, 1.).is_nan());
    assert!(atan2(1., f64::NAN).is_nan());
}
