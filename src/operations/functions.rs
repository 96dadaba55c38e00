//! Integer powers, square roots, binary scaling and the real power.

use crate::bigint::LossFraction;
use crate::float::Float;
use crate::RoundingMode;

impl Float {
    /// Computes `self^n` by binary exponentiation: square once per bit of
    /// `n`, and multiply the squares of the set bits into the result.
    pub fn powi(&self, n: u64) -> Self {
        let sem = self.get_semantics().increase_precision(2);
        let mut acc = Self::one(sem, false);
        let mut square = self.cast(sem);
        let mut bits = n;
        while bits != 0 {
            if bits & 1 == 1 {
                acc *= &square;
            }
            bits >>= 1;
            if bits != 0 {
                square = &square * &square;
            }
        }
        acc.cast(self.get_semantics())
    }

    pub fn sqr(&self) -> Self {
        self * self
    }

    /// Computes the square root with Newton's iteration x' = (x + a/x) / 2.
    /// The iteration starts above the root and decreases until it stops
    /// making progress.
    pub fn sqrt(&self) -> Self {
        let orig_sem = self.get_semantics();
        if self.is_zero() || (self.is_inf() && !self.is_negative()) {
            return self.clone();
        } else if self.is_nan() || self.is_negative() {
            return Self::nan(orig_sem, self.get_sign());
        }

        let sem = orig_sem.increase_precision(16);
        let a = self.cast(sem);
        // 2^(e/2 + 1) is above the root of any number below 2^(e + 1).
        let above = a.get_exp().div_euclid(2) + 1;
        let mut x = Self::one(sem, false).scale(above, RoundingMode::None);
        loop {
            let sum = &x + &(&a / &x);
            let next = sum.scale(-1, RoundingMode::NearestTiesToEven);
            if next >= x {
                return x.cast(orig_sem);
            }
            x = next;
        }
    }

    pub fn abs(&self) -> Self {
        let mut x = self.clone();
        x.set_sign(false);
        x
    }

    /// Multiplies the number by 2^`scale`, like `scalbln` in C.
    pub fn scale(&self, scale: i64, rm: RoundingMode) -> Self {
        if !self.is_normal() {
            return self.clone();
        }
        let mut r = Self::from_parts(
            self.get_semantics(),
            self.get_sign(),
            self.get_exp() + scale,
            self.get_mantissa(),
        );
        r.normalize(rm, LossFraction::ExactlyZero);
        r
    }

    /// Computes `self^n` for a non-negative base, as e^(n * ln(self)). The
    /// special values follow C's `pow`, except that negative bases give NaN.
    pub fn pow(&self, n: &Float) -> Self {
        let orig_sem = self.get_semantics();
        debug_assert_eq!(
            orig_sem.get_precision(),
            n.get_semantics().get_precision()
        );
        let sign = self.get_sign();

        if n.is_zero() || *self == Self::one(orig_sem, false) {
            return Self::one(orig_sem, false);
        } else if n.is_inf() || n.is_nan() {
            return Self::nan(orig_sem, sign);
        } else if self.is_zero() {
            return if n.is_negative() {
                Self::inf(orig_sem, sign)
            } else {
                Self::zero(orig_sem, sign)
            };
        } else if self.is_negative() || !self.is_normal() {
            return Self::nan(orig_sem, sign);
        }

        // The product n*ln(x) may be large, and its error grows with it.
        let sem = orig_sem.grow_log(10).increase_exponent(10);
        let ln = self.cast(sem).log();
        let exponent =
            Float::mul_with_rm(&n.cast(sem), &ln, RoundingMode::None);
        exponent.exp().cast(orig_sem)
    }
}

#[test]
fn test_powi() {
    use crate::FP64;
    let two = Float::from_u64(FP64, 2);
    for n in 0..64 {
        assert_eq!(two.powi(n).as_f64(), 2f64.powi(n as i32));
    }
    assert_eq!(Float::from_f64(10.).powi(22).as_f64(), 1e22);
    assert_eq!(Float::from_f64(-3.).powi(5).as_f64(), -243.);
    assert_eq!(Float::from_f64(0.5).powi(70).as_f64(), 2f64.powi(-70));
    assert!(Float::from_f64(1e10).powi(40).is_inf());
    assert_eq!(Float::from_f64(1.5).sqr().as_f64(), 2.25);
}

#[test]
fn test_sqrt() {
    use crate::utils;
    use crate::FP64;

    for i in 0..300u64 {
        let square = Float::from_u64(FP64, i * i);
        assert_eq!(square.sqrt().as_f64(), i as f64);
    }

    for v in utils::edge_values() {
        let expected = v.sqrt();
        let r = Float::from_f64(v).sqrt();
        assert_eq!(r.is_nan(), expected.is_nan());
        if !expected.is_nan() {
            assert_eq!(r.as_f64(), expected);
        }
    }

    // mpmath, rounded to f64.
    let cases = [
        (1.5, 1.224744871391589),
        (2.3, 1.51657508881031),
        (1049.3, 32.39290045673589),
        (0.0009530162965786716, 0.030870962028719993),
        (1e300, 1e150),
        (3e-300, 1.7320508075688775e-150),
    ];
    for (v, root) in cases {
        assert_eq!(Float::from_f64(v).sqrt().as_f64(), root);
    }
}

#[test]
fn test_abs_and_scale() {
    use crate::utils;
    use crate::FP64;

    for v in utils::edge_values() {
        if !v.is_nan() {
            assert_eq!(Float::from_f64(v).abs().as_f64(), v.abs());
        }
    }

    let rm = RoundingMode::None;
    let three = Float::from_u64(FP64, 3);
    assert_eq!(three.scale(4, rm).as_f64(), 48.);
    assert_eq!(three.scale(-2, rm).as_f64(), 0.75);
    assert!(three.scale(2000, rm).is_inf());
    assert!(three.scale(-2000, rm).is_zero());
}

#[test]
fn test_pow() {
    // Integral powers of small integers are exact in f64.
    for base in 0..25 {
        for n in -8..12 {
            let (b, n) = (base as f64, n as f64);
            let r = Float::from_f64(b).pow(&Float::from_f64(n));
            assert_eq!(r.as_f64(), b.powf(n));
        }
    }

    // mpmath, rounded to f64.
    let cases = [
        (10., -1.234, 0.05834451042737448),
        (1.5, 2.5, 2.7556759606310752),
        (2., 1. / 3., 1.2599210498948732),
        (0.94, 13., 0.44736509592539786),
        (0.11, -8., 46650738.02097334),
        (40., 3.1, 92552.03517388321),
    ];
    for (x, n, expected) in cases {
        let r = Float::from_f64(x).pow(&Float::from_f64(n));
        assert_eq!(r.as_f64(), expected);
    }

    let pow = |x: f64, n: f64| Float::from_f64(x).pow(&Float::from_f64(n));
    assert!(pow(-2., 0.5).is_nan());
    assert!(pow(0., -1.).is_inf());
    assert!(pow(0., 3.).is_zero());
    assert_eq!(pow(f64::NAN, 0.).as_f64(), 1.);
}
