//! Correctly rounded addition, subtraction, multiplication and division of
//! floats, and the operator traits built on them.

use super::bigint::{BigInt, LossFraction};
use super::float::{shift_right_with_loss, Category, Float, RoundingMode};
use core::cmp::Ordering;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign,
};

impl Float {
    /// Adds the magnitudes of two normal numbers. The result has the sign of
    /// `a`. The bits of the smaller operand that fall below the larger one's
    /// significand make the loss.
    fn add_magnitudes(a: &Self, b: &Self) -> (Self, LossFraction) {
        let (mut a, mut b) = (a.clone(), b.clone());
        let gap = a.get_exp() - b.get_exp();
        let loss = match gap.cmp(&0) {
            Ordering::Greater => b.shift_significand_right(gap as u64),
            Ordering::Less => a.shift_significand_right(gap.unsigned_abs()),
            Ordering::Equal => LossFraction::ExactlyZero,
        };
        debug_assert_eq!(a.get_exp(), b.get_exp());
        let sum = a.get_mantissa() + b.get_mantissa();
        let sem = a.get_semantics();
        (Self::from_parts(sem, a.get_sign(), a.get_exp(), sum), loss)
    }

    /// Subtracts the magnitude of `b` from the magnitude of `a`. The result
    /// has the sign of `a`, flipped when `b` is larger, and an exact zero is
    /// positive.
    fn sub_magnitudes(a: &Self, b: &Self) -> (Self, LossFraction) {
        let gap = a.get_exp() - b.get_exp();
        let (mut top, mut low, mut flip) = if gap >= 0 {
            (a.clone(), b.clone(), false)
        } else {
            (b.clone(), a.clone(), true)
        };

        // The top operand moves up one bit, so that the borrow taken for the
        // shifted-out bits cannot underflow it.
        let loss = if gap == 0 {
            LossFraction::ExactlyZero
        } else {
            top.shift_significand_left(1);
            low.shift_significand_right(gap.unsigned_abs() - 1)
        };
        debug_assert_eq!(top.get_exp(), low.get_exp());

        // top - (low + f) = (top - low - 1) + (1 - f) for a fraction f > 0.
        let borrow = BigInt::from_u64(!loss.is_exactly_zero() as u64);
        let (top_m, low_m) = (top.get_mantissa(), low.get_mantissa());
        let diff = if top_m < low_m {
            flip = !flip;
            low_m - top_m - borrow
        } else {
            top_m - low_m - borrow
        };

        let sign = !diff.is_zero() && (a.get_sign() ^ flip);
        let sem = a.get_semantics();
        (Self::from_parts(sem, sign, top.get_exp(), diff), loss.invert())
    }

    /// Computes a+b using the rounding mode `rm`.
    pub fn add_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> Self {
        Self::add_sub(a, b, false, rm)
    }

    /// Computes a-b using the rounding mode `rm`.
    pub fn sub_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> Self {
        Self::add_sub(a, b, true, rm)
    }

    fn add_sub(a: &Self, b: &Self, subtract: bool, rm: RoundingMode) -> Self {
        use Category::{Infinity, NaN, Normal, Zero};
        let sem = a.get_semantics();
        debug_assert_eq!(sem.get_precision(), b.get_semantics().get_precision());
        // The sign that `b` enters the sum with.
        let b_sign = b.get_sign() ^ subtract;

        match (a.get_category(), b.get_category()) {
            (NaN, _) => a.clone(),
            (_, NaN) => Self::nan(sem, b.get_sign()),
            (Infinity, Infinity) if a.get_sign() != b_sign => {
                Self::nan(sem, a.get_sign() ^ b.get_sign())
            }
            (Infinity, _) => a.clone(),
            (_, Infinity) => Self::inf(sem, b_sign),
            (Zero, Zero) => Self::zero(sem, a.get_sign() && b_sign),
            (Normal, Zero) => a.clone(),
            (Zero, Normal) => {
                let mut r = b.clone();
                r.set_sign(b_sign);
                r
            }
            (Normal, Normal) => {
                let (mut r, loss) = if a.get_sign() == b_sign {
                    Self::add_magnitudes(a, b)
                } else {
                    Self::sub_magnitudes(a, b)
                };
                r.normalize(rm, loss);
                r
            }
        }
    }

    /// Computes a*b using the rounding mode `rm`.
    pub fn mul_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> Self {
        use Category::{Infinity, NaN, Normal, Zero};
        let sem = a.get_semantics();
        debug_assert_eq!(sem.get_precision(), b.get_semantics().get_precision());
        let sign = a.get_sign() ^ b.get_sign();

        match (a.get_category(), b.get_category()) {
            (NaN, _) => Self::nan(sem, a.get_sign()),
            (_, NaN) => Self::nan(sem, b.get_sign()),
            (Zero, Infinity) | (Infinity, Zero) => Self::nan(sem, sign),
            (Infinity, _) | (_, Infinity) => Self::inf(sem, sign),
            (Zero, _) | (_, Zero) => Self::zero(sem, sign),
            (Normal, Normal) => {
                let (mut r, loss) = Self::mul_normals(a, b, sign);
                r.normalize(rm, loss);
                r
            }
        }
    }

    /// Multiplies the significands of two normal numbers. The product has up
    /// to twice the precision, and the bits below the precision are the loss.
    fn mul_normals(a: &Self, b: &Self, sign: bool) -> (Self, LossFraction) {
        let sem = a.get_semantics();
        let product = a.get_mantissa() * b.get_mantissa();
        // Each significand carries `mantissa_len` fraction bits.
        let exp = a.get_exp() + b.get_exp() - sem.get_mantissa_len() as i64;

        let excess = product.msb_index().saturating_sub(sem.get_precision());
        let (product, loss) = shift_right_with_loss(&product, excess);
        let exp = exp + excess as i64;
        (Self::from_parts(sem, sign, exp, product), loss)
    }

    /// Computes a/b using the rounding mode `rm`.
    pub fn div_with_rm(a: &Self, b: &Self, rm: RoundingMode) -> Self {
        use Category::{Infinity, NaN, Normal, Zero};
        let sem = a.get_semantics();
        debug_assert_eq!(sem.get_precision(), b.get_semantics().get_precision());
        let sign = a.get_sign() ^ b.get_sign();

        match (a.get_category(), b.get_category()) {
            (NaN, _) | (_, NaN) | (Zero, Zero) | (Infinity, Infinity) => {
                Self::nan(sem, sign)
            }
            (Zero, _) | (_, Infinity) => Self::zero(sem, sign),
            (Infinity, _) | (_, Zero) => Self::inf(sem, sign),
            (Normal, Normal) => {
                let (mut r, loss) = Self::div_normals(a, b);
                r.normalize(rm, loss);
                r
            }
        }
    }

    /// Divides two normal numbers with one integer division. The dividend is
    /// widened so that the quotient has all the significand bits, and the
    /// remainder gives the loss.
    fn div_normals(a: &Self, b: &Self) -> (Self, LossFraction) {
        let sem = a.get_semantics();
        let (mut a, mut b) = (a.clone(), b.clone());
        a.align_mantissa();
        b.align_mantissa();

        let mut exp = a.get_exp() - b.get_exp();
        let mut quotient = a.get_mantissa();
        let divisor = b.get_mantissa();
        // The leading quotient bit must be one.
        if quotient < divisor {
            quotient.shift_left(1);
            exp -= 1;
        }
        quotient.shift_left(sem.get_mantissa_len());
        let mut rem = quotient.inplace_div(&divisor);

        // Compare twice the remainder with the divisor.
        rem.shift_left(1);
        let loss = match rem.cmp(&divisor) {
            Ordering::Less if rem.is_zero() => LossFraction::ExactlyZero,
            Ordering::Less => LossFraction::LessThanHalf,
            Ordering::Equal => LossFraction::ExactlyHalf,
            Ordering::Greater => LossFraction::MoreThanHalf,
        };

        let sign = a.get_sign() ^ b.get_sign();
        (Self::from_parts(sem, sign, exp, quotient), loss)
    }
}

/// Implements the operator and its assignment form with the rounding mode of
/// the left operand.
macro_rules! impl_operator {
    ($trait_name:ident, $method:ident,
     $assign_trait:ident, $assign_method:ident, $op:ident) => {
        impl $trait_name for Float {
            type Output = Float;
            fn $method(self, rhs: Float) -> Float {
                let rm = self.get_rounding_mode();
                Float::$op(&self, &rhs, rm)
            }
        }

        impl $trait_name<&Float> for &Float {
            type Output = Float;
            fn $method(self, rhs: &Float) -> Float {
                let rm = self.get_rounding_mode();
                Float::$op(self, rhs, rm)
            }
        }

        impl $assign_trait for Float {
            fn $assign_method(&mut self, rhs: Float) {
                let rm = self.get_rounding_mode();
                *self = Float::$op(self, &rhs, rm);
            }
        }

        impl $assign_trait<&Float> for Float {
            fn $assign_method(&mut self, rhs: &Float) {
                let rm = self.get_rounding_mode();
                *self = Float::$op(self, rhs, rm);
            }
        }
    };
}

impl_operator!(Add, add, AddAssign, add_assign, add_with_rm);
impl_operator!(Sub, sub, SubAssign, sub_assign, sub_with_rm);
impl_operator!(Mul, mul, MulAssign, mul_assign, mul_with_rm);
impl_operator!(Div, div, DivAssign, div_assign, div_with_rm);

/// Checks that every operation on `a` and `b` gives the bits of the native
/// f64 result. NaN payloads are not compared.
#[cfg(test)]
fn check_against_native(a: f64, b: f64) {
    type NativeOp = fn(f64, f64) -> f64;
    type SoftOp = fn(&Float, &Float, RoundingMode) -> Float;
    let operations: [(&str, NativeOp, SoftOp); 4] = [
        ("+", |a, b| a + b, Float::add_with_rm),
        ("-", |a, b| a - b, Float::sub_with_rm),
        ("*", |a, b| a * b, Float::mul_with_rm),
        ("/", |a, b| a / b, Float::div_with_rm),
    ];

    let (x, y) = (Float::from_f64(a), Float::from_f64(b));
    for (name, native, soft) in operations {
        let expected = native(a, b);
        let got = soft(&x, &y, RoundingMode::NearestTiesToEven).as_f64();
        if expected.is_nan() {
            assert!(got.is_nan(), "{a} {name} {b}");
        } else {
            assert_eq!(got.to_bits(), expected.to_bits(), "{a} {name} {b}");
        }
    }
}

#[test]
fn test_small_integers() {
    for i in -20..20 {
        for j in -20..20 {
            check_against_native(i as f64, j as f64);
        }
    }
    let cases = [(128., -8.), (69., -65.), (64., -65.), (-24., 0.1), (1., 7.)];
    for (a, b) in cases {
        check_against_native(a, b);
    }
}

#[test]
fn test_edge_values() {
    use crate::utils;
    for a in utils::edge_values() {
        for b in utils::edge_values() {
            check_against_native(a, b);
        }
    }
}

#[test]
fn test_random_values() {
    use crate::utils;
    let mut rng = utils::TestRng::new(7);
    for _ in 0..3000 {
        let a = utils::finite_f64(rng.next_u64());
        let b = utils::finite_f64(rng.next_u64());
        check_against_native(a, b);
        // Operands with the same exponent exercise the cancellation path.
        check_against_native(a, a * 1.0000001);
    }
}

#[test]
fn test_exact_cancellation_is_positive() {
    let x = Float::from_f64(-10.);
    let r = &x - &x;
    assert!(r.is_zero() && !r.is_negative());
    let r = &x + &x.neg();
    assert!(r.is_zero() && !r.is_negative());
}

#[test]
fn test_first_integer_gap() {
    use super::float::FP64;
    // Doubling until x + 1 rounds back to x finds 2^53, the first number
    // whose successor is two away.
    let one = Float::from_i64(FP64, 1);
    let mut x = one.clone();
    while &(&x + &one) - &x == one {
        x = &x + &x;
    }
    assert_eq!(x.as_f64(), 9007199254740992.);

    let mut step = one.clone();
    while &(&x + &step) - &x != step {
        step += &one;
    }
    assert_eq!(step.as_f64(), 2.);
}

#[test]
fn test_operators() {
    let a = Float::from_f64(8.0);
    let b = Float::from_f64(2.0);
    assert_eq!((&a + &b).as_f64(), 10.0);
    assert_eq!((&a - &b).as_f64(), 6.0);
    assert_eq!((&a * &b).as_f64(), 16.0);
    assert_eq!((&a / &b).as_f64(), 4.0);

    let mut g = a.clone();
    g += &b;
    g *= &b;
    g -= &a;
    g /= b;
    assert_eq!(g.as_f64(), 6.0);
}

#[test]
fn test_bisection_in_wide_semantics() {
    use crate::float::FP128;

    // sqrt(2) by bisection, in 113 bits.
    let two = Float::from_u64(FP128, 2);
    let mut low = Float::from_u64(FP128, 1);
    let mut high = two.clone();
    for _ in 0..120 {
        let mid = &(&high + &low) / &two;
        if &mid * &mid < two {
            low = mid;
        } else {
            high = mid;
        }
    }
    assert_eq!(low.as_f64(), std::f64::consts::SQRT_2);
}

#[test]
fn test_division_digits() {
    use crate::float::FP128;
    // The operands of the Pentium FDIV bug.
    let a = Float::from_u64(FP128, 4_195_835);
    let b = Float::from_u64(FP128, 3_145_727);
    assert!((a / b).to_string().starts_with("1.333820449136241002"));
}
