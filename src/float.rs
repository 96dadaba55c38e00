//! The float type: its semantics, its categories, and the rounding of the
//! significand after every operation.

use super::bigint::{BigInt, LossFraction};
use core::cmp::Ordering;

/// The rounding modes used in the crate. Values round to nearest, and
/// conversions to integers may truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round to nearest. Used by the inner steps of the elementary functions,
    /// which already carry guard bits.
    None,
    NearestTiesToEven,
    /// Round toward zero.
    Zero,
}

/// Describes the shape of a float: the width of the exponent field, the
/// number of significand bits, and the rounding mode used by the operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    /// The number of bits that define the range of the exponent.
    pub exponent: usize,
    /// The number of bits in the significand (mantissa + 1).
    pub precision: usize,
    /// The rounding mode used by the operators.
    pub mode: RoundingMode,
}

impl Semantics {
    pub const fn new(
        exponent: usize,
        precision: usize,
        mode: RoundingMode,
    ) -> Self {
        Semantics {
            exponent,
            precision,
            mode,
        }
    }
    /// Returns the precision in bits.
    pub fn get_precision(&self) -> usize {
        self.precision
    }
    /// Returns the length of the mantissa in bits (precision - 1).
    pub fn get_mantissa_len(&self) -> usize {
        self.precision - 1
    }
    /// Returns the length of the exponent in bits, which defines the valid
    /// range.
    pub fn get_exponent_len(&self) -> usize {
        self.exponent
    }
    /// Returns the rounding mode of the type.
    pub fn get_rounding_mode(&self) -> RoundingMode {
        self.mode
    }

    /// Returns these semantics with `more` additional significand bits.
    pub fn increase_precision(&self, more: usize) -> Semantics {
        Semantics::new(self.exponent, self.precision + more, self.mode)
    }
    /// Returns these semantics with a `more` bits wider exponent field.
    pub fn increase_exponent(&self, more: usize) -> Semantics {
        Semantics::new(self.exponent + more, self.precision, self.mode)
    }

    /// Returns the number of bits needed to hold the precision, which is
    /// log2 of the precision rounded up.
    pub fn log_precision(&self) -> usize {
        usize::BITS as usize - self.precision.leading_zeros() as usize
    }

    /// Grow the precision by `scale` times the log2 of the precision. The
    /// elementary functions use this to size their guard bits.
    pub fn grow_log(&self, scale: usize) -> Semantics {
        self.increase_precision(self.log_precision() * scale)
    }

    /// The IEEE bias of the exponent field: 2^(width-1) - 1.
    pub(crate) fn get_bias(&self) -> i64 {
        let e = self.get_exponent_len();
        debug_assert!(e > 1 && e < 62, "unsupported exponent width");
        ((1u64 << (e - 1)) - 1) as i64
    }
}

/// The class of a float. Only `Normal` numbers use the exponent and the
/// mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Infinity,
    NaN,
    Normal,
    Zero,
}

/// An arbitrary-precision binary floating-point number. The value of a
/// normal number is `1.mmmm * 2^exp`, where the significand is stored as an
/// integer with its most significant bit at `precision`.
#[derive(Debug, Clone)]
pub struct Float {
    sem: Semantics,
    // True for negative numbers.
    sign: bool,
    exp: i64,
    // The significand with its integer bit, right-aligned. The top set bit
    // is bit `precision` (1-based) except for subnormals.
    mantissa: BigInt,
    category: Category,
}

impl Float {
    pub fn get_mantissa_len(&self) -> usize {
        self.sem.get_mantissa_len()
    }
    pub fn get_exponent_len(&self) -> usize {
        self.sem.get_exponent_len()
    }

    /// Builds a normal number from its parts, without normalizing it. A zero
    /// mantissa gives zero.
    pub fn from_parts(
        sem: Semantics,
        sign: bool,
        exp: i64,
        mantissa: BigInt,
    ) -> Self {
        if mantissa.is_zero() {
            return Float::zero(sem, sign);
        }
        Float {
            sem,
            sign,
            exp,
            mantissa,
            category: Category::Normal,
        }
    }

    pub(crate) fn raw(
        sem: Semantics,
        sign: bool,
        exp: i64,
        mantissa: BigInt,
        category: Category,
    ) -> Self {
        Float {
            sem,
            sign,
            exp,
            mantissa,
            category,
        }
    }

    pub fn zero(sem: Semantics, sign: bool) -> Self {
        Self::raw(sem, sign, 0, BigInt::zero(), Category::Zero)
    }

    pub fn one(sem: Semantics, sign: bool) -> Self {
        let one = BigInt::one_hot(sem.get_mantissa_len());
        Self::raw(sem, sign, 0, one, Category::Normal)
    }

    pub fn inf(sem: Semantics, sign: bool) -> Self {
        Self::raw(sem, sign, 0, BigInt::zero(), Category::Infinity)
    }

    pub fn nan(sem: Semantics, sign: bool) -> Self {
        Self::raw(sem, sign, 0, BigInt::zero(), Category::NaN)
    }

    pub fn is_negative(&self) -> bool {
        self.sign
    }

    pub fn is_inf(&self) -> bool {
        self.category == Category::Infinity
    }

    pub fn is_nan(&self) -> bool {
        self.category == Category::NaN
    }

    pub fn is_zero(&self) -> bool {
        self.category == Category::Zero
    }

    /// Returns true for finite nonzero numbers.
    pub fn is_normal(&self) -> bool {
        self.category == Category::Normal
    }

    pub fn get_semantics(&self) -> Semantics {
        self.sem
    }

    pub fn get_rounding_mode(&self) -> RoundingMode {
        self.sem.get_rounding_mode()
    }

    /// Sets the sign. True means negative.
    pub fn set_sign(&mut self, sign: bool) {
        self.sign = sign
    }

    /// True means negative.
    pub fn get_sign(&self) -> bool {
        self.sign
    }

    pub fn get_mantissa(&self) -> BigInt {
        self.mantissa.clone()
    }

    /// Returns the binary exponent of the leading significand bit.
    pub fn get_exp(&self) -> i64 {
        self.exp
    }

    pub fn get_category(&self) -> Category {
        self.category
    }

    pub fn neg(&self) -> Self {
        let mut x = self.clone();
        x.sign = !x.sign;
        x
    }

    /// Moves a short mantissa up to the full precision, keeping the value.
    pub(crate) fn align_mantissa(&mut self) {
        let bits =
            self.sem.get_precision() as i64 - self.mantissa.msb_index() as i64;
        if bits > 0 {
            self.exp -= bits;
            self.mantissa.shift_left(bits as usize);
        }
    }

    /// Returns the lowest and the highest exponent of normal numbers. The
    /// all-ones biased exponent is reserved, as in IEEE 754.
    pub fn get_exp_bounds(&self) -> (i64, i64) {
        let bias = self.sem.get_bias();
        let all_ones = (1i64 << self.get_exponent_len()) - 1;
        (1 - bias, all_ones - 1 - bias)
    }
}

/// The layout of the IEEE binary64 format: 11 exponent bits and 53 bits of
/// significand. Native f64 values load into these semantics.
pub const FP64: Semantics =
    Semantics::new(11, 53, RoundingMode::NearestTiesToEven);

/// The IEEE binary128 layout, for tests that need more bits than f64 has.
#[cfg(test)]
pub(crate) const FP128: Semantics =
    Semantics::new(15, 113, RoundingMode::NearestTiesToEven);

/// Returns `val >> bits`, and the kind of the bits that were shifted out.
pub(crate) fn shift_right_with_loss(
    val: &BigInt,
    bits: usize,
) -> (BigInt, LossFraction) {
    let mut val = val.clone();
    let loss = val.get_loss_kind_for_bit(bits);
    val.shift_right(bits);
    (val, loss)
}

/// Merges the loss of two adjacent bit ranges, where `msb` is the range
/// right below the kept bits and `lsb` the range below it.
fn combine_loss_fraction(msb: LossFraction, lsb: LossFraction) -> LossFraction {
    if !lsb.is_exactly_zero() {
        if msb.is_exactly_zero() {
            return LossFraction::LessThanHalf;
        } else if msb.is_exactly_half() {
            return LossFraction::MoreThanHalf;
        }
    }
    msb
}

impl Float {
    /// Replaces a number whose exponent is above the range. Rounding to
    /// nearest gives infinity, and truncation the largest finite value.
    fn overflow(&mut self, rm: RoundingMode) {
        *self = match rm {
            RoundingMode::None | RoundingMode::NearestTiesToEven => {
                Self::inf(self.sem, self.sign)
            }
            RoundingMode::Zero => {
                let (_, max_exp) = self.get_exp_bounds();
                let all_ones = BigInt::all1s(self.sem.get_precision());
                Self::from_parts(self.sem, self.sign, max_exp, all_ones)
            }
        }
    }

    /// Asserts that a normal number is in range and fits the significand.
    pub(crate) fn check_bounds(&self) {
        if !self.is_normal() {
            return;
        }
        let (min_exp, max_exp) = self.get_exp_bounds();
        debug_assert!((min_exp..=max_exp).contains(&self.exp));
        debug_assert!(self.mantissa.msb_index() <= self.sem.get_precision());
    }

    pub(crate) fn shift_significand_left(&mut self, amt: u64) {
        self.exp -= amt as i64;
        self.mantissa.shift_left(amt as usize);
    }

    pub(crate) fn shift_significand_right(&mut self, amt: u64) -> LossFraction {
        self.exp += amt as i64;
        let res = shift_right_with_loss(&self.mantissa, amt as usize);
        self.mantissa = res.0;
        res.1
    }

    /// Returns true if dropping the bits described by `loss` must increment
    /// the mantissa.
    pub(crate) fn need_round_away_from_zero(
        &self,
        rm: RoundingMode,
        loss: LossFraction,
    ) -> bool {
        match rm {
            RoundingMode::Zero => false,
            RoundingMode::None | RoundingMode::NearestTiesToEven => {
                loss.is_mt_half()
                    || (loss.is_exactly_half() && self.mantissa.is_odd())
            }
        }
    }

    /// Brings the number to canonical form: the most significant mantissa
    /// bit sits at `precision`, the exponent is in range, and the bits that
    /// fall off the bottom (together with the incoming `loss`) are rounded
    /// with `rm`. Numbers at the bottom of the range stay unaligned
    /// (subnormal).
    pub(crate) fn normalize(&mut self, rm: RoundingMode, loss: LossFraction) {
        if !self.is_normal() {
            return;
        }
        let (min_exp, max_exp) = self.get_exp_bounds();
        let mut loss = loss;

        let msb = self.mantissa.msb_index() as i64;
        if msb != 0 {
            let excess = msb - self.sem.get_precision() as i64;
            if self.exp + excess > max_exp {
                self.overflow(rm);
                self.check_bounds();
                return;
            }
            // Subnormals keep the lowest exponent and a short significand.
            let shift = excess.max(min_exp - self.exp);
            if shift < 0 {
                debug_assert!(loss.is_exactly_zero(), "widening a rounded value");
                self.shift_significand_left(shift.unsigned_abs());
                return;
            }
            if shift > 0 {
                let dropped = self.shift_significand_right(shift as u64);
                loss = combine_loss_fraction(dropped, loss);
            }
        }

        if !loss.is_exactly_zero() && self.need_round_away_from_zero(rm, loss) {
            // A value shifted out entirely rounds up to the smallest subnormal.
            if self.mantissa.is_zero() {
                self.exp = min_exp;
            }
            self.mantissa.inplace_add(&BigInt::one());

            // The carry may widen the significand by one bit.
            if self.mantissa.msb_index() > self.sem.get_precision() {
                if self.exp >= max_exp {
                    *self = Self::inf(self.sem, self.sign);
                    return;
                }
                self.shift_significand_right(1);
            }
        }

        if self.mantissa.is_zero() {
            *self = Self::zero(self.sem, self.sign);
        }
    }
}

impl PartialEq for Float {
    /// NaN is unequal to everything, and the two zeros are equal.
    fn eq(&self, other: &Self) -> bool {
        match (self.category, other.category) {
            (Category::NaN, _) | (_, Category::NaN) => false,
            (Category::Zero, Category::Zero) => true,
            (a, b) if a != b => false,
            (Category::Infinity, _) => self.sign == other.sign,
            _ => {
                self.sign == other.sign
                    && self.exp == other.exp
                    && self.mantissa == other.mantissa
            }
        }
    }
}

impl PartialOrd for Float {
    /// Orders the values as IEEE 754 does: NaN is unordered and -0 == +0.
    /// Both operands must have the same precision.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        debug_assert_eq!(
            self.get_semantics().get_precision(),
            other.get_semantics().get_precision()
        );
        if self.is_nan() || other.is_nan() {
            return None;
        }
        // The rank of the magnitude class: zero, finite, infinite.
        let rank = |x: &Float| match x.category {
            Category::Zero => 0,
            Category::Normal => 1,
            _ => 2,
        };
        let signed = |x: &Float| match (x.is_zero(), x.sign) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        };

        let (sa, sb) = (signed(self), signed(other));
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        let magnitude = rank(self).cmp(&rank(other)).then_with(|| {
            if self.is_normal() {
                self.exp
                    .cmp(&other.exp)
                    .then_with(|| self.mantissa.cmp(&other.mantissa))
            } else {
                Ordering::Equal
            }
        });
        Some(if sa < 0 { magnitude.reverse() } else { magnitude })
    }
}

#[test]
fn test_ordering_matches_native() {
    use super::utils;
    for a in utils::edge_values() {
        for b in utils::edge_values() {
            let (x, y) = (Float::from_f64(a), Float::from_f64(b));
            assert_eq!(x.partial_cmp(&y), a.partial_cmp(&b), "{a} {b}");
            assert_eq!(x == y, a == b, "{a} == {b}");
        }
    }

    let (a, b) = (Float::from_f64(-1.5), Float::from_f64(-1.25));
    assert!(a < b && b > a);
}

#[test]
fn test_one_in_narrow_semantics() {
    let sem = Semantics::new(10, 12, RoundingMode::NearestTiesToEven);
    assert_eq!(Float::one(sem, false).as_f64(), 1.0);
    assert_eq!(Float::one(sem, true).as_f64(), -1.0);
}

#[test]
fn test_grow_log() {
    let sem = Semantics::new(32, 118, RoundingMode::NearestTiesToEven);
    assert_eq!(sem.log_precision(), 7);
    assert_eq!(sem.grow_log(10).get_precision(), 188);
    assert_eq!(sem.increase_exponent(10).get_exponent_len(), 42);
}
