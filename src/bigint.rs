//! The unsigned integer that holds float significands, and the conversions
//! between integers and digit strings in any radix.

use core::cmp::Ordering;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign,
};

/// Classifies the bits that a right shift (or a division) drops, relative to
/// half of the last kept unit. Rounding only needs these four cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LossFraction {
    ExactlyZero,
    LessThanHalf,
    ExactlyHalf,
    MoreThanHalf,
}

impl LossFraction {
    pub fn is_exactly_zero(&self) -> bool {
        *self == Self::ExactlyZero
    }
    pub fn is_exactly_half(&self) -> bool {
        *self == Self::ExactlyHalf
    }
    pub fn is_mt_half(&self) -> bool {
        *self == Self::MoreThanHalf
    }

    /// The loss of `1 - f`, for a dropped fraction `f`. Subtraction borrows
    /// one unit for the dropped bits and leaves this complement behind.
    pub fn invert(&self) -> LossFraction {
        match self {
            Self::LessThanHalf => Self::MoreThanHalf,
            Self::MoreThanHalf => Self::LessThanHalf,
            other => *other,
        }
    }
}

/// An unsigned integer of any size, stored as 64-bit words with the least
/// significant word first. The vector is never empty, and has no zero words
/// above the top one after an operation completes.
///
/// ```
/// use precision_probe::BigInt;
///
/// let x = BigInt::from_u64(1995) * BigInt::from_u64(90210);
/// assert_eq!(x.powi(3).to_string(), "5828982460585414617375000");
/// ```
#[derive(Debug, Clone)]
pub struct BigInt {
    parts: Vec<u64>,
}

impl BigInt {
    pub fn zero() -> Self {
        Self::from_u64(0)
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    pub fn from_u64(val: u64) -> Self {
        BigInt { parts: vec![val] }
    }

    /// Returns 2^`bit`.
    pub fn one_hot(bit: usize) -> Self {
        let mut x = Self::zero();
        x.flip_bit(bit);
        x
    }

    /// Returns 2^`bits` - 1.
    pub fn all1s(bits: usize) -> Self {
        let mut x = Self::one_hot(bits);
        let borrow = x.inplace_sub(&Self::one());
        debug_assert!(!borrow);
        x
    }

    #[cfg(test)]
    pub(crate) fn from_u128(val: u128) -> Self {
        let mut x = BigInt {
            parts: vec![val as u64, (val >> 64) as u64],
        };
        x.shrink();
        x
    }

    #[cfg(test)]
    pub(crate) fn as_u128(&self) -> u128 {
        let high = self.parts.get(1).copied().unwrap_or(0);
        (high as u128) << 64 | self.parts[0] as u128
    }

    fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns the value, which must fit in one word.
    pub fn as_u64(&self) -> u64 {
        debug_assert!(self.parts[1..].iter().all(|w| *w == 0));
        self.parts[0]
    }

    /// Returns the word `idx`, counting from the least significant one.
    pub fn word(&self, idx: usize) -> u64 {
        self.parts.get(idx).copied().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.parts.iter().all(|w| *w == 0)
    }

    pub fn is_odd(&self) -> bool {
        self.parts[0] & 1 == 1
    }

    fn flip_bit(&mut self, bit: usize) {
        let (word, offset) = (bit / 64, bit % 64);
        self.grow(word + 1);
        self.parts[word] ^= 1 << offset;
    }

    /// Clears every bit at position `bits` and above.
    fn keep_low_bits(&mut self, bits: usize) {
        let (words, offset) = (bits / 64, bits % 64);
        if words >= self.len() {
            return;
        }
        self.parts[words] &= (1u64 << offset) - 1;
        for w in self.parts[words + 1..].iter_mut() {
            *w = 0;
        }
    }

    /// Classifies the bits below position `bit`, as if they were shifted out.
    pub(crate) fn get_loss_kind_for_bit(&self, bit: usize) -> LossFraction {
        if bit == 0 || self.is_zero() {
            return LossFraction::ExactlyZero;
        }
        if bit > self.len() * 64 {
            // The top set bit is below the half-way bit.
            return LossFraction::LessThanHalf;
        }
        let mut low = self.clone();
        low.keep_low_bits(bit);
        if low.is_zero() {
            return LossFraction::ExactlyZero;
        }
        match low.cmp(&Self::one_hot(bit - 1)) {
            Ordering::Less => LossFraction::LessThanHalf,
            Ordering::Equal => LossFraction::ExactlyHalf,
            Ordering::Greater => LossFraction::MoreThanHalf,
        }
    }

    /// Returns the 1-based position of the highest set bit, or zero when no
    /// bit is set.
    pub fn msb_index(&self) -> usize {
        self.parts
            .iter()
            .rposition(|w| *w != 0)
            .map_or(0, |i| (i + 1) * 64 - self.parts[i].leading_zeros() as usize)
    }

    /// Returns the number of zero bits below the lowest set bit. Zero
    /// reports zero.
    pub fn trailing_zeros(&self) -> usize {
        self.parts
            .iter()
            .position(|w| *w != 0)
            .map_or(0, |i| i * 64 + self.parts[i].trailing_zeros() as usize)
    }

    fn grow(&mut self, size: usize) {
        if self.len() < size {
            self.parts.resize(size, 0);
        }
    }

    fn shrink(&mut self) {
        while self.len() > 1 && self.parts[self.len() - 1] == 0 {
            self.parts.pop();
        }
    }

    pub fn inplace_add(&mut self, rhs: &Self) {
        self.add_words(&rhs.parts);
    }

    fn add_words(&mut self, rhs: &[u64]) {
        self.grow(rhs.len());
        let mut carry = false;
        for (i, w) in self.parts.iter_mut().enumerate() {
            if i >= rhs.len() && !carry {
                break;
            }
            let (sum, c0) = w.overflowing_add(rhs.get(i).copied().unwrap_or(0));
            let (sum, c1) = sum.overflowing_add(carry as u64);
            *w = sum;
            carry = c0 || c1;
        }
        if carry {
            self.parts.push(1);
        }
    }

    /// Subtracts `rhs`, and returns true if the result wrapped around.
    #[must_use]
    pub fn inplace_sub(&mut self, rhs: &Self) -> bool {
        self.sub_words(&rhs.parts, 0)
    }

    /// Subtracts the words of `rhs`, skipping the `skip` low words that are
    /// known to be zero.
    fn sub_words(&mut self, rhs: &[u64], skip: usize) -> bool {
        self.grow(rhs.len());
        let mut borrow = false;
        for i in skip..self.len() {
            if i >= rhs.len() && !borrow {
                break;
            }
            let (diff, b0) =
                self.parts[i].overflowing_sub(rhs.get(i).copied().unwrap_or(0));
            let (diff, b1) = diff.overflowing_sub(borrow as u64);
            self.parts[i] = diff;
            borrow = b0 || b1;
        }
        self.shrink();
        borrow
    }

    /// Schoolbook multiplication.
    pub fn inplace_mul(&mut self, rhs: &Self) {
        let mut out = vec![0u64; self.len() + rhs.len()];
        for (i, &a) in self.parts.iter().enumerate().filter(|(_, a)| **a != 0) {
            let mut carry = 0u128;
            for (j, &b) in rhs.parts.iter().enumerate() {
                let acc = a as u128 * b as u128 + out[i + j] as u128 + carry;
                out[i + j] = acc as u64;
                carry = acc >> 64;
            }
            out[i + rhs.len()] = carry as u64;
        }
        self.parts = out;
        self.shrink();
    }

    fn mul_word(&mut self, m: u64) {
        let mut carry = 0u128;
        for w in self.parts.iter_mut() {
            let acc = *w as u128 * m as u128 + carry;
            *w = acc as u64;
            carry = acc >> 64;
        }
        if carry != 0 {
            self.parts.push(carry as u64);
        }
    }

    /// Divides by the nonzero word `divisor` and returns the remainder.
    fn div_word(&mut self, divisor: u64) -> u64 {
        let mut rem = 0u128;
        for w in self.parts.iter_mut().rev() {
            let acc = rem << 64 | *w as u128;
            *w = (acc / divisor as u128) as u64;
            rem = acc % divisor as u128;
        }
        self.shrink();
        rem as u64
    }

    /// Replaces the number with its quotient by `divisor`, and returns the
    /// remainder.
    pub fn inplace_div(&mut self, divisor: &Self) -> Self {
        let divisor_bits = divisor.msb_index();
        assert_ne!(divisor_bits, 0, "division by zero");
        if divisor_bits <= 64 {
            return Self::from_u64(self.div_word(divisor.parts[0]));
        }
        let dividend_bits = self.msb_index();
        if divisor_bits > dividend_bits {
            return core::mem::replace(self, Self::zero());
        }

        // Binary long division: line the divisor up under the top bit of the
        // dividend, then walk it down one bit per step.
        let steps = dividend_bits - divisor_bits;
        let mut rem = core::mem::replace(self, Self::zero());
        let mut shifted = divisor.clone();
        shifted.shift_left(steps);
        for bit in (0..=steps).rev() {
            if rem >= shifted {
                // The `bit` low bits of the shifted divisor are zero.
                let wrapped = rem.sub_words(&shifted.parts, bit / 64);
                debug_assert!(!wrapped);
                self.flip_bit(bit);
            }
            shifted.shift_right(1);
        }
        self.shrink();
        rem
    }

    pub fn shift_left(&mut self, bits: usize) {
        let (words, offset) = (bits / 64, bits % 64);
        let mut out = vec![0u64; self.len() + words + 1];
        for (i, &w) in self.parts.iter().enumerate() {
            out[i + words] |= w << offset;
            if offset != 0 {
                out[i + words + 1] = w >> (64 - offset);
            }
        }
        self.parts = out;
        self.shrink();
    }

    pub fn shift_right(&mut self, bits: usize) {
        let (words, offset) = (bits / 64, bits % 64);
        if words >= self.len() {
            *self = Self::zero();
            return;
        }
        let high = &self.parts[words..];
        let out = (0..high.len())
            .map(|i| {
                let carried = match high.get(i + 1) {
                    Some(next) if offset != 0 => next << (64 - offset),
                    _ => 0,
                };
                high[i] >> offset | carried
            })
            .collect();
        self.parts = out;
        self.shrink();
    }

    /// Computes `self^exp` by repeated squaring.
    pub fn powi(&self, exp: u64) -> Self {
        let mut acc = Self::one();
        let mut square = self.clone();
        let mut rest = exp;
        while rest != 0 {
            if rest & 1 == 1 {
                acc.inplace_mul(&square);
            }
            rest >>= 1;
            if rest != 0 {
                square.inplace_mul(&square.clone());
            }
        }
        acc
    }
}

impl BigInt {
    /// Returns the largest power of `radix` that fits in a word, and its
    /// number of digits.
    fn radix_chunk(radix: u32) -> (u64, usize) {
        let radix = radix as u64;
        let mut chunk = radix;
        let mut digits = 1;
        while let Some(next) = chunk.checked_mul(radix) {
            chunk = next;
            digits += 1;
        }
        (chunk, digits)
    }

    /// Reads digits in the range 0..radix, most significant first.
    pub fn from_radix_digits(digits: &[u8], radix: u32) -> Self {
        debug_assert!((2..=36).contains(&radix));
        let (_, per_chunk) = Self::radix_chunk(radix);
        let mut num = Self::zero();
        for group in digits.chunks(per_chunk) {
            let mut scale = 1u64;
            let mut value = 0u64;
            for d in group {
                debug_assert!((*d as u32) < radix);
                value = value * radix as u64 + *d as u64;
                scale *= radix as u64;
            }
            num.mul_word(scale);
            num.add_words(&[value]);
        }
        num
    }

    /// Returns the digits in the range 0..radix, most significant first.
    /// Zero is the single digit 0.
    pub fn to_radix_digits(&self, radix: u32) -> Vec<u8> {
        debug_assert!((2..=36).contains(&radix));
        let (chunk, per_chunk) = Self::radix_chunk(radix);
        let mut num = self.clone();
        let mut digits = Vec::new();

        // Each division by the chunk yields a word of digits, lowest first.
        // Only the top chunk may have fewer than `per_chunk` digits.
        while !num.is_zero() {
            let mut group = num.div_word(chunk);
            for _ in 0..per_chunk {
                if group == 0 && num.is_zero() {
                    break;
                }
                digits.push((group % radix as u64) as u8);
                group /= radix as u64;
            }
        }

        if digits.is_empty() {
            digits.push(0);
        }
        digits.reverse();
        digits
    }
}

impl Eq for BigInt {}

impl PartialEq for BigInt {
    fn eq(&self, other: &BigInt) -> bool {
        self.cmp(other).is_eq()
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        // Missing high words count as zero.
        let top = self.len().max(other.len());
        (0..top)
            .rev()
            .map(|i| self.word(i).cmp(&other.word(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Implements an operator, its assignment form, and a `u64` right-hand side
/// on top of one of the in-place methods.
macro_rules! impl_operator {
    ($trait_name:ident, $method:ident,
     $assign_trait:ident, $assign_method:ident, $inplace:ident) => {
        impl $trait_name<&BigInt> for BigInt {
            type Output = BigInt;
            fn $method(mut self, rhs: &BigInt) -> BigInt {
                let _ = self.$inplace(rhs);
                self
            }
        }

        impl $trait_name for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: BigInt) -> BigInt {
                self.$method(&rhs)
            }
        }

        impl $trait_name<&BigInt> for &BigInt {
            type Output = BigInt;
            fn $method(self, rhs: &BigInt) -> BigInt {
                self.clone().$method(rhs)
            }
        }

        impl $trait_name<u64> for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: u64) -> BigInt {
                self.$method(&BigInt::from_u64(rhs))
            }
        }

        impl $assign_trait<&BigInt> for BigInt {
            fn $assign_method(&mut self, rhs: &BigInt) {
                let _ = self.$inplace(rhs);
            }
        }

        impl $assign_trait for BigInt {
            fn $assign_method(&mut self, rhs: BigInt) {
                let _ = self.$inplace(&rhs);
            }
        }
    };
}

impl_operator!(Add, add, AddAssign, add_assign, inplace_add);
impl_operator!(Sub, sub, SubAssign, sub_assign, inplace_sub);
impl_operator!(Mul, mul, MulAssign, mul_assign, inplace_mul);
impl_operator!(Div, div, DivAssign, div_assign, inplace_div);

#[test]
fn test_powi() {
    let five = BigInt::from_u64(5);
    let mut expected = 1;
    for i in 0..27 {
        assert_eq!(five.powi(i).as_u64(), expected);
        expected *= 5;
    }
    assert_eq!(BigInt::from_u64(15).powi(16).as_u64(), 6568408355712890625);
    // 7^50 needs three words.
    let big = BigInt::from_u64(7).powi(50);
    assert_eq!(big.to_string(), "1798465042647412146620280340569649349251249");
}

#[test]
fn test_shifts() {
    let mut x = BigInt::from_u64(0xff00ff);
    x.shift_left(17);
    assert_eq!(x.word(0), 0x1fe01fe0000);
    x.shift_left(81);
    assert_eq!(x.word(1), 0x3fc03fc00000000);
    assert_eq!(x.word(0), 0);

    x.shift_right(98);
    assert_eq!(x.as_u64(), 0xff00ff);
    x.shift_right(9);
    assert_eq!(x.as_u64(), 0x7f80);
    x.shift_right(500);
    assert!(x.is_zero());
}

#[test]
fn test_word_division() {
    // Peel the decimal digits of a date, lowest first.
    let mut x = BigInt::from_u64(19940521);
    let ten = BigInt::from_u64(10);
    let digits: Vec<u64> = (0..8).map(|_| x.inplace_div(&ten).as_u64()).collect();
    assert_eq!(digits, [1, 2, 5, 0, 4, 9, 9, 1]);
    assert!(x.is_zero());
}

#[test]
fn test_loss_kind() {
    let loss = |v: u64| BigInt::from_u64(v).get_loss_kind_for_bit(3);
    assert_eq!(loss(0b1000), LossFraction::ExactlyZero);
    assert_eq!(loss(0b1001), LossFraction::LessThanHalf);
    assert_eq!(loss(0b1100), LossFraction::ExactlyHalf);
    assert_eq!(loss(0b1111), LossFraction::MoreThanHalf);
    assert_eq!(
        BigInt::from_u64(7).get_loss_kind_for_bit(0),
        LossFraction::ExactlyZero
    );
    // Everything is below the half-way bit.
    assert_eq!(
        BigInt::from_u64(7).get_loss_kind_for_bit(300),
        LossFraction::LessThanHalf
    );
    let half = BigInt::one_hot(99).get_loss_kind_for_bit(100);
    assert_eq!(half.invert(), LossFraction::ExactlyHalf);
}

#[test]
fn test_bit_positions() {
    assert_eq!(BigInt::from_u64(0xffffffff00000000).msb_index(), 64);
    assert_eq!(BigInt::zero().msb_index(), 0);
    for i in 0..200 {
        assert_eq!(BigInt::one_hot(i).msb_index(), i + 1);
        assert_eq!(BigInt::one_hot(i).trailing_zeros(), i);
        assert_eq!(BigInt::all1s(i + 1).msb_index(), i + 1);
    }
    assert_eq!(BigInt::all1s(64).as_u64(), u64::MAX);
    assert_eq!(BigInt::zero().trailing_zeros(), 0);
    assert_eq!(BigInt::from_u64(0b1011000).trailing_zeros(), 3);

    let mut x = BigInt::from_u64(5);
    x.shift_left(200);
    assert_eq!(x.msb_index() - x.trailing_zeros(), 3);
}

#[test]
fn test_against_u128() {
    use crate::utils::TestRng;

    let mut rng = TestRng::new(0);
    for _ in 0..20000 {
        let a = (rng.next_u64() as u128) << 64 | rng.next_u64() as u128;
        let b = (rng.next_u64() >> (rng.next_u64() % 64)) as u128;
        let (big_a, big_b) = (BigInt::from_u128(a), BigInt::from_u128(b));

        assert_eq!(a.cmp(&b), big_a.cmp(&big_b));
        assert_eq!((&big_a + &big_b).as_u128(), a.wrapping_add(b));
        if a >= b {
            assert_eq!((&big_a - &big_b).as_u128(), a - b);
        }
        assert_eq!((&big_b * &big_b).as_u128(), b * b);
        if b != 0 {
            let mut q = big_a.clone();
            let r = q.inplace_div(&big_b);
            assert_eq!((q.as_u128(), r.as_u128()), (a / b, a % b));
        }
    }
}

#[test]
fn test_long_division() {
    // (2^200 + 12345) / (2^70 + 3)
    let a = BigInt::one_hot(200) + 12345;
    let b = BigInt::one_hot(70) + 3;
    let mut q = a.clone();
    let r = q.inplace_div(&b);
    assert!(r < b);
    assert_eq!(&(&q * &b) + &r, a);

    let mut small = BigInt::from_u64(9);
    assert_eq!(small.inplace_div(&b).as_u64(), 9);
    assert!(small.is_zero());
}

#[test]
fn test_radix_digits() {
    let num = BigInt::from_u128(123_456_123_456_987_654_987_654u128);
    let digits = num.to_radix_digits(10);
    assert_eq!(num.to_string(), "123456123456987654987654");
    assert_eq!(BigInt::from_radix_digits(&digits, 10), num);

    assert_eq!(BigInt::from_u64(0b1011).to_radix_digits(2), [1, 0, 1, 1]);
    assert_eq!(BigInt::from_u64(255).to_radix_digits(16), [15, 15]);
    assert_eq!(BigInt::from_u64(35).to_radix_digits(36), [35]);
    assert_eq!(BigInt::zero().to_radix_digits(7), [0]);

    // 40! crosses several words and radix chunks.
    let mut num = BigInt::one();
    for i in 1..41 {
        num *= BigInt::from_u64(i);
    }
    for radix in [2, 3, 10, 13, 36] {
        let digits = num.to_radix_digits(radix);
        assert_eq!(BigInt::from_radix_digits(&digits, radix), num);
    }
}

#[test]
fn test_operators() {
    let x = BigInt::from_u64(10);
    let y = BigInt::one();
    let c = ((&x - &y) * x) / 2;
    assert_eq!(c.as_u64(), 45);

    let mut z = c;
    z += &y;
    z -= BigInt::from_u64(6);
    z *= &BigInt::from_u64(3);
    z /= BigInt::from_u64(4);
    assert_eq!(z.as_u64(), 30);
}
