//! Bit helpers, and the value generators that the tests share.

/// Returns a word whose lowest `bits` bits are set.
pub fn low_mask(bits: usize) -> u64 {
    debug_assert!(bits <= 64);
    if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[test]
fn test_low_mask() {
    assert_eq!(low_mask(0), 0);
    assert_eq!(low_mask(3), 0b111);
    assert_eq!(low_mask(11), 0x7ff);
    assert_eq!(low_mask(52), 0xF_FFFF_FFFF_FFFF);
    assert_eq!(low_mask(64), u64::MAX);
}

/// Values that tend to break floating-point code: signed zeros and
/// infinities, NaN, the extremes of f64, and a few irrational constants.
#[cfg(test)]
pub fn edge_values() -> Vec<f64> {
    use std::f64::consts;
    vec![
        0.0,
        -0.0,
        f64::NAN,
        -f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::EPSILON,
        -f64::EPSILON,
        f64::MAX,
        f64::MIN,
        1e-39,
        -0.00001,
        0.1,
        -10.,
        10.,
        consts::PI,
        consts::E,
        consts::LN_2,
        consts::SQRT_2,
        355. / 113.,
    ]
}

/// Turns 64 random bits into a finite f64 with a binary exponent between
/// -64 and 63. The sign and the mantissa are taken from `bits`.
#[cfg(test)]
pub fn finite_f64(bits: u64) -> f64 {
    let exp = 1023 - 64 + ((bits >> 52) & 127);
    f64::from_bits((bits & 0x800F_FFFF_FFFF_FFFF) | (exp << 52))
}

/// A xorshift generator, so that randomized tests are repeatable.
#[cfg(test)]
pub struct TestRng(u64);

#[cfg(test)]
impl TestRng {
    pub fn new(seed: u64) -> Self {
        // The state must never be zero.
        TestRng(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

#[test]
fn test_rng_bits_are_balanced() {
    let mut rng = TestRng::new(0);
    let ones: u32 = (0..4000).map(|_| rng.next_u64().count_ones()).sum();
    let total = 4000. * 64.;
    assert!((ones as f64) > 0.45 * total);
    assert!((ones as f64) < 0.55 * total);
}

#[test]
fn test_finite_f64_exponent_range() {
    let mut rng = TestRng::new(3);
    for _ in 0..1000 {
        let v = finite_f64(rng.next_u64());
        assert!(v.is_normal());
        assert!(v.abs() >= 2f64.powi(-64));
        assert!(v.abs() < 2f64.powi(64));
    }
}
