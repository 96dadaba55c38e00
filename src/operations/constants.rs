//! The constants pi and ln(2), computed to any precision.

use crate::RoundingMode;
use crate::{Float, Semantics};

impl Float {
    /// Computes pi with the arithmetic-geometric mean iteration of Brent and
    /// Salamin.
    pub fn pi(sem: Semantics) -> Self {
        use RoundingMode::NearestTiesToEven as rm;
        let orig_sem = sem;
        // Every step rounds.
        let sem = sem.grow_log(4);

        let one = Self::one(sem, false);
        let mut a = one.clone();
        let mut b = one.scale(-1, rm).sqrt();
        let mut t = one.scale(-2, rm);
        let mut weight = one;

        // Each step doubles the correct bits. Near the limit `a` and `b` may
        // keep trading the last bit, so the loop is bounded.
        for _ in 0..sem.log_precision() + 4 {
            if a == b {
                break;
            }
            let prev_a = a.clone();
            a = (&a + &b).scale(-1, rm);
            b = (&b * &prev_a).sqrt();
            t -= &weight * &(&a - &prev_a).sqr();
            weight = weight.scale(1, rm);
        }
        (&a.sqr() / &t).cast(orig_sem)
    }

    /// Computes ln(2) = 2 atanh(1/3), from the series
    /// atanh(1/3) = sum 1 / ((2k + 1) 3^(2k + 1)).
    pub fn ln2(sem: Semantics) -> Self {
        use RoundingMode::None as rm;
        let work = sem.increase_precision(8);

        let one = Self::one(work, false);
        let nine = Self::from_u64(work, 9);
        // 3^(2k + 1)
        let mut power = Self::from_u64(work, 3);
        let mut sum = Self::zero(work, false);
        for k in 0_u64.. {
            let odd = Self::from_u64(work, 2 * k + 1);
            let den = Float::mul_with_rm(&odd, &power, rm);
            let term = Float::div_with_rm(&one, &den, rm);
            let next = Float::add_with_rm(&sum, &term, rm);
            if next == sum {
                break;
            }
            sum = next;
            power = Float::mul_with_rm(&power, &nine, rm);
        }
        sum.scale(1, rm).cast(sem)
    }
}

#[test]
fn test_pi() {
    use crate::FP64;
    assert_eq!(Float::pi(FP64).as_f64(), std::f64::consts::PI);

    // mpmath: mp.dps = 60; mp.pi
    let sem = Semantics::new(32, 200, RoundingMode::NearestTiesToEven);
    let expected = "3.14159265358979323846264338327950288419716939937510";
    assert!(Float::pi(sem).to_string().starts_with(expected));
}

#[test]
fn test_ln2() {
    use crate::FP64;
    assert_eq!(Float::ln2(FP64).as_f64(), std::f64::consts::LN_2);

    // mpmath: mp.dps = 60; mp.log(2)
    let sem = Semantics::new(32, 200, RoundingMode::NearestTiesToEven);
    let expected = "0.693147180559945309417232121458176568075500134360255";
    assert!(Float::ln2(sem).to_string().starts_with(expected));
}
