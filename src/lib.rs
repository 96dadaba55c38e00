//! Arbitrary-precision real and complex numbers that track how many
//! significant digits they carry, and a probe that reports the precision of
//! one complex power.

mod apfloat;
mod arithmetic;
mod bigint;
mod cast;
mod complex;
mod error;
mod float;
mod operations;
pub mod probe;
mod radix;
mod string;
mod utils;

pub use self::apfloat::{Apfloat, GUARD_BITS, INFINITE};
pub use self::bigint::BigInt;
pub use self::complex::{Apcomplex, MAX_INTEGER_POWER};
pub use self::error::{Error, ParseErrorKind, Result};
pub use self::float::{Category, Float, RoundingMode, Semantics, FP64};
pub use self::radix::{Radix, MAX_RADIX, MIN_RADIX};
pub use self::string::Numeral;
