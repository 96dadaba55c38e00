//! The precision probe: raises a fixed real base to a fixed complex exponent
//! and reports the result with the precision it carries.

use super::complex::Apcomplex;
use super::error::Result;
use super::radix::Radix;
use core::fmt::Display;
use log::debug;

/// The base, with 16 significant digits.
pub const BASE_LITERAL: &str = "10.00000000000000";

/// The exponent, with 18 significant digits in each part.
pub const EXPONENT_LITERAL: &str =
    "(-1.23400000000000000, -5.67800000000000000)";

/// The inputs of the probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub base: String,
    pub exponent: String,
    pub radix: Radix,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            base: BASE_LITERAL.to_string(),
            exponent: EXPONENT_LITERAL.to_string(),
            radix: Radix::DECIMAL,
        }
    }
}

/// The outcome of a probe run. Prints as
/// `(<real>, <imag>) to <N> radix digits`.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub result: Apcomplex,
}

impl ProbeReport {
    pub fn precision(&self) -> u64 {
        self.result.precision()
    }
}

impl Display for ProbeReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} to {} radix digits", self.result, self.precision())
    }
}

/// Parses the base and the exponent of `config` and computes base^exponent.
pub fn run(config: &ProbeConfig) -> Result<ProbeReport> {
    let base = Apcomplex::parse_radix(&config.base, config.radix)?;
    let exponent = Apcomplex::parse_radix(&config.exponent, config.radix)?;
    debug!(
        "base has {} digits, exponent has {} digits, radix {}",
        base.precision(),
        exponent.precision(),
        config.radix
    );
    let result = base.pow(&exponent)?;
    Ok(ProbeReport { result })
}

#[test]
fn test_default_probe() {
    let report = run(&ProbeConfig::default()).unwrap();
    assert_eq!(report.precision(), 16);
    assert_eq!(
        report.to_string(),
        "(0.05098501197030655, -0.02836565619543653) to 16 radix digits"
    );
}

#[test]
fn test_probe_errors() {
    use super::error::{Error, ParseErrorKind};
    let config = ProbeConfig {
        exponent: "(-1.234, -5.678".to_string(),
        ..ProbeConfig::default()
    };
    assert!(matches!(
        run(&config),
        Err(Error::Parse {
            kind: ParseErrorKind::MalformedComplex,
            ..
        })
    ));

    let config = ProbeConfig {
        base: "0".to_string(),
        ..ProbeConfig::default()
    };
    assert!(matches!(run(&config), Err(Error::Domain { .. })));
}

#[test]
fn test_probe_other_radix() {
    // 2^(1/2) in binary, with 8 binary digits in the base.
    let config = ProbeConfig {
        base: "10.000000".to_string(),
        exponent: "(0.1000000000)".to_string(),
        radix: Radix::new(2).unwrap(),
    };
    let report = run(&config).unwrap();
    assert_eq!(report.precision(), 8);
    assert_eq!(report.to_string(), "(1.0110101, 0) to 8 radix digits");
}
