use precision_probe::probe::{
    self, ProbeConfig, BASE_LITERAL, EXPONENT_LITERAL,
};
use precision_probe::{Apcomplex, Apfloat, Radix, INFINITE};
use std::process::Command;

const GOLDEN: &str =
    "(0.05098501197030655, -0.02836565619543653) to 16 radix digits";

#[test]
fn test_binary_prints_golden_line() {
    let output = Command::new(env!("CARGO_BIN_EXE_precision-probe"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, format!("{GOLDEN}\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_binary_logging_stays_off_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_precision-probe"))
        .env("RUST_LOG", "trace")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end(), GOLDEN);
}

#[test]
fn test_probe_is_deterministic() {
    let config = ProbeConfig::default();
    assert_eq!(config.base, BASE_LITERAL);
    assert_eq!(config.exponent, EXPONENT_LITERAL);
    let first = probe::run(&config).unwrap().to_string();
    for _ in 0..3 {
        assert_eq!(probe::run(&config).unwrap().to_string(), first);
    }
    assert_eq!(first, GOLDEN);
}

#[test]
fn test_precision_is_minimum_of_operands() {
    let base = Apcomplex::parse(BASE_LITERAL).unwrap();
    let exponent = Apcomplex::parse(EXPONENT_LITERAL).unwrap();
    assert_eq!(base.precision(), 16);
    assert_eq!(base.im().precision(), INFINITE);
    assert_eq!(exponent.precision(), 18);
    assert_eq!(base.pow(&exponent).unwrap().precision(), 16);
}

#[test]
fn test_power_times_inverse_is_one() {
    let base = Apcomplex::parse(BASE_LITERAL).unwrap();
    let exponent = Apcomplex::parse(EXPONENT_LITERAL).unwrap();
    let a = base.pow(&exponent).unwrap();
    let b = base.pow(&exponent.neg()).unwrap();
    let product = a.mul(&b).unwrap();
    assert_eq!(product.precision(), 16);
    assert_eq!(product.re().to_string(), "1");
    assert!(product.im().to_f64().abs() < 1e-15);
}

#[test]
fn test_integer_power_of_base() {
    let base = Apcomplex::parse(BASE_LITERAL).unwrap();
    let two = Apcomplex::from_real(Apfloat::from_i64(2, Radix::DECIMAL));
    let square = base.pow(&two).unwrap();
    assert!(square.im().is_zero());
    assert_eq!(square.re().to_string(), "100");
    assert_eq!(square.to_string(), "(100, 0)");
    assert_eq!(square.precision(), 16);
}
