use precision_probe::probe::{self, ProbeConfig};
use precision_probe::{BigInt, Float, RoundingMode, Semantics};

use RoundingMode::NearestTiesToEven as rme;

fn test_probe() {
    let config = ProbeConfig::default();
    black_box(probe::run(&config).ok());
}

fn test_sqrt() {
    let sem = Semantics::new(32, 10000, rme);
    black_box(Float::one(sem, false).scale(1, rme).sqrt());
}

fn test_pi() {
    let sem = Semantics::new(32, 2000, rme);
    black_box(Float::pi(sem));
}

fn test_powi() {
    let a = BigInt::from_u64(1275563424);
    black_box(a.powi(11000));
}

fn test_bigint_to_radix_digits() {
    let a = BigInt::from_u64(197123);
    black_box(a.powi(100).to_radix_digits(10));
}

fn test_sin_cos() {
    let sem = Semantics::new(32, 90, rme);
    for i in 0..100 {
        let (a, b) = Float::from_u64(sem, i).sin_cos();
        black_box(a + b);
    }
}

fn test_exp_log() {
    let sem = Semantics::new(32, 200, rme);
    for i in 1..20 {
        black_box(Float::from_u64(sem, i).log().exp());
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_probe", |b| b.iter(test_probe));
    c.bench_function("test_pi", |b| b.iter(test_pi));
    c.bench_function("test_sqrt", |b| b.iter(test_sqrt));
    c.bench_function("test_powi", |b| b.iter(test_powi));
    c.bench_function("test_bigint_to_radix_digits", |b| {
        b.iter(test_bigint_to_radix_digits)
    });
    c.bench_function("test_sin_cos", |b| b.iter(test_sin_cos));
    c.bench_function("test_exp_log", |b| b.iter(test_exp_log));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
