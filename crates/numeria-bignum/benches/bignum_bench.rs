//! Big number arithmetic benchmarks.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use numeria_bignum::{BarrettCtx, BigNum, MontgomeryCtx};

fn bench_arith(c: &mut Criterion) {
    let mut group = c.benchmark_group("arith");

    for size in [256, 512, 1024, 2048, 4096] {
        let bytes = vec![0xFFu8; size / 8];
        let a = BigNum::from_bytes_be(&bytes);
        let b = BigNum::from_bytes_be(&bytes);

        group.bench_with_input(BenchmarkId::new("mul", size), &size, |bench, _| {
            bench.iter(|| a.mul(&b));
        });

        group.bench_with_input(BenchmarkId::new("sqr", size), &size, |bench, _| {
            bench.iter(|| a.sqr());
        });

        group.bench_with_input(BenchmarkId::new("add", size), &size, |bench, _| {
            bench.iter(|| a.add(&b));
        });
    }

    group.finish();
}

fn bench_div(c: &mut Criterion) {
    let mut group = c.benchmark_group("div");

    for size in [512, 1024, 2048] {
        let x = BigNum::from_bytes_be(&vec![0xA5u8; size / 4]);
        let y = BigNum::from_bytes_be(&vec![0x3Cu8; size / 8]);

        group.bench_with_input(BenchmarkId::new("div_rem", size), &size, |bench, _| {
            bench.iter(|| x.div_rem(&y));
        });
    }

    group.finish();
}

fn bench_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduction");

    for size in [512, 1024, 2048] {
        let mut mod_bytes = vec![0xEDu8; size / 8];
        mod_bytes[size / 8 - 1] |= 1; // odd, for Montgomery
        let m = BigNum::from_bytes_be(&mod_bytes);
        let x = BigNum::from_bytes_be(&vec![0x7Bu8; size / 4]);

        let barrett = BarrettCtx::new(&m).unwrap();
        group.bench_with_input(BenchmarkId::new("barrett", size), &size, |bench, _| {
            bench.iter(|| barrett.reduce(&x));
        });

        let mont = MontgomeryCtx::new(&m).unwrap();
        let a = BigNum::from_bytes_be(&vec![0x42u8; size / 8]);
        let am = mont.to_mont(&a).unwrap();
        group.bench_with_input(BenchmarkId::new("mont_mul", size), &size, |bench, _| {
            bench.iter(|| mont.mont_mul(&am, &am));
        });

        let e = BigNum::from_bytes_be(&vec![0x91u8; size / 8]);
        group.bench_with_input(BenchmarkId::new("mont_exp", size), &size, |bench, _| {
            bench.iter(|| mont.mont_exp(&a, &e));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_arith, bench_div, bench_reduction);
criterion_main!(benches);
