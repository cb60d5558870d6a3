//! Criterion benchmarks for the indicator hot paths.
//!
//! A 25-year daily series is about 6300 bars; these benches use 6400 so
//! the numbers reflect a full dashboard fetch.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chartlab_core::indicators::{macd, sma, trailing_annual_return};

fn make_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.013).sin() * 15.0 + i as f64 * 0.01)
        .collect()
}

fn bench_sma(c: &mut Criterion) {
    let closes = make_closes(6400);
    c.bench_function("sma_200_6400_bars", |b| {
        b.iter(|| sma(black_box(&closes), black_box(200)))
    });
}

fn bench_macd(c: &mut Criterion) {
    let closes = make_closes(6400);
    c.bench_function("macd_6400_bars", |b| b.iter(|| macd(black_box(&closes))));
}

fn bench_trailing_return(c: &mut Criterion) {
    let closes = make_closes(6400);
    c.bench_function("trailing_annual_return_6400_bars", |b| {
        b.iter(|| trailing_annual_return(black_box(&closes)))
    });
}

criterion_group!(benches, bench_sma, bench_macd, bench_trailing_return);
criterion_main!(benches);
