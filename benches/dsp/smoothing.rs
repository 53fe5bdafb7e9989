//! Benchmarks for the moving average.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodist::dsp::smoothing::moving_average;

use crate::{FRAME_COUNTS, HOP};

pub fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smoothing");

    for &frames in FRAME_COUNTS {
        let input: Vec<f32> = (0..frames * HOP).map(|i| (i as f32 * 0.37).sin()).collect();
        group.bench_with_input(BenchmarkId::new("window_10", frames), &frames, |b, _| {
            b.iter(|| moving_average(black_box(&input), 10))
        });
    }

    group.finish();
}
