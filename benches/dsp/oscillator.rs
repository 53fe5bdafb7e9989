//! Benchmarks for the harmonic oscillator bank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodist::dsp::oscillator::{OscillatorBank, HARMONIC_SLOTS};

use crate::{HOP, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let mut buffer = vec![0.0f32; HOP];

    for harmonics in [1usize, 5, HARMONIC_SLOTS] {
        let mut bank = OscillatorBank::new(SAMPLE_RATE);
        group.bench_with_input(
            BenchmarkId::new("hop_220hz", harmonics),
            &harmonics,
            |b, &harmonics| {
                b.iter(|| {
                    buffer.fill(0.0);
                    for h in 0..harmonics {
                        let freq = 220.0 * (h + 1) as f32;
                        bank.accumulate(h, black_box(freq), 1.0 / (h + 1) as f32, &mut buffer);
                    }
                })
            },
        );
    }

    group.finish();
}
