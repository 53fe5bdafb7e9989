//! Benchmarks for the feedback delay.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodist::dsp::FeedbackDelay;
use melodist::post::delay_samples;

use crate::{FRAME_COUNTS, HOP, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &frames in FRAME_COUNTS {
        let input: Vec<f32> = (0..frames * HOP).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = input.clone();
        let mut delay = FeedbackDelay::new(delay_samples(0.05, SAMPLE_RATE), 0.3);

        group.bench_with_input(BenchmarkId::new("render_50ms", frames), &frames, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                delay.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
