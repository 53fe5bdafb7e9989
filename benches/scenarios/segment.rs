//! Benchmarks for note segmentation and voicing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodist::sequencing::segment;
use melodist::voicing::condition;

use super::melody;
use crate::FRAME_COUNTS;

pub fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/segment");

    for &frames in FRAME_COUNTS {
        let stream = melody(frames);

        group.bench_with_input(BenchmarkId::new("segment", frames), &frames, |b, _| {
            b.iter(|| segment(black_box(&stream), 22))
        });

        group.bench_with_input(BenchmarkId::new("condition", frames), &frames, |b, _| {
            b.iter(|| condition(black_box(&stream), 10))
        });
    }

    group.finish();
}
