//! Benchmarks for the post-processing chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodist::instruments::VIOLIN;
use melodist::post::postprocess;
use melodist::synth::synthesize;
use melodist::PostConfig;

use super::melody;
use crate::{FRAME_COUNTS, HOP, SAMPLE_RATE};

pub fn bench_post(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/post");
    let config = PostConfig::default();

    for &frames in FRAME_COUNTS {
        let raw = synthesize(&melody(frames), &VIOLIN, SAMPLE_RATE, HOP);
        group.bench_with_input(BenchmarkId::new("postprocess", frames), &frames, |b, _| {
            b.iter(|| postprocess(black_box(&raw), &config))
        });
    }

    group.finish();
}
