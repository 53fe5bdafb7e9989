//! Benchmarks for the additive engine, one instrument per family.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use melodist::instruments::{FLUTE, PIANO, SINE, TRUMPET, VIOLIN};
use melodist::synth::synthesize;
use melodist::voicing::condition;

use super::melody;
use crate::{HOP, SAMPLE_RATE};

pub fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synthesis");
    // ~10 s of audio
    let stream = condition(&melody(430), 10);

    for model in [PIANO, VIOLIN, TRUMPET, FLUTE, SINE] {
        group.bench_with_input(BenchmarkId::new("family", model.name), &model, |b, model| {
            b.iter(|| synthesize(black_box(&stream), model, SAMPLE_RATE, HOP))
        });
    }

    group.finish();
}
