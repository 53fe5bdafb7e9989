//! Benchmarks for low-level DSP primitives.

mod delay;
mod oscillator;
mod smoothing;

pub use delay::bench_delay;
pub use oscillator::bench_oscillator;
pub use smoothing::bench_smoothing;
