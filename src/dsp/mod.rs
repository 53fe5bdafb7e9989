//! Low-level DSP primitives used by the synthesis engine and post-processor.
//!
//! These components own their state explicitly and never touch globals, so
//! one synthesis run can embed them directly and stay isolated from any
//! other run on another thread.

/// Feedback delay line (single-tap echo).
pub mod delay;
/// Pluck attack/decay envelope with pitch-change retrigger.
pub mod envelope;
/// Band-limited Gaussian breath noise.
pub mod noise;
/// Peak measurement, normalization and 16-bit quantization.
pub mod normalize;
/// Phase-continuous harmonic oscillator bank.
pub mod oscillator;
/// Centered moving-average smoothing.
pub mod smoothing;

pub use delay::FeedbackDelay;
pub use envelope::EnvelopeState;
pub use noise::BreathNoise;
pub use oscillator::OscillatorBank;
