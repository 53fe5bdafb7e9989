//! Additive synthesis engine.
//!
//! Renders a (conditioned) pitch stream with one instrument model, one hop
//! at a time. All per-run state lives in [`SynthState`]: the oscillator
//! phases, the pluck envelope and the breath-noise generator. It is created
//! when a run starts and carried from frame to frame, so consecutive frames
//! join without clicks and independent runs can't observe each other.
//!
//! # Example
//!
//! ```ignore
//! use melodist::{instruments, pitch::PitchStream, synth};
//!
//! let stream = PitchStream::constant(220.0, 20).then(PitchStream::silence(20));
//! let pcm = synth::synthesize(&stream, &instruments::VIOLIN, 22_050, 512);
//! assert_eq!(pcm.samples.len(), 40 * 512);
//! ```
//!
//! Each frame is rendered raw by its family's function in [`family`], then
//! peak-normalized to the frame's target amplitude (0.6 voiced, 0 unvoiced;
//! the pluck family substitutes its envelope level).

mod engine;
pub mod family;

pub use engine::{
    synthesize, synthesize_seeded, AdditiveSynth, FrameParams, SynthState, DEFAULT_NOISE_SEED,
    VOICED_AMPLITUDE,
};
