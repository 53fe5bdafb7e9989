//! One render function per instrument family.
//!
//! Every function adds the raw (un-normalized) waveform for one frame into
//! `out` and returns the amplitude the frame should be normalized to. The
//! engine does the normalization, so a function only has to get the
//! *shape* right.

use std::f32::consts::TAU;

use super::engine::{FrameParams, SynthState};
use crate::instruments::InstrumentModel;

/// Vibrato rate of the bowed family in Hz.
pub const VIBRATO_RATE: f32 = 6.0;
/// Vibrato depth as a fraction of the frequency.
pub const VIBRATO_DEPTH: f32 = 0.02;

/// Sum the model's weighted harmonics of `fundamental` into `out`.
///
/// `damping` scales harmonic `h` (0-based) on top of its table weight.
fn add_partials(
    state: &mut SynthState,
    model: &InstrumentModel,
    fundamental: f32,
    damping: impl Fn(usize) -> f32,
    out: &mut [f32],
) {
    for (h, &weight) in model.harmonics.iter().enumerate() {
        if weight == 0.0 {
            continue;
        }
        let freq = fundamental * (h + 1) as f32;
        state.bank.accumulate(h, freq, weight * damping(h), out);
    }
}

/// Struck/plucked string. Rings on through unvoiced frames until the
/// envelope floors out, and restarts on a pitch change.
pub fn render_pluck(
    state: &mut SynthState,
    model: &InstrumentModel,
    frame: &FrameParams,
    out: &mut [f32],
) -> f32 {
    state.envelope.observe(frame.voiced, frame.frequency);
    let level = state.envelope.level(model.decay_seconds);
    state.envelope.advance(frame.hop_seconds);

    // an unpitched frame keeps ringing at the last attack's pitch
    let fundamental = if frame.frequency > 0.0 {
        frame.frequency
    } else {
        state.envelope.last_frequency
    };
    let envelope = state.envelope;
    add_partials(state, model, fundamental, |h| envelope.damping(h), out);
    level
}

/// Bowed string: sustained, with a 6 Hz vibrato sampled at the frame start.
pub fn render_bowed(
    state: &mut SynthState,
    model: &InstrumentModel,
    frame: &FrameParams,
    out: &mut [f32],
) -> f32 {
    if !frame.voiced {
        return 0.0;
    }
    let vibrato = VIBRATO_DEPTH * (TAU * VIBRATO_RATE * frame.start_seconds).sin();
    add_partials(state, model, frame.frequency * (1.0 + vibrato), |_| 1.0, out);
    frame.target_amplitude()
}

/// Brass: sustained odd-harmonic tone.
pub fn render_brass(
    state: &mut SynthState,
    model: &InstrumentModel,
    frame: &FrameParams,
    out: &mut [f32],
) -> f32 {
    if !frame.voiced {
        return 0.0;
    }
    add_partials(state, model, frame.frequency, |_| 1.0, out);
    frame.target_amplitude()
}

/// Flute and saxophone: tone plus smoothed breath noise at `noise_mix`.
pub fn render_wind(
    state: &mut SynthState,
    model: &InstrumentModel,
    frame: &FrameParams,
    out: &mut [f32],
) -> f32 {
    if !frame.voiced {
        return 0.0;
    }
    add_partials(state, model, frame.frequency, |_| 1.0, out);
    state.noise.accumulate(model.noise_mix, out);
    frame.target_amplitude()
}

/// Plain sine at the fundamental.
pub fn render_generic(
    state: &mut SynthState,
    _model: &InstrumentModel,
    frame: &FrameParams,
    out: &mut [f32],
) -> f32 {
    if !frame.voiced {
        return 0.0;
    }
    state.bank.accumulate(0, frame.frequency, 1.0, out);
    frame.target_amplitude()
}
