use std::f64::consts::TAU;

/*
Oscillator Bank
===============

Additive synthesis builds a timbre from sine partials: the fundamental at f
plus harmonics at 2f, 3f, ... each with its own weight. The bank keeps one
running phase per harmonic slot.

Rendering happens one analysis frame (hop) at a time, and the frequency may
change at every frame boundary. If each frame restarted its sines at phase
zero, the waveform would jump at every boundary and click ~43 times a second.
Instead each slot remembers where it stopped:

  frame k                      frame k+1
  ──────────────────────────┬──────────────────────────
  sin(φ + n·Δk), n=0..hop-1 │ sin(φ' + n·Δk+1)
                            │
  φ' = (φ + hop·Δk) mod 2π  ← carried across the boundary

where Δ = 2π·f_h / sample_rate is the per-sample phase increment of the
harmonic. The waveform stays continuous (its slope changes when f does, which
is inaudible), and rendering N frames of a steady tone matches rendering one
N-frame block.

Harmonics at or above Nyquist (sample_rate / 2) would alias back into the
audible band, so they are skipped for that frame and their phase is left
untouched.

Phases are kept in f64 so hours of audio accumulate no visible drift.
*/

/// Number of harmonic slots available to every instrument.
pub const HARMONIC_SLOTS: usize = 10;

/// Running phases for one synthesis run.
#[derive(Debug, Clone)]
pub struct OscillatorBank {
    phases: [f64; HARMONIC_SLOTS],
    sample_rate: f64,
}

impl OscillatorBank {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            phases: [0.0; HARMONIC_SLOTS],
            sample_rate: sample_rate.max(1) as f64,
        }
    }

    pub fn nyquist(&self) -> f32 {
        (self.sample_rate / 2.0) as f32
    }

    /// Current phase of a slot in radians, in `[0, 2π)`.
    pub fn phase(&self, slot: usize) -> f64 {
        self.phases[slot]
    }

    /// Add `weight · sin(φ + n·Δ)` into every sample of `out`, then advance
    /// the slot's phase past the block.
    ///
    /// Returns `false` (and leaves `out` and the phase alone) when `freq` is
    /// at or above Nyquist, or the slot does not exist.
    pub fn accumulate(&mut self, slot: usize, freq: f32, weight: f32, out: &mut [f32]) -> bool {
        if slot >= HARMONIC_SLOTS || freq >= self.nyquist() {
            return false;
        }

        let increment = TAU * freq as f64 / self.sample_rate;
        let start = self.phases[slot];
        for (n, sample) in out.iter_mut().enumerate() {
            *sample += weight * (start + n as f64 * increment).sin() as f32;
        }

        self.phases[slot] = (start + out.len() as f64 * increment).rem_euclid(TAU);
        true
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; HARMONIC_SLOTS];
    }
}
