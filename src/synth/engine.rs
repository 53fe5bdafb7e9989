use tracing::debug;

use super::family;
use crate::dsp::normalize::{normalize_peak, peak};
use crate::dsp::{BreathNoise, EnvelopeState, OscillatorBank};
use crate::instruments::{InstrumentFamily, InstrumentModel};
use crate::io::PcmBuffer;
use crate::pitch::{has_valid_frequency, PitchFrame, PitchStream};

/// Amplitude every voiced frame is normalized to.
pub const VOICED_AMPLITUDE: f32 = 0.6;
/// Seed used by [`synthesize`] for the breath-noise generator.
pub const DEFAULT_NOISE_SEED: u64 = 0x5eed;

/// Everything one synthesis run carries from frame to frame.
///
/// Created at the start of a run and dropped at its end; two runs never
/// share one.
pub struct SynthState {
    pub bank: OscillatorBank,
    pub envelope: EnvelopeState,
    pub noise: BreathNoise,
}

impl SynthState {
    pub fn new(sample_rate: u32, seed: u64) -> Self {
        Self {
            bank: OscillatorBank::new(sample_rate),
            envelope: EnvelopeState::new(),
            noise: BreathNoise::new(seed),
        }
    }
}

/// Per-frame inputs handed to a family renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Fundamental in Hz, always finite (0 when the frame has no pitch)
    pub frequency: f32,
    pub voiced: bool,
    /// Time of the frame's first sample
    pub start_seconds: f32,
    pub hop_seconds: f32,
}

impl FrameParams {
    fn new(frame: &PitchFrame, index: usize, hop_length: usize, sample_rate: u32) -> Self {
        let sr = sample_rate.max(1) as f32;
        // a frame without a usable frequency can't drive the oscillators
        let (frequency, voiced) = if has_valid_frequency(frame.frequency) {
            (frame.frequency, frame.voiced)
        } else {
            (0.0, false)
        };
        Self {
            frequency,
            voiced,
            start_seconds: (index * hop_length) as f32 / sr,
            hop_seconds: hop_length as f32 / sr,
        }
    }

    pub fn target_amplitude(&self) -> f32 {
        if self.voiced {
            VOICED_AMPLITUDE
        } else {
            0.0
        }
    }
}

/// Frame-by-frame additive renderer for one instrument.
pub struct AdditiveSynth {
    model: InstrumentModel,
    sample_rate: u32,
    hop_length: usize,
    state: SynthState,
}

impl AdditiveSynth {
    pub fn new(model: InstrumentModel, sample_rate: u32, hop_length: usize) -> Self {
        Self::with_seed(model, sample_rate, hop_length, DEFAULT_NOISE_SEED)
    }

    pub fn with_seed(model: InstrumentModel, sample_rate: u32, hop_length: usize, seed: u64) -> Self {
        Self {
            model,
            sample_rate,
            hop_length,
            state: SynthState::new(sample_rate, seed),
        }
    }

    pub fn model(&self) -> &InstrumentModel {
        &self.model
    }

    pub fn state(&self) -> &SynthState {
        &self.state
    }

    /// Render frame `index` into `out` (one hop of samples).
    ///
    /// `out` is overwritten. Frames must be fed in order.
    pub fn render_frame(&mut self, frame: &PitchFrame, index: usize, out: &mut [f32]) {
        out.fill(0.0);
        let params = FrameParams::new(frame, index, self.hop_length, self.sample_rate);

        let amplitude = match self.model.family {
            InstrumentFamily::Pluck => family::render_pluck(&mut self.state, &self.model, &params, out),
            InstrumentFamily::Bowed => family::render_bowed(&mut self.state, &self.model, &params, out),
            InstrumentFamily::Brass => family::render_brass(&mut self.state, &self.model, &params, out),
            InstrumentFamily::Wind => family::render_wind(&mut self.state, &self.model, &params, out),
            InstrumentFamily::Generic => {
                family::render_generic(&mut self.state, &self.model, &params, out)
            }
        };

        if amplitude > 0.0 && peak(out) > 0.0 {
            normalize_peak(out, amplitude);
        } else {
            out.fill(0.0);
        }
    }

    /// Render a whole stream, `stream.len() * hop_length` samples.
    pub fn render(&mut self, stream: &PitchStream) -> PcmBuffer {
        let mut samples = vec![0.0f32; stream.len() * self.hop_length];
        if self.hop_length > 0 {
            for (index, (frame, out)) in stream
                .iter()
                .zip(samples.chunks_exact_mut(self.hop_length))
                .enumerate()
            {
                self.render_frame(frame, index, out);
            }
        }

        debug!(
            instrument = self.model.name,
            family = ?self.model.family,
            frames = stream.len(),
            samples = samples.len(),
            "synthesized"
        );

        PcmBuffer::new(samples, self.sample_rate)
    }
}

/// Render `stream` with `model`, using the default noise seed.
pub fn synthesize(
    stream: &PitchStream,
    model: &InstrumentModel,
    sample_rate: u32,
    hop_length: usize,
) -> PcmBuffer {
    AdditiveSynth::new(*model, sample_rate, hop_length).render(stream)
}

/// [`synthesize`] with an explicit breath-noise seed.
pub fn synthesize_seeded(
    stream: &PitchStream,
    model: &InstrumentModel,
    sample_rate: u32,
    hop_length: usize,
    seed: u64,
) -> PcmBuffer {
    AdditiveSynth::with_seed(*model, sample_rate, hop_length, seed).render(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::ATTACK_LEVEL;
    use crate::instruments::{self, GUITAR, PIANO, SAXOPHONE, SINE, TRUMPET, VIOLIN};
    use approx::assert_relative_eq;
    use std::f32::consts::TAU;

    const SR: u32 = 22_050;
    const HOP: usize = 512;

    fn frame_peaks(buffer: &PcmBuffer) -> Vec<f32> {
        buffer.samples.chunks(HOP).map(peak).collect()
    }

    #[test]
    fn all_unvoiced_is_silent_for_every_family() {
        let stream = PitchStream::silence(12);
        for model in instruments::REGISTRY.iter() {
            let out = synthesize(&stream, model, SR, HOP);
            assert_eq!(out.samples.len(), 12 * HOP);
            assert!(out.samples.iter().all(|&s| s == 0.0), "{} not silent", model.name);
        }
    }

    #[test]
    fn generic_matches_reference_example() {
        let stream = PitchStream::constant(220.0, 20).then(PitchStream::silence(20));
        let out = synthesize(&stream, &SINE, SR, HOP);
        assert_eq!(out.samples.len(), 20_480);

        let (tone, rest) = out.samples.split_at(10_240);
        assert!(rest.iter().all(|&s| s == 0.0));
        for p in frame_peaks(&out).iter().take(20) {
            assert_relative_eq!(*p, VOICED_AMPLITUDE, epsilon = 1e-6);
        }

        // each frame is a phase-continuous 220 Hz sine scaled to the target peak
        for (k, frame) in tone.chunks(HOP).enumerate() {
            let unit: Vec<f32> = (0..HOP)
                .map(|n| {
                    let t = (k * HOP + n) as f64 / SR as f64;
                    (std::f64::consts::TAU * 220.0 * t).sin() as f32
                })
                .collect();
            let gain = VOICED_AMPLITUDE / peak(&unit);
            for (s, u) in frame.iter().zip(&unit) {
                assert_relative_eq!(*s, u * gain, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn frames_join_without_clicks() {
        let stream = PitchStream::constant(330.0, 30);
        let out = synthesize(&stream, &SINE, SR, HOP);
        // steepest slope of a 0.6 sine at 330 Hz, with margin for per-frame gain
        let bound = VOICED_AMPLITUDE * TAU * 330.0 / SR as f32 * 1.1;
        for boundary in (HOP..out.samples.len()).step_by(HOP) {
            let delta = (out.samples[boundary] - out.samples[boundary - 1]).abs();
            assert!(delta <= bound, "click at {boundary}: {delta} > {bound}");
        }
    }

    /// Continuous-phase additive tone with one fundamental per frame, each
    /// frame scaled to the voiced peak. Harmonics at or above Nyquist are left out.
    fn reference_tone(fundamentals: &[f64], harmonics: &[f32]) -> Vec<f32> {
        let sr = SR as f64;
        let mut phases = vec![0.0f64; harmonics.len()];
        let mut out = Vec::with_capacity(fundamentals.len() * HOP);
        for &f in fundamentals {
            let mut frame = vec![0.0f64; HOP];
            for (h, &weight) in harmonics.iter().enumerate() {
                let freq = f * (h + 1) as f64;
                if weight == 0.0 || freq >= sr / 2.0 {
                    continue;
                }
                let step = std::f64::consts::TAU * freq / sr;
                for (n, s) in frame.iter_mut().enumerate() {
                    *s += weight as f64 * (phases[h] + n as f64 * step).sin();
                }
                phases[h] += HOP as f64 * step;
            }
            let top = frame.iter().fold(0.0f64, |m, s| m.max(s.abs()));
            out.extend(frame.iter().map(|s| (s / top) as f32 * VOICED_AMPLITUDE));
        }
        out
    }

    fn max_difference(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).fold(0.0, |m, (x, y)| m.max((x - y).abs()))
    }

    #[test]
    fn steady_brass_matches_continuous_reference() {
        let frames = 10;
        let out = synthesize(&PitchStream::constant(261.63, frames), &TRUMPET, SR, HOP);
        let reference = reference_tone(&vec![261.63f32 as f64; frames], TRUMPET.harmonics);
        assert_eq!(out.samples.len(), reference.len());
        assert!(max_difference(&out.samples, &reference) < 1e-3);
    }

    #[test]
    fn bowed_vibrato_bends_pitch_per_frame() {
        let frames = 12;
        let base = 1000.0f64;
        let out = synthesize(&PitchStream::constant(base as f32, frames), &VIOLIN, SR, HOP);

        let bent: Vec<f64> = (0..frames)
            .map(|k| {
                let t = (k * HOP) as f64 / SR as f64;
                base * (1.0 + 0.02 * (std::f64::consts::TAU * 6.0 * t).sin())
            })
            .collect();
        // frame 0 starts at t = 0 and is unbent; frame 2 sits near the vibrato crest
        assert_eq!(bent[0], base);
        assert!(bent[2] > base * 1.019);

        let with_vibrato = reference_tone(&bent, VIOLIN.harmonics);
        let without = reference_tone(&vec![base; frames], VIOLIN.harmonics);
        assert!(max_difference(&out.samples, &with_vibrato) < 1e-3);

        // the first frame agrees with a flat tone, later frames drift away from it
        let first = HOP;
        assert!(max_difference(&out.samples[..first], &without[..first]) < 1e-3);
        let third = 2 * HOP..3 * HOP;
        assert!(max_difference(&out.samples[third.clone()], &without[third]) > 0.1);
    }

    #[test]
    fn harmonics_above_nyquist_are_dropped() {
        let frames = 6;
        let fundamental = 3000.0f32;
        let nyquist = SR as f32 / 2.0;
        let audible = TRUMPET
            .harmonics
            .iter()
            .enumerate()
            .take_while(|(h, _)| fundamental * ((*h + 1) as f32) < nyquist)
            .count();
        assert!(audible < TRUMPET.harmonics.len());

        let full_table: &'static [f32] = TRUMPET.harmonics;
        let cut = InstrumentModel {
            harmonics: &full_table[..audible],
            ..TRUMPET
        };

        let stream = PitchStream::constant(fundamental, frames);
        let full = synthesize(&stream, &TRUMPET, SR, HOP);
        let trimmed = synthesize(&stream, &cut, SR, HOP);
        assert_eq!(full, trimmed);
        assert!(full.samples.iter().any(|&s| s != 0.0));

        let reference = reference_tone(&vec![fundamental as f64; frames], TRUMPET.harmonics);
        assert!(max_difference(&full.samples, &reference) < 1e-3);
    }

    #[test]
    fn pluck_decays_after_release() {
        let stream = PitchStream::constant(220.0, 4).then(PitchStream::silence(120));
        let out = synthesize(&stream, &PIANO, SR, HOP);
        let peaks = frame_peaks(&out);

        assert_relative_eq!(peaks[0], ATTACK_LEVEL, epsilon = 1e-6);
        // keeps ringing through the rest
        assert!(peaks[4] > 0.0);
        for pair in peaks.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-6);
        }
        // 0.8 · e^(-2t) drops under the floor after ~2.2 s, inside 124 frames (~2.9 s)
        assert_eq!(*peaks.last().unwrap(), 0.0);
    }

    #[test]
    fn pluck_retriggers_on_pitch_change_only() {
        let stream = PitchStream::constant(220.0, 10).then(PitchStream::constant(330.0, 10));
        let out = synthesize(&stream, &GUITAR, SR, HOP);
        let peaks = frame_peaks(&out);

        assert!(peaks[9] < peaks[0]);
        assert_relative_eq!(peaks[10], ATTACK_LEVEL, epsilon = 1e-6);
        assert!(peaks[11] < peaks[10]);
    }

    #[test]
    fn sustained_families_hold_target_amplitude() {
        let stream = PitchStream::constant(196.0, 16);
        for model in [VIOLIN, TRUMPET, SAXOPHONE] {
            let out = synthesize(&stream, &model, SR, HOP);
            for p in frame_peaks(&out) {
                assert_relative_eq!(p, VOICED_AMPLITUDE, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn wind_noise_is_seeded() {
        let stream = PitchStream::constant(440.0, 6);
        let a = synthesize_seeded(&stream, &SAXOPHONE, SR, HOP, 1);
        let b = synthesize_seeded(&stream, &SAXOPHONE, SR, HOP, 1);
        let c = synthesize_seeded(&stream, &SAXOPHONE, SR, HOP, 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn undefined_frequency_renders_silence() {
        let stream = PitchStream::new(vec![PitchFrame::voiced(f32::NAN); 3]);
        let out = synthesize(&stream, &PIANO, SR, HOP);
        assert!(out.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_stream_gives_empty_buffer() {
        let out = synthesize(&PitchStream::default(), &SINE, SR, HOP);
        assert!(out.samples.is_empty());
        assert_eq!(out.sample_rate, SR);
    }
}
