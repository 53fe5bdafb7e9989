//! Monophonic pitch tracking.
//!
//! The rest of the crate only depends on the [`PitchTracker`] trait; any
//! estimator that yields one [`PitchFrame`] per hop can stand in for
//! [`YinTracker`].
//!
//! ## YIN
//!
//! For every frame of `frame_length` samples with integration window `W`:
//!
//! 1. **Difference function** `d(τ) = Σ (x[j] - x[j+τ])²`, expanded as
//!    `E(0) + E(τ) - 2·r(τ)` where `E` are window energies (prefix sums) and
//!    `r` is the cross-correlation of the first `W` samples against the
//!    frame. `r` comes from one forward FFT pair and one inverse FFT.
//! 2. **Cumulative mean normalization** `d'(τ) = d(τ)·τ / Σ_{j≤τ} d(j)`.
//! 3. **Absolute threshold**: first local minimum of `d'` under the threshold
//!    inside `[sr/fmax, sr/fmin]`. No dip means unvoiced.
//! 4. **Parabolic interpolation** around the chosen lag.
//!
//! Frames are centered: the signal is zero padded by `frame_length / 2` on
//! both sides, so a signal of `n` samples yields `1 + n / hop` frames and
//! frame `i` is centered on sample `i * hop`.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::debug;

use super::{PitchFrame, PitchStream};
use crate::config::RenderConfig;

/// Frames quieter than this RMS are reported unvoiced without analysis.
const SILENCE_RMS: f32 = 1e-3;

/// Produces a fixed-hop pitch estimate for a mono signal.
pub trait PitchTracker {
    fn track(&self, samples: &[f32], sample_rate: u32) -> PitchStream;
}

/// YIN pitch tracker with FFT-based difference function.
#[derive(Debug, Clone)]
pub struct YinTracker {
    frame_length: usize,
    hop_length: usize,
    fmin: f32,
    fmax: f32,
    threshold: f32,
}

impl YinTracker {
    pub fn new(frame_length: usize, hop_length: usize, fmin: f32, fmax: f32) -> Self {
        Self {
            frame_length: frame_length.max(4),
            hop_length: hop_length.max(1),
            fmin,
            fmax,
            threshold: 0.15,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.frame_length, config.hop_length, config.fmin, config.fmax)
    }

    /// Set the aperiodicity threshold (0.01 - 0.5). Lower is stricter.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.01, 0.5);
        self
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Number of frames produced for a signal of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        1 + len / self.hop_length
    }
}

impl Default for YinTracker {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl PitchTracker for YinTracker {
    fn track(&self, samples: &[f32], sample_rate: u32) -> PitchStream {
        let sr = sample_rate as f32;
        let max_period = ((sr / self.fmin) as usize).min(self.frame_length / 2);
        let min_period = ((sr / self.fmax) as usize).max(2);
        let frame_count = self.frame_count(samples.len());

        if max_period <= min_period + 1 {
            debug!(
                max_period,
                min_period, "pitch search range is empty, reporting silence"
            );
            return PitchStream::silence(frame_count);
        }

        let mut analyzer = FrameAnalyzer::new(self.frame_length, max_period);

        let pad = self.frame_length / 2;
        let mut padded = vec![0.0f32; samples.len() + self.frame_length];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let stream: PitchStream = (0..frame_count)
            .map(|i| {
                let start = i * self.hop_length;
                let frame = &padded[start..start + self.frame_length];
                match analyzer.period(frame, min_period, self.threshold) {
                    Some(period) => PitchFrame::voiced(sr / period),
                    None => PitchFrame::unvoiced(),
                }
            })
            .collect();

        debug!(
            frames = stream.len(),
            voiced = stream.voiced_count(),
            "pitch tracking finished"
        );
        stream
    }
}

/// Per-run scratch space and FFT plans.
struct FrameAnalyzer {
    window: usize,
    max_period: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    frame_spectrum: Vec<Complex<f32>>,
    window_spectrum: Vec<Complex<f32>>,
    prefix_energy: Vec<f64>,
    cmnd: Vec<f32>,
}

impl FrameAnalyzer {
    fn new(frame_length: usize, max_period: usize) -> Self {
        let window = frame_length - max_period;
        let fft_len = (frame_length + window).next_power_of_two();
        let mut planner = FftPlanner::<f32>::new();

        Self {
            window,
            max_period,
            forward: planner.plan_fft_forward(fft_len),
            inverse: planner.plan_fft_inverse(fft_len),
            frame_spectrum: vec![Complex::default(); fft_len],
            window_spectrum: vec![Complex::default(); fft_len],
            prefix_energy: vec![0.0; frame_length + 1],
            cmnd: vec![1.0; max_period + 1],
        }
    }

    /// Fundamental period in (fractional) samples, or `None` when unvoiced.
    fn period(&mut self, frame: &[f32], min_period: usize, threshold: f32) -> Option<f32> {
        for (i, &x) in frame.iter().enumerate() {
            self.prefix_energy[i + 1] = self.prefix_energy[i] + (x as f64) * (x as f64);
        }
        let energy = |start: usize, len: usize| self.prefix_energy[start + len] - self.prefix_energy[start];

        let window_energy = energy(0, self.window);
        let rms = (window_energy / self.window as f64).sqrt() as f32;
        if rms < SILENCE_RMS {
            return None;
        }

        // r(τ) = Σ_j w[j]·x[j+τ]  =  IFFT(X · conj(W))
        for (i, bin) in self.frame_spectrum.iter_mut().enumerate() {
            *bin = Complex::new(frame.get(i).copied().unwrap_or(0.0), 0.0);
        }
        for (i, bin) in self.window_spectrum.iter_mut().enumerate() {
            let x = if i < self.window { frame[i] } else { 0.0 };
            *bin = Complex::new(x, 0.0);
        }
        self.forward.process(&mut self.frame_spectrum);
        self.forward.process(&mut self.window_spectrum);
        for (x, w) in self.frame_spectrum.iter_mut().zip(&self.window_spectrum) {
            *x *= w.conj();
        }
        self.inverse.process(&mut self.frame_spectrum);
        let scale = 1.0 / self.frame_spectrum.len() as f32;

        self.cmnd[0] = 1.0;
        let mut running_sum = 0.0f64;
        for tau in 1..=self.max_period {
            let r = (self.frame_spectrum[tau].re * scale) as f64;
            let d = (window_energy + energy(tau, self.window) - 2.0 * r).max(0.0);
            running_sum += d;
            self.cmnd[tau] = if running_sum > 1e-12 {
                (d * tau as f64 / running_sum) as f32
            } else {
                1.0
            };
        }

        let tau = self.first_dip(min_period, threshold)?;
        Some(self.refine(tau))
    }

    /// First local minimum of the normalized difference below `threshold`.
    fn first_dip(&self, min_period: usize, threshold: f32) -> Option<usize> {
        let mut tau = min_period;
        while tau < self.max_period {
            if self.cmnd[tau] < threshold {
                while tau + 1 < self.max_period && self.cmnd[tau + 1] < self.cmnd[tau] {
                    tau += 1;
                }
                return Some(tau);
            }
            tau += 1;
        }
        None
    }

    fn refine(&self, tau: usize) -> f32 {
        if tau < 1 || tau + 1 > self.max_period {
            return tau as f32;
        }
        let (s0, s1, s2) = (self.cmnd[tau - 1], self.cmnd[tau], self.cmnd[tau + 1]);
        let denom = s0 + s2 - 2.0 * s1;
        if denom.abs() < 1e-9 {
            return tau as f32;
        }
        let shift = 0.5 * (s0 - s2) / denom;
        tau as f32 + shift.clamp(-1.0, 1.0)
    }
}
