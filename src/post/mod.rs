//! Post-processing of the synthesized track.
//!
//! ```text
//!   synth ──► feedback delay ──► moving average ──► peak normalize ──► i16
//!             50 ms, g = 0.3      10 samples        0.9                ×32767
//! ```
//!
//! The delay feeds back its own output (`y[n] = x[n] + g·y[n-d]`), so each
//! echo is 0.3× quieter than the one before. The moving average takes the
//! edge off the per-frame amplitude steps the synthesis engine leaves behind.
//! Silence stays silence through every stage.

use tracing::debug;

use crate::config::PostConfig;
use crate::dsp::normalize::{normalize_peak, peak, quantize_i16};
use crate::dsp::smoothing::moving_average;
use crate::dsp::FeedbackDelay;
use crate::io::{Pcm16, PcmBuffer};

/// Delay length in samples for `seconds` at `sample_rate` (truncated).
pub fn delay_samples(seconds: f32, sample_rate: u32) -> usize {
    (seconds.max(0.0) as f64 * sample_rate as f64) as usize
}

/// Reverb, smooth and normalize, stopping short of quantization.
pub fn process(buffer: &PcmBuffer, config: &PostConfig) -> PcmBuffer {
    let mut samples = buffer.samples.clone();

    let mut delay = FeedbackDelay::new(
        delay_samples(config.delay_seconds, buffer.sample_rate),
        config.feedback,
    );
    delay.render(&mut samples);

    let mut samples = moving_average(&samples, config.smoothing_window);
    let before = peak(&samples);
    normalize_peak(&mut samples, config.peak);

    debug!(
        samples = samples.len(),
        delay = delay.delay_samples(),
        peak_before = before,
        "post-processed"
    );

    PcmBuffer::new(samples, buffer.sample_rate)
}

/// Full post-processing chain ending in 16-bit PCM.
pub fn postprocess(buffer: &PcmBuffer, config: &PostConfig) -> Pcm16 {
    let processed = process(buffer, config);
    Pcm16::new(quantize_i16(&processed.samples), processed.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SR: u32 = 22_050;

    #[test]
    fn reference_delay_length() {
        assert_eq!(delay_samples(0.05, SR), 1102);
    }

    #[test]
    fn silence_in_silence_out() {
        let out = postprocess(&PcmBuffer::silence(4096, SR), &PostConfig::default());
        assert_eq!(out.len(), 4096);
        assert!(out.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn output_peak_is_normalized() {
        let tone: Vec<f32> = (0..8192)
            .map(|n| 0.3 * (std::f32::consts::TAU * 440.0 * n as f32 / SR as f32).sin())
            .collect();
        let processed = process(&PcmBuffer::new(tone, SR), &PostConfig::default());
        assert_relative_eq!(peak(&processed.samples), 0.9, epsilon = 1e-6);

        let pcm = quantize_i16(&processed.samples);
        let max = pcm.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!((29_480..=29_491).contains(&max), "max {max}");
    }

    #[test]
    fn impulse_leaves_an_echo() {
        let mut input = vec![0.0f32; 4000];
        input[100] = 1.0;
        let config = PostConfig {
            smoothing_window: 1,
            ..PostConfig::default()
        };
        let out = process(&PcmBuffer::new(input, SR), &config);
        assert_relative_eq!(out.samples[100], 0.9);
        assert_relative_eq!(out.samples[100 + 1102], 0.27, epsilon = 1e-6);
        assert_relative_eq!(out.samples[100 + 2204], 0.081, epsilon = 1e-6);
    }
}
