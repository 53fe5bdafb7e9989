//! Peak normalization and 16-bit quantization.

/// Largest absolute sample value (0 for an empty buffer).
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Scale in place so the peak absolute value equals `target`.
///
/// A silent buffer is left untouched.
pub fn normalize_peak(samples: &mut [f32], target: f32) {
    let current = peak(samples);
    if current > 0.0 {
        let gain = target / current;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

/// Convert to 16-bit PCM by multiplying by 32767 and truncating toward zero.
///
/// Out-of-range values saturate at the i16 limits.
pub fn quantize_i16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| (s * i16::MAX as f32) as i16).collect()
}
