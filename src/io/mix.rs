//! Overlay mixing of the instrument track with the original recording.

use super::Pcm16;

/// Sum two tracks sample by sample.
///
/// The result has the shorter track's length; the rest of the longer one is
/// dropped. Sums saturate at the i16 limits instead of wrapping.
pub fn overlay(instrument: &Pcm16, original: &Pcm16) -> Pcm16 {
    let samples = instrument
        .samples
        .iter()
        .zip(&original.samples)
        .map(|(&a, &b)| a.saturating_add(b))
        .collect();
    Pcm16::new(samples, instrument.sample_rate)
}
