//! Pitch frames: the boundary between pitch tracking and everything else.
//!
//! A [`PitchStream`] is one estimate per hop, in temporal order. Frame `i`
//! covers samples `i * hop_length .. (i + 1) * hop_length`; nothing downstream
//! stores timestamps, all timing is derived from the frame index.

pub mod tracker;

pub use tracker::{PitchTracker, YinTracker};

/// One analysis frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchFrame {
    /// Fundamental frequency in Hz. NaN when the tracker found no pitch.
    pub frequency: f32,
    pub voiced: bool,
}

impl PitchFrame {
    pub fn voiced(frequency: f32) -> Self {
        Self {
            frequency,
            voiced: true,
        }
    }

    pub fn unvoiced() -> Self {
        Self {
            frequency: f32::NAN,
            voiced: false,
        }
    }

    /// True when the frame is voiced and carries a usable frequency.
    pub fn has_pitch(&self) -> bool {
        self.voiced && has_valid_frequency(self.frequency)
    }
}

/// Frequencies the segmenter and conditioner treat as defined.
#[inline]
pub(crate) fn has_valid_frequency(freq: f32) -> bool {
    freq.is_finite() && freq > 0.0
}

/// Fixed-hop sequence of pitch frames.
///
/// Immutable once built; the voicing conditioner returns a new stream
/// instead of editing one in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchStream {
    frames: Vec<PitchFrame>,
}

impl PitchStream {
    pub fn new(frames: Vec<PitchFrame>) -> Self {
        Self { frames }
    }

    /// Zip a frequency track and a voicing track (the shape pitch trackers
    /// usually report). Extra entries in the longer slice are dropped.
    pub fn from_parts(frequencies: &[f32], voiced: &[bool]) -> Self {
        let frames = frequencies
            .iter()
            .zip(voiced)
            .map(|(&frequency, &voiced)| PitchFrame { frequency, voiced })
            .collect();
        Self { frames }
    }

    /// `frames` voiced frames at a fixed frequency.
    pub fn constant(frequency: f32, frames: usize) -> Self {
        Self {
            frames: vec![PitchFrame::voiced(frequency); frames],
        }
    }

    /// `frames` unvoiced frames.
    pub fn silence(frames: usize) -> Self {
        Self {
            frames: vec![PitchFrame::unvoiced(); frames],
        }
    }

    /// Append another stream, returning the concatenation.
    pub fn then(mut self, other: PitchStream) -> Self {
        self.frames.extend(other.frames);
        self
    }

    pub fn frames(&self) -> &[PitchFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PitchFrame> {
        self.frames.iter()
    }

    pub fn voiced_count(&self) -> usize {
        self.frames.iter().filter(|f| f.voiced).count()
    }
}

impl FromIterator<PitchFrame> for PitchStream {
    fn from_iter<I: IntoIterator<Item = PitchFrame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

/// Continuous MIDI pitch for a frequency. A4 = 440 Hz = 69.
#[inline]
pub fn hz_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * (freq / 440.0).log2()
}

/// Nearest MIDI note, clamped to 0..=127.
#[inline]
pub fn quantize_to_midi(freq: f32) -> u8 {
    hz_to_midi(freq).round().clamp(0.0, 127.0) as u8
}

/// Convert MIDI note number to frequency in Hz.
#[inline]
pub fn midi_to_hz(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Note name with sharp notation (e.g. "A3", "C#5").
pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let name = NAMES[(note % 12) as usize];
    let octave = (note / 12) as i32 - 1;
    format!("{}{}", name, octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a220_quantizes_to_57() {
        assert_eq!(quantize_to_midi(220.0), 57);
        assert_eq!(note_name(57), "A3");
    }

    #[test]
    fn quantization_rounds_to_nearest_semitone() {
        // 20 cents sharp of A4 still reads as A4, 60 cents sharp reads as A#4
        assert_eq!(quantize_to_midi(440.0 * 2.0_f32.powf(0.2 / 12.0)), 69);
        assert_eq!(quantize_to_midi(440.0 * 2.0_f32.powf(0.6 / 12.0)), 70);
    }

    #[test]
    fn quantization_clamps_to_midi_range() {
        assert_eq!(quantize_to_midi(1.0), 0);
        assert_eq!(quantize_to_midi(40_000.0), 127);
    }

    #[test]
    fn midi_round_trip_is_exact_on_semitones() {
        for note in [21u8, 48, 60, 69, 100] {
            assert_eq!(quantize_to_midi(midi_to_hz(note)), note);
        }
    }

    #[test]
    fn unvoiced_frame_has_no_pitch() {
        assert!(!PitchFrame::unvoiced().has_pitch());
        assert!(!PitchFrame {
            frequency: 220.0,
            voiced: false
        }
        .has_pitch());
        assert!(!PitchFrame::voiced(f32::NAN).has_pitch());
        assert!(PitchFrame::voiced(220.0).has_pitch());
    }

    #[test]
    fn from_parts_zips_tracks() {
        let stream = PitchStream::from_parts(&[220.0, f32::NAN, 330.0], &[true, false, true]);
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.voiced_count(), 2);
        assert!(stream.frames()[1].frequency.is_nan());
    }
}
