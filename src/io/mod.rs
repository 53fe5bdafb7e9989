//! External interfaces: WAV files, standard MIDI files, track mixing.
//!
//! Everything here is a thin wrapper. The engine hands over float buffers
//! and note events; these functions put them into containers.

pub mod midi;
pub mod mix;
pub mod wav;

pub use midi::{encode, to_smf_bytes, write_smf, MidiEvent, TimedMidiEvent};
pub use mix::overlay;
pub use wav::{read_wav_mono, resample_linear, write_wav_i16};

/// Mono float samples in [-1, 1] at a known rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate.max(1) as f32
    }
}

/// Mono 16-bit PCM, ready to be written out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pcm16 {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl Pcm16 {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
