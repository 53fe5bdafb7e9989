//! Render configuration.
//!
//! Every field defaults to the reference configuration (22.05 kHz analysis,
//! 512-sample hop, 480 PPQ at 120 BPM). With the `serde` feature the structs
//! load from TOML, and any missing field keeps its default:
//!
//! ```toml
//! gap_limit_frames = 6
//! soundfont = "assets/GeneralUser.sf2"
//!
//! [post]
//! feedback = 0.2
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{DEFAULT_HOP_LENGTH, DEFAULT_SAMPLE_RATE};

/// Lowest tracked pitch (C2).
pub const DEFAULT_FMIN: f32 = 65.406;
/// Highest tracked pitch (C6).
pub const DEFAULT_FMAX: f32 = 1046.502;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Analysis and output sample rate in Hz
    pub sample_rate: u32,
    /// Samples advanced between analysis frames
    pub hop_length: usize,
    /// Pitch tracker analysis window in samples
    pub frame_length: usize,
    pub fmin: f32,
    pub fmax: f32,
    /// Unvoiced runs shorter than this are bridged (legato)
    pub gap_limit_frames: usize,
    /// MIDI resolution (pulses per quarter note)
    pub ticks_per_beat: u16,
    /// MIDI tempo in microseconds per quarter note
    pub tempo_us_per_beat: u32,
    /// Seed for the breath-noise generator
    pub noise_seed: u64,
    /// Soundfont for the external renderer; `None` skips straight to additive synthesis
    pub soundfont: Option<PathBuf>,
    pub post: PostConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            hop_length: DEFAULT_HOP_LENGTH,
            frame_length: 2048,
            fmin: DEFAULT_FMIN,
            fmax: DEFAULT_FMAX,
            gap_limit_frames: 10,
            ticks_per_beat: 480,
            tempo_us_per_beat: 500_000,
            noise_seed: 0x6d65_6c6f,
            soundfont: None,
            post: PostConfig::default(),
        }
    }
}

/// Largest resolution a standard MIDI header can express (15 bits).
pub const MAX_TICKS_PER_BEAT: u16 = 0x7fff;

impl RenderConfig {
    /// Duration of one analysis frame in seconds.
    pub fn hop_seconds(&self) -> f64 {
        self.hop_length as f64 / self.sample_rate as f64
    }

    /// Reject values the pipeline cannot honor.
    pub fn validate(&self) -> crate::Result<()> {
        if self.ticks_per_beat == 0 || self.ticks_per_beat > MAX_TICKS_PER_BEAT {
            return Err(crate::Error::Config(format!(
                "ticks_per_beat must be in 1..={}, got {}",
                MAX_TICKS_PER_BEAT, self.ticks_per_beat
            )));
        }
        if self.sample_rate == 0 || self.hop_length == 0 {
            return Err(crate::Error::Config(
                "sample_rate and hop_length must be non-zero".into(),
            ));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}

/// Post-processing parameters (reverb, smoothing, normalization).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostConfig {
    /// Feedback delay length in seconds
    pub delay_seconds: f32,
    /// Feedback gain of the delay loop
    pub feedback: f32,
    /// Moving-average window in samples
    pub smoothing_window: usize,
    /// Peak absolute amplitude after normalization
    pub peak: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            delay_seconds: 0.05,
            feedback: 0.3,
            smoothing_window: 10,
            peak: 0.9,
        }
    }
}
