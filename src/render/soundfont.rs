//! External MIDI renderer backed by a SoundFont (`rustysynth`).

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustysynth::{MidiFile, MidiFileSequencer, SoundFont, Synthesizer, SynthesizerSettings};
use tracing::debug;

use super::{ExternalRenderer, RenderAttempt};
use crate::error::{Error, Result};
use crate::io::PcmBuffer;

/// Seconds rendered past the last MIDI event so releases can ring out.
pub const RELEASE_TAIL_SECONDS: f64 = 1.0;

pub struct SoundFontRenderer {
    path: PathBuf,
}

impl SoundFontRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_soundfont(&self) -> Result<Arc<SoundFont>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::ExternalSynthUnavailable(format!("cannot open soundfont '{}': {}", self.path.display(), e))
        })?;
        let mut reader = BufReader::new(file);
        SoundFont::new(&mut reader)
            .map(Arc::new)
            .map_err(|e| {
                Error::ExternalSynthUnavailable(format!(
                    "cannot parse soundfont '{}': {}",
                    self.path.display(),
                    e
                ))
            })
    }

    fn try_render(&self, smf: &[u8], sample_rate: u32) -> Result<PcmBuffer> {
        let soundfont = self.load_soundfont()?;

        let settings = SynthesizerSettings::new(sample_rate as i32);
        let synthesizer = Synthesizer::new(&soundfont, &settings)
            .map_err(|e| Error::ExternalSynthUnavailable(format!("synthesizer setup failed: {}", e)))?;

        let midi = MidiFile::new(&mut Cursor::new(smf))
            .map_err(|e| Error::ExternalSynthUnavailable(format!("renderer rejected midi: {}", e)))?;
        let midi = Arc::new(midi);

        let seconds = midi.get_length() + RELEASE_TAIL_SECONDS;
        let len = (seconds * sample_rate as f64).ceil() as usize;

        let mut sequencer = MidiFileSequencer::new(synthesizer);
        sequencer.play(&midi, false);

        let mut left = vec![0.0f32; len];
        let mut right = vec![0.0f32; len];
        sequencer.render(&mut left, &mut right);

        let mono = left.iter().zip(&right).map(|(l, r)| 0.5 * (l + r)).collect();
        debug!(
            soundfont = %self.path.display(),
            seconds,
            samples = len,
            "rendered with soundfont"
        );
        Ok(PcmBuffer::new(mono, sample_rate))
    }
}

impl ExternalRenderer for SoundFontRenderer {
    fn name(&self) -> &str {
        "soundfont"
    }

    fn render(&self, smf: &[u8], sample_rate: u32) -> RenderAttempt {
        let result = if self.path.is_file() {
            self.try_render(smf, sample_rate)
        } else {
            Err(Error::ExternalSynthUnavailable(format!(
                "soundfont not found: {}",
                self.path.display()
            )))
        };
        match result {
            Ok(buffer) => RenderAttempt::Rendered(buffer),
            Err(err) => RenderAttempt::Unavailable(err.to_string()),
        }
    }
}
