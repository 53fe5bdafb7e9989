//! One conversion request, start to finish.
//!
//! ```text
//!   input.wav ─► mono @ 22.05 kHz ─► YIN ─► PitchStream ─┬─► segment ─► encode ─► melody.mid
//!                                                       │                 │
//!                                                       │                 ▼ SMF bytes
//!                                                       └──────────► Renderer ─► <Instrument>.wav
//!                                                                          │
//!                                     original recording ─► overlay ◄──────┘
//!                                                             │
//!                                                             ▼
//!                                                    <stem>_<Instrument>.wav
//! ```
//!
//! Every request owns its buffers and its synthesis state, so requests can
//! run on separate threads. Output paths derive from the input's file stem;
//! two requests for different inputs never write the same file.
//!
//! Only an unreadable or empty input and failed writes end a request.
//! Everything else degrades: no soundfont means additive synthesis, an
//! undecodable original means the mix is the instrument track alone.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::instruments::{self, program_number};
use crate::io::{
    encode, overlay, read_wav_mono, resample_linear, to_smf_bytes, write_smf, write_wav_i16, Pcm16,
    PcmBuffer,
};
use crate::pitch::{PitchStream, PitchTracker, YinTracker};
use crate::render::{RenderPath, Renderer, SoundFontRenderer};
use crate::sequencing::{segment, NoteEvent, TickClock};

/// Name of the MIDI file written next to the instrument track.
pub const MIDI_FILE_NAME: &str = "melody.mid";

/// A single conversion job.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub instrument: String,
    pub out_dir: PathBuf,
    /// Recording mixed under the instrument; `None` uses `input`
    pub mix_source: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, instrument: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            instrument: instrument.into(),
            out_dir: out_dir.into(),
            mix_source: None,
        }
    }

    pub fn with_mix_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.mix_source = Some(path.into());
        self
    }
}

/// Where a request writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub midi: PathBuf,
    pub instrument: PathBuf,
    pub mix: PathBuf,
}

impl OutputPaths {
    /// `<out>/<stem>/melody.mid`, `<out>/<stem>/<Instrument>.wav` and
    /// `<out>/<stem>_<Instrument>.wav`.
    pub fn for_request(input: &Path, out_dir: &Path, instrument: &str) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        let request_dir = out_dir.join(&stem);
        Self {
            midi: request_dir.join(MIDI_FILE_NAME),
            instrument: request_dir.join(format!("{instrument}.wav")),
            mix: out_dir.join(format!("{stem}_{instrument}.wav")),
        }
    }
}

/// What a finished request produced.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub paths: OutputPaths,
    /// Registry entry actually used (the default for unknown names)
    pub instrument: &'static str,
    pub program: u8,
    pub frames: usize,
    pub voiced_frames: usize,
    pub notes: Vec<NoteEvent>,
    pub render_path: RenderPath,
    /// False when the original could not be decoded and the mix is the
    /// instrument track alone
    pub mixed: bool,
}

pub struct Pipeline {
    config: RenderConfig,
    tracker: Box<dyn PitchTracker + Send + Sync>,
}

impl Pipeline {
    pub fn new(config: RenderConfig) -> Self {
        let tracker = Box::new(YinTracker::from_config(&config));
        Self { config, tracker }
    }

    /// Replace the YIN tracker.
    pub fn with_tracker(mut self, tracker: impl PitchTracker + Send + Sync + 'static) -> Self {
        self.tracker = Box::new(tracker);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn clock(&self) -> TickClock {
        TickClock::new(self.config.ticks_per_beat, self.config.tempo_us_per_beat)
    }

    /// Load `path` as mono audio at the analysis rate.
    pub fn load(&self, path: &Path) -> Result<PcmBuffer> {
        let audio = read_wav_mono(path)?;
        if audio.is_empty() {
            return Err(Error::InvalidInput(format!("{} has no samples", path.display())));
        }
        Ok(resample_linear(&audio, self.config.sample_rate))
    }

    /// Pitch-track mono audio that is already at the analysis rate.
    pub fn analyze(&self, audio: &PcmBuffer) -> PitchStream {
        let stream = self.tracker.track(&audio.samples, audio.sample_rate);
        if stream.voiced_count() == 0 {
            warn!(frames = stream.len(), "no voiced frames, output will be silent");
        }
        stream
    }

    /// Note events for a pitch stream on this pipeline's tick grid.
    pub fn transcribe(&self, stream: &PitchStream) -> Vec<NoteEvent> {
        let ticks_per_frame = self
            .clock()
            .ticks_per_frame(self.config.hop_length, self.config.sample_rate);
        segment(stream, ticks_per_frame)
    }

    /// Analyze `input` and write only the MIDI transcription to `midi_path`.
    pub fn transcribe_file(&self, input: &Path, midi_path: &Path) -> Result<Vec<NoteEvent>> {
        let audio = self.load(input)?;
        let notes = self.transcribe(&self.analyze(&audio));
        write_smf(midi_path, &encode(&notes, None), &self.clock())?;
        info!(input = %input.display(), output = %midi_path.display(), notes = notes.len(), "transcribed");
        Ok(notes)
    }

    /// Run a full conversion request.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionReport> {
        let audio = self.load(&request.input)?;
        self.convert_audio(request, &audio)
    }

    /// [`convert`](Self::convert) for audio that is already loaded.
    pub fn convert_audio(&self, request: &ConversionRequest, audio: &PcmBuffer) -> Result<ConversionReport> {
        let model = instruments::resolve(&request.instrument);
        let program = program_number(&request.instrument);
        let label = output_label(request, model.name);
        let paths = OutputPaths::for_request(&request.input, &request.out_dir, &label);

        let stream = self.analyze(audio);
        let notes = self.transcribe(&stream);
        let smf = to_smf_bytes(&encode(&notes, Some(program)), &self.clock())?;
        write_bytes(&paths.midi, &smf)?;

        let soundfont = self.config.soundfont.clone().map(SoundFontRenderer::new);
        let mut renderer = Renderer::new(&self.config);
        if let Some(soundfont) = &soundfont {
            renderer = renderer.with_external(soundfont);
        }
        let outcome = renderer.render(&smf, &stream, model);
        write_wav_i16(&paths.instrument, &outcome.audio)?;

        let mix_source = request.mix_source.as_deref().unwrap_or(&request.input);
        let (mix, mixed) = match self.decode_original(mix_source) {
            Ok(original) => (overlay(&outcome.audio, &original), true),
            Err(err) => {
                warn!(%err, "writing the instrument track without the original");
                (outcome.audio.clone(), false)
            }
        };
        write_wav_i16(&paths.mix, &mix)?;

        info!(
            input = %request.input.display(),
            instrument = model.name,
            notes = notes.len(),
            fallback = outcome.used_fallback(),
            mixed,
            "conversion finished"
        );

        Ok(ConversionReport {
            paths,
            instrument: model.name,
            program,
            frames: stream.len(),
            voiced_frames: stream.voiced_count(),
            notes,
            render_path: outcome.path,
            mixed,
        })
    }

    /// Decode the recording for overlay, as 16-bit PCM at the analysis rate.
    fn decode_original(&self, path: &Path) -> Result<Pcm16> {
        let original = read_wav_mono(path)
            .map_err(|e| Error::MixingFailure(format!("{}: {}", path.display(), e)))?;
        let original = resample_linear(&original, self.config.sample_rate);
        let samples = original
            .samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect();
        debug!(samples = original.len(), "decoded original for overlay");
        Ok(Pcm16::new(samples, original.sample_rate))
    }
}

/// Name used in output files: the instrument as requested, so an unknown
/// name that falls back to the default model never shares paths with a
/// request for the default itself.
fn output_label(request: &ConversionRequest, resolved: &str) -> String {
    let requested: String = request
        .instrument
        .trim()
        .chars()
        .map(|c| if std::path::is_separator(c) { '_' } else { c })
        .collect();
    if requested.is_empty() {
        resolved.to_string()
    } else {
        requested
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_derive_from_stem() {
        let paths = OutputPaths::for_request(Path::new("/data/take 3.wav"), Path::new("/out"), "Violin");
        assert_eq!(paths.midi, PathBuf::from("/out/take 3/melody.mid"));
        assert_eq!(paths.instrument, PathBuf::from("/out/take 3/Violin.wav"));
        assert_eq!(paths.mix, PathBuf::from("/out/take 3_Violin.wav"));
    }

    #[test]
    fn different_inputs_never_share_paths() {
        let a = OutputPaths::for_request(Path::new("a.wav"), Path::new("out"), "Flute");
        let b = OutputPaths::for_request(Path::new("b.wav"), Path::new("out"), "Flute");
        assert_ne!(a.midi, b.midi);
        assert_ne!(a.instrument, b.instrument);
        assert_ne!(a.mix, b.mix);
    }

    #[test]
    fn fallback_instrument_keeps_requested_name_in_paths() {
        let theremin = ConversionRequest::new("take.wav", " Theremin ", "out");
        let flute = ConversionRequest::new("take.wav", "Flute", "out");
        let paths = |r: &ConversionRequest| {
            OutputPaths::for_request(&r.input, &r.out_dir, &output_label(r, "Flute"))
        };
        let (a, b) = (paths(&theremin), paths(&flute));

        assert_eq!(a.instrument, PathBuf::from("out/take/Theremin.wav"));
        assert_eq!(a.mix, PathBuf::from("out/take_Theremin.wav"));
        assert_ne!(a.instrument, b.instrument);
        assert_ne!(a.mix, b.mix);
    }

    #[test]
    fn output_label_never_escapes_the_output_dir() {
        let request = ConversionRequest::new("take.wav", "../Flute", "out");
        assert_eq!(output_label(&request, "Flute"), ".._Flute");
        assert_eq!(output_label(&ConversionRequest::new("take.wav", "  ", "out"), "Flute"), "Flute");
    }

    #[test]
    fn reference_clock_gives_22_ticks_per_frame() {
        let pipeline = Pipeline::new(RenderConfig::default());
        let notes = pipeline.transcribe(&PitchStream::constant(220.0, 20));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].duration_ticks, 20 * 22);
    }
}
