//! Instrument track rendering: external renderer first, additive engine second.
//!
//! ```text
//!   notes ─► SMF bytes ─► ExternalRenderer::render ─┬─ Rendered(pcm) ──────────► clip + i16
//!                                                   │
//!                                                   └─ Unavailable(reason)
//!                                                        │ warn!
//!   pitch stream ─► condition ─► synthesize ─► post-process ─────────────────► i16
//! ```
//!
//! The choice is an explicit value ([`RenderAttempt`]), not an error path.
//! A missing soundfont or a renderer failure is a normal outcome that the
//! [`Renderer`] answers by running the additive engine. Either way a
//! [`RenderOutcome`] comes back, tagged with the path that produced it.

mod soundfont;

pub use soundfont::{SoundFontRenderer, RELEASE_TAIL_SECONDS};

use tracing::{info, warn};

use crate::config::RenderConfig;
use crate::dsp::normalize::quantize_i16;
use crate::instruments::InstrumentModel;
use crate::io::{Pcm16, PcmBuffer};
use crate::pitch::PitchStream;
use crate::post::postprocess;
use crate::synth::synthesize_seeded;
use crate::voicing::condition;

/// Result of asking an external renderer for audio.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderAttempt {
    Rendered(PcmBuffer),
    /// The renderer could not run; the reason is logged by the dispatcher
    Unavailable(String),
}

/// Something that turns a standard MIDI file into audio.
pub trait ExternalRenderer {
    fn name(&self) -> &str;
    fn render(&self, smf: &[u8], sample_rate: u32) -> RenderAttempt;
}

/// Which stage produced the instrument track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPath {
    External(String),
    /// Additive fallback, with the reason the external stage was skipped
    Additive { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub audio: Pcm16,
    pub path: RenderPath,
}

impl RenderOutcome {
    pub fn used_fallback(&self) -> bool {
        matches!(self.path, RenderPath::Additive { .. })
    }
}

/// Two-stage dispatcher.
pub struct Renderer<'a> {
    external: Option<&'a dyn ExternalRenderer>,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            external: None,
            config,
        }
    }

    pub fn with_external(mut self, external: &'a dyn ExternalRenderer) -> Self {
        self.external = Some(external);
        self
    }

    /// Try the external renderer on `smf`; fall back to resynthesizing the
    /// raw `stream` with `model`.
    pub fn render(&self, smf: &[u8], stream: &PitchStream, model: &InstrumentModel) -> RenderOutcome {
        let attempt = match self.external {
            Some(external) => external.render(smf, self.config.sample_rate),
            None => RenderAttempt::Unavailable("no external renderer configured".into()),
        };

        match attempt {
            RenderAttempt::Rendered(buffer) => {
                let name = self.external.map(|e| e.name()).unwrap_or("external").to_string();
                info!(renderer = %name, samples = buffer.len(), "instrument track rendered externally");
                RenderOutcome {
                    audio: Pcm16::new(quantize_i16(&buffer.samples), buffer.sample_rate),
                    path: RenderPath::External(name),
                }
            }
            RenderAttempt::Unavailable(reason) => {
                warn!(%reason, instrument = model.name, "external synth unavailable, using additive engine");
                RenderOutcome {
                    audio: self.additive(stream, model),
                    path: RenderPath::Additive { reason },
                }
            }
        }
    }

    /// Condition, synthesize and post-process `stream`.
    pub fn additive(&self, stream: &PitchStream, model: &InstrumentModel) -> Pcm16 {
        let config = self.config;
        let cleaned = condition(stream, config.gap_limit_frames);
        let raw = synthesize_seeded(
            &cleaned,
            model,
            config.sample_rate,
            config.hop_length,
            config.noise_seed,
        );
        postprocess(&raw, &config.post)
    }
}
