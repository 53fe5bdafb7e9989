pub mod config;
pub mod dsp; // Oscillators, envelopes, delay, smoothing
pub mod error;
pub mod instruments; // Timbre descriptors and program numbers
pub mod io;
pub mod pipeline;
pub mod pitch; // Pitch frames and the tracker boundary
pub mod post;
pub mod render; // External soundfont path with additive fallback
pub mod sequencing; // Note segmentation and tick timing
pub mod synth; // Additive synthesis engine
pub mod voicing;

pub use config::{PostConfig, RenderConfig};
pub use error::{Error, Result};
pub use instruments::{InstrumentFamily, InstrumentModel};
pub use pitch::{PitchFrame, PitchStream};
pub use sequencing::NoteEvent;

/// Analysis and output sample rate of the reference configuration.
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;
/// Samples between consecutive analysis frames.
pub const DEFAULT_HOP_LENGTH: usize = 512;
