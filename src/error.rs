//! Error types for melodist

use std::io;
use thiserror::Error;

/// Errors surfaced by the conversion pipeline.
///
/// Only `Io`, `Wav` and `InvalidInput` on the source signal end a request.
/// The remaining kinds describe degradations: they are logged and the
/// request continues with a fallback.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WAV decode or encode failure
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// MIDI encoding failure
    #[error("MIDI error: {0}")]
    Midi(String),

    /// Empty or unusable input signal
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Instrument name not present in the registry
    #[error("Unsupported instrument: {0}")]
    UnsupportedInstrument(String),

    /// Soundfont missing or the external renderer failed
    #[error("External synthesizer unavailable: {0}")]
    ExternalSynthUnavailable(String),

    /// Original recording could not be decoded for overlay
    #[error("Mixing failed: {0}")]
    MixingFailure(String),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for melodist operations
pub type Result<T> = std::result::Result<T, Error>;
