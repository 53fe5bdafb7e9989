//! Instrument timbres for the additive synthesis engine.
//!
//! Each instrument is a fixed [`InstrumentModel`]: a harmonic weight table
//! plus an [`InstrumentFamily`] that decides how the harmonics are driven
//! (decaying pluck, vibrato bow, steady brass, breathy wind, plain sine).
//!
//! # Example
//!
//! ```ignore
//! use melodist::instruments;
//!
//! let piano = instruments::lookup("Piano")?;        // exact entry or error
//! let fallback = instruments::resolve("Theremin");  // flute-like default
//! let program = instruments::program_number("Violin"); // 40
//! ```
//!
//! # Unknown names
//!
//! An unknown name is never an error for a conversion request: [`resolve`]
//! answers with the flute model and logs a warning. This matches the program
//! table, which also falls back to the flute program. Callers that want strict
//! validation use [`lookup`].

mod programs;

pub use programs::{program_number, DEFAULT_PROGRAM};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// How an instrument's harmonics are excited over time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentFamily {
    /// Struck/plucked string: attack on pitch change, exponential decay,
    /// upper harmonics die first
    Pluck,
    /// Bowed string: sustained, 6 Hz vibrato, all harmonics
    Bowed,
    /// Brass: sustained, odd harmonics only
    Brass,
    /// Flute/sax: sustained fundamental plus breath noise
    Wind,
    /// Plain sine at the fundamental
    Generic,
}

/// Immutable timbre descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentModel {
    pub name: &'static str,
    /// Weight per harmonic; index 0 is the fundamental
    pub harmonics: &'static [f32],
    pub family: InstrumentFamily,
    /// Pluck decay time constant (time to fall by e³)
    pub decay_seconds: f32,
    /// Breath noise level relative to the tone (wind family)
    pub noise_mix: f32,
}

const BOWED_HARMONICS: [f32; 9] = [
    1.0,
    1.0 / 2.0,
    1.0 / 3.0,
    1.0 / 4.0,
    1.0 / 5.0,
    1.0 / 6.0,
    1.0 / 7.0,
    1.0 / 8.0,
    1.0 / 9.0,
];

const BRASS_HARMONICS: [f32; 9] = [
    1.0,
    0.0,
    1.0 / 3.0,
    0.0,
    1.0 / 5.0,
    0.0,
    1.0 / 7.0,
    0.0,
    1.0 / 9.0,
];

pub const FLUTE: InstrumentModel = InstrumentModel {
    name: "Flute",
    harmonics: &[1.0],
    family: InstrumentFamily::Wind,
    decay_seconds: 1.0,
    noise_mix: 0.15,
};

pub const PIANO: InstrumentModel = InstrumentModel {
    name: "Piano",
    harmonics: &[1.0, 0.5, 0.3, 0.2],
    family: InstrumentFamily::Pluck,
    decay_seconds: 1.5,
    noise_mix: 0.0,
};

pub const GUITAR: InstrumentModel = InstrumentModel {
    name: "Guitar",
    harmonics: &[1.0, 1.0, 0.8, 0.6, 0.4],
    family: InstrumentFamily::Pluck,
    decay_seconds: 1.0,
    noise_mix: 0.0,
};

pub const VIOLIN: InstrumentModel = InstrumentModel {
    name: "Violin",
    harmonics: &BOWED_HARMONICS,
    family: InstrumentFamily::Bowed,
    decay_seconds: 1.0,
    noise_mix: 0.0,
};

pub const TRUMPET: InstrumentModel = InstrumentModel {
    name: "Trumpet",
    harmonics: &BRASS_HARMONICS,
    family: InstrumentFamily::Brass,
    decay_seconds: 1.0,
    noise_mix: 0.0,
};

pub const SAXOPHONE: InstrumentModel = InstrumentModel {
    name: "Saxophone",
    harmonics: &[1.0],
    family: InstrumentFamily::Wind,
    decay_seconds: 1.0,
    noise_mix: 0.3,
};

pub const SINE: InstrumentModel = InstrumentModel {
    name: "Sine",
    harmonics: &[1.0],
    family: InstrumentFamily::Generic,
    decay_seconds: 1.0,
    noise_mix: 0.0,
};

/// Every registered instrument, in display order.
pub static REGISTRY: [InstrumentModel; 7] =
    [FLUTE, PIANO, GUITAR, VIOLIN, TRUMPET, SAXOPHONE, SINE];

/// Model used for names the registry does not know.
pub const DEFAULT_MODEL: InstrumentModel = FLUTE;

/// Find a registered instrument (ASCII case-insensitive).
pub fn lookup(name: &str) -> Result<&'static InstrumentModel> {
    REGISTRY
        .iter()
        .find(|model| model.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| Error::UnsupportedInstrument(name.to_string()))
}

/// Find a registered instrument, falling back to [`DEFAULT_MODEL`].
pub fn resolve(name: &str) -> &'static InstrumentModel {
    match lookup(name) {
        Ok(model) => model,
        Err(err) => {
            warn!(%err, fallback = DEFAULT_MODEL.name, "using default instrument");
            &REGISTRY[0]
        }
    }
}

/// Names of all registered instruments.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|model| model.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("piano").unwrap().name, "Piano");
        assert_eq!(lookup(" VIOLIN ").unwrap().family, InstrumentFamily::Bowed);
    }

    #[test]
    fn unknown_name_is_an_error_for_lookup() {
        assert!(matches!(
            lookup("Theremin"),
            Err(Error::UnsupportedInstrument(name)) if name == "Theremin"
        ));
    }

    #[test]
    fn unknown_name_resolves_to_flute() {
        let model = resolve("Theremin");
        assert_eq!(*model, DEFAULT_MODEL);
        assert_eq!(model.family, InstrumentFamily::Wind);
    }

    #[test]
    fn registry_head_is_default() {
        assert_eq!(REGISTRY[0], DEFAULT_MODEL);
    }

    #[test]
    fn brass_has_only_odd_harmonics() {
        for (i, &w) in TRUMPET.harmonics.iter().enumerate() {
            let harmonic = i + 1;
            if harmonic % 2 == 0 {
                assert_eq!(w, 0.0);
            } else {
                assert!((w - 1.0 / harmonic as f32).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn tables_fit_the_oscillator_bank() {
        for model in REGISTRY.iter() {
            assert!(model.harmonics.len() <= crate::dsp::oscillator::HARMONIC_SLOTS);
            assert!((0.0..=1.0).contains(&model.noise_mix));
            assert!(model.decay_seconds > 0.0);
        }
    }

    #[test]
    fn wind_noise_levels() {
        assert_eq!(FLUTE.noise_mix, 0.15);
        assert_eq!(SAXOPHONE.noise_mix, 0.3);
    }
}
