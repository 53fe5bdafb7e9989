//! Note events on a MIDI tick timeline.

pub mod clock;
pub mod segmenter;

pub use clock::TickClock;
pub use segmenter::{segment, NoteEvent, Segmenter};
