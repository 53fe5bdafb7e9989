//! Note events to a standard MIDI file.
//!
//! [`encode`] turns segmented notes into delta-timed channel events; the
//! file writers wrap those in a single-track (format 0) SMF with a tempo
//! meta event up front and end-of-track at the back.

use std::path::Path;

use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::debug;

use crate::config::MAX_TICKS_PER_BEAT;
use crate::error::{Error, Result};
use crate::sequencing::{NoteEvent, TickClock};

/// Note-on velocity for every event.
pub const NOTE_VELOCITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
}

/// A channel event and the ticks since the previous event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMidiEvent {
    pub delta: u32,
    pub event: MidiEvent,
}

impl TimedMidiEvent {
    fn kind(&self) -> TrackEventKind<'static> {
        let (channel, message) = match self.event {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => (
                channel,
                MidiMessage::NoteOn {
                    key: u7::new(key.min(127)),
                    vel: u7::new(velocity.min(127)),
                },
            ),
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => (
                channel,
                MidiMessage::NoteOff {
                    key: u7::new(key.min(127)),
                    vel: u7::new(velocity.min(127)),
                },
            ),
            MidiEvent::ProgramChange { channel, program } => (
                channel,
                MidiMessage::ProgramChange {
                    program: u7::new(program.min(127)),
                },
            ),
        };
        TrackEventKind::Midi {
            channel: u4::new(channel.min(15)),
            message,
        }
    }
}

/// One note-on/note-off pair per event on channel 0, optionally preceded by
/// a program change at delta 0.
///
/// Each note-on's delta is the gap since the previous note ended, so a
/// note's absolute start equals its `start_tick`; each note-off's delta is
/// the note's duration.
pub fn encode(events: &[NoteEvent], program: Option<u8>) -> Vec<TimedMidiEvent> {
    let mut out = Vec::with_capacity(events.len() * 2 + 1);
    if let Some(program) = program {
        out.push(TimedMidiEvent {
            delta: 0,
            event: MidiEvent::ProgramChange {
                channel: 0,
                program: program.min(127),
            },
        });
    }

    let mut cursor = 0u32;
    for note in events {
        out.push(TimedMidiEvent {
            delta: note.start_tick.saturating_sub(cursor),
            event: MidiEvent::NoteOn {
                channel: 0,
                key: note.pitch,
                velocity: NOTE_VELOCITY,
            },
        });
        out.push(TimedMidiEvent {
            delta: note.duration_ticks,
            event: MidiEvent::NoteOff {
                channel: 0,
                key: note.pitch,
                velocity: 0,
            },
        });
        cursor = note.end_tick();
    }

    out
}

fn build_smf(events: &[TimedMidiEvent], clock: &TickClock) -> Smf<'static> {
    let header = Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(clock.ticks_per_beat)),
    );
    let mut smf = Smf::new(header);

    let mut track = Vec::with_capacity(events.len() + 2);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(clock.tempo_us_per_beat))),
    });
    track.extend(events.iter().map(|e| TrackEvent {
        delta: u28::new(e.delta),
        kind: e.kind(),
    }));
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    smf
}

/// Serialize events into SMF bytes.
///
/// A clock whose resolution does not fit the 15-bit header field is an error.
pub fn to_smf_bytes(events: &[TimedMidiEvent], clock: &TickClock) -> Result<Vec<u8>> {
    if clock.ticks_per_beat > MAX_TICKS_PER_BEAT {
        return Err(Error::Midi(format!(
            "{} ticks per beat does not fit a midi header",
            clock.ticks_per_beat
        )));
    }
    let mut bytes = Vec::new();
    build_smf(events, clock)
        .write_std(&mut bytes)
        .map_err(|err| Error::Midi(err.to_string()))?;
    Ok(bytes)
}

/// Write events to `path` as a standard MIDI file.
pub fn write_smf(path: impl AsRef<Path>, events: &[TimedMidiEvent], clock: &TickClock) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_smf_bytes(events, clock)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), events = events.len(), bytes = bytes.len(), "wrote midi");
    Ok(())
}
