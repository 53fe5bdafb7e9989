use tracing::debug;

use crate::pitch::{has_valid_frequency, quantize_to_midi, PitchFrame, PitchStream};

/*
Note Segmentation
=================

The pitch tracker reports one frequency per hop. A MIDI track wants discrete
notes: a key, a start time and a length. The segmenter walks the frames once,
left to right, and turns runs of equal quantized pitch into notes.

  frame     0    1    2    3    4    5    6    7
  voiced    ✓    ✓    ✓    ✗    ✗    ✓    ✓    ✓
  pitch     57   57   57   -    -    57   59   59
            └─ note 57 ─┘   rest    └57┘ └─59─┘
  start     0                      5·t  6·t
  length    3·t                    1·t  2·t         (t = ticks per frame)

State Machine
-------------

    ┌──────┐  voiced p     ┌──────────┐  voiced p (same)
    │ Rest │ ────────────→ │ Sounding │ ───────────────┐
    └──────┘               │ (pitch p)│ ←──────────────┘
       ↑ │                 └──────────┘
       │ │ unvoiced            │    │ voiced q ≠ p: close p, open q
       │ └──────┐              │    └───────────────────────┐
       │        ↓              │ unvoiced: close p          │
       │   (rest grows)        ↓                            ↓
       └────────────────── emit NoteEvent ←─────────────────┘

Closing a note emits the ticks accumulated since it opened. The frame that
closed it (unvoiced or new pitch) seeds the next accumulator with one frame,
so a note never has zero length and note starts land exactly on
`frame_index * ticks_per_frame`.

Quantization uses the nearest semitone (69 + 12·log2(f/440), rounded and
clamped to 0..=127). Vibrato or drift that stays inside ±50 cents of one key
never re-triggers; a slide across a semitone boundary splits the note.
*/

/// A quantized note on the tick timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Note start in ticks from the beginning of the stream
    pub start_tick: u32,
    /// Note length in ticks, always > 0
    pub duration_ticks: u32,
}

impl NoteEvent {
    pub fn end_tick(&self) -> u32 {
        self.start_tick + self.duration_ticks
    }
}

/// Open note while scanning.
#[derive(Debug, Clone, Copy)]
struct Sounding {
    pitch: u8,
    start_tick: u32,
}

/// Incremental segmenter. Feed frames in temporal order, then `finish`.
#[derive(Debug)]
pub struct Segmenter {
    ticks_per_frame: u32,
    /// Tick at which the next frame begins
    cursor: u32,
    /// Ticks accumulated by the open note, or by the pending rest
    accumulated: u32,
    sounding: Option<Sounding>,
    events: Vec<NoteEvent>,
}

impl Segmenter {
    pub fn new(ticks_per_frame: u32) -> Self {
        Self {
            ticks_per_frame: ticks_per_frame.max(1),
            cursor: 0,
            accumulated: 0,
            sounding: None,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: &PitchFrame) {
        let pitch = (frame.voiced && has_valid_frequency(frame.frequency))
            .then(|| quantize_to_midi(frame.frequency));

        match (self.sounding, pitch) {
            (Some(_), None) => {
                self.close();
                self.accumulated = self.ticks_per_frame;
            }
            (None, None) => {
                self.accumulated += self.ticks_per_frame;
            }
            (Some(open), Some(p)) if open.pitch == p => {
                self.accumulated += self.ticks_per_frame;
            }
            (_, Some(p)) => {
                self.close();
                self.sounding = Some(Sounding {
                    pitch: p,
                    start_tick: self.cursor,
                });
                self.accumulated = self.ticks_per_frame;
            }
        }

        self.cursor += self.ticks_per_frame;
    }

    /// Close any open note and return the events.
    pub fn finish(mut self) -> Vec<NoteEvent> {
        self.close();
        self.events
    }

    fn close(&mut self) {
        if let Some(open) = self.sounding.take() {
            debug_assert_eq!(open.start_tick + self.accumulated, self.cursor);
            self.events.push(NoteEvent {
                pitch: open.pitch,
                start_tick: open.start_tick,
                duration_ticks: self.accumulated,
            });
        }
    }
}

/// Segment a pitch stream into non-overlapping, time-ordered note events.
pub fn segment(stream: &PitchStream, ticks_per_frame: u32) -> Vec<NoteEvent> {
    let mut segmenter = Segmenter::new(ticks_per_frame);
    for frame in stream.iter() {
        segmenter.push(frame);
    }
    let events = segmenter.finish();

    debug!(
        frames = stream.len(),
        notes = events.len(),
        ticks_per_frame,
        "segmented pitch stream"
    );
    events
}
