/*
Pluck Envelope
==============

Plucked and struck strings (guitar, piano) do not sustain: the string is
excited once and then rings down. This envelope models that with two pieces
of state carried from frame to frame.

Vocabulary
----------

  attack            The moment the string is excited. Amplitude jumps to
                    ATTACK_LEVEL and the decay clock restarts at zero.

  time_since_attack Seconds since the last attack. Drives both the overall
                    decay and the per-harmonic damping.

  retrigger         A new attack caused by a pitch change. The melody comes
                    from a pitch tracker, not a keyboard, so there are no
                    note-on messages; a voiced frame whose frequency moved more
                    than 5% from the last attack's frequency counts as a new
                    pluck.


The Shape: Exponential Decay
----------------------------

  level
   0.8 ┐╲
       │ ╲
       │  ╲__
       │     ╲___
  0.01 │─────────╲────── floor: below this the envelope snaps to 0
     0 └──────────────→ t
       attack

    level(t) = active_amplitude · exp(-(3 / decay_seconds) · t)

decay_seconds is the time for the level to fall by e³ (≈ -26 dB).


Harmonic Damping
----------------

Real strings lose their upper partials faster than the fundamental. Harmonic
h (0-based, so the fundamental is h = 0 and never damped) is scaled by

    1 / (1 + 8 · h · t)

which dulls the timbre as the note rings out.


Ordering Within a Frame
-----------------------

  1. observe():  maybe retrigger (voiced and pitch moved > 5%)
  2. level():    envelope at the frame start time
  3. advance():  clock moves forward by one hop
  4. damping():  per-harmonic damping at the frame end time

The clock advances on every frame, voiced or not; unvoiced frames let the
string keep ringing down rather than cutting it off.
*/

/// Level set by an attack.
pub const ATTACK_LEVEL: f32 = 0.8;
/// Relative pitch change that counts as a new pluck.
pub const RETRIGGER_RATIO: f32 = 0.05;
/// Levels below this are silenced.
pub const ENVELOPE_FLOOR: f32 = 0.01;
/// Damping slope per harmonic index per second.
const DAMPING_RATE: f32 = 8.0;

/// Decay state for the pluck family, carried across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeState {
    /// Seconds since the last attack
    pub time_since_attack: f32,
    /// Level at the last attack (0 before the first one)
    pub active_amplitude: f32,
    /// Frequency of the last attack
    pub last_frequency: f32,
}

impl EnvelopeState {
    pub fn new() -> Self {
        Self {
            time_since_attack: 0.0,
            active_amplitude: 0.0,
            last_frequency: 0.0,
        }
    }

    /// Retrigger when a voiced frame's pitch moved away from the last attack.
    ///
    /// Returns true when a new attack started.
    pub fn observe(&mut self, voiced: bool, frequency: f32) -> bool {
        let moved = (frequency - self.last_frequency).abs() > frequency * RETRIGGER_RATIO;
        if voiced && moved {
            self.time_since_attack = 0.0;
            self.active_amplitude = ATTACK_LEVEL;
            self.last_frequency = frequency;
            return true;
        }
        false
    }

    /// Envelope level at the current clock position.
    pub fn level(&self, decay_seconds: f32) -> f32 {
        let rate = 3.0 / decay_seconds.max(f32::EPSILON);
        let level = self.active_amplitude * (-rate * self.time_since_attack).exp();
        if level < ENVELOPE_FLOOR {
            0.0
        } else {
            level
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, seconds: f32) {
        self.time_since_attack += seconds;
    }

    /// Weight multiplier for harmonic `index` (0 = fundamental).
    pub fn damping(&self, index: usize) -> f32 {
        1.0 / (1.0 + index as f32 * DAMPING_RATE * self.time_since_attack)
    }
}

impl Default for EnvelopeState {
    fn default() -> Self {
        Self::new()
    }
}
