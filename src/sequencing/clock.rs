/// Conversion between analysis frames and MIDI ticks.
///
/// MIDI time is counted in ticks: `ticks_per_beat` pulses per quarter note at
/// `tempo_us_per_beat` microseconds per quarter. One analysis frame lasts
/// `hop_length / sample_rate` seconds, which is rounded once to a whole number
/// of ticks. Every note boundary is a multiple of that value, so event
/// timing never drifts relative to the frame grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    /// Pulses per quarter note
    pub ticks_per_beat: u16,
    /// Microseconds per quarter note (500_000 = 120 BPM)
    pub tempo_us_per_beat: u32,
}

impl TickClock {
    pub const DEFAULT: TickClock = TickClock {
        ticks_per_beat: 480,
        tempo_us_per_beat: 500_000,
    };

    pub fn new(ticks_per_beat: u16, tempo_us_per_beat: u32) -> Self {
        Self {
            ticks_per_beat,
            tempo_us_per_beat: tempo_us_per_beat.max(1),
        }
    }

    /// Seconds represented by one tick.
    pub fn seconds_per_tick(&self) -> f64 {
        self.tempo_us_per_beat as f64 * 1e-6 / self.ticks_per_beat.max(1) as f64
    }

    /// Convert seconds to the nearest whole tick.
    pub fn seconds_to_ticks(&self, seconds: f64) -> u32 {
        (seconds / self.seconds_per_tick()).round().max(0.0) as u32
    }

    pub fn ticks_to_seconds(&self, ticks: u32) -> f64 {
        ticks as f64 * self.seconds_per_tick()
    }

    /// Ticks spanned by one analysis frame, never less than one.
    pub fn ticks_per_frame(&self, hop_length: usize, sample_rate: u32) -> u32 {
        let frame_seconds = hop_length as f64 / sample_rate as f64;
        self.seconds_to_ticks(frame_seconds).max(1)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::DEFAULT
    }
}
