//! Request-stage benchmarks.
//!
//! Streams are synthetic melodies: short phrases with small gaps, the shape
//! a pitch tracker reports for a hummed tune.

mod post;
mod segment;
mod synthesis;

pub use post::bench_post;
pub use segment::bench_segment;
pub use synthesis::bench_synthesis;

use melodist::PitchStream;

/// Phrases of 20 voiced frames separated by 4-frame gaps, stepping through
/// a pentatonic scale.
pub fn melody(frames: usize) -> PitchStream {
    const SCALE: [f32; 5] = [220.0, 246.94, 277.18, 329.63, 369.99];
    let mut stream = PitchStream::default();
    let mut i = 0;
    while stream.len() < frames {
        stream = stream
            .then(PitchStream::constant(SCALE[i % SCALE.len()], 20))
            .then(PitchStream::silence(4));
        i += 1;
    }
    stream.frames()[..frames].iter().copied().collect()
}
