//! Cleans a raw pitch stream before it is handed to the synthesis engine.
//!
//! ```text
//!   raw:       220 220  ·   ·  220 220 ·  ·  ·  ·  ·  ·  ·  ·  ·  ·  330
//!   repaired:  220 220 220 220 220 220 ... linear ramp 220 → 330 ... 330
//!   voiced:     ■   ■   ■   ■   ■   ■  □  □  □  □  □  □  □  □  □  □   ■
//!                      └─ gap of 2 < limit: filled   └─ gap of 10: a rest
//! ```
//!
//! Two independent passes:
//!
//! - **Frequency repair** fills every undefined frequency by linear
//!   interpolation between the nearest defined neighbours (held constant
//!   past either end), then smooths the whole track with a 5-frame moving
//!   average. A stream with no defined frequency at all becomes all zeros.
//! - **Legato gap fill** reclassifies unvoiced runs shorter than the gap
//!   limit as voiced, so tracker dropouts inside a phrase don't chop the
//!   resynthesized tone. A run only counts as a gap when a voiced frame
//!   follows it; unvoiced frames at the end of the stream stay unvoiced.
//!
//! The output has the same length as the input. Only `frequency` and
//! `voiced` change.

use tracing::debug;

use crate::dsp::smoothing::moving_average;
use crate::pitch::{has_valid_frequency, PitchFrame, PitchStream};

/// Default legato gap limit in frames.
pub const DEFAULT_GAP_LIMIT: usize = 10;
/// Moving-average width applied to the repaired frequency track.
pub const FREQUENCY_SMOOTHING: usize = 5;

/// Repair, smooth and gap-fill a pitch stream.
pub fn condition(stream: &PitchStream, gap_limit_frames: usize) -> PitchStream {
    let frequencies: Vec<f32> = stream.iter().map(|f| f.frequency).collect();
    let voiced: Vec<bool> = stream.iter().map(|f| f.voiced).collect();

    let frequencies = moving_average(&repair_frequencies(&frequencies), FREQUENCY_SMOOTHING);
    let voiced = fill_gaps(&voiced, gap_limit_frames);

    let filled = voiced
        .iter()
        .filter(|&&v| v)
        .count()
        .saturating_sub(stream.voiced_count());
    debug!(
        frames = stream.len(),
        voiced = stream.voiced_count(),
        filled,
        gap_limit_frames,
        "conditioned pitch stream"
    );

    frequencies
        .into_iter()
        .zip(voiced)
        .map(|(frequency, voiced)| PitchFrame { frequency, voiced })
        .collect()
}

/// Replace undefined frequencies by linear interpolation over frame index.
///
/// Values before the first (after the last) defined frequency take that
/// frequency. With no defined frequency anywhere, every value is 0.
pub fn repair_frequencies(frequencies: &[f32]) -> Vec<f32> {
    let anchors: Vec<usize> = frequencies
        .iter()
        .enumerate()
        .filter(|(_, &f)| has_valid_frequency(f))
        .map(|(i, _)| i)
        .collect();

    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        return vec![0.0; frequencies.len()];
    };

    let mut repaired = frequencies.to_vec();
    repaired[..first].fill(frequencies[first]);
    repaired[last + 1..].fill(frequencies[last]);

    for pair in anchors.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (a, b) = (frequencies[lo], frequencies[hi]);
        let span = (hi - lo) as f32;
        for (i, slot) in repaired.iter_mut().enumerate().take(hi).skip(lo + 1) {
            let t = (i - lo) as f32 / span;
            *slot = a + (b - a) * t;
        }
    }

    repaired
}

/// Mark unvoiced runs shorter than `gap_limit` as voiced when a voiced frame
/// follows them.
pub fn fill_gaps(voiced: &[bool], gap_limit: usize) -> Vec<bool> {
    let mut out = voiced.to_vec();
    let mut run_start = None;

    for (i, &v) in voiced.iter().enumerate() {
        match (v, run_start) {
            (false, None) => run_start = Some(i),
            (true, Some(start)) => {
                if i - start < gap_limit {
                    out[start..i].fill(true);
                }
                run_start = None;
            }
            _ => {}
        }
    }

    out
}
