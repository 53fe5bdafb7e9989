//! WAV reading and writing via `hound`.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use super::{Pcm16, PcmBuffer};
use crate::error::{Error, Result};

/// Read a WAV file and average its channels down to mono.
///
/// Integer formats are scaled to [-1, 1] by their bit depth.
pub fn read_wav_mono(path: impl AsRef<Path>) -> Result<PcmBuffer> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples: Vec<f32> = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels,
        samples = samples.len(),
        "read wav"
    );

    Ok(PcmBuffer::new(samples, spec.sample_rate))
}

/// Linear-interpolation resampler.
///
/// Output length is `round(len * to / from)`. Good enough for an analysis
/// front end and for lining a mix-down up with the synthesized track.
pub fn resample_linear(buffer: &PcmBuffer, target_rate: u32) -> PcmBuffer {
    if buffer.sample_rate == target_rate || buffer.is_empty() || buffer.sample_rate == 0 {
        return PcmBuffer::new(buffer.samples.clone(), target_rate);
    }

    let ratio = buffer.sample_rate as f64 / target_rate as f64;
    let out_len = (buffer.len() as f64 / ratio).round() as usize;
    let last = buffer.len() - 1;

    let samples = (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            buffer.samples[idx] + (buffer.samples[next] - buffer.samples[idx]) * frac
        })
        .collect();

    PcmBuffer::new(samples, target_rate)
}

/// Write 16-bit mono PCM, creating parent directories as needed.
pub fn write_wav_i16(path: impl AsRef<Path>, pcm: &Pcm16) -> Result<()> {
    let path = path.as_ref();
    if pcm.sample_rate == 0 {
        return Err(Error::InvalidInput("sample rate must be positive".into()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &pcm.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!(path = %path.display(), samples = pcm.len(), "wrote wav");
    Ok(())
}
