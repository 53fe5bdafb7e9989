//! Render a short melody with every instrument and write the WAVs.
//!
//! Run with: cargo run --example offline_bounce -- [out_dir]

use melodist::instruments;
use melodist::io::write_wav_i16;
use melodist::pitch::{midi_to_hz, PitchStream};
use melodist::post::postprocess;
use melodist::synth::synthesize;
use melodist::voicing::condition;
use melodist::{PostConfig, Result};

fn main() -> Result<()> {
    let out = std::env::args().nth(1).unwrap_or_else(|| "bounce".to_string());

    // A3 C4 E4 A4, each ~0.5 s, with a tracker dropout inside the second note
    let mut stream = PitchStream::default();
    for (i, note) in [57u8, 60, 64, 69].into_iter().enumerate() {
        let freq = midi_to_hz(note);
        stream = if i == 1 {
            stream
                .then(PitchStream::constant(freq, 10))
                .then(PitchStream::silence(2))
                .then(PitchStream::constant(freq, 10))
        } else {
            stream.then(PitchStream::constant(freq, 22))
        };
        stream = stream.then(PitchStream::silence(12));
    }

    let cleaned = condition(&stream, 10);
    for model in instruments::REGISTRY.iter() {
        let raw = synthesize(&cleaned, model, 22_050, 512);
        let pcm = postprocess(&raw, &PostConfig::default());
        let path = std::path::Path::new(&out).join(format!("{}.wav", model.name));
        write_wav_i16(&path, &pcm)?;
        println!("{:<10} {} samples -> {}", model.name, pcm.len(), path.display());
    }
    Ok(())
}
