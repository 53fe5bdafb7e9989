use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// melodist - turn a sung or played melody into MIDI and an instrument track
#[derive(Parser)]
#[command(name = "melodist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert recordings: MIDI, instrument track and mix for each input
    Convert {
        /// Mono or stereo WAV recordings
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Instrument name (see `melodist instruments`)
        #[arg(short, long, default_value = "Flute")]
        instrument: String,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        out: PathBuf,

        /// SoundFont for the external renderer
        #[arg(long)]
        soundfont: Option<PathBuf>,

        /// TOML render configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bridge unvoiced gaps shorter than this many frames
        #[arg(long)]
        gap_limit: Option<usize>,
    },

    /// Write only the MIDI transcription of a recording
    Transcribe {
        /// WAV recording
        input: PathBuf,

        /// Output MIDI file
        #[arg(short, long, default_value = "melody.mid")]
        out: PathBuf,

        /// TOML render configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the available instruments
    Instruments,
}
