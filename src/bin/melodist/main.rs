//! melodist - melody to MIDI and instrument audio
//!
//! Run with: cargo run -- convert take.wav --instrument Violin

mod cli;

use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use melodist::instruments::{self, program_number};
use melodist::pipeline::{ConversionRequest, Pipeline};
use melodist::render::RenderPath;
use melodist::RenderConfig;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            inputs,
            instrument,
            out,
            soundfont,
            config,
            gap_limit,
        } => {
            let mut config = load_config(config.as_deref())?;
            if soundfont.is_some() {
                config.soundfont = soundfont;
            }
            if let Some(frames) = gap_limit {
                config.gap_limit_frames = frames;
            }
            convert(&Pipeline::new(config), &inputs, &instrument, &out)
        }
        Commands::Transcribe { input, out, config } => {
            let pipeline = Pipeline::new(load_config(config.as_deref())?);
            let notes = pipeline
                .transcribe_file(&input, &out)
                .wrap_err_with(|| format!("transcribing {}", input.display()))?;
            println!("{} notes -> {}", notes.len(), out.display());
            Ok(())
        }
        Commands::Instruments => {
            for model in instruments::REGISTRY.iter() {
                println!(
                    "{:<10} {:<8} program {}",
                    model.name,
                    format!("{:?}", model.family).to_lowercase(),
                    program_number(model.name)
                );
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(path: Option<&Path>) -> color_eyre::Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::load(path).wrap_err_with(|| format!("loading {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

/// One thread per input; every request writes to its own paths.
fn convert(
    pipeline: &Pipeline,
    inputs: &[std::path::PathBuf],
    instrument: &str,
    out: &Path,
) -> color_eyre::Result<()> {
    let failures = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let request = ConversionRequest::new(input, instrument, out);
                scope.spawn(move || (input, pipeline.convert(&request)))
            })
            .collect();

        let mut failures = 0usize;
        for handle in handles {
            match handle.join() {
                Ok((input, Ok(report))) => {
                    let path = match &report.render_path {
                        RenderPath::External(name) => name.clone(),
                        RenderPath::Additive { .. } => "additive".to_string(),
                    };
                    info!(
                        input = %input.display(),
                        notes = report.notes.len(),
                        renderer = %path,
                        mix = %report.paths.mix.display(),
                        "done"
                    );
                }
                Ok((input, Err(err))) => {
                    error!(input = %input.display(), %err, "conversion failed");
                    failures += 1;
                }
                Err(_) => {
                    error!("conversion thread panicked");
                    failures += 1;
                }
            }
        }
        failures
    });

    if failures > 0 {
        return Err(eyre!("{failures} of {} conversions failed", inputs.len()));
    }
    Ok(())
}
