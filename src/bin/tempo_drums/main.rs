//! tempo_drums - two tempo-locked drum voices over a bank of WAV samples
//!
//! Run with: cargo run --bin tempo_drums -- kick.wav snare.wav
//! Bounce:   cargo run --bin tempo_drums -- kick.wav snare.wav --bounce out.wav

mod host;
mod live;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tempo_dsp::{
    effects::{Drums, DrumsParams},
    io::{load_wav, write_wav, AssetBank},
    sequencing::{Rate, TransportClock, TransportCommand},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use host::Host;

#[derive(Parser, Debug)]
#[command(version, about = "Tempo-locked two-voice drum player.")]
struct Args {
    /// WAV files for the asset bank, in index order (first channel is used).
    #[arg(required = true)]
    samples: Vec<PathBuf>,

    /// Tempo in beats per minute.
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// Time signature denominator.
    #[arg(long, default_value_t = 4)]
    denominator: u32,

    /// Rate of the first voice, e.g. "1/4" or "3/16".
    #[arg(long, value_parser = parse_rate)]
    rate1: Option<Rate>,

    /// Rate of the second voice.
    #[arg(long, value_parser = parse_rate)]
    rate2: Option<Rate>,

    /// JSON file with drum parameters; rate flags override it.
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Render offline into this WAV file instead of playing live.
    #[arg(long)]
    bounce: Option<PathBuf>,

    /// Length of the offline render.
    #[arg(long, default_value_t = 8.0)]
    seconds: f32,

    /// Sample rate of the offline render.
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
}

fn parse_rate(name: &str) -> Result<Rate, String> {
    Rate::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = Rate::ALL.iter().map(|rate| rate.name()).collect();
        format!("unknown rate '{name}', expected one of {}", names.join(", "))
    })
}

fn load_params(args: &Args) -> EyreResult<DrumsParams> {
    let mut params = match &args.preset {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read preset {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("invalid preset {}", path.display()))?
        }
        None => DrumsParams::default(),
    };

    if let Some(rate) = args.rate1 {
        params.voices[0].rate = rate;
    }
    if let Some(rate) = args.rate2 {
        params.voices[1].rate = rate;
    }
    Ok(params)
}

fn load_bank(paths: &[PathBuf]) -> EyreResult<AssetBank> {
    paths
        .iter()
        .map(|path| {
            load_wav(path)
                .map(|buffer| buffer.into_shared())
                .wrap_err_with(|| format!("failed to load {}", path.display()))
        })
        .collect()
}

fn bounce(drums: Drums, clock: TransportClock, args: &Args, path: &Path) -> EyreResult<()> {
    if !(args.seconds > 0.0) {
        return Err(eyre!("--seconds must be positive"));
    }

    const CHANNELS: u16 = 2;
    let frames = (args.seconds * args.sample_rate as f32) as usize;
    let mut host = Host::new(drums, clock, args.sample_rate as f32, CHANNELS as usize);
    host.clock_mut().apply(TransportCommand::Play);

    let mut data = vec![0.0f32; frames * CHANNELS as usize];
    host.render_interleaved(&mut data)
        .wrap_err("rendering failed")?;

    write_wav(path, &data, CHANNELS, args.sample_rate)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), frames, "bounce written");
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let params = load_params(&args)?;
    let bank = load_bank(&args.samples)?;
    info!(
        assets = bank.len(),
        bpm = args.bpm,
        rate1 = params.voices[0].rate.name(),
        rate2 = params.voices[1].rate.name(),
        "loaded"
    );

    let drums = Drums::new(params, bank);
    let clock = TransportClock::new(args.bpm, args.denominator);

    match &args.bounce {
        Some(path) => bounce(drums, clock, &args, path),
        None => live::run(drums, clock),
    }
}
