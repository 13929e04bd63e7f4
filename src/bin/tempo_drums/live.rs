use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tempo_dsp::{
    effects::Drums,
    sequencing::{TransportClock, TransportCommand},
    DspError,
};
use tracing::{error, info, warn};

use crate::host::Host;

/// Parse one console line into a transport command.
pub fn parse_command(line: &str) -> Option<Result<TransportCommand, String>> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let arg = words.next();

    let command = match (verb, arg) {
        ("play", None) => Ok(TransportCommand::Play),
        ("stop", None) => Ok(TransportCommand::Stop),
        ("bpm", Some(value)) => value
            .parse()
            .map(TransportCommand::SetBpm)
            .map_err(|_| format!("invalid bpm '{value}'")),
        ("sig", Some(value)) => value
            .parse()
            .map(TransportCommand::SetTimeSigDenominator)
            .map_err(|_| format!("invalid denominator '{value}'")),
        ("seek", Some(value)) => value
            .parse()
            .map(TransportCommand::Seek)
            .map_err(|_| format!("invalid position '{value}'")),
        _ => Err(format!("unknown command '{}'", line.trim())),
    };
    Some(command)
}

/// Play through the default output device until `quit` or a render error.
pub fn run(drums: Drums, mut clock: TransportClock) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    info!(sample_rate, channels, "opening output stream");

    clock.apply(TransportCommand::Play);
    let mut engine = Host::new(drums, clock, sample_rate, channels);

    let (mut command_tx, mut command_rx) = RingBuffer::<TransportCommand>::new(64);
    let (mut error_tx, mut error_rx) = RingBuffer::<DspError>::new(4);
    let mut failed = false;

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            if failed {
                data.fill(0.0);
                return;
            }
            engine.drain(&mut command_rx);
            if let Err(err) = engine.render_interleaved(data) {
                data.fill(0.0);
                failed = true;
                let _ = error_tx.push(err);
            }
        },
        |err| error!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    println!("Commands: play | stop | bpm <n> | sig <n> | seek <frames> | quit");

    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        if let Ok(err) = error_rx.pop() {
            return Err(err).wrap_err("drum rendering stopped");
        }

        match line_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(line) if line.trim() == "quit" => break,
            Ok(line) => match parse_command(&line) {
                Some(Ok(command)) => {
                    if command_tx.push(command).is_err() {
                        warn!("command queue full, dropped {command:?}");
                    }
                }
                Some(Err(message)) => warn!("{message}"),
                None => {}
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("stopping");
    Ok(())
}
