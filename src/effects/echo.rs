#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use super::effect::{channel_frames, clear_unshared, shared_channels, Effect, StreamConfig};
use crate::dsp::delay::DelayLine;
use crate::dsp::filter::OnePole;
use crate::error::DspError;
use crate::sequencing::transport::Transport;

/*
Feedback Echo
=============

One delay line per channel with a band-limited feedback path:

                      ┌──────────────────────────────────────┐
                      │                                      │
  in ──→ (+) ──→ [ delay line ] ──→ LP ──→ HP ──→ (×fb) ─────┘
          │                  └──────────────────────→ echo tap
          └──→ wet/dry blend ──→ DC block (40 Hz) ──→ out

The delay time is `length²` of the full line (~340 ms at 48 kHz), so the low
end of the control gets finer resolution. It is pulled through a 2 Hz
low-pass before every read: moving the control bends the pitch of the
repeats instead of clicking.

Odd channels add `spread` to the length, and the sum carries over to the
following channels, so a stereo pair ends up with slightly different repeat
times.
*/

const FEEDBACK_CEILING: f32 = 0.998;
const LENGTH_SMOOTHING_HZ: f32 = 2.0;
const DC_BLOCK_HZ: f32 = 40.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoParams {
    /// Feedback low-pass cutoff, 500..6500 Hz.
    pub lp_hz: f32,
    /// Feedback high-pass cutoff, 20..1900 Hz.
    pub hp_hz: f32,
    /// Fraction of the line, 0..1 (squared before use).
    pub length: f32,
    /// Extra length on odd channels, 0..0.5.
    pub spread: f32,
    /// Repeat amount, 0..1.
    pub feedback: f32,
    pub wet: f32,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            lp_hz: 4400.0,
            hp_hz: 37.0,
            length: 0.5,
            spread: 0.25,
            feedback: 0.87,
            wet: 1.0,
        }
    }
}

struct EchoChannel {
    line: DelayLine,
    low_pass: OnePole,
    high_pass: OnePole,
    dc_block: OnePole,
    smoothing: OnePole,
}

impl EchoChannel {
    fn new() -> Self {
        Self {
            line: DelayLine::default(),
            low_pass: OnePole::new(),
            high_pass: OnePole::new(),
            dc_block: OnePole::new(),
            smoothing: OnePole::new(),
        }
    }
}

pub struct Echo {
    params: EchoParams,
    sample_rate: f32,
    channels: Vec<EchoChannel>,
}

impl Echo {
    pub fn new(params: EchoParams) -> Self {
        Self {
            params,
            sample_rate: 48_000.0,
            channels: Vec::new(),
        }
    }

    pub fn params(&self) -> &EchoParams {
        &self.params
    }

    pub fn set_params(&mut self, params: EchoParams) {
        self.params = params;
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self::new(EchoParams::default())
    }
}

impl Effect for Echo {
    fn start(&mut self, config: &StreamConfig) {
        self.sample_rate = config.sample_rate;
        self.channels = (0..config.inputs).map(|_| EchoChannel::new()).collect();
        info!(
            channels = config.inputs,
            sample_rate = config.sample_rate,
            "echo started"
        );
    }

    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        _transport: &Transport,
    ) -> Result<(), DspError> {
        let shared = shared_channels(inputs, outputs, self.channels.len());
        let EchoParams {
            lp_hz,
            hp_hz,
            length,
            spread,
            feedback,
            wet,
        } = self.params;
        let sr = self.sample_rate;
        let feedback = feedback * FEEDBACK_CEILING;
        let mut length = length * length;

        for (c, channel) in self.channels.iter_mut().enumerate().take(shared) {
            channel.high_pass.set_frequency(hp_hz, sr);
            channel.low_pass.set_frequency(lp_hz, sr);
            channel.dc_block.set_frequency(DC_BLOCK_HZ, sr);
            channel.smoothing.set_frequency(LENGTH_SMOOTHING_HZ, sr);

            if c & 1 == 1 {
                length += spread;
            }
            length = length.clamp(0.0, 1.0);

            let input = inputs[c];
            let output = &mut *outputs[c];
            let max_delay = channel.line.max_delay();

            for n in 0..channel_frames(input, output, frames) {
                let delay = max_delay * channel.smoothing.low_pass(length) as f64;
                let echo = channel.line.read_at(delay);

                let dry = input[n];
                let fed = dry
                    + feedback * channel.high_pass.high_pass(channel.low_pass.low_pass(echo));
                channel.line.write(fed);

                output[n] = channel.dc_block.high_pass(fed * wet + (1.0 - wet) * dry);
            }
        }

        clear_unshared(outputs, shared, frames);
        Ok(())
    }
}
