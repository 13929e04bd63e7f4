//! Three-step quantizing gate.
//!
//! The rectified, band-limited input is snapped onto a staircase before it
//! is used as a gain:
//!
//! ```text
//!   |x| > 0.8          → 1.0
//!   0.4 < |x| ≤ 0.8    → 0.8
//!   gate < |x| ≤ 0.4   → 0.4
//!   otherwise          → 0
//! ```
//!
//! The staircase is multiplied with the (harsh-blended) rectified signal and
//! pushed through `tanh`, which gives a buzzy, kazoo-like square-ish tone
//! that follows the input's loudness in coarse steps.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use super::effect::{channel_frames, clear_unshared, shared_channels, Effect, StreamConfig};
use crate::dsp::filter::OnePole;
use crate::error::DspError;
use crate::sequencing::transport::Transport;

const INPUT_HIGH_PASS_HZ: f32 = 82.0;
const DC_BLOCK_HZ: f32 = 40.0;
const SELF_FEEDBACK: f32 = 0.1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateParams {
    /// Control low-pass, 500..4000 Hz.
    pub lp_hz: f32,
    /// Lowest open step, 0..0.35.
    pub gate: f32,
    pub bias: f32,
    pub harsh: f32,
    pub rect: f32,
    pub gain: f32,
    pub wet: f32,
}

impl Default for GateParams {
    fn default() -> Self {
        Self {
            lp_hz: 1200.0,
            gate: 0.05,
            bias: 0.0,
            harsh: 0.05,
            rect: 1.0,
            gain: 0.86,
            wet: 1.0,
        }
    }
}

/// Map a rectified level onto the gate's staircase.
#[inline]
pub fn quantize(level: f32, gate: f32) -> f32 {
    if level > 0.8 {
        1.0
    } else if level > 0.4 {
        0.8
    } else if level > gate {
        0.4
    } else {
        0.0
    }
}

#[derive(Default)]
struct GateChannel {
    low_pass: OnePole,
    high_pass: OnePole,
    dc_first: OnePole,
    dc_second: OnePole,
    previous: f32,
}

pub struct Gate {
    params: GateParams,
    sample_rate: f32,
    channels: Vec<GateChannel>,
}

impl Gate {
    pub fn new(params: GateParams) -> Self {
        Self {
            params,
            sample_rate: 48_000.0,
            channels: Vec::new(),
        }
    }

    pub fn params(&self) -> &GateParams {
        &self.params
    }

    pub fn set_params(&mut self, params: GateParams) {
        self.params = params;
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(GateParams::default())
    }
}

impl Effect for Gate {
    fn start(&mut self, config: &StreamConfig) {
        self.sample_rate = config.sample_rate;
        self.channels = (0..config.inputs).map(|_| GateChannel::default()).collect();
        info!(channels = config.inputs, "gate started");
    }

    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        _transport: &Transport,
    ) -> Result<(), DspError> {
        let shared = shared_channels(inputs, outputs, self.channels.len());
        let p = self.params;
        let sr = self.sample_rate;

        let volume = p.gain * p.gain * 10.0;
        let bias = -p.bias;
        let harsh = 1.0 - p.harsh;
        let rect = p.rect * 0.5 + 0.5;
        // Never fully closed, so silence stays silence
        let gate = p.gate * 0.999 + 0.001;

        for (c, channel) in self.channels.iter_mut().enumerate().take(shared) {
            channel.high_pass.set_frequency(INPUT_HIGH_PASS_HZ, sr);
            channel.low_pass.set_frequency(p.lp_hz, sr);
            channel.dc_first.set_frequency(DC_BLOCK_HZ, sr);
            channel.dc_second.set_frequency(DC_BLOCK_HZ, sr);

            let input = inputs[c];
            let output = &mut *outputs[c];

            for n in 0..channel_frames(input, output, frames) {
                let x = input[n] + channel.previous * SELF_FEEDBACK;
                let filtered = channel
                    .high_pass
                    .high_pass(channel.low_pass.low_pass(x.clamp(-1.0, 1.0)));
                let rectified = filtered * (1.0 - rect) + filtered.abs() * rect;

                let step = quantize(rectified, gate);
                channel.previous = rectified;

                let harshened = rectified * harsh + (1.0 - harsh);
                let mixed = (harshened * (step + bias) * volume * p.wet + (1.0 - p.wet) * x).tanh();
                output[n] = channel.dc_second.high_pass(channel.dc_first.high_pass(mixed));
            }
        }

        clear_unshared(outputs, shared, frames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;

    const SR: f32 = 48_000.0;

    #[test]
    fn test_staircase() {
        assert_eq!(quantize(0.95, 0.05), 1.0);
        assert_eq!(quantize(0.8, 0.05), 0.8);
        assert_eq!(quantize(0.41, 0.05), 0.8);
        assert_eq!(quantize(0.4, 0.05), 0.4);
        assert_eq!(quantize(0.06, 0.05), 0.4);
        assert_eq!(quantize(0.05, 0.05), 0.0);
        assert_eq!(quantize(-0.5, 0.05), 0.0);
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut gate = Gate::default();
        gate.start(&StreamConfig::new(SR, 1, 1, 256));

        let input = vec![0.0; 256];
        let mut out = vec![1.0; 256];
        gate.process(&[&input], &mut [&mut out], 256, &Transport::default())
            .unwrap();
        assert!(out.iter().all(|&x| x == 0.0), "closed gate leaks");
    }

    #[test]
    fn test_loud_tone_opens_gate() {
        let mut gate = Gate::default();
        gate.start(&StreamConfig::new(SR, 2, 2, 1024));

        let input: Vec<f32> = (0..4_800)
            .map(|n| 0.9 * (TAU * 440.0 * n as f32 / SR).sin())
            .collect();
        let mut left = vec![0.0; 4_800];
        let mut right = vec![0.0; 4_800];
        for start in (0..4_800).step_by(1024) {
            let end = (start + 1024).min(4_800);
            let mut outs: [&mut [f32]; 2] = [&mut left[start..end], &mut right[start..end]];
            gate.process(
                &[&input[start..end], &input[start..end]],
                &mut outs,
                end - start,
                &Transport::default(),
            )
            .unwrap();
        }

        let peak = left.iter().fold(0.0f32, |m, x| m.max(x.abs()));
        assert!(peak > 0.3, "gate stayed shut, peak {peak}");
        assert_eq!(left, right, "identical channels must match");
        assert!(left.iter().all(|x| x.is_finite() && x.abs() <= 4.0));
    }
}
