//! Waveshaping fuzz.
//!
//! Signal path per channel:
//!
//! ```text
//! in - reso·prev ──→ clamp ──→ LP ──→ HP ──→ rectify ──→ shaper ──┐
//!                                               │                 │
//!                                               └── crack ──→ (×) ┘──→ tanh ──→ DC ──→ DC ──→ out
//! ```
//!
//! The shaper is a fifth-order polynomial pushed through `tanh`, only
//! defined for positive input (negative input gives silence, or the dry
//! signal with `half_through`). Rectification decides how much of the
//! negative half ever reaches it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use super::effect::{channel_frames, clear_unshared, shared_channels, Effect, StreamConfig};
use crate::dsp::filter::OnePole;
use crate::error::DspError;
use crate::sequencing::transport::Transport;

const DC_BLOCK_HZ: f32 = 40.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzParams {
    /// Input low-pass, 500..4800 Hz.
    pub lp_hz: f32,
    /// Input high-pass, 20..1900 Hz.
    pub hp_hz: f32,
    /// Dead zone around zero, 0..1.
    pub threshold: f32,
    pub bias: f32,
    pub crack: f32,
    /// 0 keeps the signal bipolar, 1 is full-wave rectified.
    pub rect: f32,
    /// Feedback of the previous rectified sample.
    pub reso: f32,
    /// Blend from the tanh shaper towards a linear ramp.
    pub soft: f32,
    /// Pass the dry input where the shaper would go negative.
    pub half_through: bool,
    pub gain: f32,
    pub wet: f32,
}

impl Default for FuzzParams {
    fn default() -> Self {
        Self {
            lp_hz: 4400.0,
            hp_hz: 37.0,
            threshold: 0.05,
            bias: 0.1,
            crack: 0.05,
            rect: 1.0,
            reso: 0.1,
            soft: 0.5,
            half_through: false,
            gain: 0.86,
            wet: 0.5,
        }
    }
}

/// The positive-half transfer curve.
#[inline]
pub fn shape(x: f32, threshold: f32, soft: f32) -> f32 {
    let x2 = x * x;
    let x4 = x2 * x2;
    let poly = -200.0 * x4 * x + 440.0 * x4 - 269.0 * x * x2 + 55.0 * x2 - 0.5 * x - threshold;
    poly.tanh() * (1.0 - soft) + (x - threshold) * soft
}

#[derive(Default)]
struct FuzzChannel {
    low_pass: OnePole,
    high_pass: OnePole,
    dc_first: OnePole,
    dc_second: OnePole,
    previous: f32,
}

pub struct Fuzz {
    params: FuzzParams,
    sample_rate: f32,
    channels: Vec<FuzzChannel>,
}

impl Fuzz {
    pub fn new(params: FuzzParams) -> Self {
        Self {
            params,
            sample_rate: 48_000.0,
            channels: Vec::new(),
        }
    }

    pub fn params(&self) -> &FuzzParams {
        &self.params
    }

    pub fn set_params(&mut self, params: FuzzParams) {
        self.params = params;
    }
}

impl Default for Fuzz {
    fn default() -> Self {
        Self::new(FuzzParams::default())
    }
}

impl Effect for Fuzz {
    fn start(&mut self, config: &StreamConfig) {
        self.sample_rate = config.sample_rate;
        self.channels = (0..config.inputs).map(|_| FuzzChannel::default()).collect();
        info!(channels = config.inputs, "fuzz started");
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
        let crack = 1.0 - p.crack;
        let rect = p.rect * 0.5 + 0.5;
        let threshold = 0.4 * p.threshold;
        let reso = p.reso * 0.98;
        let soft = p.soft * 0.98;

        for (c, channel) in self.channels.iter_mut().enumerate().take(shared) {
            channel.high_pass.set_frequency(p.hp_hz, sr);
            channel.low_pass.set_frequency(p.lp_hz, sr);
            channel.dc_first.set_frequency(DC_BLOCK_HZ, sr);
            channel.dc_second.set_frequency(DC_BLOCK_HZ, sr);

            let input = inputs[c];
            let output = &mut *outputs[c];

            for n in 0..channel_frames(input, output, frames) {
                let x = input[n] - channel.previous * reso;
                let filtered = channel
                    .high_pass
                    .high_pass(channel.low_pass.low_pass(x.clamp(-1.0, 1.0)));
                let rectified = filtered * (1.0 - rect) + filtered.abs() * rect;

                let mut shaped = 0.0;
                if rectified > 0.0 {
                    shaped = shape(rectified, threshold, soft);
                    if shaped < 0.0 {
                        shaped = if p.half_through { x } else { 0.0 };
                    }
                }

                channel.previous = rectified;

                let cracked = rectified * crack + (1.0 - crack);
                let mixed = (cracked * (shaped + bias) * volume * p.wet + (1.0 - p.wet) * x).tanh();
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

    fn sine(freq: f32, amplitude: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|n| amplitude * (TAU * freq * n as f32 / SR).sin())
            .collect()
    }

    fn process_mono(fuzz: &mut Fuzz, input: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; input.len()];
        for (i, o) in input.chunks(512).zip(out.chunks_mut(512)) {
            let len = i.len();
            fuzz.process(&[i], &mut [o], len, &Transport::default())
                .unwrap();
        }
        out
    }

    #[test]
    fn test_shaper_dead_zone() {
        // Below the threshold the polynomial is negative and the curve is too
        assert!(shape(0.001, 0.02, 0.0) < 0.0);
        assert!(shape(0.3, 0.02, 0.0) > 0.0);
        // Full soft is the plain ramp minus threshold
        assert!((shape(0.5, 0.02, 1.0) - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_output_is_bounded() {
        let mut fuzz = Fuzz::new(FuzzParams {
            gain: 1.0,
            wet: 1.0,
            ..FuzzParams::default()
        });
        fuzz.start(&StreamConfig::new(SR, 1, 1, 512));

        let out = process_mono(&mut fuzz, &sine(220.0, 2.0, 48_000));
        // tanh bounds the mix; two DC blockers can overshoot by at most 4x
        assert!(out.iter().all(|x| x.is_finite() && x.abs() <= 4.0));
        assert!(out.iter().any(|x| x.abs() > 0.1), "fuzz is silent");
    }

    #[test]
    fn test_silence_settles_to_zero() {
        let mut fuzz = Fuzz::default();
        fuzz.start(&StreamConfig::new(SR, 1, 1, 512));

        // bias and crack put a constant into the mix; the DC blockers remove it
        let out = process_mono(&mut fuzz, &vec![0.0; 96_000]);
        assert!(out[95_999].abs() < 1e-3, "residual {}", out[95_999]);
    }

    #[test]
    fn test_dry_mix_passes_signal() {
        let mut fuzz = Fuzz::new(FuzzParams {
            wet: 0.0,
            reso: 0.0,
            ..FuzzParams::default()
        });
        fuzz.start(&StreamConfig::new(SR, 1, 1, 512));

        let input = sine(1000.0, 0.1, 4_800);
        let out = process_mono(&mut fuzz, &input);
        // tanh(x) ≈ x for small x and 1 kHz sails through two 40 Hz high-passes
        let peak = out[3_800..].iter().fold(0.0f32, |m, x| m.max(x.abs()));
        assert!(peak > 0.095 && peak < 0.1005, "peak {peak}");
    }
}
