#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use super::effect::{Effect, StreamConfig};
use crate::dsp::oscillator::{Phase, Shape};
use crate::error::DspError;
use crate::sequencing::transport::Transport;

/// Oscillators summed by the generator.
pub const OSCILLATORS: usize = 3;

/// Divider applied to every oscillator in LFO mode.
const LFO_REDUCTION: f64 = 100.0;

#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    /// Transposition in semitones, -12..12.
    pub semitones: i32,
    /// Level in dB, -60..6.
    pub volume_db: f32,
    pub shape: Shape,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            semitones: 0,
            volume_db: -12.0,
            shape: Shape::Sine,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveshaperParams {
    /// Base frequency, 1..20000 Hz.
    pub frequency: f32,
    /// Divide every oscillator's frequency by 100.
    pub lfo: bool,
    pub oscillators: [OscillatorParams; OSCILLATORS],
}

impl Default for WaveshaperParams {
    fn default() -> Self {
        let mut oscillators = [OscillatorParams::default(); OSCILLATORS];
        for (i, osc) in oscillators.iter_mut().enumerate() {
            osc.semitones = -12 + 12 * i as i32;
        }
        Self {
            frequency: 80.0,
            lfo: false,
            oscillators,
        }
    }
}

/// Three naive oscillators at semitone ratios of one base frequency.
///
/// A generator: inputs are ignored and the mono sum is written to every
/// output channel.
pub struct Waveshaper {
    params: WaveshaperParams,
    sample_rate: f32,
    phases: [Phase; OSCILLATORS],
}

impl Waveshaper {
    pub fn new(params: WaveshaperParams) -> Self {
        Self {
            params,
            sample_rate: 48_000.0,
            phases: [Phase::default(); OSCILLATORS],
        }
    }

    pub fn params(&self) -> &WaveshaperParams {
        &self.params
    }

    pub fn set_params(&mut self, params: WaveshaperParams) {
        self.params = params;
    }

    /// Per-oscillator frequency multipliers for the current settings.
    pub fn ratios(&self) -> [f64; OSCILLATORS] {
        let reduction = if self.params.lfo { LFO_REDUCTION } else { 1.0 };
        self.params
            .oscillators
            .map(|osc| 2.0_f64.powf(osc.semitones as f64 / 12.0) / reduction)
    }
}

impl Default for Waveshaper {
    fn default() -> Self {
        Self::new(WaveshaperParams::default())
    }
}

impl Effect for Waveshaper {
    fn start(&mut self, config: &StreamConfig) {
        self.sample_rate = config.sample_rate;
        self.phases = [Phase::default(); OSCILLATORS];
        info!(sample_rate = config.sample_rate, "waveshaper started");
    }

    fn process(
        &mut self,
        _inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        _transport: &Transport,
    ) -> Result<(), DspError> {
        if outputs.is_empty() {
            return Err(DspError::NoAudioChannels);
        }

        let ratios = self.ratios();
        let gains = self.params.oscillators.map(|osc| db_to_gain(osc.volume_db));
        let shapes = self.params.oscillators.map(|osc| osc.shape);
        let normalized = if self.sample_rate > 0.0 {
            self.params.frequency as f64 / self.sample_rate as f64
        } else {
            0.0
        };

        let frames = outputs
            .iter()
            .fold(frames, |frames, output| frames.min(output.len()));

        for n in 0..frames {
            let mut sample = 0.0;
            for (o, phase) in self.phases.iter_mut().enumerate() {
                sample += phase.eval(shapes[o]) * gains[o];
                phase.advance(normalized * ratios[o]);
            }

            for output in outputs.iter_mut() {
                output[n] = sample;
            }
        }

        Ok(())
    }
}
