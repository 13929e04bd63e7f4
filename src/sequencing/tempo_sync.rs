use crate::dsp::oscillator::{Phase, Shape};
use crate::sequencing::ratio::{Rate, TempoRatio};
use crate::sequencing::transport::Transport;

/*
Tempo-Locked Trigger Generator
==============================

Turns the host's musical clock into one trigger flag per output frame.

  fundamental = bpm / time_sig_denominator / 60        cycles per second
  rotation    = ratio · fundamental / sample_rate      cycles per sample

Each block starts by re-anchoring the phase to the absolute host position,
so the pulse train can never drift away from the host no matter how block
sizes change or where the transport seeks:

  revolutions = fundamental · (ratio · time_in_samples / sample_rate)
  phase       = frac(revolutions) + offset

`ratio · time_in_samples` is formed first. The position grows without bound
and reducing it early would throw away the fractional cycle that matters.

Inside the block the phase is integrated sample by sample and the Pulse
shape is sampled at every frame:

  phase  0.00  0.01                                  1.00
         |█████|---------------------------------------|█████
         trig  ^ pulse ends                            next cycle

A frame triggers while the transport is playing and the pulse is high. The
phase keeps rotating while stopped so it is ready when playback resumes.
*/

/// Cycles per second of the host's beat-equivalent unit.
#[inline]
pub fn fundamental_hz(bpm: f64, time_sig_denominator: u32) -> f64 {
    (bpm / time_sig_denominator.max(1) as f64) / 60.0
}

#[derive(Debug, Clone)]
pub struct TempoSync {
    phase: Phase,
    ratio: TempoRatio,
    offset: f64,
    locked: bool,
    rotation: f64,
    playing: bool,
}

impl TempoSync {
    pub fn new(ratio: TempoRatio) -> Self {
        Self {
            phase: Phase::default(),
            ratio,
            offset: 0.0,
            locked: true,
            rotation: 0.0,
            playing: false,
        }
    }

    pub fn with_rate(rate: Rate) -> Self {
        Self::new(rate.ratio())
    }

    pub fn set_ratio(&mut self, ratio: TempoRatio) {
        self.ratio = ratio;
    }

    pub fn set_rate(&mut self, rate: Rate) {
        self.ratio = rate.ratio();
    }

    /// Phase offset in cycles, applied at every re-anchor.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = if offset.is_finite() { offset } else { 0.0 };
    }

    /// When unlocked the phase free-runs from wherever it is.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn ratio(&self) -> TempoRatio {
        self.ratio
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn phase(&self) -> f64 {
        self.phase.value()
    }

    /// Cycles per sample computed by the last [`TempoSync::prepare`].
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn reset(&mut self) {
        self.phase = Phase::default();
    }

    /// Read the transport for the coming block: re-anchor and update the rate.
    pub fn prepare(&mut self, transport: &Transport, sample_rate: f32) {
        self.playing = transport.playing;

        let sample_rate = sample_rate as f64;
        if !(sample_rate > 0.0) {
            self.rotation = 0.0;
            return;
        }

        let fundamental = fundamental_hz(transport.bpm, transport.time_sig_denominator);

        if transport.playing && self.locked {
            let position = self.ratio.multiply(transport.time_in_samples as f64);
            let revolutions = fundamental * (position / sample_rate);
            self.phase.set(revolutions.fract() + self.offset);
        }

        let rotation = self.ratio.multiply(fundamental) / sample_rate;
        self.rotation = if rotation.is_finite() { rotation } else { 0.0 };
    }

    /// Emit one trigger flag per frame and advance the phase by the block.
    pub fn fill_triggers(&mut self, triggers: &mut [bool]) {
        let Self {
            phase,
            rotation,
            playing,
            ..
        } = self;

        for trigger in triggers.iter_mut() {
            *trigger = *playing && phase.eval(Shape::Pulse) > 0.99;
            phase.advance(*rotation);
        }
    }

    /// [`TempoSync::prepare`] followed by [`TempoSync::fill_triggers`].
    pub fn process(&mut self, transport: &Transport, sample_rate: f32, triggers: &mut [bool]) {
        self.prepare(transport, sample_rate);
        self.fill_triggers(triggers);
    }
}

impl Default for TempoSync {
    fn default() -> Self {
        Self::new(TempoRatio::ONE)
    }
}
