use std::f32::consts::TAU;

/*
One-Pole Filter
===============

The smallest useful IIR filter: one memory cell, one feedback coefficient.
Every effect in this crate uses it, both on audio (tone shaping, DC blocking)
and on control signals (parameter smoothing).

Vocabulary
----------

  state       The single remembered value. It is the low-pass output of the
              previous sample.

  b1          Feedback coefficient, exp(-2π·fc/sr). How much of the previous
              state survives into the next sample. Must stay inside (0, 1).

  a0          Input coefficient, 1 - b1. Unity gain at DC.

  splitter    Low-pass and high-pass share ONE state. The high-pass output is
              simply `input - lowpass`, so the two bands always sum back to
              the input. Calling both on the same instance advances the state
              twice; use two instances for two independent bands.


The Recurrence
--------------

    state[n] = x[n]·a0 + state[n-1]·b1

    low-pass  = state[n]
    high-pass = x[n] - state[n]

    x ──→ (×a0) ──→ (+) ──┬──→ low-pass
                     ↑    │
                     └─(×b1)─ z⁻¹
                          │
    x ────────────────→ (−) ──→ high-pass


Stability
---------

With b1 in (0, 1) the pole sits inside the unit circle and any bounded input
gives bounded output. Low host sample rates would push b1 towards 0 and let
coefficient error dominate, so the rate is floored at 22050 Hz before the
exponential is taken. A negative cutoff would push b1 above 1 and is clamped
to zero.

Example usage:

  let mut smoother = OnePole::new();
  smoother.set_frequency(2.0, 48_000.0);   // slow control smoothing
  let smoothed = smoother.low_pass(target);

  let mut dc_block = OnePole::new();
  dc_block.set_frequency(40.0, 48_000.0);
  let clean = dc_block.high_pass(sample);
*/

/// Sample rate floor applied before computing coefficients.
pub const MIN_FILTER_SAMPLE_RATE: f32 = 22_050.0;

/// Single-state low/high-pass splitter.
#[derive(Debug, Clone, Copy)]
pub struct OnePole {
    state: f32,
    a0: f32,
    b1: f32,
    // Last (cutoff, rate) pair so unchanged settings skip the exp().
    cutoff_hz: f32,
    sample_rate: f32,
}

impl OnePole {
    /// A filter with no memory and a pass-through coefficient set.
    ///
    /// Call [`OnePole::set_frequency`] before use.
    pub fn new() -> Self {
        Self {
            state: 0.0,
            a0: 1.0,
            b1: 0.0,
            cutoff_hz: f32::NAN,
            sample_rate: f32::NAN,
        }
    }

    /// Convenience constructor that sets the cutoff immediately.
    pub fn with_frequency(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new();
        filter.set_frequency(cutoff_hz, sample_rate);
        filter
    }

    /// Recompute coefficients for a cutoff at the given stream rate.
    pub fn set_frequency(&mut self, cutoff_hz: f32, sample_rate: f32) {
        if cutoff_hz == self.cutoff_hz && sample_rate == self.sample_rate {
            return;
        }
        self.cutoff_hz = cutoff_hz;
        self.sample_rate = sample_rate;

        let sr = sample_rate.max(MIN_FILTER_SAMPLE_RATE);
        let fc = cutoff_hz.max(0.0);
        self.b1 = (-TAU * fc / sr).exp();
        self.a0 = 1.0 - self.b1;
    }

    #[inline]
    fn tick(&mut self, sample: f32) -> f32 {
        self.state = sample * self.a0 + self.state * self.b1;
        self.state
    }

    /// Advance the state and return the low-pass output.
    #[inline]
    pub fn low_pass(&mut self, sample: f32) -> f32 {
        self.tick(sample)
    }

    /// Advance the state and return the complementary high-pass output.
    #[inline]
    pub fn high_pass(&mut self, sample: f32) -> f32 {
        sample - self.tick(sample)
    }

    pub fn low_pass_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.low_pass(*sample);
        }
    }

    pub fn high_pass_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.high_pass(*sample);
        }
    }

    pub fn flush(&mut self) {
        self.state = 0.0;
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    pub fn coefficients(&self) -> (f32, f32) {
        (self.a0, self.b1)
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new()
    }
}
