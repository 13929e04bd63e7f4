//! Circular delay line with fractional-delay reads.
//!
//! The buffer is a power of two so every index can be wrapped with a mask.
//! One [`DelayLine::write`] per sample keeps the timeline consistent; reads
//! never mutate and can be taken any number of times (multi-tap).
//!
//! Feedback ordering within one sample:
//!
//! ```text
//! y = line.read_at(d);          // history up to the previous sample
//! line.write(x + g * y);        // then this sample's value
//! ```
//!
//! Delay `d = 1.0` after that sequence returns the sample written one call
//! ago. Fractional delays interpolate linearly between the two neighbouring
//! taps.

use super::interpolation::linear;

/// Capacity used when none is given: 16384 samples (~340ms at 48kHz).
pub const DEFAULT_DELAY_CAPACITY: usize = 16_384;

pub struct DelayLine {
    buffer: Vec<f32>,
    mask: usize,
    write_pos: usize,
}

impl DelayLine {
    /// Allocate a line holding at least `capacity` samples.
    ///
    /// The size is rounded up to the next power of two (minimum 4). This is
    /// the only allocation the line ever makes; call it at stream start.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(4).next_power_of_two();
        Self {
            buffer: vec![0.0; capacity],
            mask: capacity - 1,
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Largest delay that reads only written history.
    pub fn max_delay(&self) -> f64 {
        (self.capacity() - 2) as f64
    }

    /// Store one sample at the cursor and advance it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) & self.mask;
    }

    /// Read `delay_samples` behind the cursor with linear interpolation.
    ///
    /// Delays outside `[0, capacity - 2]` are clamped. Keeping the
    /// controlling parameter in range is still the caller's job; the clamp
    /// only keeps the read inside the buffer.
    #[inline]
    pub fn read_at(&self, delay_samples: f64) -> f32 {
        let delay = if delay_samples.is_nan() {
            0.0
        } else {
            delay_samples.clamp(0.0, self.max_delay())
        };
        let whole = delay.floor();
        let frac = (delay - whole) as f32;
        let whole = whole as usize;

        let size = self.capacity();
        let i0 = (self.write_pos + size - whole) & self.mask;
        let i1 = (i0 + size - 1) & self.mask;

        linear(frac, self.buffer[i0], self.buffer[i1])
    }

    /// Zero the history. The cursor keeps its place.
    pub fn flush(&mut self) {
        self.buffer.fill(0.0);
    }

    pub fn write_position(&self) -> usize {
        self.write_pos
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_CAPACITY)
    }
}
