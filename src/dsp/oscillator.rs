use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Stateless Waveshape Oscillator
==============================

The oscillator owns no state. It maps a position inside one cycle (the unit
phase, 0.0 up to but not including 1.0) to a sample value. Whoever calls it
owns the phase and decides how fast it moves:

  audio oscillator     phase += frequency / sample_rate      every sample
  trigger generator    phase += tempo-derived rotation       every sample

Waveforms over the reduced phase p:

  Sine       cos(2πp)                      starts at +1
  Triangle   p < 0.5: -1 + 4p              -1 → +1 → -1
             else:     1 - 4(p - 0.5)
  SawDown    1 - 2p                        +1 ramps to -1
  SawUp      -1 + 2p                       -1 ramps to +1
  Square     p < 0.5 → 1, else -1
  Pulse      p < 0.01 → 1, else 0          narrow positive blip

All but the sine are ideal (naive) shapes and alias heavily at audio rates.
That is the intended sound.

Range Reduction
---------------

Any real phase is folded into [0, 1) by subtracting its floor, so the output
depends only on `phase mod 1`. Phase accumulators keep their value in f64:
an f32 phase advanced at 1/48000 per sample stops moving accurately after a
few minutes of stream time, an f64 one stays accurate for days.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Sine,
    Triangle,
    SawDown,
    SawUp,
    Square,
    Pulse,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Sine,
        Shape::Triangle,
        Shape::SawDown,
        Shape::SawUp,
        Shape::Square,
        Shape::Pulse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Sine => "Sine",
            Shape::Triangle => "Triangle",
            Shape::SawDown => "SawDown",
            Shape::SawUp => "SawUp",
            Shape::Square => "Square",
            Shape::Pulse => "Pulse",
        }
    }

    /// Evaluate the waveform at an arbitrary phase.
    #[inline]
    pub fn eval(self, unit_phase: f64) -> f32 {
        let p = reduce(unit_phase);

        let sample = match self {
            Shape::Sine => (TAU * p).cos(),
            Shape::Triangle => {
                if p < 0.5 {
                    -1.0 + 4.0 * p
                } else {
                    1.0 - 4.0 * (p - 0.5)
                }
            }
            Shape::SawDown => 1.0 - 2.0 * p,
            Shape::SawUp => -1.0 + 2.0 * p,
            Shape::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Shape::Pulse => {
                if p < 0.01 {
                    1.0
                } else {
                    0.0
                }
            }
        };

        sample as f32
    }
}

/// Fold any phase into [0, 1).
#[inline]
pub fn reduce(unit_phase: f64) -> f64 {
    let p = unit_phase - unit_phase.floor();
    // -1e-20 - floor(-1e-20) rounds to exactly 1.0
    if p >= 1.0 {
        0.0
    } else {
        p
    }
}

/// Normalized phase accumulator, always kept in [0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phase {
    value: f64,
}

impl Phase {
    pub fn new(start: f64) -> Self {
        Self {
            value: reduce(start),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Jump to a new position (reduced into range).
    pub fn set(&mut self, value: f64) {
        self.value = reduce(value);
    }

    /// Move forward by `increment` cycles and wrap.
    #[inline]
    pub fn advance(&mut self, increment: f64) {
        self.value = reduce(self.value + increment);
    }

    /// Sample `shape` at the current position.
    #[inline]
    pub fn eval(&self, shape: Shape) -> f32 {
        shape.eval(self.value)
    }
}
