//! Realtime DSP primitives.
//!
//! Every type here is allocation-free after construction and safe to call
//! from the audio thread. They stay focused on the signal math; effects in
//! [`crate::effects`] compose them.

/// Circular delay line with fractional reads.
pub mod delay;
/// One-pole low/high-pass splitter.
pub mod filter;
pub mod interpolation;
/// Stateless waveforms and the phase accumulator that drives them.
pub mod oscillator;
/// Triggered, resampling sample player.
pub mod player;

pub use delay::DelayLine;
pub use filter::OnePole;
pub use oscillator::{Phase, Shape};
pub use player::{PlayerState, SamplePlayer};
