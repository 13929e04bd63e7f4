//! Effects built from the primitives, one module per effect.
//!
//! Each effect owns per-channel instances of the primitives it needs and
//! implements [`Effect`] for the stream lifecycle. Nothing is shared between
//! effects; composition happens inside each one.

pub mod drums;
pub mod echo;
pub mod effect;
pub mod fuzz;
pub mod gate;
pub mod waveshaper;

pub use drums::{DrumVoiceParams, Drums, DrumsParams};
pub use echo::{Echo, EchoParams};
pub use effect::{clear_unshared, shared_channels, Effect, StreamConfig};
pub use fuzz::{Fuzz, FuzzParams};
pub use gate::{Gate, GateParams};
pub use waveshaper::{OscillatorParams, Waveshaper, WaveshaperParams};
