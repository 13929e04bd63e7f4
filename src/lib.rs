pub mod dsp;
pub mod effects; // Effects composed from the primitives
pub mod error;
pub mod io;
pub mod sequencing; // Tempo ratios, transport and tempo-locked triggers

pub use error::DspError;

/// Default upper bound on frames per block when the host gives none.
pub const MAX_BLOCK_SIZE: usize = 2048;
