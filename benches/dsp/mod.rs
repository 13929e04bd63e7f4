//! Benchmarks for low-level DSP primitives.

mod delay;
mod filter;
mod oscillator;
mod player;
mod tempo_sync;

pub use delay::bench_delay;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use player::bench_player;
pub use tempo_sync::bench_tempo_sync;
