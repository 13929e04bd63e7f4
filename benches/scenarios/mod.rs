//! Real-world scenario benchmarks.
//!
//! Complete effects driven the way a host drives them: one `start`, then a
//! `process` per block.

mod effects;

pub use effects::bench_effects;
