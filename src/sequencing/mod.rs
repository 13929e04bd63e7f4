//! Musical time: tempo ratios, the host transport and tempo-locked triggers.

pub mod ratio;
pub mod tempo_sync;
pub mod transport;

pub use ratio::{Rate, TempoRatio};
pub use tempo_sync::{fundamental_hz, TempoSync};
pub use transport::{CommandReceiver, Transport, TransportClock, TransportCommand};
