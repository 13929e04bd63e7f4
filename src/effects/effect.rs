//! Stream lifecycle shared by every effect.
//!
//! A host calls [`Effect::start`] once when the stream opens, then
//! [`Effect::process`] once per block from the audio thread. Everything an
//! effect needs per channel is allocated in `start`; `process` never
//! allocates, blocks or logs.

use crate::error::DspError;
use crate::sequencing::transport::Transport;

/// Stream layout fixed for the lifetime of one `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    pub sample_rate: f32,
    pub inputs: usize,
    pub outputs: usize,
    /// Largest `frames` value `process` will be called with.
    pub max_block_size: usize,
}

impl StreamConfig {
    pub fn new(sample_rate: f32, inputs: usize, outputs: usize, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            inputs,
            outputs,
            max_block_size: max_block_size.max(1),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(48_000.0, 2, 2, crate::MAX_BLOCK_SIZE)
    }
}

pub trait Effect: Send {
    /// Size per-channel state for `config` and reset it.
    fn start(&mut self, config: &StreamConfig);

    /// Render one block.
    ///
    /// `inputs[c]` and `outputs[c]` hold at least `frames` samples. Output
    /// channels without a matching input are written as silence unless the
    /// effect generates its own signal.
    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        transport: &Transport,
    ) -> Result<(), DspError>;
}

/// Channels that have both an input and an output, capped by the state
/// prepared in `start`.
#[inline]
pub fn shared_channels(inputs: &[&[f32]], outputs: &[&mut [f32]], prepared: usize) -> usize {
    inputs.len().min(outputs.len()).min(prepared)
}

/// Zero output channels `shared..` for the first `frames` samples.
pub fn clear_unshared(outputs: &mut [&mut [f32]], shared: usize, frames: usize) {
    for channel in outputs.iter_mut().skip(shared) {
        let len = frames.min(channel.len());
        channel[..len].fill(0.0);
    }
}

/// Frames that are safe to touch in one input/output pair.
#[inline]
pub(crate) fn channel_frames(input: &[f32], output: &[f32], frames: usize) -> usize {
    frames.min(input.len()).min(output.len())
}
