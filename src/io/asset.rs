//! Read-only audio assets addressed by absolute frame index.
//!
//! A player reads a few frames on either side of its position for
//! interpolation, so indices regularly fall before the first frame or past
//! the last one. Every asset resolves those reads itself and always returns
//! a defined value.

use std::sync::Arc;

use tracing::debug;

use crate::error::DspError;

/// How reads outside `[0, frame_count)` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Anything outside the asset reads as silence.
    Zero,
    /// Indices wrap around, so the asset behaves like one period of a loop.
    Wrap,
}

/// Mono sample source with a fixed rate and length.
pub trait AudioAsset: Send + Sync {
    /// Rate the frames were recorded at, in Hz.
    fn sample_rate(&self) -> f32;

    fn frame_count(&self) -> u64;

    /// Sample at `frame`, valid for any index.
    fn at(&self, frame: i64, edge: EdgeMode) -> f32;
}

/// In-memory asset: the first channel of a decoded file, or generated data.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: f32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: f32) -> Self {
        debug!(
            frames = samples.len(),
            sample_rate, "created sample buffer"
        );
        Self {
            samples,
            sample_rate,
        }
    }

    /// Keep channel 0 of an interleaved buffer.
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: f32) -> Self {
        let channels = channels.max(1);
        let samples = interleaved.iter().step_by(channels).copied().collect();
        Self::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_shared(self) -> Arc<dyn AudioAsset> {
        Arc::new(self)
    }
}

impl AudioAsset for SampleBuffer {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn frame_count(&self) -> u64 {
        self.samples.len() as u64
    }

    #[inline]
    fn at(&self, frame: i64, edge: EdgeMode) -> f32 {
        let len = self.samples.len() as i64;
        if len == 0 {
            return 0.0;
        }
        match edge {
            EdgeMode::Zero => {
                if frame < 0 || frame >= len {
                    0.0
                } else {
                    self.samples[frame as usize]
                }
            }
            EdgeMode::Wrap => self.samples[frame.rem_euclid(len) as usize],
        }
    }
}

/// Ordered collection of assets that voices select from by index.
#[derive(Clone, Default)]
pub struct AssetBank {
    assets: Vec<Arc<dyn AudioAsset>>,
}

impl AssetBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, asset: Arc<dyn AudioAsset>) {
        self.assets.push(asset);
    }

    pub fn with(mut self, asset: Arc<dyn AudioAsset>) -> Self {
        self.push(asset);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Look up an asset, failing loudly on an empty bank or a bad index.
    pub fn get(&self, index: usize) -> Result<&Arc<dyn AudioAsset>, DspError> {
        if self.assets.is_empty() {
            return Err(DspError::EmptyAssetBank);
        }
        self.assets
            .get(index)
            .ok_or(DspError::AssetIndexOutOfRange {
                index,
                len: self.assets.len(),
            })
    }
}

impl FromIterator<Arc<dyn AudioAsset>> for AssetBank {
    fn from_iter<I: IntoIterator<Item = Arc<dyn AudioAsset>>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().collect(),
        }
    }
}
