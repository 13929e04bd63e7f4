//! Errors surfaced by the primitives and the effects built on them.
//!
//! Only configuration mistakes are errors. Out-of-range numeric input is
//! clamped into a safe domain at the point of use and never reported here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DspError {
    /// A sample player was asked to render without an asset bound to it.
    #[error("no audio asset is bound to the sample player")]
    AssetNotBound,

    /// An effect that plays assets was given an empty asset bank.
    #[error("asset bank is empty, no samples to play")]
    EmptyAssetBank,

    /// A voice selected an asset slot that does not exist in the bank.
    #[error("asset index {index} is out of range for a bank of {len}")]
    AssetIndexOutOfRange { index: usize, len: usize },

    /// A decoded file contained no frames.
    #[error("audio asset contains no frames")]
    EmptyAsset,

    /// The output side of a stream has no channels to write into.
    #[error("stream has no output channels")]
    NoAudioChannels,

    #[error("wav file error: {0}")]
    Wav(#[from] hound::Error),
}
