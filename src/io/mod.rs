//! External interfaces: the asset abstraction and WAV files.

pub mod asset;
pub mod wav;

pub use asset::{AssetBank, AudioAsset, EdgeMode, SampleBuffer};
pub use wav::{load_wav, read_wav, write_wav};
