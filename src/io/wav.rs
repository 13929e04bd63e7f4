use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, warn};

use super::asset::{AudioAsset, SampleBuffer};
use crate::error::DspError;

/// Decode a WAV file into a mono asset (channel 0 only).
pub fn load_wav(path: impl AsRef<Path>) -> Result<SampleBuffer, DspError> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let buffer = decode(reader)?;
    debug!(
        path = %path.display(),
        frames = buffer.samples().len(),
        sample_rate = buffer.sample_rate(),
        "loaded wav asset"
    );
    Ok(buffer)
}

/// Decode WAV data from any reader, e.g. an embedded byte slice.
pub fn read_wav<R: Read>(reader: R) -> Result<SampleBuffer, DspError> {
    decode(WavReader::new(reader)?)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<SampleBuffer, DspError> {
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    if spec.channels > 1 {
        warn!(channels = spec.channels, "multichannel wav, keeping channel 0");
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    if interleaved.len() < channels {
        return Err(DspError::EmptyAsset);
    }

    Ok(SampleBuffer::from_interleaved(
        &interleaved,
        channels,
        spec.sample_rate as f32,
    ))
}

/// Write interleaved float frames as a 32-bit float WAV.
pub fn write_wav(
    path: impl AsRef<Path>,
    interleaved: &[f32],
    channels: u16,
    sample_rate: u32,
) -> Result<(), DspError> {
    let spec = WavSpec {
        channels: channels.max(1),
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for &sample in interleaved {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    debug!(
        path = %path.as_ref().display(),
        frames = interleaved.len() / channels.max(1) as usize,
        "wrote wav"
    );
    Ok(())
}
