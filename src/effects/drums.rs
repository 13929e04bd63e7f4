#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::effect::{Effect, StreamConfig};
use crate::dsp::player::SamplePlayer;
use crate::error::DspError;
use crate::io::asset::AssetBank;
use crate::sequencing::ratio::Rate;
use crate::sequencing::tempo_sync::TempoSync;
use crate::sequencing::transport::Transport;

/*
Tempo-Locked Drums
==================

Two voices, each a trigger generator driving a sample player:

  transport ──→ TempoSync(rate, offset) ──→ triggers ──→ SamplePlayer(asset, speed) ──→ × volume ─┐
  transport ──→ TempoSync(rate, offset) ──→ triggers ──→ SamplePlayer(asset, speed) ──→ × volume ─┴─→ every output

The trigger sequence only lives for one block: it is written by the
generator and read by the player straight after. Both voices keep rotating
while muted (volume 0) so they stay in phase when brought back in.

Blocks larger than the size given to `start` are rendered in slices, with
the transport position moved forward for each slice.
*/

/// Number of independent drum voices.
pub const VOICES: usize = 2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumVoiceParams {
    pub rate: Rate,
    /// Phase offset in cycles, 0..45.
    pub offset: f64,
    /// Index into the asset bank.
    pub sample: usize,
    /// Playback speed, 0.01..10. The player clamps it to `0..=MAX_SPEED`.
    pub speed: f32,
    /// Output gain; 0 mutes the voice without stopping its clock.
    pub volume: f32,
    pub looping: bool,
}

impl Default for DrumVoiceParams {
    fn default() -> Self {
        Self {
            rate: Rate::Quarter,
            offset: 0.0,
            sample: 0,
            speed: 1.0,
            volume: 0.5,
            looping: false,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumsParams {
    pub voices: [DrumVoiceParams; VOICES],
    /// Re-anchor to the host position every block.
    pub locked: bool,
}

impl Default for DrumsParams {
    fn default() -> Self {
        Self {
            voices: [
                DrumVoiceParams {
                    rate: Rate::Quarter,
                    sample: 0,
                    speed: 0.8,
                    volume: 0.4,
                    ..DrumVoiceParams::default()
                },
                DrumVoiceParams {
                    rate: Rate::Sixth,
                    sample: 1,
                    speed: 1.2,
                    volume: 0.5,
                    ..DrumVoiceParams::default()
                },
            ],
            locked: true,
        }
    }
}

struct DrumVoice {
    sync: TempoSync,
    player: SamplePlayer,
    triggers: Vec<bool>,
    buffer: Vec<f32>,
}

impl DrumVoice {
    fn new(block_size: usize) -> Self {
        Self {
            sync: TempoSync::default(),
            player: SamplePlayer::new(),
            triggers: vec![false; block_size],
            buffer: vec![0.0; block_size],
        }
    }
}

pub struct Drums {
    params: DrumsParams,
    bank: AssetBank,
    voices: [DrumVoice; VOICES],
    sample_rate: f32,
    block_size: usize,
}

impl Drums {
    pub fn new(params: DrumsParams, bank: AssetBank) -> Self {
        let config = StreamConfig::default();
        Self {
            params,
            bank,
            voices: [
                DrumVoice::new(config.max_block_size),
                DrumVoice::new(config.max_block_size),
            ],
            sample_rate: config.sample_rate,
            block_size: config.max_block_size,
        }
    }

    pub fn params(&self) -> &DrumsParams {
        &self.params
    }

    pub fn set_params(&mut self, params: DrumsParams) {
        self.params = params;
    }

    pub fn bank(&self) -> &AssetBank {
        &self.bank
    }

    pub fn set_bank(&mut self, bank: AssetBank) {
        self.bank = bank;
    }

    /// Restart every voice from its first frame right now.
    pub fn trigger(&mut self) {
        for voice in &mut self.voices {
            voice.player.start();
        }
    }

    /// Phase of each voice's trigger generator.
    pub fn phases(&self) -> [f64; VOICES] {
        [self.voices[0].sync.phase(), self.voices[1].sync.phase()]
    }

    fn render_slice(
        &mut self,
        outputs: &mut [&mut [f32]],
        range: std::ops::Range<usize>,
        transport: &Transport,
    ) -> Result<(), DspError> {
        let Self {
            params,
            bank,
            voices,
            sample_rate,
            ..
        } = self;
        let frames = range.len();

        for output in outputs.iter_mut() {
            output[range.clone()].fill(0.0);
        }

        for (voice, voice_params) in voices.iter_mut().zip(params.voices.iter()) {
            voice.sync.set_rate(voice_params.rate);
            voice.sync.set_offset(voice_params.offset);
            voice.sync.set_locked(params.locked);

            let triggers = &mut voice.triggers[..frames];
            voice.sync.process(transport, *sample_rate, triggers);

            if voice_params.volume <= 0.0 {
                continue;
            }

            let asset = bank.get(voice_params.sample)?;
            voice.player.bind(asset);
            voice.player.set_speed(voice_params.speed);
            voice.player.set_looping(voice_params.looping);

            let buffer = &mut voice.buffer[..frames];
            voice
                .player
                .render(triggers, buffer, *sample_rate, voice_params.volume)?;

            for output in outputs.iter_mut() {
                for (out, sample) in output[range.clone()].iter_mut().zip(buffer.iter()) {
                    *out += sample;
                }
            }
        }

        Ok(())
    }
}

impl Effect for Drums {
    fn start(&mut self, config: &StreamConfig) {
        self.sample_rate = config.sample_rate;
        self.block_size = config.max_block_size.max(1);
        for voice in &mut self.voices {
            voice.triggers = vec![false; self.block_size];
            voice.buffer = vec![0.0; self.block_size];
            voice.sync.reset();
        }

        if config.sample_rate < 22_050.0 {
            warn!(sample_rate = config.sample_rate, "unusually low sample rate");
        }
        info!(
            outputs = config.outputs,
            block_size = self.block_size,
            assets = self.bank.len(),
            "drums started"
        );
    }

    fn process(
        &mut self,
        _inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        transport: &Transport,
    ) -> Result<(), DspError> {
        if self.bank.is_empty() {
            return Err(DspError::EmptyAssetBank);
        }
        if outputs.is_empty() {
            return Err(DspError::NoAudioChannels);
        }

        let frames = outputs
            .iter()
            .fold(frames, |frames, output| frames.min(output.len()));

        let mut done = 0;
        while done < frames {
            let slice = (frames - done).min(self.block_size);
            let mut slice_transport = *transport;
            if transport.playing {
                slice_transport.time_in_samples += done as i64;
            }

            self.render_slice(outputs, done..done + slice, &slice_transport)?;
            done += slice;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::asset::SampleBuffer;

    const SR: f32 = 48_000.0;

    fn constant_bank(len: usize) -> AssetBank {
        AssetBank::new()
            .with(SampleBuffer::new(vec![1.0; len], SR).into_shared())
            .with(SampleBuffer::new(vec![-1.0; len], SR).into_shared())
    }

    fn single_voice() -> DrumsParams {
        let mut params = DrumsParams::default();
        params.voices[0].speed = 1.0;
        params.voices[1].volume = 0.0;
        params
    }

    fn playing_at(time_in_samples: i64) -> Transport {
        Transport {
            playing: true,
            bpm: 120.0,
            time_sig_denominator: 4,
            time_in_samples,
        }
    }

    fn render(drums: &mut Drums, frames: usize, block: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        let mut time = 0;
        for start in (0..frames).step_by(block) {
            let end = (start + block).min(frames);
            let mut outs: [&mut [f32]; 2] = [&mut left[start..end], &mut right[start..end]];
            drums
                .process(&[], &mut outs, end - start, &playing_at(time))
                .unwrap();
            time += (end - start) as i64;
        }
        (left, right)
    }

    #[test]
    fn test_empty_bank_is_fatal() {
        let mut drums = Drums::new(DrumsParams::default(), AssetBank::new());
        drums.start(&StreamConfig::new(SR, 0, 2, 256));

        let mut out = vec![0.0; 64];
        let result = drums.process(&[], &mut [&mut out], 64, &playing_at(0));
        assert!(matches!(result, Err(DspError::EmptyAssetBank)));

        drums.set_bank(constant_bank(16));
        assert_eq!(drums.bank().len(), 2);
        drums
            .process(&[], &mut [&mut out], 64, &playing_at(0))
            .unwrap();
        assert!(out[0] != 0.0, "downbeat should sound once samples are loaded");
    }

    #[test]
    fn test_bad_sample_index_is_fatal() {
        let mut params = DrumsParams::default();
        params.voices[1].sample = 7;
        let mut drums = Drums::new(params, constant_bank(16));
        drums.start(&StreamConfig::new(SR, 0, 1, 256));

        let mut out = vec![0.0; 64];
        let result = drums.process(&[], &mut [&mut out], 64, &playing_at(0));
        assert!(matches!(
            result,
            Err(DspError::AssetIndexOutOfRange { index: 7, len: 2 })
        ));
    }

    #[test]
    fn test_stopped_transport_is_silent() {
        let mut drums = Drums::new(DrumsParams::default(), constant_bank(1_000));
        drums.start(&StreamConfig::new(SR, 0, 2, 512));

        let mut left = vec![1.0; 512];
        let mut right = vec![1.0; 512];
        let stopped = Transport::default();
        drums
            .process(&[], &mut [&mut left, &mut right], 512, &stopped)
            .unwrap();
        assert!(left.iter().chain(&right).all(|&x| x == 0.0));
    }

    #[test]
    fn test_hits_land_on_the_beat() {
        // 1/4 at 120 bpm, 4/4: a hit every 24000 frames
        let mut drums = Drums::new(single_voice(), constant_bank(1_000));
        drums.start(&StreamConfig::new(SR, 0, 2, 480));

        let (left, right) = render(&mut drums, 72_000, 480);
        for beat in 0..3 {
            let at = beat * 24_000;
            assert_eq!(left[at], 0.4, "beat {beat}");
            assert_eq!(left[at + 1_000], 0.4, "beat {beat} still sounding");
            assert_eq!(left[at + 2_000], 0.0, "beat {beat} should have ended");
            assert_eq!(left[at + 23_999], 0.0);
        }
        assert_eq!(left, right);
    }

    #[test]
    fn test_voices_are_summed() {
        let mut params = single_voice();
        params.voices[1] = DrumVoiceParams {
            rate: Rate::Quarter,
            sample: 1,
            speed: 1.0,
            volume: 0.25,
            ..DrumVoiceParams::default()
        };
        let mut drums = Drums::new(params, constant_bank(1_000));
        drums.start(&StreamConfig::new(SR, 0, 2, 480));

        let (left, _) = render(&mut drums, 4_800, 480);
        assert!((left[0] - 0.15).abs() < 1e-7, "got {}", left[0]);
    }

    #[test]
    fn test_oversized_blocks_are_sliced() {
        // Half a frame of offset keeps every pulse edge clear of rounding
        let mut params = single_voice();
        params.voices[0].offset = 0.5 / 24_000.0;

        let mut sliced = Drums::new(params, constant_bank(1_000));
        sliced.start(&StreamConfig::new(SR, 0, 2, 128));
        let mut whole = Drums::new(params, constant_bank(1_000));
        whole.start(&StreamConfig::new(SR, 0, 2, 2_048));

        let (a, _) = render(&mut sliced, 24_576, 2_048);
        let (b, _) = render(&mut whole, 24_576, 2_048);
        for (n, (x, y)) in a.iter().zip(&b).enumerate() {
            assert!((x - y).abs() < 1e-6, "frame {n}: {x} vs {y}");
        }
    }

    #[test]
    fn test_muted_voice_keeps_its_clock() {
        let mut drums = Drums::new(single_voice(), constant_bank(100));
        drums.start(&StreamConfig::new(SR, 0, 1, 256));

        let mut out = vec![0.0; 256];
        drums
            .process(&[], &mut [&mut out], 256, &playing_at(0))
            .unwrap();
        let [_, muted] = drums.phases();
        assert!(muted > 0.0, "muted voice did not rotate");
    }

    #[test]
    fn test_manual_trigger_plays_without_transport() {
        let mut drums = Drums::new(single_voice(), constant_bank(100));
        drums.start(&StreamConfig::new(SR, 0, 1, 256));
        drums.trigger();

        let mut out = vec![0.0; 256];
        drums
            .process(&[], &mut [&mut out], 256, &Transport::default())
            .unwrap();
        assert_eq!(out[0], 0.4);
        assert_eq!(out[99], 0.4);
        assert_eq!(out[100], 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_preset_keeps_defaults() {
        let params: DrumsParams =
            serde_json::from_str(r#"{ "locked": false, "voices": [{ "rate": "Eighth" }, { "volume": 0.0 }] }"#)
                .unwrap();
        assert!(!params.locked);
        assert_eq!(params.voices[0].rate, Rate::Eighth);
        assert_eq!(params.voices[0].speed, DrumVoiceParams::default().speed);
        assert_eq!(params.voices[1].volume, 0.0);

        let empty: DrumsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DrumsParams::default());
    }
}
