use tempo_dsp::{
    effects::{Drums, Effect, StreamConfig},
    sequencing::{CommandReceiver, TransportClock},
    DspError,
};

/// Drives the drum effect from a standalone transport.
///
/// The effect writes the same signal to every output, so it renders into one
/// mono buffer that is then fanned out to the interleaved device buffer.
pub struct Host {
    drums: Drums,
    clock: TransportClock,
    mono: Vec<f32>,
    channels: usize,
}

impl Host {
    pub fn new(mut drums: Drums, clock: TransportClock, sample_rate: f32, channels: usize) -> Self {
        let config = StreamConfig::new(sample_rate, 0, 1, tempo_dsp::MAX_BLOCK_SIZE);
        drums.start(&config);
        Self {
            drums,
            clock,
            mono: vec![0.0; config.max_block_size],
            channels: channels.max(1),
        }
    }

    pub fn clock_mut(&mut self) -> &mut TransportClock {
        &mut self.clock
    }

    /// Apply queued transport commands before the next block.
    pub fn drain<R: CommandReceiver>(&mut self, receiver: &mut R) {
        self.clock.drain(receiver);
    }

    /// Fill an interleaved buffer, advancing the transport by what was rendered.
    pub fn render_interleaved(&mut self, data: &mut [f32]) -> Result<(), DspError> {
        let Host {
            drums,
            clock,
            mono,
            channels,
        } = self;
        let channels = *channels;
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(mono.len());
            let transport = clock.snapshot();

            let block = &mut mono[..frames];
            drums.process(&[], &mut [block], frames, &transport)?;

            let out_off = frames_written * channels;
            for (i, &sample) in mono[..frames].iter().enumerate() {
                let frame = out_off + i * channels;
                data[frame..frame + channels].fill(sample);
            }

            clock.advance(frames);
            frames_written += frames;
        }

        // A trailing partial frame would otherwise replay the previous callback
        data[total_frames * channels..].fill(0.0);
        Ok(())
    }
}
