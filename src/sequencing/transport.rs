#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Host musical clock as seen by one block.
///
/// `time_in_samples` is the absolute position since the host timeline
/// started. It only moves while `playing`, and a seek can make it jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    pub playing: bool,
    pub bpm: f64,
    pub time_sig_denominator: u32,
    pub time_in_samples: i64,
}

impl Transport {
    pub fn stopped(bpm: f64, time_sig_denominator: u32) -> Self {
        Self {
            playing: false,
            bpm,
            time_sig_denominator,
            time_in_samples: 0,
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::stopped(120.0, 4)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TransportCommand {
    Play,
    Stop,
    SetBpm(f64),
    SetTimeSigDenominator(u32),
    /// Jump to an absolute sample position.
    Seek(i64),
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<TransportCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<TransportCommand> {
    fn pop(&mut self) -> Option<TransportCommand> {
        Consumer::pop(self).ok()
    }
}

/// Standalone transport for hosts that have no musical clock of their own.
///
/// Call [`TransportClock::snapshot`] before a block and
/// [`TransportClock::advance`] after it.
#[derive(Debug, Clone)]
pub struct TransportClock {
    transport: Transport,
}

impl TransportClock {
    pub fn new(bpm: f64, time_sig_denominator: u32) -> Self {
        Self {
            transport: Transport::stopped(bpm, time_sig_denominator),
        }
    }

    pub fn snapshot(&self) -> Transport {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.playing
    }

    /// Move the timeline forward by one block. No-op while stopped.
    pub fn advance(&mut self, frames: usize) {
        if self.transport.playing {
            self.transport.time_in_samples += frames as i64;
        }
    }

    pub fn apply(&mut self, command: TransportCommand) {
        let t = &mut self.transport;
        match command {
            TransportCommand::Play => t.playing = true,
            TransportCommand::Stop => t.playing = false,
            TransportCommand::SetBpm(bpm) => {
                if bpm.is_finite() && bpm > 0.0 {
                    t.bpm = bpm;
                }
            }
            TransportCommand::SetTimeSigDenominator(den) => {
                if den > 0 {
                    t.time_sig_denominator = den;
                }
            }
            TransportCommand::Seek(position) => t.time_in_samples = position.max(0),
        }
    }

    /// Apply every pending command from the control thread.
    pub fn drain<R: CommandReceiver>(&mut self, receiver: &mut R) {
        while let Some(command) = receiver.pop() {
            self.apply(command);
        }
    }
}

impl Default for TransportClock {
    fn default() -> Self {
        Self::new(120.0, 4)
    }
}
