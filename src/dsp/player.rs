use std::sync::Arc;

use crate::{
    dsp::interpolation::hermite4,
    error::DspError,
    io::asset::{AudioAsset, EdgeMode},
};

/*
Triggered Sample Player
=======================

Plays a fixed-rate asset at any speed, restarting from frame 0 whenever the
per-frame trigger sequence fires.

The State Machine
-----------------

    ┌──────┐  trigger / start()  ┌─────────┐  position ≥ length  ┌──────────┐
    │ Idle │ ──────────────────→ │ Playing │ ──────────────────→ │ Finished │
    └──────┘                     └─────────┘   (loop disabled)   └──────────┘
                                   ↑     │                            │
                                   └─────┘ trigger: position = 0      │
                                   ↑                                  │
                                   └──────────────────────────────────┘
                                              trigger

A trigger always restarts, whatever the current state. With looping enabled
the position wraps back into the asset and Finished is never reached.


Resampling
----------

    step = asset_rate / output_rate × speed

Each frame reads the asset around floor(position) and interpolates with a
4-point Hermite at the fractional part. Reads outside the asset resolve as
silence (one-shot) or wrap (looping), so the first and last frames get
well-defined neighbours.


Missing Asset
-------------

Rendering with nothing bound is an error, not silence. A voice that forgot its
sample should stop the block loudly instead of producing quiet "success".
*/

/// Fastest playback speed accepted by [`SamplePlayer::set_speed`].
pub const MAX_SPEED: f32 = 10.0;

/// Taps gathered per frame, from `x - 2` to `x + 4`.
const HISTORY_TAPS: usize = 7;
const HISTORY_OFFSET: i64 = -2;
// Positions inside the history window
const XM1: usize = 1;
const X0: usize = 2;
const X1: usize = 3;
const X2: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing has started playback yet.
    Idle,
    /// Position is advancing through the asset.
    Playing,
    /// Reached the end with looping off; silent until retriggered.
    Finished,
}

pub struct SamplePlayer {
    asset: Option<Arc<dyn AudioAsset>>,
    position: f64,
    history: [f32; HISTORY_TAPS],
    speed: f32,
    looping: bool,
    state: PlayerState,
}

impl SamplePlayer {
    pub fn new() -> Self {
        Self {
            asset: None,
            position: 0.0,
            history: [0.0; HISTORY_TAPS],
            speed: 1.0,
            looping: false,
            state: PlayerState::Idle,
        }
    }

    /// Bind the asset to read from. Rebinding the same asset is a no-op.
    pub fn bind(&mut self, asset: &Arc<dyn AudioAsset>) {
        let same = self
            .asset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, asset));
        if !same {
            self.asset = Some(Arc::clone(asset));
        }
    }

    pub fn unbind(&mut self) {
        self.asset = None;
    }

    pub fn is_bound(&self) -> bool {
        self.asset.is_some()
    }

    /// Restart from the first frame, outside of any trigger sequence.
    pub fn start(&mut self) {
        self.position = 0.0;
        self.state = PlayerState::Playing;
    }

    /// Playback speed multiplier, clamped to `0..=MAX_SPEED`. NaN becomes 0.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0).min(MAX_SPEED);
    }

    /// Enabling the loop on a finished player resumes it from the wrapped
    /// position.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if looping && self.state == PlayerState::Finished {
            self.state = PlayerState::Playing;
            if let Some(asset) = &self.asset {
                let length = asset.frame_count() as f64;
                if length > 0.0 {
                    self.position = self.position.rem_euclid(length);
                }
            }
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Current read position in asset frames.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Render one block into `out`.
    ///
    /// `triggers` holds one flag per output frame; a sequence whose length
    /// differs from `out.len()` is ignored as a whole. Output is overwritten,
    /// not mixed.
    pub fn render(
        &mut self,
        triggers: &[bool],
        out: &mut [f32],
        sample_rate: f32,
        gain: f32,
    ) -> Result<(), DspError> {
        let Self {
            asset,
            position,
            history,
            speed,
            looping,
            state,
        } = self;
        let asset = asset.as_deref().ok_or(DspError::AssetNotBound)?;

        let use_triggers = triggers.len() == out.len();
        let length = asset.frame_count() as f64;
        let edge = if *looping {
            EdgeMode::Wrap
        } else {
            EdgeMode::Zero
        };

        let step = (asset.sample_rate() as f64 / sample_rate as f64) * *speed as f64;
        if !(sample_rate > 0.0) || !step.is_finite() {
            out.fill(0.0);
            return Ok(());
        }

        for (i, sample) in out.iter_mut().enumerate() {
            if use_triggers && triggers[i] {
                *position = 0.0;
                *state = PlayerState::Playing;
            }

            if *state != PlayerState::Playing || length == 0.0 {
                *sample = 0.0;
                continue;
            }

            let whole = position.floor();
            let frac = (*position - whole) as f32;
            let x = whole as i64;

            for (h, tap) in history.iter_mut().enumerate() {
                *tap = asset.at(x + h as i64 + HISTORY_OFFSET, edge);
            }

            *sample = if *position < length {
                hermite4(frac, history[XM1], history[X0], history[X1], history[X2]) * gain
            } else {
                0.0
            };

            *position += step;

            if *looping {
                if *position >= length {
                    *position = position.rem_euclid(length);
                }
            } else if *position >= length {
                *state = PlayerState::Finished;
            }
        }

        Ok(())
    }
}

impl Default for SamplePlayer {
    fn default() -> Self {
        Self::new()
    }
}
