//! Sound events
//!
//! The simulation queues named sound effects as things happen; the host
//! drains them once per frame and hands them to an `AudioSink`. Nothing in
//! the simulation waits on playback.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A piece was captured by a landing piece
    Capture,
    /// A piece was promoted
    Promote,
    /// A piece was promoted to king by a landing piece
    Check,
    /// A white piece landed and stayed
    MoveSelf,
    /// A black piece landed and stayed
    MoveOpponent,
    /// A king was captured
    GameEnd,
}

impl SoundEffect {
    /// Asset name of the effect
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Capture => "capture",
            SoundEffect::Promote => "promote",
            SoundEffect::Check => "check",
            SoundEffect::MoveSelf => "moveSelf",
            SoundEffect::MoveOpponent => "moveOpponent",
            SoundEffect::GameEnd => "gameEnd",
        }
    }
}

/// Anything that can play sound effects
pub trait AudioSink {
    /// Fire and forget
    fn play(&mut self, effect: SoundEffect);

    fn play_all(&mut self, effects: impl IntoIterator<Item = SoundEffect>)
    where
        Self: Sized,
    {
        for effect in effects {
            self.play(effect);
        }
    }
}

/// Sink that writes every effect to the log
#[derive(Debug, Default)]
pub struct LogAudio {
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects played so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played += 1;
        log::debug!("sound: {}", effect.as_str());
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl AudioSink for Muted {
    fn play(&mut self, _effect: SoundEffect) {}
}
