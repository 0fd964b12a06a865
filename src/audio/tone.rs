//! Tone parameters shared by live playback and offline rendering.

use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;

/// Linear attack time, identical for every tone.
pub const ATTACK_SECS: f64 = 0.01;
/// Gain the exponential decay reaches at the end of a tone.
pub const DECAY_FLOOR: f64 = 0.01;

/// One synthesized tone: fixed frequency, fixed envelope shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    /// Hz.
    pub frequency: f64,
    /// Seconds.
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain reached at the end of the attack.
    pub volume: f64,
}

impl ToneSpec {
    pub const fn new(frequency: f64, duration: f64, waveform: Waveform, volume: f64) -> Self {
        ToneSpec {
            frequency,
            duration,
            waveform,
            volume,
        }
    }

    /// Envelope gain `t` seconds after the tone starts: linear from 0 to
    /// `volume` over the attack, then exponential towards `DECAY_FLOOR`,
    /// reached at `duration`. Zero outside the tone.
    pub fn gain_at(&self, t: f64) -> f64 {
        if t < 0.0 || t > self.duration || self.volume <= 0.0 {
            return 0.0;
        }
        let attack = ATTACK_SECS.min(self.duration);
        if t < attack {
            return self.volume * t / attack;
        }
        let span = self.duration - attack;
        if span <= 0.0 {
            return self.volume;
        }
        let progress = (t - attack) / span;
        self.volume * (DECAY_FLOOR / self.volume).powf(progress)
    }
}
