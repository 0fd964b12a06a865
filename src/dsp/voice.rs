//! Voice: one tone, an oscillator shaped by the tone envelope.

use crate::audio::tone::ToneSpec;

use super::envelope::ToneEnvelope;
use super::oscillator::Oscillator;

#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Oscillator,
    envelope: ToneEnvelope,
}

impl Voice {
    pub fn new(tone: &ToneSpec, sample_rate: f64) -> Self {
        Voice {
            oscillator: Oscillator::new(tone.waveform, tone.frequency, sample_rate),
            envelope: ToneEnvelope::new(tone, sample_rate),
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        if self.envelope.is_finished() {
            return 0.0;
        }
        let gain = self.envelope.next_sample();
        self.oscillator.next_sample() * gain
    }

    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }
}
