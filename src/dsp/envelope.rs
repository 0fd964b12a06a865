//! Tone envelope: short linear attack, exponential decay, then silence.

use crate::audio::tone::{ATTACK_SECS, DECAY_FLOOR, ToneSpec};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Attack,
    Decay,
    Finished,
}

/// Per-sample generator for the shape described by [`ToneSpec::gain_at`].
#[derive(Debug, Clone)]
pub struct ToneEnvelope {
    stage: Stage,
    level: f64,
    peak: f64,
    /// Added per sample during the attack.
    attack_step: f64,
    /// Multiplied in per sample during the decay.
    decay_ratio: f64,
    attack_samples: usize,
    total_samples: usize,
    counter: usize,
}

impl ToneEnvelope {
    pub fn new(tone: &ToneSpec, sample_rate: f64) -> Self {
        let total_samples = (tone.duration.max(0.0) * sample_rate) as usize;
        let attack_samples = ((ATTACK_SECS * sample_rate) as usize).min(total_samples);
        let decay_samples = total_samples - attack_samples;
        let peak = tone.volume.max(0.0);

        let decay_ratio = if decay_samples > 0 && peak > 0.0 {
            (DECAY_FLOOR / peak).powf(1.0 / decay_samples as f64)
        } else {
            1.0
        };

        ToneEnvelope {
            stage: if total_samples == 0 || peak == 0.0 {
                Stage::Finished
            } else {
                Stage::Attack
            },
            level: 0.0,
            peak,
            attack_step: if attack_samples > 0 {
                peak / attack_samples as f64
            } else {
                peak
            },
            decay_ratio,
            attack_samples,
            total_samples,
            counter: 0,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        let out = match self.stage {
            Stage::Finished => return 0.0,
            Stage::Attack => {
                let out = self.level;
                self.level = (self.level + self.attack_step).min(self.peak);
                if self.counter + 1 >= self.attack_samples {
                    self.level = self.peak;
                    self.stage = Stage::Decay;
                }
                out
            }
            Stage::Decay => {
                let out = self.level;
                self.level *= self.decay_ratio;
                out
            }
        };

        self.counter += 1;
        if self.counter >= self.total_samples {
            self.stage = Stage::Finished;
        }
        out
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;

    const SR: f64 = 44100.0;

    fn run(tone: &ToneSpec) -> Vec<f64> {
        let mut env = ToneEnvelope::new(tone, SR);
        let mut out = Vec::new();
        while !env.is_finished() {
            out.push(env.next_sample());
        }
        out
    }

    #[test]
    fn length_matches_duration() {
        let tone = ToneSpec::new(800.0, 0.1, Waveform::Square, 0.2);
        assert_eq!(run(&tone).len(), 4410);
    }

    #[test]
    fn starts_at_zero_and_peaks_after_attack() {
        let tone = ToneSpec::new(400.0, 0.5, Waveform::Sawtooth, 0.3);
        let samples = run(&tone);
        assert_eq!(samples[0], 0.0);
        let attack = (ATTACK_SECS * SR) as usize;
        let max = samples.iter().cloned().fold(0.0, f64::max);
        assert!((max - 0.3).abs() < 1e-9);
        assert!((samples[attack] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn ends_near_floor() {
        let tone = ToneSpec::new(200.0, 1.0, Waveform::Sawtooth, 0.3);
        let samples = run(&tone);
        let last = *samples.last().unwrap();
        assert!((last - DECAY_FLOOR).abs() < 1e-3, "last sample {last}");
    }

    #[test]
    fn tracks_closed_form_gain() {
        let tone = ToneSpec::new(523.0, 0.2, Waveform::Sine, 0.3);
        let samples = run(&tone);
        for (i, s) in samples.iter().enumerate().step_by(97) {
            let expected = tone.gain_at(i as f64 / SR);
            assert!((s - expected).abs() < 1e-3, "sample {i}: {s} vs {expected}");
        }
    }

    #[test]
    fn silent_tone_finishes_immediately() {
        let tone = ToneSpec::new(440.0, 0.0, Waveform::Sine, 0.3);
        let mut env = ToneEnvelope::new(&tone, SR);
        assert!(env.is_finished());
        assert_eq!(env.next_sample(), 0.0);
    }
}
