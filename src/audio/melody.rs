//! The background melody.

use crate::dsp::oscillator::Waveform;

use super::tone::ToneSpec;

/// C major, up to G and back down.
pub const MELODY_HZ: [f64; 8] = [523.0, 587.0, 659.0, 698.0, 784.0, 698.0, 659.0, 587.0];

pub const NOTE_SPACING_MS: u64 = 600;

/// Length of one pass; the next pass starts right after.
pub const PASS_MS: u64 = MELODY_HZ.len() as u64 * NOTE_SPACING_MS;

const NOTE_SECS: f64 = 0.5;
/// Well under the foreground cue volumes.
const NOTE_VOLUME: f64 = 0.1;

pub fn note(index: usize) -> ToneSpec {
    ToneSpec::new(
        MELODY_HZ[index % MELODY_HZ.len()],
        NOTE_SECS,
        Waveform::Sine,
        NOTE_VOLUME,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cue::Cue;

    #[test]
    fn rises_then_falls() {
        let peak = MELODY_HZ
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(MELODY_HZ[..=peak].windows(2).all(|w| w[0] < w[1]));
        assert!(MELODY_HZ[peak..].windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn notes_are_quieter_than_every_cue() {
        let cues = [
            Cue::Click,
            Cue::Win,
            Cue::Lose,
            Cue::Tie,
            Cue::GameOver { player_won: true },
            Cue::GameOver { player_won: false },
        ];
        let quietest = cues
            .iter()
            .flat_map(|c| c.tones())
            .map(|t| t.tone.volume)
            .fold(f64::MAX, f64::min);
        assert!(note(0).volume < quietest);
    }

    #[test]
    fn pass_length() {
        assert_eq!(PASS_MS, 4800);
        assert!(note(7).duration * 1000.0 < NOTE_SPACING_MS as f64);
    }
}
