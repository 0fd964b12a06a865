//! Cues: fixed tone patterns for game events.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::choice::RoundResult;
use crate::dsp::oscillator::Waveform;
use crate::error::GameError;

use super::tone::ToneSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cue {
    Click,
    Win,
    Lose,
    Tie,
    GameOver { player_won: bool },
}

/// A tone and when it starts, relative to the cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTone {
    pub offset_ms: u64,
    pub tone: ToneSpec,
}

const CLICK: ToneSpec = ToneSpec::new(800.0, 0.1, Waveform::Square, 0.2);
const LOSE: ToneSpec = ToneSpec::new(400.0, 0.5, Waveform::Sawtooth, 0.3);
const TIE: ToneSpec = ToneSpec::new(600.0, 0.3, Waveform::Triangle, 0.2);
const DEFEAT: ToneSpec = ToneSpec::new(200.0, 1.0, Waveform::Sawtooth, 0.3);

/// C5 E5 G5, rising.
const WIN_ARPEGGIO: [(u64, ToneSpec); 3] = [
    (0, ToneSpec::new(523.0, 0.2, Waveform::Sine, 0.3)),
    (200, ToneSpec::new(659.0, 0.2, Waveform::Sine, 0.3)),
    (400, ToneSpec::new(784.0, 0.3, Waveform::Sine, 0.3)),
];

const VICTORY_NOTES: u64 = 5;
const VICTORY_BASE_HZ: f64 = 523.0;
const VICTORY_STEP_HZ: f64 = 100.0;
const VICTORY_SPACING_MS: u64 = 150;

impl Cue {
    pub fn for_result(result: RoundResult) -> Cue {
        match result {
            RoundResult::Win => Cue::Win,
            RoundResult::Lose => Cue::Lose,
            RoundResult::Tie => Cue::Tie,
        }
    }

    pub fn tones(self) -> Vec<ScheduledTone> {
        let at = |offset_ms, tone| ScheduledTone { offset_ms, tone };
        match self {
            Cue::Click => vec![at(0, CLICK)],
            Cue::Win => WIN_ARPEGGIO.iter().map(|&(ms, tone)| at(ms, tone)).collect(),
            Cue::Lose => vec![at(0, LOSE)],
            Cue::Tie => vec![at(0, TIE)],
            Cue::GameOver { player_won: true } => (0..VICTORY_NOTES)
                .map(|i| {
                    let hz = VICTORY_BASE_HZ + i as f64 * VICTORY_STEP_HZ;
                    at(i * VICTORY_SPACING_MS, ToneSpec::new(hz, 0.2, Waveform::Sine, 0.3))
                })
                .collect(),
            Cue::GameOver { player_won: false } => vec![at(0, DEFEAT)],
        }
    }
}

impl FromStr for Cue {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Cue::Click),
            "win" => Ok(Cue::Win),
            "lose" => Ok(Cue::Lose),
            "tie" => Ok(Cue::Tie),
            "victory" => Ok(Cue::GameOver { player_won: true }),
            "defeat" => Ok(Cue::GameOver { player_won: false }),
            _ => Err(GameError::UnknownCue {
                text: s.to_string(),
            }),
        }
    }
}
