//! Scores and round phases.

use serde::{Deserialize, Serialize};

use crate::choice::RoundResult;

/// Which side took the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Computer,
}

/// Where the orchestrator is in the round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Awaiting input.
    #[default]
    Idle,
    /// Spin animation running, computer choice not yet shown.
    Animating,
    /// Computer choice shown, waiting for the reveal.
    Resolving,
    /// Threshold reached, game-over not yet announced. Input stays frozen.
    Concluding,
    /// Terminal until reset.
    GameOver,
}

impl Phase {
    pub fn accepts_choice(self) -> bool {
        self == Phase::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player: u32,
    pub computer: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one round outcome. Returns the winner only on the round that
    /// first brings a side to `threshold`.
    pub fn record(&mut self, result: RoundResult, threshold: u32) -> Option<Winner> {
        let before = self.leader_at(threshold);
        match result {
            RoundResult::Win => self.player += 1,
            RoundResult::Lose => self.computer += 1,
            RoundResult::Tie => {}
        }
        match before {
            Some(_) => None,
            None => self.leader_at(threshold),
        }
    }

    /// The side that has reached `threshold`, if any.
    pub fn leader_at(&self, threshold: u32) -> Option<Winner> {
        if self.player >= threshold {
            Some(Winner::Player)
        } else if self.computer >= threshold {
            Some(Winner::Computer)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
