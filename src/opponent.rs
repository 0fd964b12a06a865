//! The computer opponent.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::choice::Choice;

/// Source of the computer's moves.
pub trait Opponent {
    fn pick(&mut self) -> Choice;

    /// A throwaway glyph for one frame of the spin animation.
    fn spin_glyph(&mut self) -> &'static str {
        self.pick().glyph()
    }
}

/// Picks uniformly at random, with no memory of earlier rounds.
#[derive(Debug, Clone)]
pub struct ComputerPlayer<R = SmallRng> {
    rng: R,
}

impl ComputerPlayer<SmallRng> {
    pub fn new() -> Self {
        ComputerPlayer {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl Default for ComputerPlayer<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ComputerPlayer<R> {
    pub fn with_rng(rng: R) -> Self {
        ComputerPlayer { rng }
    }
}

impl<R: Rng> Opponent for ComputerPlayer<R> {
    fn pick(&mut self) -> Choice {
        Choice::ALL[self.rng.random_range(0..Choice::ALL.len())]
    }
}
