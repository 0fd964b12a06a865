//! Game configuration.
//!
//! Every field has a default, so a host only needs to pass the values it
//! wants to change, e.g. `{"locale": "zh", "audio": {"musicEnabled": false}}`.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::messages::Locale;

/// Sound-effect and music switches. Not persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioSettings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        AudioSettings {
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Score that ends the match.
    pub win_threshold: u32,
    /// Delay between input and the round result.
    pub suspense_ms: u64,
    /// Frames in the spin animation; the last one shows the real choice.
    pub spin_frames: u32,
    pub spin_interval_ms: u64,
    /// Delay between the deciding round and the game-over announcement.
    pub game_over_delay_ms: u64,
    pub music_start_delay_ms: u64,
    /// Delay before a sound toggle takes effect, so its own click is heard.
    pub sound_toggle_delay_ms: u64,
    pub locale: Locale,
    pub audio: AudioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            win_threshold: 5,
            suspense_ms: 1000,
            spin_frames: 10,
            spin_interval_ms: 100,
            game_over_delay_ms: 2000,
            music_start_delay_ms: 1000,
            sound_toggle_delay_ms: 100,
            locale: Locale::En,
            audio: AudioSettings::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config, rejecting a win threshold of 0 (the match would be
    /// decided before the first round).
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        if config.win_threshold == 0 {
            return Err(GameError::Config(serde::de::Error::custom(
                "winThreshold must be at least 1",
            )));
        }
        Ok(config)
    }
}
