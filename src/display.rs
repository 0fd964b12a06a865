//! Display updates emitted by the session.
//!
//! The core never touches a DOM. It describes what the page should show as a
//! stream of `DisplayUpdate`s; the host applies them.

use serde::{Deserialize, Serialize};

/// Style class attached to a result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    #[default]
    None,
    Win,
    Lose,
    Tie,
}

/// Highlight for one of the two choice displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    None,
    Winner,
    Loser,
}

/// Glyph shown before any choice is made.
pub const PLACEHOLDER_GLYPH: &str = "❓";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DisplayUpdate {
    Score { player: u32, computer: u32 },
    PlayerGlyph { glyph: String },
    ComputerGlyph { glyph: String },
    Message { text: String, style: StyleTag },
    Highlight { player: Highlight, computer: Highlight },
    InputEnabled { enabled: bool },
    SoundButton { enabled: bool, label: String },
    MusicButton { enabled: bool, label: String },
}

/// Anything that can receive display updates.
pub trait Surface {
    fn render(&mut self, update: DisplayUpdate);
}

impl Surface for Vec<DisplayUpdate> {
    fn render(&mut self, update: DisplayUpdate) {
        self.push(update);
    }
}
