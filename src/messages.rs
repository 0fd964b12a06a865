//! Localized text shown on the display surface.

use serde::{Deserialize, Serialize};

use crate::choice::{Choice, RoundResult};
use crate::game::Winner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Shown at start and after every reset.
pub fn prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Make your move!",
        Locale::Zh => "选择您的出招！",
    }
}

pub fn round_result(
    locale: Locale,
    result: RoundResult,
    player: Choice,
    computer: Choice,
) -> String {
    let p = player.label(locale);
    let c = computer.label(locale);
    match (locale, result) {
        (Locale::En, RoundResult::Win) => format!("🎉 You win! {p} beats {c}"),
        (Locale::En, RoundResult::Lose) => format!("😔 You lose! {c} beats {p}"),
        (Locale::En, RoundResult::Tie) => format!("🤝 Tie! Both chose {p}"),
        (Locale::Zh, RoundResult::Win) => format!("🎉 您赢了！{p} 击败 {c}"),
        (Locale::Zh, RoundResult::Lose) => format!("😔 您输了！{c} 击败 {p}"),
        (Locale::Zh, RoundResult::Tie) => format!("🤝 平局！都选择了{p}"),
    }
}

pub fn game_over(locale: Locale, winner: Winner) -> &'static str {
    match (locale, winner) {
        (Locale::En, Winner::Player) => "🏆 Congratulations! You won the match!",
        (Locale::En, Winner::Computer) => "💻 The computer won the match! Try again!",
        (Locale::Zh, Winner::Player) => "🏆 恭喜！您获得了最终胜利！",
        (Locale::Zh, Winner::Computer) => "💻 电脑获得了最终胜利！再试一次吧！",
    }
}

pub fn music_button(locale: Locale, enabled: bool) -> &'static str {
    match (locale, enabled) {
        (Locale::En, true) => "🎵 Music",
        (Locale::En, false) => "🔇 Music",
        (Locale::Zh, true) => "🎵 音乐",
        (Locale::Zh, false) => "🔇 音乐",
    }
}

pub fn sound_button(locale: Locale, enabled: bool) -> &'static str {
    match (locale, enabled) {
        (Locale::En, true) => "🔊 Sound",
        (Locale::En, false) => "🔇 Sound",
        (Locale::Zh, true) => "🔊 音效",
        (Locale::Zh, false) => "🔇 音效",
    }
}
