//! Session: the round orchestrator.
//!
//! Owns the game state, the opponent and the audio manager, and turns input
//! plus the passage of time into display updates and cues. Every delay in a
//! round is an entry on the session timeline; nothing blocks.

use rand::rngs::SmallRng;

use crate::audio::{AudioManager, Cue};
use crate::choice::{self, Choice, RoundResult};
use crate::config::GameConfig;
use crate::display::{DisplayUpdate, Highlight, PLACEHOLDER_GLYPH, StyleTag, Surface};
use crate::game::{Phase, Scoreboard, Winner};
use crate::messages;
use crate::opponent::{ComputerPlayer, Opponent};
use crate::schedule::Timeline;

/// Events from the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Select(Choice),
    Reset,
    ToggleSound,
    ToggleMusic,
}

/// Round steps waiting on the session timeline. Round steps carry the epoch
/// they were scheduled in; a reset moves the epoch on and strands them.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    SpinFrame { epoch: u64 },
    Reveal { epoch: u64, computer: Choice },
    Resolve { epoch: u64, player: Choice, computer: Choice },
    GameOver { epoch: u64, winner: Winner },
    ApplySoundToggle,
    StartMusic,
}

pub struct Session<O = ComputerPlayer<SmallRng>> {
    config: GameConfig,
    score: Scoreboard,
    phase: Phase,
    epoch: u64,
    opponent: O,
    audio: AudioManager,
    timeline: Timeline<Step>,
    outbox: Vec<DisplayUpdate>,
}

impl Session<ComputerPlayer<SmallRng>> {
    pub fn new(config: GameConfig, audio: AudioManager) -> Self {
        Self::with_opponent(config, audio, ComputerPlayer::new())
    }
}

impl<O: Opponent> Session<O> {
    /// Start a session at time 0: show the initial board and book the
    /// background music.
    pub fn with_opponent(config: GameConfig, audio: AudioManager, opponent: O) -> Self {
        let mut session = Session {
            config,
            score: Scoreboard::new(),
            phase: Phase::Idle,
            epoch: 0,
            opponent,
            audio,
            timeline: Timeline::new(),
            outbox: Vec::new(),
        };

        let locale = session.config.locale;
        let settings = session.audio.settings();
        session.show_board();
        session.push(DisplayUpdate::MusicButton {
            enabled: settings.music_enabled,
            label: messages::music_button(locale, settings.music_enabled).to_string(),
        });
        session.push(DisplayUpdate::SoundButton {
            enabled: settings.sound_enabled,
            label: messages::sound_button(locale, settings.sound_enabled).to_string(),
        });
        session
            .timeline
            .schedule(session.config.music_start_delay_ms, Step::StartMusic);
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> Scoreboard {
        self.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Apply one input at time `now`. Returns false if the input was
    /// ignored (a choice while input is frozen).
    pub fn handle(&mut self, now: u64, input: Input) -> bool {
        self.advance(now);
        let accepted = match input {
            Input::Select(choice) => self.select(choice),
            Input::Reset => {
                self.reset();
                true
            }
            Input::ToggleSound => {
                self.audio.play(Cue::Click);
                self.timeline
                    .schedule(self.config.sound_toggle_delay_ms, Step::ApplySoundToggle);
                true
            }
            Input::ToggleMusic => {
                self.audio.play(Cue::Click);
                let enabled = self.audio.toggle_music();
                self.push(DisplayUpdate::MusicButton {
                    enabled,
                    label: messages::music_button(self.config.locale, enabled).to_string(),
                });
                true
            }
        };
        self.audio.advance(now);
        accepted
    }

    /// Run everything due up to `now`, in order. The audio timeline is
    /// brought to each step's due time first, so cues start when their step
    /// fires. Audio that is already too far behind `now` is skipped.
    pub fn advance(&mut self, now: u64) {
        while let Some((due, step)) = self.timeline.pop_due(now) {
            self.audio.advance_within(due, now);
            self.fire(step);
        }
        self.timeline.advance_to(now);
        self.audio.advance(now);
    }

    /// Hand all pending display updates to `surface`.
    pub fn flush(&mut self, surface: &mut impl Surface) {
        for update in self.outbox.drain(..) {
            surface.render(update);
        }
    }

    pub fn take_updates(&mut self) -> Vec<DisplayUpdate> {
        std::mem::take(&mut self.outbox)
    }

    fn select(&mut self, player: Choice) -> bool {
        if !self.phase.accepts_choice() {
            log::debug!("ignoring {player} while {:?}", self.phase);
            return false;
        }
        self.audio.play(Cue::Click);
        self.phase = Phase::Animating;
        self.push(DisplayUpdate::InputEnabled { enabled: false });
        self.push(DisplayUpdate::Highlight {
            player: Highlight::None,
            computer: Highlight::None,
        });
        self.push(DisplayUpdate::PlayerGlyph {
            glyph: player.glyph().to_string(),
        });

        let computer = self.opponent.pick();
        let epoch = self.epoch;
        let interval = self.config.spin_interval_ms;
        for frame in 1..self.config.spin_frames {
            self.timeline
                .schedule((frame as u64).saturating_mul(interval), Step::SpinFrame { epoch });
        }
        self.timeline.schedule(
            (self.config.spin_frames as u64).saturating_mul(interval),
            Step::Reveal { epoch, computer },
        );
        self.timeline.schedule(
            self.config.suspense_ms,
            Step::Resolve {
                epoch,
                player,
                computer,
            },
        );
        log::debug!("round started: {player} vs {computer}");
        true
    }

    fn reset(&mut self) {
        self.audio.play(Cue::Click);
        self.epoch += 1;
        self.score.reset();
        self.phase = Phase::Idle;
        self.show_board();
        log::debug!("game reset");
    }

    fn fire(&mut self, step: Step) {
        match step {
            Step::SpinFrame { epoch } => {
                if self.is_current(epoch) && self.phase == Phase::Animating {
                    let glyph = self.opponent.spin_glyph();
                    self.push(DisplayUpdate::ComputerGlyph {
                        glyph: glyph.to_string(),
                    });
                }
            }
            Step::Reveal { epoch, computer } => {
                if self.is_current(epoch) && self.phase == Phase::Animating {
                    self.reveal(computer);
                }
            }
            Step::Resolve {
                epoch,
                player,
                computer,
            } => {
                if self.is_current(epoch)
                    && matches!(self.phase, Phase::Animating | Phase::Resolving)
                {
                    self.resolve(player, computer);
                }
            }
            Step::GameOver { epoch, winner } => {
                if self.is_current(epoch) && self.phase == Phase::Concluding {
                    self.game_over(winner);
                }
            }
            Step::ApplySoundToggle => {
                let enabled = self.audio.toggle_sound();
                self.push(DisplayUpdate::SoundButton {
                    enabled,
                    label: messages::sound_button(self.config.locale, enabled).to_string(),
                });
            }
            Step::StartMusic => self.audio.start_music(),
        }
    }

    fn reveal(&mut self, computer: Choice) {
        self.push(DisplayUpdate::ComputerGlyph {
            glyph: computer.glyph().to_string(),
        });
        self.phase = Phase::Resolving;
    }

    fn resolve(&mut self, player: Choice, computer: Choice) {
        if self.phase == Phase::Animating {
            self.reveal(computer);
        }

        let result = choice::resolve(player, computer);
        self.audio.play(Cue::for_result(result));
        let crossed = self.score.record(result, self.config.win_threshold);

        self.push(DisplayUpdate::Score {
            player: self.score.player,
            computer: self.score.computer,
        });
        let (style, highlight) = match result {
            RoundResult::Win => (StyleTag::Win, (Highlight::Winner, Highlight::Loser)),
            RoundResult::Lose => (StyleTag::Lose, (Highlight::Loser, Highlight::Winner)),
            RoundResult::Tie => (StyleTag::Tie, (Highlight::None, Highlight::None)),
        };
        self.push(DisplayUpdate::Message {
            text: messages::round_result(self.config.locale, result, player, computer),
            style,
        });
        self.push(DisplayUpdate::Highlight {
            player: highlight.0,
            computer: highlight.1,
        });

        match crossed {
            Some(winner) => {
                self.phase = Phase::Concluding;
                self.timeline.schedule(
                    self.config.game_over_delay_ms,
                    Step::GameOver {
                        epoch: self.epoch,
                        winner,
                    },
                );
            }
            None => {
                self.phase = Phase::Idle;
                self.push(DisplayUpdate::InputEnabled { enabled: true });
            }
        }
    }

    fn game_over(&mut self, winner: Winner) {
        self.phase = Phase::GameOver;
        let style = match winner {
            Winner::Player => StyleTag::Win,
            Winner::Computer => StyleTag::Lose,
        };
        self.push(DisplayUpdate::Message {
            text: messages::game_over(self.config.locale, winner).to_string(),
            style,
        });
        self.push(DisplayUpdate::InputEnabled { enabled: false });
        self.audio.play(Cue::GameOver {
            player_won: winner == Winner::Player,
        });
        log::debug!(
            "game over: {winner:?} ({}-{})",
            self.score.player,
            self.score.computer
        );
    }

    /// Zeroed score, placeholder glyphs, prompt, input enabled.
    fn show_board(&mut self) {
        self.push(DisplayUpdate::Score {
            player: self.score.player,
            computer: self.score.computer,
        });
        self.push(DisplayUpdate::PlayerGlyph {
            glyph: PLACEHOLDER_GLYPH.to_string(),
        });
        self.push(DisplayUpdate::ComputerGlyph {
            glyph: PLACEHOLDER_GLYPH.to_string(),
        });
        self.push(DisplayUpdate::Highlight {
            player: Highlight::None,
            computer: Highlight::None,
        });
        self.push(DisplayUpdate::Message {
            text: messages::prompt(self.config.locale).to_string(),
            style: StyleTag::None,
        });
        self.push(DisplayUpdate::InputEnabled { enabled: true });
    }

    fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch
    }

    fn push(&mut self, update: DisplayUpdate) {
        self.outbox.push(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::QueueSink;
    use crate::audio::sink::EmittedTone;
    use crate::config::AudioSettings;

    /// Always throws the same hand.
    struct Always(Choice);

    impl Opponent for Always {
        fn pick(&mut self) -> Choice {
            self.0
        }
    }

    fn quiet_config() -> GameConfig {
        GameConfig {
            audio: AudioSettings {
                sound_enabled: true,
                music_enabled: false,
            },
            ..GameConfig::default()
        }
    }

    fn session_with(config: GameConfig, computer: Choice) -> (Session<Always>, QueueSink) {
        let sink = QueueSink::new();
        let audio = AudioManager::new(config.audio, Some(Box::new(sink.clone())));
        let mut session = Session::with_opponent(config, audio, Always(computer));
        session.take_updates();
        (session, sink)
    }

    fn messages_of(updates: &[DisplayUpdate]) -> Vec<(String, StyleTag)> {
        updates
            .iter()
            .filter_map(|u| match u {
                DisplayUpdate::Message { text, style } => Some((text.clone(), *style)),
                _ => None,
            })
            .collect()
    }

    fn pitches(tones: &[EmittedTone]) -> Vec<f64> {
        tones.iter().map(|t| t.tone.frequency).collect()
    }

    /// Play one full round starting at `t`; returns the time after it settles.
    fn play_round(session: &mut Session<Always>, t: u64, choice: Choice) -> u64 {
        assert!(session.handle(t, Input::Select(choice)));
        let end = t + session.config().suspense_ms;
        session.advance(end);
        end
    }

    #[test]
    fn startup_shows_board_and_starts_music() {
        let sink = QueueSink::new();
        let config = GameConfig::default();
        let audio = AudioManager::new(config.audio, Some(Box::new(sink.clone())));
        let mut session = Session::with_opponent(config, audio, Always(Choice::Rock));

        let updates = session.take_updates();
        assert!(updates.contains(&DisplayUpdate::Score { player: 0, computer: 0 }));
        assert!(updates.contains(&DisplayUpdate::InputEnabled { enabled: true }));
        assert_eq!(
            messages_of(&updates),
            vec![("Make your move!".to_string(), StyleTag::None)]
        );

        session.advance(999);
        assert!(!session.audio().is_music_playing());
        session.advance(1000);
        assert!(session.audio().is_music_playing());
        let tones = sink.drain();
        assert_eq!(tones.len(), 1);
        assert_eq!(tones[0].at_ms, 1000);
        assert_eq!(tones[0].tone.volume, 0.1);
    }

    #[test]
    fn round_animates_then_resolves() {
        let (mut session, sink) = session_with(quiet_config(), Choice::Scissors);

        assert!(session.handle(0, Input::Select(Choice::Rock)));
        assert_eq!(session.phase(), Phase::Animating);
        let started = session.take_updates();
        assert!(started.contains(&DisplayUpdate::InputEnabled { enabled: false }));
        assert!(started.contains(&DisplayUpdate::PlayerGlyph {
            glyph: "🪨".to_string()
        }));

        session.advance(550);
        let spins = session
            .take_updates()
            .iter()
            .filter(|u| matches!(u, DisplayUpdate::ComputerGlyph { .. }))
            .count();
        assert_eq!(spins, 5);
        assert_eq!(session.score(), Scoreboard::new());

        session.advance(1000);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), Scoreboard { player: 1, computer: 0 });
        let settled = session.take_updates();
        assert!(settled.contains(&DisplayUpdate::ComputerGlyph {
            glyph: "✂️".to_string()
        }));
        assert_eq!(
            messages_of(&settled),
            vec![("🎉 You win! Rock beats Scissors".to_string(), StyleTag::Win)]
        );
        assert!(settled.contains(&DisplayUpdate::Highlight {
            player: Highlight::Winner,
            computer: Highlight::Loser,
        }));
        assert_eq!(settled.last(), Some(&DisplayUpdate::InputEnabled { enabled: true }));

        session.advance(2000);
        let tones = sink.drain();
        assert_eq!(pitches(&tones), vec![800.0, 523.0, 659.0, 784.0]);
        let times: Vec<_> = tones.iter().map(|t| t.at_ms).collect();
        assert_eq!(times, vec![0, 1000, 1200, 1400]);
    }

    #[test]
    fn choice_ignored_while_round_in_flight() {
        let (mut session, _) = session_with(quiet_config(), Choice::Rock);
        assert!(session.handle(0, Input::Select(Choice::Paper)));
        assert!(!session.handle(300, Input::Select(Choice::Rock)));
        session.advance(5000);
        assert_eq!(session.score(), Scoreboard { player: 1, computer: 0 });
    }

    #[test]
    fn tie_and_loss_scoring() {
        let (mut session, sink) = session_with(quiet_config(), Choice::Paper);
        let t = play_round(&mut session, 0, Choice::Paper);
        assert_eq!(session.score(), Scoreboard::new());
        play_round(&mut session, t, Choice::Rock);
        assert_eq!(session.score(), Scoreboard { player: 0, computer: 1 });
        session.advance(10_000);
        let tones = sink.drain();
        assert!(pitches(&tones).contains(&600.0));
        assert!(pitches(&tones).contains(&400.0));
    }

    #[test]
    fn fifth_win_ends_game_exactly_once() {
        let (mut session, sink) = session_with(quiet_config(), Choice::Scissors);
        let mut t = 0;
        for _ in 0..4 {
            t = play_round(&mut session, t, Choice::Rock);
        }
        assert_eq!(session.score(), Scoreboard { player: 4, computer: 0 });
        assert_eq!(session.phase(), Phase::Idle);
        session.take_updates();

        t = play_round(&mut session, t, Choice::Rock);
        assert_eq!(session.score(), Scoreboard { player: 5, computer: 0 });
        assert_eq!(session.phase(), Phase::Concluding);
        assert!(!session.handle(t + 10, Input::Select(Choice::Rock)));

        session.advance(t + 1999);
        assert_eq!(session.phase(), Phase::Concluding);
        sink.drain();
        session.advance(t + 2000);
        assert_eq!(session.phase(), Phase::GameOver);
        session.advance(t + 3000);
        session.advance(t + 60_000);
        let over: Vec<_> = messages_of(&session.take_updates())
            .into_iter()
            .filter(|(text, _)| text.starts_with("🏆"))
            .collect();
        assert_eq!(over.len(), 1);
        assert_eq!(over[0].1, StyleTag::Win);

        let victory = sink.drain();
        assert_eq!(pitches(&victory), vec![523.0, 623.0, 723.0, 823.0, 923.0]);
        assert!(!session.handle(t + 70_000, Input::Select(Choice::Rock)));
    }

    #[test]
    fn computer_match_win_plays_defeat() {
        let config = GameConfig {
            win_threshold: 1,
            ..quiet_config()
        };
        let (mut session, sink) = session_with(config, Choice::Paper);
        let t = play_round(&mut session, 0, Choice::Rock);
        session.advance(t + 2000);
        assert_eq!(session.phase(), Phase::GameOver);
        let updates = session.take_updates();
        assert!(messages_of(&updates).contains(&(
            "💻 The computer won the match! Try again!".to_string(),
            StyleTag::Lose
        )));
        let last = sink.drain().pop().unwrap();
        assert_eq!(last.tone.frequency, 200.0);
        assert_eq!(last.at_ms, t + 2000);
    }

    #[test]
    fn reset_mid_round_discards_pending_steps() {
        let (mut session, sink) = session_with(quiet_config(), Choice::Scissors);
        session.handle(0, Input::Select(Choice::Rock));
        assert!(session.handle(500, Input::Reset));
        assert_eq!(session.phase(), Phase::Idle);
        session.take_updates();

        session.advance(5000);
        assert_eq!(session.score(), Scoreboard::new());
        assert!(session.take_updates().is_empty());
        // Two clicks, no win arpeggio.
        assert_eq!(pitches(&sink.drain()), vec![800.0, 800.0]);
    }

    #[test]
    fn reset_from_game_over_returns_to_idle() {
        let config = GameConfig {
            win_threshold: 1,
            ..quiet_config()
        };
        let (mut session, _) = session_with(config, Choice::Scissors);
        let t = play_round(&mut session, 0, Choice::Rock);
        session.advance(t + 2000);
        assert_eq!(session.phase(), Phase::GameOver);

        assert!(session.handle(t + 3000, Input::Reset));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), Scoreboard::new());
        let updates = session.take_updates();
        assert!(updates.contains(&DisplayUpdate::InputEnabled { enabled: true }));
        assert!(updates.contains(&DisplayUpdate::PlayerGlyph {
            glyph: PLACEHOLDER_GLYPH.to_string()
        }));
        assert!(session.handle(t + 3100, Input::Select(Choice::Rock)));
    }

    #[test]
    fn reset_while_concluding_cancels_game_over() {
        let config = GameConfig {
            win_threshold: 1,
            ..quiet_config()
        };
        let (mut session, _) = session_with(config, Choice::Scissors);
        let t = play_round(&mut session, 0, Choice::Rock);
        assert_eq!(session.phase(), Phase::Concluding);
        session.handle(t + 500, Input::Reset);
        session.advance(t + 10_000);
        assert_eq!(session.phase(), Phase::Idle);
        let texts = messages_of(&session.take_updates());
        assert!(texts.iter().all(|(text, _)| !text.starts_with("🏆")));
    }

    #[test]
    fn sound_toggle_lets_its_click_through() {
        let (mut session, sink) = session_with(quiet_config(), Choice::Scissors);
        session.handle(0, Input::ToggleSound);
        session.advance(99);
        assert_eq!(pitches(&sink.drain()), vec![800.0]);
        assert!(session.audio().settings().sound_enabled);

        session.advance(100);
        assert!(!session.audio().settings().sound_enabled);
        assert!(session.take_updates().contains(&DisplayUpdate::SoundButton {
            enabled: false,
            label: "🔇 Sound".to_string(),
        }));

        play_round(&mut session, 200, Choice::Rock);
        session.advance(5000);
        assert!(sink.is_empty());
        assert_eq!(session.score(), Scoreboard { player: 1, computer: 0 });
    }

    #[test]
    fn music_toggle_stops_and_restarts_melody() {
        let sink = QueueSink::new();
        let config = GameConfig::default();
        let audio = AudioManager::new(config.audio, Some(Box::new(sink.clone())));
        let mut session = Session::with_opponent(config, audio, Always(Choice::Rock));

        session.advance(2000);
        assert!(session.audio().is_music_playing());
        sink.drain();

        session.handle(2000, Input::ToggleMusic);
        assert!(!session.audio().is_music_playing());
        session.advance(20_000);
        assert_eq!(pitches(&sink.drain()), vec![800.0]);
        assert!(session.take_updates().contains(&DisplayUpdate::MusicButton {
            enabled: false,
            label: "🔇 Music".to_string(),
        }));

        session.handle(20_000, Input::ToggleMusic);
        assert!(session.audio().is_music_playing());
        session.advance(20_000);
        assert_eq!(sink.drain().len(), 2);
    }

    #[test]
    fn zh_locale_messages() {
        let config = GameConfig {
            locale: crate::messages::Locale::Zh,
            ..quiet_config()
        };
        let (mut session, _) = session_with(config, Choice::Rock);
        play_round(&mut session, 0, Choice::Scissors);
        let texts = messages_of(&session.take_updates());
        assert_eq!(texts[0].0, "😔 您输了！石头 击败 剪刀");
    }

    #[test]
    fn flush_drains_into_surface() {
        let (mut session, _) = session_with(quiet_config(), Choice::Rock);
        session.handle(0, Input::Reset);
        let mut surface: Vec<DisplayUpdate> = Vec::new();
        session.flush(&mut surface);
        assert!(!surface.is_empty());
        assert!(session.take_updates().is_empty());
    }

    #[test]
    fn resuming_after_a_pause_plays_no_backlog() {
        let sink = QueueSink::new();
        let config = GameConfig::default();
        let audio = AudioManager::new(config.audio, Some(Box::new(sink.clone())));
        let mut session = Session::with_opponent(config, audio, Always(Choice::Scissors));
        session.advance(1000);
        assert!(session.handle(1000, Input::Select(Choice::Rock)));
        sink.drain();

        session.advance(61_000);
        assert_eq!(session.score(), Scoreboard { player: 1, computer: 0 });
        let resumed = sink.drain();
        assert!(resumed.len() <= 2, "{} tones after the pause", resumed.len());
        assert!(resumed.iter().all(|t| t.tone.volume == 0.1));
        assert!(session.audio().is_music_playing());
    }

    #[test]
    fn huge_spin_interval_does_not_overflow() {
        let config = GameConfig {
            spin_interval_ms: u64::MAX / 2,
            ..quiet_config()
        };
        let (mut session, _) = session_with(config, Choice::Scissors);
        assert!(session.handle(0, Input::Select(Choice::Rock)));
        session.advance(1000);
        assert_eq!(session.score(), Scoreboard { player: 1, computer: 0 });
        assert_eq!(session.phase(), Phase::Idle);
    }
}
