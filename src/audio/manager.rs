//! Audio manager: gates, schedules and emits every tone.

use crate::config::AudioSettings;
use crate::error::GameError;
use crate::schedule::Timeline;

use super::cue::Cue;
use super::melody;
use super::sink::ToneSink;
use super::tone::ToneSpec;

/// Events due more than this long before the caller's clock are dropped
/// instead of played late. A paused page would otherwise get every missed
/// melody note at once when it resumes.
pub const MAX_LATENESS_MS: u64 = 1000;

/// Something the audio timeline will do later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    Tone(ToneSpec),
    /// Start one pass of the melody and book the next one.
    MelodyPass { generation: u64 },
    MelodyNote { generation: u64, index: usize },
}

/// Owns the output sink and the sound/music switches.
///
/// Scheduled work is never cancelled. Every event checks the switches when
/// it fires, so turning something off takes effect at the next event.
pub struct AudioManager {
    settings: AudioSettings,
    sink: Option<Box<dyn ToneSink>>,
    looping: bool,
    /// Bumped on every melody start; passes from older starts are ignored.
    generation: u64,
    timeline: Timeline<AudioEvent>,
}

impl AudioManager {
    pub fn new(settings: AudioSettings, sink: Option<Box<dyn ToneSink>>) -> Self {
        AudioManager {
            settings,
            sink,
            looping: false,
            generation: 0,
            timeline: Timeline::new(),
        }
    }

    /// Open an output with `open`. Failure is logged once and the manager
    /// runs silent from then on.
    pub fn connect<F>(settings: AudioSettings, open: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn ToneSink>, GameError>,
    {
        match open() {
            Ok(sink) => Self::new(settings, Some(sink)),
            Err(e) => {
                log::warn!("{e}; continuing without sound");
                Self::new(settings, None)
            }
        }
    }

    pub fn silent(settings: AudioSettings) -> Self {
        Self::new(settings, None)
    }

    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    pub fn is_music_playing(&self) -> bool {
        self.looping
    }

    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Queue every tone of `cue`, relative to the current time.
    pub fn play(&mut self, cue: Cue) {
        for scheduled in cue.tones() {
            self.timeline
                .schedule(scheduled.offset_ms, AudioEvent::Tone(scheduled.tone));
        }
    }

    /// Play one tone right now, unless sound is off or there is no output.
    pub fn emit(&mut self, tone: &ToneSpec) {
        if !self.settings.sound_enabled {
            log::trace!("sound off, dropping {} Hz tone", tone.frequency);
            return;
        }
        let now = self.timeline.now();
        if let Some(sink) = self.sink.as_mut() {
            sink.play(now, tone);
        }
    }

    pub fn start_music(&mut self) {
        if self.sink.is_none() || !self.settings.music_enabled || self.looping {
            return;
        }
        self.looping = true;
        self.generation += 1;
        log::debug!("background melody started (generation {})", self.generation);
        self.timeline.schedule(
            0,
            AudioEvent::MelodyPass {
                generation: self.generation,
            },
        );
    }

    pub fn stop_music(&mut self) {
        if self.looping {
            log::debug!("background melody stopped");
        }
        self.looping = false;
    }

    /// Flip sound effects. Returns the new state.
    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        log::debug!("sound effects {}", on_off(self.settings.sound_enabled));
        self.settings.sound_enabled
    }

    /// Flip music, starting or stopping the melody. Returns the new state.
    pub fn toggle_music(&mut self) -> bool {
        self.settings.music_enabled = !self.settings.music_enabled;
        log::debug!("music {}", on_off(self.settings.music_enabled));
        if !self.settings.music_enabled {
            self.stop_music();
        } else if !self.looping {
            self.start_music();
        }
        self.settings.music_enabled
    }

    /// Fire everything due at or before `now`.
    pub fn advance(&mut self, now: u64) {
        self.advance_within(now, now);
    }

    /// Fire everything due at or before `until`, judging lateness against
    /// `wall`, the caller's real clock. Tones and melody notes more than
    /// [`MAX_LATENESS_MS`] behind `wall` are skipped; melody passes still
    /// chain so the loop keeps its tempo grid.
    pub fn advance_within(&mut self, until: u64, wall: u64) {
        let mut skipped = 0usize;
        while let Some((due, event)) = self.timeline.pop_due(until) {
            let late = wall.saturating_sub(due) > MAX_LATENESS_MS;
            if !self.fire(event, late) {
                skipped += 1;
            }
        }
        self.timeline.advance_to(until);
        if skipped > 0 {
            log::debug!("skipped {skipped} late audio events at {wall} ms");
        }
    }

    /// Returns false if the event was dropped for being late.
    fn fire(&mut self, event: AudioEvent, late: bool) -> bool {
        match event {
            AudioEvent::Tone(_) | AudioEvent::MelodyNote { .. } if late => return false,
            AudioEvent::Tone(tone) => self.emit(&tone),
            AudioEvent::MelodyPass { generation } => {
                if !self.melody_live(generation) {
                    return true;
                }
                for index in 0..melody::MELODY_HZ.len() {
                    self.timeline.schedule(
                        index as u64 * melody::NOTE_SPACING_MS,
                        AudioEvent::MelodyNote { generation, index },
                    );
                }
                self.timeline
                    .schedule(melody::PASS_MS, AudioEvent::MelodyPass { generation });
            }
            AudioEvent::MelodyNote { generation, index } => {
                if self.melody_live(generation) {
                    self.emit(&melody::note(index));
                }
            }
        }
        true
    }

    fn melody_live(&self, generation: u64) -> bool {
        self.looping && self.settings.music_enabled && generation == self.generation
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
