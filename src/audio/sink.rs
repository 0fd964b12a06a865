//! Audio outputs.
//!
//! A `ToneSink` is the capability to make a tone audible. It may not exist at
//! all (no Web Audio, tests without output); the audio manager treats a
//! missing sink as "play nothing".

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::tone::ToneSpec;

pub trait ToneSink {
    /// Start `tone` now. `at_ms` is the timeline time it was due at.
    fn play(&mut self, at_ms: u64, tone: &ToneSpec);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedTone {
    pub at_ms: u64,
    pub tone: ToneSpec,
}

/// Records tones instead of playing them. Clones share one queue, so the
/// owner can keep a handle after giving the sink to the audio manager.
#[derive(Debug, Clone, Default)]
pub struct QueueSink {
    queue: Rc<RefCell<Vec<EmittedTone>>>,
}

impl QueueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far.
    pub fn drain(&self) -> Vec<EmittedTone> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl ToneSink for QueueSink {
    fn play(&mut self, at_ms: u64, tone: &ToneSpec) {
        self.queue.borrow_mut().push(EmittedTone {
            at_ms,
            tone: *tone,
        });
    }
}

#[cfg(feature = "web-audio")]
pub use web::WebAudioSink;

#[cfg(feature = "web-audio")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::ToneSink;
    use crate::audio::tone::{ATTACK_SECS, DECAY_FLOOR, ToneSpec};
    use crate::dsp::oscillator::Waveform;
    use crate::error::GameError;

    /// Plays each tone through its own oscillator + gain node pair on a
    /// shared `AudioContext`.
    pub struct WebAudioSink {
        ctx: AudioContext,
    }

    impl WebAudioSink {
        pub fn connect() -> Result<Self, GameError> {
            let ctx = AudioContext::new().map_err(|e| GameError::AudioUnavailable {
                reason: format!("{e:?}"),
            })?;
            Ok(WebAudioSink { ctx })
        }

        fn schedule(&self, tone: &ToneSpec) -> Result<(), wasm_bindgen::JsValue> {
            let ctx = &self.ctx;
            let osc = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;
            osc.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            let now = ctx.current_time();
            osc.set_type(oscillator_type(tone.waveform));
            osc.frequency().set_value_at_time(tone.frequency as f32, now)?;

            let g = gain.gain();
            g.set_value_at_time(0.0, now)?;
            g.linear_ramp_to_value_at_time(tone.volume as f32, now + ATTACK_SECS)?;
            g.exponential_ramp_to_value_at_time(DECAY_FLOOR as f32, now + tone.duration)?;

            osc.start()?;
            osc.stop_with_when(now + tone.duration)?;
            Ok(())
        }
    }

    impl ToneSink for WebAudioSink {
        fn play(&mut self, _at_ms: u64, tone: &ToneSpec) {
            if let Err(e) = self.schedule(tone) {
                log::warn!("failed to play {} Hz tone: {e:?}", tone.frequency);
            }
        }
    }

    fn oscillator_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }
}
