pub mod audio;
pub mod choice;
pub mod config;
pub mod display;
pub mod dsp;
pub mod error;
pub mod game;
pub mod messages;
pub mod opponent;
pub mod schedule;
pub mod session;

use std::sync::Once;

use wasm_bindgen::prelude::*;

use crate::audio::cue::Cue;
use crate::audio::{AudioManager, QueueSink};
use crate::choice::Choice;
use crate::config::{AudioSettings, GameConfig};
use crate::session::{Input, Session};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the rps-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

static LOGGER: Once = Once::new();

/// Route `log` output and panics to the browser console. Runs once per page;
/// natively the host installs its own logger.
fn init_logging() {
    LOGGER.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            if console_log::init_with_level(log::Level::Info).is_err() {
                log::debug!("logger already installed");
            }
        }
    });
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: one game, driven by the page script.
///
/// Every call takes the page clock (`performance.now()`) and returns the
/// display updates produced since the last call. Call `advance` from a
/// `requestAnimationFrame` loop so timed steps fire.
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    /// Page time at construction; session time is measured from here.
    origin_ms: f64,
    /// Tones waiting for the page script when Web Audio playback is not
    /// compiled in.
    tones: QueueSink,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, now_ms: f64) -> Result<WebGame, JsValue> {
        init_logging();
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(js_err)?,
            None => GameConfig::default(),
        };
        let tones = QueueSink::new();
        let audio = open_audio(config.audio, &tones);
        Ok(WebGame {
            session: Session::new(config, audio),
            origin_ms: now_ms,
            tones,
        })
    }

    /// Player picks `"rock"`, `"paper"` or `"scissors"`.
    pub fn select(&mut self, choice: &str, now_ms: f64) -> Result<JsValue, JsValue> {
        let choice: Choice = choice.parse().map_err(js_err)?;
        self.apply(now_ms, Input::Select(choice))
    }

    pub fn reset(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        self.apply(now_ms, Input::Reset)
    }

    pub fn toggle_sound(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        self.apply(now_ms, Input::ToggleSound)
    }

    pub fn toggle_music(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        self.apply(now_ms, Input::ToggleMusic)
    }

    pub fn advance(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = self.elapsed(now_ms);
        self.session.advance(now);
        self.updates()
    }

    /// Tones emitted since the last call, for the page to play itself.
    /// Always empty with the `web-audio` feature.
    pub fn take_tones(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tones.drain()).map_err(js_err)
    }

    pub fn phase(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.phase()).map_err(js_err)
    }

    fn apply(&mut self, now_ms: f64, input: Input) -> Result<JsValue, JsValue> {
        let now = self.elapsed(now_ms);
        self.session.handle(now, input);
        self.updates()
    }

    fn updates(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.take_updates()).map_err(js_err)
    }

    fn elapsed(&self, now_ms: f64) -> u64 {
        (now_ms - self.origin_ms).max(0.0) as u64
    }
}

#[cfg(feature = "web-audio")]
fn open_audio(settings: AudioSettings, _queue: &QueueSink) -> AudioManager {
    use crate::audio::ToneSink;
    use crate::audio::sink::WebAudioSink;

    AudioManager::connect(settings, || {
        let sink: Box<dyn ToneSink> = Box::new(WebAudioSink::connect()?);
        Ok(sink)
    })
}

#[cfg(not(feature = "web-audio"))]
fn open_audio(settings: AudioSettings, queue: &QueueSink) -> AudioManager {
    AudioManager::new(settings, Some(Box::new(queue.clone())))
}

/// WASM-exposed: render a cue (`click`, `win`, `lose`, `tie`, `victory`,
/// `defeat`) to a WAV byte array.
#[wasm_bindgen]
pub fn render_cue_wav(cue: &str, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let cue: Cue = cue.parse().map_err(js_err)?;
    Ok(dsp::renderer::render_cue_wav(cue, sample_rate))
}

/// WASM-exposed: render a cue to mono f32 samples for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_cue_samples(cue: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let cue: Cue = cue.parse().map_err(js_err)?;
    Ok(dsp::renderer::render_cue(cue, sample_rate)
        .iter()
        .map(|&s| s as f32)
        .collect())
}
