//! DSP: offline synthesis of cue tones.
//!
//! Live playback goes through a `ToneSink`; this module renders the same
//! tones in pure Rust, for WAV export and for hosts without Web Audio.

pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
pub mod voice;
