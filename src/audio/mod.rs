//! Audio feedback: cues, background melody, and output sinks.

pub mod cue;
pub mod manager;
pub mod melody;
pub mod sink;
pub mod tone;

pub use cue::Cue;
pub use manager::AudioManager;
pub use sink::{QueueSink, ToneSink};
pub use tone::ToneSpec;
