use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// No audio output could be opened (unsupported platform, no context).
    AudioUnavailable { reason: String },
    UnknownChoice { text: String },
    UnknownCue { text: String },
    Config(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::AudioUnavailable { reason } => write!(f, "Audio unavailable: {reason}"),
            GameError::UnknownChoice { text } => {
                write!(f, "Unknown choice '{text}', expected rock, paper or scissors")
            }
            GameError::UnknownCue { text } => write!(f, "Unknown cue '{text}'"),
            GameError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Config(e)
    }
}
