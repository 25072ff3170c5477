//! Error types for Hark

use thiserror::Error;

/// Result type alias for Hark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Hark
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Encyclopedia lookup error (unknown or ambiguous subject)
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Literal text input error
    #[error("input error: {0}")]
    Input(String),

    /// Inconsistent state inside the dispatcher itself
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
