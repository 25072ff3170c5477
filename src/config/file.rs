//! TOML configuration file loading
//!
//! Supports `~/.config/hark/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct HarkConfigFile {
    /// Assistant identity
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// Listen windows per phase
    #[serde(default)]
    pub listen: ListenFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Encyclopedia lookup configuration
    #[serde(default)]
    pub lookup: LookupFileConfig,
}

/// Assistant identity
#[derive(Debug, Default, Deserialize)]
pub struct AssistantFileConfig {
    /// Accepted wake phrases (e.g. `["hello python", "hey python"]`)
    pub wake_phrases: Option<Vec<String>>,
}

/// Listen windows for the wake, command and follow-up phases
#[derive(Debug, Default, Deserialize)]
pub struct ListenFileConfig {
    #[serde(default)]
    pub wake: WindowFileConfig,

    #[serde(default)]
    pub command: WindowFileConfig,

    #[serde(default)]
    pub follow_up: WindowFileConfig,
}

/// One listen window, in seconds
#[derive(Debug, Default, Deserialize)]
pub struct WindowFileConfig {
    pub timeout_secs: Option<u64>,
    pub phrase_limit_secs: Option<u64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Synthesize spoken output (console-only when false)
    pub speak: Option<bool>,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub deepgram: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Encyclopedia lookup configuration
#[derive(Debug, Default, Deserialize)]
pub struct LookupFileConfig {
    /// Wikipedia base URL (e.g. "https://en.wikipedia.org")
    pub base_url: Option<String>,

    /// Sentences to keep from a summary
    pub sentences: Option<usize>,
}

/// Load the TOML config file from the standard path
///
/// Returns `HarkConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> HarkConfigFile {
    let Some(path) = config_file_path() else {
        return HarkConfigFile::default();
    };

    if !path.exists() {
        return HarkConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                HarkConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            HarkConfigFile::default()
        }
    }
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the content is not valid TOML for this schema
pub fn parse_config_file(content: &str) -> crate::Result<HarkConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Return the config file path: `~/.config/hark/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("hark").join("config.toml"))
}
