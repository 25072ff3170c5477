//! Configuration management for Hark

pub mod file;

use std::str::FromStr;
use std::time::Duration;

use crate::services::ListenWindow;
use crate::{Error, Result};

use file::{HarkConfigFile, WindowFileConfig};

/// Wake phrases accepted when none are configured
pub const DEFAULT_WAKE_PHRASES: [&str; 2] = ["hello python", "hey python"];

/// Hark configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Phrases that move the session from awaiting wake to awaiting command
    pub wake_phrases: Vec<String>,

    /// Listen windows per phase
    pub listen: ListenConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Encyclopedia lookup configuration
    pub lookup: LookupConfig,
}

/// Listen windows for each phase of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenConfig {
    /// Passive listening for the wake phrase
    pub wake: ListenWindow,

    /// The command right after a wake
    pub command: ListenWindow,

    /// Extra text some intents ask for (search subject, media query)
    pub follow_up: ListenWindow,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            wake: ListenWindow::from_secs(8, 6),
            command: ListenWindow::from_secs(6, 8),
            follow_up: ListenWindow::from_secs(6, 6),
        }
    }
}

/// STT provider backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SttProvider {
    /// `OpenAI` Whisper
    #[default]
    Whisper,
    /// Deepgram
    Deepgram,
}

impl SttProvider {
    /// Model used when none is configured
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Whisper => "whisper-1",
            Self::Deepgram => "nova-2",
        }
    }
}

impl FromStr for SttProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "whisper" | "openai" => Ok(Self::Whisper),
            "deepgram" => Ok(Self::Deepgram),
            other => Err(Error::Config(format!("unknown STT provider: {other}"))),
        }
    }
}

/// TTS provider backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtsProvider {
    /// `OpenAI` speech
    #[default]
    OpenAi,
    /// `ElevenLabs`
    ElevenLabs,
}

impl TtsProvider {
    /// Model used when none is configured
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "tts-1",
            Self::ElevenLabs => "eleven_monolingual_v1",
        }
    }

    /// Voice used when none is configured (an `ElevenLabs` voice id for that provider)
    #[must_use]
    pub const fn default_voice(self) -> &'static str {
        match self {
            Self::OpenAi => "alloy",
            Self::ElevenLabs => "21m00Tcm4TlvDq8ikWAM",
        }
    }
}

impl FromStr for TtsProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "elevenlabs" => Ok(Self::ElevenLabs),
            other => Err(Error::Config(format!("unknown TTS provider: {other}"))),
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Synthesize spoken output; console-only when false
    pub speak: bool,

    /// STT backend
    pub stt_provider: SttProvider,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS backend
    pub tts_provider: TtsProvider,

    /// TTS model (e.g. "tts-1", "`eleven_monolingual_v1`")
    pub tts_model: String,

    /// TTS voice identifier (`ElevenLabs` voice id for that provider)
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speak: true,
            stt_provider: SttProvider::Whisper,
            stt_model: SttProvider::Whisper.default_model().to_string(),
            tts_provider: TtsProvider::OpenAi,
            tts_model: TtsProvider::OpenAi.default_model().to_string(),
            tts_voice: TtsProvider::OpenAi.default_voice().to_string(),
            tts_speed: 1.0,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for Whisper and TTS)
    pub openai: Option<String>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,
}

/// Encyclopedia lookup configuration
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Wikipedia base URL
    pub base_url: String,

    /// Sentences kept from a summary
    pub sentences: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            sentences: 2,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wake_phrases: DEFAULT_WAKE_PHRASES.iter().map(ToString::to_string).collect(),
            listen: ListenConfig::default(),
            voice: VoiceConfig::default(),
            api_keys: ApiKeys::default(),
            lookup: LookupConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed config file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a provider name is unknown or validation fails
    pub fn from_sources<F>(fc: HarkConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let wake_phrases = env("HARK_WAKE_PHRASES")
            .map(|list| list.split(',').map(ToString::to_string).collect())
            .or(fc.assistant.wake_phrases)
            .unwrap_or(defaults.wake_phrases);

        let listen = ListenConfig {
            wake: window(&fc.listen.wake, defaults.listen.wake),
            command: window(&fc.listen.command, defaults.listen.command),
            follow_up: window(&fc.listen.follow_up, defaults.listen.follow_up),
        };

        // API keys (env > toml > None)
        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY").or(fc.api_keys.openai),
            deepgram: env("DEEPGRAM_API_KEY").or(fc.api_keys.deepgram),
            elevenlabs: env("ELEVENLABS_API_KEY").or(fc.api_keys.elevenlabs),
        };

        let stt_provider = env("HARK_STT_PROVIDER")
            .or(fc.voice.stt_provider)
            .map(|p| p.parse::<SttProvider>())
            .transpose()?
            .unwrap_or_default();
        let tts_provider = env("HARK_TTS_PROVIDER")
            .or(fc.voice.tts_provider)
            .map(|p| p.parse::<TtsProvider>())
            .transpose()?
            .unwrap_or_default();

        let voice = VoiceConfig {
            speak: fc.voice.speak.unwrap_or(defaults.voice.speak),
            stt_provider,
            stt_model: env("HARK_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| stt_provider.default_model().to_string()),
            tts_provider,
            tts_model: env("HARK_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| tts_provider.default_model().to_string()),
            tts_voice: fc
                .voice
                .tts_voice
                .unwrap_or_else(|| tts_provider.default_voice().to_string()),
            tts_speed: fc.voice.tts_speed.unwrap_or(defaults.voice.tts_speed),
        };

        let lookup = LookupConfig {
            base_url: env("HARK_WIKIPEDIA_URL")
                .or(fc.lookup.base_url)
                .unwrap_or(defaults.lookup.base_url),
            sentences: fc.lookup.sentences.unwrap_or(defaults.lookup.sentences),
        };

        let config = Self {
            wake_phrases,
            listen,
            voice,
            api_keys,
            lookup,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the session relies on
    ///
    /// # Errors
    ///
    /// Returns error if no wake phrase is usable or a listen window is zero
    pub fn validate(&self) -> Result<()> {
        if self.wake_phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(Error::Config("at least one wake phrase is required".to_string()));
        }

        let windows = [
            ("wake", self.listen.wake),
            ("command", self.listen.command),
            ("follow_up", self.listen.follow_up),
        ];
        for (name, w) in windows {
            if w.timeout.is_zero() || w.phrase_limit.is_zero() {
                return Err(Error::Config(format!("listen.{name} window must be non-zero")));
            }
        }

        if self.lookup.sentences == 0 {
            return Err(Error::Config("lookup.sentences must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn window(fc: &WindowFileConfig, default: ListenWindow) -> ListenWindow {
    ListenWindow {
        timeout: fc.timeout_secs.map_or(default.timeout, Duration::from_secs),
        phrase_limit: fc
            .phrase_limit_secs
            .map_or(default.phrase_limit, Duration::from_secs),
    }
}
