//! Spoken output: console echo plus synthesized audio

use async_trait::async_trait;

use super::playback::AudioPlayback;
use super::tts::TextToSpeech;
use crate::Config;
use crate::services::SpeechOutput;

/// Prints every line and, when configured, speaks it aloud
pub struct VoiceOutput {
    voice: Option<(TextToSpeech, AudioPlayback)>,
}

impl VoiceOutput {
    /// Output that only prints to the console
    #[must_use]
    pub const fn console_only() -> Self {
        Self { voice: None }
    }

    /// Output that synthesizes with `tts` and plays on `playback`
    #[must_use]
    pub const fn new(tts: TextToSpeech, playback: AudioPlayback) -> Self {
        Self {
            voice: Some((tts, playback)),
        }
    }

    /// Build from configuration, falling back to console-only output
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        if !config.voice.speak {
            tracing::info!("spoken output disabled, printing only");
            return Self::console_only();
        }

        let tts = match TextToSpeech::from_config(&config.voice, &config.api_keys) {
            Ok(tts) => tts,
            Err(e) => {
                tracing::warn!(error = %e, "TTS unavailable, printing only");
                return Self::console_only();
            }
        };

        match AudioPlayback::new() {
            Ok(playback) => Self::new(tts, playback),
            Err(e) => {
                tracing::warn!(error = %e, "no output device, printing only");
                Self::console_only()
            }
        }
    }
}

#[async_trait(?Send)]
impl SpeechOutput for VoiceOutput {
    async fn speak(&mut self, text: &str) {
        println!("Assistant: {text}");

        let Some((tts, playback)) = &self.voice else {
            return;
        };

        tracing::debug!(text, "speaking");
        match tts.synthesize(text).await {
            Ok(mp3) => {
                // Playback blocks until done so the microphone never hears it
                if let Err(e) = tokio::task::block_in_place(|| playback.play_mp3(&mp3)) {
                    tracing::warn!(error = %e, "playback failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "speech synthesis failed"),
        }
    }
}
