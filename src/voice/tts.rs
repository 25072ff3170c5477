//! Text-to-speech (TTS) processing

use std::time::Duration;

use crate::config::{ApiKeys, TtsProvider, VoiceConfig};
use crate::{Error, Result};

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    model: String,
    provider: TtsProvider,
}

impl TextToSpeech {
    /// Create a TTS client for the configured provider
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn from_config(voice: &VoiceConfig, keys: &ApiKeys) -> Result<Self> {
        let (api_key, name) = match voice.tts_provider {
            TtsProvider::OpenAi => (keys.openai.clone(), "OpenAI"),
            TtsProvider::ElevenLabs => (keys.elevenlabs.clone(), "ElevenLabs"),
        };

        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config(format!("{name} API key required for TTS")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            voice: voice.tts_voice.clone(),
            speed: voice.tts_speed,
            model: voice.tts_model.clone(),
            provider: voice.tts_provider,
        })
    }

    /// Synthesize text to MP3 audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        match self.provider {
            TtsProvider::OpenAi => self.synthesize_openai(text).await,
            TtsProvider::ElevenLabs => self.synthesize_elevenlabs(text).await,
        }
    }

    async fn synthesize_openai(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn synthesize_elevenlabs(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(format!(
                "https://api.elevenlabs.io/v1/text-to-speech/{}",
                self.voice
            ))
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
