//! Listening gate
//!
//! Turns raw capture results into utterances. Silence and unintelligible
//! audio collapse to nothing; a failing recognition channel is reported to
//! the user and then also treated as nothing. Every recognized utterance is
//! checked for the emergency-stop phrases before anything else looks at it.

use std::fmt;

use crate::services::{AudioInput, Capture, ListenWindow, SpeechOutput};
use crate::voice::WakeWordDetector;

/// Phrases that stop the assistant in any state, without a wake phrase
pub const EMERGENCY_STOP_PHRASES: [&str; 2] = ["exit program", "shutdown"];

const CHANNEL_ERROR_REPLY: &str = "Network/API error. Check your internet connection.";

/// Lower-case, drop clause punctuation and collapse whitespace
#[must_use]
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, ',' | '!' | '?' | ';') { ' ' } else { c })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('.').trim_end().to_string()
}

/// Check whether text asks for an immediate shutdown
#[must_use]
pub fn is_emergency_stop(text: &str) -> bool {
    EMERGENCY_STOP_PHRASES.iter().any(|p| text.contains(p))
}

/// Normalized text of one recognition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    /// Normalize recognized text; `None` if nothing is left
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let text = normalize(raw);
        (!text.is_empty()).then_some(Self(text))
    }

    /// The normalized text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check for a substring
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// Take the normalized text
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a single listen produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    /// Silence, unintelligible audio or a reported channel failure
    Nothing,
    /// A usable utterance
    Utterance(Utterance),
    /// An emergency-stop phrase
    EmergencyStop,
}

/// Listens for utterances and recognizes wake phrases
#[derive(Debug, Clone)]
pub struct ListeningGate {
    detector: WakeWordDetector,
}

impl ListeningGate {
    /// Create a gate around a wake phrase detector
    #[must_use]
    pub const fn new(detector: WakeWordDetector) -> Self {
        Self { detector }
    }

    /// Request one utterance from `input`
    ///
    /// Channel failures are spoken on `speech` and never escape as errors.
    pub async fn listen(
        &self,
        input: &mut dyn AudioInput,
        speech: &mut dyn SpeechOutput,
        window: ListenWindow,
    ) -> Heard {
        match input.capture(window).await {
            Capture::NoSpeech => {
                tracing::trace!("no speech before timeout");
                Heard::Nothing
            }
            Capture::Inaudible => {
                tracing::debug!("speech not understood");
                Heard::Nothing
            }
            Capture::ChannelError(detail) => {
                tracing::warn!(error = %detail, "speech recognition request failed");
                speech.speak(CHANNEL_ERROR_REPLY).await;
                Heard::Nothing
            }
            Capture::Recognized(text) => match Utterance::new(&text) {
                None => Heard::Nothing,
                Some(u) if is_emergency_stop(u.as_str()) => {
                    tracing::info!(utterance = %u, "emergency stop phrase heard");
                    Heard::EmergencyStop
                }
                Some(u) => Heard::Utterance(u),
            },
        }
    }

    /// Check whether an utterance contains a wake phrase
    #[must_use]
    pub fn is_wake(&self, utterance: &Utterance) -> bool {
        self.detector.detect(utterance.as_str()).is_some()
    }

    /// The phrase to advertise in the greeting
    #[must_use]
    pub fn primary_wake_phrase(&self) -> &str {
        self.detector
            .wake_words()
            .first()
            .map_or("", String::as_str)
    }
}
