//! Wake phrase matching
//!
//! Recognized text is checked against a fixed set of phrases; a phrase
//! anywhere in the utterance counts as a wake.

use crate::gate::normalize;
use crate::{Error, Result};

/// Matches transcripts against the configured wake phrases
#[derive(Debug, Clone)]
pub struct WakeWordDetector {
    wake_words: Vec<String>,
}

impl WakeWordDetector {
    /// Create a new wake word detector
    ///
    /// # Arguments
    ///
    /// * `wake_words` - Phrases to detect (e.g., "hello python")
    ///
    /// # Errors
    ///
    /// Returns error if no non-empty phrase is given
    pub fn new(wake_words: Vec<String>) -> Result<Self> {
        let normalized: Vec<String> = wake_words
            .iter()
            .map(|w| normalize(w))
            .filter(|w| !w.is_empty())
            .collect();

        if normalized.is_empty() {
            return Err(Error::Config("no usable wake phrase".to_string()));
        }

        tracing::debug!(wake_words = ?normalized, "wake word detector initialized");

        Ok(Self {
            wake_words: normalized,
        })
    }

    /// Return the first wake phrase contained in `transcript`
    #[must_use]
    pub fn detect(&self, transcript: &str) -> Option<&str> {
        let normalized = normalize(transcript);
        self.wake_words
            .iter()
            .find(|w| normalized.contains(w.as_str()))
            .map(String::as_str)
    }

    /// Get the configured wake words
    #[must_use]
    pub fn wake_words(&self) -> &[String] {
        &self.wake_words
    }
}
