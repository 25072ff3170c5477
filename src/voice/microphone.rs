//! Microphone-backed audio input

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
use super::segment::{SegmentState, SpeechSegmenter};
use super::stt::SpeechToText;
use crate::Result;
use crate::services::{AudioInput, Capture, ListenWindow};

/// How often the capture buffer is drained
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Listens on the default microphone and transcribes one utterance per call
pub struct MicrophoneInput {
    capture: AudioCapture,
    segmenter: SpeechSegmenter,
    stt: SpeechToText,
}

impl MicrophoneInput {
    /// Open the microphone and start capturing
    ///
    /// # Errors
    ///
    /// Returns error if the input device cannot be opened or started
    pub fn new(stt: SpeechToText) -> Result<Self> {
        let mut capture = AudioCapture::new()?;
        capture.start()?;

        Ok(Self {
            capture,
            segmenter: SpeechSegmenter::new(),
            stt,
        })
    }

    /// Wait for one utterance; `None` when nothing started before the timeout
    async fn record(&mut self, window: ListenWindow) -> Option<Vec<f32>> {
        // Anything buffered while we were speaking is not user input
        self.capture.clear_buffer();
        self.segmenter.reset();

        let started = Instant::now();
        let mut speech_started: Option<Instant> = None;

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            let samples = self.capture.take_buffer();

            match self.segmenter.process(&samples) {
                SegmentState::Complete => break,
                SegmentState::Speaking => {
                    let since = *speech_started.get_or_insert_with(Instant::now);
                    if since.elapsed() >= window.phrase_limit {
                        tracing::debug!("phrase limit reached");
                        self.segmenter.force_complete();
                        break;
                    }
                }
                SegmentState::Idle => {
                    speech_started = None;
                    if started.elapsed() >= window.timeout {
                        return None;
                    }
                }
            }
        }

        Some(self.segmenter.take_segment())
    }
}

#[async_trait(?Send)]
impl AudioInput for MicrophoneInput {
    async fn capture(&mut self, window: ListenWindow) -> Capture {
        tracing::info!("listening...");

        let Some(segment) = self.record(window).await else {
            return Capture::NoSpeech;
        };

        let wav = match samples_to_wav(&segment, SAMPLE_RATE) {
            Ok(wav) => wav,
            Err(e) => return Capture::ChannelError(e.to_string()),
        };

        match self.stt.transcribe(&wav).await {
            Ok(text) if text.trim().is_empty() => Capture::Inaudible,
            Ok(text) => {
                println!("You: {}", text.trim());
                Capture::Recognized(text)
            }
            Err(e) => Capture::ChannelError(e.to_string()),
        }
    }
}
