//! Energy-gated utterance segmentation
//!
//! Cuts one utterance out of the microphone stream: speech starts when a
//! block's RMS energy crosses the threshold and ends after a run of
//! silence. Short bursts that never reach the minimum speech length are
//! dropped as noise.

use super::capture::rms_energy;

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum voiced samples for an utterance (0.3 seconds at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends an utterance (0.5 seconds at 16kHz)
const SILENCE_SAMPLES: usize = 8000;

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Waiting for speech
    Idle,
    /// Speech started, accumulating
    Speaking,
    /// An utterance is ready to be taken
    Complete,
}

/// Accumulates one utterance from successive sample blocks
#[derive(Debug)]
pub struct SpeechSegmenter {
    state: SegmentState,
    buffer: Vec<f32>,
    voiced: usize,
    silence: usize,
}

impl Default for SpeechSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSegmenter {
    /// Create an idle segmenter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SegmentState::Idle,
            buffer: Vec::new(),
            voiced: 0,
            silence: 0,
        }
    }

    /// Feed a block of samples and return the resulting state
    pub fn process(&mut self, samples: &[f32]) -> SegmentState {
        if samples.is_empty() {
            return self.state;
        }

        let energy = rms_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            SegmentState::Idle => {
                if is_speech {
                    self.state = SegmentState::Speaking;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.voiced = samples.len();
                    self.silence = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            SegmentState::Speaking => {
                self.buffer.extend_from_slice(samples);
                if is_speech {
                    self.voiced += samples.len();
                    self.silence = 0;
                } else {
                    self.silence += samples.len();
                }

                if self.silence > SILENCE_SAMPLES {
                    if self.voiced >= MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.buffer.len(), "utterance complete");
                        self.state = SegmentState::Complete;
                    } else {
                        tracing::trace!(voiced = self.voiced, "noise burst dropped");
                        self.reset();
                    }
                }
            }
            SegmentState::Complete => {}
        }

        self.state
    }

    /// End the current utterance early (phrase limit reached)
    pub fn force_complete(&mut self) {
        if self.state == SegmentState::Speaking {
            self.state = SegmentState::Complete;
        }
    }

    /// Take the captured utterance and return to idle
    pub fn take_segment(&mut self) -> Vec<f32> {
        let segment = std::mem::take(&mut self.buffer);
        self.reset();
        segment
    }

    /// Reset to idle, dropping any partial utterance
    pub fn reset(&mut self) {
        self.state = SegmentState::Idle;
        self.buffer.clear();
        self.voiced = 0;
        self.silence = 0;
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> SegmentState {
        self.state
    }

    /// Samples accumulated so far
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
