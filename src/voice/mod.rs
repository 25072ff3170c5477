//! Voice processing module
//!
//! Handles audio capture, utterance segmentation, STT, TTS, playback and
//! wake phrase matching, and wires them into the `AudioInput` and
//! `SpeechOutput` collaborators.

mod capture;
mod microphone;
mod playback;
mod segment;
mod speaker;
mod stt;
mod tts;
mod wake_word;

pub use capture::{AudioCapture, SAMPLE_RATE, rms_energy, samples_to_wav};
pub use microphone::MicrophoneInput;
pub use playback::AudioPlayback;
pub use segment::{SegmentState, SpeechSegmenter};
pub use speaker::VoiceOutput;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use wake_word::WakeWordDetector;
