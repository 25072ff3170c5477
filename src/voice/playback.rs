//! Audio playback to speakers

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Grace period after the last sample so the device drains
const DRAIN_DELAY: Duration = Duration::from_millis(100);

/// Plays audio to the default output device
pub struct AudioPlayback {
    device: Device,
    config: StreamConfig,
}

impl AudioPlayback {
    /// Open the default output device at 24kHz, mono or stereo
    ///
    /// # Errors
    ///
    /// Returns error if no output device supports 24kHz
    pub fn new() -> Result<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supports = |channels: u16| {
            device.supported_output_configs().ok()?.find(|c| {
                c.channels() == channels
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
        };

        let supported = supports(1)
            .or_else(|| supports(2))
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { device, config })
    }

    /// Decode MP3 bytes and play them, returning once playback finished
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub fn play_mp3(&self, mp3_data: &[u8]) -> Result<()> {
        let samples = decode_mp3(mp3_data)?;
        self.play(samples)
    }

    /// Play mono samples, returning once playback finished
    ///
    /// # Errors
    ///
    /// Returns error if the output stream cannot be built or started
    pub fn play(&self, samples: Vec<f32>) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let channels = usize::from(self.config.channels);
        let total = samples.len();
        let position = Arc::new(AtomicUsize::new(0));
        let cursor = Arc::clone(&position);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut pos = cursor.load(Ordering::Acquire);
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(pos).copied().unwrap_or(0.0);
                        frame.fill(sample);
                        if pos < samples.len() {
                            pos += 1;
                        }
                    }
                    cursor.store(pos, Ordering::Release);
                },
                |err| tracing::error!(error = %err, "audio playback error"),
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        // Poll for completion, bounded by the clip length plus slack
        let duration_ms = (total as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
        let deadline = std::time::Instant::now() + Duration::from_millis(duration_ms + 500);
        while position.load(Ordering::Acquire) < total && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        std::thread::sleep(DRAIN_DELAY);

        drop(stream);
        tracing::debug!(samples = total, "playback complete");
        Ok(())
    }
}

/// Decode MP3 bytes to mono f32 samples
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) if frame.channels == 2 => {
                samples.extend(frame.data.chunks(2).map(|pair| {
                    let left = f32::from(pair[0]) / 32768.0;
                    let right = f32::from(pair.get(1).copied().unwrap_or(pair[0])) / 32768.0;
                    f32::midpoint(left, right)
                }));
            }
            Ok(frame) => samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0)),
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok(samples)
}
