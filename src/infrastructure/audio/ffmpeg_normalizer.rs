use std::io::Cursor;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioNormalizer, NormalizeError, NormalizedAudio};

const TARGET_SAMPLE_RATE: u32 = 16_000;
const FALLBACK_TONE_HZ: f32 = 800.0;
const FALLBACK_DURATION_SECS: u32 = 2;
const FALLBACK_AMPLITUDE: f32 = 0.6;

/// Transcodes container audio to 16 kHz mono 16-bit PCM WAV by shelling out
/// to an external encoder. When the encoder is missing or fails, a fixed
/// sine tone of the same target format is substituted so the pipeline never
/// blocks on a broken encoder; callers see `fallback_used` and must surface
/// it.
pub struct FfmpegNormalizer {
    binary: String,
}

impl FfmpegNormalizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegNormalizer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioNormalizer for FfmpegNormalizer {
    async fn normalize(&self, data: &[u8]) -> Result<NormalizedAudio, NormalizeError> {
        let workdir = tempfile::tempdir()?;
        let input_path = workdir.path().join("input");
        let output_path = workdir.path().join("output.wav");

        tokio::fs::write(&input_path, data).await?;

        let result = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(&input_path)
            .args(["-ar", "16000", "-ac", "1", "-c:a", "pcm_s16le"])
            .arg(&output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                let wav = tokio::fs::read(&output_path).await?;
                tracing::debug!(
                    input_bytes = data.len(),
                    wav_bytes = wav.len(),
                    "Audio transcoded to 16kHz mono PCM"
                );
                Ok(NormalizedAudio {
                    wav,
                    fallback_used: false,
                })
            }
            Ok(output) => {
                tracing::warn!(
                    exit_code = output.status.code(),
                    "Encoder exited non-zero: substituting synthetic tone"
                );
                Ok(NormalizedAudio {
                    wav: synthesize_fallback_tone()?,
                    fallback_used: true,
                })
            }
            Err(e) => {
                tracing::warn!(
                    binary = %self.binary,
                    error = %e,
                    "Encoder unavailable: substituting synthetic tone"
                );
                Ok(NormalizedAudio {
                    wav: synthesize_fallback_tone()?,
                    fallback_used: true,
                })
            }
        }
    }
}

/// Fixed-duration 800 Hz sine tone in the normalization target format
/// (16 kHz mono 16-bit PCM WAV).
pub fn synthesize_fallback_tone() -> Result<Vec<u8>, NormalizeError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| NormalizeError::FallbackFailed(e.to_string()))?;

    let total_samples = TARGET_SAMPLE_RATE * FALLBACK_DURATION_SECS;
    for n in 0..total_samples {
        let t = n as f32 / TARGET_SAMPLE_RATE as f32;
        let sample = (2.0 * std::f32::consts::PI * FALLBACK_TONE_HZ * t).sin();
        writer
            .write_sample((sample * FALLBACK_AMPLITUDE * i16::MAX as f32) as i16)
            .map_err(|e| NormalizeError::FallbackFailed(e.to_string()))?;
    }

    writer
        .finalize()
        .map_err(|e| NormalizeError::FallbackFailed(e.to_string()))?;

    Ok(cursor.into_inner())
}
