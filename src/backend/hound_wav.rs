//! hound 写入后端（32-bit float WAVE）

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::{wave_channels, AudioBackend, BackendError};
use crate::audio::AudioBuffer;

/// 基于 hound 的浮点 WAV 后端
#[derive(Default)]
pub struct HoundBackend;

impl HoundBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for HoundBackend {
    fn name(&self) -> &'static str {
        "hound"
    }

    fn save(
        &self,
        path: &Path,
        buffer: &AudioBuffer,
        sample_rate: u32,
    ) -> Result<(), BackendError> {
        if sample_rate == 0 {
            return Err(BackendError::SampleRateNotSupported(sample_rate));
        }
        let spec = WavSpec {
            channels: wave_channels(buffer)?,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::create(path, spec)?;
        for sample in buffer.interleaved() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        log::debug!(
            "hound: wrote {} float frames to {}",
            buffer.frames(),
            path.display()
        );
        Ok(())
    }
}
