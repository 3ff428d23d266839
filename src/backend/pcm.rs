//! 整数 PCM 写入后端
//!
//! 位深 16/24/32 可选，样本经 `AudioFormat::encode_sample` 量化后交给 hound。
//! 多声道或高位深时 hound 自动写 WAVE_FORMAT_EXTENSIBLE 头。

use std::path::Path;

use hound::WavWriter;

use super::{wave_channels, AudioBackend, BackendError};
use crate::audio::{AudioBuffer, AudioFormat, SampleEncoding};

/// 整数 PCM 后端
pub struct PcmBackend {
    bits_per_sample: u16,
}

impl PcmBackend {
    pub fn new(bits_per_sample: u16) -> Self {
        Self { bits_per_sample }
    }

    fn encoding(&self) -> Result<SampleEncoding, BackendError> {
        SampleEncoding::from_bits(self.bits_per_sample).ok_or_else(|| {
            BackendError::Unavailable {
                name: "pcm",
                reason: format!(
                    "{}-bit PCM is not supported (use 16, 24 or 32)",
                    self.bits_per_sample
                ),
            }
        })
    }
}

impl AudioBackend for PcmBackend {
    fn name(&self) -> &'static str {
        "pcm"
    }

    fn check(&self) -> Result<(), BackendError> {
        self.encoding().map(|_| ())
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
        let format = AudioFormat::new(sample_rate, wave_channels(buffer)?, self.encoding()?);

        let mut writer = WavWriter::create(path, format.wav_spec())?;
        for sample in buffer.interleaved() {
            writer.write_sample(format.encode_sample(sample))?;
        }
        writer.finalize()?;

        log::debug!(
            "pcm: wrote {} frames of {}-bit PCM to {}",
            buffer.frames(),
            format.encoding.bits_per_sample(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavReader};

    #[test]
    fn test_pcm16_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcm.wav");
        let buffer = AudioBuffer::silence(2, 100).unwrap();

        PcmBackend::new(16).save(&path, &buffer, 44100).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, SampleFormat::Int);
        assert_eq!(reader.duration(), 100);
        assert!(reader.samples::<i16>().all(|s| s.unwrap() == 0));
    }

    #[test]
    fn test_24bit_multichannel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcm24.wav");
        let buffer = AudioBuffer::silence(3, 10).unwrap();

        PcmBackend::new(24).save(&path, &buffer, 48000).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 3);
        assert_eq!(reader.spec().bits_per_sample, 24);
        assert_eq!(reader.samples::<i32>().count(), 30);
    }

    #[test]
    fn test_unsupported_bits() {
        let backend = PcmBackend::new(12);
        let err = backend.check().unwrap_err();
        assert!(err.to_string().contains("12-bit PCM is not supported"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.wav");
        let buffer = AudioBuffer::silence(1, 1).unwrap();
        assert!(backend.save(&path, &buffer, 44100).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_zero_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.wav");
        let buffer = AudioBuffer::silence(1, 1).unwrap();
        let err = PcmBackend::new(16).save(&path, &buffer, 0).unwrap_err();
        assert!(matches!(err, BackendError::SampleRateNotSupported(0)));
    }
}
