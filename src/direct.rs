//! 直接写入（绕过后端选择）
//!
//! 在所有后端都探测完之后，用一个独立于注册表的写入器再写一次。
//! 输入是样本优先（交织）布局，写出 16-bit 整数 PCM。

use std::path::Path;

use hound::WavWriter;

use crate::audio::{AudioFormat, SampleEncoding};
use crate::backend::BackendError;

/// 绕过后端选择的写入器
pub trait DirectWriter {
    /// 报告中使用的名称
    fn name(&self) -> &'static str;

    /// 写入交织样本：`frames.len()` 必须是 `channels` 的整数倍
    fn write(
        &self,
        path: &Path,
        frames: &[f32],
        channels: usize,
        sample_rate: u32,
    ) -> Result<(), BackendError>;
}

/// 直接调用 hound 的写入器
#[derive(Default)]
pub struct HoundDirectWriter;

impl DirectWriter for HoundDirectWriter {
    fn name(&self) -> &'static str {
        "hound"
    }

    fn write(
        &self,
        path: &Path,
        frames: &[f32],
        channels: usize,
        sample_rate: u32,
    ) -> Result<(), BackendError> {
        let channel_count =
            u16::try_from(channels).map_err(|_| BackendError::TooManyChannels(channels))?;
        if channel_count == 0 || frames.len() % channels != 0 {
            return Err(BackendError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} samples do not form whole {}-channel frames", frames.len(), channels),
            )));
        }
        if sample_rate == 0 {
            return Err(BackendError::SampleRateNotSupported(sample_rate));
        }

        let format = AudioFormat::new(sample_rate, channel_count, SampleEncoding::Int16);
        let mut writer = WavWriter::create(path, format.wav_spec())?;
        for &sample in frames {
            writer.write_sample(format.encode_sample(sample) as i16)?;
        }
        writer.finalize()?;

        log::debug!(
            "direct: wrote {} frames of 16-bit PCM to {}",
            frames.len() / channels,
            path.display()
        );
        Ok(())
    }
}
