//! 探测用音频缓冲区
//!
//! 布局：声道优先 (channels, frames)，每个声道一条独立的 Vec
//! 创建后只读，所有写入尝试共享同一个缓冲区

use thiserror::Error;

/// 单个缓冲区允许的最大样本数（16 Mi）
pub const MAX_SAMPLES: usize = 16 * 1024 * 1024;

/// 缓冲区构造错误
#[derive(Debug, Error, PartialEq)]
pub enum BufferError {
    #[error("channel count must be at least 1")]
    NoChannels,
    #[error("frame count must be at least 1")]
    NoFrames,
    #[error("invalid duration: {0} seconds")]
    InvalidDuration(f64),
    #[error("buffer of {channels} x {frames} samples exceeds the limit of {MAX_SAMPLES} samples")]
    TooLarge { channels: usize, frames: usize },
}

/// 静音音频缓冲区
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    frames: usize,
}

impl AudioBuffer {
    /// 创建 `channels` 声道、每声道 `frames` 帧的全零缓冲区
    pub fn silence(channels: usize, frames: usize) -> Result<Self, BufferError> {
        if channels == 0 {
            return Err(BufferError::NoChannels);
        }
        if frames == 0 {
            return Err(BufferError::NoFrames);
        }
        match channels.checked_mul(frames) {
            Some(total) if total <= MAX_SAMPLES => {}
            _ => return Err(BufferError::TooLarge { channels, frames }),
        }

        Ok(Self {
            channels: vec![vec![0.0; frames]; channels],
            frames,
        })
    }

    /// 按采样率和时长创建静音缓冲区
    ///
    /// 帧数 = sample_rate × duration_secs（四舍五入）
    pub fn silence_for(
        sample_rate: u32,
        duration_secs: f64,
        channels: usize,
    ) -> Result<Self, BufferError> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(BufferError::InvalidDuration(duration_secs));
        }
        let frames = (sample_rate as f64 * duration_secs).round();
        if frames > MAX_SAMPLES as f64 {
            return Err(BufferError::TooLarge {
                channels,
                frames: frames as usize,
            });
        }
        Self::silence(channels, frames as usize)
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// 样本总数（声道数 × 帧数）
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.channels.len() * self.frames
    }

    /// 转置为样本优先（交织）布局：LRLRLR...
    ///
    /// 形状从 (channels, frames) 变为 (frames, channels)
    pub fn interleaved(&self) -> Vec<f32> {
        let channels = self.channels.len();
        let mut output = vec![0.0; self.sample_count()];
        for (ch, samples) in self.channels.iter().enumerate() {
            for (frame, &sample) in samples.iter().enumerate() {
                output[frame * channels + ch] = sample;
            }
        }
        output
    }
}
