//! 音频写入后端
//!
//! 每个后端都是一种把缓冲区编码成文件的实现。
//! `BackendRegistry` 维护已注册的后端和当前激活的后端：
//! - `list()`: 按注册顺序列出后端名称
//! - `current()`: 当前激活的后端
//! - `set_active()`: 切换激活后端（可用性检查失败则保持原状）
//! - `save()`: 用激活后端写文件

mod hound_wav;
mod pcm;

use std::path::Path;

use thiserror::Error;

use crate::audio::AudioBuffer;

pub use hound_wav::HoundBackend;
pub use pcm::PcmBackend;

/// 后端错误
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unknown backend '{0}'")]
    Unknown(String),
    #[error("backend '{name}' is unavailable: {reason}")]
    Unavailable { name: &'static str, reason: String },
    #[error("no backend is active")]
    NoneActive,
    #[error("{0} channels cannot be stored in a WAVE file")]
    TooManyChannels(usize),
    #[error("sample rate {0} Hz is not supported")]
    SampleRateNotSupported(u32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV encoder error: {0}")]
    Wav(#[from] hound::Error),
    #[error("read-back verification failed: {0}")]
    Verify(String),
    #[error("saved, but removing the output failed: {0}")]
    Cleanup(std::io::Error),
}

/// 音频写入后端
pub trait AudioBackend {
    /// 后端标识（在注册表中唯一）
    fn name(&self) -> &'static str;

    /// 可用性检查，选择后端时调用
    fn check(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// 把缓冲区以 `sample_rate` 写入 `path`
    fn save(&self, path: &Path, buffer: &AudioBuffer, sample_rate: u32)
        -> Result<(), BackendError>;
}

/// 后端注册表
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn AudioBackend>>,
    active: Option<usize>,
}

impl BackendRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置后端：pcm（`pcm_bits` 位整数 PCM）和 hound（32-bit float）
    pub fn with_defaults(pcm_bits: u16) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PcmBackend::new(pcm_bits)));
        registry.register(Box::new(HoundBackend::new()));
        registry
    }

    /// 注册后端
    ///
    /// 同名后端只保留第一个。第一个通过可用性检查的后端成为默认激活后端。
    pub fn register(&mut self, backend: Box<dyn AudioBackend>) {
        let name = backend.name();
        if self.position(name).is_some() {
            log::warn!("Backend '{}' already registered, ignoring duplicate", name);
            return;
        }

        if self.active.is_none() {
            match backend.check() {
                Ok(()) => self.active = Some(self.backends.len()),
                Err(e) => log::info!("Backend '{}' not eligible as default: {}", name, e),
            }
        }

        log::debug!("Registered backend '{}'", name);
        self.backends.push(backend);
    }

    /// 按注册顺序列出后端名称
    pub fn list(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// 当前激活的后端名称
    pub fn current(&self) -> Option<&'static str> {
        self.active.map(|idx| self.backends[idx].name())
    }

    /// 切换激活后端
    pub fn set_active(&mut self, name: &str) -> Result<(), BackendError> {
        let idx = self
            .position(name)
            .ok_or_else(|| BackendError::Unknown(name.to_string()))?;
        self.backends[idx].check()?;
        self.active = Some(idx);
        log::info!("Active backend: {}", name);
        Ok(())
    }

    /// 用当前激活后端写文件
    pub fn save(
        &self,
        path: &Path,
        buffer: &AudioBuffer,
        sample_rate: u32,
    ) -> Result<(), BackendError> {
        let idx = self.active.ok_or(BackendError::NoneActive)?;
        self.backends[idx].save(path, buffer, sample_rate)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.backends.iter().position(|b| b.name() == name)
    }
}

/// WAVE 文件的声道数上限是 u16
pub(crate) fn wave_channels(buffer: &AudioBuffer) -> Result<u16, BackendError> {
    u16::try_from(buffer.channels()).map_err(|_| BackendError::TooManyChannels(buffer.channels()))
}
