//! 音频核心模块
//!
//! 包含：
//! - Buffer: 探测用静音缓冲区
//! - Format: 音频格式和样本编码

pub mod buffer;
pub mod format;

pub use buffer::{AudioBuffer, BufferError, MAX_SAMPLES};
pub use format::{AudioFormat, SampleEncoding};
