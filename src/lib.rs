//! Audio Save Probe Library
//!
//! 音频写入后端诊断：静音缓冲区、后端注册表、直接写入器和探测流程

pub mod audio;
pub mod backend;
pub mod decode;
pub mod direct;
pub mod probe;
