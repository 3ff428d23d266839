//! 解码模块：写出文件的读回校验

pub mod decoder;

pub use decoder::{verify_silence, AudioDecoder, AudioInfo, DecodeError, Expected};
