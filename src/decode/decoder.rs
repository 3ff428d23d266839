//! 读回校验解码器
//!
//! 使用 symphonia 重新打开刚写出的文件，确认：
//! - 采样率和声道数与写入时一致
//! - 帧数一致
//! - 所有样本都是静音

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// 解码错误
#[derive(Debug)]
pub enum DecodeError {
    /// 文件打开失败
    FileOpen(std::io::Error),
    /// 格式不支持
    UnsupportedFormat,
    /// 没有找到音频轨道
    NoAudioTrack,
    /// 解码器创建失败
    DecoderCreation(String),
    /// 解码失败
    DecodeFailed(String),
    /// 内容与写入时不一致
    Mismatch(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileOpen(e) => write!(f, "Failed to open file: {}", e),
            Self::UnsupportedFormat => write!(f, "Unsupported audio format"),
            Self::NoAudioTrack => write!(f, "No audio track found"),
            Self::DecoderCreation(s) => write!(f, "Failed to create decoder: {}", s),
            Self::DecodeFailed(s) => write!(f, "Decode failed: {}", s),
            Self::Mismatch(s) => write!(f, "Content mismatch: {}", s),
        }
    }
}

impl std::error::Error for DecodeError {}

/// 音频文件信息
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u32,
    /// 位深度（原始格式）
    pub bit_depth: Option<u32>,
    /// 编解码器名称
    pub codec: String,
}

/// 音频文件解码器
pub struct AudioDecoder {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: AudioInfo,
}

impl AudioDecoder {
    /// 打开音频文件
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(DecodeError::FileOpen)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // 提示文件扩展名
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|_| DecodeError::UnsupportedFormat)?;

        let reader = probed.format;

        // 查找第一个音频轨道
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoAudioTrack)?;

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params.sample_rate.ok_or(DecodeError::NoAudioTrack)?;
        let channels = codec_params
            .channels
            .map(|c| c.count() as u32)
            .unwrap_or(0);

        let codec = symphonia::default::get_codecs()
            .get_codec(codec_params.codec)
            .map(|c| c.short_name.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let info = AudioInfo {
            sample_rate,
            channels,
            bit_depth: codec_params.bits_per_sample,
            codec,
        };

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::DecoderCreation(e.to_string()))?;

        Ok(Self {
            reader,
            decoder,
            track_id,
            info,
        })
    }

    /// 获取音频信息
    pub fn info(&self) -> &AudioInfo {
        &self.info
    }

    /// 解码下一块数据到 `output`（交织 f32）
    ///
    /// 返回本次解码的帧数，0 表示文件结束
    pub fn decode_next_f32(&mut self, output: &mut Vec<f32>) -> Result<usize, DecodeError> {
        output.clear();
        loop {
            let packet = match self.reader.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(0); // EOF
                }
                Err(e) => return Err(DecodeError::DecodeFailed(e.to_string())),
            };

            // 跳过非目标轨道
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self
                .decoder
                .decode(&packet)
                .map_err(|e| DecodeError::DecodeFailed(e.to_string()))?;

            let frames = decoded.frames();
            if frames == 0 {
                continue;
            }

            let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
            samples.copy_interleaved_ref(decoded);
            output.extend_from_slice(samples.samples());

            return Ok(frames);
        }
    }
}

/// 读回校验的期望值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected {
    pub sample_rate: u32,
    pub channels: usize,
    pub frames: usize,
}

/// 重新解码 `path`，确认它是与 `expected` 一致的静音
pub fn verify_silence<P: AsRef<Path>>(
    path: P,
    expected: &Expected,
) -> Result<AudioInfo, DecodeError> {
    let mut decoder = AudioDecoder::open(path)?;
    let info = decoder.info().clone();

    if info.sample_rate != expected.sample_rate {
        return Err(DecodeError::Mismatch(format!(
            "sample rate {} Hz, expected {} Hz",
            info.sample_rate, expected.sample_rate
        )));
    }
    if info.channels as usize != expected.channels {
        return Err(DecodeError::Mismatch(format!(
            "{} channels, expected {}",
            info.channels, expected.channels
        )));
    }

    let mut total_frames = 0usize;
    let mut chunk = Vec::new();
    loop {
        let frames = decoder.decode_next_f32(&mut chunk)?;
        if frames == 0 {
            break;
        }
        total_frames += frames;

        if let Some(pos) = chunk.iter().position(|&s| s != 0.0) {
            return Err(DecodeError::Mismatch(format!(
                "non-zero sample {} near frame {}",
                chunk[pos],
                total_frames - frames + pos / expected.channels.max(1)
            )));
        }
    }

    if total_frames != expected.frames {
        return Err(DecodeError::Mismatch(format!(
            "{} frames, expected {}",
            total_frames, expected.frames
        )));
    }

    log::debug!(
        "verified {} frames ({}, {:?}-bit)",
        total_frames,
        info.codec,
        info.bit_depth
    );
    Ok(info)
}
