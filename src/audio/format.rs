//! 音频格式和样本编码
//!
//! 浮点样本先转换为左对齐的 i32，再按位深截取高位
//! - 16-bit: 取 bit[31:16]
//! - 24-bit: 取 bit[31:8]
//! - 32-bit: 取 bit[31:0]

use hound::{SampleFormat, WavSpec};

/// 整数样本编码
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleEncoding {
    Int16,
    Int24,
    Int32,
}

impl SampleEncoding {
    /// 按位深选择编码，不支持的位深返回 None
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            16 => Some(Self::Int16),
            24 => Some(Self::Int24),
            32 => Some(Self::Int32),
            _ => None,
        }
    }

    #[inline]
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Int16 => 16,
            Self::Int24 => 24,
            Self::Int32 => 32,
        }
    }
}

/// 音频格式
#[derive(Clone, Copy, Debug)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub encoding: SampleEncoding,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16, encoding: SampleEncoding) -> Self {
        Self {
            sample_rate,
            channels,
            encoding,
        }
    }

    /// 对应的 hound 整数 PCM 规格
    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.encoding.bits_per_sample(),
            sample_format: SampleFormat::Int,
        }
    }

    /// 将 [-1.0, 1.0] 浮点样本转换为左对齐 i32
    ///
    /// 超出范围的值会被截断，NaN 视为 0
    #[inline]
    pub fn f32_to_aligned(sample: f32) -> i32 {
        if sample.is_nan() {
            return 0;
        }
        let clamped = sample.clamp(-1.0, 1.0) as f64;
        (clamped * i32::MAX as f64).round() as i32
    }

    /// 浮点样本 → 当前位深的整数值（右对齐，带符号）
    #[inline]
    pub fn encode_sample(&self, sample: f32) -> i32 {
        Self::f32_to_aligned(sample) >> (32 - self.encoding.bits_per_sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_16bit_range() {
        let format = AudioFormat::new(48000, 1, SampleEncoding::Int16);
        assert_eq!(format.encode_sample(0.0), 0);
        assert_eq!(format.encode_sample(1.0), i16::MAX as i32);
        assert_eq!(format.encode_sample(-1.0), i16::MIN as i32);
    }

    #[test]
    fn test_24bit_sign() {
        let format = AudioFormat::new(96000, 1, SampleEncoding::Int24);
        assert_eq!(format.encode_sample(0.5), 0x400000);
        assert_eq!(format.encode_sample(-0.5), -0x400000);
        // 24-bit 满幅
        assert_eq!(format.encode_sample(1.0), 0x7FFFFF);
        assert_eq!(format.encode_sample(-1.0), -0x800000);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(AudioFormat::f32_to_aligned(2.0), i32::MAX);
        assert_eq!(AudioFormat::f32_to_aligned(-2.0), -i32::MAX);
        assert_eq!(AudioFormat::f32_to_aligned(f32::NAN), 0);
    }

    #[test]
    fn test_wav_spec() {
        let spec = AudioFormat::new(44100, 2, SampleEncoding::Int24).wav_spec();
        assert_eq!(spec.bits_per_sample, 24);
        assert_eq!(spec.sample_format, SampleFormat::Int);
        assert_eq!(SampleEncoding::from_bits(20), None);
        assert_eq!(SampleEncoding::from_bits(32), Some(SampleEncoding::Int32));
    }
}
