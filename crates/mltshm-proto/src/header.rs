//! Fixed-layout header at the front of every combined buffer.
//!
//! The header is twelve 32-bit words written in the producer's native byte
//! order. Producer and demuxer must run on the same platform; nothing here
//! normalizes byte order.

use crate::{Error, Result};

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 48;

/// Pixel format code of the video payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    None,
    /// 8-bit RGB.
    Rgb24,
    /// 8-bit RGB with alpha channel.
    Rgb24a,
    /// 8-bit YUV 4:2:2 packed.
    Yuv422,
    /// 8-bit YUV 4:2:0 planar.
    Yuv420p,
    OpenGl,
    Glsl,
    GlslTexture,
    Other(u32),
}

impl ImageFormat {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Rgb24,
            2 => Self::Rgb24a,
            3 => Self::Yuv422,
            4 => Self::Yuv420p,
            5 => Self::OpenGl,
            6 => Self::Glsl,
            7 => Self::GlslTexture,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Rgb24 => 1,
            Self::Rgb24a => 2,
            Self::Yuv422 => 3,
            Self::Yuv420p => 4,
            Self::OpenGl => 5,
            Self::Glsl => 6,
            Self::GlslTexture => 7,
            Self::Other(code) => *code,
        }
    }
}

/// Sample format code of the audio payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    None,
    /// Signed 16-bit interleaved PCM.
    S16,
    /// Signed 32-bit non-interleaved PCM.
    S32,
    /// 32-bit non-interleaved floating point.
    Float,
    /// Signed 32-bit interleaved PCM.
    S32le,
    /// 32-bit interleaved floating point.
    F32le,
    /// Unsigned 8-bit interleaved PCM.
    U8,
    Other(u32),
}

impl AudioFormat {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::S16,
            2 => Self::S32,
            3 => Self::Float,
            4 => Self::S32le,
            5 => Self::F32le,
            6 => Self::U8,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::S16 => 1,
            Self::S32 => 2,
            Self::Float => 3,
            Self::S32le => 4,
            Self::F32le => 5,
            Self::U8 => 6,
            Self::Other(code) => *code,
        }
    }
}

/// Parsed combined-buffer header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Producer-side sequence number.
    pub frame: u32,
    pub frame_rate_num: u32,
    pub frame_rate_den: u32,
    /// Length of the video payload following the header.
    pub image_size: u32,
    pub image_format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Length of the audio payload following the video payload.
    pub audio_size: u32,
    pub audio_format: AudioFormat,
    /// Audio sample rate in Hz.
    pub frequency: u32,
    pub channels: u32,
    /// Sample count, informational only.
    pub samples: u32,
}

impl Header {
    /// Parse the header from the front of a combined buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::MalformedHeader {
                need: HEADER_SIZE,
                have: data.len(),
            });
        }

        let word = |index: usize| {
            let at = index * 4;
            u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
        };

        Ok(Self {
            frame: word(0),
            frame_rate_num: word(1),
            frame_rate_den: word(2),
            image_size: word(3),
            image_format: ImageFormat::from_code(word(4)),
            width: word(5),
            height: word(6),
            audio_size: word(7),
            audio_format: AudioFormat::from_code(word(8)),
            frequency: word(9),
            channels: word(10),
            samples: word(11),
        })
    }

    /// Serialize the header in native byte order.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let words = [
            self.frame,
            self.frame_rate_num,
            self.frame_rate_den,
            self.image_size,
            self.image_format.code(),
            self.width,
            self.height,
            self.audio_size,
            self.audio_format.code(),
            self.frequency,
            self.channels,
            self.samples,
        ];

        let mut out = [0u8; HEADER_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_ne_bytes());
        }
        out
    }

    /// Combined length of the video and audio payloads.
    pub fn payload_len(&self) -> Option<usize> {
        (self.image_size as usize).checked_add(self.audio_size as usize)
    }

    /// Length of the whole combined buffer this header describes.
    pub fn total_len(&self) -> Option<usize> {
        self.payload_len()?.checked_add(HEADER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample_header() -> Header {
        Header {
            frame: 7,
            frame_rate_num: 30000,
            frame_rate_den: 1001,
            image_size: 1920 * 1080 * 2,
            image_format: ImageFormat::Yuv422,
            width: 1920,
            height: 1080,
            audio_size: 1602 * 2 * 2,
            audio_format: AudioFormat::S16,
            frequency: 48000,
            channels: 2,
            samples: 1602,
        }
    }

    #[test]
    fn test_parse_reads_fields_in_order() {
        let header = sample_header();
        let parsed = Header::parse(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_parse_native_word_layout() {
        let mut data = [0u8; HEADER_SIZE];
        data[4 * 5..4 * 6].copy_from_slice(&640u32.to_ne_bytes());
        data[4 * 4..4 * 5].copy_from_slice(&4u32.to_ne_bytes());
        data[4 * 8..4 * 9].copy_from_slice(&6u32.to_ne_bytes());

        let header = Header::parse(&data).unwrap();
        assert_eq!(header.width, 640);
        assert_eq!(header.image_format, ImageFormat::Yuv420p);
        assert_eq!(header.audio_format, AudioFormat::U8);
        assert_eq!(header.image_size, 0);
    }

    #[test]
    fn test_parse_ignores_trailing_payload() {
        let mut data = sample_header().to_bytes().to_vec();
        data.extend_from_slice(&[0xAB; 100]);
        assert_eq!(Header::parse(&data).unwrap(), sample_header());
    }

    #[test]
    fn test_parse_short_buffer() {
        assert_matches!(
            Header::parse(&[0u8; HEADER_SIZE - 1]),
            Err(Error::MalformedHeader { need: 48, have: 47 })
        );
        assert_matches!(
            Header::parse(&[]),
            Err(Error::MalformedHeader { need: 48, have: 0 })
        );
    }

    #[test]
    fn test_unknown_codes_preserved() {
        assert_eq!(ImageFormat::from_code(42), ImageFormat::Other(42));
        assert_eq!(ImageFormat::Other(42).code(), 42);
        assert_eq!(AudioFormat::from_code(9), AudioFormat::Other(9));
        assert_eq!(AudioFormat::from_code(1), AudioFormat::S16);
    }

    #[test]
    fn test_total_len() {
        let header = sample_header();
        assert_eq!(
            header.total_len(),
            Some(HEADER_SIZE + 1920 * 1080 * 2 + 1602 * 4)
        );
    }
}
