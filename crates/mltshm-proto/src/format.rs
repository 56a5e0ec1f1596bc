//! Format code translation and the caps announced downstream.

use crate::header::{AudioFormat, ImageFormat};
use std::fmt;

/// Raw pixel layout of the video output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "UPPERCASE"))]
pub enum VideoFormat {
    Rgb,
    Rgba,
    Yuy2,
    Yv12,
}

impl VideoFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::Yuy2 => "YUY2",
            Self::Yv12 => "YV12",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sample arrangement across channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum ChannelLayout {
    Interleaved,
    NonInterleaved,
}

impl ChannelLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interleaved => "interleaved",
            Self::NonInterleaved => "non-interleaved",
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sample encoding and layout of the audio output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct AudioDescriptor {
    pub encoding: &'static str,
    pub layout: ChannelLayout,
}

/// Map an image format code to a raw pixel layout.
///
/// GPU-backed formats and `None` have no raw representation and return
/// `None`.
pub fn video_format_for(format: ImageFormat) -> Option<VideoFormat> {
    match format {
        ImageFormat::Rgb24 => Some(VideoFormat::Rgb),
        ImageFormat::Rgb24a => Some(VideoFormat::Rgba),
        ImageFormat::Yuv422 => Some(VideoFormat::Yuy2),
        ImageFormat::Yuv420p => Some(VideoFormat::Yv12),
        ImageFormat::None
        | ImageFormat::OpenGl
        | ImageFormat::Glsl
        | ImageFormat::GlslTexture
        | ImageFormat::Other(_) => None,
    }
}

/// Map an audio format code to a sample encoding and channel layout.
pub fn audio_format_for(format: AudioFormat) -> Option<AudioDescriptor> {
    let (encoding, layout) = match format {
        AudioFormat::S16 => ("S16LE", ChannelLayout::Interleaved),
        AudioFormat::S32 => ("S32LE", ChannelLayout::NonInterleaved),
        AudioFormat::Float => ("F32LE", ChannelLayout::NonInterleaved),
        AudioFormat::S32le => ("S32LE", ChannelLayout::Interleaved),
        AudioFormat::F32le => ("F32LE", ChannelLayout::Interleaved),
        AudioFormat::U8 => ("U8", ChannelLayout::Interleaved),
        AudioFormat::None | AudioFormat::Other(_) => return None,
    };
    Some(AudioDescriptor { encoding, layout })
}

/// Video stream announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct VideoCaps {
    pub width: u32,
    pub height: u32,
    pub format: VideoFormat,
    /// Frame rate as (numerator, denominator).
    pub framerate: (u32, u32),
}

impl fmt::Display for VideoCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "video/x-raw, width={}, height={}, format={}, framerate={}/{}",
            self.width, self.height, self.format, self.framerate.0, self.framerate.1
        )
    }
}

/// Audio stream announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct AudioCaps {
    pub rate: u32,
    pub channels: u32,
    pub format: &'static str,
    pub layout: ChannelLayout,
}

impl fmt::Display for AudioCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "audio/x-raw, rate={}, channels={}, format={}, layout={}",
            self.rate, self.channels, self.format, self.layout
        )
    }
}

/// Announcement sent once to an output channel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Caps {
    Video(VideoCaps),
    Audio(AudioCaps),
}

impl fmt::Display for Caps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video(caps) => caps.fmt(f),
            Self::Audio(caps) => caps.fmt(f),
        }
    }
}
