//! Splitting a combined buffer into its video and audio payloads.

use crate::header::{Header, HEADER_SIZE};
use crate::{Error, Result};
use bytes::Bytes;
use std::ops::Range;
use std::time::Duration;

/// One combined buffer as delivered by the shm source.
#[derive(Debug, Clone, Default)]
pub struct CombinedBuffer {
    pub data: Bytes,
    /// Presentation timestamp attached by the source, if any.
    pub pts: Option<Duration>,
    pub duration: Option<Duration>,
}

impl CombinedBuffer {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pts: None,
            duration: None,
        }
    }

    pub fn with_timing(mut self, pts: Option<Duration>, duration: Option<Duration>) -> Self {
        self.pts = pts;
        self.duration = duration;
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A unit pushed to one output channel.
///
/// Owns its bytes; it never aliases the combined buffer it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBuffer {
    data: Bytes,
    pts: Option<Duration>,
    duration: Option<Duration>,
}

impl MediaBuffer {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pts: None,
            duration: None,
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }

    pub fn pts(&self) -> Option<Duration> {
        self.pts
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Byte ranges of the two payloads within a combined buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRanges {
    pub video: Range<usize>,
    pub audio: Range<usize>,
}

impl PayloadRanges {
    /// Compute the payload ranges for `header` and check they fit in
    /// `available` bytes.
    pub fn compute(header: &Header, available: usize) -> Result<Self> {
        let video_end = HEADER_SIZE.checked_add(header.image_size as usize);
        let audio_end = video_end.and_then(|end| end.checked_add(header.audio_size as usize));

        match (video_end, audio_end) {
            (Some(video_end), Some(audio_end)) if audio_end <= available => Ok(Self {
                video: HEADER_SIZE..video_end,
                audio: video_end..audio_end,
            }),
            _ => Err(Error::TruncatedPayload {
                need: audio_end.unwrap_or(usize::MAX),
                have: available,
            }),
        }
    }
}

/// Cut the video and audio payloads out of `buffer`.
///
/// Both units are fresh copies carrying the buffer's timing, so the source
/// memory can be reused by the producer as soon as this returns.
pub fn split(header: &Header, buffer: &CombinedBuffer) -> Result<(MediaBuffer, MediaBuffer)> {
    let ranges = PayloadRanges::compute(header, buffer.len())?;

    let cut = |range: Range<usize>| MediaBuffer {
        data: Bytes::copy_from_slice(&buffer.data[range]),
        pts: buffer.pts,
        duration: buffer.duration,
    };

    Ok((cut(ranges.video), cut(ranges.audio)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{AudioFormat, ImageFormat};
    use assert_matches::assert_matches;

    fn header(image_size: u32, audio_size: u32) -> Header {
        Header {
            frame: 0,
            frame_rate_num: 25,
            frame_rate_den: 1,
            image_size,
            image_format: ImageFormat::Rgb24,
            width: 0,
            height: 0,
            audio_size,
            audio_format: AudioFormat::U8,
            frequency: 8000,
            channels: 1,
            samples: 0,
        }
    }

    fn combined(header: &Header, payload: &[u8]) -> CombinedBuffer {
        let mut data = header.to_bytes().to_vec();
        data.extend_from_slice(payload);
        CombinedBuffer::new(Bytes::from(data))
    }

    #[test]
    fn test_split_payloads() {
        let header = header(5, 3);
        let buffer = combined(&header, b"VVVVVAAA");
        let (video, audio) = split(&header, &buffer).unwrap();
        assert_eq!(video.data().as_ref(), b"VVVVV");
        assert_eq!(audio.data().as_ref(), b"AAA");
    }

    #[test]
    fn test_split_ignores_trailing_bytes() {
        let header = header(2, 2);
        let buffer = combined(&header, b"vvaaXXXX");
        let (video, audio) = split(&header, &buffer).unwrap();
        assert_eq!(video.data().as_ref(), b"vv");
        assert_eq!(audio.data().as_ref(), b"aa");
    }

    #[test]
    fn test_split_empty_payloads() {
        let header = header(0, 0);
        let buffer = combined(&header, &[]);
        let (video, audio) = split(&header, &buffer).unwrap();
        assert!(video.is_empty());
        assert!(audio.is_empty());
    }

    #[test]
    fn test_split_truncated_video() {
        let header = header(100, 0);
        let buffer = combined(&header, &[0u8; 50]);
        assert_matches!(
            split(&header, &buffer),
            Err(Error::TruncatedPayload { need: 148, have: 98 })
        );
    }

    #[test]
    fn test_split_truncated_audio() {
        let header = header(4, 4);
        let buffer = combined(&header, &[0u8; 7]);
        assert_matches!(
            split(&header, &buffer),
            Err(Error::TruncatedPayload { need: 56, have: 55 })
        );
    }

    #[test]
    fn test_split_carries_timing() {
        let header = header(1, 1);
        let buffer = combined(&header, b"va").with_timing(
            Some(Duration::from_millis(40)),
            Some(Duration::from_millis(20)),
        );
        let (video, audio) = split(&header, &buffer).unwrap();
        for unit in [video, audio] {
            assert_eq!(unit.pts(), Some(Duration::from_millis(40)));
            assert_eq!(unit.duration(), Some(Duration::from_millis(20)));
        }
    }

    #[test]
    fn test_split_copies_bytes() {
        let header = header(2, 2);
        let buffer = combined(&header, b"vvaa");
        let (video, _) = split(&header, &buffer).unwrap();
        let source = buffer.data.as_ptr() as usize;
        let source_range = source..source + buffer.len();
        assert!(!source_range.contains(&(video.data().as_ptr() as usize)));
    }

    #[test]
    fn test_ranges_large_sizes() {
        let header = header(u32::MAX, u32::MAX);
        assert_matches!(
            PayloadRanges::compute(&header, 1024),
            Err(Error::TruncatedPayload { have: 1024, .. })
        );
    }
}
