//! Shared fixtures for integration tests.
//!
//! Builds capture files of combined buffers in the producer's layout.

#![allow(dead_code)]

use mltshm_proto::{AudioFormat, Header, ImageFormat, HEADER_SIZE};
use std::path::Path;

/// Header for a 2x2 RGB frame with 4 bytes of U8 stereo audio.
pub fn small_header(frame: u32) -> Header {
    Header {
        frame,
        frame_rate_num: 25,
        frame_rate_den: 1,
        image_size: 12,
        image_format: ImageFormat::Rgb24,
        width: 2,
        height: 2,
        audio_size: 4,
        audio_format: AudioFormat::U8,
        frequency: 44100,
        channels: 2,
        samples: 2,
    }
}

/// One combined buffer whose video bytes are `0x10 + frame` and audio
/// bytes are `0x80 + frame`.
pub fn record(header: &Header) -> Vec<u8> {
    let mut data = header.to_bytes().to_vec();
    data.extend(std::iter::repeat(0x10 + header.frame as u8).take(header.image_size as usize));
    data.extend(std::iter::repeat(0x80 + header.frame as u8).take(header.audio_size as usize));
    assert_eq!(data.len(), HEADER_SIZE + 16);
    data
}

/// Write `frames` back-to-back records to `path`.
pub fn write_capture(path: &Path, frames: u32) {
    let mut capture = Vec::new();
    for frame in 0..frames {
        capture.extend(record(&small_header(frame)));
    }
    std::fs::write(path, capture).unwrap();
}
