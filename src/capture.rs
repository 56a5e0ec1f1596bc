//! Reading recorded combined buffers from a capture file.
//!
//! A capture is a sequence of combined buffers written back to back. Each
//! record is self-delimiting: its header declares the payload length that
//! follows it.
//!
//! A short tail record is yielded as-is so the demuxer can report it. A
//! record declaring more than `MAX_PAYLOAD_SIZE` payload bytes cannot be
//! delimited safely and ends iteration with an error instead.

use anyhow::{Context, Result};
use bytes::Bytes;
use mltshm_proto::{CombinedBuffer, Header, HEADER_SIZE};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

/// Maximum payload accepted for one record (256 MB) to prevent OOM on
/// garbage input.
const MAX_PAYLOAD_SIZE: usize = 256 * 1024 * 1024;

/// Iterator over the combined buffers in a capture.
pub struct CaptureReader<R> {
    reader: R,
    done: bool,
}

impl CaptureReader<BufReader<File>> {
    /// Open a capture file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open capture: {:?}", path.as_ref()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> CaptureReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    fn read_up_to(&mut self, data: &mut Vec<u8>, len: usize) -> Result<usize> {
        let read = (&mut self.reader).take(len as u64).read_to_end(data)?;
        Ok(read)
    }

    fn next_record(&mut self) -> Result<Option<CombinedBuffer>> {
        let mut data = Vec::with_capacity(HEADER_SIZE);
        let read = self.read_up_to(&mut data, HEADER_SIZE)?;
        if read == 0 {
            return Ok(None);
        }
        if read < HEADER_SIZE {
            // Short tail: hand it on so the demuxer reports it.
            self.done = true;
            return Ok(Some(CombinedBuffer::new(Bytes::from(data))));
        }

        let header = Header::parse(&data)?;
        let payload_len = header
            .payload_len()
            .filter(|len| *len <= MAX_PAYLOAD_SIZE)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Record for frame {} declares {} + {} payload bytes, exceeding maximum {}",
                    header.frame,
                    header.image_size,
                    header.audio_size,
                    MAX_PAYLOAD_SIZE
                )
            })?;

        data.reserve_exact(payload_len);
        let read = self.read_up_to(&mut data, payload_len)?;
        if read < payload_len {
            self.done = true;
        }

        let (pts, duration) = frame_timing(&header);
        Ok(Some(
            CombinedBuffer::new(Bytes::from(data)).with_timing(pts, duration),
        ))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = Result<CombinedBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(buffer)) => Some(Ok(buffer)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Presentation time and duration of a frame derived from its sequence
/// number and frame rate. `None` when the frame rate is degenerate.
pub fn frame_timing(header: &Header) -> (Option<Duration>, Option<Duration>) {
    if header.frame_rate_num == 0 || header.frame_rate_den == 0 {
        return (None, None);
    }

    let num = header.frame_rate_num as u128;
    let den = header.frame_rate_den as u128;
    let to_duration = |frames: u128| {
        let total = frames * den;
        let secs = u64::try_from(total / num).ok()?;
        let nanos = (total % num * 1_000_000_000 / num) as u32;
        Some(Duration::new(secs, nanos))
    };

    (to_duration(header.frame as u128), to_duration(1))
}
