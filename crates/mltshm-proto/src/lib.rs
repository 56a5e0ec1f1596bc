//! Mltshm-Proto: demultiplexer for the MLT shared-memory protocol.
//!
//! The shm consumer writes one combined buffer per frame: a fixed-layout
//! header followed by the raw video payload and then the raw audio payload.
//! This crate turns that buffer into two independent elementary streams.
//!
//! # Modules
//!
//! - `header` - Fixed-layout header parsing and the raw format codes
//! - `format` - Format code to output descriptor mapping
//! - `negotiate` - One-shot output format announcement
//! - `split` - Byte range validation and payload copies
//! - `flow` - Push ordering and status aggregation
//! - `channel` - The output channel seam and an in-memory channel
//! - `demuxer` - The per-buffer entry point tying the above together
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use mltshm_proto::{
//!     AudioFormat, CombinedBuffer, DemuxSettings, Demuxer, FlowStatus, Header, ImageFormat,
//!     MemoryChannel,
//! };
//!
//! let header = Header {
//!     frame: 1,
//!     frame_rate_num: 25,
//!     frame_rate_den: 1,
//!     image_size: 12,
//!     image_format: ImageFormat::Rgb24,
//!     width: 2,
//!     height: 2,
//!     audio_size: 4,
//!     audio_format: AudioFormat::U8,
//!     frequency: 44100,
//!     channels: 2,
//!     samples: 0,
//! };
//! let mut data = header.to_bytes().to_vec();
//! data.extend_from_slice(&[0u8; 16]);
//!
//! let demuxer = Demuxer::new(DemuxSettings::default());
//! let (video, audio) = (MemoryChannel::new(), MemoryChannel::new());
//! let status = demuxer
//!     .process(&CombinedBuffer::new(Bytes::from(data)), &video, &audio)
//!     .unwrap();
//!
//! assert_eq!(status, FlowStatus::Ok);
//! assert_eq!(video.units()[0].len(), 12);
//! assert_eq!(audio.units()[0].len(), 4);
//! ```

pub mod channel;
pub mod demuxer;
pub mod error;
pub mod flow;
pub mod format;
pub mod header;
pub mod negotiate;
pub mod split;

pub use channel::{MemoryChannel, OutputChannel};
pub use demuxer::{DemuxSettings, Demuxer};
pub use error::{Error, Result, StreamKind, UnmappedFormat};
pub use flow::{FlowPolicy, FlowStatus};
pub use format::{
    audio_format_for, video_format_for, AudioCaps, AudioDescriptor, Caps, ChannelLayout, VideoCaps,
    VideoFormat,
};
pub use header::{AudioFormat, Header, ImageFormat, HEADER_SIZE};
pub use negotiate::{caps_for, NegotiationState, Negotiator};
pub use split::{split, CombinedBuffer, MediaBuffer, PayloadRanges};
