//! Error types for mltshm-proto.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for mltshm-proto operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for mltshm-proto operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred while reading combined buffers.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Buffer is shorter than the fixed header.
    #[error("Malformed header: need {need} bytes, have {have}")]
    MalformedHeader { need: usize, have: usize },

    /// Declared payload sizes run past the end of the buffer.
    #[error("Truncated payload: need {need} bytes, have {have}")]
    TruncatedPayload { need: usize, have: usize },

    /// A format code has no raw output descriptor.
    #[error("Unmapped format: {0}")]
    UnmappedFormat(UnmappedFormat),
}

impl Error {
    /// Whether the error only concerns the current unit.
    ///
    /// Recoverable errors mean the offending buffer is dropped and the next
    /// one can be processed normally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. } | Self::TruncatedPayload { .. } | Self::UnmappedFormat(_)
        )
    }
}

/// Which elementary stream an error or announcement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum StreamKind {
    Video,
    Audio,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// Details of a format code that could not be mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmappedFormat {
    pub stream: StreamKind,
    pub code: u32,
}

impl fmt::Display for UnmappedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} format code {}", self.stream, self.code)
    }
}
