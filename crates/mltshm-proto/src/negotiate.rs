//! One-shot output format negotiation.
//!
//! Format is fixed for the lifetime of a stream. The first header whose
//! codes map to raw formats produces exactly one announcement per channel;
//! every later header is ignored until the stream is reset.

use crate::channel::OutputChannel;
use crate::error::{StreamKind, UnmappedFormat};
use crate::format::{audio_format_for, video_format_for, AudioCaps, Caps, VideoCaps};
use crate::header::Header;
use crate::{Error, Result};
use parking_lot::Mutex;

/// Negotiation latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Uninitialized,
    Negotiated,
}

/// Derive the caps a header would announce.
///
/// Fails if either format code has no raw mapping; a stream is never
/// announced with a placeholder format.
pub fn caps_for(header: &Header) -> Result<(VideoCaps, AudioCaps)> {
    let video_format = video_format_for(header.image_format).ok_or(Error::UnmappedFormat(
        UnmappedFormat {
            stream: StreamKind::Video,
            code: header.image_format.code(),
        },
    ))?;
    let audio = audio_format_for(header.audio_format).ok_or(Error::UnmappedFormat(
        UnmappedFormat {
            stream: StreamKind::Audio,
            code: header.audio_format.code(),
        },
    ))?;

    let video_caps = VideoCaps {
        width: header.width,
        height: header.height,
        format: video_format,
        framerate: (header.frame_rate_num, header.frame_rate_den),
    };
    let audio_caps = AudioCaps {
        rate: header.frequency,
        channels: header.channels,
        format: audio.encoding,
        layout: audio.layout,
    };

    Ok((video_caps, audio_caps))
}

/// Holds the negotiation latch for one demuxer instance.
#[derive(Debug, Default)]
pub struct Negotiator {
    state: Mutex<NegotiationState>,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NegotiationState {
        *self.state.lock()
    }

    /// Announce formats derived from `header` unless already negotiated.
    ///
    /// Returns `true` if this call made the announcement. The latch is held
    /// while announcing, so concurrent callers wait and then observe
    /// `Negotiated`. An unmapped code leaves the state `Uninitialized`.
    pub fn negotiate_if_needed(
        &self,
        header: &Header,
        video_out: &dyn OutputChannel,
        audio_out: &dyn OutputChannel,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        if *state == NegotiationState::Negotiated {
            return Ok(false);
        }

        let (video_caps, audio_caps) = caps_for(header)?;
        tracing::debug!(%video_caps, %audio_caps, frame = header.frame, "negotiated output formats");

        video_out.announce(&Caps::Video(video_caps));
        audio_out.announce(&Caps::Audio(audio_caps));
        *state = NegotiationState::Negotiated;

        Ok(true)
    }

    /// Return to `Uninitialized` after a flush or stop.
    pub fn reset(&self) {
        *self.state.lock() = NegotiationState::Uninitialized;
    }
}
