//! Pushing split units downstream and folding the results.

use crate::channel::OutputChannel;
use crate::split::MediaBuffer;
use std::fmt;

/// Outcome of a single push, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum FlowStatus {
    Ok,
    Flushing,
    NotLinked,
    Error,
}

impl FlowStatus {
    /// The more severe of two outcomes.
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::Flushing => "flushing",
            Self::NotLinked => "not-linked",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// How push outcomes are reported to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowPolicy {
    /// Report the worst of the two push outcomes.
    #[default]
    Strict,
    /// Always report `Ok`, whatever the channels returned.
    Legacy,
}

/// Push video then audio and fold the two outcomes.
///
/// Both pushes always happen; a failure on the video channel does not stop
/// the audio unit from being delivered.
pub fn forward(
    policy: FlowPolicy,
    video_out: &dyn OutputChannel,
    audio_out: &dyn OutputChannel,
    video: MediaBuffer,
    audio: MediaBuffer,
) -> FlowStatus {
    let video_len = video.len();
    let video_status = video_out.push(video);
    tracing::trace!(len = video_len, status = %video_status, "pushed video unit");

    let audio_len = audio.len();
    let audio_status = audio_out.push(audio);
    tracing::trace!(len = audio_len, status = %audio_status, "pushed audio unit");

    let status = video_status.worst(audio_status);
    match policy {
        FlowPolicy::Strict => status,
        FlowPolicy::Legacy => {
            if !status.is_ok() {
                tracing::debug!(%status, "legacy flow policy reporting ok");
            }
            FlowStatus::Ok
        }
    }
}
