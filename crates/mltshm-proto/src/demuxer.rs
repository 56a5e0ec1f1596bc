//! Per-buffer demultiplexing entry point.

use crate::channel::OutputChannel;
use crate::flow::{self, FlowPolicy, FlowStatus};
use crate::header::Header;
use crate::negotiate::{NegotiationState, Negotiator};
use crate::split::{self, CombinedBuffer};
use crate::Result;

/// Demuxer settings, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxSettings {
    /// Log a diagnostic line for every buffer.
    pub verbose: bool,
    pub flow_policy: FlowPolicy,
}

/// Splits combined buffers into video and audio units.
///
/// Holds nothing but the negotiation latch, so a single instance can be
/// shared between threads.
#[derive(Debug, Default)]
pub struct Demuxer {
    settings: DemuxSettings,
    negotiator: Negotiator,
}

impl Demuxer {
    pub fn new(settings: DemuxSettings) -> Self {
        Self {
            settings,
            negotiator: Negotiator::new(),
        }
    }

    pub fn settings(&self) -> &DemuxSettings {
        &self.settings
    }

    pub fn is_negotiated(&self) -> bool {
        self.negotiator.state() == NegotiationState::Negotiated
    }

    /// Process one combined buffer.
    ///
    /// A malformed, truncated or unmappable buffer returns an error before
    /// anything is announced or pushed; the next buffer can be processed
    /// normally.
    pub fn process(
        &self,
        buffer: &CombinedBuffer,
        video_out: &dyn OutputChannel,
        audio_out: &dyn OutputChannel,
    ) -> Result<FlowStatus> {
        let result = self.demux(buffer, video_out, audio_out);
        if let Err(ref e) = result {
            tracing::warn!(len = buffer.len(), "dropping buffer: {}", e);
        }
        result
    }

    fn demux(
        &self,
        buffer: &CombinedBuffer,
        video_out: &dyn OutputChannel,
        audio_out: &dyn OutputChannel,
    ) -> Result<FlowStatus> {
        let header = Header::parse(&buffer.data)?;

        if self.settings.verbose {
            tracing::info!(
                size = buffer.len(),
                width = header.width,
                height = header.height,
                format = header.image_format.code(),
                frame = header.frame,
                "got buffer"
            );
        }

        let (video, audio) = split::split(&header, buffer)?;
        self.negotiator
            .negotiate_if_needed(&header, video_out, audio_out)?;

        Ok(flow::forward(
            self.settings.flow_policy,
            video_out,
            audio_out,
            video,
            audio,
        ))
    }

    /// Forget the negotiated formats after a flush or stop.
    pub fn reset(&self) {
        tracing::debug!("resetting negotiation state");
        self.negotiator.reset();
    }
}
