//! Output channel seam.
//!
//! The demuxer only needs two things from a downstream consumer: a place to
//! deliver the one-time format announcement and a way to push units.

use crate::flow::FlowStatus;
use crate::format::Caps;
use crate::split::MediaBuffer;
use parking_lot::Mutex;

/// Destination for one elementary stream.
pub trait OutputChannel: Send + Sync {
    /// Receive the negotiated format. Called once per negotiation, before
    /// the first push that follows it.
    fn announce(&self, caps: &Caps);

    /// Deliver one unit.
    fn push(&self, unit: MediaBuffer) -> FlowStatus;
}

/// Channel that keeps everything it receives in memory.
pub struct MemoryChannel {
    status: FlowStatus,
    announcements: Mutex<Vec<Caps>>,
    units: Mutex<Vec<MediaBuffer>>,
}

impl MemoryChannel {
    /// Create a channel that accepts every push.
    pub fn new() -> Self {
        Self::with_status(FlowStatus::Ok)
    }

    /// Create a channel that records pushes but reports `NotLinked`.
    pub fn unlinked() -> Self {
        Self::with_status(FlowStatus::NotLinked)
    }

    /// Create a channel that records pushes and reports `status`.
    pub fn with_status(status: FlowStatus) -> Self {
        Self {
            status,
            announcements: Mutex::new(Vec::new()),
            units: Mutex::new(Vec::new()),
        }
    }

    /// Announcements received so far.
    pub fn announcements(&self) -> Vec<Caps> {
        self.announcements.lock().clone()
    }

    /// Units received so far.
    pub fn units(&self) -> Vec<MediaBuffer> {
        self.units.lock().clone()
    }

    /// Drop everything received.
    pub fn clear(&self) {
        self.announcements.lock().clear();
        self.units.lock().clear();
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputChannel for MemoryChannel {
    fn announce(&self, caps: &Caps) {
        self.announcements.lock().push(caps.clone());
    }

    fn push(&self, unit: MediaBuffer) -> FlowStatus {
        self.units.lock().push(unit);
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_memory_channel_records_units() {
        let channel = MemoryChannel::new();
        let status = channel.push(MediaBuffer::new(Bytes::from_static(b"abc")));
        assert_eq!(status, FlowStatus::Ok);
        assert_eq!(channel.units().len(), 1);
        assert_eq!(channel.units()[0].data(), &Bytes::from_static(b"abc"));

        channel.clear();
        assert!(channel.units().is_empty());
    }

    #[test]
    fn test_unlinked_channel_status() {
        let channel = MemoryChannel::unlinked();
        assert_eq!(
            channel.push(MediaBuffer::new(Bytes::new())),
            FlowStatus::NotLinked
        );
    }
}
