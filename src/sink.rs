//! File-backed output channels.

use mltshm_proto::{Caps, FlowStatus, MediaBuffer, OutputChannel};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Counters for one output stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub units: u64,
    pub bytes: u64,
    pub caps: Option<Caps>,
}

/// Appends every unit of one stream to a raw file.
///
/// Each unit is flushed as it is pushed, so a failed write shows up in that
/// push's status.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    stats: Mutex<SinkStats>,
}

impl FileSink {
    /// Create (or truncate) the output file.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            stats: Mutex::new(SinkStats::default()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> SinkStats {
        self.stats.lock().clone()
    }

    pub fn flush(&self) -> std::io::Result<()> {
        self.writer.lock().flush()
    }
}

impl OutputChannel for FileSink {
    fn announce(&self, caps: &Caps) {
        tracing::info!(path = %self.path.display(), %caps, "output format");
        self.stats.lock().caps = Some(caps.clone());
    }

    fn push(&self, unit: MediaBuffer) -> FlowStatus {
        let written = {
            let mut writer = self.writer.lock();
            writer.write_all(unit.data()).and_then(|_| writer.flush())
        };
        if let Err(e) = written {
            tracing::error!(path = %self.path.display(), "failed to write unit: {}", e);
            return FlowStatus::Error;
        }

        let mut stats = self.stats.lock();
        stats.units += 1;
        stats.bytes += unit.len() as u64;
        FlowStatus::Ok
    }
}

/// Stand-in for a stream nobody consumes.
#[derive(Debug, Default)]
pub struct Unlinked {
    stats: Mutex<SinkStats>,
}

impl Unlinked {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SinkStats {
        self.stats.lock().clone()
    }
}

impl OutputChannel for Unlinked {
    fn announce(&self, caps: &Caps) {
        self.stats.lock().caps = Some(caps.clone());
    }

    fn push(&self, _unit: MediaBuffer) -> FlowStatus {
        FlowStatus::NotLinked
    }
}

/// Either a file or nothing, chosen from configuration.
pub enum Output {
    File(FileSink),
    Unlinked(Unlinked),
}

impl Output {
    /// Open a file sink when a path is configured.
    pub fn from_path(path: Option<&Path>) -> std::io::Result<Self> {
        match path {
            Some(path) => Ok(Self::File(FileSink::create(path)?)),
            None => Ok(Self::Unlinked(Unlinked::new())),
        }
    }

    pub fn stats(&self) -> SinkStats {
        match self {
            Self::File(sink) => sink.stats(),
            Self::Unlinked(sink) => sink.stats(),
        }
    }

    pub fn flush(&self) -> std::io::Result<()> {
        match self {
            Self::File(sink) => sink.flush(),
            Self::Unlinked(_) => Ok(()),
        }
    }
}

impl OutputChannel for Output {
    fn announce(&self, caps: &Caps) {
        match self {
            Self::File(sink) => sink.announce(caps),
            Self::Unlinked(sink) => sink.announce(caps),
        }
    }

    fn push(&self, unit: MediaBuffer) -> FlowStatus {
        match self {
            Self::File(sink) => sink.push(unit),
            Self::Unlinked(sink) => sink.push(unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_appends_units() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("video.raw");
        let sink = FileSink::create(&path).unwrap();

        assert_eq!(sink.push(MediaBuffer::new(Bytes::from_static(b"abc"))), FlowStatus::Ok);
        assert_eq!(sink.push(MediaBuffer::new(Bytes::from_static(b"de"))), FlowStatus::Ok);
        sink.flush().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"abcde");
        let stats = sink.stats();
        assert_eq!(stats.units, 2);
        assert_eq!(stats.bytes, 5);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_reports_error() {
        let sink = FileSink::create("/dev/full").unwrap();
        let status = sink.push(MediaBuffer::new(Bytes::from_static(&[0u8; 12])));
        assert_eq!(status, FlowStatus::Error);
        assert_eq!(sink.stats().units, 0);
    }

    #[test]
    fn test_unconfigured_output_is_unlinked() {
        let output = Output::from_path(None).unwrap();
        assert_eq!(
            output.push(MediaBuffer::new(Bytes::from_static(b"x"))),
            FlowStatus::NotLinked
        );
        assert_eq!(output.stats().units, 0);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        assert!(FileSink::create(dir.path().join("missing/audio.raw")).is_err());
    }
}
