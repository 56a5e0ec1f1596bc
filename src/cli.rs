use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mltshm")]
#[command(author, version, about = "Demuxer for the MLT shared-memory protocol")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging, including a line per combined buffer
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a capture of combined buffers into raw video and audio files
    ///
    /// Malformed or truncated records are dropped and counted. A record
    /// declaring an oversized payload cannot be delimited and stops the run.
    Demux {
        /// Capture file to read
        #[arg(required = true)]
        input: PathBuf,

        /// Where to write the raw video stream
        #[arg(long)]
        video: Option<PathBuf>,

        /// Where to write the raw audio stream
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Always report success for pushes, as older versions did
        #[arg(long)]
        legacy_flow: bool,
    },

    /// Show the first header of a capture and the formats it announces
    Probe {
        /// Capture file to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
