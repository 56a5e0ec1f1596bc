//! Mltshm - demuxer for the MLT shared-memory protocol
//!
//! This library crate exposes the file-facing pieces (config, capture
//! reading, output sinks) for the CLI and integration testing.

pub mod capture;
pub mod config;
pub mod sink;
