use mltshm_proto::{DemuxSettings, FlowPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub demux: DemuxConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DemuxConfig {
    /// Log a diagnostic line for every combined buffer
    #[serde(default)]
    pub verbose: bool,

    /// How push failures are reported (default: strict)
    #[serde(default)]
    pub flow_policy: FlowPolicyConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowPolicyConfig {
    /// Report the worst push outcome
    #[default]
    Strict,
    /// Always report success
    Legacy,
}

impl From<FlowPolicyConfig> for FlowPolicy {
    fn from(policy: FlowPolicyConfig) -> Self {
        match policy {
            FlowPolicyConfig::Strict => FlowPolicy::Strict,
            FlowPolicyConfig::Legacy => FlowPolicy::Legacy,
        }
    }
}

impl From<&DemuxConfig> for DemuxSettings {
    fn from(config: &DemuxConfig) -> Self {
        DemuxSettings {
            verbose: config.verbose,
            flow_policy: config.flow_policy.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// File receiving raw video units; unset means the video stream is not linked
    #[serde(default)]
    pub video: Option<PathBuf>,

    /// File receiving raw audio units; unset means the audio stream is not linked
    #[serde(default)]
    pub audio: Option<PathBuf>,
}
