//! Export configuration (`export.toml`)
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! standard behaviour.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default UV tier layer names, lowest tier first
pub const DEFAULT_UV_LAYERS: [&str; 3] = ["UVMap", "UV2Map", "UV3Map"];

/// Maximum number of UV tiers a vertex can carry
pub const MAX_UV_TIERS: usize = 3;

/// What to do with a channel whose data path cannot be decomposed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelErrorPolicy {
    /// Fail the whole export pass
    #[default]
    Abort,
    /// Drop the channel, log a warning, keep going
    Skip,
}

/// Which frames a synchronized attribute covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSampling {
    /// Every integer frame of the range
    #[default]
    EveryFrame,
    /// Only frames in range where some component has a keyframe
    Keyframes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// UV layer names by tier (UV, UV2, UV3)
    pub uv_layers: Vec<String>,

    /// Malformed channel handling.
    /// Default: abort
    pub channel_errors: ChannelErrorPolicy,

    /// Default: every_frame
    pub frame_sampling: FrameSampling,

    /// Overrides every action's own frame range when set
    pub frame_range: Option<[i32; 2]>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            uv_layers: DEFAULT_UV_LAYERS.iter().map(|name| name.to_string()).collect(),
            channel_errors: ChannelErrorPolicy::default(),
            frame_sampling: FrameSampling::default(),
            frame_range: None,
        }
    }
}

impl ExportConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.uv_layers.len() > MAX_UV_TIERS {
            bail!(
                "{} UV layers configured, maximum is {}",
                self.uv_layers.len(),
                MAX_UV_TIERS
            );
        }
        for (i, name) in self.uv_layers.iter().enumerate() {
            if self.uv_layers[..i].contains(name) {
                bail!("UV layer '{}' is configured twice", name);
            }
        }
        if let Some([start, end]) = self.frame_range {
            if start > end {
                bail!("frame_range [{}, {}] is empty", start, end);
            }
        }
        Ok(())
    }
}
