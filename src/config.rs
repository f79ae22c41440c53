//! Service configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LissajousError;
use crate::params::AnimationConfig;

/// Address the server binds to when nothing else is configured.
pub const DEFAULT_ADDR: &str = "localhost:8000";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-request resource limits.
    #[serde(default)]
    pub limits: Limits,
}

/// Listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address or `host:port` to listen on.
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: DEFAULT_ADDR.to_string() }
    }
}

/// Upper bounds on the work a single request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest accepted canvas half-extent.
    pub max_size: u32,
    /// Largest accepted frame count.
    pub max_frames: u16,
    /// Largest accepted number of curve samples across all frames.
    pub max_samples: u64,
    /// Largest accepted number of pixels across all frames.
    pub max_pixels: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_size: 2000,
            max_frames: 1000,
            max_samples: 200_000_000,
            max_pixels: 1_000_000_000,
        }
    }
}

impl Limits {
    /// Check a resolved configuration against these limits.
    ///
    /// # Errors
    ///
    /// Returns [`LissajousError::LimitExceeded`] naming the first limit hit.
    pub fn check(&self, config: &AnimationConfig) -> Result<(), LissajousError> {
        if config.size > f64::from(self.max_size) {
            return Err(LissajousError::LimitExceeded(format!(
                "size {} is larger than {}",
                config.size, self.max_size
            )));
        }
        if config.frame_count > u32::from(self.max_frames) {
            return Err(LissajousError::LimitExceeded(format!(
                "nframes {} is larger than {}",
                config.frame_count, self.max_frames
            )));
        }
        let samples = config.samples_per_frame().saturating_mul(u64::from(config.frame_count));
        if samples > self.max_samples {
            return Err(LissajousError::LimitExceeded(format!(
                "{samples} curve samples requested, at most {} allowed",
                self.max_samples
            )));
        }
        let side = config.canvas_side();
        let pixels = side
            .saturating_mul(side)
            .saturating_mul(u64::from(config.frame_count));
        if pixels > self.max_pixels {
            return Err(LissajousError::LimitExceeded(format!(
                "{pixels} pixels requested, at most {} allowed",
                self.max_pixels
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, LissajousError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LissajousError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            LissajousError::Config(format!("Failed to parse config {}: {e}", path.display()))
        })
    }

    /// Resolve the bind address: explicit flag, then `LISSAJOUS_ADDR`, then file.
    #[must_use]
    pub fn bind_addr(&self, explicit: Option<&str>) -> String {
        if let Some(addr) = explicit {
            return addr.to_string();
        }
        std::env::var("LISSAJOUS_ADDR").ok().unwrap_or_else(|| self.server.addr.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `LISSAJOUS_CONFIG` environment variable
/// 3. `~/.config/lissajous/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("LISSAJOUS_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/lissajous/config.toml")
    } else {
        PathBuf::from("lissajous.toml")
    }
}
