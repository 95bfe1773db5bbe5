//! Configuration types for the block codec and timeline editor.

use serde::{Deserialize, Serialize};

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Timeline authoring parameters.
    #[serde(default)]
    pub timeline: TimelineConfig,
    /// Block pattern codec parameters.
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Timeline authoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Length of the music track in milliseconds. A first keyframe on an
    /// empty track is closed by a black keyframe at this time.
    pub duration: u32,
    /// Gap (ms) between a painted pulse and the black keyframes bounding it.
    pub black_threshold: u32,
    /// Authoring resolution (ms). Insert times are floored to a multiple.
    pub snap_interval: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            duration: 60_000,
            black_threshold: 10,
            snap_interval: 50,
        }
    }
}

impl TimelineConfig {
    /// Floor `time` to the authoring resolution.
    #[inline]
    pub fn snap(&self, time: u32) -> u32 {
        match self.snap_interval {
            0 => time,
            step => time / step * step,
        }
    }
}

/// Block pattern codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Alpha assigned to decoded colors (alpha is not stored in the code).
    pub default_alpha: f32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { default_alpha: 1.0 }
    }
}

impl EditorConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeline = &self.timeline;
        if timeline.duration == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        if timeline.snap_interval == 0 {
            return Err(ConfigError::InvalidSnapInterval);
        }
        if timeline.black_threshold >= timeline.snap_interval {
            return Err(ConfigError::InvalidBlackThreshold {
                threshold: timeline.black_threshold,
                snap_interval: timeline.snap_interval,
            });
        }
        if !(0.0..=1.0).contains(&self.codec.default_alpha) {
            return Err(ConfigError::InvalidAlpha(self.codec.default_alpha));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Timeline duration must be non-zero")]
    InvalidDuration,
    #[error("Snap interval must be non-zero")]
    InvalidSnapInterval,
    #[error("Black threshold {threshold} must be smaller than the snap interval {snap_interval}")]
    InvalidBlackThreshold { threshold: u32, snap_interval: u32 },
    #[error("Default alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f32),
}
