//! Engine configuration.
//!
//! The session receives a [`ScratchConfig`] once, at construction, and never
//! reads ambient state afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ScratchError, ScratchResult};

/// Minimum gap between the win threshold and full coverage before sampling
/// noise can flip the win decision on an unchanged surface.
pub const RECOMMENDED_MARGIN: f64 = 0.10;

/// Tunables for a scratch session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchConfig {
    /// Coverage fraction that must be exceeded to win, in (0, 1].
    pub win_threshold: f64,
    /// Minimum time between progress ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Radius of the erasing brush, in pixels.
    pub erase_radius: f32,
    /// Sample every n-th pixel's alpha when estimating coverage.
    pub sample_stride: usize,
    /// Minimum time between rub cues, in milliseconds.
    pub rub_cooldown_ms: u64,
    /// Fixed seed for decoration placement. `None` picks a fresh one per
    /// initialization.
    pub decoration_seed: Option<u64>,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            win_threshold: 0.85,
            tick_interval_ms: 1000,
            erase_radius: 30.0,
            sample_stride: 10,
            rub_cooldown_ms: 100,
            decoration_seed: None,
        }
    }
}

impl ScratchConfig {
    /// Set the win threshold.
    #[must_use]
    pub fn with_win_threshold(mut self, threshold: f64) -> Self {
        self.win_threshold = threshold;
        self
    }

    /// Set the tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the erase radius.
    #[must_use]
    pub fn with_erase_radius(mut self, radius: f32) -> Self {
        self.erase_radius = radius;
        self
    }

    /// Set the sampling stride.
    #[must_use]
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Pin the decoration seed so every initialization paints the same mask.
    #[must_use]
    pub fn with_decoration_seed(mut self, seed: u64) -> Self {
        self.decoration_seed = Some(seed);
        self
    }

    /// Tick interval as a [`Duration`].
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ScratchError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> ScratchResult<()> {
        if !(self.win_threshold > 0.0 && self.win_threshold <= 1.0) {
            return Err(ScratchError::InvalidConfig(format!(
                "win_threshold must be in (0, 1], got {}",
                self.win_threshold
            )));
        }
        if self.sample_stride == 0 {
            return Err(ScratchError::InvalidConfig(
                "sample_stride must be at least 1".to_string(),
            ));
        }
        if !self.erase_radius.is_finite() || self.erase_radius <= 0.0 {
            return Err(ScratchError::InvalidConfig(format!(
                "erase_radius must be positive, got {}",
                self.erase_radius
            )));
        }
        if 1.0 - self.win_threshold < RECOMMENDED_MARGIN {
            tracing::warn!(
                "win_threshold {} leaves less than {:.0}% sampling margin",
                self.win_threshold,
                RECOMMENDED_MARGIN * 100.0
            );
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> ScratchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ScratchResult<String> {
        serde_json::to_string_pretty(self).map_err(ScratchError::Serialization)
    }
}
