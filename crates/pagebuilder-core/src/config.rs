//! Editor tunables.
//!
//! Every field has a default, so a host can ship a partial JSON file and
//! override only what it needs.

use crate::snap::{GRID_SIZE, GUIDE_TOLERANCE};
use crate::storage::DEFAULT_AUTOSAVE_DELAY_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Key under which the document blob is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "builder-mini/document";

/// Tunables for the store, canvas engine and autosave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing in document pixels.
    pub grid_size: f64,
    /// Guide snap distance in screen pixels (divided by zoom before use).
    pub guide_tolerance: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per modified wheel tick.
    pub wheel_zoom_step: f64,
    /// Zoom change per zoom-in/zoom-out key press.
    pub key_zoom_step: f64,
    /// Size of the bottom-right resize handle, in screen pixels.
    pub resize_hot_zone: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    /// Offset applied to both axes of a duplicate.
    pub duplicate_offset: f64,
    /// Vertical stagger between successive nodes of the same kind.
    pub stagger_step: f64,
    pub autosave_delay_ms: u64,
    pub storage_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            guide_tolerance: GUIDE_TOLERANCE,
            min_zoom: 0.5,
            max_zoom: 2.0,
            wheel_zoom_step: 0.05,
            key_zoom_step: 0.1,
            resize_hot_zone: 12.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            duplicate_offset: 16.0,
            stagger_step: 24.0,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EditorConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom >= self.min_zoom && self.max_zoom.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "max_zoom ({}) must not be below min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if !(self.grid_size > 0.0 && self.grid_size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
