// SPDX-License-Identifier: GPL-3.0-only

//! Tracker configuration
//!
//! Stored as JSON in the user's config directory. Every field has a default,
//! so partial files are fine. A missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backends::depth::{CameraIntrinsics, NoiseFilter, PassthroughFilter, RangeFilter};
use crate::constants::{app_info, depth, stage};
use crate::errors::{AppError, AppResult};
use crate::tracker::FrameSettings;

/// Current configuration schema version
pub const CONFIG_VERSION: u32 = 1;

/// Noise filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Drop samples outside `[min_mm, max_mm]` before classification
    pub enabled: bool,
    pub min_mm: u16,
    pub max_mm: u16,
}

impl FilterSettings {
    /// Build the configured filter
    pub fn build(&self) -> Box<dyn NoiseFilter> {
        if self.enabled {
            Box::new(RangeFilter::new(self.min_mm, self.max_mm))
        } else {
            Box::new(PassthroughFilter)
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_mm: depth::DEPTH_MIN_MM,
            max_mm: depth::DEPTH_MAX_MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version
    pub version: u32,
    /// Per-frame tracker settings (threshold, up vector, placement)
    pub tracker: FrameSettings,
    /// Camera intrinsics; Kinect defaults scaled to the source when unset
    pub intrinsics: Option<CameraIntrinsics>,
    /// Depth noise filter
    pub filter: FilterSettings,
    /// Seconds to calibrate after start-up (0 disables)
    pub calibration_secs: f32,
    /// Side of the square stage floor in millimetres
    pub stage_size_mm: f32,
    /// Presence map resolution (cells per side)
    pub presence_cells: usize,
    /// Replay recordings at this rate instead of as fast as possible
    pub playback_fps: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tracker: FrameSettings::default(),
            intrinsics: None,
            filter: FilterSettings::default(),
            calibration_secs: stage::CALIBRATION_SECS,
            stage_size_mm: stage::STAGE_SIZE_MM,
            presence_cells: stage::PRESENCE_CELLS,
            playback_fps: None,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/depth-tracker/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_ID).join("config.json"))
    }

    /// Load and validate a config file, falling back to defaults if absent
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        if config.version != CONFIG_VERSION {
            info!(
                found = config.version,
                current = CONFIG_VERSION,
                "Config written by a different version"
            );
        }
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write the config as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Check values the tracker relies on but does not verify itself
    pub fn validate(&self) -> AppResult<()> {
        let up = &self.tracker.up;
        if !up.iter().all(|c| c.is_finite()) || up.norm_squared() == 0.0 {
            return Err(AppError::Config(format!(
                "up vector must be finite and non-zero, got {:?}",
                up.as_slice()
            )));
        }
        if !self.tracker.rotation_deg.is_finite()
            || !self.tracker.offset.iter().all(|c| c.is_finite())
        {
            return Err(AppError::Config(
                "offset and rotation must be finite".to_string(),
            ));
        }
        if self.filter.min_mm > self.filter.max_mm {
            return Err(AppError::Config(format!(
                "filter range is inverted ({} > {})",
                self.filter.min_mm, self.filter.max_mm
            )));
        }
        if !(self.calibration_secs.is_finite() && self.calibration_secs >= 0.0) {
            return Err(AppError::Config(format!(
                "calibration_secs must be >= 0, got {}",
                self.calibration_secs
            )));
        }
        if !(self.stage_size_mm.is_finite() && self.stage_size_mm > 0.0) {
            return Err(AppError::Config(format!(
                "stage_size_mm must be > 0, got {}",
                self.stage_size_mm
            )));
        }
        if self.presence_cells == 0 {
            return Err(AppError::Config("presence_cells must be > 0".to_string()));
        }
        if let Some(fps) = self.playback_fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(AppError::Config(format!(
                    "playback_fps must be > 0, got {}",
                    fps
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_up_vector_rejected() {
        let mut config = Config::default();
        config.tracker.up = Vector3::zeros();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_inverted_filter_range_rejected() {
        let mut config = Config::default();
        config.filter.min_mm = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_tracker_keeps_default_threshold() {
        let config: Config =
            serde_json::from_str(r#"{ "tracker": { "up": [0.0, 1.0, 0.0] } }"#).unwrap();
        assert_eq!(config.tracker.up, Vector3::y());
        assert_eq!(config.tracker.threshold, Config::default().tracker.threshold);
        assert_eq!(config.tracker.threshold, depth::DEFAULT_THRESHOLD_MM);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "tracker": { "threshold": 42 } }"#).unwrap();
        assert_eq!(config.tracker.threshold, 42);
        assert_eq!(config.tracker.up, Vector3::z());
        assert_eq!(config.presence_cells, stage::PRESENCE_CELLS);
    }
}
