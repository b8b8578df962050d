// SPDX-License-Identifier: GPL-3.0-only

//! Persistent user settings
//!
//! Stored as JSON under the platform config directory. Missing fields take
//! their defaults and unknown fields are ignored, so older and newer files
//! both load.

use crate::backends::camera::CameraPosition;
use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME};
use crate::errors::ConfigError;
use crate::flash::FlashMode;
use crate::preview::FillMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera installed when the session is created
    pub preferred_position: CameraPosition,
    /// How frames are placed on the preview surface
    pub preview_fill_mode: FillMode,
    /// Mirror the front camera's preview and photos (selfie mode)
    pub mirror_front_camera: bool,
    /// Flash mode applied to cameras that have a flash unit
    pub flash_mode: FlashMode,
    /// Report point-of-interest positions for the overlay
    pub draw_points_of_interest: bool,
    /// Preview surface units to pixels (HiDPI scale)
    pub preview_pixel_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred_position: CameraPosition::Rear,
            preview_fill_mode: FillMode::AspectFill,
            mirror_front_camera: true, // Default to mirrored (selfie mode)
            flash_mode: FlashMode::Off,
            draw_points_of_interest: false,
            preview_pixel_scale: 1.0,
        }
    }
}

impl Config {
    /// `<config dir>/camera-control/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut config: Self = serde_json::from_str(&text)?;
        config.sanitize();
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Load from the default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Replace values that cannot be used with their defaults
    fn sanitize(&mut self) {
        if !(self.preview_pixel_scale.is_finite() && self.preview_pixel_scale > 0.0) {
            warn!(
                scale = self.preview_pixel_scale,
                "Invalid preview pixel scale, using 1.0"
            );
            self.preview_pixel_scale = 1.0;
        }
    }
}
