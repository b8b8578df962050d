// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use crate::preview::Point;

/// Point of interest a camera starts with: the sensor centre
pub const DEFAULT_POINT_OF_INTEREST: Point = Point::CENTER;

/// Preview frames buffered before new frames are dropped
pub const PREVIEW_CHANNEL_CAPACITY: usize = 4;

/// Directory under the platform config dir
pub const APP_DIR_NAME: &str = "camera-control";

/// Settings file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Software test-pattern backend defaults
pub mod test_pattern {
    use std::time::Duration;

    /// Default sensor width in pixels
    pub const WIDTH: u32 = 640;
    /// Default sensor height in pixels
    pub const HEIGHT: u32 = 480;
    /// Time between preview frames (~30 fps)
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poi_is_normalized_centre() {
        assert!(DEFAULT_POINT_OF_INTEREST.is_normalized());
        assert_eq!(DEFAULT_POINT_OF_INTEREST, Point::new(0.5, 0.5));
    }
}
