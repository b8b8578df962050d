// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use crate::flash::FlashMode;
use crate::preview::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Camera backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraBackendType {
    /// Built-in software backend producing colour-bar frames
    #[default]
    TestPattern,
    /// Backend implemented outside this crate (platform capture stack)
    External,
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::TestPattern => write!(f, "test-pattern"),
            CameraBackendType::External => write!(f, "external"),
        }
    }
}

/// Physical placement of a camera on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CameraPosition {
    /// User-facing camera
    Front,
    /// World-facing camera
    #[default]
    Rear,
}

impl CameraPosition {
    /// The other position
    pub fn opposite(self) -> Self {
        match self {
            CameraPosition::Front => CameraPosition::Rear,
            CameraPosition::Rear => CameraPosition::Front,
        }
    }

    /// Parse "front"/"rear" (also accepts "back"), case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "front" | "user" => Some(CameraPosition::Front),
            "rear" | "back" | "world" => Some(CameraPosition::Rear),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraPosition::Front => write!(f, "front"),
            CameraPosition::Rear => write!(f, "rear"),
        }
    }
}

/// Sensor rotation in degrees (clockwise)
///
/// The amount the raw sensor image must be rotated clockwise to appear
/// upright. Sensors on handheld devices are commonly mounted at 90° or 270°
/// relative to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorRotation {
    /// No rotation (sensor is oriented correctly)
    #[default]
    None,
    /// 90 degrees clockwise
    Rotate90,
    /// 180 degrees (upside down)
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl SensorRotation {
    /// Create rotation from an integer degree value (normalised to 0-360).
    ///
    /// Values that are not a multiple of 90 fall back to no rotation.
    pub fn from_degrees_int(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => SensorRotation::Rotate90,
            180 => SensorRotation::Rotate180,
            270 => SensorRotation::Rotate270,
            _ => SensorRotation::None,
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            SensorRotation::None => 0,
            SensorRotation::Rotate90 => 90,
            SensorRotation::Rotate180 => 180,
            SensorRotation::Rotate270 => 270,
        }
    }

    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, SensorRotation::Rotate90 | SensorRotation::Rotate270)
    }

    /// Dimensions of a `width`x`height` sensor image once rotated upright
    pub fn upright_size(&self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl std::fmt::Display for SensorRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Focus behaviour applied together with a focus point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusMode {
    /// Focus once on the point, then hold the lens position
    AutoFocusOnce,
    /// Keep refocusing on the point as the scene changes
    ContinuousAutoFocus,
    /// Lens position is held where it is
    Locked,
}

/// Exposure behaviour applied together with an exposure point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureMode {
    /// Meter once on the point, then hold exposure
    AutoExposeOnce,
    /// Keep metering on the point as the scene changes
    ContinuousAutoExposure,
    /// Exposure is held where it is
    Locked,
}

/// A single hardware mutation applied inside a device configuration transaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceSetting {
    FocusPointOfInterest(Point),
    Focus(FocusMode),
    ExposurePointOfInterest(Point),
    Exposure(ExposureMode),
    Flash(FlashMode),
}

/// Camera format specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {:?}", self.width, self.height, self.pixel_format)
    }
}

/// Pixel layout of a raw sample buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// BGRA - 32-bit with alpha (B G R A byte order)
    BGRA,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
    /// YUYV - Packed 4:2:2 (Y0 U Y1 V interleaved)
    YUYV,
}

impl PixelFormat {
    /// Minimum number of bytes one row of `width` pixels occupies
    pub fn min_stride(&self, width: u32) -> usize {
        let width = width as usize;
        match self {
            Self::RGBA | Self::BGRA => width * 4,
            Self::RGB24 => width * 3,
            Self::Gray8 => width,
            // Pairs of pixels share chroma, odd widths still need a full pair
            Self::YUYV => width.div_ceil(2) * 4,
        }
    }
}

/// A single frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel data, `stride` bytes per row
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Rotation the sensor recorded for this buffer
    pub rotation: SensorRotation,
    /// Monotonic frame counter assigned by the session
    pub sequence: u64,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

/// Frame receiver type for preview streams
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// One-shot delivery of a still capture
pub type StillReceiver = tokio::sync::oneshot::Receiver<BackendResult<CameraFrame>>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Camera device not found or cannot be opened
    DeviceNotFound(String),
    /// The session refused to install an input
    InputRejected(String),
    /// The device configuration lock is held elsewhere
    ConfigurationLocked(String),
    /// `begin_configuration` called while a transaction is already open
    TransactionInProgress,
    /// `commit_configuration` or an input change without an open transaction
    NoTransaction,
    /// The device could not produce a still buffer
    CaptureFailed(String),
    /// The session stopped before the request was served
    SessionStopped,
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::InputRejected(msg) => write!(f, "Input rejected: {}", msg),
            BackendError::ConfigurationLocked(msg) => {
                write!(f, "Configuration lock unavailable: {}", msg)
            }
            BackendError::TransactionInProgress => {
                write!(f, "A configuration transaction is already open")
            }
            BackendError::NoTransaction => write!(f, "No configuration transaction is open"),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::SessionStopped => write!(f, "Session stopped"),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
