// SPDX-License-Identifier: GPL-3.0-only

//! Error types for camera control

use crate::backends::camera::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Umbrella error for callers that do not care which layer failed
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera selection / session errors
    Camera(CameraError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Configuration errors
    Config(ConfigError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// A physical camera cannot be opened as an input
    UnsupportedDevice(String),
    /// Neither a front nor a rear camera is usable
    NoCameraAvailable,
    /// The device subsystem failed outside of a specific camera
    Backend(BackendError),
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Capture requested while the session is stopped
    SessionNotRunning,
    /// The device subsystem or the pipeline could not produce a buffer
    CaptureFailed(String),
    /// A raw buffer did not match its declared geometry
    InvalidBuffer(String),
}

/// Which point-of-interest capability an operation needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    FocusPointOfInterest,
    ExposurePointOfInterest,
}

/// Non-fatal failure of a single configuration request
///
/// Returned by value, never raised. Hardware state is unchanged whenever one
/// of these is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureError {
    /// The camera lacks the capability entirely
    CapabilityUnsupported(Capability),
    /// The camera has the capability but not the requested mode
    ModeUnsupported(String),
    /// Camera-space points must lie within [0,1]²
    PointOutOfRange,
    /// The device configuration lock could not be acquired
    LockUnavailable(String),
    /// The device rejected the settings inside an acquired lock
    Hardware(String),
    /// No camera is installed in the session
    NoActiveCamera,
}

/// Configuration file errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::UnsupportedDevice(msg) => write!(f, "Unsupported device: {}", msg),
            CameraError::NoCameraAvailable => write!(f, "No camera available"),
            CameraError::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::SessionNotRunning => write!(f, "Session is not running"),
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::InvalidBuffer(msg) => write!(f, "Invalid buffer: {}", msg),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::FocusPointOfInterest => write!(f, "focus point of interest"),
            Capability::ExposurePointOfInterest => write!(f, "exposure point of interest"),
        }
    }
}

impl fmt::Display for ConfigureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigureError::CapabilityUnsupported(cap) => write!(f, "{} not supported", cap),
            ConfigureError::ModeUnsupported(mode) => write!(f, "Mode not supported: {}", mode),
            ConfigureError::PointOutOfRange => write!(f, "Point outside [0,1] camera space"),
            ConfigureError::LockUnavailable(msg) => {
                write!(f, "Configuration lock unavailable: {}", msg)
            }
            ConfigureError::Hardware(msg) => write!(f, "Device rejected settings: {}", msg),
            ConfigureError::NoActiveCamera => write!(f, "No active camera"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for ConfigureError {}
impl std::error::Error for ConfigError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        CameraError::Backend(err)
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(CameraError::Backend(err))
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<BackendError> for ConfigureError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::ConfigurationLocked(msg) => ConfigureError::LockUnavailable(msg),
            other => ConfigureError::Hardware(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Storage(err.to_string())
    }
}
