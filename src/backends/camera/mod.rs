// SPDX-License-Identifier: GPL-3.0-only

//! Camera control core
//!
//! The device capture subsystem is reached only through the traits below.
//! Everything above them (descriptors, the session state machine, capture
//! pipeline) is platform independent.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Presentation layer  │
//! └──────────┬───────────┘
//!            │ view-space points, preview geometry
//!            ▼
//! ┌──────────────────────┐
//! │  SessionController   │  ← State machine, camera swap, POI batching
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │   CameraDescriptor   │  ← Per-camera capability flags and stored state
//! └──────────┬───────────┘
//!            │ configure(&[DeviceSetting])
//!            ▼
//! ┌──────────────────────┐
//! │ CameraBackend traits │  ← Device subsystem boundary
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     ┌─────────────┐
//!     │ TestPattern │  ← Built-in software implementation
//!     └─────────────┘
//! ```

pub mod descriptor;
pub mod session;
pub mod test_pattern;
pub mod types;

pub use descriptor::{CameraDescriptor, FocusExposureOutcome, PoiChannel, PoiMode};
pub use session::{PointsOfInterest, SessionController, SessionState, SessionStatus};
pub use test_pattern::{TestPatternBackend, TestPatternCamera, TestPatternDevice, TestPatternSession};
pub use types::*;

use std::sync::Arc;

/// Device subsystem entry point
///
/// A backend enumerates the physical cameras it can see and creates the
/// hardware session they are attached to.
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras, in the order the platform reports them
    fn enumerate_cameras(&self) -> Vec<Arc<dyn CaptureDevice>>;

    /// Create the hardware session that inputs are attached to
    fn create_session(&self) -> BackendResult<Arc<dyn CaptureSession>>;

    /// Check if this backend can be used on the current system
    fn is_available(&self) -> bool;

    /// Get the backend type identifier
    fn backend_type(&self) -> CameraBackendType;
}

/// A physical camera with capability introspection
pub trait CaptureDevice: Send + Sync {
    /// Stable identifier, unique within the backend
    fn unique_id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    fn position(&self) -> CameraPosition;

    /// Format of the buffers this device currently delivers
    fn active_format(&self) -> CameraFormat;

    /// Clockwise rotation needed to show the sensor image upright
    fn rotation(&self) -> SensorRotation;

    fn has_flash(&self) -> bool;

    /// Whether the hardware accepts a focus point of interest
    fn focus_poi_supported(&self) -> bool;

    /// Whether the hardware accepts an exposure point of interest
    fn exposure_poi_supported(&self) -> bool;

    fn supports_focus_mode(&self, mode: FocusMode) -> bool;

    fn supports_exposure_mode(&self, mode: ExposureMode) -> bool;

    /// Validate that the device can produce an input stream
    fn open_input(&self) -> BackendResult<()>;

    /// Apply settings inside one exclusive configuration transaction
    ///
    /// Either every setting takes effect or none does. Concurrent readers of
    /// the device never observe a partially applied batch.
    fn configure(&self, settings: &[DeviceSetting]) -> BackendResult<()>;
}

/// A running/stopped hardware session with at most one active input
///
/// Input changes are only legal between `begin_configuration` and
/// `commit_configuration`; transactions never overlap.
pub trait CaptureSession: Send + Sync {
    /// Open a configuration transaction
    fn begin_configuration(&self) -> BackendResult<()>;

    /// Close the open transaction, making its changes visible at once
    fn commit_configuration(&self) -> BackendResult<()>;

    /// Install `device` as the session input
    fn add_input(&self, device: Arc<dyn CaptureDevice>) -> BackendResult<()>;

    /// Remove and return the current input, if any
    fn remove_input(&self) -> BackendResult<Option<Arc<dyn CaptureDevice>>>;

    fn current_input(&self) -> Option<Arc<dyn CaptureDevice>>;

    fn start_running(&self) -> BackendResult<()>;

    fn stop_running(&self);

    fn is_running(&self) -> bool;

    /// Register (or clear) the sink that receives preview frames
    fn set_frame_sink(&self, sink: Option<FrameSender>);

    /// Suspend or resume preview delivery without stopping the session
    fn set_preview_enabled(&self, enabled: bool);

    /// Request one still buffer
    ///
    /// The receiver resolves with exactly one buffer or error. Requests are
    /// served in the order they were issued.
    fn capture_still(&self) -> StillReceiver;
}

/// Check whether a backend exposes at least one camera
pub fn device_has_camera(backend: &dyn CameraBackend) -> bool {
    !backend.enumerate_cameras().is_empty()
}

/// First enumerated camera at `position`
pub fn find_camera(
    backend: &dyn CameraBackend,
    position: CameraPosition,
) -> Option<Arc<dyn CaptureDevice>> {
    backend
        .enumerate_cameras()
        .into_iter()
        .find(|device| device.position() == position)
}
