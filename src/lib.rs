// SPDX-License-Identifier: GPL-3.0-only

//! Camera control core
//!
//! Session management for a two-camera device: camera selection and atomic
//! front/rear switching, preview-to-sensor coordinate mapping,
//! focus/exposure/flash configuration and asynchronous still capture that
//! produces a full-resolution photo plus a preview-sized image.
//!
//! # Architecture
//!
//! - [`backends`]: hardware abstraction and the software test-pattern backend
//! - [`preview`]: preview geometry and the [`CoordinateMapper`]
//! - [`pipelines`]: still capture, image transforms and encoding
//! - [`control_queue`]: the control thread that owns the session
//! - [`config`]: persisted user settings
//!
//! # Example
//!
//! ```no_run
//! use camera_control::backends::camera::{SessionController, TestPatternBackend};
//! use camera_control::{Config, ControlQueue};
//!
//! let backend = TestPatternBackend::default();
//! let mut queue = ControlQueue::new();
//! let mut session =
//!     SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
//! session.start().unwrap();
//! session
//!     .take_photo(|photo| println!("captured: {}", photo.is_some()))
//!     .unwrap();
//! queue.blocking_run_next();
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod control_queue;
pub mod errors;
pub mod flash;
pub mod pipelines;
pub mod preview;

// Re-export commonly used types
pub use backends::camera::{CameraDescriptor, CameraPosition, SessionController, SessionState};
pub use config::Config;
pub use control_queue::{ControlHandle, ControlQueue};
pub use flash::FlashMode;
pub use pipelines::photo::{CapturedPhoto, ImageTransform};
pub use preview::{CoordinateMapper, FillMode, Point, Rect, Size};
