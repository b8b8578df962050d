// SPDX-License-Identifier: GPL-3.0-only

//! Still photo capture pipeline
//!
//! ```text
//! take_photo ─▶ capture_still ─▶ worker thread ─▶ ControlQueue ─▶ completion
//!                                  │
//!                                  ├─ normalize orientation (full image)
//!                                  └─ scale to preview (preview image)
//! ```
//!
//! The session keeps streaming preview frames while a still is processed.
//! Completions always run on the control thread, exactly once per accepted
//! request, in submission order.

pub mod capture;
pub mod encoding;
pub mod processing;

pub use capture::PhotoCapture;
pub use encoding::{EncodingFormat, EncodingQuality, PhotoEncoder};
pub use processing::ImageTransform;

use crate::backends::camera::SessionStatus;
use crate::backends::camera::types::StillReceiver;
use crate::control_queue::ControlHandle;
use crate::errors::PhotoError;
use crate::preview::FillMode;
use capture::CaptureJob;
use image::RgbaImage;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

/// The two images a successful capture produces
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Full resolution, upright, mirrored for front cameras
    pub photo: RgbaImage,
    /// `photo` scaled to the preview surface
    pub preview: RgbaImage,
}

/// Callback receiving a capture result on the control thread
///
/// `None` means the capture produced no images.
pub type CaptureCompletion = Box<dyn FnOnce(Option<CapturedPhoto>) + Send + 'static>;

/// How a buffer is turned into images
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    pub mirrored: bool,
    /// Preview image size in pixels
    pub preview_size: (u32, u32),
    pub fill_mode: FillMode,
}

/// One pending still capture
pub struct CaptureRequest {
    pub buffer: StillReceiver,
    pub settings: CaptureSettings,
    /// Session generation the request was issued under
    pub generation: u64,
}

/// Owns the capture worker thread
pub struct CapturePipeline {
    jobs: Option<UnboundedSender<CaptureJob>>,
    worker: Option<JoinHandle<()>>,
}

impl CapturePipeline {
    /// Start the worker thread
    pub fn new(control: ControlHandle, status: Arc<SessionStatus>) -> std::io::Result<Self> {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let worker = std::thread::Builder::new()
            .name("capture-worker".to_string())
            .spawn(move || capture::run_worker(receiver, control, status))?;

        Ok(Self {
            jobs: Some(jobs),
            worker: Some(worker),
        })
    }

    /// Queue a request; its completion is posted to the control queue later
    pub fn submit(
        &self,
        request: CaptureRequest,
        completion: CaptureCompletion,
    ) -> Result<(), PhotoError> {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| PhotoError::CaptureFailed("capture worker stopped".to_string()))?;

        debug!(
            generation = request.generation,
            preview = ?request.settings.preview_size,
            mirrored = request.settings.mirrored,
            "Submitting capture request"
        );

        jobs.send(CaptureJob {
            request,
            completion,
            submitted_at: Instant::now(),
        })
        .map_err(|_| PhotoError::CaptureFailed("capture worker stopped".to_string()))
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish queued jobs and exit
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Capture worker panicked");
            }
        }
    }
}
