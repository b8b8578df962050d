// SPDX-License-Identifier: GPL-3.0-only

//! Capture worker
//!
//! Runs on the pipeline's background thread. Jobs are served strictly in
//! submission order: the worker waits for each job's buffer before looking
//! at the next one, so completions are posted in the same order.

use super::processing::ImageTransform;
use super::{CaptureCompletion, CaptureRequest, CaptureSettings, CapturedPhoto};
use crate::backends::camera::SessionStatus;
use crate::backends::camera::types::{CameraFrame, StillReceiver};
use crate::control_queue::ControlHandle;
use crate::errors::PhotoError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// A submitted request together with the callback it must reach
pub(crate) struct CaptureJob {
    pub request: CaptureRequest,
    pub completion: CaptureCompletion,
    pub submitted_at: Instant,
}

/// Photo capture handler
pub struct PhotoCapture;

impl PhotoCapture {
    /// Block until the device subsystem delivers the still buffer
    pub fn await_buffer(buffer: StillReceiver) -> Result<CameraFrame, PhotoError> {
        match buffer.blocking_recv() {
            Ok(Ok(frame)) => Ok(frame),
            Ok(Err(e)) => Err(PhotoError::CaptureFailed(e.to_string())),
            Err(_) => Err(PhotoError::CaptureFailed(
                "device dropped the still request".to_string(),
            )),
        }
    }

    /// Produce the full-resolution photo and the preview image from a buffer
    pub fn develop(
        frame: &CameraFrame,
        settings: &CaptureSettings,
    ) -> Result<CapturedPhoto, PhotoError> {
        let photo =
            ImageTransform::normalize_orientation(frame, frame.rotation, settings.mirrored)?;
        let preview = ImageTransform::scale(&photo, settings.preview_size, settings.fill_mode);
        Ok(CapturedPhoto { photo, preview })
    }

    /// Wait for, check and transform one request
    ///
    /// `None` stands for "no images": capture error, undecodable buffer, or a
    /// session stopped after the request was issued.
    fn process(request: CaptureRequest, status: &SessionStatus) -> Option<CapturedPhoto> {
        let CaptureRequest {
            buffer,
            settings,
            generation,
        } = request;

        let frame = match Self::await_buffer(buffer) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Still capture failed");
                return None;
            }
        };

        if status.generation() != generation {
            debug!(
                requested = generation,
                current = status.generation(),
                "Session stopped while capture was in flight"
            );
            return None;
        }

        debug!(
            width = frame.width,
            height = frame.height,
            format = ?frame.format,
            sequence = frame.sequence,
            "Still buffer received"
        );

        match Self::develop(&frame, &settings) {
            Ok(photo) => Some(photo),
            Err(e) => {
                warn!(error = %e, "Failed to transform still buffer");
                None
            }
        }
    }
}

/// Worker loop: drain jobs until every sender is gone
pub(crate) fn run_worker(
    mut jobs: UnboundedReceiver<CaptureJob>,
    control: ControlHandle,
    status: Arc<SessionStatus>,
) {
    debug!("Capture worker started");

    while let Some(job) = jobs.blocking_recv() {
        let CaptureJob {
            request,
            completion,
            submitted_at,
        } = job;

        let result = PhotoCapture::process(request, &status);
        info!(
            success = result.is_some(),
            elapsed_ms = submitted_at.elapsed().as_millis() as u64,
            "Capture finished"
        );

        if !control.post(move || completion(result)) {
            debug!("Control queue gone, capture completion discarded");
        }
    }

    debug!("Capture worker stopped");
}
