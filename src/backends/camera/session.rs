// SPDX-License-Identifier: GPL-3.0-only

//! Capture session state machine
//!
//! [`SessionController`] is the single owner of the hardware session. It
//! holds the front and rear [`CameraDescriptor`]s, swaps the active input
//! under a configuration transaction, converts view-space touch points for
//! the active camera, and hands still requests to the capture pipeline.
//!
//! ```text
//!            start()               set_paused(true)
//! Stopped ─────────────▶ Running ─────────────────▶ Paused
//!    ▲                     │  ▲  set_paused(false)    │
//!    └──── stop() ─────────┘  └───────────────────────┘
//!    └──────────────────── stop() ────────────────────┘
//! ```
//!
//! Every mutating call takes `&mut self`, so configuration transactions are
//! issued one at a time from the owning (control) thread.

use super::descriptor::{CameraDescriptor, FocusExposureOutcome};
use super::types::*;
use super::{CameraBackend, CaptureDevice, CaptureSession};
use crate::config::Config;
use crate::constants::PREVIEW_CHANNEL_CAPACITY;
use crate::control_queue::ControlHandle;
use crate::errors::{CameraError, ConfigureError, PhotoError};
use crate::flash::FlashMode;
use crate::pipelines::photo::{
    CaptureCompletion, CapturePipeline, CaptureRequest, CaptureSettings, CapturedPhoto,
};
use crate::preview::{CoordinateMapper, FillMode, Point, Rect, Size};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

/// Session state read by background threads
#[derive(Debug, Default)]
pub struct SessionStatus {
    running: AtomicBool,
    generation: AtomicU64,
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Counter bumped on every stop
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Invalidate requests issued under the current generation
    pub(crate) fn end_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Lifecycle state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Stopped,
    Running,
    /// Running with preview delivery suspended
    Paused,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Stopped => write!(f, "stopped"),
            SessionState::Running => write!(f, "running"),
            SessionState::Paused => write!(f, "paused"),
        }
    }
}

/// View-space positions of the active camera's points of interest
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointsOfInterest {
    pub focus: Option<Point>,
    pub exposure: Option<Point>,
}

/// Open session configuration transaction
///
/// Commits on drop if not committed explicitly, so every early return still
/// closes the transaction.
struct SessionTransaction<'a> {
    session: &'a dyn CaptureSession,
    open: bool,
}

impl<'a> SessionTransaction<'a> {
    fn begin(session: &'a dyn CaptureSession) -> BackendResult<Self> {
        session.begin_configuration()?;
        Ok(Self {
            session,
            open: true,
        })
    }

    fn commit(mut self) -> BackendResult<()> {
        self.open = false;
        self.session.commit_configuration()
    }
}

impl Drop for SessionTransaction<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.session.commit_configuration() {
                warn!(error = %e, "Failed to close configuration transaction");
            }
        }
    }
}

/// Owner of the capture session and both camera descriptors
pub struct SessionController {
    backend_type: CameraBackendType,
    session: Arc<dyn CaptureSession>,
    front: Option<CameraDescriptor>,
    rear: Option<CameraDescriptor>,
    current: Option<CameraPosition>,
    state: SessionState,
    status: Arc<SessionStatus>,
    pipeline: CapturePipeline,
    /// Bounds set by the presentation layer; `None` follows the active camera
    preview_bounds: Option<Rect>,
    fill_mode: FillMode,
    mirror_front: bool,
    preview_pixel_scale: f32,
    draw_points_of_interest: bool,
}

impl SessionController {
    /// Build descriptors for the backend's cameras and install the preferred one
    ///
    /// Cameras that cannot be opened are skipped. Having no usable camera is
    /// not an error here; [`start`](Self::start) reports it.
    pub fn new(
        backend: &dyn CameraBackend,
        config: &Config,
        control: ControlHandle,
    ) -> Result<Self, CameraError> {
        info!(backend = %backend.backend_type(), "Creating session controller");

        if !backend.is_available() {
            warn!(backend = %backend.backend_type(), "Camera backend not available");
            return Err(CameraError::Backend(BackendError::NotAvailable(format!(
                "{} backend cannot open cameras",
                backend.backend_type()
            ))));
        }

        let mut front = None;
        let mut rear = None;
        for device in backend.enumerate_cameras() {
            let slot = match device.position() {
                CameraPosition::Front => &mut front,
                CameraPosition::Rear => &mut rear,
            };
            if slot.is_some() {
                debug!(device = %device.name(), "Additional camera at position ignored");
                continue;
            }
            match CameraDescriptor::new(device) {
                Ok(descriptor) => *slot = Some(descriptor),
                Err(e) => warn!(error = %e, "Skipping camera"),
            }
        }

        let session = backend.create_session()?;
        let status = Arc::new(SessionStatus::default());
        let pipeline = CapturePipeline::new(control, Arc::clone(&status)).map_err(|e| {
            CameraError::Backend(BackendError::Other(format!(
                "Failed to start capture worker: {}",
                e
            )))
        })?;

        let mut controller = Self {
            backend_type: backend.backend_type(),
            session,
            front,
            rear,
            current: None,
            state: SessionState::Stopped,
            status,
            pipeline,
            preview_bounds: None,
            fill_mode: config.preview_fill_mode,
            mirror_front: config.mirror_front_camera,
            preview_pixel_scale: config.preview_pixel_scale,
            draw_points_of_interest: config.draw_points_of_interest,
        };

        for descriptor in [controller.front.as_mut(), controller.rear.as_mut()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = descriptor.set_flash_mode(config.flash_mode) {
                warn!(device = %descriptor.name(), error = %e, "Failed to apply configured flash mode");
            }
        }

        let preferred = config.preferred_position;
        if !controller.install(preferred) && !controller.install(preferred.opposite()) {
            warn!("No camera could be installed");
        }

        info!(
            front = controller.front.is_some(),
            rear = controller.rear.is_some(),
            current = ?controller.current,
            "Session controller ready"
        );

        Ok(controller)
    }

    /// Whether the backend exposes at least one camera
    pub fn device_has_camera(backend: &dyn CameraBackend) -> bool {
        super::device_has_camera(backend)
    }

    pub fn backend_type(&self) -> CameraBackendType {
        self.backend_type
    }

    // ===== Lifecycle =====

    /// Start the session; a no-op if already running
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.state != SessionState::Stopped {
            debug!(state = %self.state, "Session already running");
            return Ok(());
        }

        if self.current.is_none()
            && !self.install(CameraPosition::Rear)
            && !self.install(CameraPosition::Front)
        {
            warn!("Cannot start session without a camera");
            return Err(CameraError::NoCameraAvailable);
        }

        self.session.start_running()?;
        self.status.set_running(true);
        self.state = SessionState::Running;
        info!(camera = ?self.current, "Session started");
        Ok(())
    }

    /// Stop the session from any state
    ///
    /// Captures still in flight complete with no images.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }

        self.status.set_running(false);
        let generation = self.status.end_generation();
        self.session.stop_running();
        self.session.set_preview_enabled(true);
        self.state = SessionState::Stopped;
        info!(generation, "Session stopped");
    }

    /// Suspend or resume preview delivery; ignored while stopped
    pub fn set_paused(&mut self, paused: bool) {
        if self.state == SessionState::Stopped {
            debug!(paused, "Ignoring pause request while stopped");
            return;
        }

        self.session.set_preview_enabled(!paused);
        self.state = if paused {
            SessionState::Paused
        } else {
            SessionState::Running
        };
        info!(state = %self.state, "Preview pause toggled");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != SessionState::Stopped
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    /// Shared status for observers on other threads
    pub fn status(&self) -> Arc<SessionStatus> {
        Arc::clone(&self.status)
    }

    // ===== Camera selection =====

    pub fn use_front(&mut self) -> bool {
        self.use_camera(CameraPosition::Front)
    }

    pub fn use_rear(&mut self) -> bool {
        self.use_camera(CameraPosition::Rear)
    }

    /// Make the camera at `position` the session input
    ///
    /// Returns `false` without changing anything if there is no camera at
    /// that position or the session refuses it.
    pub fn use_camera(&mut self, position: CameraPosition) -> bool {
        if self.current == Some(position) {
            return self.camera(position).is_some();
        }

        let previous = self.current;
        let swapped = self.install(position);
        if swapped {
            info!(from = ?previous, to = %position, "Switched camera");
        }
        swapped
    }

    /// Toggle between front and rear; a no-op unless both exist
    pub fn swap(&mut self) -> bool {
        match self.current {
            Some(current) if self.camera(current.opposite()).is_some() => {
                self.use_camera(current.opposite())
            }
            _ => {
                debug!("Swap requested without two cameras");
                false
            }
        }
    }

    /// Replace the session input with the camera at `position`
    fn install(&mut self, position: CameraPosition) -> bool {
        let Some(device) = self.camera(position).map(|d| Arc::clone(d.device())) else {
            debug!(position = %position, "No camera at position");
            return false;
        };

        let session = Arc::clone(&self.session);
        let transaction = match SessionTransaction::begin(session.as_ref()) {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!(error = %e, "Cannot begin session configuration");
                return false;
            }
        };

        let previous = match session.remove_input() {
            Ok(previous) => previous,
            Err(e) => {
                warn!(error = %e, "Cannot remove current input");
                return false;
            }
        };

        if let Err(e) = session.add_input(device) {
            warn!(position = %position, error = %e, "Camera input rejected, keeping previous camera");
            if let Some(previous) = previous {
                if let Err(e) = session.add_input(previous) {
                    error!(error = %e, "Failed to restore previous camera input");
                }
            }
            return false;
        }

        if let Err(e) = transaction.commit() {
            error!(position = %position, error = %e, "Failed to commit camera swap, rolling back");
            Self::rollback_input(session.as_ref(), previous);
            return false;
        }

        self.current = Some(position);

        if let Some(descriptor) = self.camera(position) {
            if let Err(e) = descriptor.reapply() {
                warn!(device = %descriptor.name(), error = %e, "Failed to restore camera settings");
            }
        }
        true
    }

    /// Put `previous` back as the only input in a fresh transaction
    fn rollback_input(session: &dyn CaptureSession, previous: Option<Arc<dyn CaptureDevice>>) {
        let transaction = match SessionTransaction::begin(session) {
            Ok(transaction) => transaction,
            Err(e) => {
                error!(error = %e, "Cannot begin rollback transaction");
                return;
            }
        };
        if let Err(e) = session.remove_input() {
            error!(error = %e, "Failed to remove input during rollback");
            return;
        }
        if let Some(previous) = previous {
            if let Err(e) = session.add_input(previous) {
                error!(error = %e, "Failed to restore previous camera input");
                return;
            }
        }
        if let Err(e) = transaction.commit() {
            error!(error = %e, "Failed to commit rollback");
        }
    }

    pub fn current_position(&self) -> Option<CameraPosition> {
        self.current
    }

    pub fn current_camera(&self) -> Option<&CameraDescriptor> {
        self.current.and_then(|position| self.camera(position))
    }

    fn current_camera_mut(&mut self) -> Option<&mut CameraDescriptor> {
        match self.current? {
            CameraPosition::Front => self.front.as_mut(),
            CameraPosition::Rear => self.rear.as_mut(),
        }
    }

    pub fn camera(&self, position: CameraPosition) -> Option<&CameraDescriptor> {
        match position {
            CameraPosition::Front => self.front.as_ref(),
            CameraPosition::Rear => self.rear.as_ref(),
        }
    }

    pub fn front_camera(&self) -> Option<&CameraDescriptor> {
        self.front.as_ref()
    }

    pub fn rear_camera(&self) -> Option<&CameraDescriptor> {
        self.rear.as_ref()
    }

    /// Whether the active camera's preview and photos are mirrored
    pub fn is_mirrored(&self) -> bool {
        self.mirror_front && self.current == Some(CameraPosition::Front)
    }

    // ===== Preview geometry =====

    pub fn set_preview_bounds(&mut self, bounds: Rect) {
        debug!(?bounds, "Preview bounds changed");
        self.preview_bounds = Some(bounds);
    }

    /// Preview bounds, defaulting to the active camera's upright size
    pub fn preview_bounds(&self) -> Rect {
        match (self.preview_bounds, self.current_camera()) {
            (Some(bounds), _) => bounds,
            (None, Some(descriptor)) => Rect::from_size(descriptor.upright_size()),
            (None, None) => Rect::default(),
        }
    }

    pub fn set_preview_fill_mode(&mut self, fill_mode: FillMode) {
        debug!(%fill_mode, "Preview fill mode changed");
        self.fill_mode = fill_mode;
    }

    pub fn preview_fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    /// Point mapper for the current preview geometry and active camera
    pub fn mapper(&self) -> CoordinateMapper {
        let mapper =
            CoordinateMapper::new(self.preview_bounds(), self.fill_mode).mirrored(self.is_mirrored());
        match self.current_camera() {
            Some(descriptor) => mapper
                .with_content_size(descriptor.upright_size())
                .with_rotation(descriptor.rotation()),
            None => mapper,
        }
    }

    /// Convert a view-space point to the active camera's space
    pub fn to_camera_point(&self, view_point: Point) -> Point {
        self.mapper().to_camera_space(view_point)
    }

    /// Live preview frames, delivered while running and not paused
    ///
    /// Replaces any receiver handed out earlier.
    pub fn preview_frames(&self) -> FrameReceiver {
        let (sender, receiver) = futures::channel::mpsc::channel(PREVIEW_CHANNEL_CAPACITY);
        self.session.set_frame_sink(Some(sender));
        receiver
    }

    // ===== Focus, exposure, flash =====

    /// Focus continuously on a view-space point
    pub fn set_focus_point(&mut self, view_point: Point) -> Result<(), ConfigureError> {
        self.set_focus_point_with_mode(view_point, FocusMode::ContinuousAutoFocus)
    }

    pub fn set_focus_point_with_mode(
        &mut self,
        view_point: Point,
        mode: FocusMode,
    ) -> Result<(), ConfigureError> {
        let point = self.to_camera_point(view_point);
        let descriptor = self
            .current_camera_mut()
            .ok_or(ConfigureError::NoActiveCamera)?;
        debug!(?view_point, ?point, ?mode, "Setting focus point");
        descriptor.set_focus_point(point, mode)
    }

    /// Meter exposure continuously on a view-space point
    pub fn set_exposure_point(&mut self, view_point: Point) -> Result<(), ConfigureError> {
        self.set_exposure_point_with_mode(view_point, ExposureMode::ContinuousAutoExposure)
    }

    pub fn set_exposure_point_with_mode(
        &mut self,
        view_point: Point,
        mode: ExposureMode,
    ) -> Result<(), ConfigureError> {
        let point = self.to_camera_point(view_point);
        let descriptor = self
            .current_camera_mut()
            .ok_or(ConfigureError::NoActiveCamera)?;
        debug!(?view_point, ?point, ?mode, "Setting exposure point");
        descriptor.set_exposure_point(point, mode)
    }

    /// Focus and meter on one view-space point in a single transaction
    ///
    /// `lock_focus` focuses once and holds; otherwise focus is continuous.
    /// `lock_exposure` works the same way. A channel the camera lacks is
    /// reported as failed while the other is still applied.
    pub fn set_focus_and_exposure_point(
        &mut self,
        view_point: Point,
        lock_focus: bool,
        lock_exposure: bool,
    ) -> FocusExposureOutcome {
        let focus_mode = if lock_focus {
            FocusMode::AutoFocusOnce
        } else {
            FocusMode::ContinuousAutoFocus
        };
        let exposure_mode = if lock_exposure {
            ExposureMode::AutoExposeOnce
        } else {
            ExposureMode::ContinuousAutoExposure
        };

        let point = self.to_camera_point(view_point);
        let Some(descriptor) = self.current_camera_mut() else {
            return FocusExposureOutcome::failed(ConfigureError::NoActiveCamera);
        };

        let outcome = descriptor.set_focus_and_exposure_point(point, focus_mode, exposure_mode);
        if outcome.is_success() {
            debug!(?point, lock_focus, lock_exposure, "Focus and exposure set");
        } else {
            info!(
                ?point,
                focus = ?outcome.focus,
                exposure = ?outcome.exposure,
                "Focus and exposure only partially applied"
            );
        }
        outcome
    }

    /// Set the active camera's flash mode, returning the mode in effect
    pub fn set_flash_mode(&mut self, mode: FlashMode) -> Result<FlashMode, ConfigureError> {
        let descriptor = self
            .current_camera_mut()
            .ok_or(ConfigureError::NoActiveCamera)?;
        let effective = descriptor.set_flash_mode(mode)?;
        info!(requested = %mode, effective = %effective, "Flash mode set");
        Ok(effective)
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.current_camera()
            .map(CameraDescriptor::flash_mode)
            .unwrap_or_default()
    }

    // ===== Point-of-interest overlay =====

    pub fn set_draw_points_of_interest(&mut self, draw: bool) {
        self.draw_points_of_interest = draw;
    }

    pub fn draws_points_of_interest(&self) -> bool {
        self.draw_points_of_interest
    }

    /// Request the focus indicator; enables overlay reporting
    pub fn show_focus_indicator(&mut self) {
        self.draw_points_of_interest = true;
    }

    /// Request the exposure indicator; enables overlay reporting
    pub fn show_exposure_indicator(&mut self) {
        self.draw_points_of_interest = true;
    }

    /// Where the overlay should draw the active camera's points of interest
    ///
    /// A channel is reported only when drawing is enabled and the camera
    /// supports that channel.
    pub fn points_of_interest(&self) -> PointsOfInterest {
        if !self.draw_points_of_interest {
            return PointsOfInterest::default();
        }
        let Some(descriptor) = self.current_camera() else {
            return PointsOfInterest::default();
        };

        let mapper = self.mapper();
        PointsOfInterest {
            focus: descriptor
                .focus_poi_supported()
                .then(|| mapper.to_view_space(descriptor.focus_point_of_interest())),
            exposure: descriptor
                .exposure_poi_supported()
                .then(|| mapper.to_view_space(descriptor.exposure_point_of_interest())),
        }
    }

    // ===== Capture =====

    /// Size in pixels of the preview image a capture produces
    pub fn preview_target_size(&self) -> (u32, u32) {
        let scale = self.preview_pixel_scale;
        let bounds = self.preview_bounds();
        Size::new(bounds.width * scale, bounds.height * scale).to_pixels()
    }

    /// Take a still photo
    ///
    /// Fails synchronously with [`PhotoError::SessionNotRunning`] while
    /// stopped; the completion is then never called. Otherwise the
    /// completion runs exactly once on the control thread.
    pub fn take_photo<F>(&self, completion: F) -> Result<(), PhotoError>
    where
        F: FnOnce(Option<CapturedPhoto>) + Send + 'static,
    {
        if !self.is_running() {
            debug!("Capture requested while stopped");
            return Err(PhotoError::SessionNotRunning);
        }

        let settings = CaptureSettings {
            mirrored: self.is_mirrored(),
            preview_size: self.preview_target_size(),
            fill_mode: self.fill_mode,
        };
        let request = CaptureRequest {
            buffer: self.session.capture_still(),
            settings,
            generation: self.status.generation(),
        };
        let completion: CaptureCompletion = Box::new(completion);
        self.pipeline.submit(request, completion)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{TestPatternBackend, TestPatternCamera};
    use crate::control_queue::ControlQueue;

    fn controller(backend: &TestPatternBackend, queue: &ControlQueue) -> SessionController {
        SessionController::new(backend, &Config::default(), queue.handle()).unwrap()
    }

    #[test]
    fn test_prefers_configured_position() {
        let backend = TestPatternBackend::default();
        let queue = ControlQueue::new();
        let config = Config {
            preferred_position: CameraPosition::Front,
            ..Config::default()
        };
        let controller = SessionController::new(&backend, &config, queue.handle()).unwrap();
        assert_eq!(controller.current_position(), Some(CameraPosition::Front));
        assert!(controller.is_mirrored());
    }

    #[test]
    fn test_falls_back_to_other_position() {
        let backend = TestPatternBackend::new().with_camera(TestPatternCamera::front());
        let queue = ControlQueue::new();
        let controller = controller(&backend, &queue);
        assert_eq!(controller.current_position(), Some(CameraPosition::Front));
        assert!(controller.rear_camera().is_none());
    }

    #[test]
    fn test_state_machine() {
        let backend = TestPatternBackend::default();
        let queue = ControlQueue::new();
        let mut controller = controller(&backend, &queue);
        assert_eq!(controller.state(), SessionState::Stopped);

        controller.set_paused(true);
        assert_eq!(controller.state(), SessionState::Stopped);

        controller.start().unwrap();
        controller.start().unwrap();
        assert_eq!(controller.state(), SessionState::Running);

        controller.set_paused(true);
        assert!(controller.is_paused());
        assert!(controller.is_running());
        assert!(!backend.session().unwrap().is_preview_enabled());

        controller.stop();
        assert_eq!(controller.state(), SessionState::Stopped);
        assert!(backend.session().unwrap().is_preview_enabled());
        assert_eq!(controller.status().generation(), 1);
    }

    #[test]
    fn test_start_without_cameras() {
        let backend = TestPatternBackend::new();
        let queue = ControlQueue::new();
        let mut controller = controller(&backend, &queue);
        assert_eq!(controller.start(), Err(CameraError::NoCameraAvailable));
        assert!(!controller.is_running());
    }

    #[test]
    fn test_swap_toggles() {
        let backend = TestPatternBackend::default();
        let queue = ControlQueue::new();
        let mut controller = controller(&backend, &queue);
        assert_eq!(controller.current_position(), Some(CameraPosition::Rear));
        assert!(controller.swap());
        assert_eq!(controller.current_position(), Some(CameraPosition::Front));
        assert!(controller.swap());
        assert_eq!(controller.current_position(), Some(CameraPosition::Rear));
    }

    #[test]
    fn test_swap_with_single_camera_is_noop() {
        let backend = TestPatternBackend::new().with_camera(TestPatternCamera::rear());
        let queue = ControlQueue::new();
        let mut controller = controller(&backend, &queue);
        assert!(!controller.swap());
        assert!(!controller.use_front());
        assert_eq!(controller.current_position(), Some(CameraPosition::Rear));
    }

    #[test]
    fn test_transaction_guard_commits_on_drop() {
        let backend = TestPatternBackend::default();
        let session = backend.create_session().unwrap();
        {
            let _transaction = SessionTransaction::begin(session.as_ref()).unwrap();
        }
        let session = backend.session().unwrap();
        assert!(!session.is_in_transaction());
        assert_eq!(session.committed_transactions(), 1);
    }

    #[test]
    fn test_preview_target_uses_pixel_scale() {
        let backend = TestPatternBackend::default();
        let queue = ControlQueue::new();
        let config = Config {
            preview_pixel_scale: 2.0,
            ..Config::default()
        };
        let mut controller = SessionController::new(&backend, &config, queue.handle()).unwrap();
        controller.set_preview_bounds(Rect::new(0.0, 0.0, 160.0, 90.0));
        assert_eq!(controller.preview_target_size(), (320, 180));
    }

    #[test]
    fn test_points_of_interest_gated_by_flag_and_capability() {
        let backend = TestPatternBackend::default();
        let queue = ControlQueue::new();
        let mut controller = controller(&backend, &queue);
        controller.set_preview_bounds(Rect::new(0.0, 0.0, 640.0, 480.0));

        assert_eq!(controller.points_of_interest(), PointsOfInterest::default());

        controller.show_focus_indicator();
        let pois = controller.points_of_interest();
        assert_eq!(pois.focus, Some(Point::new(320.0, 240.0)));
        assert_eq!(pois.exposure, Some(Point::new(320.0, 240.0)));

        // Front camera has no focus point of interest
        assert!(controller.use_front());
        let pois = controller.points_of_interest();
        assert_eq!(pois.focus, None);
        assert!(pois.exposure.is_some());
    }
}
