// SPDX-License-Identifier: GPL-3.0-only

//! Software camera backend producing colour-bar frames
//!
//! Used by the demo binary and by tests. Devices are described with
//! [`TestPatternCamera`] and record every configuration transaction they
//! receive, so callers can check exactly what reached the "hardware".

use super::types::*;
use super::{CameraBackend, CaptureDevice, CaptureSession};
use crate::constants::test_pattern as defaults;
use crate::flash::FlashMode;
use crate::preview::Point;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

const ALL_FOCUS_MODES: [FocusMode; 3] = [
    FocusMode::AutoFocusOnce,
    FocusMode::ContinuousAutoFocus,
    FocusMode::Locked,
];

const ALL_EXPOSURE_MODES: [ExposureMode; 3] = [
    ExposureMode::AutoExposeOnce,
    ExposureMode::ContinuousAutoExposure,
    ExposureMode::Locked,
];

/// Description of a simulated camera
#[derive(Debug, Clone)]
pub struct TestPatternCamera {
    id: String,
    name: String,
    position: CameraPosition,
    format: CameraFormat,
    row_padding: u32,
    rotation: SensorRotation,
    has_flash: bool,
    focus_poi: bool,
    exposure_poi: bool,
    focus_modes: Vec<FocusMode>,
    exposure_modes: Vec<ExposureMode>,
    openable: bool,
}

impl TestPatternCamera {
    fn at(position: CameraPosition) -> Self {
        Self {
            id: format!("test-pattern-{}", position),
            name: format!("Test Pattern ({})", position),
            position,
            format: CameraFormat {
                width: defaults::WIDTH,
                height: defaults::HEIGHT,
                pixel_format: PixelFormat::RGBA,
            },
            row_padding: 0,
            rotation: SensorRotation::None,
            has_flash: false,
            focus_poi: true,
            exposure_poi: true,
            focus_modes: ALL_FOCUS_MODES.to_vec(),
            exposure_modes: ALL_EXPOSURE_MODES.to_vec(),
            openable: true,
        }
    }

    /// User-facing camera: exposure point only, no flash
    pub fn front() -> Self {
        Self::at(CameraPosition::Front).with_focus_poi(false)
    }

    /// World-facing camera: focus and exposure points, flash
    pub fn rear() -> Self {
        Self::at(CameraPosition::Rear).with_flash(true)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        self.format = CameraFormat {
            width,
            height,
            pixel_format,
        };
        self
    }

    /// Extra bytes at the end of each row of delivered buffers
    #[must_use]
    pub fn with_row_padding(mut self, bytes: u32) -> Self {
        self.row_padding = bytes;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: SensorRotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_flash(mut self, has_flash: bool) -> Self {
        self.has_flash = has_flash;
        self
    }

    #[must_use]
    pub fn with_focus_poi(mut self, supported: bool) -> Self {
        self.focus_poi = supported;
        self
    }

    #[must_use]
    pub fn with_exposure_poi(mut self, supported: bool) -> Self {
        self.exposure_poi = supported;
        self
    }

    #[must_use]
    pub fn with_focus_modes(mut self, modes: &[FocusMode]) -> Self {
        self.focus_modes = modes.to_vec();
        self
    }

    #[must_use]
    pub fn with_exposure_modes(mut self, modes: &[ExposureMode]) -> Self {
        self.exposure_modes = modes.to_vec();
        self
    }

    /// Camera that refuses to produce an input stream
    #[must_use]
    pub fn unopenable(mut self) -> Self {
        self.openable = false;
        self
    }
}

/// Settings currently in effect on a simulated device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardwareState {
    pub focus_point: Option<Point>,
    pub focus_mode: Option<FocusMode>,
    pub exposure_point: Option<Point>,
    pub exposure_mode: Option<ExposureMode>,
    pub flash: FlashMode,
}

#[derive(Default)]
struct DeviceHardware {
    state: HardwareState,
    transactions: Vec<Vec<DeviceSetting>>,
}

/// Simulated physical camera
pub struct TestPatternDevice {
    camera: TestPatternCamera,
    hardware: Mutex<DeviceHardware>,
    lock_busy: AtomicBool,
}

impl TestPatternDevice {
    pub fn new(camera: TestPatternCamera) -> Self {
        Self {
            camera,
            hardware: Mutex::new(DeviceHardware::default()),
            lock_busy: AtomicBool::new(false),
        }
    }

    /// Make every following configuration attempt fail to take the lock
    pub fn set_lock_busy(&self, busy: bool) {
        self.lock_busy.store(busy, Ordering::SeqCst);
    }

    /// Number of committed configuration transactions
    pub fn transaction_count(&self) -> usize {
        lock(&self.hardware).transactions.len()
    }

    /// Every committed transaction, oldest first
    pub fn transactions(&self) -> Vec<Vec<DeviceSetting>> {
        lock(&self.hardware).transactions.clone()
    }

    pub fn hardware_state(&self) -> HardwareState {
        lock(&self.hardware).state
    }

    /// Forget applied settings, as if the device had been power cycled
    pub fn reset_hardware_state(&self) {
        lock(&self.hardware).state = HardwareState::default();
    }

    fn validate(&self, setting: &DeviceSetting) -> BackendResult<()> {
        let camera = &self.camera;
        let ok = match setting {
            DeviceSetting::FocusPointOfInterest(point) => camera.focus_poi && point.is_normalized(),
            DeviceSetting::Focus(mode) => camera.focus_modes.contains(mode),
            DeviceSetting::ExposurePointOfInterest(point) => {
                camera.exposure_poi && point.is_normalized()
            }
            DeviceSetting::Exposure(mode) => camera.exposure_modes.contains(mode),
            DeviceSetting::Flash(_) => camera.has_flash,
        };
        if ok {
            Ok(())
        } else {
            Err(BackendError::Other(format!(
                "{} does not accept {:?}",
                camera.name, setting
            )))
        }
    }

    fn frame(&self, sequence: u64) -> CameraFrame {
        generate_frame(
            self.camera.format,
            self.camera.row_padding,
            self.camera.rotation,
            sequence,
        )
    }
}

impl CaptureDevice for TestPatternDevice {
    fn unique_id(&self) -> &str {
        &self.camera.id
    }

    fn name(&self) -> &str {
        &self.camera.name
    }

    fn position(&self) -> CameraPosition {
        self.camera.position
    }

    fn active_format(&self) -> CameraFormat {
        self.camera.format
    }

    fn rotation(&self) -> SensorRotation {
        self.camera.rotation
    }

    fn has_flash(&self) -> bool {
        self.camera.has_flash
    }

    fn focus_poi_supported(&self) -> bool {
        self.camera.focus_poi
    }

    fn exposure_poi_supported(&self) -> bool {
        self.camera.exposure_poi
    }

    fn supports_focus_mode(&self, mode: FocusMode) -> bool {
        self.camera.focus_modes.contains(&mode)
    }

    fn supports_exposure_mode(&self, mode: ExposureMode) -> bool {
        self.camera.exposure_modes.contains(&mode)
    }

    fn open_input(&self) -> BackendResult<()> {
        if self.camera.openable {
            Ok(())
        } else {
            Err(BackendError::DeviceNotFound(self.camera.id.clone()))
        }
    }

    fn configure(&self, settings: &[DeviceSetting]) -> BackendResult<()> {
        if self.lock_busy.load(Ordering::SeqCst) {
            return Err(BackendError::ConfigurationLocked(self.camera.name.clone()));
        }

        // Validate the whole batch before touching anything
        settings.iter().try_for_each(|s| self.validate(s))?;

        let mut hardware = lock(&self.hardware);
        for setting in settings {
            let state = &mut hardware.state;
            match *setting {
                DeviceSetting::FocusPointOfInterest(p) => state.focus_point = Some(p),
                DeviceSetting::Focus(m) => state.focus_mode = Some(m),
                DeviceSetting::ExposurePointOfInterest(p) => state.exposure_point = Some(p),
                DeviceSetting::Exposure(m) => state.exposure_mode = Some(m),
                DeviceSetting::Flash(m) => state.flash = m,
            }
        }
        hardware.transactions.push(settings.to_vec());
        trace!(device = %self.camera.name, settings = ?settings, "Applied settings");
        Ok(())
    }
}

struct SessionInner {
    input: Option<Arc<dyn CaptureDevice>>,
    /// Same device, concrete type, for frame generation
    source: Option<Arc<TestPatternDevice>>,
    in_transaction: bool,
    commits: usize,
}

struct SessionShared {
    inner: Mutex<SessionInner>,
    running: AtomicBool,
    preview_enabled: AtomicBool,
    sink: Mutex<Option<FrameSender>>,
    sequence: AtomicU64,
    fail_captures: AtomicBool,
    fail_next_commit: AtomicBool,
    rejected_inputs: Mutex<Vec<String>>,
}

impl SessionShared {
    fn next_frame(&self) -> Option<CameraFrame> {
        let source = lock(&self.inner).source.clone()?;
        Some(source.frame(self.sequence.fetch_add(1, Ordering::Relaxed)))
    }
}

/// Simulated hardware session
pub struct TestPatternSession {
    shared: Arc<SessionShared>,
    devices: Vec<Arc<TestPatternDevice>>,
    capture_delay: Duration,
    frame_interval: Duration,
    preview_thread: Mutex<Option<JoinHandle<()>>>,
}

impl TestPatternSession {
    fn new(
        devices: Vec<Arc<TestPatternDevice>>,
        capture_delay: Duration,
        frame_interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(SessionShared {
                inner: Mutex::new(SessionInner {
                    input: None,
                    source: None,
                    in_transaction: false,
                    commits: 0,
                }),
                running: AtomicBool::new(false),
                preview_enabled: AtomicBool::new(true),
                sink: Mutex::new(None),
                sequence: AtomicU64::new(0),
                fail_captures: AtomicBool::new(false),
                fail_next_commit: AtomicBool::new(false),
                rejected_inputs: Mutex::new(Vec::new()),
            }),
            devices,
            capture_delay,
            frame_interval,
            preview_thread: Mutex::new(None),
        }
    }

    /// Refuse to install the device with this id as an input
    pub fn reject_input(&self, unique_id: &str) {
        lock(&self.shared.rejected_inputs).push(unique_id.to_string());
    }

    /// Make still captures fail with a capture error
    pub fn set_fail_captures(&self, fail: bool) {
        self.shared.fail_captures.store(fail, Ordering::SeqCst);
    }

    /// Make the next commit close the transaction but report failure
    pub fn fail_next_commit(&self) {
        self.shared.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of committed session transactions
    pub fn committed_transactions(&self) -> usize {
        lock(&self.shared.inner).commits
    }

    pub fn is_in_transaction(&self) -> bool {
        lock(&self.shared.inner).in_transaction
    }

    pub fn is_preview_enabled(&self) -> bool {
        self.shared.preview_enabled.load(Ordering::SeqCst)
    }

    fn spawn_preview_thread(&self) -> BackendResult<JoinHandle<()>> {
        let shared = Arc::clone(&self.shared);
        let interval = self.frame_interval;

        std::thread::Builder::new()
            .name("test-pattern-preview".to_string())
            .spawn(move || {
                debug!("Preview thread started");
                while shared.running.load(Ordering::SeqCst) {
                    std::thread::sleep(interval);
                    if !shared.preview_enabled.load(Ordering::SeqCst) {
                        continue;
                    }
                    let mut sink = lock(&shared.sink);
                    let Some(sender) = sink.as_mut() else {
                        continue;
                    };
                    let Some(frame) = shared.next_frame() else {
                        continue;
                    };
                    if let Err(e) = sender.try_send(frame) {
                        if e.is_disconnected() {
                            debug!("Preview receiver dropped, clearing sink");
                            *sink = None;
                        } else {
                            trace!("Preview consumer lagging, frame dropped");
                        }
                    }
                }
                debug!("Preview thread stopped");
            })
            .map_err(|e| BackendError::Other(format!("Failed to spawn preview thread: {}", e)))
    }
}

impl CaptureSession for TestPatternSession {
    fn begin_configuration(&self) -> BackendResult<()> {
        let mut inner = lock(&self.shared.inner);
        if inner.in_transaction {
            return Err(BackendError::TransactionInProgress);
        }
        inner.in_transaction = true;
        Ok(())
    }

    fn commit_configuration(&self) -> BackendResult<()> {
        let mut inner = lock(&self.shared.inner);
        if !inner.in_transaction {
            return Err(BackendError::NoTransaction);
        }
        inner.in_transaction = false;
        if self.shared.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(BackendError::Other("commit failed".to_string()));
        }
        inner.commits += 1;
        Ok(())
    }

    fn add_input(&self, device: Arc<dyn CaptureDevice>) -> BackendResult<()> {
        let mut inner = lock(&self.shared.inner);
        if !inner.in_transaction {
            return Err(BackendError::NoTransaction);
        }
        if inner.input.is_some() {
            return Err(BackendError::InputRejected(
                "session already has an input".to_string(),
            ));
        }
        let id = device.unique_id().to_string();
        if lock(&self.shared.rejected_inputs).contains(&id) {
            return Err(BackendError::InputRejected(id));
        }

        inner.source = self.devices.iter().find(|d| d.unique_id() == id).cloned();
        inner.input = Some(device);
        Ok(())
    }

    fn remove_input(&self) -> BackendResult<Option<Arc<dyn CaptureDevice>>> {
        let mut inner = lock(&self.shared.inner);
        if !inner.in_transaction {
            return Err(BackendError::NoTransaction);
        }
        inner.source = None;
        Ok(inner.input.take())
    }

    fn current_input(&self) -> Option<Arc<dyn CaptureDevice>> {
        lock(&self.shared.inner).input.clone()
    }

    fn start_running(&self) -> BackendResult<()> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.spawn_preview_thread() {
            Ok(handle) => {
                *lock(&self.preview_thread) = Some(handle);
                info!("Test pattern session running");
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn stop_running(&self) {
        if !self.shared.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let handle = lock(&self.preview_thread).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Preview thread panicked");
            }
        }
        info!("Test pattern session stopped");
    }

    fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    fn set_frame_sink(&self, sink: Option<FrameSender>) {
        *lock(&self.shared.sink) = sink;
    }

    fn set_preview_enabled(&self, enabled: bool) {
        self.shared.preview_enabled.store(enabled, Ordering::SeqCst);
    }

    fn capture_still(&self) -> StillReceiver {
        let (tx, rx) = tokio::sync::oneshot::channel();

        let result = if !self.is_running() {
            Err(BackendError::SessionStopped)
        } else if self.shared.fail_captures.load(Ordering::SeqCst) {
            Err(BackendError::CaptureFailed("simulated sensor failure".to_string()))
        } else {
            self.shared
                .next_frame()
                .ok_or_else(|| BackendError::CaptureFailed("session has no input".to_string()))
        };

        if self.capture_delay.is_zero() {
            let _ = tx.send(result);
        } else {
            let delay = self.capture_delay;
            let spawned = std::thread::Builder::new()
                .name("test-pattern-still".to_string())
                .spawn(move || {
                    std::thread::sleep(delay);
                    let _ = tx.send(result);
                });
            if let Err(e) = spawned {
                // Dropping the sender resolves the receiver with an error
                warn!(error = %e, "Failed to spawn still capture thread");
            }
        }

        rx
    }
}

impl Drop for TestPatternSession {
    fn drop(&mut self) {
        self.stop_running();
    }
}

/// Software backend serving a fixed set of simulated cameras
pub struct TestPatternBackend {
    devices: Vec<Arc<TestPatternDevice>>,
    capture_delay: Duration,
    frame_interval: Duration,
    available: bool,
    session: Mutex<Option<Arc<TestPatternSession>>>,
}

impl Default for TestPatternBackend {
    /// One front and one rear camera
    fn default() -> Self {
        Self::new()
            .with_camera(TestPatternCamera::front())
            .with_camera(TestPatternCamera::rear())
    }
}

impl TestPatternBackend {
    /// Backend with no cameras
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            capture_delay: Duration::ZERO,
            frame_interval: defaults::FRAME_INTERVAL,
            available: true,
            session: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_camera(mut self, camera: TestPatternCamera) -> Self {
        self.devices.push(Arc::new(TestPatternDevice::new(camera)));
        self
    }

    /// Delay between a still request and its buffer arriving
    #[must_use]
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Report the backend as unavailable, as when camera access is denied
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn devices(&self) -> &[Arc<TestPatternDevice>] {
        &self.devices
    }

    /// First device at `position`
    pub fn device(&self, position: CameraPosition) -> Option<Arc<TestPatternDevice>> {
        self.devices
            .iter()
            .find(|d| d.position() == position)
            .cloned()
    }

    /// Most recently created session
    pub fn session(&self) -> Option<Arc<TestPatternSession>> {
        lock(&self.session).clone()
    }
}

impl CameraBackend for TestPatternBackend {
    fn enumerate_cameras(&self) -> Vec<Arc<dyn CaptureDevice>> {
        self.devices
            .iter()
            .map(|d| Arc::clone(d) as Arc<dyn CaptureDevice>)
            .collect()
    }

    fn create_session(&self) -> BackendResult<Arc<dyn CaptureSession>> {
        if !self.available {
            return Err(BackendError::NotAvailable(
                "test pattern backend disabled".to_string(),
            ));
        }
        let session = Arc::new(TestPatternSession::new(
            self.devices.clone(),
            self.capture_delay,
            self.frame_interval,
        ));
        *lock(&self.session) = Some(Arc::clone(&session));
        debug!(cameras = self.devices.len(), "Created test pattern session");
        Ok(session)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::TestPattern
    }
}

/// 100% colour bars: white, yellow, cyan, green, magenta, red, blue, black
const BARS_RGB: [[u8; 3]; 8] = [
    [255, 255, 255],
    [255, 255, 0],
    [0, 255, 255],
    [0, 255, 0],
    [255, 0, 255],
    [255, 0, 0],
    [0, 0, 255],
    [0, 0, 0],
];

/// Studio-range YUV for the same bars
const BARS_YUV: [[u8; 3]; 8] = [
    [235, 128, 128],
    [210, 16, 146],
    [170, 166, 16],
    [145, 54, 34],
    [106, 202, 222],
    [81, 90, 240],
    [41, 240, 110],
    [16, 128, 128],
];

fn bar_index(x: u32, width: u32) -> usize {
    let bar_width = (width / 8).max(1);
    (x / bar_width).min(7) as usize
}

/// Generate one colour-bar frame in `format`
pub fn generate_frame(
    format: CameraFormat,
    row_padding: u32,
    rotation: SensorRotation,
    sequence: u64,
) -> CameraFrame {
    let CameraFormat {
        width,
        height,
        pixel_format,
    } = format;
    let row_bytes = pixel_format.min_stride(width);
    let stride = row_bytes + row_padding as usize;
    let mut data = vec![0u8; stride * height as usize];

    for row in data.chunks_exact_mut(stride) {
        let pixels = &mut row[..row_bytes];
        match pixel_format {
            PixelFormat::RGBA | PixelFormat::BGRA => {
                for (x, px) in pixels.chunks_exact_mut(4).enumerate() {
                    let [r, g, b] = BARS_RGB[bar_index(x as u32, width)];
                    let rgb = if pixel_format == PixelFormat::BGRA {
                        [b, g, r]
                    } else {
                        [r, g, b]
                    };
                    px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
                }
            }
            PixelFormat::RGB24 => {
                for (x, px) in pixels.chunks_exact_mut(3).enumerate() {
                    px.copy_from_slice(&BARS_RGB[bar_index(x as u32, width)]);
                }
            }
            PixelFormat::Gray8 => {
                for (x, px) in pixels.iter_mut().enumerate() {
                    *px = BARS_YUV[bar_index(x as u32, width)][0];
                }
            }
            PixelFormat::YUYV => {
                for (pair, px) in pixels.chunks_exact_mut(4).enumerate() {
                    let [y, u, v] = BARS_YUV[bar_index(pair as u32 * 2, width)];
                    px.copy_from_slice(&[y, u, y, v]);
                }
            }
        }
    }

    CameraFrame {
        width,
        height,
        data: Arc::from(data),
        format: pixel_format,
        stride: stride as u32,
        rotation,
        sequence,
        captured_at: Instant::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_bars_rgba() {
        let format = CameraFormat {
            width: 16,
            height: 2,
            pixel_format: PixelFormat::RGBA,
        };
        let frame = generate_frame(format, 0, SensorRotation::None, 0);
        assert_eq!(frame.stride, 64);
        assert_eq!(frame.data.len(), 128);
        // First bar white, last bar black
        assert_eq!(&frame.data[0..4], &[255, 255, 255, 255]);
        assert_eq!(&frame.data[60..64], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_yuyv_frame_honours_padding() {
        let format = CameraFormat {
            width: 16,
            height: 4,
            pixel_format: PixelFormat::YUYV,
        };
        let frame = generate_frame(format, 8, SensorRotation::Rotate90, 3);
        assert_eq!(frame.stride, 40);
        assert_eq!(frame.data.len(), 160);
        assert_eq!(frame.rotation, SensorRotation::Rotate90);
        assert_eq!(frame.sequence, 3);
        assert_eq!(&frame.data[0..4], &[235, 128, 235, 128]);
    }

    #[test]
    fn test_configure_is_all_or_nothing() {
        let device = TestPatternDevice::new(TestPatternCamera::front());
        // Front camera has no focus point support
        let result = device.configure(&[
            DeviceSetting::ExposurePointOfInterest(Point::new(0.2, 0.2)),
            DeviceSetting::FocusPointOfInterest(Point::new(0.2, 0.2)),
        ]);
        assert!(result.is_err());
        assert_eq!(device.hardware_state(), HardwareState::default());
        assert_eq!(device.transaction_count(), 0);
    }

    #[test]
    fn test_busy_lock() {
        let device = TestPatternDevice::new(TestPatternCamera::rear());
        device.set_lock_busy(true);
        assert!(matches!(
            device.configure(&[DeviceSetting::Flash(FlashMode::On)]),
            Err(BackendError::ConfigurationLocked(_))
        ));
        device.set_lock_busy(false);
        device.configure(&[DeviceSetting::Flash(FlashMode::On)]).unwrap();
        assert_eq!(device.hardware_state().flash, FlashMode::On);
    }

    #[test]
    fn test_input_changes_require_transaction() {
        let backend = TestPatternBackend::default();
        let session = backend.create_session().unwrap();
        let device = backend.enumerate_cameras().remove(0);

        assert_eq!(
            session.add_input(device.clone()),
            Err(BackendError::NoTransaction)
        );
        session.begin_configuration().unwrap();
        assert_eq!(
            session.begin_configuration(),
            Err(BackendError::TransactionInProgress)
        );
        session.add_input(device).unwrap();
        session.commit_configuration().unwrap();
        assert!(session.current_input().is_some());
    }

    #[test]
    fn test_rejected_input() {
        let backend = TestPatternBackend::default();
        backend.create_session().unwrap();
        let session = backend.session().unwrap();
        let front = backend.device(CameraPosition::Front).unwrap();
        session.reject_input(front.unique_id());

        session.begin_configuration().unwrap();
        assert!(matches!(
            session.add_input(front),
            Err(BackendError::InputRejected(_))
        ));
        session.commit_configuration().unwrap();
        assert_eq!(session.committed_transactions(), 1);
    }

    #[test]
    fn test_still_capture_requires_running() {
        let backend = TestPatternBackend::default();
        let session = backend.create_session().unwrap();
        let mut rx = session.capture_still();
        assert_eq!(rx.try_recv().unwrap().unwrap_err(), BackendError::SessionStopped);
    }

    #[test]
    fn test_still_capture_delivers_frame() {
        let backend = TestPatternBackend::default();
        let session = backend.create_session().unwrap();
        let rear = backend.device(CameraPosition::Rear).unwrap();
        session.begin_configuration().unwrap();
        session.add_input(rear).unwrap();
        session.commit_configuration().unwrap();
        session.start_running().unwrap();

        let frame = session.capture_still().blocking_recv().unwrap().unwrap();
        assert_eq!((frame.width, frame.height), (defaults::WIDTH, defaults::HEIGHT));

        session.stop_running();
        assert!(!session.is_running());
    }
}
