// SPDX-License-Identifier: GPL-3.0-only

//! Per-camera capability flags and stored configuration
//!
//! A [`CameraDescriptor`] wraps one physical camera. It remembers the last
//! focus/exposure point and mode and the flash mode that were successfully
//! applied, so that state can be pushed back to the hardware when the camera
//! becomes active again.
//!
//! Focus and exposure follow identical rules and share [`PoiChannel`], which
//! is generic over the mode enum.

use super::types::{CameraPosition, DeviceSetting, ExposureMode, FocusMode, SensorRotation};
use super::{CameraBackend, CaptureDevice, find_camera};
use crate::constants::DEFAULT_POINT_OF_INTEREST;
use crate::errors::{CameraError, Capability, ConfigureError};
use crate::flash::FlashMode;
use crate::preview::{Point, Size};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mode enum of a point-of-interest channel
pub trait PoiMode: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Capability reported when the device lacks the channel
    const CAPABILITY: Capability;

    /// Whether `device` accepts a point of interest on this channel
    fn channel_supported(device: &dyn CaptureDevice) -> bool;

    /// Whether `device` accepts this particular mode
    fn supported_by(self, device: &dyn CaptureDevice) -> bool;

    fn point_setting(point: Point) -> DeviceSetting;

    fn mode_setting(self) -> DeviceSetting;
}

impl PoiMode for FocusMode {
    const CAPABILITY: Capability = Capability::FocusPointOfInterest;

    fn channel_supported(device: &dyn CaptureDevice) -> bool {
        device.focus_poi_supported()
    }

    fn supported_by(self, device: &dyn CaptureDevice) -> bool {
        device.supports_focus_mode(self)
    }

    fn point_setting(point: Point) -> DeviceSetting {
        DeviceSetting::FocusPointOfInterest(point)
    }

    fn mode_setting(self) -> DeviceSetting {
        DeviceSetting::Focus(self)
    }
}

impl PoiMode for ExposureMode {
    const CAPABILITY: Capability = Capability::ExposurePointOfInterest;

    fn channel_supported(device: &dyn CaptureDevice) -> bool {
        device.exposure_poi_supported()
    }

    fn supported_by(self, device: &dyn CaptureDevice) -> bool {
        device.supports_exposure_mode(self)
    }

    fn point_setting(point: Point) -> DeviceSetting {
        DeviceSetting::ExposurePointOfInterest(point)
    }

    fn mode_setting(self) -> DeviceSetting {
        DeviceSetting::Exposure(self)
    }
}

/// Stored state of one point-of-interest channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoiChannel<M: PoiMode> {
    supported: bool,
    point: Point,
    /// Last mode applied to hardware; `None` until the first successful set
    mode: Option<M>,
}

impl<M: PoiMode> PoiChannel<M> {
    fn for_device(device: &dyn CaptureDevice) -> Self {
        Self {
            supported: M::channel_supported(device),
            point: DEFAULT_POINT_OF_INTEREST,
            mode: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn mode(&self) -> Option<M> {
        self.mode
    }

    /// Validate a request and produce the settings it needs
    ///
    /// Capability is checked first, so an unsupported channel fails for any
    /// input point.
    fn stage(
        &self,
        device: &dyn CaptureDevice,
        point: Point,
        mode: M,
    ) -> Result<[DeviceSetting; 2], ConfigureError> {
        if !self.supported {
            return Err(ConfigureError::CapabilityUnsupported(M::CAPABILITY));
        }
        if !point.is_normalized() {
            return Err(ConfigureError::PointOutOfRange);
        }
        if !mode.supported_by(device) {
            return Err(ConfigureError::ModeUnsupported(format!("{:?}", mode)));
        }
        Ok([M::point_setting(point), mode.mode_setting()])
    }

    fn commit(&mut self, point: Point, mode: M) {
        self.point = point;
        self.mode = Some(mode);
    }

    /// Settings that restore the stored state, if any was ever applied
    fn restore_settings(&self) -> Option<[DeviceSetting; 2]> {
        self.mode
            .filter(|_| self.supported)
            .map(|mode| [M::point_setting(self.point), mode.mode_setting()])
    }
}

/// Per-channel result of a batched focus + exposure request
///
/// Each channel is applied if it can be; overall success requires both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusExposureOutcome {
    pub focus: Result<(), ConfigureError>,
    pub exposure: Result<(), ConfigureError>,
}

impl FocusExposureOutcome {
    /// Both channels were applied
    pub fn is_success(&self) -> bool {
        self.focus.is_ok() && self.exposure.is_ok()
    }

    /// Exactly one channel was applied
    pub fn is_partial(&self) -> bool {
        self.focus.is_ok() != self.exposure.is_ok()
    }

    pub(crate) fn failed(err: ConfigureError) -> Self {
        Self {
            focus: Err(err.clone()),
            exposure: Err(err),
        }
    }
}

/// One physical camera plus its stored configuration
pub struct CameraDescriptor {
    device: Arc<dyn CaptureDevice>,
    position: CameraPosition,
    has_flash: bool,
    flash_mode: FlashMode,
    focus: PoiChannel<FocusMode>,
    exposure: PoiChannel<ExposureMode>,
}

impl fmt::Debug for CameraDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraDescriptor")
            .field("id", &self.device.unique_id())
            .field("position", &self.position)
            .field("has_flash", &self.has_flash)
            .field("flash_mode", &self.flash_mode)
            .field("focus", &self.focus)
            .field("exposure", &self.exposure)
            .finish()
    }
}

impl CameraDescriptor {
    /// Wrap a physical camera
    ///
    /// Fails with [`CameraError::UnsupportedDevice`] if the camera cannot
    /// produce an input stream.
    pub fn new(device: Arc<dyn CaptureDevice>) -> Result<Self, CameraError> {
        if let Err(e) = device.open_input() {
            warn!(device = %device.name(), error = %e, "Camera cannot be opened as input");
            return Err(CameraError::UnsupportedDevice(format!(
                "{}: {}",
                device.name(),
                e
            )));
        }

        let descriptor = Self {
            position: device.position(),
            has_flash: device.has_flash(),
            flash_mode: FlashMode::Off,
            focus: PoiChannel::for_device(device.as_ref()),
            exposure: PoiChannel::for_device(device.as_ref()),
            device,
        };

        info!(
            device = %descriptor.device.name(),
            position = %descriptor.position,
            flash = descriptor.has_flash,
            focus_poi = descriptor.focus.is_supported(),
            exposure_poi = descriptor.exposure.is_supported(),
            "Camera descriptor created"
        );

        Ok(descriptor)
    }

    /// Descriptor for the first camera the backend reports at `position`
    pub fn with_position(
        backend: &dyn CameraBackend,
        position: CameraPosition,
    ) -> Result<Self, CameraError> {
        let device = find_camera(backend, position).ok_or(CameraError::NoCameraAvailable)?;
        Self::new(device)
    }

    pub fn device(&self) -> &Arc<dyn CaptureDevice> {
        &self.device
    }

    pub fn unique_id(&self) -> &str {
        self.device.unique_id()
    }

    pub fn name(&self) -> &str {
        self.device.name()
    }

    pub fn position(&self) -> CameraPosition {
        self.position
    }

    pub fn has_flash(&self) -> bool {
        self.has_flash
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    pub fn focus_poi_supported(&self) -> bool {
        self.focus.is_supported()
    }

    pub fn exposure_poi_supported(&self) -> bool {
        self.exposure.is_supported()
    }

    pub fn focus_point_of_interest(&self) -> Point {
        self.focus.point()
    }

    pub fn exposure_point_of_interest(&self) -> Point {
        self.exposure.point()
    }

    pub fn focus(&self) -> &PoiChannel<FocusMode> {
        &self.focus
    }

    pub fn exposure(&self) -> &PoiChannel<ExposureMode> {
        &self.exposure
    }

    pub fn rotation(&self) -> SensorRotation {
        self.device.rotation()
    }

    /// Frame size once the sensor image is rotated upright
    pub fn upright_size(&self) -> Size {
        let format = self.device.active_format();
        let (width, height) = self.rotation().upright_size(format.width, format.height);
        Size::from_pixels(width, height)
    }

    /// Set the focus point of interest (camera space) and focus mode
    pub fn set_focus_point(&mut self, point: Point, mode: FocusMode) -> Result<(), ConfigureError> {
        let settings = self.focus.stage(self.device.as_ref(), point, mode)?;
        self.apply(&settings)?;
        self.focus.commit(point, mode);
        Ok(())
    }

    /// Set the exposure point of interest (camera space) and exposure mode
    pub fn set_exposure_point(
        &mut self,
        point: Point,
        mode: ExposureMode,
    ) -> Result<(), ConfigureError> {
        let settings = self.exposure.stage(self.device.as_ref(), point, mode)?;
        self.apply(&settings)?;
        self.exposure.commit(point, mode);
        Ok(())
    }

    /// Apply focus and exposure at `point` in a single transaction
    ///
    /// Whichever channel passes validation is applied; the other reports its
    /// failure in the outcome. If the transaction itself fails, neither
    /// channel changes.
    pub fn set_focus_and_exposure_point(
        &mut self,
        point: Point,
        focus_mode: FocusMode,
        exposure_mode: ExposureMode,
    ) -> FocusExposureOutcome {
        let focus = self.focus.stage(self.device.as_ref(), point, focus_mode);
        let exposure = self.exposure.stage(self.device.as_ref(), point, exposure_mode);

        let settings: Vec<DeviceSetting> = [&focus, &exposure]
            .into_iter()
            .filter_map(|staged| staged.as_ref().ok())
            .flatten()
            .copied()
            .collect();

        if settings.is_empty() {
            debug!(device = %self.name(), "Neither focus nor exposure can be applied");
            return FocusExposureOutcome {
                focus: focus.map(|_| ()),
                exposure: exposure.map(|_| ()),
            };
        }

        if let Err(e) = self.apply(&settings) {
            return FocusExposureOutcome {
                focus: focus.and(Err(e.clone())),
                exposure: exposure.and(Err(e)),
            };
        }

        if focus.is_ok() {
            self.focus.commit(point, focus_mode);
        }
        if exposure.is_ok() {
            self.exposure.commit(point, exposure_mode);
        }

        FocusExposureOutcome {
            focus: focus.map(|_| ()),
            exposure: exposure.map(|_| ()),
        }
    }

    /// Set the flash mode, returning the mode that took effect
    ///
    /// A camera without a flash unit always ends up at [`FlashMode::Off`].
    pub fn set_flash_mode(&mut self, mode: FlashMode) -> Result<FlashMode, ConfigureError> {
        let effective = mode.effective(self.has_flash);
        if effective != mode {
            debug!(device = %self.name(), requested = %mode, "No flash unit, clamping to off");
        }

        if self.has_flash {
            self.apply(&[DeviceSetting::Flash(effective)])?;
        }
        self.flash_mode = effective;
        Ok(effective)
    }

    /// Push the stored configuration back to the hardware in one transaction
    pub fn reapply(&self) -> Result<(), ConfigureError> {
        let mut settings = Vec::with_capacity(5);
        if self.has_flash {
            settings.push(DeviceSetting::Flash(self.flash_mode));
        }
        settings.extend(self.focus.restore_settings().into_iter().flatten());
        settings.extend(self.exposure.restore_settings().into_iter().flatten());

        if settings.is_empty() {
            return Ok(());
        }
        self.apply(&settings)
    }

    fn apply(&self, settings: &[DeviceSetting]) -> Result<(), ConfigureError> {
        match self.device.configure(settings) {
            Ok(()) => {
                debug!(
                    device = %self.name(),
                    settings = settings.len(),
                    "Configuration transaction committed"
                );
                Ok(())
            }
            Err(e) => {
                warn!(device = %self.name(), error = %e, "Configuration transaction failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{TestPatternCamera, TestPatternDevice};

    fn descriptor(camera: TestPatternCamera) -> (Arc<TestPatternDevice>, CameraDescriptor) {
        let device = Arc::new(TestPatternDevice::new(camera));
        let descriptor = CameraDescriptor::new(device.clone()).unwrap();
        (device, descriptor)
    }

    #[test]
    fn test_unopenable_device_is_unsupported() {
        let device = Arc::new(TestPatternDevice::new(TestPatternCamera::rear().unopenable()));
        let err = CameraDescriptor::new(device).unwrap_err();
        assert!(matches!(err, CameraError::UnsupportedDevice(_)));
    }

    #[test]
    fn test_with_position_finds_backend_camera() {
        use crate::backends::camera::TestPatternBackend;

        let backend = TestPatternBackend::default();
        let front = CameraDescriptor::with_position(&backend, CameraPosition::Front).unwrap();
        assert_eq!(front.unique_id(), "test-pattern-front");
        assert_eq!(front.position(), CameraPosition::Front);

        let empty = TestPatternBackend::new().with_camera(TestPatternCamera::rear());
        let err = CameraDescriptor::with_position(&empty, CameraPosition::Front).unwrap_err();
        assert!(matches!(err, CameraError::NoCameraAvailable));
    }

    #[test]
    fn test_defaults_to_center() {
        let (_, descriptor) = descriptor(TestPatternCamera::rear());
        assert_eq!(descriptor.focus_point_of_interest(), Point::CENTER);
        assert_eq!(descriptor.exposure_point_of_interest(), Point::CENTER);
        assert_eq!(descriptor.focus().mode(), None);
    }

    #[test]
    fn test_focus_unsupported_fails_for_any_point() {
        let (device, mut descriptor) =
            descriptor(TestPatternCamera::rear().with_focus_poi(false));
        for point in [Point::new(0.2, 0.3), Point::new(-1.0, 4.0), Point::CENTER] {
            assert_eq!(
                descriptor.set_focus_point(point, FocusMode::ContinuousAutoFocus),
                Err(ConfigureError::CapabilityUnsupported(
                    Capability::FocusPointOfInterest
                ))
            );
            assert_eq!(descriptor.focus_point_of_interest(), Point::CENTER);
        }
        assert_eq!(device.transaction_count(), 0);
    }

    #[test]
    fn test_out_of_range_point_rejected() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::rear());
        assert_eq!(
            descriptor.set_exposure_point(Point::new(1.5, 0.5), ExposureMode::AutoExposeOnce),
            Err(ConfigureError::PointOutOfRange)
        );
        assert_eq!(device.transaction_count(), 0);
    }

    #[test]
    fn test_unsupported_mode_rejected() {
        let (_, mut descriptor) = descriptor(
            TestPatternCamera::rear().with_focus_modes(&[FocusMode::ContinuousAutoFocus]),
        );
        assert!(matches!(
            descriptor.set_focus_point(Point::CENTER, FocusMode::Locked),
            Err(ConfigureError::ModeUnsupported(_))
        ));
    }

    #[test]
    fn test_set_focus_point_applies_single_transaction() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::rear());
        let point = Point::new(0.25, 0.75);
        descriptor
            .set_focus_point(point, FocusMode::AutoFocusOnce)
            .unwrap();

        assert_eq!(descriptor.focus_point_of_interest(), point);
        assert_eq!(descriptor.focus().mode(), Some(FocusMode::AutoFocusOnce));
        assert_eq!(device.transaction_count(), 1);
        let state = device.hardware_state();
        assert_eq!(state.focus_point, Some(point));
        assert_eq!(state.focus_mode, Some(FocusMode::AutoFocusOnce));
        assert_eq!(state.exposure_point, None);
    }

    #[test]
    fn test_lock_failure_leaves_state_unchanged() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::rear());
        device.set_lock_busy(true);

        let result = descriptor.set_focus_point(Point::new(0.1, 0.1), FocusMode::Locked);
        assert!(matches!(result, Err(ConfigureError::LockUnavailable(_))));
        assert_eq!(descriptor.focus_point_of_interest(), Point::CENTER);
        assert_eq!(device.hardware_state().focus_point, None);
    }

    #[test]
    fn test_batched_focus_and_exposure_is_one_transaction() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::rear());
        let point = Point::new(0.4, 0.6);
        let outcome = descriptor.set_focus_and_exposure_point(
            point,
            FocusMode::AutoFocusOnce,
            ExposureMode::AutoExposeOnce,
        );

        assert!(outcome.is_success());
        assert_eq!(device.transaction_count(), 1);
        assert_eq!(device.transactions()[0].len(), 4);
        assert_eq!(descriptor.focus_point_of_interest(), point);
        assert_eq!(descriptor.exposure_point_of_interest(), point);
    }

    #[test]
    fn test_batched_applies_supported_channel_only() {
        let (device, mut descriptor) =
            descriptor(TestPatternCamera::rear().with_exposure_poi(false));
        let point = Point::new(0.4, 0.6);
        let outcome = descriptor.set_focus_and_exposure_point(
            point,
            FocusMode::ContinuousAutoFocus,
            ExposureMode::ContinuousAutoExposure,
        );

        assert!(!outcome.is_success());
        assert!(outcome.is_partial());
        assert_eq!(outcome.focus, Ok(()));
        assert_eq!(
            outcome.exposure,
            Err(ConfigureError::CapabilityUnsupported(
                Capability::ExposurePointOfInterest
            ))
        );
        assert_eq!(descriptor.focus_point_of_interest(), point);
        assert_eq!(descriptor.exposure_point_of_interest(), Point::CENTER);
        assert_eq!(device.transaction_count(), 1);
    }

    #[test]
    fn test_batched_without_any_capability_touches_nothing() {
        let (device, mut descriptor) = descriptor(
            TestPatternCamera::rear()
                .with_focus_poi(false)
                .with_exposure_poi(false),
        );
        let outcome = descriptor.set_focus_and_exposure_point(
            Point::CENTER,
            FocusMode::AutoFocusOnce,
            ExposureMode::AutoExposeOnce,
        );
        assert!(outcome.focus.is_err() && outcome.exposure.is_err());
        assert_eq!(device.transaction_count(), 0);
    }

    #[test]
    fn test_flash_clamps_without_unit() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::front().with_flash(false));
        assert_eq!(descriptor.set_flash_mode(FlashMode::On), Ok(FlashMode::Off));
        assert_eq!(descriptor.flash_mode(), FlashMode::Off);
        assert_eq!(device.transaction_count(), 0);
    }

    #[test]
    fn test_flash_lock_failure_keeps_previous_mode() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::rear().with_flash(true));
        assert_eq!(descriptor.set_flash_mode(FlashMode::Auto), Ok(FlashMode::Auto));

        device.set_lock_busy(true);
        assert!(descriptor.set_flash_mode(FlashMode::On).is_err());
        assert_eq!(descriptor.flash_mode(), FlashMode::Auto);
        assert_eq!(device.hardware_state().flash, FlashMode::Auto);
    }

    #[test]
    fn test_reapply_restores_stored_state() {
        let (device, mut descriptor) = descriptor(TestPatternCamera::rear().with_flash(true));
        let point = Point::new(0.3, 0.3);
        descriptor.set_flash_mode(FlashMode::On).unwrap();
        descriptor
            .set_focus_point(point, FocusMode::AutoFocusOnce)
            .unwrap();

        device.reset_hardware_state();
        descriptor.reapply().unwrap();

        let state = device.hardware_state();
        assert_eq!(state.flash, FlashMode::On);
        assert_eq!(state.focus_point, Some(point));
        assert_eq!(state.exposure_point, None);
        // flash, focus point, reapply
        assert_eq!(device.transaction_count(), 3);
    }
}
