// SPDX-License-Identifier: GPL-3.0-only

//! View-space to camera-space point conversion
//!
//! Camera space is normalized to [0,1]² with the origin at the top-left of
//! the *unrotated* sensor image. The preview shows that image rotated
//! upright, mirrored for front cameras, and placed into the view according
//! to the fill mode. Converting a touch point undoes those steps in reverse.

use super::{FillMode, Point, Rect, Size, calculate_content_bounds};
use crate::backends::camera::SensorRotation;

/// Converts points between a preview surface and the sensor it shows
///
/// Pure value type: holds the preview geometry only, never session or
/// hardware state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    view_bounds: Rect,
    /// Upright frame size as displayed
    content_size: Size,
    fill_mode: FillMode,
    mirrored: bool,
    rotation: SensorRotation,
}

impl CoordinateMapper {
    /// Mapper whose content has the same proportions as the view
    pub fn new(view_bounds: Rect, fill_mode: FillMode) -> Self {
        Self {
            view_bounds,
            content_size: view_bounds.size(),
            fill_mode,
            mirrored: false,
            rotation: SensorRotation::None,
        }
    }

    /// Set the upright size of the frames shown in the view
    #[must_use]
    pub fn with_content_size(mut self, content_size: Size) -> Self {
        self.content_size = content_size;
        self
    }

    /// Flip the horizontal axis (front cameras)
    #[must_use]
    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Rotation needed to make the sensor image upright
    #[must_use]
    pub fn with_rotation(mut self, rotation: SensorRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn view_bounds(&self) -> Rect {
        self.view_bounds
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Where the content actually lands in view space
    pub fn content_bounds(&self) -> Rect {
        calculate_content_bounds(self.view_bounds, self.content_size, self.fill_mode)
    }

    /// Convert a view-space point to normalized camera space
    ///
    /// Points outside the live area are clamped, never rejected. A degenerate
    /// view or content size maps everything to the sensor centre.
    pub fn to_camera_space(&self, view_point: Point) -> Point {
        if self.view_bounds.size().is_degenerate() || self.content_size.is_degenerate() {
            return Point::CENTER;
        }

        let content = self.content_bounds();
        let mut upright = Point::new(
            (view_point.x - content.x) / content.width,
            (view_point.y - content.y) / content.height,
        )
        .clamp_normalized();

        if self.mirrored {
            upright.x = 1.0 - upright.x;
        }

        unrotate(self.rotation, upright)
    }

    /// Convert a normalized camera-space point back to view space
    ///
    /// Used to report where a point of interest sits on the preview. The
    /// result may fall outside the view for `AspectFill` when the point is
    /// in the cropped region.
    pub fn to_view_space(&self, camera_point: Point) -> Point {
        if self.view_bounds.size().is_degenerate() || self.content_size.is_degenerate() {
            return Point::new(
                self.view_bounds.x + self.view_bounds.width / 2.0,
                self.view_bounds.y + self.view_bounds.height / 2.0,
            );
        }

        let mut upright = rotate(self.rotation, camera_point.clamp_normalized());
        if self.mirrored {
            upright.x = 1.0 - upright.x;
        }

        let content = self.content_bounds();
        Point::new(
            content.x + upright.x * content.width,
            content.y + upright.y * content.height,
        )
    }
}

/// Free function form of [`CoordinateMapper::to_camera_space`]
pub fn to_camera_space(
    view_point: Point,
    view_bounds: Rect,
    content_size: Size,
    fill_mode: FillMode,
    mirrored: bool,
) -> Point {
    CoordinateMapper::new(view_bounds, fill_mode)
        .with_content_size(content_size)
        .mirrored(mirrored)
        .to_camera_space(view_point)
}

/// Upright (displayed) normalized point -> unrotated sensor point
fn unrotate(rotation: SensorRotation, p: Point) -> Point {
    match rotation {
        SensorRotation::None => p,
        SensorRotation::Rotate90 => Point::new(p.y, 1.0 - p.x),
        SensorRotation::Rotate180 => Point::new(1.0 - p.x, 1.0 - p.y),
        SensorRotation::Rotate270 => Point::new(1.0 - p.y, p.x),
    }
}

/// Unrotated sensor point -> upright (displayed) normalized point
fn rotate(rotation: SensorRotation, p: Point) -> Point {
    match rotation {
        SensorRotation::None => p,
        SensorRotation::Rotate90 => Point::new(1.0 - p.y, p.x),
        SensorRotation::Rotate180 => Point::new(1.0 - p.x, 1.0 - p.y),
        SensorRotation::Rotate270 => Point::new(p.y, 1.0 - p.x),
    }
}
