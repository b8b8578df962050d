// SPDX-License-Identifier: GPL-3.0-only

//! Preview surface geometry
//!
//! Types shared between the presentation layer and the core: points, sizes
//! and rectangles in view space, plus the content-fill policy used to place
//! camera frames on the preview surface.

pub mod mapper;

pub use mapper::{CoordinateMapper, to_camera_space};

use serde::{Deserialize, Serialize};

/// A 2D point. View-space points are in surface units, camera-space points
/// are normalized to [0,1]².
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Centre of normalized camera space
    pub const CENTER: Point = Point { x: 0.5, y: 0.5 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie within [0,1]
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Clamp both coordinates to [0,1]; NaN collapses to 0.5
    pub fn clamp_normalized(self) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) };
        Self::new(clamp(self.x), clamp(self.y))
    }
}

/// Width and height in view units or pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of a pixel buffer
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// True if either side is zero, negative or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Round to whole pixels, never below 1x1
    pub fn to_pixels(&self) -> (u32, u32) {
        let round = |v: f32| if v.is_finite() { v.round().max(1.0) as u32 } else { 1 };
        (round(self.width), round(self.height))
    }
}

/// Axis-aligned rectangle in view space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}

/// How camera content is placed into a differently-proportioned area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillMode {
    /// Scale uniformly to cover the area, cropping the overflow
    #[default]
    AspectFill,
    /// Scale uniformly to fit inside the area, no cropping
    AspectFit,
    /// Scale each axis independently to exactly match the area
    Stretch,
}

impl FillMode {
    pub const ALL: [FillMode; 3] = [FillMode::AspectFill, FillMode::AspectFit, FillMode::Stretch];

    /// Parse the kebab-case name used in configuration and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "aspect-fill" | "fill" => Some(FillMode::AspectFill),
            "aspect-fit" | "fit" => Some(FillMode::AspectFit),
            "stretch" | "scale-to-fill" => Some(FillMode::Stretch),
            _ => None,
        }
    }
}

impl std::fmt::Display for FillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillMode::AspectFill => write!(f, "aspect-fill"),
            FillMode::AspectFit => write!(f, "aspect-fit"),
            FillMode::Stretch => write!(f, "stretch"),
        }
    }
}

/// Calculate where content of `content` size lands inside `container`
///
/// For `AspectFill` the returned rectangle extends past the container on one
/// axis (the cropped overflow); for `AspectFit` it is letterboxed inside it.
/// Both are centred.
pub fn calculate_content_bounds(container: Rect, content: Size, fill_mode: FillMode) -> Rect {
    if content.is_degenerate() || container.size().is_degenerate() {
        return container;
    }

    let scale_x = container.width / content.width;
    let scale_y = container.height / content.height;

    let scale = match fill_mode {
        FillMode::Stretch => return container,
        FillMode::AspectFit => scale_x.min(scale_y),
        FillMode::AspectFill => scale_x.max(scale_y),
    };

    let width = content.width * scale;
    let height = content.height * scale;

    Rect::new(
        container.x + (container.width - width) / 2.0,
        container.y + (container.height - height) / 2.0,
        width,
        height,
    )
}
