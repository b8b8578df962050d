// SPDX-License-Identifier: GPL-3.0-only

//! Raw buffer decoding, orientation and preview scaling
//!
//! Turns a sensor buffer into an upright RGBA image and derives the preview
//! image shown on the presentation surface.

use crate::backends::camera::types::{CameraFrame, PixelFormat, SensorRotation};
use crate::errors::PhotoError;
use crate::preview::FillMode;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::debug;

/// Pure image transforms used by the capture pipeline
pub struct ImageTransform;

impl ImageTransform {
    /// Decode a raw buffer to RGBA, honouring its row stride
    pub fn decode(frame: &CameraFrame) -> Result<RgbaImage, PhotoError> {
        let (width, height) = (frame.width, frame.height);
        if width == 0 || height == 0 {
            return Err(PhotoError::InvalidBuffer(format!(
                "zero-sized buffer {}x{}",
                width, height
            )));
        }

        let row_bytes = frame.format.min_stride(width);
        let stride = frame.stride as usize;
        if stride < row_bytes {
            return Err(PhotoError::InvalidBuffer(format!(
                "stride {} shorter than row of {} bytes",
                stride, row_bytes
            )));
        }

        let required = stride * (height as usize - 1) + row_bytes;
        if frame.data.len() < required {
            return Err(PhotoError::InvalidBuffer(format!(
                "buffer too small: expected {}, got {}",
                required,
                frame.data.len()
            )));
        }

        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as usize {
            let row = &frame.data[y * stride..y * stride + row_bytes];
            decode_row(row, frame.format, width as usize, &mut rgba);
        }

        RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| PhotoError::InvalidBuffer("decoded size mismatch".to_string()))
    }

    /// Rotate `image` upright and mirror it if requested
    ///
    /// Mirroring happens after rotation, so the flip is about the upright
    /// vertical axis.
    pub fn orient(image: RgbaImage, rotation: SensorRotation, mirrored: bool) -> RgbaImage {
        let mut image = match rotation {
            SensorRotation::None => image,
            SensorRotation::Rotate90 => imageops::rotate90(&image),
            SensorRotation::Rotate180 => imageops::rotate180(&image),
            SensorRotation::Rotate270 => imageops::rotate270(&image),
        };
        if mirrored {
            imageops::flip_horizontal_in_place(&mut image);
        }
        image
    }

    /// Decode and orient a raw buffer into the full-resolution photo
    pub fn normalize_orientation(
        frame: &CameraFrame,
        rotation: SensorRotation,
        mirrored: bool,
    ) -> Result<RgbaImage, PhotoError> {
        let decoded = Self::decode(frame)?;
        let image = Self::orient(decoded, rotation, mirrored);
        debug!(
            width = image.width(),
            height = image.height(),
            rotation = %rotation,
            mirrored,
            "Normalized orientation"
        );
        Ok(image)
    }

    /// Scale `image` into `target` pixels according to `fill_mode`
    ///
    /// * `AspectFill` covers the target and crops the centred overflow
    /// * `AspectFit` fits inside the target, output may be smaller on one axis
    /// * `Stretch` resizes to exactly the target
    ///
    /// Zero target dimensions are raised to 1.
    pub fn scale(image: &RgbaImage, target: (u32, u32), fill_mode: FillMode) -> RgbaImage {
        let (target_w, target_h) = (target.0.max(1), target.1.max(1));
        let (src_w, src_h) = image.dimensions();
        if src_w == 0 || src_h == 0 {
            return RgbaImage::new(target_w, target_h);
        }

        let scale_x = target_w as f64 / src_w as f64;
        let scale_y = target_h as f64 / src_h as f64;

        match fill_mode {
            FillMode::Stretch => resize(image, target_w, target_h),
            FillMode::AspectFit => {
                let scale = scale_x.min(scale_y);
                let w = scaled(src_w, scale).min(target_w);
                let h = scaled(src_h, scale).min(target_h);
                resize(image, w, h)
            }
            FillMode::AspectFill => {
                let scale = scale_x.max(scale_y);
                let w = scaled(src_w, scale).max(target_w);
                let h = scaled(src_h, scale).max(target_h);
                let covered = resize(image, w, h);
                let x = (w - target_w) / 2;
                let y = (h - target_h) / 2;
                imageops::crop_imm(&covered, x, y, target_w, target_h).to_image()
            }
        }
    }
}

fn scaled(length: u32, scale: f64) -> u32 {
    ((length as f64 * scale).round() as u32).max(1)
}

fn resize(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

fn decode_row(row: &[u8], format: PixelFormat, width: usize, out: &mut Vec<u8>) {
    match format {
        PixelFormat::RGBA => out.extend_from_slice(row),
        PixelFormat::BGRA => {
            for px in row.chunks_exact(4) {
                out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }
        PixelFormat::RGB24 => {
            for px in row.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        PixelFormat::Gray8 => {
            for &v in row {
                out.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelFormat::YUYV => {
            let mut remaining = width;
            // Y0 U Y1 V - each 4-byte group encodes 2 pixels
            for chunk in row.chunks_exact(4) {
                let (u, v) = (chunk[1], chunk[3]);
                for y in [chunk[0], chunk[2]] {
                    if remaining == 0 {
                        break;
                    }
                    let (r, g, b) = yuv_to_rgb(y, u, v);
                    out.extend_from_slice(&[r, g, b, 255]);
                    remaining -= 1;
                }
            }
        }
    }
}

/// ITU-R BT.601 conversion
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::sync::Arc;
    use std::time::Instant;

    fn frame(width: u32, height: u32, format: PixelFormat, stride: u32, data: Vec<u8>) -> CameraFrame {
        CameraFrame {
            width,
            height,
            data: Arc::from(data),
            format,
            stride,
            rotation: SensorRotation::None,
            sequence: 0,
            captured_at: Instant::now(),
        }
    }

    /// 2x1 image: red on the left, blue on the right
    fn red_blue() -> RgbaImage {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        image
    }

    #[test]
    fn test_scale_modes_for_wide_image() {
        let image = RgbaImage::new(100, 50);
        assert_eq!(
            ImageTransform::scale(&image, (200, 200), FillMode::AspectFit).dimensions(),
            (200, 100)
        );
        assert_eq!(
            ImageTransform::scale(&image, (200, 200), FillMode::AspectFill).dimensions(),
            (200, 200)
        );
        assert_eq!(
            ImageTransform::scale(&image, (200, 200), FillMode::Stretch).dimensions(),
            (200, 200)
        );
    }

    #[test]
    fn test_same_aspect_is_pure_scale() {
        let image = RgbaImage::new(40, 30);
        for mode in FillMode::ALL {
            assert_eq!(
                ImageTransform::scale(&image, (80, 60), mode).dimensions(),
                (80, 60)
            );
        }
    }

    #[test]
    fn test_fill_crops_centre() {
        // Left third red, middle green, right third blue; fill into a square keeps green
        let mut image = RgbaImage::new(30, 10);
        for (x, _, px) in image.enumerate_pixels_mut() {
            *px = match x {
                0..=9 => Rgba([255, 0, 0, 255]),
                10..=19 => Rgba([0, 255, 0, 255]),
                _ => Rgba([0, 0, 255, 255]),
            };
        }
        let out = ImageTransform::scale(&image, (10, 10), FillMode::AspectFill);
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(*out.get_pixel(0, 5), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(9, 5), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_zero_target_is_raised() {
        let image = RgbaImage::new(10, 10);
        assert_eq!(
            ImageTransform::scale(&image, (0, 0), FillMode::Stretch).dimensions(),
            (1, 1)
        );
    }

    #[test]
    fn test_mirror_flips_horizontally() {
        let out = ImageTransform::orient(red_blue(), SensorRotation::None, true);
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rotate90_clockwise() {
        // Clockwise: the left pixel ends up on top
        let out = ImageTransform::orient(red_blue(), SensorRotation::Rotate90, false);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(0, 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_rotate270_then_mirror() {
        let out = ImageTransform::orient(red_blue(), SensorRotation::Rotate270, true);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_decode_bgra_with_stride() {
        // Two rows of one pixel, 4 bytes of padding per row
        let data = vec![10, 20, 30, 255, 0, 0, 0, 0, 40, 50, 60, 255];
        let image = ImageTransform::decode(&frame(1, 2, PixelFormat::BGRA, 8, data)).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([30, 20, 10, 255]));
        assert_eq!(*image.get_pixel(0, 1), Rgba([60, 50, 40, 255]));
    }

    #[test]
    fn test_decode_rgb24() {
        let data = vec![255, 0, 0, 0, 255, 0];
        let image = ImageTransform::decode(&frame(2, 1, PixelFormat::RGB24, 6, data)).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_decode_gray8_with_stride() {
        // Two rows of two pixels, 2 bytes of padding per row
        let data = vec![0, 64, 9, 9, 128, 255];
        let image = ImageTransform::decode(&frame(2, 2, PixelFormat::Gray8, 4, data)).unwrap();
        assert_eq!(*image.get_pixel(1, 0), Rgba([64, 64, 64, 255]));
        assert_eq!(*image.get_pixel(0, 1), Rgba([128, 128, 128, 255]));
        assert_eq!(*image.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_decode_yuyv_grey() {
        let data = vec![128, 128, 128, 128];
        let image = ImageTransform::decode(&frame(2, 1, PixelFormat::YUYV, 4, data)).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let err = ImageTransform::decode(&frame(4, 4, PixelFormat::RGBA, 16, vec![0; 20]))
            .unwrap_err();
        assert!(matches!(err, PhotoError::InvalidBuffer(_)));
    }

    #[test]
    fn test_decode_rejects_zero_size() {
        let err = ImageTransform::decode(&frame(0, 4, PixelFormat::Gray8, 0, Vec::new()))
            .unwrap_err();
        assert!(matches!(err, PhotoError::InvalidBuffer(_)));
    }
}
