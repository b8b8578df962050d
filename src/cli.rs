// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera-control
//!
//! Every command runs against the built-in test-pattern backend, so the full
//! session lifecycle can be exercised on machines without camera hardware.

use camera_control::backends::camera::{
    CameraBackend, CameraPosition, SensorRotation, SessionController, TestPatternBackend,
};
use camera_control::config::Config;
use camera_control::control_queue::ControlQueue;
use camera_control::pipelines::photo::{EncodingFormat, EncodingQuality, PhotoEncoder};
use camera_control::preview::{CoordinateMapper, FillMode, Point, Rect, Size};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default folder name inside the Pictures directory
const DEFAULT_SAVE_FOLDER: &str = "camera-control";

/// Upper bound on how long a capture may take before giving up
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for the `photo` command
pub struct PhotoOptions {
    pub camera: Option<CameraPosition>,
    pub output: Option<PathBuf>,
    pub fill: Option<FillMode>,
    pub preview: (f32, f32),
    pub focus: Option<(f32, f32)>,
}

/// Parse "front" or "rear"
pub fn parse_position(value: &str) -> Result<CameraPosition, String> {
    CameraPosition::from_name(value)
        .ok_or_else(|| format!("Unknown camera '{}', expected front or rear", value))
}

/// Parse "aspect-fill", "aspect-fit" or "stretch"
pub fn parse_fill_mode(value: &str) -> Result<FillMode, String> {
    FillMode::from_name(value).ok_or_else(|| {
        format!(
            "Unknown fill mode '{}', expected aspect-fill, aspect-fit or stretch",
            value
        )
    })
}

/// Parse a "WxH" size with positive dimensions
pub fn parse_size(value: &str) -> Result<(f32, f32), String> {
    let (w, h) = split_pair(value, 'x')?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("Size '{}' must be positive", value));
    }
    Ok((w, h))
}

/// Parse an "X,Y" point
pub fn parse_point(value: &str) -> Result<(f32, f32), String> {
    split_pair(value, ',')
}

fn split_pair(value: &str, separator: char) -> Result<(f32, f32), String> {
    let (a, b) = value
        .split_once(separator)
        .ok_or_else(|| format!("Expected A{}B, got '{}'", separator, value))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("Invalid number '{}' in '{}'", part, value))
    };
    Ok((parse(a)?, parse(b)?))
}

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let backend = TestPatternBackend::default();

    if !SessionController::device_has_camera(&backend) {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras ({} backend):", backend.backend_type());
    println!();

    for (index, device) in backend.enumerate_cameras().iter().enumerate() {
        println!("  [{}] {}", index, device.name());
        println!("      ID:       {}", device.unique_id());
        println!("      Position: {}", device.position());
        println!("      Format:   {}", device.active_format());
        println!("      Rotation: {}", device.rotation());
        println!("      Flash:    {}", yes_no(device.has_flash()));
        println!(
            "      Focus point of interest:    {}",
            yes_no(device.focus_poi_supported())
        );
        println!(
            "      Exposure point of interest: {}",
            yes_no(device.exposure_poi_supported())
        );
    }

    Ok(())
}

/// Take a photo and save it with its preview image
pub fn take_photo(
    mut config: Config,
    options: PhotoOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(position) = options.camera {
        config.preferred_position = position;
    }
    if let Some(fill) = options.fill {
        config.preview_fill_mode = fill;
    }

    let rt = tokio::runtime::Runtime::new()?;
    let mut queue = ControlQueue::new();
    let backend = TestPatternBackend::default();
    let mut controller = SessionController::new(&backend, &config, queue.handle())?;

    if let Some(position) = options.camera
        && controller.current_position() != Some(position)
    {
        return Err(format!("No {} camera available", position).into());
    }

    let (width, height) = options.preview;
    controller.set_preview_bounds(Rect::new(0.0, 0.0, width, height));
    controller.start()?;

    let camera_name = controller
        .current_camera()
        .map(|camera| camera.name().to_string())
        .unwrap_or_default();
    println!("Using camera: {}", camera_name);

    if let Some((x, y)) = options.focus {
        let outcome = controller.set_focus_and_exposure_point(Point::new(x, y), true, true);
        println!("Focus:    {}", describe(&outcome.focus));
        println!("Exposure: {}", describe(&outcome.exposure));
    }

    println!("Capturing...");
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    controller.take_photo(move |photo| {
        let _ = tx.send(photo);
    })?;

    let delivered =
        rt.block_on(async { tokio::time::timeout(CAPTURE_TIMEOUT, queue.run_next()).await });
    controller.stop();

    if !matches!(delivered, Ok(true)) {
        return Err("Timed out waiting for the photo".into());
    }
    let photo = rx
        .try_recv()
        .ok()
        .flatten()
        .ok_or("Capture produced no image")?;

    let (output_dir, stem, format) = resolve_output(options.output.as_deref());
    let encoder = PhotoEncoder::new(format, EncodingQuality::High);
    let saved = rt.block_on(encoder.save(photo, output_dir, stem))?;

    println!("Photo saved to:   {}", saved.photo.display());
    println!("Preview saved to: {}", saved.preview.display());

    Ok(())
}

/// Convert a preview point to normalized camera coordinates
pub fn map_point(
    view: (f32, f32),
    frame: (f32, f32),
    point: (f32, f32),
    fill: FillMode,
    mirrored: bool,
    rotation: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let rotation = SensorRotation::from_degrees_int(rotation);
    let (frame_width, frame_height) = Size::new(frame.0, frame.1).to_pixels();
    let (upright_width, upright_height) = rotation.upright_size(frame_width, frame_height);

    let mapper = CoordinateMapper::new(Rect::new(0.0, 0.0, view.0, view.1), fill)
        .with_content_size(Size::from_pixels(upright_width, upright_height))
        .with_rotation(rotation)
        .mirrored(mirrored);

    let view_point = Point::new(point.0, point.1);
    let camera_point = mapper.to_camera_space(view_point);
    let content = mapper.content_bounds();

    println!(
        "Content bounds: x={:.2} y={:.2} w={:.2} h={:.2}",
        content.x, content.y, content.width, content.height
    );
    println!("View point:     ({:.2}, {:.2})", view_point.x, view_point.y);
    println!(
        "Camera point:   ({:.4}, {:.4})",
        camera_point.x, camera_point.y
    );
    if !content.contains(view_point) {
        println!("Note: point lies outside the visible content and was clamped");
    }

    Ok(())
}

/// Stream preview frames and report the frame rate
pub fn run_preview(
    mut config: Config,
    camera: Option<CameraPosition>,
    frames: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(position) = camera {
        config.preferred_position = position;
    }

    let rt = tokio::runtime::Runtime::new()?;
    let queue = ControlQueue::new();
    let backend = TestPatternBackend::default();
    let mut controller = SessionController::new(&backend, &config, queue.handle())?;
    let mut receiver = controller.preview_frames();
    controller.start()?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop_flag);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    println!("Streaming preview (press Ctrl+C to stop)...");
    let started = Instant::now();
    let mut received = 0u64;

    while received < frames && !stop_flag.load(Ordering::SeqCst) {
        let next = rt.block_on(async {
            tokio::time::timeout(Duration::from_millis(500), receiver.next()).await
        });
        let frame = match next {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            // Re-check the stop flag
            Err(_) => continue,
        };

        received += 1;
        if received == 1 || received % 30 == 0 {
            println!(
                "  frame {:>5}  {}x{} {:?}  stride {}",
                frame.sequence, frame.width, frame.height, frame.format, frame.stride
            );
        }
    }

    controller.stop();

    let elapsed = started.elapsed().as_secs_f64();
    let fps = if elapsed > 0.0 {
        received as f64 / elapsed
    } else {
        0.0
    };
    println!("Received {} frames in {:.1}s ({:.1} fps)", received, elapsed, fps);

    Ok(())
}

/// Split `--output` into directory, file stem and encoding format
fn resolve_output(output: Option<&Path>) -> (PathBuf, String, EncodingFormat) {
    match output {
        Some(path) if path.is_dir() => (
            path.to_path_buf(),
            PhotoEncoder::timestamp_stem(),
            EncodingFormat::default(),
        ),
        Some(path) => {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(PhotoEncoder::timestamp_stem);
            let format = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(EncodingFormat::from_extension)
                .unwrap_or_default();
            (dir, stem, format)
        }
        None => (
            get_default_photo_dir(),
            PhotoEncoder::timestamp_stem(),
            EncodingFormat::default(),
        ),
    }
}

/// Get the default photo save directory
fn get_default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(DEFAULT_SAVE_FOLDER)
}

fn describe<E: std::fmt::Display>(result: &Result<(), E>) -> String {
    match result {
        Ok(()) => "applied".to_string(),
        Err(e) => format!("not applied ({})", e),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
