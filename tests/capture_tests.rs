// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for still capture and preview delivery

use camera_control::backends::camera::{
    CameraPosition, PixelFormat, SensorRotation, TestPatternBackend, TestPatternCamera,
};
use camera_control::errors::PhotoError;
use camera_control::{CapturedPhoto, Config, ControlQueue, Rect, SessionController};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

type Results = Arc<Mutex<Vec<(usize, ThreadId, Option<CapturedPhoto>)>>>;

fn capture(controller: &SessionController, results: &Results, id: usize) {
    let results = Arc::clone(results);
    controller
        .take_photo(move |photo| {
            results
                .lock()
                .unwrap()
                .push((id, thread::current().id(), photo));
        })
        .unwrap();
}

async fn deliver(queue: &mut ControlQueue) {
    let ran = tokio::time::timeout(WAIT, queue.run_next())
        .await
        .expect("capture completion was never delivered");
    assert!(ran);
}

#[tokio::test]
async fn test_capture_while_stopped_fails_synchronously() {
    let backend = TestPatternBackend::default();
    let mut queue = ControlQueue::new();
    let controller = SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    let results = Results::default();

    let sink = Arc::clone(&results);
    let result = controller.take_photo(move |photo| {
        sink.lock()
            .unwrap()
            .push((0, thread::current().id(), photo));
    });

    assert_eq!(result.unwrap_err(), PhotoError::SessionNotRunning);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queue.run_pending(), 0);
    assert!(results.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_completion_runs_once_on_control_thread() {
    let backend = TestPatternBackend::default();
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.set_preview_bounds(Rect::new(0.0, 0.0, 320.0, 240.0));
    controller.start().unwrap();
    let results = Results::default();

    capture(&controller, &results, 0);
    deliver(&mut queue).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queue.run_pending(), 0);

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    let (_, thread_id, photo) = &results[0];
    assert_eq!(*thread_id, thread::current().id());

    let photo = photo.as_ref().expect("capture should produce images");
    assert_eq!(photo.photo.dimensions(), (640, 480));
    assert_eq!(photo.preview.dimensions(), (320, 240));
}

#[tokio::test]
async fn test_completions_arrive_in_request_order() {
    let backend = TestPatternBackend::default().with_capture_delay(Duration::from_millis(20));
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.start().unwrap();
    let results = Results::default();

    for id in 0..3 {
        capture(&controller, &results, id);
    }
    for _ in 0..3 {
        deliver(&mut queue).await;
    }

    let order: Vec<usize> = results.lock().unwrap().iter().map(|r| r.0).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_stop_during_capture_yields_no_images() {
    let backend = TestPatternBackend::default().with_capture_delay(Duration::from_millis(200));
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.start().unwrap();
    let results = Results::default();

    capture(&controller, &results, 0);
    controller.stop();
    deliver(&mut queue).await;

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].2.is_none());
}

#[tokio::test]
async fn test_failed_capture_yields_no_images() {
    let backend = TestPatternBackend::default();
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.start().unwrap();
    backend.session().unwrap().set_fail_captures(true);
    let results = Results::default();

    capture(&controller, &results, 0);
    deliver(&mut queue).await;

    assert!(results.lock().unwrap()[0].2.is_none());
}

#[tokio::test]
async fn test_front_photo_is_mirrored() {
    let backend = TestPatternBackend::default();
    let mut queue = ControlQueue::new();
    let config = Config {
        preferred_position: CameraPosition::Front,
        ..Config::default()
    };
    let mut controller = SessionController::new(&backend, &config, queue.handle()).unwrap();
    controller.start().unwrap();
    let results = Results::default();

    capture(&controller, &results, 0);
    assert!(controller.use_rear());
    capture(&controller, &results, 1);
    deliver(&mut queue).await;
    deliver(&mut queue).await;

    let results = results.lock().unwrap();
    let front = results[0].2.as_ref().unwrap();
    let rear = results[1].2.as_ref().unwrap();

    // Colour bars run white to black, left to right
    assert_eq!(rear.photo.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(front.photo.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(front.photo.get_pixel(639, 0).0, [255, 255, 255, 255]);
}

#[tokio::test]
async fn test_rotated_sensor_photo_is_upright() {
    let backend = TestPatternBackend::new()
        .with_camera(TestPatternCamera::rear().with_rotation(SensorRotation::Rotate90));
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.start().unwrap();
    let results = Results::default();

    capture(&controller, &results, 0);
    deliver(&mut queue).await;

    let results = results.lock().unwrap();
    let photo = results[0].2.as_ref().unwrap();
    assert_eq!(photo.photo.dimensions(), (480, 640));
    // Default preview bounds follow the upright sensor size
    assert_eq!(photo.preview.dimensions(), (480, 640));
}

#[tokio::test]
async fn test_padded_rows_decode_to_clean_photo() {
    let backend = TestPatternBackend::new().with_camera(
        TestPatternCamera::rear()
            .with_format(160, 120, PixelFormat::BGRA)
            .with_row_padding(12),
    );
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.start().unwrap();
    let results = Results::default();

    capture(&controller, &results, 0);
    deliver(&mut queue).await;

    let results = results.lock().unwrap();
    let photo = results[0].2.as_ref().unwrap();
    assert_eq!(photo.photo.dimensions(), (160, 120));
    // Bars are 20 pixels wide: white, yellow, ..., black
    for y in [0, 60, 119] {
        assert_eq!(photo.photo.get_pixel(0, y).0, [255, 255, 255, 255]);
        assert_eq!(photo.photo.get_pixel(25, y).0, [255, 255, 0, 255]);
        assert_eq!(photo.photo.get_pixel(159, y).0, [0, 0, 0, 255]);
    }
}

#[tokio::test]
async fn test_capture_while_paused_still_works() {
    let backend = TestPatternBackend::default();
    let mut queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    controller.start().unwrap();
    controller.set_paused(true);
    let results = Results::default();

    capture(&controller, &results, 0);
    deliver(&mut queue).await;

    assert!(results.lock().unwrap()[0].2.is_some());
}

#[tokio::test]
async fn test_preview_frames_flow_while_running() {
    let backend = TestPatternBackend::default().with_frame_interval(Duration::from_millis(5));
    let queue = ControlQueue::new();
    let mut controller =
        SessionController::new(&backend, &Config::default(), queue.handle()).unwrap();
    let mut frames = controller.preview_frames();
    controller.start().unwrap();

    let frame = tokio::time::timeout(WAIT, frames.next())
        .await
        .expect("no preview frame")
        .expect("preview stream closed");
    assert_eq!((frame.width, frame.height), (640, 480));

    controller.stop();
    assert!(!controller.status().is_running());
}
