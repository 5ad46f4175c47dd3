//! Hardware cameras through nokhwa.
//!
//! `nokhwa::Camera` isn't `Send`, so each stream lives on its own capture
//! thread that keeps the latest frame in a shared buffer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::{query, Camera};

use super::service::{CameraDevice, LiveFeed};
use super::types::{CameraError, FacingMode, Frame, Resolution, StreamRequest};

const OPEN_TIMEOUT: Duration = Duration::from_secs(10);
const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(3);
const REQUESTED_FPS: u32 = 30;

/// A camera attached to this machine.
#[derive(Debug, Clone, Default)]
pub struct NativeCamera {
    /// Fixed device index; when unset the device is picked by facing mode.
    device: Option<u32>,
}

impl NativeCamera {
    pub fn new(device: Option<u32>) -> Self {
        Self { device }
    }
}

/// Pick a device for `facing` from the human-readable device names.
///
/// Desktop backends don't report which way a camera points, so this goes by
/// name and falls back to the first device.
pub fn pick_device(names: &[String], facing: FacingMode) -> Option<usize> {
    let hints: &[&str] = match facing {
        FacingMode::User => &["front", "facetime", "user", "integrated"],
        FacingMode::Environment => &["back", "rear", "environment", "world"],
    };
    names
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            hints.iter().any(|hint| name.contains(hint))
        })
        .or(if names.is_empty() { None } else { Some(0) })
}

impl CameraDevice for NativeCamera {
    fn open(&mut self, request: StreamRequest) -> Result<Box<dyn LiveFeed>, CameraError> {
        let index = match self.device {
            Some(index) => index,
            None => {
                let devices = query(ApiBackend::Auto).map_err(|e| map_open_error(&e.to_string()))?;
                let names: Vec<String> = devices.iter().map(|d| d.human_name()).collect();
                let position = pick_device(&names, request.facing).ok_or(CameraError::NoDevices)?;
                log::debug!("Using camera '{}' for {:?}", names[position], request.facing);
                devices[position].index().as_index().unwrap_or(0)
            }
        };

        let buffer = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();

        let handle = {
            let buffer = Arc::clone(&buffer);
            let stop = Arc::clone(&stop);
            thread::spawn(move || capture_loop(index, request.ideal, buffer, stop, ready_tx))
        };

        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(actual)) => {
                log::info!(
                    "Camera {} streaming at {}x{}",
                    index,
                    actual.width,
                    actual.height
                );
                Ok(Box::new(NativeFeed {
                    buffer,
                    stop,
                    handle: Some(handle),
                }))
            }
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                stop.store(true, Ordering::SeqCst);
                Err(CameraError::OpenFailed(format!(
                    "camera {} did not start within {:?}",
                    index, OPEN_TIMEOUT
                )))
            }
        }
    }
}

fn capture_loop(
    index: u32,
    ideal: Resolution,
    buffer: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    ready: mpsc::Sender<Result<Resolution, CameraError>>,
) {
    let mut camera = match open_with_fallback(index, ideal) {
        Ok(camera) => camera,
        Err(err) => {
            let _ = ready.send(Err(err));
            return;
        }
    };
    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(map_open_error(&e.to_string())));
        return;
    }
    let res = camera.resolution();
    let _ = ready.send(Ok(Resolution {
        width: res.width(),
        height: res.height(),
    }));

    while !stop.load(Ordering::Relaxed) {
        // Undecodable frames are skipped; the next one usually works
        if let Ok(raw) = camera.frame() {
            if let Some(frame) = frame_from_buffer(&raw) {
                if let Ok(mut slot) = buffer.lock() {
                    *slot = Some(frame);
                }
            }
        }
        thread::sleep(Duration::from_millis(1));
    }

    let _ = camera.stop_stream();
    log::debug!("Camera {} capture thread stopped", index);
}

/// Try MJPEG and NV12 close to `ideal`, then whatever the camera prefers.
fn open_with_fallback(index: u32, ideal: Resolution) -> Result<Camera, CameraError> {
    let closest = |format| {
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(ideal.width, ideal.height),
            format,
            REQUESTED_FPS,
        )))
    };
    let attempts = [
        closest(NokhwaFrameFormat::MJPEG),
        closest(NokhwaFrameFormat::NV12),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = String::from("no format accepted");
    for requested in attempts {
        match Camera::new(CameraIndex::Index(index), requested) {
            Ok(camera) => return Ok(camera),
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(map_open_error(&last_error))
}

/// nokhwa reports failures as strings; sort out the ones the booth shows
/// differently.
pub(crate) fn map_open_error(message: &str) -> CameraError {
    let lower = message.to_lowercase();
    if ["permission", "denied", "authorization", "not authorized"]
        .iter()
        .any(|word| lower.contains(word))
    {
        CameraError::PermissionDenied
    } else if lower.contains("no device") || lower.contains("not found") {
        CameraError::NoDevices
    } else {
        CameraError::OpenFailed(message.to_string())
    }
}

fn frame_from_buffer(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let (width, height) = (decoded.width(), decoded.height());
    Frame::rgb(decoded.into_raw(), width, height).ok()
}

struct NativeFeed {
    buffer: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LiveFeed for NativeFeed {
    /// Latest frame, waiting briefly for the first one after opening.
    fn grab(&mut self) -> Result<Frame, CameraError> {
        if self.handle.is_none() {
            return Err(CameraError::Released);
        }
        let deadline = Instant::now() + FIRST_FRAME_TIMEOUT;
        loop {
            let latest = self
                .buffer
                .lock()
                .map_err(|_| CameraError::NoFrame)?
                .clone();
            if let Some(frame) = latest {
                return Ok(frame);
            }
            if Instant::now() >= deadline {
                return Err(CameraError::NoFrame);
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        if let Ok(mut slot) = self.buffer.lock() {
            *slot = None;
        }
    }
}

impl Drop for NativeFeed {
    fn drop(&mut self) {
        self.stop();
    }
}
