//! Camera stream lifecycle: acquire, freeze a single still, release.

use std::fmt;

use super::frame_utils::{encode_png, mirror_horizontal};
use super::types::{CameraError, FacingMode, Frame, Resolution, StreamRequest};
use crate::media::EncodedImage;

/// A running video feed from an opened camera.
pub trait LiveFeed: Send {
    /// Grab the most recent frame.
    fn grab(&mut self) -> Result<Frame, CameraError>;

    /// Stop the feed and give the device back.
    fn stop(&mut self);
}

/// A camera that can be opened into a [`LiveFeed`].
pub trait CameraDevice: Send {
    fn open(&mut self, request: StreamRequest) -> Result<Box<dyn LiveFeed>, CameraError>;
}

/// An acquired camera stream.
///
/// The stream is released by [`CameraStream::release`], by a successful
/// [`CaptureService::freeze`], or when dropped, whichever comes first.
pub struct CameraStream {
    feed: Option<Box<dyn LiveFeed>>,
    facing: FacingMode,
}

impl CameraStream {
    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// Whether the underlying device is still held.
    pub fn is_active(&self) -> bool {
        self.feed.is_some()
    }

    /// Stop the feed. Safe to call any number of times.
    pub fn release(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.stop();
            log::debug!("Camera stream released ({:?})", self.facing);
        }
    }
}

impl fmt::Debug for CameraStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraStream")
            .field("facing", &self.facing)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Acquires camera streams and turns them into still images.
pub struct CaptureService {
    device: Box<dyn CameraDevice>,
    ideal: Resolution,
}

impl CaptureService {
    pub fn new(device: Box<dyn CameraDevice>, ideal: Resolution) -> Self {
        Self { device, ideal }
    }

    /// Open a stream from the camera facing `facing`.
    ///
    /// # Errors
    /// Any [`CameraError`] from the device: permission denied, no camera,
    /// or the device failing to open.
    pub fn acquire(&mut self, facing: FacingMode) -> Result<CameraStream, CameraError> {
        let request = StreamRequest {
            facing,
            ideal: self.ideal,
        };
        let feed = self.device.open(request)?;
        log::info!(
            "Camera stream acquired ({:?}, ideal {}x{})",
            facing,
            self.ideal.width,
            self.ideal.height
        );
        Ok(CameraStream {
            feed: Some(feed),
            facing,
        })
    }

    /// Capture one still from `stream` and release the stream.
    ///
    /// The frame is mirrored when the camera faces the user. On failure the
    /// stream stays open so the capture can be retried.
    pub fn freeze(&self, stream: &mut CameraStream) -> Result<EncodedImage, CameraError> {
        let feed = stream.feed.as_mut().ok_or(CameraError::Released)?;
        let mut frame = feed.grab()?;
        if stream.facing.mirrors() {
            mirror_horizontal(&mut frame);
        }
        let (width, height) = (frame.width, frame.height);
        let image = encode_png(frame)?;
        stream.release();
        log::info!(
            "Captured {}x{} still ({} bytes)",
            width,
            height,
            image.len()
        );
        Ok(image)
    }

    /// Release `stream`. Idempotent.
    pub fn release(&self, stream: &mut CameraStream) {
        stream.release();
    }
}
