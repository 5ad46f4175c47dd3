//! A virtual camera that streams a still photo from disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::frame_utils::frame_from_image;
use super::service::{CameraDevice, LiveFeed};
use super::types::{CameraError, Frame, StreamRequest};

/// Camera backed by an image file.
///
/// Every open re-reads the file, so replacing the photo between capture
/// cycles behaves like a new picture in front of the lens.
#[derive(Debug, Clone)]
pub struct StillImageCamera {
    path: PathBuf,
}

impl StillImageCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CameraDevice for StillImageCamera {
    fn open(&mut self, request: StreamRequest) -> Result<Box<dyn LiveFeed>, CameraError> {
        let bytes = std::fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CameraError::NoDevices,
            ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            _ => CameraError::OpenFailed(format!("{}: {}", self.path.display(), e)),
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| CameraError::OpenFailed(format!("{}: {}", self.path.display(), e)))?;
        let frame = frame_from_image(&image, request.ideal)?;
        log::debug!(
            "Still camera opened {} as {}x{}",
            self.path.display(),
            frame.width,
            frame.height
        );
        Ok(Box::new(StillFeed { frame: Some(frame) }))
    }
}

struct StillFeed {
    frame: Option<Frame>,
}

impl LiveFeed for StillFeed {
    fn grab(&mut self) -> Result<Frame, CameraError> {
        self.frame.clone().ok_or(CameraError::Released)
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

/// Stand-in when no camera source is configured. Every open fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

impl CameraDevice for NoCamera {
    fn open(&mut self, _request: StreamRequest) -> Result<Box<dyn LiveFeed>, CameraError> {
        Err(CameraError::NoDevices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Resolution;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_missing_file_is_no_devices() {
        let mut camera = StillImageCamera::new("/definitely/not/here.png");
        let result = camera.open(StreamRequest::default());
        assert!(matches!(result, Err(CameraError::NoDevices)));
    }

    #[test]
    fn test_garbage_file_is_open_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        let mut camera = StillImageCamera::new(&path);
        assert!(matches!(
            camera.open(StreamRequest::default()),
            Err(CameraError::OpenFailed(_))
        ));
    }

    #[test]
    fn test_streams_photo_scaled_to_ideal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        DynamicImage::ImageRgb8(RgbImage::new(64, 32))
            .save(&path)
            .unwrap();

        let mut camera = StillImageCamera::new(&path);
        let mut feed = camera
            .open(StreamRequest {
                ideal: Resolution {
                    width: 32,
                    height: 32,
                },
                ..StreamRequest::default()
            })
            .unwrap();
        let frame = feed.grab().unwrap();
        assert_eq!((frame.width, frame.height), (32, 16));

        feed.stop();
        assert!(matches!(feed.grab(), Err(CameraError::Released)));
    }

    #[test]
    fn test_no_camera_never_opens() {
        let result = NoCamera.open(StreamRequest::default());
        assert!(matches!(result, Err(CameraError::NoDevices)));
    }
}
