//! Camera types and data structures.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Which way the camera points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Front camera, facing the person using the booth.
    #[default]
    User,
    /// Rear camera, facing away from the user.
    Environment,
}

impl FacingMode {
    /// Frames from a user-facing camera are mirrored (selfie convention).
    pub fn mirrors(self) -> bool {
        matches!(self, FacingMode::User)
    }
}

impl FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(FacingMode::User),
            "environment" | "back" | "rear" => Ok(FacingMode::Environment),
            other => Err(format!(
                "Unknown facing mode '{}'. Use 'user' or 'environment'",
                other
            )),
        }
    }
}

/// Camera resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 1280x720, the ideal size requested from the camera.
    pub const HD: Resolution = Resolution {
        width: 1280,
        height: 720,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HD
    }
}

/// What the booth asks a camera for when opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamRequest {
    pub facing: FacingMode,
    /// Preferred size; devices may deliver something else.
    pub ideal: Resolution,
}

/// Pixel format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// RGB format (3 bytes per pixel)
    Rgb,
}

/// A captured camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Build an RGB frame, checking that the buffer matches the dimensions.
    pub fn rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected || width == 0 || height == 0 {
            return Err(CameraError::InvalidFrame(format!(
                "{}x{} RGB frame needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        })
    }

    /// Get the number of bytes per pixel (3 for RGB).
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            FrameFormat::Rgb => 3,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// No camera available on this system
    NoDevices,
    /// The user or the OS refused camera access
    PermissionDenied,
    /// Failed to open camera
    OpenFailed(String),
    /// The stream delivered no usable frame
    NoFrame,
    /// Frame buffer did not match its dimensions
    InvalidFrame(String),
    /// The stream was already released
    Released,
    /// Encoding the still image failed
    EncodeFailed(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoDevices => write!(f, "No cameras found"),
            CameraError::PermissionDenied => write!(f, "Camera permission denied"),
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::NoFrame => write!(f, "Camera delivered no frame"),
            CameraError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            CameraError::Released => write!(f, "Camera stream already released"),
            CameraError::EncodeFailed(msg) => write!(f, "Failed to encode frame: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
