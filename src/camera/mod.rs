//! Camera capture for the booth.
//!
//! This module provides the capture service used by the flow driver:
//! - Stream lifecycle via [`CaptureService`] and [`CameraStream`]
//! - Pluggable devices via [`CameraDevice`] / [`LiveFeed`]
//! - Hardware cameras via [`NativeCamera`] (nokhwa, `native-camera` feature)
//! - A photo-file backed device via [`StillImageCamera`]

#[cfg(feature = "native-camera")]
mod device;
mod frame_utils;
mod service;
mod still;
mod types;

#[cfg(feature = "native-camera")]
pub use device::{pick_device, NativeCamera};
pub use frame_utils::{encode_png, mirror_horizontal};
pub use service::{CameraDevice, CameraStream, CaptureService, LiveFeed};
pub use still::{NoCamera, StillImageCamera};
pub use types::{CameraError, FacingMode, Frame, FrameFormat, Resolution, StreamRequest};
