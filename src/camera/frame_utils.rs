//! Frame conversion and transformation utilities.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use super::types::{CameraError, Frame, Resolution};
use crate::media::EncodedImage;

/// Convert a decoded image into an RGB frame, shrinking it to fit `ideal`.
///
/// Images already smaller than `ideal` keep their size.
pub fn frame_from_image(image: &DynamicImage, ideal: Resolution) -> Result<Frame, CameraError> {
    let fitted = if image.width() > ideal.width || image.height() > ideal.height {
        image.thumbnail(ideal.width, ideal.height)
    } else {
        image.clone()
    };
    let rgb = fitted.to_rgb8();
    let (width, height) = rgb.dimensions();
    Frame::rgb(rgb.into_raw(), width, height)
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let bpp = frame.bytes_per_pixel();

    for y in 0..height {
        let row_start = y * width * bpp;
        let row = &mut frame.data[row_start..row_start + width * bpp];

        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}

/// Encode a frame as PNG.
pub fn encode_png(frame: Frame) -> Result<EncodedImage, CameraError> {
    let Frame {
        data,
        width,
        height,
        ..
    } = frame;
    let rgb = RgbImage::from_raw(width, height, data).ok_or_else(|| {
        CameraError::InvalidFrame(format!("buffer too small for {}x{}", width, height))
    })?;

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| CameraError::EncodeFailed(e.to_string()))?;
    Ok(EncodedImage::png(out.into_inner()))
}
