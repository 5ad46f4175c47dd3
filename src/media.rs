//! Encoded image buffers passed between capture, generation and export.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// MIME type used for captured frames and exported images.
pub const PNG_MIME: &str = "image/png";

/// An encoded (PNG/JPEG/...) image held in memory.
///
/// Cloning is cheap: the bytes are shared, so the same buffer can sit in the
/// session and ride along with an in-flight request at the same time.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    data: Arc<[u8]>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Wrap PNG bytes.
    pub fn png(data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(PNG_MIME, data)
    }

    /// Decode a base64 payload as returned by the generation API.
    pub fn from_base64(mime_type: impl Into<String>, encoded: &str) -> Result<Self, base64::DecodeError> {
        let bytes = BASE64_STANDARD.decode(encoded.trim())?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_png(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case(PNG_MIME)
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.data)
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_round_trip_keeps_mime() {
        let image = EncodedImage::new("image/jpeg", vec![1u8, 2, 3]);
        let decoded = EncodedImage::from_base64("image/jpeg", &image.to_base64()).unwrap();
        assert_eq!(decoded, image);
        assert_eq!(decoded.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let image = EncodedImage::png(vec![0u8; 4096]);
        let debug = format!("{:?}", image);
        assert!(debug.contains("len: 4096"));
        assert!(debug.len() < 100);
    }

    #[test]
    fn test_invalid_base64_is_error() {
        assert!(EncodedImage::from_base64(PNG_MIME, "not base64!!").is_err());
    }

    #[test]
    fn test_is_png_ignores_case() {
        assert!(EncodedImage::new("IMAGE/PNG", vec![1u8]).is_png());
        assert!(!EncodedImage::new("image/jpeg", vec![1u8]).is_png());
    }
}
