//! The generation boundary: what the flow needs from an image service.

use async_trait::async_trait;

use super::options::{ElfStyle, GroupType, UpscaleLevel};
use crate::media::EncodedImage;

/// Why the image service refused our credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No key was configured at all.
    MissingKey,
    /// The key (or the project behind it) no longer exists and must be picked again.
    KeyNotFound,
    /// The key is valid but not allowed to use the model.
    PermissionDenied,
    /// The key was rejected as malformed or unknown.
    InvalidKey,
}

/// Classification of a generation failure, as far as the flow cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recoverable by picking another credential.
    Auth(AuthFailure),
    /// Anything else.
    Generic,
}

/// Errors returned by a [`GenerationClient`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("Credential rejected ({failure:?}): {message}")]
    Auth {
        failure: AuthFailure,
        /// Detail from the service, for logs only
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited: {message}")]
    RateLimit {
        message: String,
        /// Retry-After header value in seconds, if provided
        retry_after_secs: Option<u64>,
    },

    #[error("No image in response: {reason}")]
    NoImage { reason: String },

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Generation task failed: {0}")]
    TaskFailed(String),
}

impl GenerationError {
    pub fn auth(failure: AuthFailure, message: impl Into<String>) -> Self {
        GenerationError::Auth {
            failure,
            message: message.into(),
        }
    }

    /// Structured classification used by the flow controller.
    ///
    /// Everything that is not explicitly a credential problem is generic,
    /// including kinds added later.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Auth { failure, .. } => ErrorKind::Auth(*failure),
            _ => ErrorKind::Generic,
        }
    }
}

/// An image service that can turn a photo into an elf portrait.
///
/// Calls are single-shot: implementations must not retry on their own, and
/// they report progress only by resolving.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate a stylized portrait from a captured photo.
    async fn transform(
        &self,
        image: &EncodedImage,
        style: ElfStyle,
        group: GroupType,
    ) -> Result<EncodedImage, GenerationError>;

    /// Re-render an existing portrait at a higher resolution.
    async fn upscale(
        &self,
        image: &EncodedImage,
        style: ElfStyle,
        target: UpscaleLevel,
    ) -> Result<EncodedImage, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_classify_as_auth() {
        let err = GenerationError::auth(AuthFailure::PermissionDenied, "PERMISSION_DENIED");
        assert_eq!(err.kind(), ErrorKind::Auth(AuthFailure::PermissionDenied));
    }

    #[test]
    fn test_other_errors_classify_as_generic() {
        let errors = [
            GenerationError::ApiError {
                status: 500,
                message: "boom".to_string(),
            },
            GenerationError::RateLimit {
                message: "slow down".to_string(),
                retry_after_secs: Some(3),
            },
            GenerationError::NoImage {
                reason: "SAFETY".to_string(),
            },
            GenerationError::InvalidImage("bad base64".to_string()),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Generic, "{}", err);
        }
    }

    #[test]
    fn test_generation_error_display() {
        assert_eq!(
            GenerationError::ApiError {
                status: 500,
                message: "internal".to_string()
            }
            .to_string(),
            "API error (status 500): internal"
        );
        assert_eq!(
            GenerationError::NoImage {
                reason: "empty".to_string()
            }
            .to_string(),
            "No image in response: empty"
        );
    }
}
