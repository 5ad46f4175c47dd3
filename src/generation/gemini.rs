//! GeminiClient - talks to the Gemini `generateContent` REST API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::client::{AuthFailure, GenerationClient, GenerationError};
use super::options::{ElfStyle, GroupType, UpscaleLevel};
use super::prompt::{transform_prompt, upscale_prompt};
use crate::credentials::ApiKeyStore;
use crate::media::{EncodedImage, PNG_MIME};

/// Default base URL for the Gemini API.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";

/// Portrait aspect ratio requested for every image.
pub const ASPECT_RATIO: &str = "3:4";

/// Default timeout for a generation request. Image models are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
    image_size: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// Client for the Gemini image API.
pub struct GeminiClient {
    keys: Arc<ApiKeyStore>,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint.
    ///
    /// The key is read from `keys` on every request, so a key picked after
    /// construction is used by the next call.
    pub fn new(keys: Arc<ApiKeyStore>) -> Result<Self, GenerationError> {
        Self::with_base_url(keys, GEMINI_API_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(keys: Arc<ApiKeyStore>, base_url: String) -> Result<Self, GenerationError> {
        Self::with_options(keys, base_url, DEFAULT_MODEL.to_string(), DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        keys: Arc<ApiKeyStore>,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            keys,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one image + prompt and return the first image in the answer.
    ///
    /// # Errors
    ///
    /// `GenerationError::Auth` when no key is configured or the service
    /// rejects it, `GenerationError::RateLimit` on 429, `ApiError` for other
    /// error responses, `NoImage` when the answer carries no image, and
    /// `HttpError` when the request itself fails.
    pub async fn generate_image(
        &self,
        image: &EncodedImage,
        prompt: String,
        size: UpscaleLevel,
    ) -> Result<EncodedImage, GenerationError> {
        let api_key = self.keys.get().ok_or_else(|| {
            GenerationError::auth(AuthFailure::MissingKey, "no API key configured")
        })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.to_base64(),
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
                image_config: ImageConfig {
                    aspect_ratio: ASPECT_RATIO,
                    image_size: size.as_str(),
                },
            },
        };

        log::info!(
            "Requesting {} image from {} ({} byte input)",
            size,
            self.model,
            image.len()
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after_secs = parse_retry_after(&response);
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = map_http_error(status, &body, retry_after_secs);
            log::warn!("Image request failed: {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_image(parsed)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn transform(
        &self,
        image: &EncodedImage,
        style: ElfStyle,
        group: GroupType,
    ) -> Result<EncodedImage, GenerationError> {
        self.generate_image(image, transform_prompt(style, group), UpscaleLevel::K1)
            .await
    }

    async fn upscale(
        &self,
        image: &EncodedImage,
        style: ElfStyle,
        target: UpscaleLevel,
    ) -> Result<EncodedImage, GenerationError> {
        self.generate_image(image, upscale_prompt(style, target), target)
            .await
    }
}

/// Pull the first inline image out of a response.
fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage, GenerationError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);
    let mut finish_reason = None;

    for candidate in response.candidates {
        if finish_reason.is_none() {
            finish_reason = candidate.finish_reason;
        }
        let inline = candidate
            .content
            .into_iter()
            .flat_map(|content| content.parts)
            .find_map(|part| part.inline_data);
        if let Some(inline) = inline {
            let mime_type = if inline.mime_type.is_empty() {
                PNG_MIME.to_string()
            } else {
                inline.mime_type
            };
            return EncodedImage::from_base64(mime_type, &inline.data)
                .map_err(|e| GenerationError::InvalidImage(e.to_string()));
        }
    }

    let reason = block_reason
        .or(finish_reason)
        .unwrap_or_else(|| "response contained no image".to_string());
    Err(GenerationError::NoImage { reason })
}

/// Classify an error response by its structured status, not its wording.
fn map_http_error(status: StatusCode, body: &str, retry_after_secs: Option<u64>) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorWrapper>(body).ok().map(|w| w.error);
    let api_status = parsed
        .as_ref()
        .and_then(|e| e.status.clone())
        .unwrap_or_default();
    let key_invalid = parsed.as_ref().is_some_and(|e| {
        e.details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
    });
    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    match (status.as_u16(), api_status.as_str()) {
        (_, "PERMISSION_DENIED") | (403, _) => {
            GenerationError::auth(AuthFailure::PermissionDenied, message)
        }
        (_, "UNAUTHENTICATED") | (401, _) => GenerationError::auth(AuthFailure::InvalidKey, message),
        (400, _) if key_invalid => GenerationError::auth(AuthFailure::InvalidKey, message),
        (_, "NOT_FOUND") | (404, _) => GenerationError::auth(AuthFailure::KeyNotFound, message),
        (_, "RESOURCE_EXHAUSTED") | (429, _) => GenerationError::RateLimit {
            message,
            retry_after_secs,
        },
        (code, _) => GenerationError::ApiError {
            status: code,
            message,
        },
    }
}

/// Parse the Retry-After header value in seconds.
fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}
