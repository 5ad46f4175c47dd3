//! Generative image service integration.
//!
//! The flow controller only knows the [`GenerationClient`] trait. The
//! shipped implementation, [`GeminiClient`], sends the captured photo and a
//! style prompt to Gemini's image model and returns the first image.

mod client;
mod gemini;
mod options;
mod prompt;

pub use client::{AuthFailure, ErrorKind, GenerationClient, GenerationError};
pub use gemini::{GeminiClient, ASPECT_RATIO, DEFAULT_MODEL, DEFAULT_TIMEOUT, GEMINI_API_BASE_URL};
pub use options::{ElfStyle, GroupType, UpscaleLevel};
pub use prompt::{style_anchor, transform_prompt, upscale_prompt};
