//! Saving results: the portrait as PNG and the certificate as a PDF.

mod certificate;
mod font;
mod fs;
mod pdf;

pub use certificate::{format_certificate_date, render_certificate, Certificate};
pub use font::NameFont;
pub use fs::FsExporter;
pub use pdf::{A4_HEIGHT_PT, A4_WIDTH_PT};

use std::path::PathBuf;

use crate::generation::UpscaleLevel;
use crate::media::EncodedImage;

/// Default subject word used in file names and as the fallback name.
pub const DEFAULT_SUBJECT: &str = "Tonttu";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid file name: {0}")]
    InvalidFilename(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Export task failed: {0}")]
    TaskFailed(String),
}

/// Where downloads go.
///
/// Implementations are called from a blocking worker thread.
pub trait Exporter: Send + Sync {
    /// Save `image` as a PNG file.
    fn export_image(&self, image: &EncodedImage, filename: &str) -> Result<PathBuf, ExportError>;

    /// Render and save the certificate document.
    fn export_document(
        &self,
        certificate: &Certificate,
        filename: &str,
    ) -> Result<PathBuf, ExportError>;
}

/// Make `name` safe for a file name; falls back to `default` when nothing usable is left.
pub fn sanitize_name(name: &str, default: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned.to_string()
    }
}

/// `{subject}_{name}_{resolution}.png`
pub fn image_filename(subject: &str, name: &str, resolution: UpscaleLevel) -> String {
    format!(
        "{}_{}_{}.png",
        subject,
        sanitize_name(name, subject),
        resolution
    )
}

/// `{subject}diploma_{name}.pdf`
pub fn certificate_filename(subject: &str, name: &str) -> String {
    format!("{}diploma_{}.pdf", subject, sanitize_name(name, subject))
}
