use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;

use super::{render_certificate, Certificate, ExportError, Exporter, NameFont};
use crate::media::EncodedImage;

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct FsExporter {
    output_dir: PathBuf,
    name_font: Option<Arc<NameFont>>,
}

impl FsExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            name_font: None,
        }
    }

    /// Draw certificate names with `font`.
    pub fn with_name_font(mut self, font: Option<NameFont>) -> Self {
        self.name_font = font.map(Arc::new);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn target(&self, filename: &str) -> Result<PathBuf, ExportError> {
        let plain = Path::new(filename)
            .file_name()
            .map(|f| f == filename)
            .unwrap_or(false);
        if !plain {
            return Err(ExportError::InvalidFilename(filename.to_string()));
        }
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(filename))
    }
}

impl Exporter for FsExporter {
    fn export_image(&self, image: &EncodedImage, filename: &str) -> Result<PathBuf, ExportError> {
        let path = self.target(filename)?;
        if image.is_png() {
            std::fs::write(&path, image.bytes())?;
        } else {
            let decoded = image::load_from_memory(image.bytes())?;
            let mut png = Vec::new();
            decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
            std::fs::write(&path, png)?;
        }
        log::info!("Saved image to {}", path.display());
        Ok(path)
    }

    fn export_document(
        &self,
        certificate: &Certificate,
        filename: &str,
    ) -> Result<PathBuf, ExportError> {
        let path = self.target(filename)?;
        let pdf = render_certificate(certificate, self.name_font.as_deref())?;
        std::fs::write(&path, pdf)?;
        log::info!("Saved certificate to {}", path.display());
        Ok(path)
    }
}
