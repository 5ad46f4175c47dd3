//! Wiring: build a [`FlowDriver`] from configuration.

use std::sync::Arc;

use crate::audio::{BackgroundAudio, LogSink};
use crate::camera::{CameraDevice, CaptureService, StillImageCamera};
use crate::config::{Config, ConfigError};
use crate::credentials::ApiKeyStore;
use crate::export::{FsExporter, NameFont};
use crate::flow::{Collaborators, Completions, DriverSettings, FlowDriver};
use crate::generation::{GeminiClient, GenerationError};

/// Name of the looping background track.
pub const MUSIC_TRACK: &str = "Jingle Bells";

#[derive(Debug, thiserror::Error)]
pub enum BoothError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to set up image service: {0}")]
    Generation(#[from] GenerationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Flow(String),
}

/// Build the driver and its completion channel.
///
/// `keys` is shared with the generation client so a key entered at the key
/// gate is used by the next request.
pub fn assemble(
    config: &Config,
    keys: Arc<ApiKeyStore>,
) -> Result<(FlowDriver, Completions), BoothError> {
    let generator = GeminiClient::with_options(
        Arc::clone(&keys),
        config.generation.base_url.clone(),
        config.generation.model.clone(),
        config.generation.timeout(),
    )?;

    let device = camera_device(config);

    let audio = if config.ui.music {
        BackgroundAudio::new(Box::new(LogSink::new(MUSIC_TRACK)))
    } else {
        BackgroundAudio::disabled()
    };

    let output_dir = config.export.resolved_output_dir();
    let name_font = NameFont::load_or_discover(config.export.font.as_deref());
    if name_font.is_none() {
        log::warn!("No TrueType font found; certificate names are limited to Latin-1");
    }
    log::debug!(
        "Booth: model={} facing={} output={}",
        config.generation.model,
        config.camera.facing,
        output_dir.display()
    );

    let collaborators = Collaborators {
        generator: Arc::new(generator),
        capture: CaptureService::new(device, config.camera.ideal()),
        exporter: Arc::new(FsExporter::new(output_dir).with_name_font(name_font)),
        credentials: keys,
        audio,
    };
    let settings = DriverSettings {
        facing: config.camera.facing_mode(),
        subject: config.export.subject.clone(),
        language: config.ui.language(),
    };
    Ok(FlowDriver::new(collaborators, settings))
}

/// A photo file when one is configured, otherwise the machine's camera.
fn camera_device(config: &Config) -> Box<dyn CameraDevice> {
    if let Some(path) = &config.camera.photo {
        log::info!("Using {} as the camera", path.display());
        return Box::new(StillImageCamera::new(path));
    }
    native_camera(config)
}

#[cfg(feature = "native-camera")]
fn native_camera(config: &Config) -> Box<dyn CameraDevice> {
    Box::new(crate::camera::NativeCamera::new(config.camera.device))
}

#[cfg(not(feature = "native-camera"))]
fn native_camera(_config: &Config) -> Box<dyn CameraDevice> {
    log::warn!("Built without camera support; use --photo or [camera] photo");
    Box::new(crate::camera::NoCamera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{AppState, Intent};
    use crate::generation::GroupType;
    use crate::i18n::Language;

    #[test]
    fn test_assemble_uses_configured_language() {
        let mut config = Config::default();
        config.ui.language = "en".to_string();
        config.ui.music = false;
        let (driver, _completions) =
            assemble(&config, Arc::new(ApiKeyStore::with_key("k"))).unwrap();
        assert_eq!(driver.session().language(), Language::En);
        assert_eq!(driver.session().state(), AppState::Hero);
        assert!(!driver.music_playing());
        assert_eq!(driver.settings().subject, "Tonttu");
    }

    #[test]
    fn test_configured_photo_stands_in_for_camera() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("visitor.png");
        image::RgbImage::new(8, 6).save(&photo).unwrap();

        let mut config = Config::default();
        config.camera.photo = Some(photo);
        config.ui.music = false;
        let (mut driver, _completions) =
            assemble(&config, Arc::new(ApiKeyStore::with_key("k"))).unwrap();

        driver.handle(Intent::Begin);
        driver.handle(Intent::ChooseGroup(GroupType::Single));
        assert!(driver.camera_active());
        driver.handle(Intent::Capture);
        assert_eq!(driver.session().state(), AppState::StyleSelect);
        assert!(driver.session().captured_image().is_some());
    }
}
