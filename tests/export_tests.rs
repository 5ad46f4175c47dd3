//! Download tests against the filesystem.
//!
//! These tests cover:
//! - Saving portraits as PNG, re-encoding other formats
//! - Rendering the certificate PDF, including names outside Latin-1
//! - A whole visit from a photo file to files on disk

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use image::{ImageFormat, Rgb, RgbImage};

use elf_booth::audio::BackgroundAudio;
use elf_booth::camera::{CaptureService, FacingMode, Resolution, StillImageCamera};
use elf_booth::credentials::ApiKeyStore;
use elf_booth::export::{Certificate, ExportError, Exporter, FsExporter, NameFont};
use elf_booth::flow::{AppState, Collaborators, DriverSettings, FlowDriver, Intent, Notice};
use elf_booth::generation::{ElfStyle, GenerationClient, GenerationError, GroupType, UpscaleLevel};
use elf_booth::i18n::Language;
use elf_booth::media::EncodedImage;

fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 90]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn read_dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}

#[test]
fn test_png_portrait_saved_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = FsExporter::new(dir.path());
    let bytes = encoded(ImageFormat::Png, 6, 8);

    let path = exporter
        .export_image(&EncodedImage::png(bytes.clone()), "Tonttu_Aino_2K.png")
        .unwrap();

    assert_eq!(path, dir.path().join("Tonttu_Aino_2K.png"));
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_jpeg_portrait_becomes_png() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = FsExporter::new(dir.path());
    let jpeg = EncodedImage::new("image/jpeg", encoded(ImageFormat::Jpeg, 12, 16));

    let path = exporter.export_image(&jpeg, "Tonttu_Tonttu_1K.png").unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    assert_eq!(read_dimensions(&path), (12, 16));
}

#[test]
fn test_undecodable_portrait_is_an_image_error() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = FsExporter::new(dir.path());
    let garbage = EncodedImage::new("image/webp", vec![0u8, 1, 2, 3]);

    assert!(matches!(
        exporter.export_image(&garbage, "broken.png"),
        Err(ExportError::Image(_))
    ));
    assert!(!dir.path().join("broken.png").exists());
}

#[test]
fn test_certificate_pdf_contains_name_and_date() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = FsExporter::new(dir.path());
    let certificate = Certificate {
        name: "Aino".to_string(),
        portrait: EncodedImage::png(encoded(ImageFormat::Png, 30, 40)),
        language: Language::Fi,
        date: NaiveDate::from_ymd_opt(2026, 12, 6).unwrap(),
    };

    let path = exporter
        .export_document(&certificate, "Tonttudiploma_Aino.pdf")
        .unwrap();

    let pdf = std::fs::read(&path).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("(Aino)"));
    assert!(text.contains("6.12.2026"));
    assert!(text.contains("/DCTDecode"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_certificate_keeps_names_in_any_script() {
    let Some(font) = NameFont::discover() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let (l_stroke, yu) = (font.glyph('Ł'), font.glyph('Ю'));
    let dir = tempfile::tempdir().unwrap();
    let exporter = FsExporter::new(dir.path()).with_name_font(Some(font));
    let certificate = Certificate {
        name: "Łukasz Юля".to_string(),
        portrait: EncodedImage::png(encoded(ImageFormat::Png, 30, 40)),
        language: Language::En,
        date: NaiveDate::from_ymd_opt(2026, 12, 6).unwrap(),
    };

    let path = exporter
        .export_document(&certificate, "Tonttudiploma_Łukasz_Юля.pdf")
        .unwrap();

    let pdf = std::fs::read(&path).unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("/Identity-H"));
    assert!(text.contains("/FontFile2"));
    assert!(text.contains(&format!("<{:04X}> <0141>", l_stroke)));
    assert!(text.contains(&format!("<{:04X}> <042E>", yu)));
    assert!(!text.contains("(?ukasz ???)"));
}

/// Answers every request with the photo it was sent.
struct EchoGenerator;

#[async_trait]
impl GenerationClient for EchoGenerator {
    async fn transform(
        &self,
        image: &EncodedImage,
        _style: ElfStyle,
        _group: GroupType,
    ) -> Result<EncodedImage, GenerationError> {
        Ok(image.clone())
    }

    async fn upscale(
        &self,
        image: &EncodedImage,
        _style: ElfStyle,
        _level: UpscaleLevel,
    ) -> Result<EncodedImage, GenerationError> {
        Ok(image.clone())
    }
}

#[tokio::test]
async fn test_visit_from_photo_file_to_downloads() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("visitor.png");
    std::fs::write(&photo, encoded(ImageFormat::Png, 40, 30)).unwrap();
    let output = dir.path().join("downloads");

    let collaborators = Collaborators {
        generator: Arc::new(EchoGenerator),
        capture: CaptureService::new(Box::new(StillImageCamera::new(&photo)), Resolution::HD),
        exporter: Arc::new(FsExporter::new(&output)),
        credentials: Arc::new(ApiKeyStore::with_key("k")),
        audio: BackgroundAudio::disabled(),
    };
    let (mut driver, mut completions) = FlowDriver::new(
        collaborators,
        DriverSettings {
            facing: FacingMode::Environment,
            ..DriverSettings::default()
        },
    );

    for intent in [
        Intent::Begin,
        Intent::ChooseGroup(GroupType::Single),
        Intent::Capture,
        Intent::ChooseStyle(ElfStyle::Forest),
        Intent::StartMagic,
    ] {
        driver.handle(intent);
    }
    driver.settle(&mut completions).await;
    assert_eq!(driver.session().state(), AppState::Result);

    driver.handle(Intent::Upscale(UpscaleLevel::K2));
    driver.settle(&mut completions).await;
    driver.handle(Intent::DownloadImage);
    driver.settle(&mut completions).await;

    let image_path = output.join("Tonttu_Tonttu_2K.png");
    assert_eq!(
        driver.session().notice(),
        Some(&Notice::Saved(image_path.clone()))
    );
    assert_eq!(read_dimensions(&image_path), (40, 30));

    for intent in [
        Intent::OpenNameEntry,
        Intent::EditName("  Aino  ".to_string()),
        Intent::CreateCertificate,
        Intent::DownloadCertificate,
    ] {
        driver.handle(intent);
    }
    driver.settle(&mut completions).await;

    let pdf = std::fs::read(output.join("Tonttudiploma_Aino.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(!driver.session().is_downloading());
    assert_eq!(driver.session().state(), AppState::Certificate);
}
