//! The elf certificate page.

use std::io::Cursor;

use chrono::NaiveDate;
use image::codecs::jpeg::JpegEncoder;

use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, Stream};

use super::font::NameFont;
use super::pdf::{add_standard_font, embed_name_font, PageContent, A4_HEIGHT_PT, A4_WIDTH_PT};
use super::ExportError;
use crate::i18n::Language;
use crate::media::EncodedImage;

const JPEG_QUALITY: u8 = 90;
const PORTRAIT_BOX_WIDTH: f32 = 300.0;
const PORTRAIT_BOX_HEIGHT: f32 = 400.0;
const PORTRAIT_TOP: f32 = 700.0;

/// Everything printed on a certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub name: String,
    pub portrait: EncodedImage,
    pub language: Language,
    pub date: NaiveDate,
}

impl Certificate {
    pub fn new(name: impl Into<String>, portrait: EncodedImage, language: Language) -> Self {
        Self {
            name: name.into(),
            portrait,
            language,
            date: chrono::Local::now().date_naive(),
        }
    }

    /// "Rovaniemi, 17.10.2026"
    pub fn place_and_date(&self) -> String {
        format!(
            "{}, {}",
            self.language.strings().cert_place,
            format_certificate_date(self.date, self.language)
        )
    }
}

/// `d.m.yyyy` in Finnish, `m/d/yyyy` in English.
pub fn format_certificate_date(date: NaiveDate, language: Language) -> String {
    match language {
        Language::Fi => date.format("%-d.%-m.%Y").to_string(),
        Language::En => date.format("%-m/%-d/%Y").to_string(),
    }
}

/// Render the certificate as a one-page A4 PDF.
///
/// The name is drawn with `name_font` when one is available. Without it the
/// name falls back to the standard title font, which only covers Latin-1.
pub fn render_certificate(
    certificate: &Certificate,
    name_font: Option<&NameFont>,
) -> Result<Vec<u8>, ExportError> {
    let portrait = image::load_from_memory(certificate.portrait.bytes())?.to_rgb8();
    let (width, height) = portrait.dimensions();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), JPEG_QUALITY).encode_image(&portrait)?;

    let scale = (PORTRAIT_BOX_WIDTH / width as f32).min(PORTRAIT_BOX_HEIGHT / height as f32);
    let draw_w = width as f32 * scale;
    let draw_h = height as f32 * scale;
    let draw_x = (A4_WIDTH_PT - draw_w) / 2.0;
    let draw_y = PORTRAIT_TOP - draw_h;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let body_font = add_standard_font(&mut doc, "Helvetica");
    let title_font = add_standard_font(&mut doc, "Times-BoldItalic");
    let mut fonts = dictionary! { "F1" => body_font, "F2" => title_font };

    let t = certificate.language.strings();
    let mut content = PageContent::default();
    content
        .fill_rgb(0.98, 0.95, 0.88)
        .fill_rect(0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT)
        .stroke_rgb(0.55, 0.08, 0.08)
        .stroke_rect(24.0, 24.0, A4_WIDTH_PT - 48.0, A4_HEIGHT_PT - 48.0, 4.0)
        .stroke_rgb(0.80, 0.64, 0.22)
        .stroke_rect(34.0, 34.0, A4_WIDTH_PT - 68.0, A4_HEIGHT_PT - 68.0, 1.5)
        .image("Im1", draw_x, draw_y, draw_w, draw_h)
        .stroke_rect(draw_x, draw_y, draw_w, draw_h, 2.0)
        .fill_rgb(0.55, 0.08, 0.08)
        .centered_text("F2", 34.0, 770.0, t.cert_title)
        .fill_rgb(0.15, 0.15, 0.15)
        .centered_text("F1", 14.0, 728.0, t.cert_proof)
        .fill_rgb(0.55, 0.08, 0.08);
    match name_font {
        Some(font) => {
            fonts.set("F3", embed_name_font(&mut doc, font, &certificate.name));
            content.centered_glyphs("F3", font, 30.0, draw_y - 50.0, &certificate.name);
        }
        None => {
            if certificate.name.chars().any(|c| c as u32 > 0xFF) {
                log::warn!("No name font available; some letters of the name are replaced");
            }
            content.centered_text("F2", 30.0, draw_y - 50.0, &certificate.name);
        }
    }
    content
        .fill_rgb(0.15, 0.15, 0.15)
        .centered_text("F1", 13.0, draw_y - 80.0, t.cert_official)
        .centered_text("F1", 13.0, draw_y - 100.0, t.cert_experience)
        .centered_text("F1", 12.0, 110.0, &certificate.place_and_date())
        .centered_text("F1", 10.0, 80.0, t.cert_magic);

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(width)),
            "Height" => Object::Integer(i64::from(height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));
    let operations = content.into_operations();
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        Content { operations }.encode()?,
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(A4_WIDTH_PT),
            Object::Real(A4_HEIGHT_PT),
        ],
        "Resources" => dictionary! {
            "Font" => fonts,
            "XObject" => dictionary! { "Im1" => image_id },
        },
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
