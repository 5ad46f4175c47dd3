//! Page drawing and font embedding on top of lopdf.

use std::collections::BTreeMap;

use lopdf::content::Operation;
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::font::NameFont;

/// A4 in PDF points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// Drawing operations for one page.
#[derive(Debug, Default)]
pub(crate) struct PageContent {
    operations: Vec<Operation>,
}

impl PageContent {
    pub(crate) fn fill_rgb(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.push("rg", vec![real(r), real(g), real(b)])
    }

    pub(crate) fn stroke_rgb(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.push("RG", vec![real(r), real(g), real(b)])
    }

    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        self.push("re", vec![real(x), real(y), real(w), real(h)])
            .push("f", vec![])
    }

    pub(crate) fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line: f32) -> &mut Self {
        self.push("w", vec![real(line)])
            .push("re", vec![real(x), real(y), real(w), real(h)])
            .push("S", vec![])
    }

    /// Draw the image XObject `resource` into the given box.
    pub(crate) fn image(&mut self, resource: &str, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        self.push("q", vec![])
            .push(
                "cm",
                vec![real(w), real(0.0), real(0.0), real(h), real(x), real(y)],
            )
            .push("Do", vec![name(resource)])
            .push("Q", vec![])
    }

    /// Centered `text` in a standard WinAnsi font at baseline `y`.
    pub(crate) fn centered_text(&mut self, font: &str, size: f32, y: f32, text: &str) -> &mut Self {
        let width = estimate_width(text, size);
        self.show(font, size, width, y, Object::string_literal(winansi(text)))
    }

    /// Centered `text` in the embedded name font at baseline `y`.
    pub(crate) fn centered_glyphs(
        &mut self,
        resource: &str,
        font: &NameFont,
        size: f32,
        y: f32,
        text: &str,
    ) -> &mut Self {
        let glyphs: Vec<u8> = text
            .chars()
            .flat_map(|c| font.glyph(c).to_be_bytes())
            .collect();
        let width = font.text_width(text, size);
        self.show(
            resource,
            size,
            width,
            y,
            Object::String(glyphs, StringFormat::Hexadecimal),
        )
    }

    pub(crate) fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    fn show(&mut self, font: &str, size: f32, width: f32, y: f32, text: Object) -> &mut Self {
        let x = ((A4_WIDTH_PT - width) / 2.0).max(0.0);
        self.push("BT", vec![])
            .push("Tf", vec![name(font), real(size)])
            .push("Td", vec![real(x), real(y)])
            .push("Tj", vec![text])
            .push("ET", vec![])
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) -> &mut Self {
        self.operations.push(Operation::new(operator, operands));
        self
    }
}

/// Rough advance for the standard fonts: half an em per glyph.
fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// WinAnsi bytes for the standard fonts. Latin-1 maps directly; anything
/// else becomes `?`.
pub(crate) fn winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code if code < 0x20 => b' ',
            code if code <= 0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Add a standard Type1 font with WinAnsi encoding.
pub(crate) fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => name(base_font),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Embed `font` as a Type0 font covering the characters of `text`.
///
/// Strings drawn with it are big-endian glyph ids (Identity-H). A ToUnicode
/// map keeps the text searchable and copyable.
pub(crate) fn embed_name_font(doc: &mut Document, font: &NameFont, text: &str) -> ObjectId {
    let mut used: BTreeMap<u16, char> = BTreeMap::new();
    for c in text.chars() {
        used.entry(font.glyph(c)).or_insert(c);
    }

    let (ascent, descent) = font.vertical_metrics();
    let data = font.data().to_vec();
    let length = data.len() as i64;
    let font_file = doc.add_object(Stream::new(
        dictionary! { "Length1" => Object::Integer(length) },
        data,
    ));
    let descriptor = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => name(font.base_name()),
        "Flags" => Object::Integer(32),
        "FontBBox" => vec![real(-1000.0), real(descent), real(2000.0), real(ascent)],
        "ItalicAngle" => Object::Integer(0),
        "Ascent" => real(ascent),
        "Descent" => real(descent),
        "CapHeight" => real(ascent),
        "StemV" => Object::Integer(80),
        "FontFile2" => font_file,
    });

    let widths: Vec<Object> = used
        .keys()
        .flat_map(|&glyph| {
            [
                Object::Integer(i64::from(glyph)),
                Object::Array(vec![real(font.advance(glyph))]),
            ]
        })
        .collect();
    let cid_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => name(font.base_name()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => Object::Integer(0),
        },
        "FontDescriptor" => descriptor,
        "CIDToGIDMap" => "Identity",
        "DW" => Object::Integer(1000),
        "W" => widths,
    });

    let to_unicode = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(&used)));
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => name(font.base_name()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font)],
        "ToUnicode" => to_unicode,
    })
}

/// CMap mapping each glyph id back to its character.
pub(crate) fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> Vec<u8> {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    // At most 100 entries per bfchar block
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (glyph, c) in chunk {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, hex));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap.into_bytes()
}
