//! PDF export of a translated document.
//!
//! Produces a single-page A4 PDF: the fixed `Texto Traduzido:` label at the
//! top-left, then the translation body in 12pt Helvetica with 14pt leading,
//! greedy-wrapped at [`MAX_LINE_CHARS`] characters. Text that runs past the
//! bottom of the page is clipped by the page box rather than flowed onto a
//! second page.
//!
//! Helvetica is used with WinAnsi encoding, which covers the Latin-1 range
//! and therefore every Portuguese, Spanish, Italian and German diacritic the
//! service emits. Characters outside that range degrade to `?` instead of
//! corrupting the content stream.

use crate::error::TraduzoError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::path::Path;
use tracing::info;

/// File name used when the caller does not pick one.
pub const DEFAULT_PDF_NAME: &str = "traducao.pdf";

/// Greedy wrap width of the body text, in characters.
pub const MAX_LINE_CHARS: usize = 90;

// A4 portrait in points, with a 10 mm margin.
const PAGE_WIDTH: i32 = 595;
const PAGE_HEIGHT: i32 = 842;
const MARGIN: i32 = 28;
const FONT_SIZE: i32 = 12;
const LEADING: i32 = 14;

const LABEL: &str = "Texto Traduzido:";

/// Write `text` to a PDF file at `path`.
///
/// Empty text is refused with [`TraduzoError::EmptyTranslation`] so the
/// caller never ends up with a blank certificate on disk. The file appears
/// atomically: content is assembled in memory, written to a sibling temp
/// file and renamed into place.
pub fn write_pdf(text: &str, path: impl AsRef<Path>) -> Result<(), TraduzoError> {
    let path = path.as_ref();

    if text.is_empty() {
        return Err(TraduzoError::EmptyTranslation);
    }

    let bytes = build_pdf(text)?;

    // Atomic write: write to temp, then rename
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| TraduzoError::ExportFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &bytes).map_err(|e| TraduzoError::ExportFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| TraduzoError::ExportFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "pdf exported");
    Ok(())
}

/// Assemble the one-page document in memory.
fn build_pdf(text: &str) -> Result<Vec<u8>, TraduzoError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(LABEL), StringFormat::Literal)],
        ),
        // Blank line between the label and the body.
        Operation::new("T*", vec![]),
        Operation::new("T*", vec![]),
    ];
    for line in wrap_text(text, MAX_LINE_CHARS) {
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line), StringFormat::Literal)],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let encoded = content.encode().map_err(|e| {
        TraduzoError::Internal(format!("failed to encode page content: {e}"))
    })?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| TraduzoError::Internal(format!("failed to serialise PDF: {e}")))?;
    Ok(buffer)
}

/// Encode text for a WinAnsi content-stream string.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    let code = c as u32;
    match c {
        _ if code < 0x20 => b' ',
        _ if code < 0x7F => code as u8,
        // Latin-1 supplement maps 1:1 in WinAnsi.
        _ if (0xA0..=0xFF).contains(&code) => code as u8,
        // Typographic characters WinAnsi keeps in 0x80..0x9F.
        '\u{20AC}' => 0x80,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Wrap text greedily at `max_chars` characters, preserving existing line
/// breaks. Words longer than a whole line are hard-split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        wrap_line(raw_line.trim_end(), max_chars, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_line(line: &str, max_chars: usize, out: &mut Vec<String>) {
    if line.chars().count() <= max_chars {
        out.push(line.to_string());
        return;
    }

    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        for piece in split_word(word, max_chars) {
            let piece_len = piece.chars().count();
            if current_len > 0 && current_len + 1 + piece_len > max_chars {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}

/// Split one word into chunks of at most `max_chars` characters.
fn split_word(word: &str, max_chars: usize) -> Vec<String> {
    if word.chars().count() <= max_chars {
        return vec![word.to_string()];
    }
    word.chars()
        .collect::<Vec<_>>()
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
