//! Turning the service's translated text into something presentable.
//!
//! The translation service separates an optional document header from the
//! body with a `-----` line. [`split_sections`] reproduces that contract
//! exactly: text before the first delimiter is discarded, the segment after
//! it becomes the header, and the remaining segments joined by newlines
//! become the body. Without a delimiter the whole text is the body,
//! untouched.
//!
//! [`clean_translation`] then applies a handful of deterministic cleanup
//! rules. Translated OCR text routinely arrives with Windows line endings,
//! stray zero-width characters and runs of blank lines; the rules are pure
//! `&str → String` passes with no shared state, run in a defined order.

use once_cell::sync::Lazy;
use regex::Regex;

/// Line the service uses to fence off the document header.
pub const SECTION_DELIMITER: &str = "-----";

/// A translation split into its displayable parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTranslation {
    /// Document header, present only when the text carried a delimiter.
    pub header: Option<String>,
    /// Body text; the whole input when no delimiter was found.
    pub body: String,
}

impl RenderedTranslation {
    /// Render as Markdown: the header as a second-level heading followed by
    /// the body. An absent or empty header yields the body alone.
    pub fn to_markdown(&self) -> String {
        match self.header.as_deref() {
            Some(header) if !header.is_empty() => format!("## {header}\n\n{}", self.body),
            _ => self.body.clone(),
        }
    }
}

/// Split translated text on [`SECTION_DELIMITER`].
///
/// With at least one delimiter: the text before the first one is dropped,
/// the segment after it is trimmed into the header, and the remaining
/// segments are joined with `\n` and trimmed into the body. With none, the
/// input becomes the body verbatim, untrimmed.
pub fn split_sections(text: &str) -> RenderedTranslation {
    if !text.contains(SECTION_DELIMITER) {
        return RenderedTranslation {
            header: None,
            body: text.to_string(),
        };
    }

    let mut segments = text.split(SECTION_DELIMITER).skip(1);
    let header = segments.next().map(|s| s.trim().to_string());
    let body = segments.collect::<Vec<_>>().join("\n").trim().to_string();

    RenderedTranslation { header, body }
}

/// Apply all cleanup rules to translated text.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Trim trailing whitespace per line
/// 3. Collapse 4+ consecutive newlines down to 3
/// 4. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 5. Ensure the text ends with exactly one newline
pub fn clean_translation(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    ensure_final_newline(&s)
}

/// Split, assemble and clean in one step: the Markdown view of a raw
/// translation.
pub fn render_markdown(text: &str) -> String {
    clean_translation(&split_sections(text).to_markdown())
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 3: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 4: Remove invisible Unicode characters ──────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 5: Ensure text ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header_and_body() {
        let text = "ruído-----CERTIDÃO DE NASCIMENTO-----Nome: Ana\nData: 12/03/1990";
        let rendered = split_sections(text);
        assert_eq!(rendered.header.as_deref(), Some("CERTIDÃO DE NASCIMENTO"));
        assert_eq!(rendered.body, "Nome: Ana\nData: 12/03/1990");
    }

    #[test]
    fn test_text_before_first_delimiter_is_dropped() {
        let rendered = split_sections("preamble-----HEADER-----body");
        assert_eq!(rendered.header.as_deref(), Some("HEADER"));
        assert_eq!(rendered.body, "body");
        assert!(!rendered.to_markdown().contains("preamble"));
    }

    #[test]
    fn test_extra_delimiters_join_the_body_with_newlines() {
        let rendered = split_sections("x-----H-----first-----second");
        assert_eq!(rendered.body, "first\nsecond");
    }

    #[test]
    fn test_header_segment_is_trimmed() {
        let rendered = split_sections("-----  CERTIDÃO  -----  corpo  ");
        assert_eq!(rendered.header.as_deref(), Some("CERTIDÃO"));
        assert_eq!(rendered.body, "corpo");
    }

    #[test]
    fn test_no_delimiter_keeps_the_text_verbatim() {
        let text = "  Olá mundo  \n";
        let rendered = split_sections(text);
        assert!(rendered.header.is_none());
        assert_eq!(rendered.body, text, "body must stay untrimmed");
    }

    #[test]
    fn test_single_delimiter_yields_empty_body() {
        let rendered = split_sections("x-----HEADER");
        assert_eq!(rendered.header.as_deref(), Some("HEADER"));
        assert_eq!(rendered.body, "");
    }

    #[test]
    fn test_markdown_heading_from_header() {
        let md = split_sections("-----CERTIDÃO-----Nome: Ana").to_markdown();
        assert_eq!(md, "## CERTIDÃO\n\nNome: Ana");
    }

    #[test]
    fn test_markdown_without_header_is_just_the_body() {
        let md = split_sections("Nome: Ana").to_markdown();
        assert_eq!(md, "Nome: Ana");
    }

    #[test]
    fn test_empty_header_renders_no_heading() {
        let md = split_sections("----- -----Nome: Ana").to_markdown();
        assert!(!md.contains('#'));
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(trim_trailing_whitespace("  ola   \nmundo  "), "  ola\nmundo");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn test_remove_invisible() {
        assert_eq!(
            remove_invisible_chars("cer\u{200B}tidão\u{FEFF} de\u{00AD} óbito"),
            "certidão de óbito"
        );
    }

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline("ola"), "ola\n");
        assert_eq!(ensure_final_newline("ola\n\n\n"), "ola\n");
        assert_eq!(ensure_final_newline(""), "\n");
    }

    #[test]
    fn test_render_markdown_full_pipeline() {
        let text = "ruído-----CERTIDÃO DE CASAMENTO-----Cônjuge: Ana   \r\n\r\n\r\n\r\nCônjuge: Rui";
        let md = render_markdown(text);
        assert!(md.starts_with("## CERTIDÃO DE CASAMENTO\n"));
        assert!(md.contains("Cônjuge: Ana\n"));
        assert!(md.ends_with("Cônjuge: Rui\n"));
        assert!(!md.contains('\r'));
        assert!(!md.contains("\n\n\n\n"));
    }
}
