//! DOCX (WordprocessingML) text extraction.
//!
//! Reads `word/document.xml` out of the ZIP container and walks body-level paragraphs.
//! Paragraphs inside tables are skipped, as are nested text-box paragraphs; run text
//! (`w:t`) is concatenated, with `w:tab` as a tab and `w:br` / `w:cr` as newlines.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Matches the handful of WordprocessingML tags the paragraph walk cares about.
/// Groups: 1 = closing slash, 2 = tag name, 3 = self-closing slash.
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"<(/?)(w:tbl|w:tab|w:pPr|w:br|w:cr|w:p|w:t)\b[^>]*?(/?)>")
            .expect("static regex is valid")
    })
}

/// Extracts paragraph text from DOCX bytes, joined with `\n` (not trimmed).
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let xml = read_document_part(bytes)?;
    Ok(body_paragraphs(&xml).join("\n"))
}

fn read_document_part(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::DocumentParse(format!("not a DOCX container: {e}")))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::DocumentParse(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::DocumentParse(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    Ok(xml)
}

/// Returns the text of each body-level paragraph, in document order.
fn body_paragraphs(xml: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut in_properties = false;
    let mut text_start: Option<usize> = None;

    for caps in token_regex().captures_iter(xml) {
        let Some(whole) = caps.get(0) else { continue };
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty();
        let collecting = table_depth == 0 && paragraph_depth == 1;

        match (&caps[2], closing) {
            ("w:tbl", false) if !self_closing => table_depth += 1,
            ("w:tbl", true) => table_depth = table_depth.saturating_sub(1),

            ("w:p", false) if self_closing => {
                if table_depth == 0 && paragraph_depth == 0 {
                    paragraphs.push(String::new());
                }
            }
            ("w:p", false) => {
                paragraph_depth += 1;
                if table_depth == 0 && paragraph_depth == 1 {
                    current = Some(String::new());
                }
            }
            ("w:p", true) => {
                if table_depth == 0 && paragraph_depth == 1 {
                    paragraphs.extend(current.take());
                }
                paragraph_depth = paragraph_depth.saturating_sub(1);
            }

            // w:tab inside w:pPr is a tab-stop definition, not content
            ("w:pPr", false) if !self_closing => in_properties = true,
            ("w:pPr", true) => in_properties = false,

            ("w:t", false) if !self_closing && collecting => text_start = Some(whole.end()),
            ("w:t", true) => {
                if let (Some(start), Some(buf)) = (text_start.take(), current.as_mut()) {
                    if collecting {
                        buf.push_str(&html_escape::decode_html_entities(&xml[start..whole.start()]));
                    }
                }
            }

            ("w:tab", false) if collecting && !in_properties => push_char(&mut current, '\t'),
            ("w:br" | "w:cr", false) if collecting => push_char(&mut current, '\n'),

            _ => {}
        }
    }

    paragraphs
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(buf) = current.as_mut() {
        buf.push(c);
    }
}
