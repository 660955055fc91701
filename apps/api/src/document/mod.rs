//! Document text extraction: turns an uploaded resume (PDF / DOC / DOCX) into plain text.
//!
//! PDF goes through an ordered list of `PdfTextSource`s (primary first, fallback second).
//! DOC and DOCX both go through the WordprocessingML reader; there is no fallback for them.
//!
//! Everything here is blocking and CPU-bound. Async callers must run it inside
//! `tokio::task::spawn_blocking`.

pub mod docx;
pub mod pdf;

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: '{0}' (expected .pdf, .doc or .docx)")]
    UnsupportedFormat(String),

    #[error("Failed to parse document: {0}")]
    DocumentParse(String),
}

/// Accepted upload formats. `Doc` is read with the DOCX reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    /// Derives the format from a file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "doc" => Ok(DocumentFormat::Doc),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ExtractError::UnsupportedFormat(ext)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// An uploaded document, held only for the duration of one extraction.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl SourceDocument {
    /// Builds a document from an upload, rejecting unsupported extensions up front.
    pub fn from_upload(file_name: impl Into<String>, bytes: Bytes) -> Result<Self, ExtractError> {
        let file_name = file_name.into();
        let format = DocumentFormat::from_file_name(&file_name)?;
        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }
}

/// Extracts the plain text of a document, trimmed at both ends.
///
/// Returns an empty string (never an error) when a readable document simply has no text.
pub fn extract_text(document: &SourceDocument) -> Result<String, ExtractError> {
    let raw = match document.format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(&document.bytes, &pdf::default_sources())?,
        DocumentFormat::Doc | DocumentFormat::Docx => docx::extract_docx_text(&document.bytes)?,
    };

    let text = raw.trim().to_string();
    debug!(
        "Extracted {} chars from '{}' ({})",
        text.len(),
        document.file_name,
        document.format.as_str()
    );
    Ok(text)
}
