//! PDF text extraction with an ordered primary → fallback parser chain.
//!
//! `pdf-extract` handles layout better but can error or panic on unusual files;
//! `lopdf` is more permissive and is only consulted when the primary fails.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::ExtractError;

/// A strategy for pulling per-page text out of PDF bytes.
///
/// `Ok` means the document was readable; a page with no text yields `None`.
pub trait PdfTextSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<Option<String>>, String>;
}

/// Primary parser: `pdf-extract`, one string per page.
pub struct PdfExtractSource;

impl PdfTextSource for PdfExtractSource {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<Option<String>>, String> {
        // pdf-extract panics on some malformed input instead of returning an error
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages.into_iter().map(Some).collect()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("parser panicked on malformed document".to_string()),
        }
    }
}

/// Fallback parser: `lopdf`. Pages whose text cannot be decoded contribute nothing.
pub struct LopdfSource;

impl PdfTextSource for LopdfSource {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<Option<String>>, String> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;

        // get_pages() is a BTreeMap keyed by page number, so iteration is in document order
        let pages = doc
            .get_pages()
            .into_keys()
            .map(|page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!("lopdf: no text on page {page_num}: {e}");
                    None
                }
            })
            .collect();
        Ok(pages)
    }
}

/// The production chain: `pdf-extract`, then `lopdf`.
pub fn default_sources() -> Vec<Box<dyn PdfTextSource>> {
    vec![Box::new(PdfExtractSource), Box::new(LopdfSource)]
}

/// Tries each source in order. First success wins; the last failure is returned.
pub fn extract_pdf_text(
    bytes: &[u8],
    sources: &[Box<dyn PdfTextSource>],
) -> Result<String, ExtractError> {
    let mut last_error = String::from("no PDF parser configured");

    for source in sources {
        match source.page_texts(bytes) {
            Ok(pages) => {
                debug!("{} read {} page(s)", source.name(), pages.len());
                return Ok(pages.into_iter().flatten().collect());
            }
            Err(e) => {
                warn!("PDF parser {} failed: {e}", source.name());
                last_error = format!("{}: {e}", source.name());
            }
        }
    }

    Err(ExtractError::DocumentParse(last_error))
}
