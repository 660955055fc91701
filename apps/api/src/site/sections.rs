//! Splits the model's single-pass response into its `--html--` / `--css--` / `--js--` sections.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectionError {
    #[error("Model response is missing the '--{tag}--' marker")]
    MarkerNotFound { tag: String },
}

/// The three sections a generated site is made of, in response order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionTag {
    Html,
    Css,
    Js,
}

impl SectionTag {
    pub const ALL: [SectionTag; 3] = [SectionTag::Html, SectionTag::Css, SectionTag::Js];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTag::Html => "html",
            SectionTag::Css => "css",
            SectionTag::Js => "js",
        }
    }

    /// Name of the file this section is written to.
    pub fn file_name(&self) -> &'static str {
        match self {
            SectionTag::Html => "index.html",
            SectionTag::Css => "style.css",
            SectionTag::Js => "script.js",
        }
    }
}

/// Returns the trimmed body between the first `--{tag}--` and the next one after it.
///
/// A missing closing marker means "to the end of the content", which is how the
/// last section usually arrives. A missing opening marker is an error.
pub fn extract_section<'a>(content: &'a str, tag: &str) -> Result<&'a str, SectionError> {
    let marker = format!("--{tag}--");

    let start = content
        .find(&marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| SectionError::MarkerNotFound {
            tag: tag.to_string(),
        })?;

    let body = match content[start..].find(&marker) {
        Some(len) => &content[start..start + len],
        None => &content[start..],
    };

    Ok(body.trim())
}

/// All three code sections of one model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSections {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl SiteSections {
    /// Extracts every known section; fails on the first tag whose marker is absent.
    pub fn parse(content: &str) -> Result<Self, SectionError> {
        Ok(Self {
            html: extract_section(content, SectionTag::Html.as_str())?.to_string(),
            css: extract_section(content, SectionTag::Css.as_str())?.to_string(),
            js: extract_section(content, SectionTag::Js.as_str())?.to_string(),
        })
    }

    pub fn get(&self, tag: SectionTag) -> &str {
        match tag {
            SectionTag::Html => &self.html,
            SectionTag::Css => &self.css,
            SectionTag::Js => &self.js,
        }
    }
}
