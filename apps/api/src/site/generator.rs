//! Site Generation: resume text in, `SiteBundle` out.
//!
//! Flow: validate text → one model call (system prompt + resume) → split sections → bundle.
//!
//! The model sits behind the `SiteModel` trait so handlers and tests can swap it.
//! `AppState` holds an `Arc<dyn SiteModel>`; production uses `LlmClient`.

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::site::bundle::SiteBundle;
use crate::site::prompts::SITE_GENERATION_SYSTEM;
use crate::site::sections::SiteSections;

/// A text-completion backend: one system instruction, one user turn, one response.
#[async_trait]
pub trait SiteModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl SiteModel for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.call_text(user, system).await
    }
}

/// Generates the site for one resume.
///
/// Errors:
/// - `Validation` if the resume text is empty (nothing for the model to work from)
/// - `Llm` if the model call fails
/// - `MarkerNotFound` if the response lacks a section marker
pub async fn generate_site(model: &dyn SiteModel, resume_text: &str) -> Result<SiteBundle, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the uploaded document".to_string(),
        ));
    }

    info!("Requesting site generation ({} chars of resume text)", resume_text.len());
    let response = model
        .complete(SITE_GENERATION_SYSTEM, resume_text)
        .await
        .map_err(|e| AppError::Llm(format!("Site generation failed: {e}")))?;

    let sections = SiteSections::parse(&response)?;
    let bundle = SiteBundle::new(sections);
    info!(
        "Generated site {}: html={}B css={}B js={}B",
        bundle.id,
        bundle.sections.html.len(),
        bundle.sections.css.len(),
        bundle.sections.js.len()
    );

    Ok(bundle)
}
