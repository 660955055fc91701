//! Axum route handlers for the Site API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::document::{extract_text, DocumentFormat, SourceDocument};
use crate::errors::AppError;
use crate::site::bundle::{SiteBundle, ARCHIVE_NAME};
use crate::site::generator::generate_site;
use crate::site::sections::SiteSections;
use crate::state::AppState;

/// Multipart field carrying the resume.
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub format: DocumentFormat,
    pub text: String,
    pub char_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub site_id: Uuid,
    #[serde(flatten)]
    pub sections: SiteSections,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// Returns the plain text that would be sent to the model for this upload.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let document = read_upload(multipart).await?;
    let file_name = document.file_name.clone();
    let format = document.format;
    let text = extract_upload(document).await?;

    Ok(Json(ExtractResponse {
        file_name,
        format,
        char_count: text.chars().count(),
        text,
    }))
}

/// POST /api/v1/sites
///
/// Full pipeline: upload → text → model → sections → `website.zip` download.
/// When OUTPUT_DIR is configured the files are also written there; nothing is
/// returned or written if any step fails.
pub async fn handle_generate_site(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let bundle = build_site(&state, multipart).await?;
    let archive = bundle.to_zip()?;

    if let Some(root) = state.config.output_dir.clone() {
        let to_persist = bundle.clone();
        let persisted = tokio::task::spawn_blocking(move || to_persist.persist(&root))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Persist task failed: {e}")))??;
        info!(
            "Saved site to {} (archive: {})",
            persisted.dir.display(),
            persisted.archive.display()
        );
    }

    info!("Serving {} ({} bytes) for site {}", ARCHIVE_NAME, archive.len(), bundle.id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_NAME}\""),
            ),
        ],
        archive,
    )
        .into_response())
}

/// POST /api/v1/sites/preview
///
/// Same pipeline as `/sites`, returning the three sections as JSON instead of an archive.
pub async fn handle_preview_site(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PreviewResponse>, AppError> {
    let bundle = build_site(&state, multipart).await?;
    Ok(Json(PreviewResponse {
        site_id: bundle.id,
        sections: bundle.sections,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn build_site(state: &AppState, multipart: Multipart) -> Result<SiteBundle, AppError> {
    let document = read_upload(multipart).await?;
    info!(
        "Received '{}' ({} bytes)",
        document.file_name,
        document.bytes.len()
    );
    let text = extract_upload(document).await?;
    generate_site(state.model.as_ref(), &text).await
}

/// Pulls the `file` field out of the multipart body and checks its extension.
async fn read_upload(mut multipart: Multipart) -> Result<SourceDocument, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no file name".to_string()))?;
        // Reject by extension before buffering the body
        DocumentFormat::from_file_name(&file_name)?;

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok(SourceDocument::from_upload(file_name, bytes)?);
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Runs the blocking extractor off the async runtime.
async fn extract_upload(document: SourceDocument) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))??;
    Ok(text)
}
