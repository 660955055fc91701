pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::site::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route("/api/v1/extract", post(handlers::handle_extract))
        // Site API
        .route("/api/v1/sites", post(handlers::handle_generate_site))
        .route("/api/v1/sites/preview", post(handlers::handle_preview_site))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::document::fixtures;
    use crate::site::generator::mock::MockSiteModel;

    const BOUNDARY: &str = "folio-test-boundary";
    const RESPONSE: &str =
        "--html--<h1>Jane</h1>--html--\n--css--h1{color:red}--css--\n--js--console.log(1)";

    fn test_config(output_dir: Option<PathBuf>) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_base_url: None,
            port: 0,
            rust_log: "debug".to_string(),
            output_dir,
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn app(model: Arc<MockSiteModel>, output_dir: Option<PathBuf>) -> Router {
        build_router(AppState {
            model,
            config: test_config(output_dir),
        })
    }

    fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(uri: &str, field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, file_name, bytes)))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
            .await
            .unwrap()
            .to_vec()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        json["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let response = app(model, None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_docx_upload_produces_zip_end_to_end() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let docx = fixtures::docx_with_paragraphs(&["Jane Doe, Software Engineer"]);

        let response = app(model.clone(), None)
            .oneshot(upload("/api/v1/sites", "file", "Jane_Resume.DOCX", &docx))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/zip"
        );
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("website.zip"));

        // The model saw the extracted resume text as the user turn
        assert_eq!(
            model.calls.lock().unwrap()[0].1,
            "Jane Doe, Software Engineer"
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(body_bytes(response).await)).unwrap();
        for (name, expected) in [
            ("index.html", "<h1>Jane</h1>"),
            ("style.css", "h1{color:red}"),
            ("script.js", "console.log(1)"),
        ] {
            let mut contents = String::new();
            archive
                .by_name(name)
                .unwrap()
                .read_to_string(&mut contents)
                .unwrap();
            assert!(contents.contains(expected), "{name}: {contents}");
        }
    }

    #[tokio::test]
    async fn test_generated_site_is_persisted_when_output_dir_set() {
        let out = tempfile::tempdir().unwrap();
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let docx = fixtures::docx_with_paragraphs(&["Jane Doe"]);

        let response = app(model, Some(out.path().to_path_buf()))
            .oneshot(upload("/api/v1/sites", "file", "cv.docx", &docx))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let site_dirs: Vec<_> = std::fs::read_dir(out.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(site_dirs.len(), 1);
        let dir = &site_dirs[0];
        assert_eq!(
            std::fs::read_to_string(dir.join("style.css")).unwrap(),
            "h1{color:red}"
        );
        assert!(dir.join("website.zip").exists());
    }

    #[tokio::test]
    async fn test_preview_returns_sections_as_json() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let docx = fixtures::docx_with_paragraphs(&["Jane Doe"]);

        let response = app(model, None)
            .oneshot(upload("/api/v1/sites/preview", "file", "cv.docx", &docx))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["html"], "<h1>Jane</h1>");
        assert_eq!(json["css"], "h1{color:red}");
        assert_eq!(json["js"], "console.log(1)");
        assert!(json["site_id"].is_string());
    }

    #[tokio::test]
    async fn test_extract_endpoint_returns_text() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let docx = fixtures::docx_with_paragraphs(&["Jane Doe", "Rust, Go"]);

        let response = app(model.clone(), None)
            .oneshot(upload("/api/v1/extract", "file", "cv.docx", &docx))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["text"], "Jane Doe\nRust, Go");
        assert_eq!(json["format"], "docx");
        assert_eq!(json["char_count"], 17);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_415_and_skips_model() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let response = app(model.clone(), None)
            .oneshot(upload("/api/v1/sites", "file", "resume.txt", b"plain text"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error_code(response).await, "UNSUPPORTED_FORMAT");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_422() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let response = app(model.clone(), None)
            .oneshot(upload("/api/v1/sites", "file", "cv.docx", b"not a zip at all"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(response).await, "DOCUMENT_PARSE_ERROR");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_model_response_is_502_and_nothing_persisted() {
        let out = tempfile::tempdir().unwrap();
        let model = Arc::new(MockSiteModel::replying("I cannot help with that."));
        let docx = fixtures::docx_with_paragraphs(&["Jane Doe"]);

        let response = app(model, Some(out.path().to_path_buf()))
            .oneshot(upload("/api/v1/sites", "file", "cv.docx", &docx))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error_code(response).await, "MALFORMED_RESPONSE");
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_is_502_llm_error() {
        let model = Arc::new(MockSiteModel::failing(500));
        let docx = fixtures::docx_with_paragraphs(&["Jane Doe"]);

        let response = app(model, None)
            .oneshot(upload("/api/v1/sites", "file", "cv.docx", &docx))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error_code(response).await, "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_400() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let response = app(model, None)
            .oneshot(upload("/api/v1/sites", "resume", "cv.docx", b"x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_document_without_text_is_400() {
        let model = Arc::new(MockSiteModel::replying(RESPONSE));
        let docx = fixtures::docx_with_paragraphs(&["", "   "]);

        let response = app(model.clone(), None)
            .oneshot(upload("/api/v1/sites", "file", "cv.docx", &docx))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(model.call_count(), 0);
    }
}
