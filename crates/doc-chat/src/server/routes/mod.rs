//! API routes for the document chat server

pub mod documents;
pub mod export;
pub mod query;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session management
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        // Document upload - with larger body limit
        .route(
            "/sessions/:id/document",
            post(documents::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Questions
        .route("/sessions/:id/query", post(query::ask_question))
        // Transcript
        .route("/sessions/:id/transcript", get(sessions::get_transcript))
        .route("/sessions/:id/export/:format", get(export::export_transcript))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "doc-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ask questions about an uploaded document and export the conversation",
        "endpoints": {
            "POST /api/sessions": "Start a session",
            "GET /api/sessions/:id": "Session details",
            "DELETE /api/sessions/:id": "End a session",
            "POST /api/sessions/:id/document": "Upload a PDF, CSV, DOCX or XLSX file (multipart field `file`)",
            "POST /api/sessions/:id/query": "Ask a question about the document",
            "GET /api/sessions/:id/transcript": "Question/answer history (?format=markdown)",
            "GET /api/sessions/:id/export/:format": "Download the history as pdf, docx, csv or xlsx"
        }
    }))
}
