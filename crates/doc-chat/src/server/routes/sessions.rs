//! Session lifecycle and transcript endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{SessionInfo, TranscriptQuery, TranscriptResponse, TranscriptView};

/// POST /api/sessions - Start a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionInfo>) {
    let handle = state.create_session();
    let session = handle.lock().await;
    (StatusCode::CREATED, Json(SessionInfo::from(&*session)))
}

/// GET /api/sessions/:id - Session details
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>> {
    let handle = state.session(&id)?;
    let session = handle.lock().await;
    Ok(Json(SessionInfo::from(&*session)))
}

/// DELETE /api/sessions/:id - End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.remove_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/:id/transcript - Full history, JSON or markdown
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TranscriptQuery>,
) -> Result<Response> {
    let handle = state.session(&id)?;
    let session = handle.lock().await;

    let response = match query.format {
        TranscriptView::Json => Json(TranscriptResponse::from(&*session)).into_response(),
        TranscriptView::Markdown => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            session.transcript().to_markdown(),
        )
            .into_response(),
    };

    Ok(response)
}
