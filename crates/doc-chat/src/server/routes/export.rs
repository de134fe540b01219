//! Transcript export endpoint

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{Error, Result};
use crate::export::{export, ExportFormat};
use crate::server::state::AppState;

/// GET /api/sessions/:id/export/:format - Download the transcript
///
/// The artifact is regenerated from the current transcript on every request.
pub async fn export_transcript(
    State(state): State<AppState>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response> {
    let format: ExportFormat = format.parse()?;
    let handle = state.session(&id)?;
    let transcript = handle.lock().await.transcript().clone();

    let artifact = tokio::task::spawn_blocking(move || export(format, &transcript))
        .await
        .map_err(|e| Error::internal(format!("Export task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name()),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}
