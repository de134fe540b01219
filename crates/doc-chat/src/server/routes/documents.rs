//! Document upload endpoint

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentFormat, DocumentPayload, DocumentResponse};

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

const NO_TEXT_MESSAGE: &str = "The document contains no extractable text. Upload another file before asking questions.";

/// POST /api/sessions/:id/document - Extract a file and make it the session context
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>> {
    let start = Instant::now();
    let handle = state.session(&id)?;
    let payload = read_file_field(&mut multipart).await?;

    tracing::info!(
        "Session {}: extracting {} ({} bytes)",
        id,
        payload.display_filename(),
        payload.data.len()
    );

    // Extraction is CPU-bound and may wait on the PDF timeout
    let parser = state.parser().clone();
    let extracted = tokio::task::spawn_blocking(move || parser.extract(payload))
        .await
        .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??;

    let mut session = handle.lock().await;
    let document = session.apply_extracted(extracted).clone();
    let has_context = session.context().is_some();

    tracing::info!(
        "Session {}: context replaced ({} chars) in {}ms",
        id,
        document.context_chars,
        start.elapsed().as_millis()
    );

    Ok(Json(DocumentResponse {
        session_id: session.id(),
        document,
        has_context,
        message: (!has_context).then(|| NO_TEXT_MESSAGE.to_string()),
    }))
}

/// Read the `file` field; the format comes from the file name, else the declared content type
async fn read_file_field(multipart: &mut Multipart) -> Result<DocumentPayload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let format = filename
            .as_deref()
            .and_then(|name| DocumentFormat::from_filename(name).ok())
            .or_else(|| content_type.as_deref().and_then(DocumentFormat::from_mime))
            .ok_or_else(|| {
                Error::UnsupportedFileType(
                    filename
                        .clone()
                        .or_else(|| content_type.clone())
                        .unwrap_or_else(|| "unknown".to_string()),
                )
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        let mut payload = DocumentPayload::new(format, data);
        payload.filename = filename;
        return Ok(payload);
    }

    Err(Error::InvalidRequest(format!(
        "Missing multipart field `{}`",
        FILE_FIELD
    )))
}
