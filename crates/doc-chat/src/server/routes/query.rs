//! Question endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/sessions/:id/query - Ask a question about the session's document
///
/// The session lock is held for the whole service round trip, so questions
/// within one session are answered and recorded one at a time.
pub async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    let handle = state.session(&id)?;
    let credential = request.credential(state.fallback_api_key());

    let mut session = handle.lock().await;
    let outcome = session.ask(&request.question, state.client(), credential).await?;

    if let Some(guidance) = outcome.guidance() {
        tracing::info!("Session {}: question not sent ({})", id, guidance);
    }

    Ok(Json(QueryResponse::from_outcome(
        request.question.as_str(),
        outcome,
        session.transcript().len(),
        start.elapsed().as_millis() as u64,
    )))
}
