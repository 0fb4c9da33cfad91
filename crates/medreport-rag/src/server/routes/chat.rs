//! Chat endpoint: grounded Q&A with citations

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /api/chat - answer a question against the user's uploaded reports
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();
    tracing::info!(user_id = %request.user_id, "chat question received");

    let response = state.service().ask(&request.user_id, &request.query).await?;

    tracing::info!(
        user_id = %request.user_id,
        citations = response.citations.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "chat question answered"
    );

    Ok(Json(response))
}
