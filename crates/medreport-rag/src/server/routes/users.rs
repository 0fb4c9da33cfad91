//! Account deletion endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::DeleteResponse;

/// DELETE /api/users/:user_id - destroy the user's entire vector collection
///
/// Called from the account-deletion flow; a failure here is surfaced so the
/// caller can report partial cleanup instead of unconditional success.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.service().delete_user(&user_id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "User collection deleted".to_string(),
    }))
}
