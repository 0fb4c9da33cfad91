//! Report upload and deletion endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChunkMetadata, DeleteResponse, UploadResponse, UploadStatus};

/// POST /api/reports/upload - upload a report for OCR extraction and indexing
///
/// Multipart fields: `user_id`, `file` (the PDF), optional `description`.
pub async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut user_id: Option<String> = None;
    let mut description = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("user_id") => {
                user_id = Some(field.text().await.map_err(|e| {
                    Error::invalid_request(format!("invalid user_id field: {}", e))
                })?);
            }
            Some("description") => {
                description = field.text().await.map_err(|e| {
                    Error::invalid_request(format!("invalid description field: {}", e))
                })?;
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("report.pdf")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    Error::invalid_request(format!("failed to read uploaded file: {}", e))
                })?;
                file = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| Error::invalid_request("missing user_id field"))?;
    let (filename, data) =
        file.ok_or_else(|| Error::invalid_request("missing file field"))?;

    tracing::info!(
        user_id = %user_id,
        filename = %filename,
        bytes = data.len(),
        "report upload received"
    );

    let text = state.extractor().extract_text(&filename, &data).await?;

    let report_id = Uuid::new_v4().to_string();
    let metadata = ChunkMetadata::pdf(filename.as_str(), description.as_str());

    let outcome = state
        .service()
        .upload(&user_id, &report_id, &filename, &text, metadata)
        .await?;

    let message = match outcome.status {
        UploadStatus::Indexed => "File uploaded and processed successfully",
        UploadStatus::Unchanged => "Identical report already indexed",
        UploadStatus::Updated => "Report re-indexed with updated content",
    };

    Ok(Json(UploadResponse {
        success: true,
        message: message.to_string(),
        report_id,
        chunk_count: outcome.chunk_count,
        status: outcome.status,
    }))
}

/// DELETE /api/users/:user_id/reports/:report_id - delete one report's chunks
pub async fn delete_report(
    State(state): State<AppState>,
    Path((user_id, report_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let removed = state.service().delete_report(&user_id, &report_id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Report deleted ({} chunks removed)", removed),
    }))
}
